use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::ChartError;

use super::stage::Stage;
use super::{ChartHandle, DeferredQueue};

pub(crate) const REFIT_TASK_LABEL: &str = "refit";

/// What a refit pass did to a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefitOutcome {
    /// Fitted and rendered; `renders` is 2 in fullscreen.
    Refitted { renders: u8 },
    /// The captured chart is no longer the live one, or is gone.
    Stale,
    /// The chart rejected the refit; see logs.
    Failed,
}

/// Fits `handle` to its mount point and renders it, twice in fullscreen.
///
/// A chart without `force_fit` is still rendered.
pub fn refit<H: ChartHandle + ?Sized>(handle: &H, fullscreen: bool) -> RefitOutcome {
    if handle.is_destroyed() {
        return RefitOutcome::Stale;
    }
    match handle.force_fit() {
        Ok(()) => {}
        Err(ChartError::Unsupported(member)) => {
            trace!(member, "chart cannot fit itself; rendering at current size");
        }
        Err(err) => {
            warn!(error = %err, "chart fit failed");
            return RefitOutcome::Failed;
        }
    }

    let passes: u8 = if fullscreen { 2 } else { 1 };
    for _ in 0..passes {
        if let Err(err) = handle.render() {
            warn!(error = %err, fullscreen, "chart render after fit failed");
            return RefitOutcome::Failed;
        }
    }
    RefitOutcome::Refitted { renders: passes }
}

/// Queues a refit of the stage's current chart after `delay`.
///
/// The task captures the handle and the stage generation at scheduling time
/// and does nothing if either has moved on by the time it fires.
pub(crate) fn schedule_refit<H>(
    queue: &mut DeferredQueue,
    stage: &Rc<RefCell<Stage<H>>>,
    delay: Duration,
) where
    H: ChartHandle + Clone + 'static,
{
    let (handle, generation) = {
        let stage = stage.borrow();
        match &stage.current {
            Some(handle) => (handle.clone(), stage.generation),
            None => return,
        }
    };
    let stage: Weak<RefCell<Stage<H>>> = Rc::downgrade(stage);

    queue.schedule(delay, REFIT_TASK_LABEL, move || {
        let Some(stage) = stage.upgrade() else {
            trace!("playground dropped before refit fired");
            return;
        };
        let fullscreen = {
            let stage = stage.borrow();
            if stage.generation != generation || stage.current.is_none() {
                debug!(
                    scheduled = generation,
                    current = stage.generation,
                    "skipping refit of replaced chart"
                );
                return;
            }
            stage.view.fullscreen
        };
        let outcome = refit(&handle, fullscreen);
        trace!(?outcome, generation, "refit fired");
    });
}
