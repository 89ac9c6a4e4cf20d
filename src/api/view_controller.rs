use std::time::Duration;

use tracing::{debug, trace};

use crate::core::Viewport;

use super::adjuster::schedule_refit;
use super::{ActiveTab, ChartBuilder, Playground, PlaygroundEvent};

impl<B: ChartBuilder> Playground<B> {
    /// Flips fullscreen and refits the live chart to the new size.
    ///
    /// Returns the new fullscreen state.
    pub fn toggle_fullscreen(&mut self) -> bool {
        let fullscreen = {
            let mut stage = self.stage.borrow_mut();
            stage.view.fullscreen = !stage.view.fullscreen;
            stage.view.fullscreen
        };
        debug!(fullscreen, "fullscreen toggled");
        self.schedule_refit_if_live();
        self.emit_event(PlaygroundEvent::FullscreenChanged { fullscreen });
        fullscreen
    }

    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        let changed = {
            let mut stage = self.stage.borrow_mut();
            let changed = stage.view.active_tab != tab;
            stage.view.active_tab = tab;
            changed
        };
        if changed {
            trace!(?tab, "active tab changed");
            self.emit_event(PlaygroundEvent::TabChanged { tab });
        }
    }

    /// Records a new mount point size and refits the live chart to it.
    pub fn resize_mount(&mut self, viewport: Viewport) {
        if self.mount.viewport() == viewport {
            return;
        }
        self.mount.resize(viewport);
        trace!(width = viewport.width, height = viewport.height, "mount point resized");
        self.schedule_refit_if_live();
    }

    /// Moves the deferred clock forward. Returns the number of tasks run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.deferred.advance(elapsed)
    }

    /// Runs every pending deferred task now.
    pub fn flush_deferred(&mut self) -> usize {
        self.deferred.flush()
    }

    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.pending()
    }

    fn schedule_refit_if_live(&mut self) {
        schedule_refit(&mut self.deferred, &self.stage, self.config.refit_delay());
    }
}
