use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::core::{DataTable, Dataset, MountPoint};
use crate::error::{ChartResult, ExecutionError};
use crate::script::{EditorSurface, SandboxedExecutor, normalize_with};

use super::adjuster::schedule_refit;
use super::reflector::reflect_dataset;
use super::stage::Stage;
use super::{
    ActiveTab, ChartBuilder, ChartHandle, DeferredQueue, PlaygroundConfig, PlaygroundEvent,
    PlaygroundObserver, ViewState,
};

/// Runs scripts and owns the single chart they produce.
///
/// Every run tears the previous chart down and empties the mount point
/// before the new script executes, so at most one chart is ever live.
/// Deferred work (post-render fitting) is driven by the host through
/// `advance` or `flush_deferred`.
pub struct Playground<B: ChartBuilder> {
    pub(super) config: PlaygroundConfig,
    pub(super) executor: SandboxedExecutor<B>,
    pub(super) mount: MountPoint,
    pub(super) stage: Rc<RefCell<Stage<B::Handle>>>,
    pub(super) deferred: DeferredQueue,
    pub(super) dataset: Dataset,
    pub(super) observers: Vec<Box<dyn PlaygroundObserver>>,
}

impl<B: ChartBuilder> Playground<B> {
    /// Creates a playground with its own mount point sized from `config`.
    pub fn new(builder: B, config: PlaygroundConfig) -> ChartResult<Self> {
        let mount = MountPoint::new(config.mount_viewport);
        Self::with_mount(builder, config, mount)
    }

    /// Creates a playground drawing into a host-owned mount point.
    pub fn with_mount(
        builder: B,
        config: PlaygroundConfig,
        mount: MountPoint,
    ) -> ChartResult<Self> {
        config.validate()?;
        let executor = SandboxedExecutor::new(builder, config.executor.clone());
        Ok(Self {
            config,
            executor,
            mount,
            stage: Rc::new(RefCell::new(Stage::new())),
            deferred: DeferredQueue::new(),
            dataset: Dataset::default(),
            observers: Vec::new(),
        })
    }

    /// Replaces the current chart with the one `script` builds.
    ///
    /// On failure the error is recorded in the view state and also returned;
    /// the mount point is left empty.
    pub fn run(&mut self, script: &str) -> Result<(), ExecutionError> {
        self.dispose_current();
        self.mount.clear();

        let normalized = normalize_with(script, &self.config.executor.mount_param);
        match self.executor.execute(&normalized, &self.mount) {
            Ok(handle) => {
                self.adopt(handle);
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// Runs whatever `editor` currently holds.
    pub fn run_from<E>(&mut self, editor: &E) -> Result<(), ExecutionError>
    where
        E: EditorSurface + ?Sized,
    {
        let script = editor.current_text();
        self.run(&script)
    }

    /// Destroys the current chart and resets the view to its initial state.
    pub fn clear(&mut self) {
        let destroyed = self.dispose_current();
        self.mount.clear();
        self.dataset = Dataset::default();
        let tab_changed = {
            let mut stage = self.stage.borrow_mut();
            let view = &mut stage.view;
            view.has_chart = false;
            view.error = None;
            let tab_changed = view.active_tab != ActiveTab::Chart;
            view.active_tab = ActiveTab::Chart;
            tab_changed
        };
        debug!(destroyed, "playground cleared");
        self.emit_event(PlaygroundEvent::Cleared);
        if tab_changed {
            self.emit_event(PlaygroundEvent::TabChanged {
                tab: ActiveTab::Chart,
            });
        }
    }

    fn adopt(&mut self, handle: B::Handle) {
        let dataset = reflect_dataset(&handle);
        let generation = {
            let mut stage = self.stage.borrow_mut();
            let generation = stage.adopt(handle);
            stage.view.has_chart = true;
            stage.view.error = None;
            generation
        };
        schedule_refit(&mut self.deferred, &self.stage, self.config.refit_delay());
        info!(generation, records = dataset.len(), "chart adopted");

        self.dataset = dataset;
        self.emit_event(PlaygroundEvent::ChartAdopted { generation });
        self.emit_event(PlaygroundEvent::DatasetReflected {
            records: self.dataset.len(),
        });
    }

    fn record_failure(&mut self, err: &ExecutionError) {
        warn!(kind = ?err.kind(), error = %err, "script run failed");
        {
            let mut stage = self.stage.borrow_mut();
            stage.view.has_chart = false;
            stage.view.error = Some(err.message().to_owned());
        }
        self.dataset = Dataset::default();
        self.mount.clear();
        self.emit_event(PlaygroundEvent::ExecutionFailed {
            kind: err.kind(),
            message: err.message().to_owned(),
        });
    }

    /// Empties the stage and destroys what was in it. Returns `true` when a
    /// chart was destroyed.
    pub(super) fn dispose_current(&mut self) -> bool {
        // Released before `destroy` so a chart can never observe a borrowed stage.
        let previous = self.stage.borrow_mut().vacate();
        match previous {
            Some(handle) if !handle.is_destroyed() => {
                handle.destroy();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    #[must_use]
    pub fn executor(&self) -> &SandboxedExecutor<B> {
        &self.executor
    }

    #[must_use]
    pub fn builder(&self) -> &B {
        self.executor.builder()
    }

    #[must_use]
    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.stage.borrow().view.clone()
    }

    #[must_use]
    pub fn has_chart(&self) -> bool {
        self.stage.borrow().view.has_chart
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.stage.borrow().view.error.clone()
    }

    #[must_use]
    pub fn active_tab(&self) -> ActiveTab {
        self.stage.borrow().view.active_tab
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.stage.borrow().view.fullscreen
    }

    /// The live chart, if any.
    #[must_use]
    pub fn current_handle(&self) -> Option<B::Handle> {
        self.stage.borrow().current.clone()
    }

    /// Counter that moves whenever the live chart is replaced or removed.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.stage.borrow().generation
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Tabular preview of the reflected dataset.
    #[must_use]
    pub fn data_table(&self) -> DataTable {
        DataTable::from_dataset(&self.dataset)
    }
}

impl<B: ChartBuilder> Drop for Playground<B> {
    fn drop(&mut self) {
        if self.dispose_current() {
            debug!("destroyed live chart on playground drop");
        }
    }
}
