use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::ExecutionErrorKind;

use super::ActiveTab;

/// Read-only playground snapshot passed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaygroundContext {
    pub viewport: Viewport,
    pub has_chart: bool,
    pub fullscreen: bool,
    pub active_tab: ActiveTab,
    pub dataset_len: usize,
    pub generation: u64,
}

/// Event stream exposed to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaygroundEvent {
    ChartAdopted { generation: u64 },
    ExecutionFailed { kind: ExecutionErrorKind, message: String },
    Cleared,
    DatasetReflected { records: usize },
    FullscreenChanged { fullscreen: bool },
    TabChanged { tab: ActiveTab },
    ImageExported { filename: String, fallback: bool },
}

/// Hook for hosts that mirror playground state elsewhere.
///
/// Observers see events after the state change they describe has been
/// applied, and cannot mutate the playground.
pub trait PlaygroundObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &PlaygroundEvent, context: PlaygroundContext);
}
