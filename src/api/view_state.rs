use serde::{Deserialize, Serialize};

/// Which panel of the playground is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveTab {
    #[default]
    Chart,
    Data,
}

/// Presentation state the host renders from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub active_tab: ActiveTab,
    pub fullscreen: bool,
    pub has_chart: bool,
    /// Message of the last failed run. Cleared by a successful run or `clear`.
    pub error: Option<String>,
}
