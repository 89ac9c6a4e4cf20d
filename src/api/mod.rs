//! Host-facing playground API: the lifecycle manager and the traits a
//! charting capability implements to plug into it.

mod adjuster;
mod builder;
mod config;
mod deferred;
mod export;
mod export_controller;
mod handle;
mod observer;
mod observer_dispatch;
mod observer_registry;
mod playground;
mod reflector;
mod stage;
mod view_controller;
mod view_state;

pub use adjuster::{RefitOutcome, refit};
pub use builder::{ChartBuilder, InstanceLedger};
pub use config::{
    DEFAULT_REFIT_DELAY_MS, PLAYGROUND_CONFIG_JSON_SCHEMA_V1, PlaygroundConfig,
    PlaygroundConfigJsonContractV1,
};
pub use deferred::DeferredQueue;
pub use export::{
    DirectorySink, DownloadSink, ExportOutcome, MemorySink, SavedFile, encode_surface_png,
};
pub use handle::ChartHandle;
pub use observer::{PlaygroundContext, PlaygroundEvent, PlaygroundObserver};
pub use playground::Playground;
pub use reflector::{
    DEFAULT_EXPORT_TITLE, export_stem, reflect_dataset, reflect_title, sanitize_title,
};
pub use view_state::{ActiveTab, ViewState};
