//! chart-playground: script-driven chart playground engine.
//!
//! User scripts (Rhai) are normalized, executed in a fresh engine against an
//! injected mount point and chart constructor, and the chart they return is
//! adopted as the single live chart. Its data and title are reflected for a
//! preview table and PNG export.

pub mod api;
pub mod charts;
pub mod core;
pub mod error;
pub mod render;
pub mod samples;
pub mod script;
pub mod telemetry;

pub use api::{Playground, PlaygroundConfig};
pub use charts::MarkChartBuilder;
pub use error::{ChartError, ChartResult, ExecutionError, ExecutionErrorKind};
