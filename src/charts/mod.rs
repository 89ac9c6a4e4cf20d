//! Built-in mark chart library exposed to scripts as `Chart`.
//!
//! A chart collects marks (`interval`, `line`, `point`, `area`), each with
//! channel encodings and styles, and lays them out into a `RenderFrame` on
//! `render()`. The painted surface is attached to the chart's mount point.

mod bindings;
mod builder;
mod chart;
mod convert;
mod layout;
mod mark;
pub mod palette;

pub use builder::MarkChartBuilder;
pub use chart::{ChartConfig, ChartObject, Dimension};
pub use convert::{dynamic_to_json, json_to_dynamic, map_to_json};
pub use layout::{ChartSnapshot, build_frame};
pub use mark::{MarkKind, MarkObject, MarkSpec};
