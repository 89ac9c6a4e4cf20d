use serde_json::Value;

use crate::error::{ChartError, ChartResult};

use super::DownloadSink;

/// A live chart instance produced by a script.
///
/// Handles are cheap reference clones of one underlying chart. Only `render`,
/// `destroy` and `is_destroyed` are required; every other member defaults to
/// "not provided by this chart", which callers treat as a miss rather than a
/// failure.
pub trait ChartHandle {
    /// Paints the chart into its mount point.
    fn render(&self) -> ChartResult<()>;

    /// Releases the chart and detaches it from its mount point. Idempotent.
    fn destroy(&self);

    fn is_destroyed(&self) -> bool;

    /// Resizes the chart to its mount point's current size.
    fn force_fit(&self) -> ChartResult<()> {
        Err(ChartError::Unsupported("force_fit"))
    }

    /// Construction options as a directly readable property.
    fn options(&self) -> Option<Value> {
        None
    }

    /// Current configuration via accessor.
    fn get_options(&self) -> ChartResult<Value> {
        Err(ChartError::Unsupported("get_options"))
    }

    /// Bound data via accessor.
    fn get_data(&self) -> ChartResult<Value> {
        Err(ChartError::Unsupported("get_data"))
    }

    /// Compiled chart specification via accessor.
    fn get_spec(&self) -> ChartResult<Value> {
        Err(ChartError::Unsupported("get_spec"))
    }

    /// Compiled chart specification as a directly readable property.
    fn spec(&self) -> Option<Value> {
        None
    }

    /// View-level options as a directly readable property.
    fn view_options(&self) -> Option<Value> {
        None
    }

    /// Every other readable property, by name.
    fn properties(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    /// Chart-native image download, used when exporting from the mounted
    /// surface fails.
    fn download_image(&self, filename: &str, sink: &mut dyn DownloadSink) -> ChartResult<()> {
        let _ = (filename, sink);
        Err(ChartError::Unsupported("download_image"))
    }
}
