//! Script-side pipeline: textual normalization, sandboxed execution and the
//! editor surface scripts are read from.

pub mod editor;
pub mod executor;
pub mod normalizer;

pub use editor::{EditorSurface, ListenerId, ScriptBuffer};
pub use executor::{
    ExecutorConfig, INVALID_CHART_INSTANCE, MISSING_CHART_BINDING, SandboxedExecutor,
    ScriptFunction,
};
pub use normalizer::{AUTO_FIT_DIRECTIVE, normalize, normalize_with};

/// Name the mount point is injected under.
pub const DEFAULT_MOUNT_PARAM: &str = "container";
/// Name of the chart constructor visible to scripts.
pub const DEFAULT_BUILDER_PARAM: &str = "Chart";
/// Binding a script must leave its chart in.
pub const RESULT_BINDING: &str = "chart";
/// `tracing` target carrying script `print`/`debug` output.
pub const SCRIPT_LOG_TARGET: &str = "chart_playground::script";
