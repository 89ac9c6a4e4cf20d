use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Failures raised by the charting capability and its render backends.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("chart instance has been destroyed")]
    Destroyed,

    #[error("chart does not support `{0}`")]
    Unsupported(&'static str),

    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Classification of a failed script execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    Compilation,
    ContractViolation,
    Runtime,
}

/// Outcome of a failed run. All variants collapse into the same
/// user-visible error slot; the kind only matters to diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("{0}")]
    Compilation(String),

    #[error("{0}")]
    ContractViolation(String),

    #[error("{0}")]
    Runtime(String),
}

impl ExecutionError {
    #[must_use]
    pub fn kind(&self) -> ExecutionErrorKind {
        match self {
            Self::Compilation(_) => ExecutionErrorKind::Compilation,
            Self::ContractViolation(_) => ExecutionErrorKind::ContractViolation,
            Self::Runtime(_) => ExecutionErrorKind::Runtime,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Compilation(message)
            | Self::ContractViolation(message)
            | Self::Runtime(message) => message,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to allocate {width}x{height} export surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("failed to encode png: {0}")]
    Encode(String),

    #[error("download sink rejected `{filename}`: {source}")]
    Sink {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Chart(#[from] ChartError),
}
