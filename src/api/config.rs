use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::script::{ExecutorConfig, RESULT_BINDING};

use super::reflector::{DEFAULT_EXPORT_TITLE, sanitize_title};

pub const PLAYGROUND_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Delay between adopting a chart and fitting it to its mount point.
pub const DEFAULT_REFIT_DELAY_MS: u64 = 100;

/// Public playground bootstrap configuration.
///
/// Serializable so hosts can persist and reload their setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    pub mount_viewport: Viewport,
    #[serde(default = "default_refit_delay_ms")]
    pub refit_delay_ms: u64,
    /// Export stem used when the chart has no title.
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaygroundConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: PlaygroundConfig,
}

impl PlaygroundConfig {
    #[must_use]
    pub fn new(mount_viewport: Viewport) -> Self {
        Self {
            mount_viewport,
            refit_delay_ms: DEFAULT_REFIT_DELAY_MS,
            default_title: default_title(),
            executor: ExecutorConfig::default(),
        }
    }

    #[must_use]
    pub fn with_refit_delay_ms(mut self, delay_ms: u64) -> Self {
        self.refit_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = title.into();
        self
    }

    #[must_use]
    pub fn with_executor(mut self, executor: ExecutorConfig) -> Self {
        self.executor = executor;
        self
    }

    #[must_use]
    pub fn refit_delay(&self) -> Duration {
        Duration::from_millis(self.refit_delay_ms)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.mount_viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.mount_viewport.width,
                height: self.mount_viewport.height,
            });
        }
        if sanitize_title(&self.default_title) != self.default_title {
            return Err(ChartError::InvalidData(format!(
                "default title `{}` is not a valid file stem",
                self.default_title
            )));
        }

        let executor = &self.executor;
        for (role, name) in [
            ("mount", executor.mount_param.as_str()),
            ("builder", executor.builder_param.as_str()),
        ] {
            if !is_identifier(name) {
                return Err(ChartError::InvalidData(format!(
                    "{role} parameter `{name}` is not a script identifier"
                )));
            }
            if name == RESULT_BINDING {
                return Err(ChartError::InvalidData(format!(
                    "{role} parameter must not shadow the `{RESULT_BINDING}` result binding"
                )));
            }
        }
        if executor.mount_param == executor.builder_param {
            return Err(ChartError::InvalidData(
                "mount and builder parameters must differ".to_owned(),
            ));
        }
        if executor.max_call_levels == 0 || executor.max_expr_depth == 0 {
            return Err(ChartError::InvalidData(
                "script call and expression depth limits must be > 0".to_owned(),
            ));
        }
        if executor.max_operations == Some(0) {
            return Err(ChartError::InvalidData(
                "operation budget must be > 0 when set".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize playground config: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = PlaygroundConfigJsonContractV1 {
            schema_version: PLAYGROUND_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!(
                "failed to serialize playground config contract v1: {e}"
            ))
        })
    }

    /// Accepts either a bare config or a versioned v1 contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(config) = serde_json::from_str::<PlaygroundConfig>(input) {
            return Ok(config);
        }
        let payload: PlaygroundConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse playground config json payload: {e}"))
        })?;
        if payload.schema_version != PLAYGROUND_CONFIG_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported playground config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

fn default_refit_delay_ms() -> u64 {
    DEFAULT_REFIT_DELAY_MS
}

fn default_title() -> String {
    DEFAULT_EXPORT_TITLE.to_owned()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
