use rhai::{AST, Dynamic, Engine, EvalAltResult, Position, Scope};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::{ChartBuilder, ChartHandle, InstanceLedger};
use crate::core::MountPoint;
use crate::error::ExecutionError;

use super::{DEFAULT_BUILDER_PARAM, DEFAULT_MOUNT_PARAM, RESULT_BINDING, SCRIPT_LOG_TARGET};

pub const MISSING_CHART_BINDING: &str = "script must create and return a `chart` variable";
pub const INVALID_CHART_INSTANCE: &str = "script must return a valid chart instance";

const MISSING_BINDING_FN: &str = "__missing_chart_binding";

/// Limits and injected names for one executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_mount_param")]
    pub mount_param: String,
    #[serde(default = "default_builder_param")]
    pub builder_param: String,
    #[serde(default = "default_max_call_levels")]
    pub max_call_levels: usize,
    #[serde(default = "default_max_expr_depth")]
    pub max_expr_depth: usize,
    /// Operation budget per run. `None` leaves scripts unbounded.
    #[serde(default)]
    pub max_operations: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            mount_param: default_mount_param(),
            builder_param: default_builder_param(),
            max_call_levels: default_max_call_levels(),
            max_expr_depth: default_max_expr_depth(),
            max_operations: None,
        }
    }
}

impl ExecutorConfig {
    #[must_use]
    pub fn with_mount_param(mut self, name: impl Into<String>) -> Self {
        self.mount_param = name.into();
        self
    }

    #[must_use]
    pub fn with_builder_param(mut self, name: impl Into<String>) -> Self {
        self.builder_param = name.into();
        self
    }

    #[must_use]
    pub fn with_max_call_levels(mut self, levels: usize) -> Self {
        self.max_call_levels = levels;
        self
    }

    #[must_use]
    pub fn with_max_expr_depth(mut self, depth: usize) -> Self {
        self.max_expr_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_operations(mut self, operations: Option<u64>) -> Self {
        self.max_operations = operations;
        self
    }
}

fn default_mount_param() -> String {
    DEFAULT_MOUNT_PARAM.to_owned()
}

fn default_builder_param() -> String {
    DEFAULT_BUILDER_PARAM.to_owned()
}

fn default_max_call_levels() -> usize {
    64
}

fn default_max_expr_depth() -> usize {
    64
}

/// Raised by the epilogue when the script never bound `chart`.
#[derive(Debug, Clone, Copy)]
struct MissingChartBinding;

fn missing_chart_binding() -> Result<Dynamic, Box<EvalAltResult>> {
    Err(EvalAltResult::ErrorRuntime(Dynamic::from(MissingChartBinding), Position::NONE).into())
}

/// A user script compiled as the body of a function over the mount point.
///
/// The body is followed by an epilogue that yields the `chart` binding, so a
/// script that falls off its end returns whatever it left in `chart`. A
/// top-level `return` ends the script before the epilogue runs.
#[derive(Debug, Clone)]
pub struct ScriptFunction {
    ast: AST,
    mount_param: String,
}

impl ScriptFunction {
    pub fn compile(engine: &Engine, mount_param: &str, body: &str) -> Result<Self, ExecutionError> {
        let source = format!(
            "{body}\n;\nif is_def_var(\"{binding}\") {{ {binding} }} else {{ {missing}() }}",
            binding = RESULT_BINDING,
            missing = MISSING_BINDING_FN,
        );
        let ast = engine
            .compile(source)
            .map_err(|err| ExecutionError::Compilation(err.to_string()))?;
        Ok(Self {
            ast,
            mount_param: mount_param.to_owned(),
        })
    }

    #[must_use]
    pub fn mount_param(&self) -> &str {
        &self.mount_param
    }

    /// Runs the body with `mount` bound as a constant.
    pub fn invoke(&self, engine: &Engine, mount: MountPoint) -> Result<Dynamic, ExecutionError> {
        let mut scope = Scope::new();
        scope.push_constant(self.mount_param.as_str(), mount);
        engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map_err(|err| classify(&err))
    }
}

/// Executes scripts against a chart builder, one fresh engine per run.
#[derive(Debug)]
pub struct SandboxedExecutor<B: ChartBuilder> {
    builder: B,
    config: ExecutorConfig,
}

impl<B: ChartBuilder> SandboxedExecutor<B> {
    #[must_use]
    pub fn new(builder: B, config: ExecutorConfig) -> Self {
        Self { builder, config }
    }

    #[must_use]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Compiles and runs `source`, returning the chart it produced.
    ///
    /// Every chart the builder constructed during the run, other than the
    /// returned one, is destroyed before this returns. On failure all of them
    /// are.
    pub fn execute(&self, source: &str, mount: &MountPoint) -> Result<B::Handle, ExecutionError> {
        let ledger = InstanceLedger::new();
        let engine = self.engine(&ledger);

        let outcome = ScriptFunction::compile(&engine, &self.config.mount_param, source)
            .and_then(|function| function.invoke(&engine, mount.clone()))
            .and_then(accept_result::<B::Handle>);
        drop(engine);

        let orphans = ledger
            .drain()
            .into_iter()
            .filter(|handle| outcome.as_ref().map_or(true, |adopted| adopted != handle));
        let mut disposed = 0_usize;
        for orphan in orphans {
            if !orphan.is_destroyed() {
                orphan.destroy();
                disposed += 1;
            }
        }
        if disposed > 0 {
            debug!(disposed, "destroyed charts not returned by the script");
        }

        outcome
    }

    fn engine(&self, ledger: &InstanceLedger<B::Handle>) -> Engine {
        let mut engine = Engine::new();
        engine.set_max_call_levels(self.config.max_call_levels);
        engine.set_max_expr_depths(self.config.max_expr_depth, self.config.max_expr_depth);
        if let Some(operations) = self.config.max_operations {
            engine.set_max_operations(operations);
        }
        engine.on_print(|text| {
            tracing::info!(target: SCRIPT_LOG_TARGET, "{text}");
        });
        engine.on_debug(|text, source, position| {
            tracing::debug!(
                target: SCRIPT_LOG_TARGET,
                source = source.unwrap_or_default(),
                position = %position,
                "{text}"
            );
        });
        engine.register_fn(MISSING_BINDING_FN, missing_chart_binding);
        self.builder
            .install(&mut engine, &self.config.builder_param, ledger);
        engine
    }
}

fn accept_result<H: ChartHandle + Clone + 'static>(value: Dynamic) -> Result<H, ExecutionError> {
    let value = value.flatten();
    if is_falsy(&value) {
        trace!(type_name = value.type_name(), "script returned a falsy value");
        return Err(ExecutionError::ContractViolation(
            INVALID_CHART_INSTANCE.to_owned(),
        ));
    }
    let type_name = value.type_name();
    match value.try_cast::<H>() {
        Some(handle) if !handle.is_destroyed() => Ok(handle),
        Some(_) => {
            trace!("script returned a chart it already destroyed");
            Err(ExecutionError::ContractViolation(
                INVALID_CHART_INSTANCE.to_owned(),
            ))
        }
        None => {
            trace!(type_name, "script returned a value that is not a chart");
            Err(ExecutionError::ContractViolation(
                INVALID_CHART_INSTANCE.to_owned(),
            ))
        }
    }
}

fn is_falsy(value: &Dynamic) -> bool {
    value.is_unit()
        || value.as_bool().is_ok_and(|flag| !flag)
        || value.as_int().is_ok_and(|number| number == 0)
        || value
            .as_float()
            .is_ok_and(|number| number == 0.0 || number.is_nan())
        || value
            .clone()
            .into_immutable_string()
            .is_ok_and(|text| text.is_empty())
}

fn classify(err: &EvalAltResult) -> ExecutionError {
    let root = root_cause(err);
    match root {
        EvalAltResult::ErrorRuntime(value, _) if value.is::<MissingChartBinding>() => {
            ExecutionError::ContractViolation(MISSING_CHART_BINDING.to_owned())
        }
        EvalAltResult::ErrorRuntime(value, _) if value.is_string() => {
            ExecutionError::Runtime(value.to_string())
        }
        _ => ExecutionError::Runtime(err.to_string()),
    }
}

fn root_cause(err: &EvalAltResult) -> &EvalAltResult {
    match err {
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => root_cause(inner),
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rhai::Dynamic;
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Metadata, Subscriber};

    use super::{ExecutorConfig, SandboxedExecutor, is_falsy};
    use crate::charts::MarkChartBuilder;
    use crate::core::{MountPoint, Viewport};
    use crate::script::SCRIPT_LOG_TARGET;

    /// Collects `(target, level)` of every event.
    #[derive(Clone, Default)]
    struct EventTargets(Arc<Mutex<Vec<(String, tracing::Level)>>>);

    impl Subscriber for EventTargets {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _span: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _span: &Id, _values: &Record<'_>) {}

        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

        fn event(&self, event: &Event<'_>) {
            let metadata = event.metadata();
            self.0
                .lock()
                .expect("event log")
                .push((metadata.target().to_owned(), *metadata.level()));
        }

        fn enter(&self, _span: &Id) {}

        fn exit(&self, _span: &Id) {}
    }

    #[test]
    fn script_output_goes_to_the_script_target() {
        let events = EventTargets::default();
        let executor = SandboxedExecutor::new(MarkChartBuilder::new(), ExecutorConfig::default());
        let mount = MountPoint::new(Viewport::new(120, 80));

        let outcome = tracing::subscriber::with_default(events.clone(), || {
            executor.execute(
                "print(\"hello\"); debug(42); let chart = Chart(#{ container: container });",
                &mount,
            )
        });
        assert!(outcome.is_ok());

        let recorded = events.0.lock().expect("event log");
        let script_levels: Vec<tracing::Level> = recorded
            .iter()
            .filter(|(target, _)| target == SCRIPT_LOG_TARGET)
            .map(|(_, level)| *level)
            .collect();
        assert_eq!(script_levels, [tracing::Level::INFO, tracing::Level::DEBUG]);
    }

    #[test]
    fn falsy_values_match_script_truthiness() {
        assert!(is_falsy(&Dynamic::UNIT));
        assert!(is_falsy(&Dynamic::from(false)));
        assert!(is_falsy(&Dynamic::from(0_i64)));
        assert!(is_falsy(&Dynamic::from(0.0_f64)));
        assert!(is_falsy(&Dynamic::from(f64::NAN)));
        assert!(is_falsy(&Dynamic::from("")));

        assert!(!is_falsy(&Dynamic::from(true)));
        assert!(!is_falsy(&Dynamic::from(3_i64)));
        assert!(!is_falsy(&Dynamic::from("chart")));
        assert!(!is_falsy(&Dynamic::from(rhai::Map::new())));
    }
}
