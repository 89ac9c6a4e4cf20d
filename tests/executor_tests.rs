use chart_playground::api::ChartHandle;
use chart_playground::core::{MountPoint, Viewport};
use chart_playground::script::{
    ExecutorConfig, INVALID_CHART_INSTANCE, MISSING_CHART_BINDING, SandboxedExecutor,
    ScriptFunction,
};
use chart_playground::{ExecutionErrorKind, MarkChartBuilder};
use rhai::Engine;

fn executor() -> (SandboxedExecutor<MarkChartBuilder>, MarkChartBuilder) {
    let builder = MarkChartBuilder::new();
    (
        SandboxedExecutor::new(builder.clone(), ExecutorConfig::default()),
        builder,
    )
}

fn mount() -> MountPoint {
    MountPoint::new(Viewport::new(320, 240))
}

#[test]
fn chart_binding_is_returned_when_script_falls_off_the_end() {
    let (executor, _builder) = executor();
    let chart = executor
        .execute("let chart = Chart(#{ container: container });", &mount())
        .expect("chart returned");
    assert!(chart.is_attached());
    assert!(!chart.is_destroyed());
}

#[test]
fn explicit_return_wins_over_the_epilogue() {
    let (executor, builder) = executor();
    let chart = executor
        .execute(
            "let chart = Chart(); let other = Chart(#{ container: container }); return other;",
            &mount(),
        )
        .expect("returned chart");
    assert!(chart.is_attached());
    assert_eq!(builder.live_instances(), 1);
}

#[test]
fn falsy_and_foreign_results_are_contract_violations() {
    let (executor, builder) = executor();
    for script in [
        "let chart = ();",
        "let chart = false;",
        "let chart = 0;",
        "let chart = \"\";",
        "let chart = #{ render: 1 };",
        "let chart = Chart(); chart.destroy(); chart",
    ] {
        let err = executor.execute(script, &mount()).expect_err(script);
        assert_eq!(err.kind(), ExecutionErrorKind::ContractViolation, "{script}");
        assert_eq!(err.message(), INVALID_CHART_INSTANCE, "{script}");
    }
    assert_eq!(builder.live_instances(), 0);
}

#[test]
fn missing_binding_reports_the_instructive_message() {
    let (executor, _builder) = executor();
    let err = executor
        .execute("let c = 1 + 1;", &mount())
        .expect_err("no chart binding");
    assert_eq!(err.kind(), ExecutionErrorKind::ContractViolation);
    assert_eq!(err.message(), MISSING_CHART_BINDING);
}

#[test]
fn thrown_strings_surface_verbatim() {
    let (executor, _builder) = executor();
    let err = executor
        .execute("throw \"invalid encoding\";", &mount())
        .expect_err("thrown");
    assert_eq!(err.kind(), ExecutionErrorKind::Runtime);
    assert_eq!(err.message(), "invalid encoding");
}

#[test]
fn builder_errors_are_runtime_failures() {
    let (executor, builder) = executor();
    let err = executor
        .execute(
            "let chart = Chart(#{ container: \"#root\" }); chart",
            &mount(),
        )
        .expect_err("string container");
    assert_eq!(err.kind(), ExecutionErrorKind::Runtime);
    assert!(err.message().contains("container"));
    assert_eq!(builder.created_instances(), 0);

    let err = executor
        .execute(
            "let chart = Chart(); chart.title(42); chart",
            &mount(),
        )
        .expect_err("numeric title");
    assert_eq!(err.kind(), ExecutionErrorKind::Runtime);
    assert!(err.message().contains("title"));
    assert_eq!(builder.live_instances(), 0);
}

#[test]
fn errors_inside_script_functions_are_unwrapped() {
    let (executor, _builder) = executor();
    let err = executor
        .execute("fn build() { throw \"nested failure\"; } let chart = build();", &mount())
        .expect_err("thrown from function");
    assert_eq!(err.message(), "nested failure");
}

#[test]
fn renamed_parameters_are_injected() {
    let builder = MarkChartBuilder::new();
    let config = ExecutorConfig::default()
        .with_mount_param("host")
        .with_builder_param("Plot");
    let executor = SandboxedExecutor::new(builder, config);

    let chart = executor
        .execute("let chart = Plot(#{ container: host }); chart", &mount())
        .expect("renamed bindings");
    assert!(chart.is_attached());

    let err = executor
        .execute("let chart = Chart(); chart", &mount())
        .expect_err("default constructor name is not installed");
    assert_eq!(err.kind(), ExecutionErrorKind::Runtime);
}

#[test]
fn mount_point_is_read_only_inside_scripts() {
    let (executor, _builder) = executor();
    let err = executor
        .execute("container = 1; let chart = Chart(); chart", &mount())
        .expect_err("assign to constant");
    assert_eq!(err.kind(), ExecutionErrorKind::Runtime);
}

#[test]
fn operation_budget_stops_runaway_scripts() {
    let config = ExecutorConfig::default().with_max_operations(Some(10_000));
    let executor = SandboxedExecutor::new(MarkChartBuilder::new(), config);
    let err = executor
        .execute("loop { } let chart = Chart(); chart", &mount())
        .expect_err("budget exceeded");
    assert_eq!(err.kind(), ExecutionErrorKind::Runtime);
}

#[test]
fn script_function_compiles_once_and_runs_many_times() {
    let engine = Engine::new();
    let function = ScriptFunction::compile(&engine, "container", "let chart = 7;")
        .expect("compiles");
    assert_eq!(function.mount_param(), "container");

    for _ in 0..2 {
        let value = function.invoke(&engine, mount()).expect("runs");
        assert_eq!(value.as_int(), Ok(7));
    }

    let err = ScriptFunction::compile(&engine, "container", "let = ;").expect_err("parse error");
    assert_eq!(err.kind(), ExecutionErrorKind::Compilation);
}
