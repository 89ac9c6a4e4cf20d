use chart_playground::api::{
    DEFAULT_REFIT_DELAY_MS, PLAYGROUND_CONFIG_JSON_SCHEMA_V1, Playground, PlaygroundConfig,
};
use chart_playground::core::Viewport;
use chart_playground::script::ExecutorConfig;
use chart_playground::{ChartError, MarkChartBuilder};

#[test]
fn defaults_match_the_documented_values() {
    let config = PlaygroundConfig::new(Viewport::new(800, 500));
    assert_eq!(config.refit_delay_ms, DEFAULT_REFIT_DELAY_MS);
    assert_eq!(config.refit_delay().as_millis(), 100);
    assert_eq!(config.default_title, "chart");
    assert_eq!(config.executor.mount_param, "container");
    assert_eq!(config.executor.builder_param, "Chart");
    assert_eq!(config.executor.max_operations, None);
    config.validate().expect("defaults are valid");
}

#[test]
fn contract_v1_round_trips() {
    let config = PlaygroundConfig::new(Viewport::new(1024, 600))
        .with_refit_delay_ms(250)
        .with_default_title("quarterly")
        .with_executor(ExecutorConfig::default().with_max_operations(Some(500_000)));

    let json = config.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains(&format!("\"schema_version\": {PLAYGROUND_CONFIG_JSON_SCHEMA_V1}")));
    let parsed = PlaygroundConfig::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(parsed, config);

    let bare = config.to_json_pretty().expect("serialize bare");
    assert_eq!(
        PlaygroundConfig::from_json_compat_str(&bare).expect("parse bare"),
        config
    );
}

#[test]
fn missing_fields_take_defaults() {
    let parsed = PlaygroundConfig::from_json_compat_str(
        r#"{ "mount_viewport": { "width": 320, "height": 200 } }"#,
    )
    .expect("minimal config");
    assert_eq!(parsed, PlaygroundConfig::new(Viewport::new(320, 200)));
}

#[test]
fn unknown_schema_versions_are_rejected() {
    let err = PlaygroundConfig::from_json_compat_str(
        r#"{ "schema_version": 9, "config": { "mount_viewport": { "width": 1, "height": 1 } } }"#,
    )
    .expect_err("future schema");
    assert!(matches!(err, ChartError::InvalidData(message) if message.contains("schema version")));
}

#[test]
fn invalid_configs_are_rejected_by_the_playground() {
    let cases = [
        PlaygroundConfig::new(Viewport::new(0, 300)),
        PlaygroundConfig::default().with_default_title("bad/name"),
        PlaygroundConfig::default()
            .with_executor(ExecutorConfig::default().with_mount_param("chart")),
        PlaygroundConfig::default()
            .with_executor(ExecutorConfig::default().with_builder_param("new chart")),
        PlaygroundConfig::default().with_executor(
            ExecutorConfig::default()
                .with_mount_param("Chart")
                .with_builder_param("Chart"),
        ),
        PlaygroundConfig::default()
            .with_executor(ExecutorConfig::default().with_max_call_levels(0)),
        PlaygroundConfig::default()
            .with_executor(ExecutorConfig::default().with_max_operations(Some(0))),
    ];

    for config in cases {
        assert!(
            Playground::new(MarkChartBuilder::new(), config.clone()).is_err(),
            "{config:?}"
        );
    }
}
