use chart_playground::MarkChartBuilder;
use chart_playground::api::{
    ChartHandle, Playground, PlaygroundConfig, export_stem, reflect_dataset, reflect_title,
};
use chart_playground::core::Viewport;
use chart_playground::error::{ChartError, ChartResult};
use serde_json::{Value, json};

fn run(script: &str) -> Playground<MarkChartBuilder> {
    let mut playground = Playground::new(
        MarkChartBuilder::new(),
        PlaygroundConfig::new(Viewport::new(400, 300)),
    )
    .expect("playground init");
    playground.run(script).expect("script runs");
    playground
}

#[test]
fn constructor_data_is_reflected_exactly() {
    let playground = run(
        "let chart = Chart(#{ container: container, data: [#{ a: 1 }, #{ a: 2 }] });
        chart",
    );

    let records = playground.dataset().records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["a"], json!(1));
    assert_eq!(records[1]["a"], json!(2));
}

#[test]
fn mark_level_data_is_found_through_the_accessor() {
    let playground = run(
        r#"
        let chart = Chart(#{ container: container });
        chart
            .line()
            .data([#{ x: 1, y: 2 }, #{ x: 2, y: 3 }, #{ x: 3, y: 5 }])
            .encode("x", "x")
            .encode("y", "y");
        chart.render();
        chart
        "#,
    );
    assert_eq!(playground.dataset().len(), 3);
    assert_eq!(playground.data_table().columns, ["x", "y"]);
}

#[test]
fn title_symbols_are_dropped_from_the_export_stem() {
    let playground = run(
        r##"
        let chart = Chart(#{ container: container });
        chart.title(#{ title: "Q3 #1 revenue", align: "left" });
        chart
        "##,
    );
    let chart = playground.current_handle().expect("chart");

    assert_eq!(reflect_title(&chart).as_deref(), Some("Q3 #1 revenue"));
    let stem = playground.export_stem();
    assert_eq!(stem, "Q3 1 revenue");
    assert!(!stem.contains('#'));
}

#[test]
fn untitled_charts_use_the_configured_default() {
    let mut playground = Playground::new(
        MarkChartBuilder::new(),
        PlaygroundConfig::new(Viewport::new(200, 200)).with_default_title("sales"),
    )
    .expect("playground init");
    assert_eq!(playground.export_stem(), "sales");

    playground
        .run("let chart = Chart(#{ container: container }); chart")
        .expect("script runs");
    assert_eq!(playground.export_stem(), "sales");
}

#[test]
fn cjk_titles_survive_sanitization() {
    let playground =
        run("let chart = Chart(#{ container: container }); chart.title(\"销售 报表!\"); chart");
    assert_eq!(playground.export_stem(), "销售 报表");
}

/// A chart that only exposes its title through an arbitrary property.
struct PropertyOnlyChart;

impl ChartHandle for PropertyOnlyChart {
    fn render(&self) -> ChartResult<()> {
        Ok(())
    }

    fn destroy(&self) {}

    fn is_destroyed(&self) -> bool {
        false
    }

    fn get_options(&self) -> ChartResult<Value> {
        Err(ChartError::Backend("options are not ready".to_owned()))
    }

    fn get_data(&self) -> ChartResult<Value> {
        Ok(json!("not records"))
    }

    fn properties(&self) -> Vec<(String, Value)> {
        vec![
            ("width".to_owned(), json!(300)),
            ("axis".to_owned(), json!({ "title": 7 })),
            ("legendComponent".to_owned(), json!({ "title": "Legend: top-5" })),
        ]
    }
}

#[test]
fn property_scan_is_the_last_resort() {
    let handle = PropertyOnlyChart;
    assert!(reflect_dataset(&handle).is_empty());
    assert_eq!(reflect_title(&handle).as_deref(), Some("Legend: top-5"));
    assert_eq!(export_stem(&handle, "chart"), "Legend top-5");
}
