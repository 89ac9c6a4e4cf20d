//! Runs every bundled sample headlessly and writes each chart as a PNG.
//!
//! `cargo run --example headless_export -- [output-dir]`

use std::env;
use std::path::PathBuf;

use chart_playground::api::{DirectorySink, ExportOutcome, Playground, PlaygroundConfig};
use chart_playground::core::Viewport;
use chart_playground::samples::SAMPLES;
use chart_playground::{MarkChartBuilder, telemetry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = telemetry::init_default_tracing();

    let out_dir = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("chart-playground"));
    std::fs::create_dir_all(&out_dir)?;

    let mut playground = Playground::new(
        MarkChartBuilder::new(),
        PlaygroundConfig::new(Viewport::new(800, 480)),
    )?;
    let mut sink = DirectorySink::new(&out_dir);

    for sample in &SAMPLES {
        if let Err(err) = playground.run(sample.script) {
            eprintln!("{}: {err}", sample.name);
            continue;
        }
        playground.flush_deferred();
        match playground.export_image(&mut sink) {
            ExportOutcome::Saved { filename } | ExportOutcome::FallbackSaved { filename } => {
                println!(
                    "{:<8} {} ({})",
                    sample.name,
                    out_dir.join(filename).display(),
                    playground.data_table().summary()
                );
            }
            other => eprintln!("{}: export skipped: {other:?}", sample.name),
        }
    }

    playground.clear();
    Ok(())
}
