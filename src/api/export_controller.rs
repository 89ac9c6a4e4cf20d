use tracing::debug;

use super::export::export_chart;
use super::reflector::{export_stem, sanitize_title};
use super::{ChartBuilder, DownloadSink, ExportOutcome, Playground, PlaygroundEvent};

impl<B: ChartBuilder> Playground<B> {
    /// File stem an export would use right now.
    #[must_use]
    pub fn export_stem(&self) -> String {
        match self.current_handle() {
            Some(handle) => export_stem(&handle, &self.config.default_title),
            None => sanitize_title(&self.config.default_title),
        }
    }

    /// Saves the rendered chart as `<title>.png` into `sink`.
    ///
    /// Export problems never reach the view's error slot; they are logged
    /// and reported through the returned outcome only.
    pub fn export_image(&mut self, sink: &mut dyn DownloadSink) -> ExportOutcome {
        let Some(handle) = self.current_handle() else {
            debug!("export requested without a live chart");
            return ExportOutcome::NoChart;
        };
        let stem = export_stem(&handle, &self.config.default_title);
        let outcome = export_chart(&handle, &self.mount, &stem, sink);
        match &outcome {
            ExportOutcome::Saved { filename } => {
                let filename = filename.clone();
                self.emit_event(PlaygroundEvent::ImageExported {
                    filename,
                    fallback: false,
                });
            }
            ExportOutcome::FallbackSaved { filename } => {
                let filename = filename.clone();
                self.emit_event(PlaygroundEvent::ImageExported {
                    filename,
                    fallback: true,
                });
            }
            ExportOutcome::NoChart | ExportOutcome::NoSurface | ExportOutcome::Failed => {}
        }
        outcome
    }
}
