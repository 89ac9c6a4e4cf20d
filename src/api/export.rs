use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tiny_skia::Pixmap;
use tracing::{debug, warn};

use crate::core::MountPoint;
use crate::error::{ChartError, ExportError};
use crate::render::flatten_on_white;

use super::ChartHandle;

/// Receives finished image files.
pub trait DownloadSink {
    fn save(&mut self, blob: &[u8], filename: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Keeps every saved file in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Vec<SavedFile>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn files(&self) -> &[SavedFile] {
        &self.files
    }

    #[must_use]
    pub fn last(&self) -> Option<&SavedFile> {
        self.files.last()
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, blob: &[u8], filename: &str) -> io::Result<()> {
        self.files.push(SavedFile {
            filename: filename.to_owned(),
            bytes: blob.to_vec(),
        });
        Ok(())
    }
}

/// Writes files into a directory, overwriting same-named files.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, blob: &[u8], filename: &str) -> io::Result<()> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty filename"))?;
        fs::write(self.root.join(name), blob)
    }
}

/// Result of one export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Mounted surface flattened, encoded and saved.
    Saved { filename: String },
    /// The primary path failed and the chart's own download succeeded.
    FallbackSaved { filename: String },
    /// Nothing is rendered.
    NoChart,
    /// A chart is live but has not painted a surface.
    NoSurface,
    /// Both paths failed.
    Failed,
}

impl ExportOutcome {
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Saved { filename } | Self::FallbackSaved { filename } => Some(filename),
            Self::NoChart | Self::NoSurface | Self::Failed => None,
        }
    }
}

/// Flattens `surface` onto opaque white and encodes it as PNG.
pub fn encode_surface_png(surface: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let flattened = flatten_on_white(surface).map_err(|err| match err {
        ChartError::InvalidViewport { width, height } => {
            ExportError::SurfaceAllocation { width, height }
        }
        other => ExportError::Chart(other),
    })?;
    flattened
        .encode_png()
        .map_err(|err| ExportError::Encode(err.to_string()))
}

fn save_surface(
    surface: &Pixmap,
    filename: &str,
    sink: &mut dyn DownloadSink,
) -> Result<(), ExportError> {
    let blob = encode_surface_png(surface)?;
    sink.save(&blob, filename).map_err(|source| ExportError::Sink {
        filename: filename.to_owned(),
        source,
    })?;
    debug!(filename, bytes = blob.len(), "saved chart image");
    Ok(())
}

/// Saves the first surface mounted in `mount` as `<stem>.png`, falling back
/// to the chart's own download once.
pub(crate) fn export_chart<H: ChartHandle + ?Sized>(
    handle: &H,
    mount: &MountPoint,
    stem: &str,
    sink: &mut dyn DownloadSink,
) -> ExportOutcome {
    let Some(surface) = mount.find_surface() else {
        debug!("no painted surface in mount point; nothing to export");
        return ExportOutcome::NoSurface;
    };
    let filename = format!("{stem}.png");

    let primary = match save_surface(&surface, &filename, sink) {
        Ok(()) => return ExportOutcome::Saved { filename },
        Err(err) => err,
    };
    warn!(error = %primary, filename, "surface export failed; trying chart download");

    match handle.download_image(&filename, sink) {
        Ok(()) => ExportOutcome::FallbackSaved { filename },
        Err(err) => {
            warn!(error = %err, filename, "chart download failed");
            ExportOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use tiny_skia::Pixmap;

    use super::{DirectorySink, DownloadSink, encode_surface_png};

    #[test]
    fn encoded_png_is_opaque() {
        let transparent = Pixmap::new(6, 4).expect("pixmap");
        let png = encode_surface_png(&transparent).expect("encode");
        let decoded = Pixmap::decode_png(&png).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (6, 4));
        assert!(decoded.pixels().iter().all(|pixel| pixel.alpha() == 255));
    }

    #[test]
    fn directory_sink_writes_only_the_file_name() {
        let root =
            std::env::temp_dir().join(format!("chart-playground-sink-{}", std::process::id()));
        std::fs::create_dir_all(&root).expect("temp dir");
        let mut sink = DirectorySink::new(&root);

        sink.save(b"png", "../escape/Sales.png").expect("save");
        assert_eq!(std::fs::read(root.join("Sales.png")).expect("read"), b"png");
        assert!(sink.save(b"png", "").is_err());

        std::fs::remove_dir_all(&root).expect("cleanup");
    }
}
