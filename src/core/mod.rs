pub mod dataset;
pub mod mount;
pub mod scale;
pub mod types;

pub use dataset::{DataTable, Dataset, Record, format_cell};
pub use mount::{MountNode, MountPoint};
pub use scale::{BandScale, LinearScale};
pub use types::Viewport;
