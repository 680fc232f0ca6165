pub mod loader;
pub mod record;
pub mod repo;
pub mod stats;

pub use loader::{load_csv, parse_csv, DatasetError};
pub use record::{Dataset, FilmRecord};
pub use repo::{DatasetRepo, ReloadOutcome, Snapshot};
