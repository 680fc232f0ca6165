use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::loader::{fingerprint, load_csv, parse_csv, DatasetError};
use super::record::Dataset;
use crate::recommend::SimilarityModel;

/// A loaded table together with the similarity model derived from it.
pub struct Snapshot {
    pub dataset: Dataset,
    pub model: SimilarityModel,
}

impl Snapshot {
    pub fn new(dataset: Dataset) -> Self {
        let model = SimilarityModel::build(&dataset);
        Self { dataset, model }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded,
    Unchanged,
}

pub struct DatasetRepo {
    path: PathBuf,
    current: ArcSwap<Snapshot>,
}

impl DatasetRepo {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatasetError> {
        let path = path.into();
        let snapshot = Snapshot::new(load_csv(&path)?);
        info!(
            "Loaded {} rows, {} actors from {}",
            snapshot.dataset.len(),
            snapshot.model.len(),
            path.display()
        );

        Ok(Self {
            path,
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            path: dataset.source.clone(),
            current: ArcSwap::from_pointee(Snapshot::new(dataset)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Re-read the CSV file. The model is rebuilt only if the content changed
    /// or `force` is set. On error the current snapshot stays in place.
    pub fn reload(&self, force: bool) -> Result<ReloadOutcome, DatasetError> {
        let bytes = std::fs::read(&self.path).map_err(|e| DatasetError::Read(self.path.clone(), e))?;
        if !force && fingerprint(&bytes) == self.current.load().dataset.fingerprint {
            return Ok(ReloadOutcome::Unchanged);
        }

        let mut dataset = parse_csv(&bytes)?;
        dataset.source = self.path.clone();
        let snapshot = Snapshot::new(dataset);
        info!(
            "Reloaded {}: {} rows, {} actors",
            self.path.display(),
            snapshot.dataset.len(),
            snapshot.model.len()
        );
        self.current.store(Arc::new(snapshot));
        Ok(ReloadOutcome::Reloaded)
    }

    pub fn start_background_reload(self: Arc<Self>, interval_secs: u64) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
            // The first tick fires immediately; the file was just loaded.
            interval.tick().await;
            loop {
                interval.tick().await;
                let repo = self.clone();
                match tokio::task::spawn_blocking(move || repo.reload(false)).await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => error!("Background reload failed: {}", e),
                    Err(e) => error!("Background reload task panicked: {}", e),
                }
            }
        });
    }
}
