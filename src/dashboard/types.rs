use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::stats::{ActorFilm, FilmActor, HistogramBin};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub path: String,
    pub rows: usize,
    pub skipped_rows: usize,
    pub actors: usize,
    pub films: usize,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NameIdPair {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingHistogram {
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilmDetail {
    pub film: String,
    pub actors: Vec<FilmActor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorDetail {
    pub actor: String,
    pub films: Vec<ActorFilm>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadStatus {
    pub reloaded: bool,
    pub rows: usize,
    pub fingerprint: String,
}
