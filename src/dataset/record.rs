use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// One row of the actor/film table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmRecord {
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    pub film: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub film_id: Option<String>,
    pub year: Option<i32>,
    pub votes: Option<u64>,
    pub rating: f64,
}

impl FilmRecord {
    pub fn new(actor: &str, film: &str, year: Option<i32>, votes: Option<u64>, rating: f64) -> Self {
        Self {
            actor: actor.to_string(),
            actor_id: None,
            film: film.to_string(),
            film_id: None,
            year,
            votes,
            rating,
        }
    }
}

/// The loaded table. Row order is the order of the source file.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub records: Vec<FilmRecord>,
    /// Rows dropped during loading (missing or unparseable required fields).
    pub skipped: usize,
}

impl Dataset {
    pub fn new(source: PathBuf, fingerprint: String, records: Vec<FilmRecord>) -> Self {
        Self {
            source,
            fingerprint,
            loaded_at: Utc::now(),
            records,
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique actor names.
    pub fn actors(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.actor.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Sorted unique film titles.
    pub fn films(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.film.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn records_for_actor<'a>(&'a self, actor: &'a str) -> impl Iterator<Item = &'a FilmRecord> + 'a {
        self.records.iter().filter(move |r| r.actor == actor)
    }

    pub fn records_for_film<'a>(&'a self, film: &'a str) -> impl Iterator<Item = &'a FilmRecord> + 'a {
        self.records.iter().filter(move |r| r.film == film)
    }

    /// The actor's film titles in table order, at most `limit` of them.
    pub fn filmography(&self, actor: &str, limit: usize) -> Vec<String> {
        self.records_for_actor(actor)
            .take(limit)
            .map(|r| r.film.clone())
            .collect()
    }
}
