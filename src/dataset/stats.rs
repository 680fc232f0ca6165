//! Aggregate views over the table, backing the dataset pages of the dashboard.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::record::Dataset;

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
pub const MAX_HISTOGRAM_BINS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmRow {
    pub film: String,
    pub year: Option<i32>,
    pub rating: f64,
    pub votes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmActor {
    pub actor: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub actor: String,
    pub film_count: usize,
    pub mean_rating: f64,
    pub total_votes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorFilm {
    pub film: String,
    pub year: Option<i32>,
    pub rating: f64,
}

fn by_rating_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Unique (film, year, rating, votes) rows in first-seen order.
pub fn film_table(dataset: &Dataset) -> Vec<FilmRow> {
    let mut seen = HashSet::new();
    dataset
        .records
        .iter()
        .filter(|r| seen.insert((r.film.as_str(), r.year, r.rating.to_bits(), r.votes)))
        .map(|r| FilmRow {
            film: r.film.clone(),
            year: r.year,
            rating: r.rating,
            votes: r.votes,
        })
        .collect()
}

/// Equal-width histogram of every row's rating. The last bin includes its upper edge.
/// `bins` is capped at `MAX_HISTOGRAM_BINS`.
pub fn rating_histogram(dataset: &Dataset, bins: usize) -> Vec<HistogramBin> {
    let bins = bins.min(MAX_HISTOGRAM_BINS);
    let ratings: Vec<f64> = dataset.records.iter().map(|r| r.rating).collect();
    if ratings.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: ratings.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for rating in ratings {
        let idx = (((rating - min) / width).floor() as usize).min(bins - 1);
        histogram[idx].count += 1;
    }

    histogram
}

/// Row count per year, ascending. Rows without a year are not counted.
pub fn films_per_year(dataset: &Dataset) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in dataset.records.iter().filter_map(|r| r.year) {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

pub fn top_films(dataset: &Dataset, limit: usize) -> Vec<FilmRow> {
    let mut films = film_table(dataset);
    films.sort_by(|a, b| by_rating_desc(a.rating, b.rating));
    films.truncate(limit);
    films
}

/// Actors appearing in a film, highest rating first. `None` if the film is unknown.
pub fn film_detail(dataset: &Dataset, film: &str) -> Option<Vec<FilmActor>> {
    let mut actors: Vec<FilmActor> = dataset
        .records_for_film(film)
        .map(|r| FilmActor {
            actor: r.actor.clone(),
            rating: r.rating,
        })
        .collect();

    if actors.is_empty() {
        return None;
    }

    actors.sort_by(|a, b| by_rating_desc(a.rating, b.rating));
    Some(actors)
}

/// Per-actor film count, mean rating and total votes, ordered by actor name.
pub fn actor_summary(dataset: &Dataset) -> Vec<ActorSummary> {
    let mut acc: BTreeMap<&str, (usize, f64, u64)> = BTreeMap::new();
    for r in &dataset.records {
        let entry = acc.entry(r.actor.as_str()).or_insert((0, 0.0, 0));
        entry.0 += 1;
        entry.1 += r.rating;
        entry.2 = entry.2.saturating_add(r.votes.unwrap_or(0));
    }

    acc.into_iter()
        .map(|(actor, (count, sum, votes))| ActorSummary {
            actor: actor.to_string(),
            film_count: count,
            mean_rating: sum / count as f64,
            total_votes: votes,
        })
        .collect()
}

pub fn top_actors(dataset: &Dataset, limit: usize) -> Vec<ActorSummary> {
    let mut actors = actor_summary(dataset);
    actors.sort_by(|a, b| by_rating_desc(a.mean_rating, b.mean_rating));
    actors.truncate(limit);
    actors
}

/// Unique (film, year, rating) rows of one actor. `None` if the actor is unknown.
pub fn actor_detail(dataset: &Dataset, actor: &str) -> Option<Vec<ActorFilm>> {
    let mut seen = HashSet::new();
    let films: Vec<ActorFilm> = dataset
        .records_for_actor(actor)
        .filter(|r| seen.insert((r.film.as_str(), r.year, r.rating.to_bits())))
        .map(|r| ActorFilm {
            film: r.film.clone(),
            year: r.year,
            rating: r.rating,
        })
        .collect();

    if films.is_empty() {
        None
    } else {
        Some(films)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FilmRecord;
    use std::path::PathBuf;

    fn sample() -> Dataset {
        let records = vec![
            FilmRecord::new("Al Pacino", "Heat", Some(1995), Some(600), 8.3),
            FilmRecord::new("Robert De Niro", "Heat", Some(1995), Some(600), 8.3),
            FilmRecord::new("Al Pacino", "Scarface", Some(1983), Some(800), 8.3),
            FilmRecord::new("Al Pacino", "Jack and Jill", Some(2011), Some(80), 3.3),
            FilmRecord::new("Robert De Niro", "Taxi Driver", Some(1976), Some(850), 8.2),
            FilmRecord::new("Robert De Niro", "Dirty Grandpa", None, None, 5.9),
        ];
        Dataset::new(PathBuf::from("test.csv"), String::new(), records)
    }

    #[test]
    fn test_film_table_dedups() {
        let table = film_table(&sample());
        assert_eq!(table.len(), 5);
        assert_eq!(table[0].film, "Heat");
        assert_eq!(table[1].film, "Scarface");
    }

    #[test]
    fn test_rating_histogram() {
        let hist = rating_histogram(&sample(), 5);
        assert_eq!(hist.len(), 5);
        assert_eq!(hist[0].start, 3.3);
        assert_eq!(hist[4].end, 8.3);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 6);
        assert_eq!(hist[0].count, 1);
        // 8.2 and both 8.3 ratings land in the last, right-closed bin.
        assert_eq!(hist[4].count, 4);
    }

    #[test]
    fn test_rating_histogram_degenerate() {
        let empty = Dataset::new(PathBuf::new(), String::new(), Vec::new());
        assert!(rating_histogram(&empty, 20).is_empty());

        let flat = Dataset::new(
            PathBuf::new(),
            String::new(),
            vec![
                FilmRecord::new("A", "X", None, None, 7.0),
                FilmRecord::new("B", "Y", None, None, 7.0),
            ],
        );
        let hist = rating_histogram(&flat, 20);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist[0].count, 2);
    }

    #[test]
    fn test_rating_histogram_bins_capped() {
        let hist = rating_histogram(&sample(), usize::MAX);
        assert_eq!(hist.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(hist.iter().map(|b| b.count).sum::<usize>(), 6);
    }

    #[test]
    fn test_films_per_year() {
        let years = films_per_year(&sample());
        assert_eq!(
            years,
            vec![
                YearCount { year: 1976, count: 1 },
                YearCount { year: 1983, count: 1 },
                YearCount { year: 1995, count: 2 },
                YearCount { year: 2011, count: 1 },
            ]
        );
    }

    #[test]
    fn test_top_films_stable() {
        let top = top_films(&sample(), 3);
        let names: Vec<&str> = top.iter().map(|f| f.film.as_str()).collect();
        assert_eq!(names, vec!["Heat", "Scarface", "Taxi Driver"]);
    }

    #[test]
    fn test_film_detail() {
        let ds = sample();
        let detail = film_detail(&ds, "Heat").unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0].actor, "Al Pacino");
        assert!(film_detail(&ds, "Unknown").is_none());
    }

    #[test]
    fn test_actor_summary() {
        let summary = actor_summary(&sample());
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].actor, "Al Pacino");
        assert_eq!(summary[0].film_count, 3);
        assert!((summary[0].mean_rating - 19.9 / 3.0).abs() < 1e-9);
        assert_eq!(summary[0].total_votes, 1480);
        assert_eq!(summary[1].total_votes, 1450);
    }

    #[test]
    fn test_actor_summary_votes_saturate() {
        let ds = Dataset::new(
            PathBuf::new(),
            String::new(),
            vec![
                FilmRecord::new("A", "X", None, Some(u64::MAX), 7.0),
                FilmRecord::new("A", "Y", None, Some(u64::MAX), 8.0),
            ],
        );
        let summary = actor_summary(&ds);
        assert_eq!(summary[0].total_votes, u64::MAX);
        assert_eq!(summary[0].film_count, 2);
    }

    #[test]
    fn test_top_actors() {
        let top = top_actors(&sample(), 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].actor, "Robert De Niro");
    }

    #[test]
    fn test_actor_detail() {
        let ds = sample();
        let detail = actor_detail(&ds, "Robert De Niro").unwrap();
        assert_eq!(detail.len(), 3);
        assert_eq!(detail[2].year, None);
        assert!(actor_detail(&ds, "Nobody").is_none());
    }
}
