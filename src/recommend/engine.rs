use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

use super::similarity::{SimilarActor, SimilarityModel};
use super::RecommendError;
use crate::config::RecommendConfig;
use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedFilm {
    pub film: String,
    pub actor: String,
    pub year: Option<i32>,
    pub rating: f64,
    pub votes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub actor: String,
    pub filmography: Vec<String>,
    pub similar_actors: Vec<SimilarActor>,
    pub films: Vec<RecommendedFilm>,
}

pub fn recommend(
    dataset: &Dataset,
    model: &SimilarityModel,
    actor: &str,
    options: &RecommendConfig,
) -> Result<Recommendation, RecommendError> {
    let similar_actors = model.similar_to(actor, options.similar_actors)?;
    let filmography = dataset.filmography(actor, options.filmography_limit);
    let films = films_from_actors(dataset, &similar_actors, options.recommended_films);

    debug!(
        "Recommendation for {}: {} similar actors, {} films",
        actor,
        similar_actors.len(),
        films.len()
    );

    Ok(Recommendation {
        actor: actor.to_string(),
        filmography,
        similar_actors,
        films,
    })
}

/// Every row played by one of `actors`, best rated first, one row per film title.
fn films_from_actors(dataset: &Dataset, actors: &[SimilarActor], limit: usize) -> Vec<RecommendedFilm> {
    let wanted: HashSet<&str> = actors.iter().map(|a| a.actor.as_str()).collect();

    let mut rows: Vec<_> = dataset
        .records
        .iter()
        .filter(|r| wanted.contains(r.actor.as_str()))
        .collect();

    // Stable, so equally rated rows keep table order.
    rows.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));

    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert(r.film.as_str()))
        .take(limit)
        .map(|r| RecommendedFilm {
            film: r.film.clone(),
            actor: r.actor.clone(),
            year: r.year,
            rating: r.rating,
            votes: r.votes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::FilmRecord;
    use std::path::PathBuf;

    fn sample() -> Dataset {
        let rows = [
            ("Keanu Reeves", "The Matrix", 8.7),
            ("Keanu Reeves", "The Matrix Reloaded", 7.2),
            ("Keanu Reeves", "Speed", 7.2),
            ("Carrie-Anne Moss", "The Matrix", 8.7),
            ("Carrie-Anne Moss", "The Matrix Reloaded", 7.2),
            ("Carrie-Anne Moss", "Memento", 8.4),
            ("Laurence Fishburne", "The Matrix", 8.7),
            ("Laurence Fishburne", "Event Horizon", 6.7),
            ("Sandra Bullock", "Speed", 7.2),
            ("Sandra Bullock", "Gravity", 7.7),
            ("Meryl Streep", "Doubt", 7.5),
        ];
        let records = rows
            .iter()
            .map(|(a, f, r)| FilmRecord::new(a, f, Some(2000), Some(100), *r))
            .collect();
        Dataset::new(PathBuf::new(), String::new(), records)
    }

    #[test]
    fn test_recommend() {
        let ds = sample();
        let model = SimilarityModel::build(&ds);
        let options = RecommendConfig {
            similar_actors: 2,
            recommended_films: 10,
            filmography_limit: 2,
        };

        let rec = recommend(&ds, &model, "Keanu Reeves", &options).unwrap();
        assert_eq!(rec.actor, "Keanu Reeves");
        assert_eq!(rec.filmography, vec!["The Matrix", "The Matrix Reloaded"]);

        let similar: Vec<&str> = rec.similar_actors.iter().map(|s| s.actor.as_str()).collect();
        assert_eq!(similar, vec!["Carrie-Anne Moss", "Laurence Fishburne"]);

        let films: Vec<&str> = rec.films.iter().map(|f| f.film.as_str()).collect();
        assert_eq!(
            films,
            vec!["The Matrix", "Memento", "The Matrix Reloaded", "Event Horizon"]
        );
        // The first occurrence in table order survives deduplication.
        assert_eq!(rec.films[0].actor, "Carrie-Anne Moss");
    }

    #[test]
    fn test_film_limit() {
        let ds = sample();
        let model = SimilarityModel::build(&ds);
        let options = RecommendConfig {
            similar_actors: 5,
            recommended_films: 3,
            filmography_limit: 15,
        };
        let rec = recommend(&ds, &model, "Keanu Reeves", &options).unwrap();
        assert_eq!(rec.films.len(), 3);
        assert!(rec.films.windows(2).all(|w| w[0].rating >= w[1].rating));
        let unique: HashSet<&str> = rec.films.iter().map(|f| f.film.as_str()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_unknown_actor() {
        let ds = sample();
        let model = SimilarityModel::build(&ds);
        let result = recommend(&ds, &model, "Nobody", &RecommendConfig::default());
        assert!(matches!(result, Err(RecommendError::UnknownActor(name)) if name == "Nobody"));
    }
}
