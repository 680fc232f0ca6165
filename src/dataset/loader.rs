use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::record::{Dataset, FilmRecord};

const COL_ACTOR: &str = "Actor";
const COL_ACTOR_ID: &str = "ActorID";
const COL_FILM: &str = "Film";
const COL_FILM_ID: &str = "FilmID";
const COL_YEAR: &str = "Year";
const COL_VOTES: &str = "Votes";
const COL_RATING: &str = "Rating";

/// Column positions resolved from the header row.
struct Columns {
    actor: usize,
    actor_id: Option<usize>,
    film: usize,
    film_id: Option<usize>,
    year: Option<usize>,
    votes: Option<usize>,
    rating: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| DatasetError::MissingColumn(name.to_string()));

        Ok(Self {
            actor: require(COL_ACTOR)?,
            actor_id: find(COL_ACTOR_ID),
            film: require(COL_FILM)?,
            film_id: find(COL_FILM_ID),
            year: find(COL_YEAR),
            votes: find(COL_VOTES),
            rating: require(COL_RATING)?,
        })
    }
}

pub fn load_csv(path: &Path) -> Result<Dataset, DatasetError> {
    let bytes = std::fs::read(path).map_err(|e| DatasetError::Read(path.to_path_buf(), e))?;
    let mut dataset = parse_csv(&bytes)?;
    dataset.source = path.to_path_buf();

    debug!(
        "Loaded {} rows from {} ({} skipped)",
        dataset.records.len(),
        path.display(),
        dataset.skipped
    );
    Ok(dataset)
}

pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Parse CSV content. Rows missing an actor, a film or a numeric rating are dropped.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let columns = Columns::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for (line, row) in reader.records().enumerate() {
        let row = row?;
        match parse_row(&row, &columns) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                if has_unparseable_rating(&row, &columns) {
                    warn!("Skipping row {}: invalid rating {:?}", line + 2, row.get(columns.rating));
                }
            }
        }
    }

    let mut dataset = Dataset::new(PathBuf::new(), fingerprint(bytes), records);
    dataset.skipped = skipped;
    Ok(dataset)
}

fn cell<'a>(row: &'a csv::StringRecord, idx: usize) -> Option<&'a str> {
    row.get(idx).filter(|s| !s.is_empty())
}

fn optional_cell(row: &csv::StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| cell(row, i))
}

fn parse_row(row: &csv::StringRecord, columns: &Columns) -> Option<FilmRecord> {
    let actor = cell(row, columns.actor)?;
    let film = cell(row, columns.film)?;
    let rating = cell(row, columns.rating)?.parse::<f64>().ok().filter(|r| r.is_finite())?;

    Some(FilmRecord {
        actor: actor.to_string(),
        actor_id: optional_cell(row, columns.actor_id).map(str::to_string),
        film: film.to_string(),
        film_id: optional_cell(row, columns.film_id).map(str::to_string),
        year: optional_cell(row, columns.year).and_then(parse_integer).and_then(|y| i32::try_from(y).ok()),
        votes: optional_cell(row, columns.votes).and_then(parse_integer).and_then(|v| u64::try_from(v).ok()),
        rating,
    })
}

fn has_unparseable_rating(row: &csv::StringRecord, columns: &Columns) -> bool {
    cell(row, columns.actor).is_some()
        && cell(row, columns.film).is_some()
        && cell(row, columns.rating).is_some()
}

/// Integers may be written as "1999" or, after a spreadsheet round-trip, "1999.0".
fn parse_integer(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Actor,ActorID,Film,Year,Votes,Rating,FilmID
Fred Astaire,nm0000001,Ghost Story,1981,7731,6.3,tt0082449
Fred Astaire,nm0000001,The Purple Taxi,1977,533,6.6,tt0076851
Lauren Bacall,nm0000002,The Big Sleep,1946,86000,7.9,tt0038355
Nobody,nm0000003,,1990,10,5.0,tt0000001
Lauren Bacall,nm0000002,Key Largo,1948,,,tt0040506
Lauren Bacall,nm0000002,Misery,1990.0,200000,n/a,tt0100157
";

    #[test]
    fn test_parse_csv() {
        let ds = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.records.len(), 3);
        assert_eq!(ds.skipped, 3);

        let first = &ds.records[0];
        assert_eq!(first.actor, "Fred Astaire");
        assert_eq!(first.actor_id.as_deref(), Some("nm0000001"));
        assert_eq!(first.film, "Ghost Story");
        assert_eq!(first.film_id.as_deref(), Some("tt0082449"));
        assert_eq!(first.year, Some(1981));
        assert_eq!(first.votes, Some(7731));
        assert_eq!(first.rating, 6.3);

        assert_eq!(ds.records[2].film, "The Big Sleep");
    }

    #[test]
    fn test_optional_columns() {
        let csv = "Film,Rating,Actor\nHeat,8.3,Al Pacino\n";
        let ds = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.records.len(), 1);
        assert_eq!(ds.records[0].actor, "Al Pacino");
        assert_eq!(ds.records[0].year, None);
        assert_eq!(ds.records[0].votes, None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Actor,Film,Year\nAl Pacino,Heat,1995\n";
        match parse_csv(csv.as_bytes()) {
            Err(DatasetError::MissingColumn(col)) => assert_eq!(col, "Rating"),
            other => panic!("unexpected result: {:?}", other.map(|d| d.records.len())),
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("1999"), Some(1999));
        assert_eq!(parse_integer("1999.0"), Some(1999));
        assert_eq!(parse_integer("1999.5"), None);
        assert_eq!(parse_integer("abc"), None);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint(b"abc"), fingerprint(b"abc"));
        assert_ne!(fingerprint(b"abc"), fingerprint(b"abd"));
        assert_eq!(fingerprint(b"").len(), 64);
    }

    #[test]
    fn test_load_csv_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actorfilms.csv");
        std::fs::write(&path, CSV).unwrap();

        let ds = load_csv(&path).unwrap();
        assert_eq!(ds.source, path);
        assert_eq!(ds.records.len(), 3);
        assert_eq!(ds.fingerprint, fingerprint(CSV.as_bytes()));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_csv(Path::new("/nonexistent/actorfilms.csv")),
            Err(DatasetError::Read(_, _))
        ));
    }
}
