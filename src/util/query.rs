use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Look up `key`, falling back to the same key with its first letter uppercased.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(val) = self.map.get(key) {
            return Some(val);
        }

        let mut chars = key.chars();
        let first = chars.next()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        let key2: String = first.to_ascii_uppercase().to_string() + chars.as_str();
        self.map.get(&key2).map(|x| x.as_str())
    }

    /// Parse an optional unsigned parameter. Present but malformed is an error.
    pub fn get_usize(&self, key: &str) -> Result<Option<usize>, QueryError> {
        match self.get(key) {
            None => Ok(None),
            Some(s) => s
                .trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| QueryError::Invalid(key.to_string(), s.to_string())),
        }
    }

    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize, QueryError> {
        Ok(self.get_usize(key)?.unwrap_or(default))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_with_capitalised_fallback() {
        let params = QueryParams::from_pairs([("StartIndex", "5"), ("limit", "10")]);
        assert_eq!(params.get("startIndex"), Some("5"));
        assert_eq!(params.get("limit"), Some("10"));
        assert_eq!(params.get("Limit"), None);
        assert_eq!(params.get("q"), None);
    }

    #[test]
    fn test_get_usize() {
        let params = QueryParams::from_pairs([("limit", "10"), ("bins", "abc")]);
        assert_eq!(params.get_usize("limit").unwrap(), Some(10));
        assert_eq!(params.get_usize("startIndex").unwrap(), None);
        assert!(params.get_usize("bins").is_err());
        assert_eq!(params.usize_or("startIndex", 3).unwrap(), 3);
    }
}
