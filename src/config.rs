use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_filename")]
    pub filename: String,
    /// Seconds between checks of the CSV file for changes. Unset disables polling.
    #[serde(alias = "reloadinterval", default)]
    pub reload_interval: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            filename: default_dataset_filename(),
            reload_interval: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecommendConfig {
    #[serde(alias = "similaractors", default = "default_similar_actors")]
    pub similar_actors: usize,
    #[serde(alias = "recommendedfilms", default = "default_recommended_films")]
    pub recommended_films: usize,
    #[serde(alias = "filmographylimit", default = "default_filmography_limit")]
    pub filmography_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            similar_actors: default_similar_actors(),
            recommended_films: default_recommended_films(),
            filmography_limit: default_filmography_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub appdir: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            appdir: None,
        }
    }
}

fn default_port() -> String {
    "8501".to_string()
}

fn default_dataset_filename() -> String {
    "actorfilms.csv".to_string()
}

fn default_similar_actors() -> usize {
    5
}

fn default_recommended_films() -> usize {
    10
}

fn default_filmography_limit() -> usize {
    15
}

fn default_title() -> String {
    "Actor-based Film Recommendations".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(path, &content)
    }

    pub fn from_yaml(origin: &str, content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(origin.to_string(), e))?;

        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        if self.listen.tlscert.is_some() != self.listen.tlskey.is_some() {
            return Err(ConfigError::Invalid(
                origin.to_string(),
                "tlscert and tlskey must be set together".to_string(),
            ));
        }
        if self.dataset.reload_interval == Some(0) {
            return Err(ConfigError::Invalid(
                origin.to_string(),
                "dataset.reload_interval must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(&self.dataset.filename)
    }

    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.listen.tlscert, &self.listen.tlskey) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("Invalid config file {0}: {1}")]
    Invalid(String, String),
}
