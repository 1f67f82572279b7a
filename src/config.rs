use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::error::SiftError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub chunk_size: usize,
    pub cache_file: PathBuf,
    pub output_directory: PathBuf,
    pub output_by_video_id: String,
    pub output_by_video_and_date: String,
    pub countries: Vec<String>,
    pub max_attempts: u32,
    pub initial_backoff_secs: u64,
    pub max_backoff_secs: u64,
    pub max_jitter_ms: u64,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub verbose: bool,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            output_by_video_id: DEFAULT_OUTPUT_BY_VIDEO_ID.to_string(),
            output_by_video_and_date: DEFAULT_OUTPUT_BY_VIDEO_AND_DATE.to_string(),
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff_secs: DEFAULT_INITIAL_BACKOFF_SECS,
            max_backoff_secs: DEFAULT_MAX_BACKOFF_SECS,
            max_jitter_ms: DEFAULT_MAX_JITTER_MS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            verbose: false,
        }
    }
}

impl SiftConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < MIN_CHUNK_SIZE || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(SiftError::InvalidConfig(format!(
                "chunk_size must be between {} and {}",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE
            )).into());
        }

        if self.max_attempts < MIN_MAX_ATTEMPTS || self.max_attempts > MAX_MAX_ATTEMPTS {
            return Err(SiftError::InvalidConfig(format!(
                "max_attempts must be between {} and {}",
                MIN_MAX_ATTEMPTS, MAX_MAX_ATTEMPTS
            )).into());
        }

        if self.initial_backoff_secs > self.max_backoff_secs {
            return Err(SiftError::InvalidConfig(
                "initial_backoff_secs cannot exceed max_backoff_secs".to_string()
            ).into());
        }

        if self.output_by_video_id == self.output_by_video_and_date {
            return Err(SiftError::InvalidConfig(
                "output_by_video_id and output_by_video_and_date must differ".to_string()
            ).into());
        }

        if self.countries.iter().any(|c| c.is_empty()) {
            return Err(SiftError::InvalidConfig(
                "countries cannot contain empty prefixes".to_string()
            ).into());
        }

        Ok(())
    }

    /// Read the lookup credential. Its absence is fatal.
    pub fn api_key_from_env() -> Result<String> {
        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SiftError::MissingApiKey(API_KEY_ENV_VAR.to_string()).into()),
        }
    }

    pub fn output_by_video_id_path(&self) -> PathBuf {
        self.output_directory.join(&self.output_by_video_id)
    }

    pub fn output_by_video_and_date_path(&self) -> PathBuf {
        self.output_directory.join(&self.output_by_video_and_date)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_secs(self.initial_backoff_secs)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }

    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.max_jitter_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_legacy_behavior() {
        let config = SiftConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 40_000);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_backoff_secs, 5);
        assert_eq!(config.max_backoff_secs, 320);
        assert_eq!(config.countries, vec!["US", "CA"]);
        assert_eq!(
            config.output_by_video_id_path(),
            PathBuf::from(".").join("combined_no_duplicate_video_id.csv")
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = SiftConfig::default();

        config.chunk_size = 0;
        assert!(config.validate().is_err());

        config.chunk_size = 10;
        config.max_attempts = 0;
        assert!(config.validate().is_err());

        config.max_attempts = 3;
        config.initial_backoff_secs = 600;
        assert!(config.validate().is_err());

        config.initial_backoff_secs = 5;
        config.output_by_video_and_date = config.output_by_video_id.clone();
        assert!(config.validate().is_err());

        config.output_by_video_and_date = "other.csv".to_string();
        config.countries.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "chunk_size": 100, "countries": ["GB"] }"#).unwrap();

        let config = SiftConfig::from_file(&path).unwrap();
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.countries, vec!["GB"]);
        assert_eq!(config.max_backoff_secs, 320);
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = SiftConfig::default();
        config.verbose = true;
        config.to_file(&path).unwrap();

        let loaded = SiftConfig::from_file(&path).unwrap();
        assert!(loaded.verbose);
        assert_eq!(loaded.cache_file, config.cache_file);
    }
}
