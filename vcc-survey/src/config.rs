//! Survey configuration.

use crate::error::{SurveyError, SurveyResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides `database_path`.
pub const DATABASE_PATH_ENV: &str = "VCC_DATABASE_PATH";
/// Overrides `origin_hash_salt`.
pub const ORIGIN_HASH_SALT_ENV: &str = "VCC_ORIGIN_HASH_SALT";

/// Runtime configuration for the survey service.
///
/// The encryption key is never part of this struct. It is read through a
/// key provider, by default from the environment variable named by
/// `encryption_key_env`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// DuckDB file, or ":memory:".
    pub database_path: PathBuf,

    /// DuckDB `memory_limit` pragma (e.g. "256MB").
    pub memory_limit: String,

    /// DuckDB worker threads.
    pub threads: u32,

    /// Environment variable holding the base64 encryption key.
    pub encryption_key_env: String,

    /// Salt mixed into every origin hash.
    pub origin_hash_salt: String,

    /// Minimum compliance retention for individual records.
    pub retention_years: u32,

    /// How often a conflicting submission is retried before giving up.
    pub max_conflict_retries: u32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            memory_limit: "256MB".to_string(),
            threads: 2,
            encryption_key_env: "VCC_ENCRYPTION_KEY".to_string(),
            origin_hash_salt: String::new(),
            retention_years: 4,
            max_conflict_retries: 5,
        }
    }
}

impl SurveyConfig {
    /// Parses a TOML document. Missing keys take their default.
    pub fn from_toml_str(source: &str) -> SurveyResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| SurveyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file and applies environment overrides.
    pub fn from_file(path: &Path) -> SurveyResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| SurveyError::Config(format!("{}: {e}", path.display())))?;
        Ok(Self::from_toml_str(&source)?.with_env_overrides())
    }

    /// Applies `VCC_DATABASE_PATH` and `VCC_ORIGIN_HASH_SALT` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from an arbitrary lookup, keyed by env var name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATABASE_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(salt) = lookup(ORIGIN_HASH_SALT_ENV) {
            self.origin_hash_salt = salt;
        }
        self
    }

    pub fn validate(&self) -> SurveyResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(SurveyError::Config("database_path must not be empty".into()));
        }
        if self.memory_limit.trim().is_empty() {
            return Err(SurveyError::Config("memory_limit must not be empty".into()));
        }
        if self.threads == 0 {
            return Err(SurveyError::Config("threads must be at least 1".into()));
        }
        if self.encryption_key_env.trim().is_empty() {
            return Err(SurveyError::Config("encryption_key_env must not be empty".into()));
        }
        if self.retention_years == 0 {
            return Err(SurveyError::Config("retention_years must be at least 1".into()));
        }
        Ok(())
    }
}
