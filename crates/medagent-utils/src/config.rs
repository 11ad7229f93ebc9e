//! Environment-based configuration
//!
//! Settings come from an optional `.env` file and the process environment.
//! Both are read once into an [`EnvSource`]; the process environment is
//! never modified. Process variables win over file values.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The env file exists but could not be read or parsed
    #[error("Failed to load env file {}: {source}", path.display())]
    EnvFile {
        /// Path of the env file
        path: PathBuf,
        /// Underlying dotenv error
        #[source]
        source: dotenv::Error,
    },

    /// A required key is absent
    #[error("Missing configuration value: {0}")]
    Missing(String),

    /// A value could not be parsed or is out of range
    #[error("Invalid value for {key}: {reason}")]
    Invalid {
        /// Configuration key
        key: String,
        /// What is wrong with the value
        reason: String,
    },
}

/// Snapshot of configuration variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSource {
    vars: HashMap<String, String>,
}

impl EnvSource {
    /// Read `path` (if it exists) and overlay the process environment
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, std::env::vars())
    }

    /// Read `path` (if it exists) and overlay the given variables
    pub fn load_with_overrides<I>(path: &Path, overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut source = Self::from_file(path)?;
        source.vars.extend(overrides);
        Ok(source)
    }

    /// Read only the env file; a missing file yields an empty source
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let env_file_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };

        let entries = match dotenv::from_path_iter(path) {
            Ok(entries) => entries,
            Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No env file found");
                return Ok(Self::default());
            }
            Err(e) => return Err(env_file_error(e)),
        };

        let mut vars = HashMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(env_file_error)?;
            vars.insert(key, value);
        }
        debug!(path = %path.display(), count = vars.len(), "Loaded env file");
        Ok(Self { vars })
    }

    /// Build a source from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value of `key`; blank values count as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Value of `key`, or [`ConfigError::Missing`]
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// Parsed value of `key`, `None` when unset
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
                    key: key.to_string(),
                    reason: format!("'{raw}': {e}"),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_file_values() {
        let file = env_file("GROQ_API_KEY=gsk_file\n# comment\nMEDAGENT_MAX_TOKENS=2048\n");
        let source = EnvSource::from_file(file.path()).unwrap();
        assert_eq!(source.get("GROQ_API_KEY"), Some("gsk_file"));
        assert_eq!(source.get_parsed::<usize>("MEDAGENT_MAX_TOKENS").unwrap(), Some(2048));
    }

    #[test]
    fn test_process_values_override_file() {
        let file = env_file("GROQ_API_KEY=gsk_file\nMEDAGENT_MODEL=from-file\n");
        let source = EnvSource::load_with_overrides(
            file.path(),
            [("GROQ_API_KEY".to_string(), "gsk_process".to_string())],
        )
        .unwrap();
        assert_eq!(source.get("GROQ_API_KEY"), Some("gsk_process"));
        assert_eq!(source.get("MEDAGENT_MODEL"), Some("from-file"));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = EnvSource::from_file(&dir.path().join(".env")).unwrap();
        assert_eq!(source, EnvSource::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = env_file("this is not a pair\n");
        let err = EnvSource::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let source = EnvSource::from_pairs([("GROQ_API_KEY", "  ")]);
        assert_eq!(source.get("GROQ_API_KEY"), None);
        assert!(matches!(
            source.require("GROQ_API_KEY"),
            Err(ConfigError::Missing(key)) if key == "GROQ_API_KEY"
        ));
    }

    #[test]
    fn test_invalid_number() {
        let source = EnvSource::from_pairs([("MEDAGENT_TEMPERATURE", "warm")]);
        let err = source.get_parsed::<f32>("MEDAGENT_TEMPERATURE").unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for MEDAGENT_TEMPERATURE"));
        assert_eq!(source.get_parsed::<f32>("UNSET").unwrap(), None);
    }
}
