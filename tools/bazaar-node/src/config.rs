//! Startup configuration: generation credentials and API endpoints.
//!
//! The API key comes from `OPENAI_API_KEY` if set, otherwise from a JSON
//! secrets file (`{"OPENAI_API_KEY": "..."}`). A missing key is fatal.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_IMAGE_SIZE: &str = "512x512";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no generation API key: set OPENAI_API_KEY or add it to {}", .0.display())]
    MissingCredential(PathBuf),
    #[error("failed to read secrets file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse secrets file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Deserialize)]
struct SecretsFile {
    #[serde(rename = "OPENAI_API_KEY", default)]
    openai_api_key: Option<String>,
}

/// `<config dir>/bazaar/secrets.json`.
pub fn default_secrets_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("bazaar").join("secrets.json")
}

/// Resolve the generation API key.
///
/// An explicitly given secrets file must exist; the default one may be absent.
pub fn resolve_api_key(
    env_value: Option<String>,
    secrets_path: Option<&Path>,
) -> Result<String, ConfigError> {
    if let Some(key) = env_value.map(|k| k.trim().to_string()) {
        if !key.is_empty() {
            return Ok(key);
        }
    }

    let (path, required) = match secrets_path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_secrets_path(), false),
    };

    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingCredential(path));
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    let secrets: SecretsFile = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    secrets
        .openai_api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(ConfigError::MissingCredential(path))
}

/// Endpoint and model settings for the OpenAI-compatible generation API.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub image_size: String,
}

impl GenerationConfig {
    pub fn new(api_key: String, api_base: &str) -> Result<Self, ConfigError> {
        let api_base = api_base.trim_end_matches('/');
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "API base must be an http(s) URL, got '{api_base}'"
            )));
        }
        Ok(Self {
            api_key,
            api_base: api_base.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_secrets(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn env_value_takes_precedence() {
        let (_dir, path) = write_secrets(r#"{"OPENAI_API_KEY":"from-file"}"#);
        let key = resolve_api_key(Some(" from-env ".into()), Some(&path)).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn blank_env_falls_back_to_file() {
        let (_dir, path) = write_secrets(r#"{"OPENAI_API_KEY":"from-file"}"#);
        let key = resolve_api_key(Some("  ".into()), Some(&path)).unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn file_without_key_is_missing_credential() {
        let (_dir, path) = write_secrets(r#"{"OTHER":"x"}"#);
        let err = resolve_api_key(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(p) if p == path));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let (_dir, path) = write_secrets("not json");
        let err = resolve_api_key(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = resolve_api_key(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn generation_config_normalizes_base() {
        let config = GenerationConfig::new("k".into(), "http://localhost:9000/v1/").unwrap();
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert!(GenerationConfig::new("k".into(), "localhost").is_err());
    }
}
