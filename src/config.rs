//! Configuration parsing and validation.
//!
//! Tonecheck reads an optional TOML file (default `./config/tone.toml`).
//! Every table and key has a default, so a missing file is not an error.
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8002"
//! timeout_secs = 90
//!
//! [storage]
//! path = "./data/tone.sqlite"
//!
//! [analysis]
//! temperature = 0.7
//! ```
//!
//! # Environment Overrides
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `TONECHECK_API_BASE_URL` | `api.base_url` |
//! | `TONECHECK_API_TIMEOUT_SECS` | `api.timeout_secs` |
//!
//! Overrides apply after the file is parsed and before validation.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use tonecheck_core::models::DEFAULT_TEMPERATURE;
use tonecheck_core::schema::check_temperature;

pub const ENV_API_BASE_URL: &str = "TONECHECK_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "TONECHECK_API_TIMEOUT_SECS";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8002".to_string()
}
fn default_timeout_secs() -> u64 {
    90
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/tone.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
        }
    }
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

/// Load the config file at `path`, apply environment overrides, and
/// validate the result. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        debug!(path = %path.display(), "config file not found; using defaults");
        Config::default()
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Apply environment-style overrides from `lookup`.
pub fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(url) = lookup(ENV_API_BASE_URL).filter(|s| !s.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }
    if let Some(secs) = lookup(ENV_API_TIMEOUT_SECS) {
        config.api.timeout_secs = secs.trim().parse().with_context(|| {
            format!("{} must be a whole number of seconds", ENV_API_TIMEOUT_SECS)
        })?;
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<()> {
    if config.api.timeout_secs == 0 {
        bail!("api.timeout_secs must be > 0");
    }

    let url = reqwest::Url::parse(&config.api.base_url)
        .with_context(|| format!("api.base_url is not a valid URL: '{}'", config.api.base_url))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("api.base_url must use http or https, got '{}'", other),
    }

    if check_temperature(config.analysis.temperature).is_err() {
        bail!(
            "analysis.temperature must be in [0.0, 2.0], got {}",
            config.analysis.temperature
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert!((cfg.analysis.temperature - 0.7).abs() < 1e-12);
        assert_eq!(cfg.storage.path, PathBuf::from("./data/tone.sqlite"));

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty.api.timeout_secs, 90);
        assert_eq!(empty.api.base_url, "http://localhost:8002");
    }

    #[test]
    fn test_partial_file() {
        let cfg: Config =
            toml::from_str("[api]\nbase_url = \"https://tone.example.com\"\n").unwrap();
        assert_eq!(cfg.api.base_url, "https://tone.example.com");
        assert_eq!(cfg.api.timeout_secs, 90);
        validate(&cfg).unwrap();
    }

    #[test]
    fn test_file_is_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("tone.toml");
        std::fs::write(
            &path,
            "[storage]\npath = \"/tmp/x.sqlite\"\n\n[analysis]\ntemperature = 1.5\n",
        )
        .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let cfg: Config = toml::from_str(&content).unwrap();
        assert_eq!(cfg.storage.path, PathBuf::from("/tmp/x.sqlite"));
        assert!((cfg.analysis.temperature - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_BASE_URL, "http://10.0.0.5:9000"),
            (ENV_API_TIMEOUT_SECS, " 15 "),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(cfg.api.timeout_secs, 15);
    }

    #[test]
    fn test_bad_timeout_override() {
        let mut cfg = Config::default();
        let err = apply_overrides(&mut cfg, |k| {
            (k == ENV_API_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut cfg = Config::default();
        cfg.api.timeout_secs = 0;
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.api.base_url = "ftp://example.com".to_string();
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.api.base_url = "not a url".to_string();
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.analysis.temperature = 2.5;
        assert!(validate(&cfg).is_err());
    }
}
