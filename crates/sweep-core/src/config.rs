use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::target::UrlTemplate;

/// Default endpoint; `{id}` is replaced with each integer of the range.
pub const DEFAULT_URL_TEMPLATE: &str =
    "http://smb.cidb.gov.my/contractor/contractors/information/{id}";

/// Global configuration loaded from `~/.config/sweep/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of concurrent workers.
    pub thread_count: usize,
    /// Endpoint template for range mode; must contain `{id}`.
    pub url_template: String,
    /// First id of the range (inclusive).
    pub id_min: u64,
    /// Last id of the range (inclusive).
    pub id_max: u64,
    /// Directory receiving response bodies, relative to the output root.
    pub artifact_dir: PathBuf,
    /// Upper bound (exclusive) of the per-worker pause between requests, in seconds. 0 disables.
    pub jitter_max_secs: u64,
    /// Connect timeout in seconds. 0 = no limit.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Abort a transfer that stays under 1 KiB/s for this many seconds. 0 = no limit.
    #[serde(default = "default_low_speed_time_secs")]
    pub low_speed_time_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_low_speed_time_secs() -> u64 {
    60
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            thread_count: 10,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            id_min: 1,
            id_max: 217_898,
            artifact_dir: PathBuf::from("downloaded"),
            jitter_max_secs: 10,
            connect_timeout_secs: default_connect_timeout_secs(),
            low_speed_time_secs: default_low_speed_time_secs(),
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("thread_count must be at least 1")]
    NoWorkers,
    #[error("url_template must contain the {{id}} placeholder: {0}")]
    MissingPlaceholder(String),
    #[error("url_template does not expand to an http(s) URL: {url}")]
    InvalidTemplate { url: String },
    #[error("artifact_dir must not be empty")]
    EmptyArtifactDir,
}

impl SweepConfig {
    /// Checks values that would otherwise only fail once workers are running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_count == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.artifact_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyArtifactDir);
        }
        let template = UrlTemplate::parse(&self.url_template)?;
        let sample = template.expand(self.id_min);
        match url::Url::parse(&sample) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(()),
            _ => Err(ConfigError::InvalidTemplate { url: sample }),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sweep")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SweepConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SweepConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<SweepConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: SweepConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SweepConfig::default();
        assert_eq!(cfg.thread_count, 10);
        assert_eq!(cfg.id_min, 1);
        assert_eq!(cfg.id_max, 217_898);
        assert_eq!(cfg.artifact_dir, PathBuf::from("downloaded"));
        assert_eq!(cfg.jitter_max_secs, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SweepConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SweepConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.thread_count, cfg.thread_count);
        assert_eq!(parsed.url_template, cfg.url_template);
        assert_eq!(parsed.id_max, cfg.id_max);
    }

    #[test]
    fn config_toml_custom_values_and_timeout_defaults() {
        let toml = r#"
            thread_count = 4
            url_template = "https://example.com/items/{id}"
            id_min = 10
            id_max = 20
            artifact_dir = "out"
            jitter_max_secs = 0
        "#;
        let cfg: SweepConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.thread_count, 4);
        assert_eq!(cfg.id_min, 10);
        assert_eq!(cfg.id_max, 20);
        assert_eq!(cfg.artifact_dir, PathBuf::from("out"));
        assert_eq!(cfg.jitter_max_secs, 0);
        assert_eq!(cfg.connect_timeout_secs, 30);
        assert_eq!(cfg.low_speed_time_secs, 60);
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let cfg = SweepConfig {
            thread_count: 0,
            ..SweepConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NoWorkers)));
    }

    #[test]
    fn validate_rejects_template_without_placeholder() {
        let cfg = SweepConfig {
            url_template: "http://example.com/items".to_string(),
            ..SweepConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MissingPlaceholder(_))
        ));
    }

    #[test]
    fn validate_rejects_non_http_template() {
        let cfg = SweepConfig {
            url_template: "ftp://example.com/{id}".to_string(),
            ..SweepConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = SweepConfig {
            thread_count: 3,
            ..SweepConfig::default()
        };
        fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();
        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.thread_count, 3);
    }

    #[test]
    fn load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("nope.toml")).is_err());
    }
}
