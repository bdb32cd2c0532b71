use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::model::Location;

pub const DEFAULT_BASE_URL: &str = "https://opendata.cwb.gov.tw/api/v1/rest/datastore";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "CWB-..."
/// timeout_secs = 10
///
/// [location]
/// station = "臺北"
/// county = "臺北市"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CWA open-data authorization key.
    pub api_key: Option<String>,

    pub base_url: String,

    /// Bare per-request timeout; there are no retries.
    pub timeout_secs: u64,

    pub location: Location,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            location: Location::default(),
        }
    }
}

impl Config {
    /// Returns the API key, or an error explaining how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` and enter your CWA open-data key."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// Per-request timeout; `0` means the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config {
            api_key: Some("   ".into()),
            ..Config::default()
        };
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn set_api_key_trims_input() {
        let mut cfg = Config::default();
        cfg.set_api_key("  CWB-KEY \n".into());

        assert_eq!(cfg.api_key().unwrap(), "CWB-KEY");
    }

    #[test]
    fn zero_timeout_uses_default() {
        let cfg: Config = toml::from_str("timeout_secs = 0").unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let cfg: Config = toml::from_str("timeout_secs = 7").unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "CWB-KEY"

            [location]
            station = "臺中"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key().unwrap(), "CWB-KEY");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.location.station, "臺中");
        assert_eq!(cfg.location.county, "臺北市");
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir()
            .join(format!("weather-core-config-{}", std::process::id()))
            .join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("CWB-KEY".into());
        cfg.timeout_secs = 5;
        cfg.location = Location {
            station: "高雄".into(),
            county: "高雄市".into(),
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key().unwrap(), "CWB-KEY");
        assert_eq!(loaded.timeout_secs, 5);
        assert_eq!(loaded.location, cfg.location);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let path = std::env::temp_dir().join("weather-core-does-not-exist/config.toml");
        let cfg = Config::load_from(&path).unwrap();

        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.location, Location::default());
    }
}
