use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::model::Units;

/// Key injected at build time: `OPENWEATHER_API_KEY=... cargo build`.
pub const EMBEDDED_API_KEY: Option<&str> = option_env!("OPENWEATHER_API_KEY");

/// How raw forecast periods are turned into forecast entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMode {
    /// First five 3-hour periods as-is.
    #[default]
    Windowed,
    /// One entry per calendar day.
    Daily,
}

/// Dashboard settings, stored on disk as TOML.
///
/// Example TOML:
/// default_city = "Paris"
/// units = "imperial"
/// forecast_mode = "daily"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Embedded credential. Takes priority over anything the user persisted.
    /// Never written back to disk.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub default_city: String,
    pub units: Units,
    /// Local/development context: allows prompting for a credential.
    pub is_local: bool,
    pub refresh_interval_minutes: u64,
    /// Shortest string accepted as a credential.
    pub min_credential_len: usize,
    pub forecast_mode: ForecastMode,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_key: EMBEDDED_API_KEY.map(str::to_string),
            default_city: "London".to_string(),
            units: Units::Metric,
            is_local: true,
            refresh_interval_minutes: 10,
            min_credential_len: 21,
            forecast_mode: ForecastMode::Windowed,
            base_url: "https://api.openweathermap.org".to_string(),
            timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut cfg: DashboardConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if cfg.api_key.is_none() {
            cfg.api_key = EMBEDDED_API_KEY.map(str::to_string);
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
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
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the persisted key-value store, next to the config file.
    pub fn store_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("store.toml"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg.default_city, "London");
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.refresh_interval_minutes, 10);
        assert_eq!(cfg.min_credential_len, 21);
        assert_eq!(cfg.forecast_mode, ForecastMode::Windowed);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default_city = \"Paris\"\nunits = \"imperial\"\nforecast_mode = \"daily\"\n",
        )
        .unwrap();

        let cfg = DashboardConfig::load_from(&path).unwrap();

        assert_eq!(cfg.default_city, "Paris");
        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.forecast_mode, ForecastMode::Daily);
        assert_eq!(cfg.base_url, "https://api.openweathermap.org");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = [").unwrap();

        let err = DashboardConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = DashboardConfig {
            default_city: "Tokyo".into(),
            refresh_interval_minutes: 3,
            ..Default::default()
        };
        cfg.save_to(&path).unwrap();

        let loaded = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(loaded.default_city, "Tokyo");
        assert_eq!(loaded.refresh_interval_minutes, 3);
    }

    #[test]
    fn save_never_writes_the_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = DashboardConfig {
            api_key: Some("0123456789abcdef0123456789abcdef".into()),
            ..Default::default()
        };
        cfg.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("api_key"));
        assert!(!written.contains("0123456789abcdef"));
        assert!(written.contains("default_city = \"London\""));
    }
}
