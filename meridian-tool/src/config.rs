use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use meridian_core::{Board, CoreError, DialTheme, HoursFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MerError;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub format: HoursFormat,
    #[serde(default)]
    pub theme: DialTheme,
    pub home: Option<String>,
    #[serde(default)]
    pub zones: Vec<String>,
}

/// Effective settings after CLI flags, environment and config are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub format: HoursFormat,
    pub theme: DialTheme,
    pub home: Tz,
    pub zones: Vec<String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("meridian").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

pub fn load_config_from(path: &Path) -> Config {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring malformed config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

pub fn save_config(config: &Config) -> Result<PathBuf, MerError> {
    let path = config_path().ok_or(MerError::NoConfigDir)?;
    save_config_to(&path, config)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<(), MerError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(config)?)?;
    debug!("saved config to {}", path.display());
    Ok(())
}

pub fn parse_zone(name: &str) -> Result<Tz, MerError> {
    name.parse()
        .map_err(|_| MerError::UnknownTimezone(name.to_string()))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Home zone: CLI flag, then `MERIDIAN_HOME`, then config, then `TZ`, then UTC.
pub fn resolve_home(cli_home: Option<String>, config: &Config) -> Result<Tz, MerError> {
    let name = cli_home
        .or_else(|| non_empty_env("MERIDIAN_HOME"))
        .or_else(|| config.home.clone())
        .or_else(|| non_empty_env("TZ"));

    match name {
        Some(name) => parse_zone(&name),
        None => Ok(Tz::UTC),
    }
}

pub fn resolve_settings(
    cli_format: Option<HoursFormat>,
    cli_theme: Option<DialTheme>,
    cli_home: Option<String>,
    config: &Config,
) -> Result<Settings, MerError> {
    Ok(Settings {
        format: cli_format.unwrap_or(config.format),
        theme: cli_theme.unwrap_or(config.theme),
        home: resolve_home(cli_home, config)?,
        zones: config.zones.clone(),
    })
}

impl Settings {
    /// Zones to open: the given ones, else the configured ones, else home.
    pub fn zones_or_default(&self, zones: Vec<String>) -> Vec<String> {
        if !zones.is_empty() {
            zones
        } else if !self.zones.is_empty() {
            self.zones.clone()
        } else {
            vec![self.home.name().to_string()]
        }
    }

    pub fn build_board(&self, zones: &[String], now: DateTime<Utc>) -> Result<Board, MerError> {
        let mut board = Board::new(self.home, self.format, self.theme);
        for name in zones {
            board.add(name, now).map_err(|e| match e {
                CoreError::UnknownTimezone(name) => MerError::UnknownTimezone(name),
                other => MerError::Core(other),
            })?;
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn settings() -> Settings {
        Settings {
            format: HoursFormat::TwentyFour,
            theme: DialTheme::Sky,
            home: "Europe/Warsaw".parse().unwrap(),
            zones: vec![],
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "format = [").unwrap();

        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            format: HoursFormat::Twelve,
            theme: DialTheme::Rose,
            home: Some("Asia/Tokyo".to_string()),
            zones: vec!["Europe/Warsaw".to_string(), "Asia/Kolkata".to_string()],
        };

        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path), config);
    }

    #[test]
    fn reads_hand_written_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "format = \"12\"\nzones = [\"Asia/Tokyo\"]\n").unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.format, HoursFormat::Twelve);
        assert_eq!(config.theme, DialTheme::Sky);
        assert_eq!(config.zones, vec!["Asia/Tokyo"]);
    }

    #[test]
    fn cli_flags_override_config() {
        let config = Config {
            format: HoursFormat::Twelve,
            theme: DialTheme::Mono,
            home: Some("Asia/Tokyo".to_string()),
            zones: vec![],
        };

        let settings = resolve_settings(
            Some(HoursFormat::TwentyFour),
            None,
            Some("America/Denver".to_string()),
            &config,
        )
        .unwrap();

        assert_eq!(settings.format, HoursFormat::TwentyFour);
        assert_eq!(settings.theme, DialTheme::Mono);
        assert_eq!(settings.home.name(), "America/Denver");
    }

    #[test]
    fn unknown_home_is_an_error() {
        let err = resolve_home(Some("Atlantis/Center".to_string()), &Config::default()).unwrap_err();
        assert!(matches!(err, MerError::UnknownTimezone(_)));
    }

    #[test]
    fn zones_fall_back_to_home() {
        let settings = settings();
        assert_eq!(settings.zones_or_default(vec![]), vec!["Europe/Warsaw"]);
        assert_eq!(
            settings.zones_or_default(vec!["Asia/Tokyo".to_string()]),
            vec!["Asia/Tokyo"]
        );
    }

    #[test]
    fn build_board_reports_bad_names() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let err = settings()
            .build_board(&["Europe/Nowhere".to_string()], now)
            .err()
            .unwrap();
        assert!(matches!(err, MerError::UnknownTimezone(name) if name == "Europe/Nowhere"));
    }
}
