//! Global weekgrid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Weekday;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DAY_END_HOUR, DEFAULT_DAY_START_HOUR, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_SLOT_MINUTES, DEFAULT_TIMEZONE,
};
use crate::error::{GridError, GridResult};
use crate::grid::SlotGrid;

fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}

fn default_day_start_hour() -> u32 {
    DEFAULT_DAY_START_HOUR
}

fn default_day_end_hour() -> u32 {
    DEFAULT_DAY_END_HOUR
}

fn default_first_day() -> String {
    "sunday".to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

/// Configuration at ~/.config/weekgrid/config.toml, overridable with
/// `WEEKGRID_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GridConfig {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,

    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,

    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u32,

    #[serde(default = "default_first_day")]
    pub first_day: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            slot_minutes: default_slot_minutes(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            first_day: default_first_day(),
            timezone: default_timezone(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Validated, typed form of [`GridConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    pub grid: SlotGrid,
    pub timezone: Tz,
    pub first_day: Weekday,
    pub fetch_timeout: Duration,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            grid: SlotGrid::default(),
            timezone: chrono_tz::UTC,
            first_day: Weekday::Sun,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl GridConfig {
    pub fn config_path() -> GridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GridError::Config("Could not determine config directory".into()))?
            .join("weekgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out file first
    /// if none exists.
    pub fn load() -> GridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (missing file means defaults), then apply environment
    /// overrides. `~` in the path is expanded.
    pub fn load_from(path: &Path) -> GridResult<Self> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();

        Config::builder()
            .add_source(File::from(PathBuf::from(expanded)).required(false))
            .add_source(Environment::with_prefix("WEEKGRID").try_parsing(true))
            .build()
            .map_err(|e| GridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GridError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> GridResult<()> {
        let contents = format!(
            "\
# weekgrid configuration

# Width of one grid slot in minutes:
# slot_minutes = {}

# Hours of the day shown in the grid:
# day_start_hour = {}
# day_end_hour = {}

# Day the week starts on:
# first_day = \"sunday\"

# Timezone the grid is drawn in:
# timezone = \"{}\"

# Seconds to wait for a calendar feed:
# fetch_timeout_secs = {}
",
            DEFAULT_SLOT_MINUTES,
            DEFAULT_DAY_START_HOUR,
            DEFAULT_DAY_END_HOUR,
            DEFAULT_TIMEZONE,
            DEFAULT_FETCH_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Check every value and convert to typed settings.
    pub fn settings(&self) -> GridResult<GridSettings> {
        let grid = SlotGrid::new(self.slot_minutes, self.day_start_hour, self.day_end_hour)?;

        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| GridError::Config(format!("Unknown timezone '{}'", self.timezone)))?;

        let first_day: Weekday = self
            .first_day
            .parse()
            .map_err(|_| GridError::Config(format!("Unknown weekday '{}'", self.first_day)))?;

        if self.fetch_timeout_secs == 0 {
            return Err(GridError::Config("fetch_timeout_secs must be positive".into()));
        }

        Ok(GridSettings {
            grid,
            timezone,
            first_day,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_to_sunday_utc_half_hours() {
        let settings = GridConfig::default().settings().unwrap();
        assert_eq!(settings, GridSettings::default());
        assert_eq!(settings.grid.slots_per_day(), 48);
    }

    #[test]
    fn test_generated_default_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        GridConfig::create_default_config(&path).unwrap();
        let config = GridConfig::load_from(&path).unwrap();

        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn test_load_reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "slot_minutes = 60\nday_start_hour = 8\nday_end_hour = 18\nfirst_day = \"monday\"\ntimezone = \"Europe/Helsinki\"\n",
        )
        .unwrap();

        let settings = GridConfig::load_from(&path).unwrap().settings().unwrap();

        assert_eq!(settings.grid, SlotGrid::new(60, 8, 18).unwrap());
        assert_eq!(settings.first_day, Weekday::Mon);
        assert_eq!(settings.timezone, chrono_tz::Europe::Helsinki);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let bad_tz = GridConfig {
            timezone: "Nowhere/Special".into(),
            ..GridConfig::default()
        };
        assert!(matches!(bad_tz.settings(), Err(GridError::Config(_))));

        let bad_day = GridConfig {
            first_day: "someday".into(),
            ..GridConfig::default()
        };
        assert!(matches!(bad_day.settings(), Err(GridError::Config(_))));

        let bad_slots = GridConfig {
            slot_minutes: 7,
            ..GridConfig::default()
        };
        assert!(matches!(bad_slots.settings(), Err(GridError::Config(_))));
    }
}
