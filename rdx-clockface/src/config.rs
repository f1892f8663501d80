//! Defines all configuration structures for the clock face.
//!
//! `FaceConfig` is deserialized with `serde` and layered with the `config`
//! crate: an optional TOML file first, then `CLOCKFACE_*` environment
//! variables on top.

use crate::common::{ClockDisplay, Mode};
use crate::document::ROOT_ELEMENT;
use crate::error::FaceError;
use chrono::{NaiveDateTime, Timelike};
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

/// File stem looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "clockface";

/// The top-level configuration for the `FaceEngine`.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceConfig {
    /// How often the clock source ticks.
    #[serde(default)]
    pub granularity: ClockGranularity,

    /// The timezone used for the displayed wall-clock time. Uses the string
    /// names from the IANA Time Zone Database (e.g., "Europe/Paris").
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// The user's clock-display preference at startup.
    #[serde(default)]
    pub clock_display: ClockDisplay,

    /// The stats mode shown first.
    #[serde(default = "default_initial_mode")]
    pub initial_mode: Mode,

    /// The element whose taps cycle the stats slot.
    #[serde(default = "default_root_element")]
    pub root_element: String,
}

/// Defines how often the clock source fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockGranularity {
    Seconds,
    #[default]
    Minutes,
    Hours,
}

impl ClockGranularity {
    pub fn period(self) -> Duration {
        match self {
            ClockGranularity::Seconds => Duration::from_secs(1),
            ClockGranularity::Minutes => Duration::from_secs(60),
            ClockGranularity::Hours => Duration::from_secs(3600),
        }
    }

    /// Time left from `local` until the next boundary of this granularity
    /// (the next second, the top of the next minute or hour).
    pub fn until_next_boundary(self, local: NaiveDateTime) -> Duration {
        let period_ms = self.period().as_millis() as u64;
        let since_midnight_ms = u64::from(local.num_seconds_from_midnight()) * 1000
            + u64::from(local.nanosecond().min(999_999_999)) / 1_000_000;
        Duration::from_millis(period_ms - since_midnight_ms % period_ms)
    }
}

impl FaceConfig {
    /// Loads the configuration from `path` (or `clockface.toml` in the
    /// working directory if present), then applies `CLOCKFACE_*` overrides.
    pub fn load(path: Option<&str>) -> Result<Self, FaceError> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("CLOCKFACE"))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parses a configuration from TOML text, without environment overrides.
    pub fn from_toml_str(toml: &str) -> Result<Self, FaceError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            granularity: ClockGranularity::default(),
            timezone: default_timezone(),
            clock_display: ClockDisplay::default(),
            initial_mode: default_initial_mode(),
            root_element: default_root_element(),
        }
    }
}

// --- Default value functions for serde ---

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_initial_mode() -> Mode {
    Mode::Calories
}

fn default_root_element() -> String {
    ROOT_ELEMENT.to_string()
}
