//! Configuration file parsing and structures.
//!
//! glowd uses a single TOML file, loaded once at startup and never mutated
//! afterwards. Values are range-checked here; the command builder re-clamps
//! them defensively on top.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use tracing_subscriber::filter::LevelFilter;

use crate::bridge::object::ObjectKind;

/// Legal value ranges per lighting attribute, as accepted by the bridge.
///
/// `*_SET` bounds the absolute form of an intent, `*_MODIFY` the relative
/// (delta) form.
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const BRIGHTNESS_SET: RangeInclusive<i64> = 1..=254;
    pub const BRIGHTNESS_MODIFY: RangeInclusive<i64> = -254..=254;
    pub const SATURATION_SET: RangeInclusive<i64> = 0..=254;
    pub const SATURATION_MODIFY: RangeInclusive<i64> = -254..=254;
    pub const HUE_SET: RangeInclusive<i64> = 0..=65535;
    pub const HUE_MODIFY: RangeInclusive<i64> = -65534..=65534;
}

/// Top-level configuration structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub bridge: BridgeConfig,
    pub process: ProcessConfig,
    pub lights: LightsConfig,
    #[serde(default)]
    pub running: RunningConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,
}

/// Bridge address and credential
#[derive(Debug, Deserialize, Serialize)]
pub struct BridgeConfig {
    /// IP address or hostname of the bridge
    pub address: String,

    /// API username (the key registered with the bridge)
    pub username: String,
}

/// Which process to watch, and how often
#[derive(Debug, Deserialize, Serialize)]
pub struct ProcessConfig {
    /// Substring matched case-insensitively against running process names
    pub name: String,

    /// Seconds between presence checks (1-600)
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

fn default_poll_interval() -> u64 {
    60
}

/// Which bridge objects are controlled, and how updates are delivered
#[derive(Debug, Deserialize, Serialize)]
pub struct LightsConfig {
    /// Control individual lights or whole groups
    #[serde(default)]
    pub kind: ObjectKind,

    /// Bridge-assigned ids of the objects to control
    #[serde(default)]
    pub targets: Vec<String>,

    /// Transition time in ticks of 100ms; 0 leaves the bridge default
    #[serde(default)]
    pub transition_time: u16,

    /// Restore the captured state when the process stops
    #[serde(default)]
    pub revert_on_stop: bool,
}

/// Per-attribute intents applied while the watched process is running
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunningConfig {
    #[serde(default)]
    pub on: PowerIntent,

    #[serde(default)]
    pub brightness: Modification,

    #[serde(default)]
    pub saturation: Modification,

    #[serde(default)]
    pub hue: Modification,
}

/// How one lighting attribute should change while the process runs.
///
/// TOML form: `{ mode = "none" }`, `{ mode = "set", value = 200 }` or
/// `{ mode = "modify", value = -60 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum Modification {
    /// Leave the attribute untouched
    #[default]
    None,

    /// Set the attribute to an absolute value
    Set(i64),

    /// Shift the attribute by a signed delta
    Modify(i64),
}

/// Whether the lights should be switched on or off while the process runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerIntent {
    /// Leave the on/off state untouched
    #[default]
    None,
    Inactive,
    Active,
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every configured value against its legal range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "process name must not be empty".to_string(),
            ));
        }

        if !(1..=600).contains(&self.process.poll_interval) {
            return Err(ConfigError::Invalid(format!(
                "poll_interval {} is outside 1..=600",
                self.process.poll_interval
            )));
        }

        validate_intent(
            "brightness",
            self.running.brightness,
            &ranges::BRIGHTNESS_SET,
            &ranges::BRIGHTNESS_MODIFY,
        )?;
        validate_intent(
            "saturation",
            self.running.saturation,
            &ranges::SATURATION_SET,
            &ranges::SATURATION_MODIFY,
        )?;
        validate_intent("hue", self.running.hue, &ranges::HUE_SET, &ranges::HUE_MODIFY)?;

        Ok(())
    }
}

fn validate_intent(
    attribute: &str,
    intent: Modification,
    set: &RangeInclusive<i64>,
    modify: &RangeInclusive<i64>,
) -> Result<(), ConfigError> {
    let (value, range, mode) = match intent {
        Modification::None => return Ok(()),
        Modification::Set(v) => (v, set, "set"),
        Modification::Modify(v) => (v, modify, "modify"),
    };

    if !range.contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{} {} value {} is outside {}..={}",
            attribute,
            mode,
            value,
            range.start(),
            range.end()
        )));
    }

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
