//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `growctl.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use growctl_adapter_gpio::PinConfig;
use growctl_domain::thresholds::Thresholds;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Control loop settings.
    pub automation: AutomationConfig,
    /// Environmental limits for the default rule library.
    pub thresholds: Thresholds,
    /// BCM pin assignment for the relay board.
    pub pins: PinConfig,
    /// Hardware backend toggle.
    pub hardware: HardwareConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Control loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Seconds between sensor polls.
    pub poll_seconds: u64,
}

/// Hardware backend configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// Attempt to drive real relays. When initialization fails the
    /// daemon falls back to the simulation backend instead of exiting.
    pub enabled: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `growctl.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the resulting configuration is semantically invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("growctl.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("GROWCTL_POLL_SECONDS")
            && let Ok(seconds) = val.parse()
        {
            self.automation.poll_seconds = seconds;
        }
        if let Ok(val) = std::env::var("GROWCTL_HARDWARE")
            && let Ok(enabled) = val.parse()
        {
            self.hardware.enabled = enabled;
        }
        if let Ok(val) = std::env::var("GROWCTL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.automation.poll_seconds == 0 {
            return Err(ConfigError::Validation(
                "poll_seconds must be non-zero".to_string(),
            ));
        }
        if self.thresholds.watering_seconds == 0 {
            return Err(ConfigError::Validation(
                "watering_seconds must be non-zero".to_string(),
            ));
        }
        if self.thresholds.temp_min >= self.thresholds.temp_max {
            return Err(ConfigError::Validation(
                "temp_min must be below temp_max".to_string(),
            ));
        }
        if self.thresholds.humidity_min >= self.thresholds.humidity_max {
            return Err(ConfigError::Validation(
                "humidity_min must be below humidity_max".to_string(),
            ));
        }
        self.pins
            .validate()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;
        Ok(())
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self { poll_seconds: 30 }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "growctld=info,growctl=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
