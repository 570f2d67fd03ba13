use super::constant::*;
use crate::{circuitbreaker::Settings, utils, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// `BreakerConfig` is the declarative form of a circuit breaker's `Settings`.
/// Zero values fall back to the defaults when the breaker is constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// name of the breaker, unique within a `BreakerManager`
    pub name: String,
    /// max probe requests admitted in the half-open state, 0 means 1
    pub max_requests: u32,
    /// cyclic period (in ms) of the closed state to clear the counts, 0 disables it
    pub interval_ms: u64,
    /// period (in ms) of the open state before probing, 0 means 60s
    pub timeout_ms: u64,
    /// trip to open once consecutive failures exceed this value,
    /// the default trip policy (more than 5) is used if absent
    pub max_consecutive_failures: Option<u32>,
}

impl BreakerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        BreakerConfig {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn check(&self) -> Result<()> {
        if utils::is_blank(&self.name) {
            return Err(Error::msg("empty breaker name"));
        }
        Ok(())
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::new(self.name.clone())
            .with_max_requests(self.max_requests)
            .with_interval(Duration::from_millis(self.interval_ms))
            .with_timeout(Duration::from_millis(self.timeout_ms));
        if let Some(threshold) = self.max_consecutive_failures {
            settings =
                settings.with_ready_to_trip(move |counts| counts.consecutive_failures > threshold);
        }
        settings
    }
}

impl From<&BreakerConfig> for Settings {
    fn from(config: &BreakerConfig) -> Self {
        config.to_settings()
    }
}

impl fmt::Display for BreakerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmtted = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", fmtted)
    }
}

// LogConfig represent the configuration of logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // config_file is only read by the log4rs backend
    pub config_file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            config_file: LOG_CONFIG_FILE.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigEntity {
    pub version: String,
    pub log: LogConfig,
    pub breakers: Vec<BreakerConfig>,
}

impl Default for ConfigEntity {
    fn default() -> Self {
        ConfigEntity {
            version: CONFIG_VERSION.into(),
            log: LogConfig::default(),
            breakers: Vec::new(),
        }
    }
}

impl ConfigEntity {
    pub fn new() -> Self {
        ConfigEntity::default()
    }

    pub fn check(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(Error::msg("empty version"));
        }
        let mut names = HashSet::with_capacity(self.breakers.len());
        for breaker in &self.breakers {
            breaker.check()?;
            if !names.insert(breaker.name.as_str()) {
                return Err(Error::msg(format!(
                    "duplicated breaker name: {}",
                    breaker.name
                )));
            }
        }
        Ok(())
    }
}
