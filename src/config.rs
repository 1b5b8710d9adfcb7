//! Facility configuration: capacity limits, the rate sheet, the near-expiry
//! window, and logging settings, with a builder and environment overrides.

use serde::{Deserialize, Serialize};

use crate::error::{FacilityError, Result};
use crate::membership::DEFAULT_NEAR_EXPIRY_DAYS;
use crate::occupancy::CapacityLimits;
use crate::tariff::RateSheet;

/// Main configuration for a forecourt facility
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub capacity: CapacityLimits,
    #[serde(default)]
    pub rates: RateSheet,
    #[serde(default = "default_near_expiry_days")]
    pub near_expiry_days: i64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: CapacityLimits::default(),
            rates: RateSheet::default(),
            near_expiry_days: default_near_expiry_days(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_near_expiry_days() -> i64 {
    DEFAULT_NEAR_EXPIRY_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn get_env_with_prefix(name: &str) -> Option<String> {
    std::env::var(format!("FORECOURT_{}", name)).ok()
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set all three class capacities at once.
    pub fn with_capacity(mut self, car: u32, motorcycle: u32, truck: u32) -> Self {
        self.config.capacity = CapacityLimits {
            car,
            motorcycle,
            truck,
        };
        self
    }

    pub fn with_capacity_limits(mut self, capacity: CapacityLimits) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn with_rates(mut self, rates: RateSheet) -> Self {
        self.config.rates = rates;
        self
    }

    pub fn with_near_expiry_days(mut self, days: i64) -> Self {
        self.config.near_expiry_days = days;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load configuration from environment variables with FORECOURT_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(car) = get_env_with_prefix("CAPACITY_CAR") {
            if let Ok(n) = car.parse() {
                self.config.capacity.car = n;
            }
        }
        if let Some(motorcycle) = get_env_with_prefix("CAPACITY_MOTORCYCLE") {
            if let Ok(n) = motorcycle.parse() {
                self.config.capacity.motorcycle = n;
            }
        }
        if let Some(truck) = get_env_with_prefix("CAPACITY_TRUCK") {
            if let Ok(n) = truck.parse() {
                self.config.capacity.truck = n;
            }
        }
        if let Some(days) = get_env_with_prefix("NEAR_EXPIRY_DAYS") {
            if let Ok(n) = days.parse() {
                self.config.near_expiry_days = n;
            }
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration is invalid:
    /// - A non-positive rate anywhere in the rate sheet
    /// - A negative near-expiry window
    /// - An unknown log level
    pub fn build(self) -> Result<Config> {
        if !self.config.rates.all_positive() {
            return Err(FacilityError::validation(
                "All rates must be greater than zero",
            ));
        }

        if self.config.near_expiry_days < 0 {
            return Err(FacilityError::validation(
                "Near-expiry window must not be negative",
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(FacilityError::validation(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
