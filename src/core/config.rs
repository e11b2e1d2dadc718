/*!
 * Pipeline Configuration
 *
 * Defaults come from `core::limits`. An optional JSON file and individual
 * environment variables override them, in that order:
 *
 * - `ACK_CONFIG`: JSON file for `AckConfig`
 * - `ACK_WORKERS`, `ACK_ITEMS`
 * - `SENSOR_CONFIG`: JSON file for `SensorConfig`
 * - `SENSOR_GENERATORS`, `SENSOR_CYCLES`, `SENSOR_CAPACITY`,
 *   `SENSOR_INTERVAL_MS`, `SENSOR_PERIOD_MS`
 */

use super::errors::{ConfigError, ConfigResult};
use super::limits;
use super::types::Temperature;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use time::UtcOffset;
use tracing::{debug, warn};

/// Acknowledgment pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AckConfig {
    /// Worker tasks draining the pending FIFO
    pub workers: usize,
    /// Items submitted before the workers start
    pub items: usize,
}

impl Default for AckConfig {
    fn default() -> Self {
        Self {
            workers: limits::DEFAULT_ACK_WORKERS,
            items: limits::DEFAULT_PENDING_ITEMS,
        }
    }
}

impl AckConfig {
    pub const FILE_VAR: &'static str = "ACK_CONFIG";

    /// Defaults, then `ACK_CONFIG` file, then per-field variables
    pub fn from_env() -> ConfigResult<Self> {
        let mut config: Self = load_file_var(Self::FILE_VAR)?;

        if let Some(workers) = env_usize("ACK_WORKERS")? {
            config.workers = workers;
        }
        if let Some(items) = env_usize("ACK_ITEMS")? {
            config.items = items;
        }

        config.validate()?;
        debug!(?config, "Acknowledgment config loaded");
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.workers == 0 {
            return Err(invalid("workers", "at least one worker is required"));
        }
        Ok(())
    }
}

/// Sensor pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Generator tasks writing samples
    pub generators: usize,
    /// Ring buffer capacity in samples
    pub capacity: usize,
    /// Report cycles before the pipeline finishes
    pub cycles: usize,
    pub report_interval_ms: u64,
    pub generator_period_ms: u64,
    pub min_temperature: Temperature,
    pub max_temperature: Temperature,
    /// Entries in each highest/lowest ranking
    pub rank_count: usize,
    /// Index span of the maximum-delta scan
    pub window_width: usize,
    /// Offset used when rendering timestamps; not read from files
    #[serde(skip, default = "utc")]
    pub utc_offset: UtcOffset,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            generators: limits::DEFAULT_SENSOR_GENERATORS,
            capacity: limits::DEFAULT_BUFFER_CAPACITY,
            cycles: limits::DEFAULT_REPORT_CYCLES,
            report_interval_ms: limits::DEFAULT_REPORT_INTERVAL.as_millis() as u64,
            generator_period_ms: limits::DEFAULT_GENERATOR_PERIOD.as_millis() as u64,
            min_temperature: limits::MIN_TEMPERATURE,
            max_temperature: limits::MAX_TEMPERATURE,
            rank_count: limits::RANK_COUNT,
            window_width: limits::WINDOW_WIDTH,
            utc_offset: UtcOffset::UTC,
        }
    }
}

impl SensorConfig {
    pub const FILE_VAR: &'static str = "SENSOR_CONFIG";

    /// Defaults, then `SENSOR_CONFIG` file, then per-field variables
    pub fn from_env() -> ConfigResult<Self> {
        let mut config: Self = load_file_var(Self::FILE_VAR)?;

        if let Some(generators) = env_usize("SENSOR_GENERATORS")? {
            config.generators = generators;
        }
        if let Some(cycles) = env_usize("SENSOR_CYCLES")? {
            config.cycles = cycles;
        }
        if let Some(capacity) = env_usize("SENSOR_CAPACITY")? {
            config.capacity = capacity;
        }
        if let Some(interval) = env_usize("SENSOR_INTERVAL_MS")? {
            config.report_interval_ms = interval as u64;
        }
        if let Some(period) = env_usize("SENSOR_PERIOD_MS")? {
            config.generator_period_ms = period as u64;
        }

        config.validate()?;
        debug!(?config, "Sensor config loaded");
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config: Self = read_json(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Render timestamps in the host's local offset
    ///
    /// Must run before any other thread is spawned: the local offset cannot
    /// be determined soundly from a multi-threaded process, in which case
    /// UTC is kept.
    pub fn with_local_offset(mut self) -> Self {
        match UtcOffset::current_local_offset() {
            Ok(offset) => self.utc_offset = offset,
            Err(e) => warn!(error = %e, "Local UTC offset unavailable, reporting in UTC"),
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.generators == 0 {
            return Err(invalid("generators", "at least one generator is required"));
        }
        if self.capacity == 0 {
            return Err(invalid("capacity", "buffer capacity must be at least 1"));
        }
        if self.window_width == 0 {
            return Err(invalid("window_width", "window width must be at least 1"));
        }
        if self.min_temperature > self.max_temperature {
            return Err(invalid(
                "min_temperature",
                format!(
                    "range {}..={} is empty",
                    self.min_temperature, self.max_temperature
                ),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    #[inline]
    pub fn generator_period(&self) -> Duration {
        Duration::from_millis(self.generator_period_ms)
    }

    #[inline]
    pub fn temperature_range(&self) -> RangeInclusive<Temperature> {
        self.min_temperature..=self.max_temperature
    }
}

fn utc() -> UtcOffset {
    UtcOffset::UTC
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn env_usize(var: &'static str) -> ConfigResult<Option<usize>> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
        Err(_) => Ok(None),
    }
}

fn load_file_var<T: DeserializeOwned + Default>(var: &str) -> ConfigResult<T> {
    match std::env::var_os(var) {
        Some(path) => read_json(Path::new(&path)),
        None => Ok(T::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
