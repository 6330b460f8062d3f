//! Runtime configuration for the control loop.

use std::path::PathBuf;
use std::time::Duration;

use rotary_servo_io::DEFAULT_SYSFS_ROOT;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Poll interval outside the supported range.
    #[error("tick interval must be between 1 and 1000 ms, got {0:?}")]
    TickInterval(Duration),

    /// Empty sysfs root path.
    #[error("sysfs root must not be empty")]
    EmptyRoot,
}

/// Control loop configuration.
///
/// Line and channel numbers are fixed hardware wiring and deliberately not
/// part of this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlConfig {
    /// Class directory the sysfs backend is rooted at.
    pub sysfs_root: PathBuf,
    /// Sleep between poll iterations.
    pub tick_interval: Duration,
}

impl ControlConfig {
    /// Shortest supported poll interval.
    pub const MIN_TICK: Duration = Duration::from_millis(1);
    /// Longest supported poll interval.
    pub const MAX_TICK: Duration = Duration::from_millis(1000);

    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range.
    pub fn new(
        sysfs_root: impl Into<PathBuf>,
        tick_interval: Duration,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            sysfs_root: sysfs_root.into(),
            tick_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_TICK..=Self::MAX_TICK).contains(&self.tick_interval) {
            return Err(ConfigError::TickInterval(self.tick_interval));
        }
        if self.sysfs_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRoot);
        }
        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            tick_interval: Self::MIN_TICK,
        }
    }
}
