//! TOML configuration for the terminal adapter.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use wumpus_core::{HardwareError, TICK_INTERVAL};
use wumpus_system_input::Config as InputConfig;

/// Everything the adapter reads from its configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Joystick and button thresholds.
    pub(crate) input: InputConfig,
    /// Tick pacing.
    pub(crate) timing: TimingConfig,
    /// Cave generation randomness.
    pub(crate) rng: RngConfig,
}

/// Pacing of the tick loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct TimingConfig {
    /// Time between two input samples, in milliseconds.
    pub(crate) tick_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL.as_millis() as u64,
        }
    }
}

/// Seed selection for cave generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct RngConfig {
    /// Fixed seed; entropy is used when absent.
    pub(crate) seed: Option<u64>,
}

impl AppConfig {
    /// Reads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Duration of one tick.
    pub(crate) const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timing.tick_interval_ms)
    }

    /// Checks the settings the way hardware bring-up would.
    pub(crate) fn validate(&self) -> Result<(), HardwareError> {
        if self.input.lower_limit >= self.input.upper_limit {
            return Err(HardwareError::Calibration {
                lower: self.input.lower_limit,
                upper: self.input.upper_limit,
            });
        }
        if self.timing.tick_interval_ms == 0 {
            return Err(HardwareError::Timer {
                interval: self.tick_interval(),
            });
        }
        Ok(())
    }
}
