//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application. Everything that shapes a waveform or bounds a request
//! references these constants (through [`ModulatorConfig`]) rather than
//! hardcoding values.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gpio::{PinNumber, PinRange};

/// The application name
pub const APP_NAME: &str = "PCM Signal Modulator";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of bits in every message
pub const MESSAGE_BITS: usize = 5;

/// Default bit duration in seconds
pub const DEFAULT_BIT_DURATION_S: f64 = 0.1;

/// Default number of samples generated per bit
pub const DEFAULT_SAMPLES_PER_BIT: i32 = 100;

/// Level used for a high half or a positive mark
pub const VOLTAGE_HIGH: f64 = 1.0;

/// Low level of bipolar line codes
pub const VOLTAGE_LOW_BIPOLAR: f64 = -1.0;

/// Low (zero) level of unipolar line codes
pub const VOLTAGE_LOW_UNIPOLAR: f64 = 0.0;

/// Default output pin (BCM 17, header pin 11)
pub const DEFAULT_OUTPUT_PIN: u8 = 17;

/// Lowest pin a request may drive
pub const GPIO_PIN_MIN: u8 = 2;

/// Highest pin a request may drive
pub const GPIO_PIN_MAX: u8 = 27;

/// Full application title (name + version)
pub fn app_title() -> String {
    format!("{APP_NAME} v{APP_VERSION}")
}

/// Errors reported by [`ModulatorConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Bit duration is zero, negative, or not a finite number
    #[error("bit duration must be a positive number of seconds (got {0})")]
    BitDuration(f64),
    /// `pin_min` is greater than `pin_max`
    #[error("pin range {min}-{max} is inverted")]
    PinRange {
        /// Configured lower bound
        min: u8,
        /// Configured upper bound
        max: u8,
    },
    /// The default pin is not inside the pin range
    #[error("default pin {pin} is outside the pin range {min}-{max}")]
    DefaultPin {
        /// Configured default pin
        pin: u8,
        /// Configured lower bound
        min: u8,
        /// Configured upper bound
        max: u8,
    },
    /// Bipolar low level is not negative
    #[error("bipolar low level must be negative (got {0})")]
    BipolarLow(f64),
    /// High level is not positive
    #[error("high level must be positive (got {0})")]
    High(f64),
}

/// Runtime configuration consumed by the encoders and the transmitter.
///
/// `Default` reproduces the compile-time constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulatorConfig {
    /// Seconds per bit
    pub bit_duration_s: f64,
    /// Samples per bit; values below 1 are treated as 1
    pub samples_per_bit: i32,
    /// High level
    pub voltage_high: f64,
    /// Negative low level of bipolar codes
    pub voltage_low_bipolar: f64,
    /// Zero level of unipolar codes
    pub voltage_low_unipolar: f64,
    /// Inclusive lower pin bound
    pub pin_min: u8,
    /// Inclusive upper pin bound
    pub pin_max: u8,
    /// Pin used when a request names none
    pub default_pin: u8,
}

impl Default for ModulatorConfig {
    fn default() -> Self {
        Self {
            bit_duration_s: DEFAULT_BIT_DURATION_S,
            samples_per_bit: DEFAULT_SAMPLES_PER_BIT,
            voltage_high: VOLTAGE_HIGH,
            voltage_low_bipolar: VOLTAGE_LOW_BIPOLAR,
            voltage_low_unipolar: VOLTAGE_LOW_UNIPOLAR,
            pin_min: GPIO_PIN_MIN,
            pin_max: GPIO_PIN_MAX,
            default_pin: DEFAULT_OUTPUT_PIN,
        }
    }
}

impl ModulatorConfig {
    /// Check every field that cannot be silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bit_duration_s.is_finite() && self.bit_duration_s > 0.0) {
            return Err(ConfigError::BitDuration(self.bit_duration_s));
        }
        if !(self.voltage_high.is_finite() && self.voltage_high > 0.0) {
            return Err(ConfigError::High(self.voltage_high));
        }
        if !(self.voltage_low_bipolar.is_finite() && self.voltage_low_bipolar < 0.0) {
            return Err(ConfigError::BipolarLow(self.voltage_low_bipolar));
        }
        let range = self.pin_range()?;
        if !range.contains(PinNumber::new(self.default_pin)) {
            return Err(ConfigError::DefaultPin {
                pin: self.default_pin,
                min: self.pin_min,
                max: self.pin_max,
            });
        }
        Ok(())
    }

    /// Samples per bit after clamping to at least one.
    pub fn effective_samples_per_bit(&self) -> usize {
        usize::try_from(self.samples_per_bit.max(1)).unwrap_or(1)
    }

    /// Allowed pin range.
    pub fn pin_range(&self) -> Result<PinRange, ConfigError> {
        PinRange::new(self.pin_min, self.pin_max).ok_or(ConfigError::PinRange {
            min: self.pin_min,
            max: self.pin_max,
        })
    }

    /// Time each sample is held on the pin.
    ///
    /// Falls back to zero for a configuration that has not been validated
    /// and carries an unusable bit duration.
    pub fn sample_duration(&self) -> Duration {
        #[allow(clippy::cast_precision_loss)] // samples_per_bit is far below 2^52
        let secs = self.bit_duration_s / self.effective_samples_per_bit() as f64;
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }

    /// Default output pin as a [`PinNumber`].
    pub fn default_pin(&self) -> PinNumber {
        PinNumber::new(self.default_pin)
    }
}
