//! Voltage levels written by the encoders.

use platform::config::{ModulatorConfig, VOLTAGE_HIGH, VOLTAGE_LOW_BIPOLAR, VOLTAGE_LOW_UNIPOLAR};

/// The three levels a line code may emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageLevels {
    /// Positive level
    pub high: f64,
    /// Negative level of bipolar codes
    pub low_bipolar: f64,
    /// Zero level of unipolar codes
    pub low_unipolar: f64,
}

impl Default for VoltageLevels {
    fn default() -> Self {
        Self {
            high: VOLTAGE_HIGH,
            low_bipolar: VOLTAGE_LOW_BIPOLAR,
            low_unipolar: VOLTAGE_LOW_UNIPOLAR,
        }
    }
}

impl VoltageLevels {
    /// Levels taken from a runtime configuration.
    pub fn from_config(config: &ModulatorConfig) -> Self {
        Self {
            high: config.voltage_high,
            low_bipolar: config.voltage_low_bipolar,
            low_unipolar: config.voltage_low_unipolar,
        }
    }
}
