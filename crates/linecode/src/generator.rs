//! Message validation plus encoder dispatch.

use platform::config::{ModulatorConfig, MESSAGE_BITS};

use crate::encoder;
use crate::grid::SampleGrid;
use crate::levels::VoltageLevels;
use crate::message::{BinaryMessage, MessageError};
use crate::modulation::{ModulationRegistry, ModulationType, ParseModulationError};
use crate::signal::Signal;

/// Errors raised before any encoder runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Message is not a 5-digit binary string
    #[error("invalid input: {0}")]
    InvalidInput(#[from] MessageError),
    /// No encoder for the requested modulation
    #[error("modulation type '{0}' is not supported")]
    UnsupportedModulation(String),
}

impl From<ParseModulationError> for GenerateError {
    fn from(err: ParseModulationError) -> Self {
        Self::UnsupportedModulation(err.0)
    }
}

/// Turns `(modulation, message)` into a sampled waveform.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    registry: ModulationRegistry,
    grid: SampleGrid,
    levels: VoltageLevels,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::from_config(&ModulatorConfig::default())
    }
}

impl SignalGenerator {
    /// Generator with explicit parts.
    pub fn new(registry: ModulationRegistry, grid: SampleGrid, levels: VoltageLevels) -> Self {
        Self {
            registry,
            grid,
            levels,
        }
    }

    /// Standard registry, grid and levels derived from `config`.
    pub fn from_config(config: &ModulatorConfig) -> Self {
        let grid = SampleGrid::new(
            MESSAGE_BITS,
            config.effective_samples_per_bit(),
            config.bit_duration_s,
        );
        Self::new(
            ModulationRegistry::standard(),
            grid,
            VoltageLevels::from_config(config),
        )
    }

    /// Grid every generated signal is laid out on.
    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Dispatch table in use.
    pub fn registry(&self) -> &ModulationRegistry {
        &self.registry
    }

    /// Validate `message` and encode it.
    ///
    /// The message is checked before the registry is consulted, so a bad
    /// message never reaches an encoder.
    pub fn generate(&self, modulation: ModulationType, message: &str) -> Result<Signal, GenerateError> {
        let message: BinaryMessage = message.parse()?;
        self.encode(modulation, &message)
    }

    /// Like [`generate`](Self::generate) with the modulation given by name.
    pub fn generate_named(&self, modulation: &str, message: &str) -> Result<Signal, GenerateError> {
        let modulation: ModulationType = modulation.parse()?;
        self.generate(modulation, message)
    }

    /// Encode an already validated message.
    pub fn encode(&self, modulation: ModulationType, message: &BinaryMessage) -> Result<Signal, GenerateError> {
        let encode = self
            .registry
            .get(modulation)
            .ok_or_else(|| GenerateError::UnsupportedModulation(modulation.name().to_owned()))?;
        Ok(Signal {
            time_axis: self.grid.time_axis(),
            samples: encode(message, &self.grid, &self.levels),
        })
    }

    /// The raw 0/1 bit levels on the same grid.
    pub fn original(&self, message: &str) -> Result<Signal, GenerateError> {
        let message: BinaryMessage = message.parse()?;
        Ok(self.original_bits(&message))
    }

    /// The raw 0/1 bit levels of an already validated message.
    pub fn original_bits(&self, message: &BinaryMessage) -> Signal {
        Signal {
            time_axis: self.grid.time_axis(),
            samples: encoder::original_signal(message, &self.grid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_default_lengths() {
        let generator = SignalGenerator::default();
        let signal = generator.generate(ModulationType::NrzM, "10110").unwrap();
        assert_eq!(signal.time_axis.len(), 500);
        assert_eq!(signal.samples.len(), 500);
    }

    #[test]
    fn test_invalid_message_is_reported_before_lookup() {
        let generator = SignalGenerator::new(
            ModulationRegistry::empty(),
            SampleGrid::new(5, 10, 0.1),
            VoltageLevels::default(),
        );
        let err = generator.generate(ModulationType::NrzM, "101").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_encoder_is_unsupported() {
        let generator = SignalGenerator::new(
            ModulationRegistry::empty(),
            SampleGrid::new(5, 10, 0.1),
            VoltageLevels::default(),
        );
        assert_eq!(
            generator.generate(ModulationType::BipolarAmi, "10110"),
            Err(GenerateError::UnsupportedModulation("Bipolar AMI".to_owned()))
        );
    }

    #[test]
    fn test_generate_named_rejects_unknown_name() {
        let generator = SignalGenerator::default();
        assert_eq!(
            generator.generate_named("FSK", "10110"),
            Err(GenerateError::UnsupportedModulation("FSK".to_owned()))
        );
        assert!(generator.generate_named("ami", "11111").is_ok());
    }

    #[test]
    fn test_config_samples_per_bit_is_clamped() {
        let config = ModulatorConfig {
            samples_per_bit: 0,
            ..ModulatorConfig::default()
        };
        let generator = SignalGenerator::from_config(&config);
        let signal = generator.generate(ModulationType::Manchester, "00000").unwrap();
        assert_eq!(signal.len(), 5);
    }

    #[test]
    fn test_original_matches_bits() {
        let config = ModulatorConfig {
            samples_per_bit: 1,
            ..ModulatorConfig::default()
        };
        let generator = SignalGenerator::from_config(&config);
        let signal = generator.original("01101").unwrap();
        assert_eq!(signal.samples, vec![0.0, 1.0, 1.0, 0.0, 1.0]);
    }
}
