//! Request model shared by the plot and send paths.

use linecode::{BinaryMessage, ModulationType};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Most pins one request may name.
pub const MAX_OUTPUT_PINS: usize = 32;

/// Bounded list of requested pins, as supplied by the caller.
pub type PinList = heapless::Vec<i64, MAX_OUTPUT_PINS>;

/// A message, a line code and (for the send path) target pins.
///
/// Deserializes from the JSON body the plot and send operations accept:
///
/// ```json
/// { "binary_data": "10110", "modulation_type": "Manchester (Bi-phase L)", "output_pins": [17, 18] }
/// ```
///
/// `output_pins` may be omitted; the configured default pin is used then.
/// Pins are kept as raw integers so out-of-range values reach the range
/// check and are reported, not silently truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulateRequest {
    /// Five binary digits
    pub binary_data: String,
    /// Line code to apply
    pub modulation_type: ModulationType,
    /// BCM pins to drive, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_pins: Option<PinList>,
}

impl ModulateRequest {
    /// Request without explicit pins.
    pub fn new(binary_data: impl Into<String>, modulation_type: ModulationType) -> Self {
        Self {
            binary_data: binary_data.into(),
            modulation_type,
            output_pins: None,
        }
    }

    /// Set the target pins.
    pub fn with_pins(mut self, pins: impl IntoIterator<Item = i64>) -> Result<Self, ServiceError> {
        let mut list = PinList::new();
        for pin in pins {
            list.push(pin).map_err(|_| ServiceError::TooManyPins {
                max: MAX_OUTPUT_PINS,
            })?;
        }
        self.output_pins = Some(list);
        Ok(self)
    }

    /// Parse `binary_data`.
    pub fn message(&self) -> Result<BinaryMessage, ServiceError> {
        self.binary_data
            .parse::<BinaryMessage>()
            .map_err(|err| ServiceError::Generate(err.into()))
    }

    /// Requested pins, or `[default_pin]` when none were given.
    pub fn pins_or(&self, default_pin: u8) -> Vec<i64> {
        match &self.output_pins {
            Some(pins) => pins.to_vec(),
            None => vec![i64::from(default_pin)],
        }
    }
}
