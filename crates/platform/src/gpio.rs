//! GPIO pin abstraction layer
//!
//! Pin numbers are BCM numbers as printed on the Raspberry Pi header
//! documentation. A [`PinRange`] bounds which of them a request may drive;
//! a [`PinProvider`] turns a validated number into a live output pin.

use core::fmt;

use embedded_hal::digital::{OutputPin, PinState};
use serde::{Deserialize, Serialize};

/// BCM GPIO pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct PinNumber(u8);

impl PinNumber {
    /// Wrap a raw BCM number without range checking.
    ///
    /// Prefer [`PinRange::check`] for anything that came from a caller.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// Return the raw BCM number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PinNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a pin lies outside the configured range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("GPIO pin {pin} is outside the allowed range ({min}-{max})")]
pub struct PinOutOfRange {
    /// The rejected pin, as supplied by the caller.
    pub pin: i64,
    /// The inclusive minimum allowed pin.
    pub min: u8,
    /// The inclusive maximum allowed pin.
    pub max: u8,
}

/// Closed interval `[min, max]` of pins a request may drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRange {
    min: u8,
    max: u8,
}

impl PinRange {
    /// Create a range. Returns `None` when `min > max`.
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Option<Self> {
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Inclusive lower bound.
    pub const fn min(&self) -> u8 {
        self.min
    }

    /// Inclusive upper bound.
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Number of pins in the range.
    pub const fn len(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    /// A closed range always holds at least one pin.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if `pin` lies inside the range.
    pub fn contains(&self, pin: PinNumber) -> bool {
        (self.min..=self.max).contains(&pin.get())
    }

    /// Validate a caller-supplied pin number.
    ///
    /// Accepts any integer so that negative or oversized values produce the
    /// same error as ordinary out-of-range pins.
    pub fn check(&self, pin: impl Into<i64>) -> Result<PinNumber, PinOutOfRange> {
        let raw = pin.into();
        u8::try_from(raw)
            .ok()
            .map(PinNumber::new)
            .filter(|p| self.contains(*p))
            .ok_or(PinOutOfRange {
                pin: raw,
                min: self.min,
                max: self.max,
            })
    }
}

/// Map a voltage sample to a logic level: strictly positive is high.
///
/// Bipolar lows and unipolar zeros both drive the pin low.
#[must_use]
pub fn level_to_state(voltage: f64) -> PinState {
    PinState::from(voltage > 0.0)
}

/// Source of configured digital output pins (the "hardware interface").
///
/// Implementations hand out a pin already configured as a push-pull output
/// driven low. Dropping the returned pin must release it back to its reset
/// state.
pub trait PinProvider {
    /// Output pin type handed out by this provider.
    type Pin: OutputPin;

    /// Error returned when a pin cannot be claimed or configured.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Claim `pin` as a digital output with initial level low.
    fn output_pin(&mut self, pin: PinNumber) -> Result<Self::Pin, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(PinRange::new(27, 2).is_none());
        assert!(PinRange::new(5, 5).is_some());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = PinRange::new(2, 27).unwrap();
        assert_eq!(range.check(2), Ok(PinNumber::new(2)));
        assert_eq!(range.check(27), Ok(PinNumber::new(27)));
        assert_eq!(range.len(), 26);
    }

    #[test]
    fn test_range_rejects_outside_values() {
        let range = PinRange::new(2, 27).unwrap();
        for raw in [-1_i64, 0, 1, 28, 255, 256, 10_000] {
            let err = range.check(raw).unwrap_err();
            assert_eq!(err.pin, raw);
            assert_eq!((err.min, err.max), (2, 27));
        }
    }

    #[test]
    fn test_out_of_range_message_names_the_range() {
        let range = PinRange::new(2, 27).unwrap();
        let err = range.check(40).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GPIO pin 40 is outside the allowed range (2-27)"
        );
    }

    #[test]
    fn test_level_to_state_threshold() {
        assert_eq!(level_to_state(1.0), PinState::High);
        assert_eq!(level_to_state(0.0), PinState::Low);
        assert_eq!(level_to_state(-1.0), PinState::Low);
        assert_eq!(level_to_state(1e-9), PinState::High);
    }

    #[test]
    fn test_pin_number_serializes_transparently() {
        let json = serde_json::to_string(&PinNumber::new(17)).unwrap();
        assert_eq!(json, "17");
    }
}
