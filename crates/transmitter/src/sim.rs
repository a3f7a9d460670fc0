//! Log-only pin backend for hosts without GPIO.
//!
//! Lets the full transmit path (lock, pacing, cleanup) run on a development
//! machine; every edge is reported through `tracing` instead of a wire.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use platform::{PinNumber, PinProvider};

/// [`PinProvider`] whose pins only log.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedPins;

impl SimulatedPins {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

impl PinProvider for SimulatedPins {
    type Pin = SimulatedPin;
    type Error = Infallible;

    fn output_pin(&mut self, pin: PinNumber) -> Result<Self::Pin, Self::Error> {
        tracing::debug!(pin = pin.get(), "simulated pin claimed");
        Ok(SimulatedPin {
            pin: pin.get(),
            level: PinState::Low,
            edges: 0,
        })
    }
}

/// Output pin that tracks its level and counts edges.
#[derive(Debug)]
pub struct SimulatedPin {
    pin: u8,
    level: PinState,
    edges: usize,
}

impl SimulatedPin {
    /// Current level.
    pub fn level(&self) -> PinState {
        self.level
    }

    /// Number of level changes so far.
    pub fn edges(&self) -> usize {
        self.edges
    }

    fn set(&mut self, level: PinState) {
        if level != self.level {
            self.edges = self.edges.saturating_add(1);
            tracing::trace!(pin = self.pin, high = level == PinState::High, "edge");
        }
        self.level = level;
    }
}

impl ErrorType for SimulatedPin {
    type Error = Infallible;
}

impl OutputPin for SimulatedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(PinState::High);
        Ok(())
    }
}

impl Drop for SimulatedPin {
    fn drop(&mut self) {
        tracing::debug!(pin = self.pin, edges = self.edges, "simulated pin released");
    }
}
