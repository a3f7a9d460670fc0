//! Raspberry Pi backend over `rppal`.

use platform::{PinNumber, PinProvider};
use rppal::gpio::{Gpio, OutputPin};

/// Pins of the on-board BCM GPIO controller.
///
/// Pins are returned to their previous mode when the [`OutputPin`] drops.
pub struct RaspberryPiPins {
    gpio: Gpio,
}

impl RaspberryPiPins {
    /// Open the GPIO controller.
    ///
    /// Fails on anything that is not a Raspberry Pi or when `/dev/gpiomem`
    /// is not accessible; callers treat that as "GPIO unavailable".
    pub fn new() -> Result<Self, rppal::gpio::Error> {
        let gpio = Gpio::new()?;
        tracing::info!("rppal GPIO controller opened");
        Ok(Self { gpio })
    }
}

impl PinProvider for RaspberryPiPins {
    type Pin = OutputPin;
    type Error = rppal::gpio::Error;

    fn output_pin(&mut self, pin: PinNumber) -> Result<Self::Pin, Self::Error> {
        Ok(self.gpio.get(pin.get())?.into_output_low())
    }
}
