//! Request handling: validation, generation, plotting and dispatch to GPIO.
//!
//! [`ModulatorService`] is built once per process and cloned into every
//! caller. Clones share one [`GpioTransmitter`], so the exclusive-use lock
//! spans the whole process.

use std::sync::Arc;

use linecode::{ModulationType, Signal, SignalGenerator, VoltageLevels};
use platform::{Clock, ConfigError, ModulatorConfig, MonotonicClock, PinProvider, PinRange};
use transmitter::{GpioTransmitter, TransmitError};

use crate::error::ServiceError;
use crate::plot::{self, PlotOptions};
use crate::request::ModulateRequest;
use crate::response::{GpioStatusReport, ModulationList, SendReport};

struct Inner<P, C> {
    config: ModulatorConfig,
    pins: PinRange,
    generator: SignalGenerator,
    transmitter: GpioTransmitter<P, C>,
}

/// Shared entry point for every operation.
pub struct ModulatorService<P, C = MonotonicClock> {
    inner: Arc<Inner<P, C>>,
}

impl<P, C> Clone for ModulatorService<P, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: PinProvider> ModulatorService<P, MonotonicClock> {
    /// Service over an optional backend, timed by the wall clock.
    pub fn from_config(config: ModulatorConfig, hardware: Option<P>) -> Result<Self, ConfigError> {
        let transmitter = GpioTransmitter::from_config(hardware, &config)?;
        Self::new(config, transmitter)
    }
}

impl<P: PinProvider, C: Clock> ModulatorService<P, C> {
    /// Service over an already built transmitter.
    pub fn new(config: ModulatorConfig, transmitter: GpioTransmitter<P, C>) -> Result<Self, ConfigError> {
        config.validate()?;
        let pins = config.pin_range()?;
        if !transmitter.is_functional() {
            tracing::warn!("no GPIO backend available; send requests will be refused");
        }
        Ok(Self {
            inner: Arc::new(Inner {
                generator: SignalGenerator::from_config(&config),
                pins,
                config,
                transmitter,
            }),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &ModulatorConfig {
        &self.inner.config
    }

    /// The shared transmitter.
    pub fn transmitter(&self) -> &GpioTransmitter<P, C> {
        &self.inner.transmitter
    }

    /// Encode `message` with `modulation`.
    pub fn generate(&self, modulation: ModulationType, message: &str) -> Result<Signal, ServiceError> {
        Ok(self.inner.generator.generate(modulation, message)?)
    }

    /// Raw 0/1 levels of `message` on the same grid.
    pub fn generate_original_signal(&self, message: &str) -> Result<Signal, ServiceError> {
        Ok(self.inner.generator.original(message)?)
    }

    /// PNG plot of the modulated signal.
    pub fn plot(&self, request: &ModulateRequest) -> Result<Vec<u8>, ServiceError> {
        tracing::info!(
            modulation = request.modulation_type.name(),
            binary_data = %request.binary_data,
            "plot requested"
        );
        let message = request.message()?;
        let generator = &self.inner.generator;
        let signal = generator.encode(request.modulation_type, &message)?;
        let original = generator.original_bits(&message);
        let grid = generator.grid();
        let options = PlotOptions::new(
            grid.bit_duration(),
            grid.total_duration(),
            VoltageLevels::from_config(&self.inner.config),
        );
        Ok(plot::render_png(
            &signal,
            &original,
            request.modulation_type.name(),
            &options,
        )?)
    }

    /// Generate the signal and play it on each requested pin in turn.
    ///
    /// Blocks for `pins * 5 * bit_duration`. Stops at the first pin that
    /// fails; the error lists the pins already completed.
    pub fn send_to_pins(&self, request: &ModulateRequest) -> Result<SendReport, ServiceError> {
        let pins = request.pins_or(self.inner.config.default_pin);
        tracing::info!(
            modulation = request.modulation_type.name(),
            binary_data = %request.binary_data,
            pins = pins.len(),
            "GPIO send requested"
        );
        if !self.inner.transmitter.is_functional() {
            return Err(ServiceError::Unavailable);
        }
        let message = request.message()?;
        let signal = self.inner.generator.encode(request.modulation_type, &message)?;

        let mut completed = Vec::with_capacity(pins.len());
        let mut transmissions = Vec::with_capacity(pins.len());
        for &raw in &pins {
            let pin = match self.inner.pins.check(raw) {
                Ok(pin) => pin,
                Err(source) => return Err(ServiceError::Pin { completed, source }),
            };
            match self
                .inner
                .transmitter
                .transmit(pin.get(), &signal.time_axis, &signal.samples)
            {
                Ok(summary) => {
                    completed.push(pin.get());
                    transmissions.push(summary);
                }
                Err(source) => {
                    if matches!(source, TransmitError::Busy) {
                        tracing::warn!(pin = pin.get(), "GPIO busy, aborting remaining pins");
                    }
                    return Err(ServiceError::Transmit {
                        pin: pin.get(),
                        completed,
                        source,
                    });
                }
            }
        }
        Ok(SendReport::completed(request.modulation_type, &pins, transmissions))
    }

    /// Current GPIO availability.
    pub fn status_report(&self) -> GpioStatusReport {
        GpioStatusReport::from(self.inner.transmitter.snapshot())
    }

    /// Display names of every modulation the generator can produce.
    pub fn supported_modulations(&self) -> ModulationList {
        ModulationList {
            supported_modulations: self
                .inner
                .generator
                .registry()
                .supported()
                .map(|m| m.name().to_owned())
                .collect(),
        }
    }
}

impl<P, C> ModulatorService<P, C>
where
    P: PinProvider + Send + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// [`send_to_pins`](Self::send_to_pins) on tokio's blocking pool.
    ///
    /// The pacing loop busy-waits, so it must never run on a runtime worker.
    pub async fn send_to_pins_async(&self, request: ModulateRequest) -> Result<SendReport, ServiceError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.send_to_pins(&request))
            .await
            .map_err(|err| ServiceError::Worker(err.to_string()))?
    }
}
