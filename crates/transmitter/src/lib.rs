//! Bit-banged GPIO transmitter
//!
//! Owns the process's single GPIO backend and plays sampled waveforms on it
//! in real time. At most one transmission runs at a time; a second caller is
//! turned away with [`TransmitError::Busy`] instead of waiting.
//!
//! # Backends
//!
//! - [`SimulatedPins`] - logs edges through `tracing`, for hosts without GPIO
//! - `RaspberryPiPins` - `rppal` on a Raspberry Pi (`raspberry-pi` feature)
//! - any other [`platform::PinProvider`], e.g. the mocks used in tests
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use platform::{MonotonicClock, PinRange};
//! use transmitter::{GpioStatus, GpioTransmitter, SimulatedPins};
//!
//! let tx = GpioTransmitter::new(
//!     Some(SimulatedPins::new()),
//!     MonotonicClock::new(),
//!     Duration::from_micros(10),
//!     PinRange::new(2, 27).unwrap(),
//! );
//! let summary = tx.transmit(17, &[0.0, 0.00001], &[1.0, -1.0]).unwrap();
//! assert_eq!(summary.edges, 2);
//! assert_eq!(tx.status(), GpioStatus::Idle);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod driver;
pub mod error;
#[cfg(feature = "raspberry-pi")]
pub mod rpi;
pub mod sim;
pub mod state;

pub use driver::{GpioTransmitter, TransmitGuard, TransmitSummary};
pub use error::{TransmissionFault, TransmitError};
#[cfg(feature = "raspberry-pi")]
pub use rpi::RaspberryPiPins;
pub use sim::{SimulatedPin, SimulatedPins};
pub use state::{DriverState, GpioStatus};
