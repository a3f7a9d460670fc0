//! Hardware abstraction layer for the PCM line-coding modulator
//!
//! This crate provides the seams between pure signal generation and the
//! single-board computer that bit-bangs the result, enabling development and
//! testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (modulator crate: request validation, CLI)
//!         ↓
//! Feature Layers (linecode encoders, transmitter driver)
//!         ↓
//! Platform HAL (this crate - pins, clock, configuration)
//!         ↓
//! Hardware Layer (rppal on Raspberry Pi, mocks on the host)
//! ```
//!
//! # Seams
//!
//! - [`PinProvider`] - hands out configured digital output pins
//! - [`Clock`] - monotonic time source used by the real-time pacing loop
//! - [`ModulatorConfig`] - bit duration, sample density, voltage levels, pin range
//!
//! # Features
//!
//! - `mocks`: Host-side mock implementations (for testing)
//!
//! # Example
//!
//! ```
//! use platform::{ModulatorConfig, PinRange};
//!
//! let config = ModulatorConfig::default();
//! let range: PinRange = config.pin_range().unwrap();
//! assert!(range.check(17).is_ok());
//! assert!(range.check(40).is_err());
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::doc_markdown)] // BCM pin names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod clock;
pub mod config;
pub mod gpio;
pub mod mocks;

pub use clock::{wait_until, Clock, MonotonicClock, SLEEP_QUANTUM, SPIN_THRESHOLD};
pub use config::{ConfigError, ModulatorConfig};
pub use gpio::{level_to_state, PinNumber, PinOutOfRange, PinProvider, PinRange};

#[cfg(any(test, feature = "mocks"))]
pub use mocks::{ManualClock, MockHardwareError, MockPinProvider, PinProbe, RecordingPin};
