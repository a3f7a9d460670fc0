//! PCM line-coding encoders
//!
//! Converts a validated 5-bit [`BinaryMessage`] into a sampled waveform for
//! one of four line codes. Everything here is pure computation: no I/O, no
//! clock, no hardware.
//!
//! # Pipeline
//!
//! ```text
//! "10110" ──parse──▶ BinaryMessage
//!                         │
//!   ModulationType ──▶ ModulationRegistry ──▶ EncoderFn
//!                         │
//!                    SampleGrid + VoltageLevels
//!                         ↓
//!                  Signal { time_axis, samples }
//! ```
//!
//! # Example
//!
//! ```
//! use linecode::{ModulationType, SignalGenerator};
//!
//! let generator = SignalGenerator::default();
//! let signal = generator.generate(ModulationType::BipolarAmi, "11111").unwrap();
//! assert_eq!(signal.samples.len(), 500);
//! assert_eq!(signal.samples.first(), Some(&1.0));
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
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod encoder;
pub mod generator;
pub mod grid;
pub mod levels;
pub mod message;
pub mod modulation;
pub mod signal;

pub use encoder::EncoderFn;
pub use generator::{GenerateError, SignalGenerator};
pub use grid::{BitSpan, SampleGrid};
pub use levels::VoltageLevels;
pub use message::{BinaryMessage, MessageError};
pub use modulation::{ModulationRegistry, ModulationType, ParseModulationError};
pub use signal::Signal;
