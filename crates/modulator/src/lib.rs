//! PCM line-coding modulator service
//!
//! Ties the encoders and the GPIO transmitter together behind the
//! operations a front end exposes: list modulations, generate, plot, send
//! to pins and report GPIO status. Requests and responses are serde models;
//! failures carry an [`ErrorClass`] and an HTTP-style status code.
//!
//! # Example
//!
//! ```
//! use linecode::ModulationType;
//! use modulator::{ModulateRequest, ModulatorService};
//! use platform::ModulatorConfig;
//! use transmitter::SimulatedPins;
//!
//! let config = ModulatorConfig { bit_duration_s: 0.001, samples_per_bit: 4, ..Default::default() };
//! let service = ModulatorService::from_config(config, Some(SimulatedPins::new())).unwrap();
//!
//! let request = ModulateRequest::new("10110", ModulationType::BipolarAmi);
//! let report = service.send_to_pins(&request).unwrap();
//! assert_eq!(report.message, "Signal Bipolar AMI sent to GPIO [17].");
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
#![warn(clippy::print_stdout)] // output belongs to the binary
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod plot;
pub mod request;
pub mod response;
pub mod service;

pub use error::{ErrorClass, ServiceError};
pub use plot::{PlotError, PlotOptions};
pub use request::{ModulateRequest, PinList, MAX_OUTPUT_PINS};
pub use response::{GpioStatusReport, ModulationList, SendReport};
pub use service::ModulatorService;
