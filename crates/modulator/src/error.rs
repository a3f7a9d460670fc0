//! Service errors and their classification.

use linecode::GenerateError;
use platform::PinOutOfRange;
use transmitter::TransmitError;

use crate::plot::PlotError;

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed request; fix the input
    ClientError,
    /// GPIO busy; retry later
    Conflict,
    /// No GPIO on this host
    NotImplemented,
    /// Failure on our side
    Internal,
}

/// Everything the service operations can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad message or unsupported modulation
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// More pins than a request may carry
    #[error("too many output pins (at most {max})")]
    TooManyPins {
        /// Allowed maximum
        max: usize,
    },
    /// No GPIO backend; checked before anything else on the send path
    #[error("GPIO functionality is not available on this server")]
    Unavailable,
    /// A requested pin is out of range; earlier pins were already sent
    #[error("{source}")]
    Pin {
        /// Pins transmitted before the failure
        completed: Vec<u8>,
        /// Range violation
        source: PinOutOfRange,
    },
    /// Transmission on `pin` failed; earlier pins were already sent
    #[error("GPIO {pin}: {source}")]
    Transmit {
        /// Pin that failed
        pin: u8,
        /// Pins transmitted before the failure
        completed: Vec<u8>,
        /// Driver error
        source: TransmitError,
    },
    /// Plot could not be rendered or written
    #[error(transparent)]
    Plot(#[from] PlotError),
    /// The blocking worker panicked or was cancelled
    #[error("transmit worker failed: {0}")]
    Worker(String),
}

impl ServiceError {
    /// Coarse classification for the caller.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Generate(_) | Self::TooManyPins { .. } | Self::Pin { .. } => ErrorClass::ClientError,
            Self::Unavailable => ErrorClass::NotImplemented,
            Self::Transmit { source, .. } => match source {
                TransmitError::Busy => ErrorClass::Conflict,
                TransmitError::Unavailable => ErrorClass::NotImplemented,
                TransmitError::InvalidPin(_) => ErrorClass::ClientError,
                TransmitError::LengthMismatch { .. } | TransmitError::Transmission { .. } => {
                    ErrorClass::Internal
                }
            },
            Self::Plot(_) | Self::Worker(_) => ErrorClass::Internal,
        }
    }

    /// HTTP status code an HTTP front end would answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Generate(GenerateError::UnsupportedModulation(_)) => 400,
            Self::Generate(GenerateError::InvalidInput(_)) | Self::TooManyPins { .. } | Self::Pin { .. } => 422,
            Self::Transmit {
                source: TransmitError::InvalidPin(_),
                ..
            } => 422,
            _ => match self.class() {
                ErrorClass::ClientError => 400,
                ErrorClass::Conflict => 429,
                ErrorClass::NotImplemented => 501,
                ErrorClass::Internal => 500,
            },
        }
    }

    /// Pins that were fully transmitted before the failure.
    pub fn completed_pins(&self) -> &[u8] {
        match self {
            Self::Pin { completed, .. } | Self::Transmit { completed, .. } => completed,
            _ => &[],
        }
    }
}
