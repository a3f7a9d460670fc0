//! Transmitter error types.

use embedded_hal::digital::ErrorKind;
use platform::PinOutOfRange;

/// What went wrong while a transmission held the hardware.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransmissionFault {
    /// The pin could not be configured as an output
    #[error("pin setup failed: {0}")]
    Setup(String),
    /// Writing sample `index` to the pin failed
    #[error("write of sample {index} failed: {kind}")]
    Write {
        /// Sample being written
        index: usize,
        /// HAL error classification
        kind: ErrorKind,
    },
    /// The closing LOW could not be written
    #[error("final LOW write failed: {0}")]
    FinalLow(ErrorKind),
}

/// Result variants of [`GpioTransmitter::transmit`](crate::GpioTransmitter::transmit)
/// other than success.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransmitError {
    /// No GPIO backend was initialized at startup; permanent for the process
    #[error("GPIO functionality is not available on this host")]
    Unavailable,
    /// Another transmission holds the hardware; retry later
    #[error("GPIO is already in use sending another signal")]
    Busy,
    /// Pin outside the configured range
    #[error(transparent)]
    InvalidPin(#[from] PinOutOfRange),
    /// `time_axis` and `samples` differ in length
    #[error("time axis has {time_axis} points but the signal has {samples} samples")]
    LengthMismatch {
        /// Length of the time axis
        time_axis: usize,
        /// Length of the sample sequence
        samples: usize,
    },
    /// Failure while the pin was being driven; cleanup already ran
    #[error("GPIO error on pin {pin}: {cause}")]
    Transmission {
        /// Pin being driven
        pin: u8,
        /// Underlying fault
        cause: TransmissionFault,
    },
}

impl TransmitError {
    /// `true` for [`TransmitError::Busy`], the only transient failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages() {
        assert_eq!(
            TransmissionFault::Setup("pin 4 could not be claimed".to_owned()).to_string(),
            "pin setup failed: pin 4 could not be claimed"
        );
        let write = TransmissionFault::Write {
            index: 2,
            kind: ErrorKind::Other,
        };
        assert!(write.to_string().starts_with("write of sample 2 failed: "));
        assert!(TransmissionFault::FinalLow(ErrorKind::Other)
            .to_string()
            .starts_with("final LOW write failed: "));
    }

    #[test]
    fn test_transmission_error_names_pin_and_cause() {
        let err = TransmitError::Transmission {
            pin: 9,
            cause: TransmissionFault::Setup("refused".to_owned()),
        };
        assert_eq!(err.to_string(), "GPIO error on pin 9: pin setup failed: refused");
        assert!(!err.is_retryable());
        assert!(TransmitError::Busy.is_retryable());
    }
}
