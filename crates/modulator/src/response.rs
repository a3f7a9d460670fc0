//! Response models returned by the service operations.

use linecode::ModulationType;
use serde::Serialize;
use transmitter::{DriverState, GpioStatus, TransmitSummary};

/// Answer of the status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpioStatusReport {
    /// `disabled`, `busy` or `idle`
    pub status: GpioStatus,
    /// Human-readable explanation
    pub detail: String,
    /// Whether a GPIO backend exists
    pub gpio_library_functional: bool,
}

impl From<DriverState> for GpioStatusReport {
    fn from(state: DriverState) -> Self {
        let status = state.status();
        let detail = match status {
            GpioStatus::Disabled => "GPIO library not available.".to_owned(),
            GpioStatus::Busy => format!(
                "Currently sending a signal (lock {}).",
                if state.lock_held { "active" } else { "inactive" }
            ),
            GpioStatus::Idle => "GPIO available.".to_owned(),
        };
        Self {
            status,
            detail,
            gpio_library_functional: state.functional,
        }
    }
}

/// Display names of every supported modulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulationList {
    /// Names in declaration order
    pub supported_modulations: Vec<String>,
}

/// Successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReport {
    /// Always `"completed"`
    pub status: String,
    /// Summary line naming modulation and pins
    pub message: String,
    /// Per-pin results, in transmission order
    #[serde(skip)]
    pub transmissions: Vec<TransmitSummary>,
}

impl SendReport {
    /// Report for a send of `modulation` to `pins`.
    pub fn completed(modulation: ModulationType, pins: &[i64], transmissions: Vec<TransmitSummary>) -> Self {
        let list = pins.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
        Self {
            status: "completed".to_owned(),
            message: format!("Signal {} sent to GPIO [{list}].", modulation.name()),
            transmissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_details() {
        let report = GpioStatusReport::from(DriverState {
            functional: false,
            busy: false,
            lock_held: false,
        });
        assert_eq!(report.status, GpioStatus::Disabled);
        assert_eq!(report.detail, "GPIO library not available.");

        let report = GpioStatusReport::from(DriverState {
            functional: true,
            busy: true,
            lock_held: true,
        });
        assert_eq!(report.detail, "Currently sending a signal (lock active).");

        let report = GpioStatusReport::from(DriverState {
            functional: true,
            busy: false,
            lock_held: false,
        });
        assert_eq!(report.status, GpioStatus::Idle);
        assert_eq!(report.detail, "GPIO available.");
        assert!(report.gpio_library_functional);
    }

    #[test]
    fn test_status_report_json() {
        let report = GpioStatusReport::from(DriverState {
            functional: true,
            busy: true,
            lock_held: false,
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "busy",
                "detail": "Currently sending a signal (lock inactive).",
                "gpio_library_functional": true
            })
        );
    }

    #[test]
    fn test_send_report_message() {
        let report = SendReport::completed(ModulationType::UnipolarRz, &[17, 18], vec![]);
        assert_eq!(report.status, "completed");
        assert_eq!(report.message, "Signal Unipolar RZ sent to GPIO [17, 18].");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("transmissions").is_none());
    }

    #[test]
    fn test_send_report_single_and_no_pins() {
        let one = SendReport::completed(ModulationType::BipolarAmi, &[4], vec![]);
        assert_eq!(one.message, "Signal Bipolar AMI sent to GPIO [4].");
        let none = SendReport::completed(ModulationType::NrzM, &[], vec![]);
        assert_eq!(none.message, "Signal NRZ-M sent to GPIO [].");
    }
}
