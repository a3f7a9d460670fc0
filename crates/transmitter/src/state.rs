//! Driver state snapshot and the status derived from it.

use core::fmt;

use serde::Serialize;

/// Point-in-time copy of the driver flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriverState {
    /// A GPIO backend was available at startup
    pub functional: bool,
    /// A transmission is running
    pub busy: bool,
    /// The exclusive-use lock is currently taken
    pub lock_held: bool,
}

impl DriverState {
    /// Collapse the flags into a [`GpioStatus`].
    pub fn status(&self) -> GpioStatus {
        if !self.functional {
            GpioStatus::Disabled
        } else if self.busy {
            GpioStatus::Busy
        } else {
            GpioStatus::Idle
        }
    }
}

/// Coarse availability reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GpioStatus {
    /// No GPIO backend
    Disabled,
    /// Transmission in progress
    Busy,
    /// Ready to transmit
    Idle,
}

impl GpioStatus {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Busy => "busy",
            Self::Idle => "idle",
        }
    }
}

impl fmt::Display for GpioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
