//! Exclusive, real-time GPIO transmitter
//!
//! One [`GpioTransmitter`] exists per process and owns the pin backend.
//! A transmission takes a non-blocking lock, configures the pin, writes one
//! level per sample against absolute deadlines, then forces the pin low and
//! releases everything, in that order, whether or not the loop succeeded.
//!
//! ```text
//! transmit(pin, t, s)
//!   │ hardware missing ──────────────▶ Unavailable
//!   │ pin out of range ──────────────▶ InvalidPin
//!   │ t.len() != s.len() ────────────▶ LengthMismatch
//!   │ try_lock fails ────────────────▶ Busy
//!   ▼
//! [lock_held, busy] ─▶ claim pin ─▶ write s[i], wait start+(i+1)·Δ ─▶ LOW
//!   │                                             (error: stop, capture)
//!   ▼
//! drop pin ─▶ busy=false ─▶ lock_held=false ─▶ unlock ─▶ Ok | Transmission
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::Duration;

use embedded_hal::digital::{Error as _, OutputPin, PinState};
use platform::{
    level_to_state, wait_until, Clock, ModulatorConfig, MonotonicClock, PinNumber, PinProvider,
    PinRange,
};

use crate::error::{TransmissionFault, TransmitError};
use crate::state::{DriverState, GpioStatus};

/// Outcome of a completed transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitSummary {
    /// Pin that was driven
    pub pin: PinNumber,
    /// Samples written
    pub samples: usize,
    /// Number of HIGH/LOW changes written
    pub edges: usize,
    /// Wall time from the first write to the closing LOW
    pub elapsed: Duration,
}

/// `lock_held` bit of the driver flags.
const LOCK: u8 = 0b01;
/// `busy` bit of the driver flags.
const BUSY: u8 = 0b10;

/// Proof of exclusive hardware access.
///
/// Dropping the guard clears `busy`, then `lock_held`, and only then unlocks
/// the mutex. Both flags live in one atomic, so a status poll never sees a
/// free lock while busy is set.
pub struct TransmitGuard<'a, P> {
    flags: &'a AtomicU8,
    hardware: MutexGuard<'a, P>,
}

impl<P> TransmitGuard<'_, P> {
    /// The pin backend, exclusively borrowed for the guard's lifetime.
    pub fn provider(&mut self) -> &mut P {
        &mut self.hardware
    }
}

impl<P> Drop for TransmitGuard<'_, P> {
    fn drop(&mut self) {
        self.flags.store(LOCK, Ordering::SeqCst);
        self.flags.store(0, Ordering::SeqCst);
        // `hardware` is dropped after this body returns, releasing the lock.
    }
}

/// Process-wide owner of the GPIO backend.
pub struct GpioTransmitter<P, C = MonotonicClock> {
    hardware: Option<Mutex<P>>,
    flags: AtomicU8,
    clock: C,
    sample_duration: Duration,
    pins: PinRange,
}

impl<P: PinProvider> GpioTransmitter<P, MonotonicClock> {
    /// Transmitter over `hardware` with timing and pin range from `config`.
    ///
    /// Pass `None` when no backend could be initialized; every transmit
    /// then fails with [`TransmitError::Unavailable`].
    pub fn from_config(hardware: Option<P>, config: &ModulatorConfig) -> Result<Self, platform::ConfigError> {
        Ok(Self::new(
            hardware,
            MonotonicClock::new(),
            config.sample_duration(),
            config.pin_range()?,
        ))
    }
}

impl<P: PinProvider, C: Clock> GpioTransmitter<P, C> {
    /// Build a transmitter from its parts.
    pub fn new(hardware: Option<P>, clock: C, sample_duration: Duration, pins: PinRange) -> Self {
        Self {
            hardware: hardware.map(Mutex::new),
            flags: AtomicU8::new(0),
            clock,
            sample_duration,
            pins,
        }
    }

    /// A transmitter with no backend.
    pub fn unavailable(clock: C, sample_duration: Duration, pins: PinRange) -> Self {
        Self::new(None, clock, sample_duration, pins)
    }

    /// Whether a backend was present at construction.
    pub fn is_functional(&self) -> bool {
        self.hardware.is_some()
    }

    /// Pins this transmitter accepts.
    pub fn pin_range(&self) -> PinRange {
        self.pins
    }

    /// Time each sample is held.
    pub fn sample_duration(&self) -> Duration {
        self.sample_duration
    }

    /// Current flags, without side effects.
    pub fn snapshot(&self) -> DriverState {
        let flags = self.flags.load(Ordering::SeqCst);
        DriverState {
            functional: self.is_functional(),
            busy: flags & BUSY != 0,
            lock_held: flags & LOCK != 0,
        }
    }

    /// `disabled`, `busy` or `idle`.
    pub fn status(&self) -> GpioStatus {
        self.snapshot().status()
    }

    /// Take exclusive access without waiting.
    ///
    /// A poisoned lock is recovered: the guard's `Drop` already reset the
    /// flags, so the backend is in a known state.
    pub fn try_acquire(&self) -> Result<TransmitGuard<'_, P>, TransmitError> {
        let hardware = self.hardware.as_ref().ok_or(TransmitError::Unavailable)?;
        let guard = match hardware.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("GPIO is busy with another transmission; rejecting");
                return Err(TransmitError::Busy);
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                tracing::warn!("GPIO lock was poisoned by a panicked transmission; recovering");
                poisoned.into_inner()
            }
        };
        self.flags.store(LOCK | BUSY, Ordering::SeqCst);
        Ok(TransmitGuard {
            flags: &self.flags,
            hardware: guard,
        })
    }

    /// Play `samples` on `pin`, blocking for `samples.len()` sample periods.
    ///
    /// Checks run in order: backend present, pin in range, lengths equal,
    /// lock free. None of them touches the hardware.
    pub fn transmit(
        &self,
        pin: impl Into<i64>,
        time_axis: &[f64],
        samples: &[f64],
    ) -> Result<TransmitSummary, TransmitError> {
        if !self.is_functional() {
            return Err(TransmitError::Unavailable);
        }
        let pin = self.pins.check(pin)?;
        if time_axis.len() != samples.len() {
            return Err(TransmitError::LengthMismatch {
                time_axis: time_axis.len(),
                samples: samples.len(),
            });
        }

        let mut guard = self.try_acquire()?;
        tracing::info!(
            pin = pin.get(),
            samples = samples.len(),
            sample_us = u64::try_from(self.sample_duration.as_micros()).unwrap_or(u64::MAX),
            "GPIO lock acquired, starting transmission"
        );
        let result = self.drive(guard.provider(), pin, samples);
        drop(guard);
        tracing::debug!(pin = pin.get(), "GPIO lock released");

        match result {
            Ok(summary) => {
                tracing::info!(
                    pin = pin.get(),
                    edges = summary.edges,
                    elapsed_us = u64::try_from(summary.elapsed.as_micros()).unwrap_or(u64::MAX),
                    "transmission completed"
                );
                Ok(summary)
            }
            Err(cause) => {
                tracing::error!(pin = pin.get(), %cause, "transmission failed");
                Err(TransmitError::Transmission {
                    pin: pin.get(),
                    cause,
                })
            }
        }
    }

    /// Absolute deadline of sample `index`: `(index + 1)` periods after `start`.
    fn deadline(&self, start: Duration, index: usize) -> Duration {
        let periods = u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX);
        start.saturating_add(self.sample_duration.saturating_mul(periods))
    }

    fn drive(&self, provider: &mut P, pin: PinNumber, samples: &[f64]) -> Result<TransmitSummary, TransmissionFault> {
        let mut output = provider
            .output_pin(pin)
            .map_err(|err| TransmissionFault::Setup(err.to_string()))?;
        tracing::debug!(pin = pin.get(), "configured as output, initial LOW");

        let start = self.clock.now();
        let mut previous = PinState::Low;
        let mut edges = 0usize;
        for (index, level) in samples.iter().enumerate() {
            let state = level_to_state(*level);
            if let Err(err) = output.set_state(state) {
                // Best effort: leave the line low before the pin is released.
                let _ = output.set_low();
                return Err(TransmissionFault::Write {
                    index,
                    kind: err.kind(),
                });
            }
            if state != previous {
                edges = edges.saturating_add(1);
                previous = state;
            }
            wait_until(&self.clock, self.deadline(start, index));
        }
        output
            .set_low()
            .map_err(|err| TransmissionFault::FinalLow(err.kind()))?;
        let elapsed = self.clock.now().saturating_sub(start);

        Ok(TransmitSummary {
            pin,
            samples: samples.len(),
            edges,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::{ManualClock, MockPinProvider, PinProbe};

    const MS: Duration = Duration::from_millis(1);

    fn range() -> PinRange {
        PinRange::new(2, 27).unwrap()
    }

    fn transmitter(provider: MockPinProvider) -> (GpioTransmitter<MockPinProvider, ManualClock>, PinProbe) {
        let probe = provider.probe();
        (GpioTransmitter::new(Some(provider), ManualClock::new(), MS, range()), probe)
    }

    fn axis(n: usize) -> Vec<f64> {
        (0..n).map(|k| k as f64 * 0.001).collect()
    }

    #[test]
    fn test_transmit_writes_each_sample_then_low() {
        let (tx, probe) = transmitter(MockPinProvider::new());
        let samples = [1.0, -1.0, 0.0, 0.5];
        let summary = tx.transmit(17, &axis(4), &samples).unwrap();

        assert_eq!(
            probe.writes(17),
            vec![PinState::High, PinState::Low, PinState::Low, PinState::High, PinState::Low]
        );
        assert_eq!(summary.samples, 4);
        assert_eq!(summary.edges, 3);
        assert_eq!(probe.claims(), vec![17]);
        assert_eq!(probe.releases(), vec![17]);
        assert_eq!(tx.status(), GpioStatus::Idle);
    }

    #[test]
    fn test_pacing_hits_absolute_deadlines() {
        let (tx, _probe) = transmitter(MockPinProvider::new());
        let summary = tx.transmit(5, &axis(10), &[1.0; 10]).unwrap();
        assert_eq!(summary.elapsed, 10 * MS);
        assert_eq!(tx.clock.now(), 10 * MS);
        assert!(tx.clock.sleeps() > 0, "far deadlines should sleep");
        assert!(tx.clock.spins() > 0, "near deadlines should spin");
    }

    #[test]
    fn test_unavailable_backend() {
        let tx: GpioTransmitter<MockPinProvider, ManualClock> =
            GpioTransmitter::unavailable(ManualClock::new(), MS, range());
        assert_eq!(tx.transmit(17, &axis(1), &[1.0]), Err(TransmitError::Unavailable));
        assert_eq!(tx.status(), GpioStatus::Disabled);
        assert!(matches!(tx.try_acquire(), Err(TransmitError::Unavailable)));
    }

    #[test]
    fn test_out_of_range_pin_never_claims() {
        let (tx, probe) = transmitter(MockPinProvider::new());
        for bad in [1_i64, 28, -3] {
            assert!(matches!(
                tx.transmit(bad, &axis(1), &[1.0]),
                Err(TransmitError::InvalidPin(_))
            ));
        }
        assert!(probe.claims().is_empty());
    }

    #[test]
    fn test_length_mismatch_is_rejected_before_lock() {
        let (tx, probe) = transmitter(MockPinProvider::new());
        assert_eq!(
            tx.transmit(17, &axis(3), &[1.0, 0.0]),
            Err(TransmitError::LengthMismatch {
                time_axis: 3,
                samples: 2
            })
        );
        assert!(probe.claims().is_empty());
        assert!(!tx.snapshot().lock_held);
    }

    #[test]
    fn test_busy_while_guard_is_held() {
        let (tx, probe) = transmitter(MockPinProvider::new());
        let guard = tx.try_acquire().unwrap();
        assert_eq!(
            tx.snapshot(),
            DriverState {
                functional: true,
                busy: true,
                lock_held: true
            }
        );
        assert_eq!(tx.transmit(17, &axis(1), &[1.0]), Err(TransmitError::Busy));
        assert!(probe.claims().is_empty());

        drop(guard);
        assert_eq!(tx.status(), GpioStatus::Idle);
        assert!(!tx.snapshot().lock_held);
        assert!(tx.transmit(17, &axis(1), &[1.0]).is_ok());
    }

    #[test]
    fn test_write_failure_cleans_up() {
        let (tx, probe) = transmitter(MockPinProvider::failing_writes_after(2));
        let err = tx.transmit(9, &axis(5), &[1.0; 5]).unwrap_err();
        assert!(matches!(
            err,
            TransmitError::Transmission {
                pin: 9,
                cause: TransmissionFault::Write { index: 2, .. }
            }
        ));
        assert_eq!(probe.releases(), vec![9]);
        assert_eq!(
            tx.snapshot(),
            DriverState {
                functional: true,
                busy: false,
                lock_held: false
            }
        );
        assert!(tx.try_acquire().is_ok());
    }

    #[test]
    fn test_setup_failure_is_transmission_error() {
        let (tx, _probe) = transmitter(MockPinProvider::refusing_claims());
        let err = tx.transmit(4, &axis(1), &[1.0]).unwrap_err();
        assert_eq!(
            err,
            TransmitError::Transmission {
                pin: 4,
                cause: TransmissionFault::Setup("pin 4 could not be claimed".to_owned())
            }
        );
        assert!(!err.is_retryable());
        assert_eq!(tx.status(), GpioStatus::Idle);
    }

    #[test]
    fn test_empty_signal_only_writes_low() {
        let (tx, probe) = transmitter(MockPinProvider::new());
        let summary = tx.transmit(17, &[], &[]).unwrap();
        assert_eq!(summary.edges, 0);
        assert_eq!(probe.writes(17), vec![PinState::Low]);
    }

    #[test]
    fn test_from_config_uses_sample_duration() {
        let config = ModulatorConfig {
            samples_per_bit: 4,
            ..ModulatorConfig::default()
        };
        let tx = GpioTransmitter::from_config(Some(MockPinProvider::new()), &config).unwrap();
        assert_eq!(tx.sample_duration(), Duration::from_millis(25));
        assert_eq!(tx.pin_range(), range());
    }
}
