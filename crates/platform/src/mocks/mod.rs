//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform seams for use
//! in unit and integration tests: a pin provider that records every level
//! written, and a clock that only moves when the code under test waits.

#![cfg(any(test, feature = "mocks"))]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};

use crate::clock::Clock;
use crate::gpio::{PinNumber, PinProvider};

/// Time a single [`Clock::spin`] advances a [`ManualClock`].
pub const SPIN_STEP: Duration = Duration::from_micros(10);

/// Simulated clock: time only advances when the caller sleeps or spins.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    sleeps: AtomicUsize,
    spins: AtomicUsize,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without counting a sleep.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Number of [`Clock::sleep`] calls so far.
    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }

    /// Number of [`Clock::spin`] calls so far.
    pub fn spins(&self) -> usize {
        self.spins.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(duration);
    }

    fn spin(&self) {
        self.spins.fetch_add(1, Ordering::SeqCst);
        self.advance(SPIN_STEP);
    }
}

/// Error raised by [`MockPinProvider`] when configured to fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockHardwareError {
    /// Claiming the pin was refused
    #[error("pin {0} could not be claimed")]
    ClaimRefused(u8),
}

#[derive(Debug, Default)]
struct MockLog {
    writes: BTreeMap<u8, Vec<PinState>>,
    claims: Vec<u8>,
    releases: Vec<u8>,
}

fn lock(log: &Mutex<MockLog>) -> MutexGuard<'_, MockLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Output pin that records every level written to it.
#[derive(Debug)]
pub struct RecordingPin {
    pin: u8,
    log: Arc<Mutex<MockLog>>,
    fail_after: Option<usize>,
    written: usize,
}

impl ErrorType for RecordingPin {
    type Error = ErrorKind;
}

impl RecordingPin {
    fn record(&mut self, state: PinState) -> Result<(), ErrorKind> {
        if self.fail_after.is_some_and(|limit| self.written >= limit) {
            return Err(ErrorKind::Other);
        }
        self.written = self.written.saturating_add(1);
        lock(&self.log)
            .writes
            .entry(self.pin)
            .or_default()
            .push(state);
        Ok(())
    }
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(PinState::High)
    }
}

impl Drop for RecordingPin {
    fn drop(&mut self) {
        lock(&self.log).releases.push(self.pin);
    }
}

/// Pin provider that hands out [`RecordingPin`]s.
#[derive(Debug, Default)]
pub struct MockPinProvider {
    log: Arc<Mutex<MockLog>>,
    refuse_claims: bool,
    fail_writes_after: Option<usize>,
}

impl MockPinProvider {
    /// Provider whose pins always accept writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that refuses to configure any pin.
    pub fn refusing_claims() -> Self {
        Self {
            refuse_claims: true,
            ..Self::default()
        }
    }

    /// Provider whose pins fail after `count` successful writes.
    pub fn failing_writes_after(count: usize) -> Self {
        Self {
            fail_writes_after: Some(count),
            ..Self::default()
        }
    }

    /// Inspection handle that stays valid after the provider is moved away.
    pub fn probe(&self) -> PinProbe {
        PinProbe {
            log: Arc::clone(&self.log),
        }
    }
}

impl PinProvider for MockPinProvider {
    type Pin = RecordingPin;
    type Error = MockHardwareError;

    fn output_pin(&mut self, pin: PinNumber) -> Result<Self::Pin, Self::Error> {
        if self.refuse_claims {
            return Err(MockHardwareError::ClaimRefused(pin.get()));
        }
        lock(&self.log).claims.push(pin.get());
        Ok(RecordingPin {
            pin: pin.get(),
            log: Arc::clone(&self.log),
            fail_after: self.fail_writes_after,
            written: 0,
        })
    }
}

/// Read-only view of everything a [`MockPinProvider`] has seen.
#[derive(Debug, Clone)]
pub struct PinProbe {
    log: Arc<Mutex<MockLog>>,
}

impl PinProbe {
    /// Levels written to `pin`, in order.
    pub fn writes(&self, pin: u8) -> Vec<PinState> {
        lock(&self.log).writes.get(&pin).cloned().unwrap_or_default()
    }

    /// Pins claimed, in order.
    pub fn claims(&self) -> Vec<u8> {
        lock(&self.log).claims.clone()
    }

    /// Pins released (dropped), in order.
    pub fn releases(&self) -> Vec<u8> {
        lock(&self.log).releases.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_pin_logs_levels() {
        let mut provider = MockPinProvider::new();
        let probe = provider.probe();
        {
            let mut pin = provider.output_pin(PinNumber::new(17)).unwrap();
            pin.set_high().unwrap();
            pin.set_low().unwrap();
        }
        assert_eq!(probe.writes(17), vec![PinState::High, PinState::Low]);
        assert_eq!(probe.claims(), vec![17]);
        assert_eq!(probe.releases(), vec![17]);
    }

    #[test]
    fn test_refusing_provider() {
        let mut provider = MockPinProvider::refusing_claims();
        let err = provider.output_pin(PinNumber::new(4)).unwrap_err();
        assert_eq!(err, MockHardwareError::ClaimRefused(4));
        assert!(provider.probe().claims().is_empty());
    }

    #[test]
    fn test_write_failure_injection() {
        let mut provider = MockPinProvider::failing_writes_after(2);
        let mut pin = provider.output_pin(PinNumber::new(5)).unwrap();
        assert!(pin.set_high().is_ok());
        assert!(pin.set_low().is_ok());
        assert_eq!(pin.set_high(), Err(ErrorKind::Other));
    }

    #[test]
    fn test_manual_clock_only_moves_on_wait() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.sleep(Duration::from_micros(50));
        clock.spin();
        assert_eq!(clock.now(), Duration::from_micros(60));
        assert_eq!((clock.sleeps(), clock.spins()), (1, 1));
    }
}
