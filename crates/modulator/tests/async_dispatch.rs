//! Async send path: blocking transmissions run on tokio's blocking pool.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::{Duration, Instant};

use linecode::ModulationType;
use modulator::{ErrorClass, ModulateRequest, ModulatorService, ServiceError};
use platform::ModulatorConfig;
use transmitter::{GpioStatus, SimulatedPins};

/// 5 bits x 50 ms: long enough for a second request to collide.
fn service() -> ModulatorService<SimulatedPins> {
    let config = ModulatorConfig {
        bit_duration_s: 0.05,
        samples_per_bit: 10,
        ..ModulatorConfig::default()
    };
    ModulatorService::from_config(config, Some(SimulatedPins::new())).unwrap()
}

fn request(pin: i64) -> ModulateRequest {
    ModulateRequest::new("10110", ModulationType::NrzM)
        .with_pins([pin])
        .unwrap()
}

#[tokio::test]
async fn concurrent_sends_one_conflicts() {
    let service = service();
    let (a, b) = tokio::join!(
        service.send_to_pins_async(request(17)),
        service.send_to_pins_async(request(18)),
    );

    let (ok, err) = match (a, b) {
        (Ok(ok), Err(err)) | (Err(err), Ok(ok)) => (ok, err),
        other => panic!("expected exactly one success, got {other:?}"),
    };
    assert_eq!(ok.status, "completed");
    assert_eq!(err.class(), ErrorClass::Conflict);
    assert_eq!(err.http_status(), 429);
    assert_eq!(service.status_report().status, GpioStatus::Idle);
}

#[tokio::test]
async fn status_stays_responsive_during_send() {
    let service = service();
    let worker = {
        let service = service.clone();
        tokio::spawn(async move { service.send_to_pins_async(request(17)).await })
    };

    let deadline = Instant::now() + Duration::from_secs(2);
    while service.status_report().status != GpioStatus::Busy {
        assert!(Instant::now() < deadline, "send never started");
        tokio::task::yield_now().await;
    }
    let report = service.status_report();
    assert_eq!(report.detail, "Currently sending a signal (lock active).");

    let result = worker.await.expect("worker task panicked");
    assert!(result.is_ok());
    assert_eq!(service.status_report().status, GpioStatus::Idle);
}

#[tokio::test]
async fn unavailable_backend_is_not_implemented() {
    let service: ModulatorService<SimulatedPins> =
        ModulatorService::from_config(ModulatorConfig::default(), None).unwrap();
    let err = service.send_to_pins_async(request(17)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable));
    assert_eq!(err.class(), ErrorClass::NotImplemented);
}
