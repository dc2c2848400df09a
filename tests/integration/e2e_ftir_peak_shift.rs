//! End-to-end: a spectral reading published through the Receiver drives
//! the FtirPeakShiftCriterion, including the length-mismatch critical path.

use std::sync::Arc;
use std::time::Duration;

use sensor_core::{AlarmEngine, Criterion, FtirPeakShiftCriterion, StateStore};
use sensor_ingest::{AlarmWorker, Controller, Receiver, ReceiverConfig};
use sensor_test_utils::MockTcpPublisher;
use sensor_wire::{AlarmSeverity, AlarmTransition, FIXED_WAVELENGTH_AXIS_NM};
use tokio::sync::mpsc;

#[tokio::test]
async fn length_mismatch_spectrum_raises_critical() {
    let publisher = MockTcpPublisher::bind().await;

    let store = Arc::new(StateStore::new());
    let expected_nm = FIXED_WAVELENGTH_AXIS_NM()[100];
    let engine = Arc::new(AlarmEngine::new(
        vec![Box::new(FtirPeakShiftCriterion::new(
            "FTIR1".into(),
            vec![expected_nm],
            vec![2.0],
            12.0,
            true,
        )) as Box<dyn Criterion>],
        0.1,
    ));

    let (q1_tx, q1_rx) = mpsc::channel(16);
    let (q2_tx, mut q2_rx) = mpsc::channel(16);

    let receiver = Receiver::new(
        ReceiverConfig {
            host: publisher.host().to_string(),
            port: publisher.port(),
            connect_timeout: Duration::from_millis(500),
            reconnect_delay: Duration::from_millis(20),
        },
        q1_tx,
    );
    let receiver_stop = receiver.stop_token();
    let receiver_handle = receiver.start();

    let controller = Controller::new(store, engine, q2_tx);
    let worker = AlarmWorker::new(q1_rx, controller);
    let worker_stop = worker.stop_token();
    let worker_handle = worker.start();

    let short_values: Vec<f64> = vec![1.0; FIXED_WAVELENGTH_AXIS_NM().len() - 3];
    let line = serde_json::json!({
        "type": "ftir_spectrum",
        "sensor": "FTIR1",
        "values": short_values,
        "timestamp": "2026-01-01T10:00:00",
    })
    .to_string();
    publisher.push_line(line).await;

    let event = tokio::time::timeout(Duration::from_secs(2), q2_rx.recv())
        .await
        .expect("timed out waiting for the length mismatch event")
        .expect("channel closed");
    assert_eq!(event.transition, AlarmTransition::Raised);
    assert_eq!(event.severity, AlarmSeverity::Critical);
    assert!(event.message.contains("length mismatch"));

    worker_stop.cancel();
    receiver_stop.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), worker_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(2), receiver_handle).await;
}
