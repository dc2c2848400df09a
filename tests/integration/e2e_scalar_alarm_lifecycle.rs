//! End-to-end: a publisher streams a scalar reading through the Receiver
//! and AlarmWorker, and a low-limit breach followed by recovery produces a
//! RAISED event and then a CLEARED event carrying the severity the alarm
//! was raised with.

use std::sync::Arc;
use std::time::Duration;

use sensor_core::{AlarmEngine, Criterion, ScalarLimitCriterion, StateStore};
use sensor_ingest::{AlarmWorker, Controller, Receiver, ReceiverConfig};
use sensor_test_utils::MockTcpPublisher;
use sensor_wire::{AlarmTransition, SensorConfig};
use tokio::sync::mpsc;

#[tokio::test]
async fn low_limit_breach_then_recovery_raises_then_clears() {
    let publisher = MockTcpPublisher::bind().await;

    let store = Arc::new(StateStore::new());
    store.set_config(SensorConfig {
        name: "Pressure".into(),
        units: "bar".into(),
        low_limit: 1.0,
        high_limit: 10.0,
    });
    let engine = Arc::new(AlarmEngine::new(
        vec![Box::new(ScalarLimitCriterion) as Box<dyn Criterion>],
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

    let controller = Controller::new(store.clone(), engine, q2_tx);
    let worker = AlarmWorker::new(q1_rx, controller);
    let worker_stop = worker.stop_token();
    let worker_handle = worker.start();

    publisher
        .push_line(
            r#"{"type":"sensor_reading","sensor":"Pressure","value":0.2,"timestamp":"2026-01-01T10:00:00"}"#
                .to_string(),
        )
        .await;

    let raised = tokio::time::timeout(Duration::from_secs(2), q2_rx.recv())
        .await
        .expect("timed out waiting for RAISED")
        .expect("channel closed");
    assert_eq!(raised.transition, AlarmTransition::Raised);
    assert!(raised.message.contains("LOW"));

    publisher
        .push_line(
            r#"{"type":"sensor_reading","sensor":"Pressure","value":5.0,"timestamp":"2026-01-01T10:00:05"}"#
                .to_string(),
        )
        .await;

    let cleared = tokio::time::timeout(Duration::from_secs(2), q2_rx.recv())
        .await
        .expect("timed out waiting for CLEARED")
        .expect("channel closed");
    assert_eq!(cleared.transition, AlarmTransition::Cleared);
    assert_eq!(cleared.severity, raised.severity);

    worker_stop.cancel();
    receiver_stop.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), worker_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(2), receiver_handle).await;
}
