//! End-to-end: two temperature sensors, each published through the
//! Receiver, drive the TempDiffCriterion to raise and clear.

use std::sync::Arc;
use std::time::Duration;

use sensor_core::{AlarmEngine, Criterion, StateStore, TempDiffCriterion};
use sensor_ingest::{AlarmWorker, Controller, Receiver, ReceiverConfig};
use sensor_test_utils::MockTcpPublisher;
use sensor_wire::AlarmTransition;
use tokio::sync::mpsc;

#[tokio::test]
async fn temp_diff_raises_and_clears() {
    let publisher = MockTcpPublisher::bind().await;

    let store = Arc::new(StateStore::new());
    let engine = Arc::new(AlarmEngine::new(
        vec![Box::new(TempDiffCriterion {
            sensor_lower: "TLOW".into(),
            sensor_upper: "TUP".into(),
            max_delta: 3.0,
        }) as Box<dyn Criterion>],
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

    publisher
        .push_line(
            r#"{"type":"sensor_reading","sensor":"TLOW","value":20.0,"timestamp":"2026-01-01T10:00:00"}"#
                .to_string(),
        )
        .await;
    publisher
        .push_line(
            r#"{"type":"sensor_reading","sensor":"TUP","value":30.5,"timestamp":"2026-01-01T10:00:01"}"#
                .to_string(),
        )
        .await;

    let raised = tokio::time::timeout(Duration::from_secs(2), q2_rx.recv())
        .await
        .expect("timed out waiting for RAISED")
        .expect("channel closed");
    assert_eq!(raised.transition, AlarmTransition::Raised);
    assert!(raised.message.contains("Diff bet upper and lower"));

    publisher
        .push_line(
            r#"{"type":"sensor_reading","sensor":"TUP","value":21.0,"timestamp":"2026-01-01T10:00:02"}"#
                .to_string(),
        )
        .await;

    let cleared = tokio::time::timeout(Duration::from_secs(2), q2_rx.recv())
        .await
        .expect("timed out waiting for CLEARED")
        .expect("channel closed");
    assert_eq!(cleared.transition, AlarmTransition::Cleared);

    worker_stop.cancel();
    receiver_stop.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), worker_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(2), receiver_handle).await;
}
