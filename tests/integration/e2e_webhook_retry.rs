//! End-to-end: an alarm event flows through NotifyAdapter and Notifier to
//! a webhook receiver that fails the first two attempts, exercising the
//! retry-with-backoff path before a successful delivery.

use std::sync::Arc;
use std::time::Duration;

use sensor_core::StateStore;
use sensor_notify::{NotifyAdapter, Notifier, WebhookTarget};
use sensor_test_utils::MockWebhookReceiver;
use sensor_wire::{AlarmEvent, AlarmSeverity, AlarmTransition, AlarmType, WebhookConfig};
use tokio::sync::mpsc;

#[tokio::test]
async fn webhook_delivery_retries_then_succeeds() {
    let receiver = MockWebhookReceiver::bind(2).await;

    let store = Arc::new(StateStore::new());
    let (q2_tx, q2_rx) = mpsc::channel(8);
    let (q3_tx, q3_rx) = mpsc::channel(8);

    let adapter = NotifyAdapter::new(q2_rx, store, q3_tx);
    let adapter_stop = adapter.stop_token();
    let adapter_handle = adapter.start();

    let webhook_config = WebhookConfig {
        url: receiver.url(),
        auth_header: None,
        timeout_s: 1.0,
        verify_tls: true,
    };
    let notifier = Notifier::new(
        q3_rx,
        vec![Box::new(WebhookTarget::new(&webhook_config))],
        5,
        Duration::from_millis(10),
    );
    let notifier_stop = notifier.stop_token();
    let notifier_handle = notifier.start();

    q2_tx
        .send(AlarmEvent {
            source: "Pressure".into(),
            alarm_type: AlarmType::LowLimit,
            severity: AlarmSeverity::Warning,
            transition: AlarmTransition::Raised,
            timestamp: "2026-01-01T10:00:00".parse().unwrap(),
            message: "Pressure LOW: 0.100 < 1 bar".into(),
            value: Some(0.1),
            details: "rule=config_low_limit".into(),
        })
        .await
        .unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(3);
    loop {
        if receiver.received().len() >= 3 {
            break;
        }
        assert!(std::time::Instant::now() < deadline, "webhook was never delivered after retries");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // Two failed attempts plus the successful third are each a separate
    // captured request body, all carrying the same payload.
    let bodies = receiver.received();
    assert_eq!(bodies.len(), 3);
    for body in &bodies {
        assert_eq!(body["type"], "alarm_event");
        assert_eq!(body["event"]["source"], "Pressure");
        assert_eq!(body["event"]["transition"], "AlarmTransition.RAISED");
    }

    adapter_stop.cancel();
    notifier_stop.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), adapter_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(2), notifier_handle).await;
}
