//! Drains Q2 (alarm events) and turns each into a [`NotificationRequest`]
//! carrying the full webhook payload, publishing to Q3.

use std::sync::Arc;

use sensor_core::StateStore;
use sensor_wire::{AlarmWebhookPayload, NotificationRequest, Totals};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct NotifyAdapter {
    input: Receiver<sensor_wire::AlarmEvent>,
    store: Arc<StateStore>,
    output: Sender<NotificationRequest>,
    stop: CancellationToken,
}

impl NotifyAdapter {
    pub fn new(
        input: Receiver<sensor_wire::AlarmEvent>,
        store: Arc<StateStore>,
        output: Sender<NotificationRequest>,
    ) -> Self {
        Self {
            input,
            store,
            output,
            stop: CancellationToken::new(),
        }
    }

    pub fn stop_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    pub fn start(mut self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = self.stop.cancelled() => break,
                    event = self.input.recv() => {
                        match event {
                            Some(event) => self.handle(event),
                            None => break,
                        }
                    }
                }
            }
            info!("notify adapter stopped");
        })
    }

    fn handle(&self, event: sensor_wire::AlarmEvent) {
        let states: Vec<_> = self.store.alarm_states().into_values().collect();
        let events = self.store.alarm_events();
        let totals = Totals::from_snapshots(&states, &events);
        let payload = AlarmWebhookPayload::new(&event, totals);
        let request = NotificationRequest {
            kind: "alarm_event".to_string(),
            payload: serde_json::to_value(&payload).expect("AlarmWebhookPayload always serializes"),
            severity: event.severity,
            source: event.source,
            ts: event.timestamp,
        };
        if self.output.try_send(request).is_err() {
            warn!("notification queue full, dropping notification");
        }
    }
}
