//! Drains Q3 and delivers each payload to every configured notification
//! target, retrying with exponential backoff.

use std::time::Duration;

use sensor_wire::NotificationRequest;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::NotifierError;

/// A delivery target. Implemented by `WebhookTarget`; the list of targets
/// is a fixed, ordered list configured at construction, matching the
/// criteria pattern used elsewhere in this pipeline.
#[async_trait::async_trait]
pub trait NotificationTarget: Send + Sync {
    async fn deliver(&self, payload: &serde_json::Value) -> Result<(), NotifierError>;
}

pub struct Notifier {
    input: Receiver<NotificationRequest>,
    targets: Vec<Box<dyn NotificationTarget>>,
    retry_count: u32,
    retry_backoff: Duration,
    stop: CancellationToken,
}

impl Notifier {
    pub fn new(
        input: Receiver<NotificationRequest>,
        targets: Vec<Box<dyn NotificationTarget>>,
        retry_count: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            input,
            targets,
            retry_count,
            retry_backoff,
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
                    request = self.input.recv() => {
                        match request {
                            Some(request) if request.is_stop() => break,
                            Some(request) => self.deliver_to_all(&request).await,
                            None => break,
                        }
                    }
                }
            }
            info!("notifier stopped");
        })
    }

    async fn deliver_to_all(&self, request: &NotificationRequest) {
        for target in &self.targets {
            self.deliver_with_retries(target.as_ref(), &request.payload)
                .await;
        }
    }

    async fn deliver_with_retries(
        &self,
        target: &dyn NotificationTarget,
        payload: &serde_json::Value,
    ) {
        let mut attempt = 0;
        loop {
            match target.deliver(payload).await {
                Ok(()) => return,
                Err(e) => {
                    if attempt >= self.retry_count {
                        warn!(error = %e, attempt, "giving up after exhausting retries");
                        return;
                    }
                    let backoff = self.retry_backoff * 2u32.pow(attempt);
                    warn!(error = %e, attempt, backoff_ms = backoff.as_millis() as u64, "delivery failed, retrying");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
