//! HTTP webhook delivery target.

use std::time::Duration;

use sensor_wire::WebhookConfig;

use crate::error::NotifierError;
use crate::notifier::NotificationTarget;

pub struct WebhookTarget {
    client: reqwest::Client,
    url: String,
    auth_header: Option<String>,
}

impl WebhookTarget {
    pub fn new(config: &WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs_f64(config.timeout_s))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .expect("reqwest client configuration is always valid");
        let auth_header = config.auth_header.clone().map(|token| {
            if token.starts_with("Bearer ") {
                token
            } else {
                format!("Bearer {token}")
            }
        });
        Self {
            client,
            url: config.url.clone(),
            auth_header,
        }
    }
}

#[async_trait::async_trait]
impl NotificationTarget for WebhookTarget {
    async fn deliver(&self, payload: &serde_json::Value) -> Result<(), NotifierError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(payload);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth.as_str());
        }
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(NotifierError::Status(response.status().as_u16()))
        }
    }
}
