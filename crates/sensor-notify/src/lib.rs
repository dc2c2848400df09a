// sensor-notify: assembles webhook payloads from StateStore snapshots and
// delivers them with bounded retries and exponential backoff.

pub mod adapter;
pub mod error;
pub mod notifier;
pub mod webhook;

pub use adapter::NotifyAdapter;
pub use error::NotifierError;
pub use notifier::{NotificationTarget, Notifier};
pub use webhook::WebhookTarget;
