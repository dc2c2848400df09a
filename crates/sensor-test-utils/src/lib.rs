// sensor-test-utils: shared test doubles for the ingestion and
// notification integration tests.

pub mod mock_tcp_publisher;
pub mod mock_webhook_receiver;

pub use mock_tcp_publisher::MockTcpPublisher;
pub use mock_webhook_receiver::MockWebhookReceiver;
