// sensor-wire: wire types, NDJSON decoding, webhook payload schema, and
// YAML configuration for the sensor monitoring pipeline.
//
// All inbound records use a top-level `type` field for discriminated
// deserialization; all enums round-trip through the display strings the
// webhook payload expects (e.g. "AlarmType.LOW_LIMIT").

pub mod axis;
pub mod config;
pub mod error;
pub mod models;
pub mod ndjson;
pub mod payload;

pub use axis::FIXED_WAVELENGTH_AXIS_NM;
pub use config::{
    AlarmConfig, AppConfig, FtirPeakShiftCriterionConfig, TempDiffCriterionConfig,
    TransportConfig, WebhookConfig,
};
pub use error::{ConfigError, DecodeError};
pub use models::{
    AlarmDecision, AlarmEvent, AlarmId, AlarmSeverity, AlarmState, AlarmTransition, AlarmType,
    NotificationRequest, Reading, ScalarReading, SensorConfig, SensorStatus, SpectralReading,
};
pub use ndjson::decode_message;
pub use payload::{AlarmWebhookPayload, Totals};
