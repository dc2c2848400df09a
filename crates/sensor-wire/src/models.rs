use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of alarm a [`AlarmId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AlarmType {
    LowLimit,
    HighLimit,
    WavelengthShift,
    DiffBetweenTempSensors,
}

impl AlarmType {
    /// The `Enum.MEMBER`-shaped string used on the wire (matches the
    /// original Python `str(Enum)` rendering, e.g. `AlarmType.LOW_LIMIT`).
    pub fn as_wire_str(self) -> &'static str {
        match self {
            AlarmType::LowLimit => "AlarmType.LOW_LIMIT",
            AlarmType::HighLimit => "AlarmType.HIGH_LIMIT",
            AlarmType::WavelengthShift => "AlarmType.WAVELENGTH_SHIFT",
            AlarmType::DiffBetweenTempSensors => "AlarmType.DIFF_BETWEEN_TEMP_SENSORS",
        }
    }
}

impl fmt::Display for AlarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for AlarmType {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_wire_str())
    }
}

/// Severity attached to a decision, state, or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AlarmSeverity {
    Warning,
    Critical,
}

impl AlarmSeverity {
    pub fn as_wire_str(self) -> &'static str {
        match self {
            AlarmSeverity::Warning => "AlarmSeverity.WARNING",
            AlarmSeverity::Critical => "AlarmSeverity.CRITICAL",
        }
    }
}

impl fmt::Display for AlarmSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for AlarmSeverity {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_wire_str())
    }
}

/// A lifecycle transition emitted by the alarm engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum AlarmTransition {
    Raised,
    Updated,
    Cleared,
}

impl AlarmTransition {
    pub fn as_wire_str(self) -> &'static str {
        match self {
            AlarmTransition::Raised => "AlarmTransition.RAISED",
            AlarmTransition::Updated => "AlarmTransition.UPDATED",
            AlarmTransition::Cleared => "AlarmTransition.CLEARED",
        }
    }
}

impl fmt::Display for AlarmTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for AlarmTransition {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_wire_str())
    }
}

/// Health tag carried on every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SensorStatus {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAULTY")]
    Faulty,
}

/// A single scalar sample from a sensor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScalarReading {
    pub sensor: String,
    pub value: f64,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub status: SensorStatus,
}

/// A single spectral sample (e.g. an FTIR scan) from a sensor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpectralReading {
    pub sensor: String,
    pub values: Vec<f64>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub status: SensorStatus,
}

/// Either wire record the Receiver can decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Scalar(ScalarReading),
    Spectral(SpectralReading),
}

/// Static, immutable scalar sensor configuration loaded at startup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorConfig {
    pub name: String,
    pub units: String,
    pub low_limit: f64,
    pub high_limit: f64,
}

/// Composite key identifying one alarm instance across evaluation cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlarmId {
    pub source: String,
    pub alarm_type: AlarmType,
    pub rule_name: &'static str,
}

impl AlarmId {
    pub fn new(source: impl Into<String>, alarm_type: AlarmType, rule_name: &'static str) -> Self {
        Self {
            source: source.into(),
            alarm_type,
            rule_name,
        }
    }

    pub fn details(&self) -> String {
        format!("rule={}", self.rule_name)
    }
}

/// A stateless per-cycle statement from a [`crate::models`]-consuming
/// criterion about whether an alarm should currently be active.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmDecision {
    pub alarm_id: AlarmId,
    pub severity: AlarmSeverity,
    pub should_be_active: bool,
    pub message: String,
    pub value: Option<f64>,
}

/// The engine's persistent record of an alarm's current activity.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmState {
    pub source: String,
    pub alarm_type: AlarmType,
    pub severity: AlarmSeverity,
    pub active: bool,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
    pub message: String,
    pub last_value: Option<f64>,
}

/// A point-in-time lifecycle transition, appended to history and
/// published downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmEvent {
    pub source: String,
    pub alarm_type: AlarmType,
    pub severity: AlarmSeverity,
    pub transition: AlarmTransition,
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub value: Option<f64>,
    pub details: String,
}

/// A fully assembled, transient unit of outbound work for the Notifier.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: serde_json::Value,
    pub severity: AlarmSeverity,
    pub source: String,
    pub ts: NaiveDateTime,
}

impl NotificationRequest {
    /// The sentinel that terminates the Notifier's drain loop.
    pub const STOP_KIND: &'static str = "__stop__";

    pub fn stop() -> Self {
        Self {
            kind: Self::STOP_KIND.to_string(),
            payload: serde_json::Value::Null,
            severity: AlarmSeverity::Warning,
            source: String::new(),
            ts: chrono::Local::now().naive_local(),
        }
    }

    pub fn is_stop(&self) -> bool {
        self.kind == Self::STOP_KIND
    }
}
