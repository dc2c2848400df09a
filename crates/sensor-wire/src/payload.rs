//! Webhook payload schema (§4.6, §6). Building the payload needs only the
//! snapshot slices a StateStore hands out, so the totals computation lives
//! here rather than depending back on `sensor-core`.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{AlarmEvent, AlarmState};

/// Aggregated counts attached to every webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub alarm_states_total: usize,
    pub alarm_states_active: usize,
    pub alarm_events_total: usize,
    pub state_counts_by_severity: HashMap<String, usize>,
    pub state_counts_by_type: HashMap<String, usize>,
    pub event_counts_by_transition: HashMap<String, usize>,
    pub event_counts_by_severity: HashMap<String, usize>,
    pub event_counts_by_type: HashMap<String, usize>,
}

impl Totals {
    /// Compute totals from store snapshots, matching the original
    /// `Counter`-based aggregation over `alarm_states.values()` and
    /// `alarm_events`.
    pub fn from_snapshots(states: &[AlarmState], events: &[AlarmEvent]) -> Self {
        let mut state_counts_by_severity = HashMap::new();
        let mut state_counts_by_type = HashMap::new();
        let mut alarm_states_active = 0;
        for s in states {
            *state_counts_by_severity
                .entry(s.severity.as_wire_str().to_string())
                .or_insert(0) += 1;
            *state_counts_by_type
                .entry(s.alarm_type.as_wire_str().to_string())
                .or_insert(0) += 1;
            if s.active {
                alarm_states_active += 1;
            }
        }

        let mut event_counts_by_transition = HashMap::new();
        let mut event_counts_by_severity = HashMap::new();
        let mut event_counts_by_type = HashMap::new();
        for e in events {
            *event_counts_by_transition
                .entry(e.transition.as_wire_str().to_string())
                .or_insert(0) += 1;
            *event_counts_by_severity
                .entry(e.severity.as_wire_str().to_string())
                .or_insert(0) += 1;
            *event_counts_by_type
                .entry(e.alarm_type.as_wire_str().to_string())
                .or_insert(0) += 1;
        }

        Totals {
            alarm_states_total: states.len(),
            alarm_states_active,
            alarm_events_total: events.len(),
            state_counts_by_severity,
            state_counts_by_type,
            event_counts_by_transition,
            event_counts_by_severity,
            event_counts_by_type,
        }
    }
}

/// The `event` sub-object of the webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmEventPayload<'a> {
    pub source: &'a str,
    pub alarm_type: &'a str,
    pub severity: &'a str,
    pub transition: &'a str,
    pub timestamp: String,
    pub message: &'a str,
    pub value: Option<f64>,
    pub details: &'a str,
}

/// Full webhook payload body, `{"type": "alarm_event", "event": ..., "totals": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmWebhookPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: serde_json::Value,
    pub totals: Totals,
}

impl AlarmWebhookPayload {
    pub fn new(event: &AlarmEvent, totals: Totals) -> Self {
        let event_payload = AlarmEventPayload {
            source: &event.source,
            alarm_type: event.alarm_type.as_wire_str(),
            severity: event.severity.as_wire_str(),
            transition: event.transition.as_wire_str(),
            timestamp: event.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            message: &event.message,
            value: event.value,
            details: &event.details,
        };
        AlarmWebhookPayload {
            kind: "alarm_event".to_string(),
            event: serde_json::to_value(event_payload)
                .expect("AlarmEventPayload always serializes"),
            totals,
        }
    }
}
