//! The alarm lifecycle engine: converts stateless [`sensor_wire::AlarmDecision`]s
//! into ordered [`sensor_wire::AlarmEvent`]s, owning the persistent
//! [`sensor_wire::AlarmState`] for every alarm id it has ever seen.

use chrono::NaiveDateTime;
use sensor_wire::{AlarmDecision, AlarmEvent, AlarmState, AlarmTransition};

use crate::criteria::{Criterion, EvalContext};
use crate::store::StateStore;

/// Owns the configured, ordered list of criteria and the tolerance used to
/// suppress spurious UPDATED events.
pub struct AlarmEngine {
    criteria: Vec<Box<dyn Criterion>>,
    value_eps: f64,
}

impl AlarmEngine {
    pub fn new(criteria: Vec<Box<dyn Criterion>>, value_eps: f64) -> Self {
        Self { criteria, value_eps }
    }

    /// Run one evaluation cycle: gather decisions from every criterion (in
    /// configured order), apply the lifecycle transition table, persist the
    /// resulting state and events to `store`, and return the events in the
    /// order they were generated.
    pub fn run_once(&self, store: &StateStore, now: Option<NaiveDateTime>) -> Vec<AlarmEvent> {
        let ts = now.unwrap_or_else(|| chrono::Local::now().naive_local());
        let ctx = EvalContext { now: ts };

        let mut events = Vec::new();
        for criterion in &self.criteria {
            for decision in criterion.evaluate(store, &ctx) {
                let prev = store.get_alarm_state(&decision.alarm_id);
                let (state, event) = apply_decision(prev, &decision, ts, self.value_eps);
                store.set_alarm_state(decision.alarm_id.clone(), state);
                if let Some(event) = event {
                    store.add_alarm_event(event.clone());
                    events.push(event);
                }
            }
        }
        events
    }
}

/// Apply the §4.4 transition table for a single decision against its prior
/// state (if any). Returns the new state to persist and the event to emit,
/// if any.
fn apply_decision(
    prev: Option<AlarmState>,
    decision: &AlarmDecision,
    ts: NaiveDateTime,
    value_eps: f64,
) -> (AlarmState, Option<AlarmEvent>) {
    let details = decision.alarm_id.details();
    let source = decision.alarm_id.source.clone();
    let alarm_type = decision.alarm_id.alarm_type;

    match (prev, decision.should_be_active) {
        (None, true) => {
            let state = AlarmState {
                source: source.clone(),
                alarm_type,
                severity: decision.severity,
                active: true,
                first_seen: ts,
                last_seen: ts,
                message: decision.message.clone(),
                last_value: decision.value,
            };
            let event = AlarmEvent {
                source,
                alarm_type,
                severity: decision.severity,
                transition: AlarmTransition::Raised,
                timestamp: ts,
                message: decision.message.clone(),
                value: decision.value,
                details,
            };
            (state, Some(event))
        }
        (None, false) => {
            let state = AlarmState {
                source,
                alarm_type,
                severity: decision.severity,
                active: false,
                first_seen: ts,
                last_seen: ts,
                message: decision.message.clone(),
                last_value: decision.value,
            };
            (state, None)
        }
        (Some(prev), true) if !prev.active => {
            let state = AlarmState {
                source: source.clone(),
                alarm_type,
                severity: decision.severity,
                active: true,
                first_seen: ts,
                last_seen: ts,
                message: decision.message.clone(),
                last_value: decision.value,
            };
            let event = AlarmEvent {
                source,
                alarm_type,
                severity: decision.severity,
                transition: AlarmTransition::Raised,
                timestamp: ts,
                message: decision.message.clone(),
                value: decision.value,
                details,
            };
            (state, Some(event))
        }
        (Some(prev), false) if prev.active => {
            // Severity on CLEARED is the severity in effect when the alarm
            // was raised (the stored state's), not the decision's.
            let cleared_severity = prev.severity;
            let state = AlarmState {
                source: source.clone(),
                alarm_type,
                severity: cleared_severity,
                active: false,
                first_seen: prev.first_seen,
                last_seen: ts,
                message: decision.message.clone(),
                last_value: decision.value,
            };
            let event = AlarmEvent {
                source,
                alarm_type,
                severity: cleared_severity,
                transition: AlarmTransition::Cleared,
                timestamp: ts,
                message: decision.message.clone(),
                value: decision.value,
                details,
            };
            (state, Some(event))
        }
        (Some(prev), true) => {
            // active -> active
            let changed = decision.message != prev.message
                || value_changed(prev.last_value, decision.value, value_eps);
            let state = AlarmState {
                source: source.clone(),
                alarm_type,
                severity: decision.severity,
                active: true,
                first_seen: prev.first_seen,
                last_seen: ts,
                message: decision.message.clone(),
                last_value: decision.value,
            };
            let event = changed.then(|| AlarmEvent {
                source,
                alarm_type,
                severity: decision.severity,
                transition: AlarmTransition::Updated,
                timestamp: ts,
                message: decision.message.clone(),
                value: decision.value,
                details,
            });
            (state, event)
        }
        (Some(prev), false) => {
            // inactive -> inactive
            let state = AlarmState {
                source,
                alarm_type,
                severity: decision.severity,
                active: false,
                first_seen: prev.first_seen,
                last_seen: ts,
                message: decision.message.clone(),
                last_value: decision.value,
            };
            (state, None)
        }
    }
}

fn value_changed(prev: Option<f64>, next: Option<f64>, eps: f64) -> bool {
    match (prev, next) {
        (None, None) => false,
        (None, Some(_)) | (Some(_), None) => true,
        (Some(p), Some(n)) => (p - n).abs() > eps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_wire::{AlarmId, AlarmSeverity, AlarmType};

    fn decision(active: bool, message: &str, value: f64) -> AlarmDecision {
        AlarmDecision {
            alarm_id: AlarmId::new("Pressure", AlarmType::LowLimit, "config_low_limit"),
            severity: AlarmSeverity::Warning,
            should_be_active: active,
            message: message.to_string(),
            value: Some(value),
        }
    }

    fn ts(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn first_observation_active_raises() {
        let (state, event) = apply_decision(None, &decision(true, "LOW", 0.5), ts("2026-01-01T10:00:00"), 0.5);
        assert!(state.active);
        let event = event.unwrap();
        assert_eq!(event.transition, AlarmTransition::Raised);
    }

    #[test]
    fn first_observation_inactive_is_silent() {
        let (state, event) = apply_decision(None, &decision(false, "ok", 5.0), ts("2026-01-01T10:00:00"), 0.5);
        assert!(!state.active);
        assert!(event.is_none());
    }

    #[test]
    fn active_to_active_within_tolerance_is_silent() {
        let (prev, _) = apply_decision(None, &decision(true, "LOW", 0.5), ts("2026-01-01T10:00:00"), 0.5);
        let (_, event) = apply_decision(
            Some(prev),
            &decision(true, "LOW", 0.6),
            ts("2026-01-01T10:00:01"),
            0.5,
        );
        assert!(event.is_none());
    }

    #[test]
    fn active_to_active_beyond_tolerance_updates() {
        let (prev, _) = apply_decision(None, &decision(true, "LOW", 0.5), ts("2026-01-01T10:00:00"), 0.5);
        let (_, event) = apply_decision(
            Some(prev),
            &decision(true, "LOW", 2.0),
            ts("2026-01-01T10:00:01"),
            0.5,
        );
        assert_eq!(event.unwrap().transition, AlarmTransition::Updated);
    }

    #[test]
    fn active_to_inactive_clears_using_stored_severity() {
        let (prev, _) = apply_decision(None, &decision(true, "LOW", 0.5), ts("2026-01-01T10:00:00"), 0.5);
        let (state, event) = apply_decision(
            Some(prev.clone()),
            &decision(false, "ok", 5.0),
            ts("2026-01-01T10:00:02"),
            0.5,
        );
        let event = event.unwrap();
        assert_eq!(event.transition, AlarmTransition::Cleared);
        assert_eq!(event.severity, prev.severity);
        assert_eq!(state.first_seen, prev.first_seen);
    }

    #[test]
    fn idempotent_clear_emits_nothing() {
        let (prev, _) = apply_decision(None, &decision(false, "ok", 5.0), ts("2026-01-01T10:00:00"), 0.5);
        let (_, event) = apply_decision(Some(prev), &decision(false, "ok", 5.0), ts("2026-01-01T10:00:01"), 0.5);
        assert!(event.is_none());
    }
}
