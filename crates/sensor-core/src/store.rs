//! Thread-safe facade for application state: configuration, latest
//! readings, and alarm history/state.
//!
//! Every public method acquires the lock for the duration of the call and
//! releases it before returning; no method here calls another public
//! method while still holding the guard, so a plain (non-reentrant) mutex
//! is sufficient even though callers may freely interleave calls to
//! different methods from the same logical caller (e.g. a criterion
//! calling `get_latest` followed by `scalar_configs`).

use std::collections::HashMap;

use chrono::NaiveDateTime;
use parking_lot::Mutex;
use sensor_wire::{AlarmEvent, AlarmId, AlarmState, ScalarReading, SensorConfig, SpectralReading};

/// Event history beyond this many entries drops the oldest first.
const MAX_EVENT_HISTORY: usize = 10_000;

#[derive(Default)]
struct Inner {
    configs: Vec<SensorConfig>,
    scalars: HashMap<String, ScalarReading>,
    spectra: HashMap<String, SpectralReading>,
    alarm_events: Vec<AlarmEvent>,
    alarm_states: HashMap<AlarmId, AlarmState>,
}

/// Single thread-safe point of truth for latest state visible to
/// evaluators and consumers.
pub struct StateStore {
    inner: Mutex<Inner>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Register or replace a scalar sensor configuration (matched by name).
    pub fn set_config(&self, cfg: SensorConfig) {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.configs.iter_mut().find(|c| c.name == cfg.name) {
            *existing = cfg;
        } else {
            inner.configs.push(cfg);
        }
    }

    pub fn scalar_configs(&self) -> Vec<SensorConfig> {
        self.inner.lock().configs.clone()
    }

    pub fn update_scalar(&self, reading: ScalarReading) {
        self.inner
            .lock()
            .scalars
            .insert(reading.sensor.clone(), reading);
    }

    pub fn update_spectrum(&self, reading: SpectralReading) {
        self.inner
            .lock()
            .spectra
            .insert(reading.sensor.clone(), reading);
    }

    pub fn get_latest(&self, sensor: &str) -> Option<ScalarReading> {
        self.inner.lock().scalars.get(sensor).cloned()
    }

    pub fn get_latest_ftir(&self, sensor: &str) -> Option<SpectralReading> {
        self.inner.lock().spectra.get(sensor).cloned()
    }

    pub fn add_alarm_event(&self, event: AlarmEvent) {
        let mut inner = self.inner.lock();
        inner.alarm_events.push(event);
        if inner.alarm_events.len() > MAX_EVENT_HISTORY {
            let overflow = inner.alarm_events.len() - MAX_EVENT_HISTORY;
            inner.alarm_events.drain(0..overflow);
        }
    }

    pub fn set_alarm_state(&self, alarm_id: AlarmId, state: AlarmState) {
        self.inner.lock().alarm_states.insert(alarm_id, state);
    }

    pub fn get_active_alarm_states(&self) -> Vec<AlarmState> {
        self.inner
            .lock()
            .alarm_states
            .values()
            .filter(|s| s.active)
            .cloned()
            .collect()
    }

    pub fn clear_alarm_history(&self) {
        let mut inner = self.inner.lock();
        inner.alarm_events.clear();
        inner.alarm_states.clear();
    }

    /// Snapshot copy of latest scalar readings, keyed by sensor name.
    pub fn snapshots(&self) -> HashMap<String, ScalarReading> {
        self.inner.lock().scalars.clone()
    }

    /// Snapshot copy of latest FTIR readings, keyed by sensor name.
    pub fn ftir_snapshots(&self) -> HashMap<String, SpectralReading> {
        self.inner.lock().spectra.clone()
    }

    /// Snapshot copy of alarm event history, in insertion order.
    pub fn alarm_events(&self) -> Vec<AlarmEvent> {
        self.inner.lock().alarm_events.clone()
    }

    /// Snapshot copy of current alarm states, keyed by alarm id.
    pub fn alarm_states(&self) -> HashMap<AlarmId, AlarmState> {
        self.inner.lock().alarm_states.clone()
    }

    /// Lookup the current state of a single alarm, if any.
    pub(crate) fn get_alarm_state(&self, id: &AlarmId) -> Option<AlarmState> {
        self.inner.lock().alarm_states.get(id).cloned()
    }
}

#[allow(dead_code)]
fn _assert_send_sync()
where
    StateStore: Send + Sync,
{
}
