use sensor_wire::{AlarmDecision, AlarmId, AlarmSeverity, AlarmType, SensorStatus};

use super::{Criterion, EvalContext};
use crate::store::StateStore;

/// Flags an excessive difference between two temperature sensors. Emits
/// nothing if either reading is missing or faulty.
pub struct TempDiffCriterion {
    pub sensor_lower: String,
    pub sensor_upper: String,
    pub max_delta: f64,
}

impl Criterion for TempDiffCriterion {
    fn evaluate(&self, store: &StateStore, _ctx: &EvalContext) -> Vec<AlarmDecision> {
        let Some(lower) = store.get_latest(&self.sensor_lower) else {
            return Vec::new();
        };
        let Some(upper) = store.get_latest(&self.sensor_upper) else {
            return Vec::new();
        };
        if lower.status != SensorStatus::Ok || upper.status != SensorStatus::Ok {
            return Vec::new();
        }

        let diff = (lower.value - upper.value).abs();
        let should_be_active = diff > self.max_delta;
        let message = if should_be_active {
            format!(
                "Diff bet upper and lower MSP = {diff:.3} C > {} C",
                self.max_delta
            )
        } else {
            format!("Temp diff OK: diff={diff:.3} C")
        };

        vec![AlarmDecision {
            alarm_id: AlarmId::new(
                format!("{}|{}", self.sensor_lower, self.sensor_upper),
                AlarmType::DiffBetweenTempSensors,
                "config_high_temp_diff",
            ),
            severity: AlarmSeverity::Warning,
            should_be_active,
            message,
            value: Some(diff),
        }]
    }
}
