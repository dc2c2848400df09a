use sensor_wire::{AlarmDecision, AlarmId, AlarmSeverity, AlarmType, SensorStatus};

use super::{Criterion, EvalContext};
use crate::store::StateStore;

/// Emits LOW_LIMIT and HIGH_LIMIT decisions for every configured scalar
/// sensor with a current OK reading. Always emits both decisions — that is
/// what lets the engine clear a limit alarm once the value returns
/// in-range.
pub struct ScalarLimitCriterion;

impl Criterion for ScalarLimitCriterion {
    fn evaluate(&self, store: &StateStore, _ctx: &EvalContext) -> Vec<AlarmDecision> {
        let mut decisions = Vec::new();
        for cfg in store.scalar_configs() {
            let Some(reading) = store.get_latest(&cfg.name) else {
                continue;
            };
            if reading.status != SensorStatus::Ok {
                continue;
            }
            let value = reading.value;

            let low_active = value < cfg.low_limit;
            let low_message = if low_active {
                format!(
                    "{} LOW: {:.3} < {} {}",
                    cfg.name, value, cfg.low_limit, cfg.units
                )
            } else {
                format!("{} back above low limit", cfg.name)
            };
            decisions.push(AlarmDecision {
                alarm_id: AlarmId::new(&cfg.name, AlarmType::LowLimit, "config_low_limit"),
                severity: AlarmSeverity::Warning,
                should_be_active: low_active,
                message: low_message,
                value: Some(value),
            });

            let high_active = value > cfg.high_limit;
            let high_message = if high_active {
                format!(
                    "{} HIGH: {:.3} > {:.3} {}",
                    cfg.name, value, cfg.high_limit, cfg.units
                )
            } else {
                format!("{} back below high limit", cfg.name)
            };
            decisions.push(AlarmDecision {
                alarm_id: AlarmId::new(&cfg.name, AlarmType::HighLimit, "config_high_limit"),
                severity: AlarmSeverity::Warning,
                should_be_active: high_active,
                message: high_message,
                value: Some(value),
            });
        }
        decisions
    }
}
