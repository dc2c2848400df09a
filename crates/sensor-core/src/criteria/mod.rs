//! Criteria: stateless evaluators of `(store, ctx) -> Vec<AlarmDecision>`.
//!
//! Implemented as a trait rather than duck-typed capability probing — the
//! engine calls `evaluate` uniformly and never inspects what a criterion
//! "supports".

mod ftir_peak_shift;
mod scalar_limit;
mod temp_diff;

use chrono::NaiveDateTime;
use sensor_wire::AlarmDecision;

pub use ftir_peak_shift::FtirPeakShiftCriterion;
pub use scalar_limit::ScalarLimitCriterion;
pub use temp_diff::TempDiffCriterion;

use crate::store::StateStore;

/// Evaluation context passed to every criterion on a cycle.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext {
    pub now: NaiveDateTime,
}

/// A stateless rule evaluator. Two consecutive evaluations against
/// identical store contents must produce identical decisions.
pub trait Criterion: Send + Sync {
    fn evaluate(&self, store: &StateStore, ctx: &EvalContext) -> Vec<AlarmDecision>;
}
