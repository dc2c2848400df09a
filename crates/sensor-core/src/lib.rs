// sensor-core: the alarm lifecycle engine, its criteria, and the shared
// state store they operate on.

pub mod criteria;
pub mod engine;
pub mod store;

pub use criteria::{Criterion, EvalContext, FtirPeakShiftCriterion, ScalarLimitCriterion, TempDiffCriterion};
pub use engine::AlarmEngine;
pub use store::StateStore;
