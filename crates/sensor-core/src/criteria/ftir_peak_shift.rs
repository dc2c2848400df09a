use sensor_wire::{AlarmDecision, AlarmId, AlarmSeverity, AlarmType};

use super::{Criterion, EvalContext};
use crate::store::StateStore;

/// Detects FTIR peak wavelength shift against a fixed descending axis.
/// Peaks are treated as dips (local minima); the discrete minimum is
/// refined with 3-point parabolic interpolation to sub-sample precision.
pub struct FtirPeakShiftCriterion {
    pub sensor_name: String,
    pub expected_peaks_nm: Vec<f64>,
    pub max_allowed_shift_nm: Vec<f64>,
    pub search_window_nm: f64,
    pub require_length_match: bool,
    pub axis: &'static [f64],
}

impl FtirPeakShiftCriterion {
    const RULE_NAME: &'static str = "ftir_peak_shift_hardcoded_axis";

    /// Build a criterion against the system's fixed wavelength axis.
    ///
    /// # Panics
    /// Panics if `expected_peaks_nm` and `max_allowed_shift_nm` differ in
    /// length — this is a configuration error and must be caught before
    /// the pipeline starts, not tolerated at evaluation time.
    pub fn new(
        sensor_name: String,
        expected_peaks_nm: Vec<f64>,
        max_allowed_shift_nm: Vec<f64>,
        search_window_nm: f64,
        require_length_match: bool,
    ) -> Self {
        assert_eq!(
            expected_peaks_nm.len(),
            max_allowed_shift_nm.len(),
            "expected_peaks_nm and max_allowed_shift_nm must have the same length"
        );
        Self {
            sensor_name,
            expected_peaks_nm,
            max_allowed_shift_nm,
            search_window_nm,
            require_length_match,
            axis: sensor_wire::FIXED_WAVELENGTH_AXIS_NM(),
        }
    }

    fn find_local_minimum_index(&self, y: &[f64], expected_nm: f64) -> Option<usize> {
        let n = self.axis.len().min(y.len());
        let lo = expected_nm - self.search_window_nm;
        let hi = expected_nm + self.search_window_nm;
        (0..n)
            .filter(|&i| self.axis[i] >= lo && self.axis[i] <= hi)
            .min_by(|&a, &b| y[a].total_cmp(&y[b]))
    }

    fn refine_minimum_wavelength(&self, y: &[f64], i0: usize) -> f64 {
        let n = self.axis.len().min(y.len());
        if i0 == 0 || i0 >= n - 1 {
            return self.axis[i0];
        }
        let y1 = y[i0 - 1];
        let y2 = y[i0];
        let y3 = y[i0 + 1];
        let denom = y1 - 2.0 * y2 + y3;
        if denom.abs() < 1e-12 {
            return self.axis[i0];
        }
        let delta = (0.5 * (y1 - y3) / denom).clamp(-1.0, 1.0);
        let x_left = self.axis[i0 - 1];
        let x_mid = self.axis[i0];
        let x_right = self.axis[i0 + 1];
        if delta >= 0.0 {
            x_mid + delta * (x_right - x_mid)
        } else {
            x_mid + (-delta) * (x_left - x_mid)
        }
    }

    fn find_local_minimum_wavelength(&self, y: &[f64], expected_nm: f64) -> Option<f64> {
        let i0 = self.find_local_minimum_index(y, expected_nm)?;
        Some(self.refine_minimum_wavelength(y, i0))
    }

    fn alarm_id(&self) -> AlarmId {
        AlarmId::new(&self.sensor_name, AlarmType::WavelengthShift, Self::RULE_NAME)
    }
}

impl Criterion for FtirPeakShiftCriterion {
    fn evaluate(&self, store: &StateStore, _ctx: &EvalContext) -> Vec<AlarmDecision> {
        let Some(reading) = store.get_latest_ftir(&self.sensor_name) else {
            return Vec::new();
        };
        let y = &reading.values;
        let x = self.axis;

        if self.require_length_match && y.len() != x.len() {
            return vec![AlarmDecision {
                alarm_id: self.alarm_id(),
                severity: AlarmSeverity::Critical,
                should_be_active: true,
                message: format!(
                    "FTIR axis/values length mismatch: axis={} values={}",
                    x.len(),
                    y.len()
                ),
                value: Some((x.len() as i64 - y.len() as i64).unsigned_abs() as f64),
            }];
        }

        let mut violations = Vec::new();
        let mut worst_shift = 0.0_f64;

        for (&expected, &max_shift) in self
            .expected_peaks_nm
            .iter()
            .zip(self.max_allowed_shift_nm.iter())
        {
            let Some(found_nm) = self.find_local_minimum_wavelength(y, expected) else {
                violations.push(format!("Peak near {expected:.1} nm not found"));
                continue;
            };
            let shift = (found_nm - expected).abs();
            worst_shift = worst_shift.max(shift);
            if shift > max_shift {
                violations.push(format!(
                    "Peak {expected:.1} nm shifted to {found_nm:.1} nm (\u{0394}={shift:.2} nm > {max_shift:.2} nm)"
                ));
            }
        }

        let active = !violations.is_empty();
        let message = if active {
            violations.join(" | ")
        } else {
            "FTIR peaks OK".to_string()
        };

        vec![AlarmDecision {
            alarm_id: self.alarm_id(),
            severity: AlarmSeverity::Warning,
            should_be_active: active,
            message,
            value: Some(if active { worst_shift } else { 0.0 }),
        }]
    }
}
