//! The fixed descending wavelength axis consumed by the FTIR peak-shift
//! criterion. Supplied externally to the system (not part of the wire
//! protocol); here it is a startup-computed constant.

use std::sync::OnceLock;

/// Start of the axis, in nm. Index 0 corresponds to this wavelength.
pub const AXIS_START_NM: f64 = 2550.0;
/// End of the axis, in nm. The last index corresponds to this wavelength.
pub const AXIS_END_NM: f64 = 1350.0;
/// Number of points on the axis.
pub const AXIS_LEN: usize = 255;

/// Lazily built descending axis, `AXIS_LEN` points evenly spaced from
/// `AXIS_START_NM` down to `AXIS_END_NM`.
pub fn fixed_wavelength_axis_nm() -> &'static [f64] {
    static AXIS: OnceLock<Vec<f64>> = OnceLock::new();
    AXIS.get_or_init(|| {
        let step = (AXIS_START_NM - AXIS_END_NM) / (AXIS_LEN as f64 - 1.0);
        (0..AXIS_LEN)
            .map(|i| AXIS_START_NM - step * i as f64)
            .collect()
    })
}

/// Convenience alias matching the name other modules import.
pub const FIXED_WAVELENGTH_AXIS_NM: fn() -> &'static [f64] = fixed_wavelength_axis_nm;
