//! Synthetic reading generation: sine-wave drift plus Gaussian noise for
//! scalars, Gaussian dips on the fixed axis for spectra.

use std::f64::consts::PI;
use std::time::Instant;

use chrono::Local;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use sensor_wire::{ScalarReading, SensorStatus, SpectralReading};

/// Drifts sinusoidally around `mean` with amplitude `amplitude` over
/// `period_s` seconds, with added Gaussian noise.
pub struct ScalarGenerator {
    pub sensor: String,
    mean: f64,
    amplitude: f64,
    period_s: f64,
    noise: Normal<f64>,
    start: Instant,
}

impl ScalarGenerator {
    pub fn new(
        sensor: impl Into<String>,
        mean: f64,
        amplitude: f64,
        period_s: f64,
        noise_std: f64,
    ) -> Self {
        Self {
            sensor: sensor.into(),
            mean,
            amplitude,
            period_s,
            noise: Normal::new(0.0, noise_std).expect("noise_std must be finite and non-negative"),
            start: Instant::now(),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScalarReading {
        let elapsed = self.start.elapsed().as_secs_f64();
        let phase = 2.0 * PI * elapsed / self.period_s;
        let value = self.mean + self.amplitude * phase.sin() + self.noise.sample(rng);
        ScalarReading {
            sensor: self.sensor.clone(),
            value,
            timestamp: Local::now().naive_local(),
            status: SensorStatus::Ok,
        }
    }
}

/// A flat baseline with Gaussian dips at configured wavelengths, projected
/// onto the fixed wavelength axis.
pub struct SpectralGenerator {
    pub sensor: String,
    dip_positions_nm: Vec<f64>,
    depth: f64,
    width_nm: f64,
    noise: Normal<f64>,
}

impl SpectralGenerator {
    pub fn new(
        sensor: impl Into<String>,
        dip_positions_nm: Vec<f64>,
        depth: f64,
        width_nm: f64,
        noise_std: f64,
    ) -> Self {
        Self {
            sensor: sensor.into(),
            dip_positions_nm,
            depth,
            width_nm,
            noise: Normal::new(0.0, noise_std).expect("noise_std must be finite and non-negative"),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SpectralReading {
        let axis = sensor_wire::FIXED_WAVELENGTH_AXIS_NM();
        let values = axis
            .iter()
            .map(|&x| {
                let mut y = 1.0;
                for &dip in &self.dip_positions_nm {
                    let z = (x - dip) / self.width_nm;
                    y -= self.depth * (-z * z).exp();
                }
                y + self.noise.sample(rng)
            })
            .collect();
        SpectralReading {
            sensor: self.sensor.clone(),
            values,
            timestamp: Local::now().naive_local(),
            status: SensorStatus::Ok,
        }
    }
}
