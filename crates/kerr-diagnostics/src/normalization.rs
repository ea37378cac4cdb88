//! Parseval check of the symmetric spectral transform.

use kerr_math::fft::forward_transform;
use kerr_types::error::KerrResult;
use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Pulse energy evaluated on both sides of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormReport {
    /// Σ|u|²·dz
    pub real_space: f64,
    /// Σ|ũ|²·dk
    pub reciprocal_space: f64,
}

impl NormReport {
    /// Relative mismatch between the two energies.
    pub fn relative_deviation(&self) -> f64 {
        let scale = self.real_space.abs().max(f64::MIN_POSITIVE);
        (self.real_space - self.reciprocal_space).abs() / scale
    }
}

/// Energy of `field` in real space and of its spectrum in reciprocal space.
pub fn check_normalization(field: &Array1<Complex64>, dz: f64, dk: f64) -> KerrResult<NormReport> {
    let spectrum = forward_transform(field, dz)?;
    Ok(NormReport {
        real_space: field.iter().map(|c| c.norm_sqr()).sum::<f64>() * dz,
        reciprocal_space: spectrum.iter().map(|c| c.norm_sqr()).sum::<f64>() * dk,
    })
}
