// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Squeezing Readout
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Homodyne squeezing of the propagated fluctuations.
//!
//! The local oscillator is the normalised spectrum f of the evolved mean
//! field. With p1 = Σ f̄ᵢ Mᵢⱼ f̄ⱼ and p2 = Σ fᵢ Nᵢⱼ f̄ⱼ the quadrature
//! variance at LO phase φ, relative to vacuum, is
//! 2·Re(e^{2iφ}·p1) + 2·p2 + 1.

use kerr_math::fft::forward_transform;
use kerr_types::constants::SQUEEZING_PHASE_POINTS;
use kerr_types::error::{KerrError, KerrResult};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Quadrature noise in dB relative to vacuum over LO phases in [0, π].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqueezingSpectrum {
    pub phase: Array1<f64>,
    pub db: Array1<f64>,
}

impl SqueezingSpectrum {
    /// Best squeezing (most negative dB).
    pub fn min_db(&self) -> f64 {
        self.db.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Anti-squeezing (most positive dB).
    pub fn max_db(&self) -> f64 {
        self.db.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// LO phase of the best squeezing.
    pub fn optimal_phase(&self) -> f64 {
        let mut best = 0;
        for (i, &v) in self.db.iter().enumerate() {
            if v < self.db[best] {
                best = i;
            }
        }
        self.phase[best]
    }
}

/// Squeezing measured with a local oscillator matched to `field`.
pub fn squeezing_spectrum(
    field: &Array1<Complex64>,
    m: &Array2<Complex64>,
    n: &Array2<Complex64>,
    dz: f64,
) -> KerrResult<SqueezingSpectrum> {
    let size = field.len();
    for (name, matrix) in [("M moment", m), ("N moment", n)] {
        if matrix.dim() != (size, size) {
            return Err(KerrError::dimension(
                format!("squeezing {name}"),
                size,
                matrix.nrows().max(matrix.ncols()),
            ));
        }
    }

    let spectrum = forward_transform(field, dz)?;
    let norm = spectrum.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if !(norm > 0.0) || !norm.is_finite() {
        return Err(KerrError::InvalidParameter(format!(
            "local oscillator needs a non-zero finite mean field, spectrum norm is {norm}"
        )));
    }
    let f = spectrum.mapv(|c| c / norm);
    let fc = f.mapv(|c| c.conj());

    let p1 = fc.dot(&m.dot(&fc));
    let p2 = f.dot(&n.dot(&fc));

    let phase = Array1::linspace(0.0, std::f64::consts::PI, SQUEEZING_PHASE_POINTS);
    let mut db = Array1::zeros(SQUEEZING_PHASE_POINTS);
    for (out, &phi) in db.iter_mut().zip(phase.iter()) {
        let rotated = Complex64::from_polar(1.0, 2.0 * phi) * p1;
        let variance = 2.0 * rotated.re + 2.0 * p2.re + 1.0;
        if !(variance > 0.0) {
            return Err(KerrError::PhysicsViolation(format!(
                "quadrature variance {variance} at LO phase {phi} is not positive"
            )));
        }
        *out = 10.0 * variance.log10();
    }
    Ok(SqueezingSpectrum { phase, db })
}

/// Squeezing in dB for a Gaussian pulse after lossless, dispersionless
/// propagation with peak nonlinear phase `n_phi` (JOSA B 7, 30 (1990)).
pub fn expected_squeezing_gaussian(n_phi: f64) -> f64 {
    let sqrt2 = std::f64::consts::SQRT_2;
    let phi2 = n_phi * n_phi;
    let variance = 1.0 + 2.0 * phi2 / 3.0f64.sqrt()
        - (sqrt2 * n_phi + 2.0 * sqrt2 * phi2 * n_phi / 3.0) / (1.0 + 2.0 * phi2 / 3.0).sqrt();
    10.0 * variance.log10()
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Full width at half maximum of samples `y` over abscissae `x`, to grid
/// resolution: distance between the first upward and the last downward
/// half-maximum crossing.
pub fn fwhm(x: &Array1<f64>, y: &Array1<f64>) -> KerrResult<f64> {
    if x.len() != y.len() {
        return Err(KerrError::dimension("fwhm abscissae", y.len(), x.len()));
    }
    let half_max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max) / 2.0;

    let mut left = None;
    let mut right = None;
    for i in 0..y.len().saturating_sub(1) {
        let d = sign(half_max - y[i]) - sign(half_max - y[i + 1]);
        if d > 0.0 && left.is_none() {
            left = Some(i);
        }
        if d < 0.0 {
            right = Some(i);
        }
    }
    match (left, right) {
        (Some(l), Some(r)) => Ok(x[r] - x[l]),
        _ => Err(KerrError::InvalidParameter(
            "samples do not cross half maximum on both sides".to_string(),
        )),
    }
}
