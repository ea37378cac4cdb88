// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{KerrError, KerrResult};

/// Real-space and reciprocal-space discretisation shared by every step of a run.
///
/// Built once per propagation call and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SpectralGrid {
    pub n: usize,
    pub zf: f64,
    /// Real-space positions, linspace(-zf, zf, n).
    pub zz: Array1<f64>,
    pub dz: f64,
    /// Angular frequencies in FFT order (DC first), 2π·fftfreq(n, dz).
    pub kk: Array1<f64>,
    /// The same frequencies centre-shifted (DC at index (n-1)/2).
    pub ks: Array1<f64>,
    pub dk: f64,
    /// `diff_index[[i, j]]` is the ks index nearest to ks[i] - ks[j], clipped to the grid.
    pub diff_index: Array2<usize>,
    /// `sum_index[[i, j]]` is the ks index nearest to ks[i] + ks[j], clipped to the grid.
    pub sum_index: Array2<usize>,
}

impl SpectralGrid {
    /// Grid of `n` points on [-zf, zf]. `n` must be odd so the grid is
    /// symmetric about zero and the DC bin sits in the centre of `ks`.
    pub fn new(zf: f64, n: usize) -> KerrResult<Self> {
        if n < 3 || n % 2 == 0 {
            return Err(KerrError::dimension(
                "grid size (odd, at least 3)",
                n.max(2) | 1,
                n,
            ));
        }
        if !zf.is_finite() || zf <= 0.0 {
            return Err(KerrError::InvalidParameter(format!(
                "grid half-width must be finite and positive, got {zf}"
            )));
        }

        let zz = Array1::linspace(-zf, zf, n);
        let dz = zz[1] - zz[0];

        // numpy.fft.fftfreq ordering: 0, 1, ..., (n-1)/2, -(n-1)/2, ..., -1
        let half = (n - 1) / 2;
        let val = 1.0 / (n as f64 * dz);
        let kk = Array1::from_shape_fn(n, |i| {
            let bin = if i <= half {
                i as f64
            } else {
                i as f64 - n as f64
            };
            bin * val * 2.0 * std::f64::consts::PI
        });
        let ks = Array1::from_shape_fn(n, |j| kk[(j + n - n / 2) % n]);
        let dk = kk[1] - kk[0];

        let last = (n - 1) as f64;
        let clip = |x: f64| -> usize { (x.round() + half as f64).clamp(0.0, last) as usize };
        let diff_index = Array2::from_shape_fn((n, n), |(i, j)| clip(ks[i] / dk - ks[j] / dk));
        let sum_index = Array2::from_shape_fn((n, n), |(i, j)| clip(ks[i] / dk + ks[j] / dk));

        Ok(SpectralGrid {
            n,
            zf,
            zz,
            dz,
            kk,
            ks,
            dk,
            diff_index,
            sum_index,
        })
    }

    /// Index of the zero-frequency bin in `ks`.
    pub fn centre(&self) -> usize {
        (self.n - 1) / 2
    }

    /// Fail-fast length check for a caller-supplied field.
    pub fn check_field(&self, field: &Array1<Complex64>, context: &str) -> KerrResult<()> {
        if field.len() != self.n {
            return Err(KerrError::dimension(context, self.n, field.len()));
        }
        Ok(())
    }
}

/// Mean field and second-order fluctuation moments `(u, M, N)`.
///
/// `m` is the anomalous (pair) moment ⟨b_i b_j⟩ and `n` the normal
/// (particle) moment ⟨b_i† b_j⟩, both indexed on the centred frequency grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMoments {
    pub field: Array1<Complex64>,
    pub m: Array2<Complex64>,
    pub n: Array2<Complex64>,
}

impl FieldMoments {
    /// Mean field with vacuum fluctuations (M = N = 0).
    pub fn vacuum(field: Array1<Complex64>) -> Self {
        let size = field.len();
        FieldMoments {
            field,
            m: Array2::zeros((size, size)),
            n: Array2::zeros((size, size)),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.field.iter().all(|c| c.is_finite())
            && self.m.iter().all(|c| c.is_finite())
            && self.n.iter().all(|c| c.is_finite())
    }

    /// Total photon number of the fluctuations, tr N.
    pub fn fluctuation_photons(&self) -> f64 {
        self.n.diag().iter().map(|c| c.re).sum()
    }
}
