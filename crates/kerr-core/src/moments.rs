// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Moment Matrix Builder
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Instantaneous fluctuation generator built from the current mean field.
//!
//! Linearising the Kerr equation around the mean field u gives, on the
//! centred frequency grid, d(b, b†)/dt = i·Q·(b, b†) with
//!
//! ```text
//! Q = [[ A,  B ],        A_ij = δ_ij·k_i²/(2TD) + 2·dk/√(2π)·m(k_i - k_j)
//!      [-B*, -A*]]       B_ij = dk/√(2π)·s(k_i + k_j)
//! ```
//!
//! where m and s are the spectra of |u|²/TN (self-phase modulation) and
//! u²/TN (four-wave mixing). A is Hermitian and B symmetric because the
//! index tables are symmetric under i ↔ j.

use kerr_math::fft::forward_transform;
use kerr_math::linalg::{assemble_blocks, conj};
use kerr_types::constants::SQRT_2PI;
use kerr_types::error::KerrResult;
use kerr_types::state::SpectralGrid;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Spectrum of |u|², scaled by 1/TN.
pub fn self_phase_term(
    field: &Array1<Complex64>,
    nonlinear_time: f64,
    dz: f64,
) -> KerrResult<Array1<Complex64>> {
    let intensity = field.mapv(|c| Complex64::new(c.norm_sqr(), 0.0));
    Ok(forward_transform(&intensity, dz)?.mapv(|c| c / nonlinear_time))
}

/// Spectrum of u², scaled by 1/TN.
pub fn pair_term(
    field: &Array1<Complex64>,
    nonlinear_time: f64,
    dz: f64,
) -> KerrResult<Array1<Complex64>> {
    let square = field.mapv(|c| c * c);
    Ok(forward_transform(&square, dz)?.mapv(|c| c / nonlinear_time))
}

/// Particle-number coupling block A: dispersion diagonal plus self-phase modulation.
pub fn build_a(
    field: &Array1<Complex64>,
    dispersion_time: f64,
    nonlinear_time: f64,
    grid: &SpectralGrid,
) -> KerrResult<Array2<Complex64>> {
    grid.check_field(field, "A matrix mean field")?;
    let m = self_phase_term(field, nonlinear_time, grid.dz)?;
    let coupling = 2.0 * grid.dk / SQRT_2PI;

    let mut a = Array2::from_shape_fn((grid.n, grid.n), |(i, j)| {
        m[grid.diff_index[[i, j]]] * coupling
    });
    for (i, &k) in grid.ks.iter().enumerate() {
        a[[i, i]] += k * k / (2.0 * dispersion_time);
    }
    Ok(a)
}

/// Pair-creation block B: four-wave mixing.
pub fn build_b(
    field: &Array1<Complex64>,
    nonlinear_time: f64,
    grid: &SpectralGrid,
) -> KerrResult<Array2<Complex64>> {
    grid.check_field(field, "B matrix mean field")?;
    let s = pair_term(field, nonlinear_time, grid.dz)?;
    let coupling = grid.dk / SQRT_2PI;
    Ok(Array2::from_shape_fn((grid.n, grid.n), |(i, j)| {
        s[grid.sum_index[[i, j]]] * coupling
    }))
}

/// Full 2n×2n generator [[A, B], [-conj(B)ᵗ, -conj(A)]].
pub fn build_generator(
    field: &Array1<Complex64>,
    dispersion_time: f64,
    nonlinear_time: f64,
    grid: &SpectralGrid,
) -> KerrResult<Array2<Complex64>> {
    let a = build_a(field, dispersion_time, nonlinear_time, grid)?;
    let b = build_b(field, nonlinear_time, grid)?;
    let lower_left = b.t().mapv(|c| -c.conj());
    let lower_right = conj(&a).mapv(|c| -c);
    Ok(assemble_blocks(&a, &b, &lower_left, &lower_right))
}
