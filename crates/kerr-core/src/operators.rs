// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Split-Step Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elementary split-step propagators for the mean field.
//!
//! One full step is D(dt/2) · N(dt) · D(dt/2): the dispersive half step is
//! applied as a multiplication in reciprocal space, the Kerr phase as a
//! pointwise multiplication in real space.

use kerr_math::fft::{fft, ifft};
use kerr_types::error::{KerrError, KerrResult};
use ndarray::{Array1, Zip};
use num_complex::Complex64;

/// Half-step dispersion and loss propagator.
///
/// Applies exp(i·(dt/2)·k²/(2·TD)) to every Fourier component of `field`
/// (`kk` in FFT order, DC first) and damps the amplitude by exp(-dt·G/4).
/// Called twice per full step.
pub fn dispersion_loss_step(
    field: &Array1<Complex64>,
    dispersion_time: f64,
    loss_rate: f64,
    kk: &Array1<f64>,
    dt: f64,
) -> KerrResult<Array1<Complex64>> {
    if field.len() != kk.len() {
        return Err(KerrError::dimension(
            "dispersion step frequency grid",
            field.len(),
            kk.len(),
        ));
    }

    let mut spectrum = fft(field);
    Zip::from(&mut spectrum).and(kk).for_each(|c, &k| {
        let phase = dt / 2.0 * (k * k / (2.0 * dispersion_time));
        *c *= Complex64::from_polar(1.0, phase);
    });

    let damping = (dt / 2.0 * (-loss_rate / 2.0)).exp();
    Ok(ifft(&spectrum).mapv(|c| c * damping))
}

/// Full-step Kerr phase exp(i·dt/TN·|reference|²) applied pointwise to `field`.
///
/// `reference` is the field from before the surrounding half dispersion
/// step, not the partially updated one.
pub fn nonlinear_step(
    field: &Array1<Complex64>,
    nonlinear_time: f64,
    reference: &Array1<Complex64>,
    dt: f64,
) -> KerrResult<Array1<Complex64>> {
    if field.len() != reference.len() {
        return Err(KerrError::dimension(
            "nonlinear step reference field",
            field.len(),
            reference.len(),
        ));
    }

    let mut out = field.clone();
    Zip::from(&mut out).and(reference).for_each(|c, r| {
        *c *= Complex64::from_polar(1.0, dt / nonlinear_time * r.norm_sqr());
    });
    Ok(out)
}

/// Σ|u|², the discrete pulse energy up to the grid spacing.
pub fn field_energy(field: &Array1<Complex64>) -> f64 {
    field.iter().map(|c| c.norm_sqr()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerr_math::fft::forward_transform;
    use kerr_types::state::SpectralGrid;

    fn gaussian(grid: &SpectralGrid) -> Array1<Complex64> {
        grid.zz.mapv(|z| Complex64::new((-z * z / 2.0).exp(), 0.0))
    }

    #[test]
    fn test_dispersion_preserves_energy_without_loss() {
        let grid = SpectralGrid::new(5.0, 21).unwrap();
        let u = gaussian(&grid);
        let out = dispersion_loss_step(&u, 0.7, 0.0, &grid.kk, 0.3).unwrap();
        assert!((field_energy(&out) - field_energy(&u)).abs() < 1e-12);
        // but the shape changes
        assert!((&out - &u).iter().map(|c| c.norm()).sum::<f64>() > 1e-6);
    }

    #[test]
    fn test_dispersion_preserves_power_spectrum() {
        let grid = SpectralGrid::new(5.0, 21).unwrap();
        let u = gaussian(&grid);
        let out = dispersion_loss_step(&u, 0.7, 0.0, &grid.kk, 0.3).unwrap();
        let before = forward_transform(&u, grid.dz).unwrap();
        let after = forward_transform(&out, grid.dz).unwrap();
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a.norm() - b.norm()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_loss_damping_factor() {
        let grid = SpectralGrid::new(5.0, 21).unwrap();
        let u = gaussian(&grid);
        let (g, dt) = (0.8, 0.05);
        let out = dispersion_loss_step(&u, f64::INFINITY, g, &grid.kk, dt).unwrap();
        let expected = (-dt * g / 4.0).exp();
        for (a, b) in u.iter().zip(out.iter()) {
            assert!((*a * expected - *b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_infinite_dispersion_time_is_identity() {
        let grid = SpectralGrid::new(3.0, 11).unwrap();
        let u = gaussian(&grid);
        let out = dispersion_loss_step(&u, f64::INFINITY, 0.0, &grid.kk, 1.0).unwrap();
        for (a, b) in u.iter().zip(out.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_nonlinear_phase_uses_reference() {
        let field = Array1::from_elem(3, Complex64::new(1.0, 0.0));
        let reference = Array1::from_vec(vec![
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 2.0),
        ]);
        let out = nonlinear_step(&field, 2.0, &reference, 0.5).unwrap();
        // phase = dt/TN·|ref|² = 0.25·{0, 1, 4}
        assert!((out[0] - Complex64::new(1.0, 0.0)).norm() < 1e-15);
        assert!((out[1] - Complex64::from_polar(1.0, 0.25)).norm() < 1e-15);
        assert!((out[2] - Complex64::from_polar(1.0, 1.0)).norm() < 1e-15);
        for c in out.iter() {
            assert!((c.norm() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let grid = SpectralGrid::new(3.0, 11).unwrap();
        let u = Array1::<Complex64>::zeros(9);
        assert!(matches!(
            dispersion_loss_step(&u, 1.0, 0.0, &grid.kk, 0.1),
            Err(KerrError::DimensionMismatch { .. })
        ));
        let r = Array1::<Complex64>::zeros(8);
        assert!(nonlinear_step(&u, 1.0, &r, 0.1).is_err());
    }
}
