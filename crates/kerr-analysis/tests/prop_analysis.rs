// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Property-Based Tests (proptest) for kerr-analysis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kerr-analysis using proptest.
//!
//! Covers: pulse width conversions, FWHM of sampled Gaussians, the
//! analytic squeezing bound, and the homodyne readout of single-mode
//! squeezed states.

use kerr_analysis::pulse::PulseShape;
use kerr_analysis::squeezing::{expected_squeezing_gaussian, fwhm, squeezing_spectrum};
use kerr_math::fft::forward_transform;
use kerr_types::state::SpectralGrid;
use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;

// ── Pulse Properties ─────────────────────────────────────────────────

proptest! {
    /// Unit widths are positive and never exceed the FWHM.
    #[test]
    fn unit_width_bounded(fwhm_s in 1e-15f64..1e-9) {
        for shape in [PulseShape::Gaussian, PulseShape::rect(), PulseShape::Sech, PulseShape::Lorentzian] {
            let t0 = shape.unit_width(fwhm_s);
            prop_assert!(t0 > 0.0 && t0 <= fwhm_s);
        }
    }

    /// FWHM of exp(-z²/(2σ²)) is 2√(2 ln 2)·σ to within grid resolution.
    #[test]
    fn gaussian_fwhm(sigma in 0.3f64..2.0) {
        let grid = SpectralGrid::new(8.0, 801).unwrap();
        let y = grid.zz.mapv(|z| (-z * z / (2.0 * sigma * sigma)).exp());
        let width = fwhm(&grid.zz, &y).unwrap();
        let exact = 2.0 * (2.0 * std::f64::consts::LN_2).sqrt() * sigma;
        prop_assert!((width - exact).abs() <= 2.0 * grid.dz,
            "sigma {}: width {} vs {}", sigma, width, exact);
    }
}

// ── Squeezing Properties ─────────────────────────────────────────────

proptest! {
    /// Lossless Kerr squeezing of a Gaussian pulse never exceeds vacuum noise.
    #[test]
    fn expected_squeezing_below_vacuum(n_phi in 0.0f64..10.0) {
        let db = expected_squeezing_gaussian(n_phi);
        prop_assert!(db.is_finite());
        prop_assert!(db <= 1e-12);
    }

    /// A squeezed vacuum in the LO mode reads out as e^{-2r} at best and
    /// e^{2r} at worst, whatever the squeezing angle.
    #[test]
    fn single_mode_readout(r in 0.0f64..1.5, theta in 0.0f64..std::f64::consts::TAU) {
        let grid = SpectralGrid::new(5.0, 9).unwrap();
        let u = grid.zz.mapv(|z| Complex64::new((-z * z / 2.0).exp(), 0.0));
        let s = forward_transform(&u, grid.dz).unwrap();
        let norm = s.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
        let f = s.mapv(|c| c / norm);

        let p1 = Complex64::from_polar(-r.sinh() * r.cosh(), theta);
        let p2 = r.sinh() * r.sinh();
        let m = Array2::from_shape_fn((9, 9), |(i, j)| f[i] * f[j] * p1);
        let n = Array2::from_shape_fn((9, 9), |(i, j)| f[i].conj() * f[j] * p2);

        let spectrum = squeezing_spectrum(&u, &m, &n, grid.dz).unwrap();
        let best = 10.0 * (-2.0 * r).exp().log10();
        let worst = 10.0 * (2.0 * r).exp().log10();
        prop_assert!(spectrum.min_db() >= best - 1e-9);
        prop_assert!(spectrum.max_db() <= worst + 1e-9);
        // phase sampling misses the optimum by at most half a step
        prop_assert!(spectrum.min_db() - best < 0.5);
    }
}
