// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Property-Based Tests (proptest) for kerr-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for kerr-core using proptest.
//!
//! Covers: generator block symmetry, energy bookkeeping of the split-step
//! field propagators, and bosonic invariants of short lossless runs.

use kerr_core::moments::{build_a, build_b};
use kerr_core::operators::{dispersion_loss_step, field_energy, nonlinear_step};
use kerr_core::propagation::{DiagnosticHooks, KerrMedium, Propagator};
use kerr_diagnostics::invariants::{hermitian_deviation, symmetric_deviation};
use kerr_types::config::LossModel;
use kerr_types::state::SpectralGrid;
use ndarray::Array1;
use num_complex::Complex64;
use proptest::prelude::*;

fn grid_and_field(amplitude: f64) -> impl Strategy<Value = (SpectralGrid, Array1<Complex64>)> {
    (2usize..6, 3.0f64..6.0).prop_flat_map(move |(half, zf)| {
        let n = 2 * half + 1;
        prop::collection::vec((-amplitude..amplitude, -amplitude..amplitude), n).prop_map(
            move |v| {
                let grid = SpectralGrid::new(zf, n).unwrap();
                let field =
                    Array1::from_iter(v.into_iter().map(|(re, im)| Complex64::new(re, im)));
                (grid, field)
            },
        )
    })
}

// ── Generator Properties ─────────────────────────────────────────────

proptest! {
    /// A is Hermitian and B symmetric for any mean field.
    #[test]
    fn generator_blocks_symmetric(
        (grid, u) in grid_and_field(3.0),
        td in 0.2f64..5.0,
        tn in 0.2f64..5.0,
    ) {
        let a = build_a(&u, td, tn, &grid).unwrap();
        let b = build_b(&u, tn, &grid).unwrap();
        let scale = 1.0 + a.iter().map(|c| c.norm()).fold(0.0, f64::max);
        prop_assert!(hermitian_deviation(&a) < 1e-12 * scale);
        prop_assert!(symmetric_deviation(&b) == 0.0);
    }
}

// ── Field Propagator Properties ──────────────────────────────────────

proptest! {
    /// Lossless dispersion and the Kerr phase both conserve Σ|u|².
    #[test]
    fn lossless_field_steps_conserve_energy(
        (grid, u) in grid_and_field(3.0),
        td in 0.2f64..5.0,
        tn in 0.2f64..5.0,
        dt in 0.001f64..0.5,
    ) {
        let e0 = field_energy(&u);
        let d = dispersion_loss_step(&u, td, 0.0, &grid.kk, dt).unwrap();
        let k = nonlinear_step(&d, tn, &u, dt).unwrap();
        prop_assert!((field_energy(&d) - e0).abs() < 1e-10 * (1.0 + e0));
        prop_assert!((field_energy(&k) - e0).abs() < 1e-10 * (1.0 + e0));
    }

    /// The loss factor of a full lossy run is exactly exp(-G·dt·steps) in energy.
    #[test]
    fn lossy_energy_decay(
        (grid, u) in grid_and_field(1.0),
        g in 0.0f64..2.0,
        steps in 0usize..6,
    ) {
        let dt = 0.02;
        let medium = KerrMedium::new(1.0, 2.0, g);
        let out = Propagator::new(&grid, medium, steps, dt)
            .unwrap()
            .mean_field(&u)
            .unwrap();
        let expected = field_energy(&u) * (-g * dt * steps as f64).exp();
        prop_assert!((field_energy(&out) - expected).abs() < 1e-10 * (1.0 + expected));
    }
}

// ── Fluctuation Invariants ───────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Short lossless runs keep the bosonic commutators and M†M = N(N + I).
    #[test]
    fn lossless_run_preserves_invariants(
        (grid, u) in grid_and_field(0.5),
        td in 0.5f64..3.0,
        tn in 1.0f64..3.0,
        dt in 0.005f64..0.02,
        steps in 1usize..4,
    ) {
        let result = Propagator::new(&grid, KerrMedium::lossless(td, tn), steps, dt)
            .unwrap()
            .with_hooks(DiagnosticHooks::all())
            .run(LossModel::Lossless, &u)
            .unwrap();
        prop_assert_eq!(result.diagnostics.len(), 1);
        let record = &result.diagnostics[0];
        prop_assert!(record.max_deviation() < 1e-9, "record = {:?}", record);
        prop_assert!(hermitian_deviation(&result.state.n) < 1e-12);
        prop_assert!(result.state.fluctuation_photons() >= -1e-14);
    }
}
