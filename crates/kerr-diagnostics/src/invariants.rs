// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Invariant Diagnostics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bogoliubov and pair-correlation identities.
//!
//! For a transfer matrix K = [[U, W], [W*, U*]] that preserves the bosonic
//! commutators, U·U† − W·W† = I and U·Wᵗ = W·Uᵗ. The moments derived from
//! it, M = U·Wᵗ and N = W*·Wᵗ, then satisfy M†M = N(N + I), and the squared
//! singular values of M equal λ(λ + 1) for the eigenvalues λ of N.

use kerr_math::linalg::{conj_transpose, eigvalsh, frobenius_norm, identity, singular_values};
use kerr_types::error::{KerrError, KerrResult};
use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Deviations of the (U, W) blocks from the bosonic commutation relations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitarityReport {
    /// ‖U·U† − W·W† − I‖_F
    pub commutator: f64,
    /// ‖U·Wᵗ − W·Uᵗ‖_F
    pub symmetry: f64,
}

/// Deviations of (M, N) from the pure-state pair-correlation identities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentReport {
    /// ‖M†M − N(N + I)‖_F
    pub pair_correlation: f64,
    /// ‖sort(σ(M))² − sort(λ(N))·(sort(λ(N)) + 1)‖₂
    pub spectrum: f64,
}

/// Checks gathered at one point of a propagation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Number of completed steps when the check ran.
    pub step: usize,
    pub unitarity: Option<UnitarityReport>,
    pub moments: Option<MomentReport>,
}

impl UnitarityReport {
    pub fn max_deviation(&self) -> f64 {
        self.commutator.max(self.symmetry)
    }

    pub fn within(&self, tolerance: f64) -> bool {
        self.max_deviation() <= tolerance
    }

    /// Turn the report into a `ToleranceExceeded` error for callers that
    /// want to fail on it.
    pub fn ensure(&self, tolerance: f64) -> KerrResult<()> {
        exceed("unitarity", self.max_deviation(), tolerance)
    }
}

impl MomentReport {
    pub fn max_deviation(&self) -> f64 {
        self.pair_correlation.max(self.spectrum)
    }

    pub fn within(&self, tolerance: f64) -> bool {
        self.max_deviation() <= tolerance
    }

    pub fn ensure(&self, tolerance: f64) -> KerrResult<()> {
        exceed("pair correlation", self.max_deviation(), tolerance)
    }
}

impl DiagnosticRecord {
    /// Largest deviation over whichever checks ran.
    pub fn max_deviation(&self) -> f64 {
        let u = self.unitarity.map_or(0.0, |r| r.max_deviation());
        let m = self.moments.map_or(0.0, |r| r.max_deviation());
        u.max(m)
    }
}

fn exceed(check: &str, deviation: f64, tolerance: f64) -> KerrResult<()> {
    // NaN deviations fail as well
    if deviation <= tolerance {
        Ok(())
    } else {
        Err(KerrError::ToleranceExceeded {
            check: check.to_string(),
            deviation,
            tolerance,
        })
    }
}

fn square_pair(
    a: &Array2<Complex64>,
    b: &Array2<Complex64>,
    context: &str,
) -> KerrResult<usize> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(KerrError::dimension(context, n, a.ncols()));
    }
    if b.dim() != (n, n) {
        return Err(KerrError::dimension(context, n, b.nrows().max(b.ncols())));
    }
    Ok(n)
}

/// Bosonic commutation check of the transfer blocks U and W.
pub fn check_unitarity(u: &Array2<Complex64>, w: &Array2<Complex64>) -> KerrResult<UnitarityReport> {
    let n = square_pair(u, w, "unitarity check")?;
    let commutator = u.dot(&conj_transpose(u)) - w.dot(&conj_transpose(w)) - identity(n);
    let symmetry = u.dot(&w.t()) - w.dot(&u.t());
    Ok(UnitarityReport {
        commutator: frobenius_norm(&commutator),
        symmetry: frobenius_norm(&symmetry),
    })
}

/// Pair-correlation check of the moments M (pair) and N (particle).
pub fn check_moments(m: &Array2<Complex64>, n: &Array2<Complex64>) -> KerrResult<MomentReport> {
    let size = square_pair(m, n, "moment check")?;
    let n_plus = n + &identity(size);
    let pair = conj_transpose(m).dot(m) - n.dot(&n_plus);

    let lambda = eigvalsh(n);
    let sigma = singular_values(m);
    let spectrum = sigma
        .iter()
        .zip(lambda.iter())
        .map(|(s, l)| (s * s - l * (l + 1.0)).powi(2))
        .sum::<f64>()
        .sqrt();

    Ok(MomentReport {
        pair_correlation: frobenius_norm(&pair),
        spectrum,
    })
}

/// ‖A − A†‖_F, zero for Hermitian A.
pub fn hermitian_deviation(a: &Array2<Complex64>) -> f64 {
    frobenius_norm(&(a - &conj_transpose(a)))
}

/// ‖B − Bᵗ‖_F, zero for symmetric B.
pub fn symmetric_deviation(b: &Array2<Complex64>) -> f64 {
    frobenius_norm(&(b - &b.t()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerr_math::linalg::{assemble_blocks, conj, expm, top_blocks};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    fn random_matrix(rng: &mut StdRng, n: usize) -> Array2<Complex64> {
        Array2::from_shape_fn((n, n), |_| {
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            Complex64::new(re, im) * 0.5
        })
    }

    /// exp(i·t·Q) for a random Hermitian A and symmetric B.
    fn bogoliubov(seed: u64, n: usize, t: f64) -> (Array2<Complex64>, Array2<Complex64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = random_matrix(&mut rng, n);
        let a = (&a + &conj_transpose(&a)).mapv(|c| c * 0.5);
        let b = random_matrix(&mut rng, n);
        let b = (&b + &b.t()).mapv(|c| c * 0.5);
        let q = assemble_blocks(&a, &b, &conj(&b).mapv(|c| -c), &conj(&a).mapv(|c| -c));
        let k = expm(&q.mapv(|c| c * Complex64::new(0.0, t)));
        top_blocks(&k)
    }

    #[test]
    fn test_identity_transfer_is_exact() {
        let n = 4;
        let report = check_unitarity(&identity(n), &Array2::zeros((n, n))).unwrap();
        assert_eq!(report.commutator, 0.0);
        assert_eq!(report.symmetry, 0.0);
        assert!(report.ensure(1e-12).is_ok());
    }

    #[test]
    fn test_bogoliubov_blocks_pass() {
        let (u, w) = bogoliubov(7, 5, 0.3);
        let report = check_unitarity(&u, &w).unwrap();
        assert!(report.within(1e-10), "report = {report:?}");
        // squeezing actually happened
        assert!(frobenius_norm(&w) > 1e-3);
    }

    #[test]
    fn test_pure_state_moments_pass() {
        let (u, w) = bogoliubov(11, 6, 0.4);
        let m = u.dot(&w.t());
        let n = conj(&w).dot(&w.t());
        let report = check_moments(&m, &n).unwrap();
        assert!(report.within(1e-9), "report = {report:?}");
        assert!(hermitian_deviation(&n) < 1e-12);
        assert!(symmetric_deviation(&m) < 1e-10);
    }

    #[test]
    fn test_broken_blocks_fail() {
        let n = 3;
        let u = identity(n).mapv(|c| c * 2.0);
        let report = check_unitarity(&u, &Array2::zeros((n, n))).unwrap();
        // ‖4I - I‖ = 3√3
        assert!((report.commutator - 3.0 * 3.0_f64.sqrt()).abs() < 1e-12);
        match report.ensure(1e-8) {
            Err(KerrError::ToleranceExceeded { check, .. }) => assert_eq!(check, "unitarity"),
            other => panic!("expected ToleranceExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_damped_moments_violate_identity() {
        let (u, w) = bogoliubov(3, 4, 0.5);
        let damp = 0.5;
        let m = u.dot(&w.t()).mapv(|c| c * damp);
        let n = conj(&w).dot(&w.t()).mapv(|c| c * damp);
        let report = check_moments(&m, &n).unwrap();
        assert!(!report.within(1e-8));
    }

    #[test]
    fn test_shape_mismatch() {
        let u = identity(3);
        let w = Array2::zeros((2, 2));
        assert!(matches!(
            check_unitarity(&u, &w),
            Err(KerrError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_record_max_deviation() {
        let record = DiagnosticRecord {
            step: 3,
            unitarity: Some(UnitarityReport {
                commutator: 1e-12,
                symmetry: 4e-12,
            }),
            moments: None,
        };
        assert_eq!(record.max_deviation(), 4e-12);
    }
}
