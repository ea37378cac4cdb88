//! Dense complex linear algebra for the fluctuation propagator.
//!
//! Matrix exponential (scaling and squaring), Hermitian eigenvalues and
//! singular values via cyclic Jacobi rotations, plus the block and
//! conjugation helpers the Bogoliubov algebra needs. The matrices in this
//! project are small (n ≤ a few hundred), so everything is hand-rolled on
//! top of ndarray without a LAPACK dependency.

use ndarray::{s, Array1, Array2};
use num_complex::Complex64;

/// Largest 1-norm of the scaled matrix fed to the Taylor series.
const EXPM_THETA: f64 = 0.5;

/// Hard cap on Taylor terms; with ‖A‖₁ ≤ 0.5 the series converges in < 20.
const EXPM_MAX_TERMS: usize = 30;

/// Jacobi sweeps before giving up on full convergence.
const JACOBI_MAX_SWEEPS: usize = 100;

/// Relative off-diagonal Frobenius norm at which Jacobi stops.
const JACOBI_TOL: f64 = 1e-15;

/// n×n complex identity.
pub fn identity(n: usize) -> Array2<Complex64> {
    Array2::eye(n)
}

/// Element-wise complex conjugate.
pub fn conj(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.mapv(|c| c.conj())
}

/// Plain transpose, owned and in standard layout.
pub fn transpose(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().to_owned()
}

/// Conjugate transpose A†.
pub fn conj_transpose(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|c| c.conj())
}

/// Frobenius norm √(Σ|aᵢⱼ|²).
pub fn frobenius_norm(a: &Array2<Complex64>) -> f64 {
    a.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt()
}

/// Induced 1-norm: maximum absolute column sum.
pub fn one_norm(a: &Array2<Complex64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|c| c.norm()).sum::<f64>())
        .fold(0.0_f64, f64::max)
}

/// Assemble the 2n×2n block matrix [[a, b], [c, d]] from n×n blocks.
pub fn assemble_blocks(
    a: &Array2<Complex64>,
    b: &Array2<Complex64>,
    c: &Array2<Complex64>,
    d: &Array2<Complex64>,
) -> Array2<Complex64> {
    let n = a.nrows();
    let mut out = Array2::zeros((2 * n, 2 * n));
    out.slice_mut(s![..n, ..n]).assign(a);
    out.slice_mut(s![..n, n..]).assign(b);
    out.slice_mut(s![n.., ..n]).assign(c);
    out.slice_mut(s![n.., n..]).assign(d);
    out
}

/// Top row blocks (U, W) of a 2n×2n Bogoliubov transfer matrix.
pub fn top_blocks(k: &Array2<Complex64>) -> (Array2<Complex64>, Array2<Complex64>) {
    let n = k.nrows() / 2;
    (
        k.slice(s![..n, ..n]).to_owned(),
        k.slice(s![..n, n..]).to_owned(),
    )
}

/// Matrix exponential e^A by scaling and squaring with a truncated Taylor series.
///
/// A is scaled by 2^-s so that ‖A/2^s‖₁ ≤ 0.5, the series is summed until
/// the next term is below machine precision, then the result is squared s
/// times. Returns a NaN-filled matrix if A contains non-finite entries.
pub fn expm(a: &Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    let norm = one_norm(a);
    if !norm.is_finite() {
        return Array2::from_elem((n, n), Complex64::new(f64::NAN, f64::NAN));
    }

    let squarings = if norm > EXPM_THETA {
        (norm / EXPM_THETA).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a.mapv(|c| c * 0.5_f64.powi(squarings));

    let mut sum = identity(n);
    let mut term = identity(n);
    for k in 1..=EXPM_MAX_TERMS {
        term = term.dot(&scaled).mapv(|c| c / k as f64);
        sum = sum + &term;
        if one_norm(&term) <= f64::EPSILON * one_norm(&sum) {
            break;
        }
    }

    for _ in 0..squarings {
        sum = sum.dot(&sum);
    }
    sum
}

/// Eigenvalues of a real symmetric matrix, ascending, by cyclic Jacobi rotations.
pub fn eigvalsh_real(a: &Array2<f64>) -> Array1<f64> {
    let n = a.nrows();
    let mut m = a.clone();

    let total: f64 = m.iter().map(|v| v * v).sum::<f64>().sqrt();
    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off_diag = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                off_diag += 2.0 * m[[i, j]] * m[[i, j]];
            }
        }
        if off_diag.sqrt() <= JACOBI_TOL * total || off_diag == 0.0 {
            break;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let aij = m[[i, j]];
                if aij.abs() < f64::MIN_POSITIVE {
                    continue;
                }
                let tau = (m[[j, j]] - m[[i, i]]) / (2.0 * aij);
                let t = if tau >= 0.0 {
                    1.0 / (tau + (1.0 + tau * tau).sqrt())
                } else {
                    -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                };
                let cos = 1.0 / (1.0 + t * t).sqrt();
                let sin = t * cos;

                let aii = m[[i, i]];
                let ajj = m[[j, j]];
                m[[i, i]] = cos * cos * aii - 2.0 * sin * cos * aij + sin * sin * ajj;
                m[[j, j]] = sin * sin * aii + 2.0 * sin * cos * aij + cos * cos * ajj;
                m[[i, j]] = 0.0;
                m[[j, i]] = 0.0;

                for r in 0..n {
                    if r == i || r == j {
                        continue;
                    }
                    let ri = m[[r, i]];
                    let rj = m[[r, j]];
                    m[[r, i]] = cos * ri - sin * rj;
                    m[[i, r]] = m[[r, i]];
                    m[[r, j]] = sin * ri + cos * rj;
                    m[[j, r]] = m[[r, j]];
                }
            }
        }
    }

    let mut vals: Vec<f64> = m.diag().to_vec();
    vals.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    Array1::from_vec(vals)
}

/// Eigenvalues of a Hermitian matrix, ascending. Matches `numpy.linalg.eigvalsh`.
///
/// H = X + iY is embedded as the real symmetric [[X, -Y], [Y, X]], whose
/// spectrum is that of H with every eigenvalue doubled. Only the Hermitian
/// part of the input is used.
pub fn eigvalsh(h: &Array2<Complex64>) -> Array1<f64> {
    let n = h.nrows();
    let mut embedded = Array2::zeros((2 * n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            let hij = (h[[i, j]] + h[[j, i]].conj()) * 0.5;
            embedded[[i, j]] = hij.re;
            embedded[[i + n, j + n]] = hij.re;
            embedded[[i, j + n]] = -hij.im;
            embedded[[i + n, j]] = hij.im;
        }
    }
    let doubled = eigvalsh_real(&embedded);
    Array1::from_shape_fn(n, |k| doubled[2 * k])
}

/// Singular values of a square complex matrix, ascending.
pub fn singular_values(a: &Array2<Complex64>) -> Array1<f64> {
    let gram = conj_transpose(a).dot(a);
    eigvalsh(&gram).mapv(|v| v.max(0.0).sqrt())
}
