//! 1D FFT wrappers around rustfft.
//!
//! Convention matches numpy:
//! - Forward FFT (fft): unnormalized
//! - Inverse FFT (ifft): normalized by 1/n
//!
//! On top of these sit the symmetric transforms used by the split-step
//! engine: spectrum = fftshift(fft(field))·dz/√(2π) and its exact inverse.

use kerr_types::constants::SQRT_2PI;
use kerr_types::error::{KerrError, KerrResult};
use ndarray::Array1;
use num_complex::Complex64;
use rustfft::FftPlanner;

/// Forward FFT. Matches `numpy.fft.fft()`.
pub fn fft(input: &Array1<Complex64>) -> Array1<Complex64> {
    let mut data = input.to_vec();
    if data.is_empty() {
        return Array1::from_vec(data);
    }
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(data.len()).process(&mut data);
    Array1::from_vec(data)
}

/// Inverse FFT. Matches `numpy.fft.ifft()`, including the 1/n normalization.
pub fn ifft(input: &Array1<Complex64>) -> Array1<Complex64> {
    let mut data = input.to_vec();
    if data.is_empty() {
        return Array1::from_vec(data);
    }
    let norm = 1.0 / data.len() as f64;
    let mut planner = FftPlanner::new();
    planner.plan_fft_inverse(data.len()).process(&mut data);
    Array1::from_iter(data.into_iter().map(|c| c * norm))
}

/// Move the zero-frequency bin to the centre. Matches `numpy.fft.fftshift()`.
pub fn fftshift<T: Clone>(input: &Array1<T>) -> Array1<T> {
    let n = input.len();
    Array1::from_shape_fn(n, |j| input[(j + n - n / 2) % n].clone())
}

/// Undo `fftshift`. Matches `numpy.fft.ifftshift()`; differs from
/// `fftshift` only for odd lengths.
pub fn ifftshift<T: Clone>(input: &Array1<T>) -> Array1<T> {
    let n = input.len();
    Array1::from_shape_fn(n, |j| input[(j + n / 2) % n].clone())
}

/// Sample frequencies for spacing `d`. Matches `numpy.fft.fftfreq()`.
pub fn fftfreq(n: usize, d: f64) -> Array1<f64> {
    let val = 1.0 / (n as f64 * d);
    let half = (n - 1) / 2;
    Array1::from_shape_fn(n, |i| {
        if i <= half {
            i as f64 * val
        } else {
            (i as f64 - n as f64) * val
        }
    })
}

/// A non-finite or zero spacing leaves none of the `n` samples on a usable axis.
fn check_spacing(spacing: f64, n: usize) -> KerrResult<()> {
    if !spacing.is_finite() || spacing == 0.0 {
        return Err(KerrError::dimension(
            format!("transform axis with spacing {spacing}"),
            n,
            0,
        ));
    }
    Ok(())
}

/// Centred, √(2π)-normalised spectrum of a real-space field sampled at spacing `dz`.
pub fn forward_transform(field: &Array1<Complex64>, dz: f64) -> KerrResult<Array1<Complex64>> {
    if field.is_empty() {
        return Err(KerrError::dimension("forward transform input", 1, 0));
    }
    check_spacing(dz, field.len())?;
    let scale = dz / SQRT_2PI;
    Ok(fftshift(&fft(field)).mapv(|c| c * scale))
}

/// Exact inverse of [`forward_transform`]; `n` is the expected length.
pub fn inverse_transform(
    spectrum: &Array1<Complex64>,
    dz: f64,
    n: usize,
) -> KerrResult<Array1<Complex64>> {
    if n == 0 || spectrum.len() != n {
        return Err(KerrError::dimension(
            "inverse transform input",
            n,
            spectrum.len(),
        ));
    }
    check_spacing(dz, n)?;
    let scale = SQRT_2PI / dz;
    Ok(ifft(&ifftshift(spectrum)).mapv(|c| c * scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Array1<Complex64> {
        Array1::from_shape_fn(n, |i| Complex64::new(i as f64, 0.5 * (i as f64).sin()))
    }

    #[test]
    fn test_fft_roundtrip() {
        let original = ramp(15);
        let recovered = ifft(&fft(&original));
        for (i, (a, b)) in original.iter().zip(recovered.iter()).enumerate() {
            assert!((a - b).norm() < 1e-12, "roundtrip failed at {i}: {a} vs {b}");
        }
    }

    #[test]
    fn test_fft_dc_component() {
        let n = 9;
        let val = 3.0;
        let input = Array1::from_elem(n, Complex64::new(val, 0.0));
        let spectrum = fft(&input);
        assert!((spectrum[0].re - n as f64 * val).abs() < 1e-12);
        for k in 1..n {
            assert!(spectrum[k].norm() < 1e-12, "bin {k} should vanish");
        }
    }

    #[test]
    fn test_shift_odd_length() {
        let x = Array1::from_vec(vec![0, 1, 2, 3, -3, -2, -1]);
        assert_eq!(fftshift(&x).to_vec(), vec![-3, -2, -1, 0, 1, 2, 3]);
        assert_eq!(ifftshift(&fftshift(&x)), x);
    }

    #[test]
    fn test_shift_even_length() {
        let x = Array1::from_vec(vec![0, 1, 2, -3, -2, -1]);
        assert_eq!(fftshift(&x).to_vec(), vec![-3, -2, -1, 0, 1, 2]);
        assert_eq!(ifftshift(&fftshift(&x)), x);
    }

    #[test]
    fn test_fftfreq_matches_numpy() {
        let f = fftfreq(5, 0.5);
        let expected = [0.0, 0.4, 0.8, -0.8, -0.4];
        for (a, b) in f.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_transform_roundtrip() {
        let original = ramp(11);
        let spectrum = forward_transform(&original, 0.37).unwrap();
        let recovered = inverse_transform(&spectrum, 0.37, 11).unwrap();
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).norm() < 1e-10);
        }
    }

    #[test]
    fn test_transform_parseval() {
        // Σ|u|² dz = Σ|ũ|² dk with dk = 2π/(n dz)
        let n = 21;
        let dz = 0.4;
        let dk = 2.0 * std::f64::consts::PI / (n as f64 * dz);
        let u = Array1::from_shape_fn(n, |i| {
            let z = (i as f64 - 10.0) * dz;
            Complex64::new((-z * z / 2.0).exp(), 0.0)
        });
        let spectrum = forward_transform(&u, dz).unwrap();
        let real_norm: f64 = u.iter().map(|c| c.norm_sqr()).sum::<f64>() * dz;
        let spec_norm: f64 = spectrum.iter().map(|c| c.norm_sqr()).sum::<f64>() * dk;
        assert!((real_norm - spec_norm).abs() < 1e-12);
    }

    #[test]
    fn test_transform_rejects_bad_input() {
        let empty = Array1::<Complex64>::zeros(0);
        assert!(matches!(
            forward_transform(&empty, 1.0),
            Err(KerrError::DimensionMismatch { .. })
        ));
        let x = ramp(5);
        assert!(matches!(
            forward_transform(&x, f64::NAN),
            Err(KerrError::DimensionMismatch { expected: 5, found: 0, .. })
        ));
        assert!(matches!(
            inverse_transform(&x, 0.0, 5),
            Err(KerrError::DimensionMismatch { expected: 5, found: 0, .. })
        ));
        assert!(matches!(
            inverse_transform(&x, 1.0, 7),
            Err(KerrError::DimensionMismatch { expected: 7, found: 5, .. })
        ));
    }
}
