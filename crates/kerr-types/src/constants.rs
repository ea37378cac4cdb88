// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Default time scaling between SI seconds and simulation units.
/// Nonlinear and dispersion times are expressed in units of 1e-10 s.
pub const DEFAULT_SCALE_FACTOR: f64 = 1e10;

/// Default deviation bound for the bosonic commutation and pair-correlation checks.
pub const DEFAULT_DIAGNOSTIC_TOLERANCE: f64 = 1e-8;

/// Number of local-oscillator phases sampled in [0, π] for a squeezing spectrum.
pub const SQUEEZING_PHASE_POINTS: usize = 100;

/// Default top-hat width: the FWHM of a unit Gaussian, 2√(2 ln 2).
pub const DEFAULT_RECT_WIDTH: f64 = 2.354_820_045_030_949_3;

/// √(2π), the symmetric Fourier normalisation.
pub const SQRT_2PI: f64 = 2.506_628_274_631_000_7;
