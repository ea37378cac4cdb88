// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Analysis
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Driver layer: pump shapes, physical-to-scaled parameters, and the
//! homodyne squeezing readout of a finished propagation.

pub mod pulse;
pub mod simulation;
pub mod squeezing;

pub use pulse::{Pump, PulseShape};
pub use simulation::{derive_parameters, DerivedParameters, Evolution, SqueezingSimulation, WaveguideParams};
pub use squeezing::{expected_squeezing_gaussian, fwhm, squeezing_spectrum, SqueezingSpectrum};
