// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Pump Shapes
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Initial mean-field envelopes on the real-space grid.

use std::str::FromStr;

use kerr_types::constants::DEFAULT_RECT_WIDTH;
use kerr_types::error::{KerrError, KerrResult};
use kerr_types::state::SpectralGrid;
use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Built-in unit-peak pulse envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PulseShape {
    /// exp(−z²/2)
    Gaussian,
    /// 1 inside |z| ≤ width/2, 0 outside.
    Rect { width: f64 },
    /// 1/cosh(z)
    Sech,
    /// 1/√(1 + z²)
    Lorentzian,
}

impl PulseShape {
    pub fn rect() -> Self {
        PulseShape::Rect {
            width: DEFAULT_RECT_WIDTH,
        }
    }

    pub fn sample(&self, zz: &Array1<f64>) -> Array1<Complex64> {
        zz.mapv(|z| {
            let amplitude = match *self {
                PulseShape::Gaussian => (-z * z / 2.0).exp(),
                PulseShape::Rect { width } => {
                    if z.abs() <= 0.5 * width {
                        1.0
                    } else {
                        0.0
                    }
                }
                PulseShape::Sech => 1.0 / z.cosh(),
                PulseShape::Lorentzian => 1.0 / (1.0 + z * z).sqrt(),
            };
            Complex64::new(amplitude, 0.0)
        })
    }

    /// Converts a FWHM duration into the duration of the unit-width envelope.
    ///
    /// Rect and Lorentzian are used as given.
    pub fn unit_width(&self, fwhm: f64) -> f64 {
        match self {
            PulseShape::Gaussian => fwhm / (2.0 * std::f64::consts::LN_2.sqrt()),
            PulseShape::Sech => fwhm / (2.0 * (1.0 + std::f64::consts::SQRT_2.ln()).sqrt()),
            PulseShape::Rect { .. } | PulseShape::Lorentzian => fwhm,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PulseShape::Gaussian => "Gaussian",
            PulseShape::Rect { .. } => "Rect",
            PulseShape::Sech => "Sech",
            PulseShape::Lorentzian => "Lorentzian",
        }
    }
}

impl FromStr for PulseShape {
    type Err = KerrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gaussian" | "gaussian" => Ok(PulseShape::Gaussian),
            "Rect" | "rect" => Ok(PulseShape::rect()),
            "Sech" | "sech" => Ok(PulseShape::Sech),
            "Lorentzian" | "lorentzian" => Ok(PulseShape::Lorentzian),
            other => Err(KerrError::InvalidPumpShape(other.to_string())),
        }
    }
}

/// Initial mean field: a built-in shape or a caller-supplied array.
#[derive(Debug, Clone, PartialEq)]
pub enum Pump {
    Shape(PulseShape),
    Custom(Array1<Complex64>),
}

impl Default for Pump {
    fn default() -> Self {
        Pump::Shape(PulseShape::Gaussian)
    }
}

impl From<PulseShape> for Pump {
    fn from(shape: PulseShape) -> Self {
        Pump::Shape(shape)
    }
}

impl Pump {
    /// Field sampled on `grid`. Custom arrays must already have length n.
    pub fn field(&self, grid: &SpectralGrid) -> KerrResult<Array1<Complex64>> {
        match self {
            Pump::Shape(shape) => Ok(shape.sample(&grid.zz)),
            Pump::Custom(field) => {
                grid.check_field(field, "pump shape function")?;
                Ok(field.clone())
            }
        }
    }

    pub fn unit_width(&self, fwhm: f64) -> f64 {
        match self {
            Pump::Shape(shape) => shape.unit_width(fwhm),
            Pump::Custom(_) => fwhm,
        }
    }
}
