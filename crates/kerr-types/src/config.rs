// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DIAGNOSTIC_TOLERANCE, DEFAULT_SCALE_FACTOR, SPEED_OF_LIGHT};
use crate::error::{KerrError, KerrResult};
use crate::state::SpectralGrid;

/// Top-level simulation configuration, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub waveguide: WaveguideConfig,
    /// Pulse shape tag: "Gaussian", "Rect", "Sech" or "Lorentzian".
    #[serde(default = "default_pulse")]
    pub pulse: String,
    #[serde(default)]
    pub loss_model: LossModel,
    /// Scaled nonlinear time. Derived from the waveguide when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonlinear_time: Option<f64>,
    /// Scaled dispersion time. Derived from the waveguide when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispersion_time: Option<f64>,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default = "default_speed_of_light")]
    pub speed_of_light: f64,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Real-space window [-zf, zf] sampled at `n` (odd) points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub zf: f64,
    pub n: usize,
}

/// Physical waveguide and pump parameters in SI units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveguideConfig {
    /// Waveguide length [m].
    pub length: f64,
    /// Loss rate [Hz·1e10].
    #[serde(default)]
    pub loss_rate: f64,
    /// Pulse FWHM [s].
    pub pulse_fwhm: f64,
    /// Pump peak power [W].
    pub pump_power: f64,
    pub group_index: f64,
    /// Group velocity dispersion β₂ [s²/m].
    pub gvd: f64,
    /// Nonlinear parameter γ [1/(m·W)].
    pub nonlinear_parameter: f64,
}

/// How loss acts on the fluctuation moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossModel {
    /// Unitary evolution; the field steps ignore the loss rate.
    #[default]
    Lossless,
    /// Per-step moment recursion damped by (1 - G·dt).
    Lossy,
    /// Unitary moment evolution with a single exp(-G·dt·steps) factor at the end.
    ExponentialLoss,
}

impl std::fmt::Display for LossModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LossModel::Lossless => "lossless",
            LossModel::Lossy => "lossy",
            LossModel::ExponentialLoss => "exponential_loss",
        };
        f.write_str(name)
    }
}

/// In-loop invariant checks. Reported, never enforced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub check_unitarity: bool,
    #[serde(default)]
    pub check_moments: bool,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_pulse() -> String {
    "Gaussian".to_string()
}
fn default_scale_factor() -> f64 {
    DEFAULT_SCALE_FACTOR
}
fn default_speed_of_light() -> f64 {
    SPEED_OF_LIGHT
}
fn default_tolerance() -> f64 {
    DEFAULT_DIAGNOSTIC_TOLERANCE
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        DiagnosticsConfig {
            check_unitarity: false,
            check_moments: false,
            tolerance: default_tolerance(),
        }
    }
}

impl SimulationConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> KerrResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KerrResult<()> {
        let n = self.grid.n;
        if n < 3 || n % 2 == 0 {
            return Err(KerrError::dimension("grid.n (odd, at least 3)", n.max(2) | 1, n));
        }
        let w = &self.waveguide;
        let positive = [
            ("grid.zf", self.grid.zf),
            ("waveguide.length", w.length),
            ("waveguide.pulse_fwhm", w.pulse_fwhm),
            ("waveguide.pump_power", w.pump_power),
            ("waveguide.group_index", w.group_index),
            ("waveguide.gvd", w.gvd),
            ("waveguide.nonlinear_parameter", w.nonlinear_parameter),
            ("scale_factor", self.scale_factor),
            ("speed_of_light", self.speed_of_light),
            ("diagnostics.tolerance", self.diagnostics.tolerance),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(KerrError::ConfigError(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if !w.loss_rate.is_finite() || w.loss_rate < 0.0 {
            return Err(KerrError::ConfigError(format!(
                "waveguide.loss_rate must be finite and non-negative, got {}",
                w.loss_rate
            )));
        }
        Ok(())
    }

    /// Build the spectral grid described by `grid`.
    pub fn create_grid(&self) -> KerrResult<SpectralGrid> {
        SpectralGrid::new(self.grid.zf, self.grid.n)
    }
}
