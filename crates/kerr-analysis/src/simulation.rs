// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Squeezing Simulation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wires the spectral grid, scaled waveguide parameters and pump to the
//! propagation engine.
//!
//! Physical inputs are SI; the engine works in units of 1e-10 s (the scale
//! factor). With v = c/ng the derived quantities are
//!
//! ```text
//! TN    = scale / (γ·P0·v)
//! TD    = scale · (T0·v)² / (β₂·v³)
//! dt    = dz
//! steps = rint(scale · L / (v·dt))
//! ```

use kerr_core::propagation::{DiagnosticHooks, KerrMedium, Propagation, Propagator};
use kerr_diagnostics::normalization::{check_normalization, NormReport};
use kerr_types::config::{LossModel, SimulationConfig, WaveguideConfig};
use kerr_types::constants::{DEFAULT_SCALE_FACTOR, SPEED_OF_LIGHT};
use kerr_types::error::{KerrError, KerrResult};
use kerr_types::state::SpectralGrid;
use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pulse::{Pump, PulseShape};
use crate::squeezing::{squeezing_spectrum, SqueezingSpectrum};

/// Physical waveguide and pump parameters (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveguideParams {
    /// Waveguide length [m].
    pub length: f64,
    /// Loss rate [Hz·1e10].
    pub loss_rate: f64,
    /// Pulse FWHM [s].
    pub pulse_fwhm: f64,
    /// Peak pump power [W].
    pub pump_power: f64,
    pub group_index: f64,
    /// β₂ [s²/m].
    pub gvd: f64,
    /// γ [1/(m·W)].
    pub nonlinear_parameter: f64,
    /// Scaled nonlinear time override.
    pub nonlinear_time: Option<f64>,
    /// Scaled dispersion time override.
    pub dispersion_time: Option<f64>,
}

impl From<&WaveguideConfig> for WaveguideParams {
    fn from(w: &WaveguideConfig) -> Self {
        WaveguideParams {
            length: w.length,
            loss_rate: w.loss_rate,
            pulse_fwhm: w.pulse_fwhm,
            pump_power: w.pump_power,
            group_index: w.group_index,
            gvd: w.gvd,
            nonlinear_parameter: w.nonlinear_parameter,
            nonlinear_time: None,
            dispersion_time: None,
        }
    }
}

/// Scaled engine parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameters {
    /// c/ng [m/s].
    pub group_velocity: f64,
    pub nonlinear_time: f64,
    pub dispersion_time: f64,
    pub loss_rate: f64,
    pub dt: f64,
    pub steps: usize,
}

impl DerivedParameters {
    pub fn medium(&self) -> KerrMedium {
        KerrMedium::new(self.dispersion_time, self.nonlinear_time, self.loss_rate)
    }
}

/// Scale physical parameters for a pump of 1/e width `unit_width` [s] on a
/// grid of spacing `dz`.
pub fn derive_parameters(
    params: &WaveguideParams,
    unit_width: f64,
    dz: f64,
    scale_factor: f64,
    speed_of_light: f64,
) -> KerrResult<DerivedParameters> {
    let v = speed_of_light / params.group_index;
    if !v.is_finite() || v <= 0.0 {
        return Err(KerrError::InvalidParameter(format!(
            "group velocity must be finite and positive, got {v}"
        )));
    }
    let nonlinear_time = params
        .nonlinear_time
        .unwrap_or_else(|| scale_factor / (params.nonlinear_parameter * params.pump_power * v));
    let dispersion_time = params
        .dispersion_time
        .unwrap_or_else(|| scale_factor * (unit_width * v).powi(2) / (params.gvd * v.powi(3)));

    let dt = dz;
    let steps = (params.length / (v * dt) * scale_factor).round();
    if !steps.is_finite() || steps < 0.0 || steps > usize::MAX as f64 {
        return Err(KerrError::InvalidParameter(format!(
            "step count {steps} out of range"
        )));
    }

    Ok(DerivedParameters {
        group_velocity: v,
        nonlinear_time,
        dispersion_time,
        loss_rate: params.loss_rate,
        dt,
        steps: steps as usize,
    })
}

/// Output of [`SqueezingSimulation::evolve`].
#[derive(Debug, Clone)]
pub struct Evolution {
    pub parameters: DerivedParameters,
    pub model: LossModel,
    pub propagation: Propagation,
}

/// Grid setup plus the constants that turn physical inputs into engine units.
#[derive(Debug, Clone)]
pub struct SqueezingSimulation {
    grid: SpectralGrid,
    scale_factor: f64,
    speed_of_light: f64,
    hooks: DiagnosticHooks,
}

impl SqueezingSimulation {
    /// Real-space window (−zf, zf) sampled at `n` points (odd).
    pub fn new(zf: f64, n: usize) -> KerrResult<Self> {
        Ok(SqueezingSimulation {
            grid: SpectralGrid::new(zf, n)?,
            scale_factor: DEFAULT_SCALE_FACTOR,
            speed_of_light: SPEED_OF_LIGHT,
            hooks: DiagnosticHooks::default(),
        })
    }

    pub fn from_config(config: &SimulationConfig) -> KerrResult<Self> {
        config.validate()?;
        Ok(SqueezingSimulation {
            grid: config.create_grid()?,
            scale_factor: config.scale_factor,
            speed_of_light: config.speed_of_light,
            hooks: DiagnosticHooks::from(&config.diagnostics),
        })
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_hooks(mut self, hooks: DiagnosticHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn grid(&self) -> &SpectralGrid {
        &self.grid
    }

    pub fn derive(&self, params: &WaveguideParams, pump: &Pump) -> KerrResult<DerivedParameters> {
        derive_parameters(
            params,
            pump.unit_width(params.pulse_fwhm),
            self.grid.dz,
            self.scale_factor,
            self.speed_of_light,
        )
    }

    /// Propagate `pump` through the waveguide with the selected loss model.
    pub fn evolve(
        &self,
        params: &WaveguideParams,
        pump: &Pump,
        model: LossModel,
    ) -> KerrResult<Evolution> {
        let field = pump.field(&self.grid)?;
        let parameters = self.derive(params, pump)?;
        info!(
            n = self.grid.n,
            model = %model,
            steps = parameters.steps,
            dt = parameters.dt,
            nonlinear_time = parameters.nonlinear_time,
            dispersion_time = parameters.dispersion_time,
            loss_rate = parameters.loss_rate,
            "evolving pulse"
        );

        let propagation = Propagator::new(
            &self.grid,
            parameters.medium(),
            parameters.steps,
            parameters.dt,
        )?
        .with_hooks(self.hooks)
        .run(model, &field)?;

        Ok(Evolution {
            parameters,
            model,
            propagation,
        })
    }

    /// Run everything a configuration describes.
    pub fn evolve_config(&self, config: &SimulationConfig) -> KerrResult<Evolution> {
        let shape: PulseShape = config.pulse.parse()?;
        let mut params = WaveguideParams::from(&config.waveguide);
        params.nonlinear_time = config.nonlinear_time;
        params.dispersion_time = config.dispersion_time;
        self.evolve(&params, &Pump::Shape(shape), config.loss_model)
    }

    /// Pulse energy on both sides of the spectral transform of this grid.
    pub fn normalization(&self, field: &Array1<Complex64>) -> KerrResult<NormReport> {
        self.grid.check_field(field, "normalization field")?;
        check_normalization(field, self.grid.dz, self.grid.dk)
    }

    /// Homodyne squeezing of a finished run.
    pub fn squeezing(&self, evolution: &Evolution) -> KerrResult<SqueezingSpectrum> {
        let state = &evolution.propagation.state;
        let spectrum = squeezing_spectrum(&state.field, &state.m, &state.n, self.grid.dz)?;
        info!(
            min_db = spectrum.min_db(),
            max_db = spectrum.max_db(),
            "squeezing spectrum"
        );
        Ok(spectrum)
    }
}
