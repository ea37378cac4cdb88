// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Propagation Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Joint split-step propagation of the mean field and its fluctuation moments.
//!
//! Every step advances the mean field by D(dt/2)·N(dt)·D(dt/2), rebuilds the
//! generator Q from the updated field and hands T = exp(i·dt·Q) to a
//! [`FluctuationModel`]. The three models differ only in what they do with T:
//!
//! - [`LosslessModel`]: accumulates K ← T·K, M = U·Wᵗ and N = W*·Wᵗ at the end.
//! - [`LossyModel`]: applies the per-step bilinear moment recursion, damped by (1 − G·dt).
//! - [`ExponentialLossModel`]: accumulates like the lossless model, loss acts on the
//!   field steps, and M, N get a single exp(−G·dt·steps) factor at the end.
//!
//! Step order is strictly sequential: each generator depends on the field
//! produced by the previous step.

use kerr_diagnostics::invariants::{check_moments, check_unitarity, DiagnosticRecord};
use kerr_math::linalg::{conj, expm, identity, top_blocks, transpose};
use kerr_types::config::{DiagnosticsConfig, LossModel};
use kerr_types::constants::DEFAULT_DIAGNOSTIC_TOLERANCE;
use kerr_types::error::{KerrError, KerrResult};
use kerr_types::state::{FieldMoments, SpectralGrid};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, trace, warn};

use crate::moments::build_generator;
use crate::operators::{dispersion_loss_step, field_energy, nonlinear_step};

/// Scaled physical parameters of the Kerr waveguide.
///
/// An infinite dispersion or nonlinear time switches that term off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KerrMedium {
    pub dispersion_time: f64,
    pub nonlinear_time: f64,
    pub loss_rate: f64,
}

impl KerrMedium {
    pub fn new(dispersion_time: f64, nonlinear_time: f64, loss_rate: f64) -> Self {
        KerrMedium {
            dispersion_time,
            nonlinear_time,
            loss_rate,
        }
    }

    pub fn lossless(dispersion_time: f64, nonlinear_time: f64) -> Self {
        Self::new(dispersion_time, nonlinear_time, 0.0)
    }

    pub fn validate(&self) -> KerrResult<()> {
        for (name, value) in [
            ("dispersion_time", self.dispersion_time),
            ("nonlinear_time", self.nonlinear_time),
        ] {
            if value.is_nan() || value == 0.0 {
                return Err(KerrError::InvalidParameter(format!(
                    "{name} must be non-zero and not NaN, got {value}"
                )));
            }
        }
        if !self.loss_rate.is_finite() || self.loss_rate < 0.0 {
            return Err(KerrError::InvalidParameter(format!(
                "loss_rate must be finite and non-negative, got {}",
                self.loss_rate
            )));
        }
        Ok(())
    }
}

/// Optional in-loop invariant checks. Results are recorded and logged,
/// never turned into errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticHooks {
    pub check_unitarity: bool,
    pub check_moments: bool,
    pub tolerance: f64,
}

impl Default for DiagnosticHooks {
    fn default() -> Self {
        DiagnosticHooks {
            check_unitarity: false,
            check_moments: false,
            tolerance: DEFAULT_DIAGNOSTIC_TOLERANCE,
        }
    }
}

impl DiagnosticHooks {
    pub fn all() -> Self {
        DiagnosticHooks {
            check_unitarity: true,
            check_moments: true,
            ..Self::default()
        }
    }

    fn enabled(&self) -> bool {
        self.check_unitarity || self.check_moments
    }

    /// Run the enabled checks on whichever of (U, W) and (M, N) are available.
    fn run(
        &self,
        step: usize,
        blocks: Option<(&Array2<Complex64>, &Array2<Complex64>)>,
        moments: Option<(&Array2<Complex64>, &Array2<Complex64>)>,
    ) -> KerrResult<Option<DiagnosticRecord>> {
        if !self.enabled() {
            return Ok(None);
        }
        let unitarity = match (self.check_unitarity, blocks) {
            (true, Some((u, w))) => Some(check_unitarity(u, w)?),
            _ => None,
        };
        let moments = match (self.check_moments, moments) {
            (true, Some((m, n))) => Some(check_moments(m, n)?),
            _ => None,
        };
        let record = DiagnosticRecord {
            step,
            unitarity,
            moments,
        };
        let deviation = record.max_deviation();
        if deviation.is_nan() || deviation > self.tolerance {
            warn!(
                step,
                deviation,
                tolerance = self.tolerance,
                "invariant deviation above tolerance"
            );
        }
        Ok(Some(record))
    }
}

impl From<&DiagnosticsConfig> for DiagnosticHooks {
    fn from(config: &DiagnosticsConfig) -> Self {
        DiagnosticHooks {
            check_unitarity: config.check_unitarity,
            check_moments: config.check_moments,
            tolerance: config.tolerance,
        }
    }
}

/// Final `(u, M, N)` of a run together with any diagnostics recorded on the way.
#[derive(Debug, Clone)]
pub struct Propagation {
    pub state: FieldMoments,
    pub diagnostics: Vec<DiagnosticRecord>,
}

/// Fluctuation state advanced by the shared step loop.
pub trait FluctuationModel {
    /// Loss rate seen by the half dispersion/loss steps of the mean field.
    fn field_loss_rate(&self) -> f64;

    /// Absorb one step's transfer matrix exp(i·dt·Q).
    ///
    /// Returns `false` and leaves the state untouched if the update would
    /// produce non-finite values.
    fn advance(&mut self, transfer: &Array2<Complex64>) -> bool;

    /// Checks after `step` completed steps. `transfer` is that step's matrix.
    fn step_diagnostics(
        &self,
        _step: usize,
        _transfer: &Array2<Complex64>,
        _hooks: &DiagnosticHooks,
    ) -> KerrResult<Option<DiagnosticRecord>> {
        Ok(None)
    }

    /// Current (M, N).
    fn moments(&self) -> (Array2<Complex64>, Array2<Complex64>);

    /// (M, N) after the last of `steps` steps, plus end-of-run checks.
    fn finish(
        self,
        steps: usize,
        hooks: &DiagnosticHooks,
    ) -> KerrResult<(Array2<Complex64>, Array2<Complex64>, Option<DiagnosticRecord>)>;
}

fn all_finite_2d(a: &Array2<Complex64>) -> bool {
    a.iter().all(|c| c.is_finite())
}

/// M = U·Wᵗ and N = W*·Wᵗ from an accumulated transfer matrix.
fn moments_from_transfer(k: &Array2<Complex64>) -> (Array2<Complex64>, Array2<Complex64>) {
    let (u, w) = top_blocks(k);
    let wt = transpose(&w);
    (u.dot(&wt), conj(&w).dot(&wt))
}

/// Unitary accumulation of the transfer matrix; loss is ignored entirely.
#[derive(Debug, Clone)]
pub struct LosslessModel {
    transfer: Array2<Complex64>,
}

impl LosslessModel {
    pub fn new(n: usize) -> Self {
        LosslessModel {
            transfer: identity(2 * n),
        }
    }

    /// Accumulated 2n×2n transfer matrix K.
    pub fn transfer(&self) -> &Array2<Complex64> {
        &self.transfer
    }
}

impl FluctuationModel for LosslessModel {
    fn field_loss_rate(&self) -> f64 {
        0.0
    }

    fn advance(&mut self, transfer: &Array2<Complex64>) -> bool {
        let next = transfer.dot(&self.transfer);
        if !all_finite_2d(&next) {
            return false;
        }
        self.transfer = next;
        true
    }

    fn moments(&self) -> (Array2<Complex64>, Array2<Complex64>) {
        moments_from_transfer(&self.transfer)
    }

    fn finish(
        self,
        steps: usize,
        hooks: &DiagnosticHooks,
    ) -> KerrResult<(Array2<Complex64>, Array2<Complex64>, Option<DiagnosticRecord>)> {
        let (u, w) = top_blocks(&self.transfer);
        let (m, n) = moments_from_transfer(&self.transfer);
        let record = hooks.run(steps, Some((&u, &w)), Some((&m, &n)))?;
        Ok((m, n, record))
    }
}

/// Sequential moment recursion with per-step damping (1 − G·dt).
///
/// The damping factor must stay positive, so G·dt < 1.
#[derive(Debug, Clone)]
pub struct LossyModel {
    m: Array2<Complex64>,
    n: Array2<Complex64>,
    loss_rate: f64,
    dt: f64,
}

impl LossyModel {
    pub fn new(n: usize, loss_rate: f64, dt: f64) -> KerrResult<Self> {
        let attenuation = loss_rate * dt;
        if !(0.0..1.0).contains(&attenuation) {
            return Err(KerrError::InvalidParameter(format!(
                "per-step attenuation G·dt must lie in [0, 1), got {attenuation}"
            )));
        }
        Ok(LossyModel {
            m: Array2::zeros((n, n)),
            n: Array2::zeros((n, n)),
            loss_rate,
            dt,
        })
    }
}

impl FluctuationModel for LossyModel {
    fn field_loss_rate(&self) -> f64 {
        self.loss_rate
    }

    fn advance(&mut self, transfer: &Array2<Complex64>) -> bool {
        let (u, w) = top_blocks(transfer);
        let ut = transpose(&u);
        let wt = transpose(&w);
        let uc = conj(&u);
        let wc = conj(&w);
        let mc = conj(&self.m);
        let nt = transpose(&self.n);

        // M' = U M Uᵗ + W M* Wᵗ + W N Uᵗ + U Nᵗ Wᵗ + U Wᵗ
        let m_next = u.dot(&self.m).dot(&ut)
            + w.dot(&mc).dot(&wt)
            + w.dot(&self.n).dot(&ut)
            + u.dot(&nt).dot(&wt)
            + u.dot(&wt);
        // N' = W* M Uᵗ + U* M* Wᵗ + U* N Uᵗ + W* Nᵗ Wᵗ + W* Wᵗ, from the previous M
        let n_next = wc.dot(&self.m).dot(&ut)
            + uc.dot(&mc).dot(&wt)
            + uc.dot(&self.n).dot(&ut)
            + wc.dot(&nt).dot(&wt)
            + wc.dot(&wt);

        let damping = 1.0 - self.loss_rate * self.dt;
        let m_next = m_next.mapv(|c| c * damping);
        let n_next = n_next.mapv(|c| c * damping);
        if !all_finite_2d(&m_next) || !all_finite_2d(&n_next) {
            return false;
        }
        self.m = m_next;
        self.n = n_next;
        true
    }

    fn step_diagnostics(
        &self,
        step: usize,
        transfer: &Array2<Complex64>,
        hooks: &DiagnosticHooks,
    ) -> KerrResult<Option<DiagnosticRecord>> {
        if !hooks.enabled() {
            return Ok(None);
        }
        let (u, w) = top_blocks(transfer);
        hooks.run(step, Some((&u, &w)), Some((&self.m, &self.n)))
    }

    fn moments(&self) -> (Array2<Complex64>, Array2<Complex64>) {
        (self.m.clone(), self.n.clone())
    }

    fn finish(
        self,
        _steps: usize,
        _hooks: &DiagnosticHooks,
    ) -> KerrResult<(Array2<Complex64>, Array2<Complex64>, Option<DiagnosticRecord>)> {
        Ok((self.m, self.n, None))
    }
}

/// Unitary accumulation with loss on the field and one exp(−G·dt·steps)
/// correction of the moments after the loop.
#[derive(Debug, Clone)]
pub struct ExponentialLossModel {
    transfer: Array2<Complex64>,
    loss_rate: f64,
    dt: f64,
}

impl ExponentialLossModel {
    pub fn new(n: usize, loss_rate: f64, dt: f64) -> Self {
        ExponentialLossModel {
            transfer: identity(2 * n),
            loss_rate,
            dt,
        }
    }
}

impl FluctuationModel for ExponentialLossModel {
    fn field_loss_rate(&self) -> f64 {
        self.loss_rate
    }

    fn advance(&mut self, transfer: &Array2<Complex64>) -> bool {
        let next = transfer.dot(&self.transfer);
        if !all_finite_2d(&next) {
            return false;
        }
        self.transfer = next;
        true
    }

    fn moments(&self) -> (Array2<Complex64>, Array2<Complex64>) {
        moments_from_transfer(&self.transfer)
    }

    fn finish(
        self,
        steps: usize,
        hooks: &DiagnosticHooks,
    ) -> KerrResult<(Array2<Complex64>, Array2<Complex64>, Option<DiagnosticRecord>)> {
        let (u, w) = top_blocks(&self.transfer);
        let (m, n) = moments_from_transfer(&self.transfer);
        let decay = (-self.loss_rate * self.dt * steps as f64).exp();
        let m = m.mapv(|c| c * decay);
        let n = n.mapv(|c| c * decay);
        let record = hooks.run(steps, Some((&u, &w)), Some((&m, &n)))?;
        Ok((m, n, record))
    }
}

/// Fixed-step propagator over a static grid.
#[derive(Debug, Clone)]
pub struct Propagator<'g> {
    grid: &'g SpectralGrid,
    medium: KerrMedium,
    steps: usize,
    dt: f64,
    hooks: DiagnosticHooks,
}

impl<'g> Propagator<'g> {
    pub fn new(grid: &'g SpectralGrid, medium: KerrMedium, steps: usize, dt: f64) -> KerrResult<Self> {
        medium.validate()?;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(KerrError::InvalidParameter(format!(
                "time step must be finite and positive, got {dt}"
            )));
        }
        Ok(Propagator {
            grid,
            medium,
            steps,
            dt,
            hooks: DiagnosticHooks::default(),
        })
    }

    pub fn with_hooks(mut self, hooks: DiagnosticHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Propagate `field` with the fluctuation model selected by `model`.
    pub fn run(&self, model: LossModel, field: &Array1<Complex64>) -> KerrResult<Propagation> {
        let n = self.grid.n;
        let g = self.medium.loss_rate;
        match model {
            LossModel::Lossless => self.drive(LosslessModel::new(n), field),
            LossModel::Lossy => self.drive(LossyModel::new(n, g, self.dt)?, field),
            LossModel::ExponentialLoss => {
                self.drive(ExponentialLossModel::new(n, g, self.dt), field)
            }
        }
    }

    /// One split step D(dt/2)·N(dt)·D(dt/2) of the mean field.
    fn field_step(&self, field: &Array1<Complex64>, loss_rate: f64) -> KerrResult<Array1<Complex64>> {
        let td = self.medium.dispersion_time;
        let kk = &self.grid.kk;
        let half = dispersion_loss_step(field, td, loss_rate, kk, self.dt)?;
        let kicked = nonlinear_step(&half, self.medium.nonlinear_time, field, self.dt)?;
        dispersion_loss_step(&kicked, td, loss_rate, kk, self.dt)
    }

    /// Input checks done before any step is taken.
    fn check_input(&self, field: &Array1<Complex64>, context: &str) -> KerrResult<()> {
        self.grid.check_field(field, context)?;
        if let Some(i) = field.iter().position(|c| !c.is_finite()) {
            return Err(KerrError::InvalidParameter(format!(
                "{context} has a non-finite sample at index {i}: {}",
                field[i]
            )));
        }
        Ok(())
    }

    /// Mean-field-only propagation, without fluctuation tracking.
    pub fn mean_field(&self, field: &Array1<Complex64>) -> KerrResult<Array1<Complex64>> {
        self.check_input(field, "mean field")?;
        let mut u = field.clone();
        for step in 0..self.steps {
            let next = self.field_step(&u, self.medium.loss_rate)?;
            if !next.iter().all(|c| c.is_finite()) {
                return Err(KerrError::NumericalDivergence {
                    step,
                    quantity: "mean field".to_string(),
                    last_valid: Box::new(FieldMoments::vacuum(u)),
                });
            }
            u = next;
        }
        Ok(u)
    }

    /// Shared step loop for every fluctuation model.
    pub fn drive<F: FluctuationModel>(
        &self,
        mut model: F,
        field: &Array1<Complex64>,
    ) -> KerrResult<Propagation> {
        self.check_input(field, "initial mean field")?;
        let loss_rate = model.field_loss_rate();
        let idt = Complex64::new(0.0, self.dt);
        debug!(
            n = self.grid.n,
            steps = self.steps,
            dt = self.dt,
            loss_rate,
            energy = field_energy(field),
            "starting propagation"
        );

        let mut u = field.clone();
        let mut diagnostics = Vec::new();
        for step in 0..self.steps {
            let next = self.field_step(&u, loss_rate)?;
            if !next.iter().all(|c| c.is_finite()) {
                return Err(diverged(step, "mean field", u, &model));
            }

            let generator = build_generator(
                &next,
                self.medium.dispersion_time,
                self.medium.nonlinear_time,
                self.grid,
            )?;
            let transfer = expm(&generator.mapv(|q| q * idt));
            if !model.advance(&transfer) {
                return Err(diverged(step, "fluctuation moments", u, &model));
            }
            u = next;
            trace!(step, energy = field_energy(&u), "step complete");

            if let Some(record) = model.step_diagnostics(step + 1, &transfer, &self.hooks)? {
                diagnostics.push(record);
            }
        }

        let (m, n, record) = model.finish(self.steps, &self.hooks)?;
        diagnostics.extend(record);
        let state = FieldMoments { field: u, m, n };
        debug!(
            energy = field_energy(&state.field),
            fluctuation_photons = state.fluctuation_photons(),
            "propagation finished"
        );
        Ok(Propagation { state, diagnostics })
    }
}

fn diverged<F: FluctuationModel>(
    step: usize,
    quantity: &str,
    field: Array1<Complex64>,
    model: &F,
) -> KerrError {
    warn!(step, quantity, "numerical divergence, halting propagation");
    let (m, n) = model.moments();
    KerrError::NumericalDivergence {
        step,
        quantity: quantity.to_string(),
        last_valid: Box::new(FieldMoments { field, m, n }),
    }
}

/// Lossless propagation of the mean field and its fluctuations.
pub fn propagate_lossless(
    field: &Array1<Complex64>,
    dispersion_time: f64,
    nonlinear_time: f64,
    grid: &SpectralGrid,
    steps: usize,
    dt: f64,
) -> KerrResult<FieldMoments> {
    let medium = KerrMedium::lossless(dispersion_time, nonlinear_time);
    Ok(Propagator::new(grid, medium, steps, dt)?
        .run(LossModel::Lossless, field)?
        .state)
}

/// Lossy propagation with the per-step moment recursion.
pub fn propagate_lossy(
    field: &Array1<Complex64>,
    dispersion_time: f64,
    nonlinear_time: f64,
    loss_rate: f64,
    grid: &SpectralGrid,
    steps: usize,
    dt: f64,
) -> KerrResult<FieldMoments> {
    let medium = KerrMedium::new(dispersion_time, nonlinear_time, loss_rate);
    Ok(Propagator::new(grid, medium, steps, dt)?
        .run(LossModel::Lossy, field)?
        .state)
}

/// Lossy propagation with an end-of-run exponential moment correction.
pub fn propagate_exponential_loss(
    field: &Array1<Complex64>,
    dispersion_time: f64,
    nonlinear_time: f64,
    loss_rate: f64,
    grid: &SpectralGrid,
    steps: usize,
    dt: f64,
) -> KerrResult<FieldMoments> {
    let medium = KerrMedium::new(dispersion_time, nonlinear_time, loss_rate);
    Ok(Propagator::new(grid, medium, steps, dt)?
        .run(LossModel::ExponentialLoss, field)?
        .state)
}

/// Mean-field-only split-step propagation.
pub fn propagate_mean_field(
    field: &Array1<Complex64>,
    medium: KerrMedium,
    grid: &SpectralGrid,
    steps: usize,
    dt: f64,
) -> KerrResult<Array1<Complex64>> {
    Propagator::new(grid, medium, steps, dt)?.mean_field(field)
}
