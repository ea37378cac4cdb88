// ─────────────────────────────────────────────────────────────────────
// Kerr Squeeze Core — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

use crate::state::FieldMoments;

#[derive(Error, Debug)]
pub enum KerrError {
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0} is not a valid pump shape")]
    InvalidPumpShape(String),

    /// Non-finite values appeared while stepping. `last_valid` is the
    /// `(field, M, N)` triple from the step before `step`.
    #[error("Numerical divergence at step {step}: non-finite {quantity}")]
    NumericalDivergence {
        step: usize,
        quantity: String,
        last_valid: Box<FieldMoments>,
    },

    #[error("Tolerance exceeded in {check}: deviation {deviation:e} > tolerance {tolerance:e}")]
    ToleranceExceeded {
        check: String,
        deviation: f64,
        tolerance: f64,
    },

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type KerrResult<T> = Result<T, KerrError>;

impl KerrError {
    pub fn dimension(context: impl Into<String>, expected: usize, found: usize) -> Self {
        KerrError::DimensionMismatch {
            context: context.into(),
            expected,
            found,
        }
    }
}
