//! Mean-field and fluctuation propagation through a lossy Kerr waveguide.
//!
//! `operators` holds the split-step field propagators, `moments` the
//! linearised generator, `propagation` the step loop and loss models.

pub mod moments;
pub mod operators;
pub mod propagation;

pub use propagation::{
    propagate_exponential_loss, propagate_lossless, propagate_lossy, propagate_mean_field,
    DiagnosticHooks, KerrMedium, Propagation, Propagator,
};
