//! Numerical primitives for the Kerr squeezing simulator.

pub mod fft;
pub mod linalg;
