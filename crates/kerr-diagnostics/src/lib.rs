//! Runtime integrity checks for propagated fluctuation moments.
//!
//! Bosonic commutation of the (U, W) transfer blocks, the pair-correlation
//! identity of (M, N), and Parseval normalisation of the spectral transform.
//! Every check returns a report; none of them alter control flow.

pub mod invariants;
pub mod normalization;
