//! Numeric substrate for boxed LIF neurons
//!
//! This crate provides the two pieces a surrogate-gradient spiking neuron
//! needs from its host framework: a broadcasting n-dimensional [`Tensor`]
//! and a spike [`threshold`] whose forward pass is a hard step and whose
//! backward pass substitutes a smooth surrogate derivative.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod surrogate;
pub mod tensor;

pub use error::{MathError, Result};
pub use surrogate::{heaviside, threshold, threshold_backward, SurrogateMethod, Threshold};
pub use tensor::{broadcast_shape, Tensor};

/// Floating point type used throughout lifbox
pub type Float = f32;
