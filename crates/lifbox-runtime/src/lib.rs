//! Boxed leaky integrate-and-fire neurons
//!
//! A simplified LIF neuron that leaves out the synaptic current term: input
//! drives the membrane potential directly, so currents "jump" instantly
//! (they can be drawn as boxes). This makes the model cheap to integrate and
//! easy to train with surrogate gradients.
//!
//! The crate is stateless: callers create an initial state with
//! [`LIFBoxFeedForwardState::zeros`] and thread it through
//! [`lif_box_feed_forward_step`] once per time step.

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export the tensor and threshold layer
pub use lifbox_math::{
    threshold, threshold_backward, Float, MathError, SurrogateMethod, Tensor, Threshold,
};

// Core modules
pub mod error;
pub mod neuron;
pub mod step;

// Re-export essential types
pub use error::{Result, RuntimeError};
pub use neuron::{LIFBoxFeedForwardState, LIFBoxParameters, LIFBoxState};
pub use step::{
    lif_box_feed_forward_step, lif_box_feed_forward_step_traced, step_output_shape,
    StepGradients, StepTrace, DEFAULT_DT,
};
