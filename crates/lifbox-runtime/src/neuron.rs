//! Parameters and state of the boxed LIF neuron

use crate::error::*;
use lifbox_math::{broadcast_shape, Float, SurrogateMethod, Tensor, Threshold};

/// Parametrization of a boxed LIF neuron
///
/// Every numeric field is a tensor so that parameters can be shared by a
/// whole population (scalars) or set per neuron (arrays broadcastable
/// against the state).
#[derive(Debug, Clone, PartialEq)]
pub struct LIFBoxParameters {
    /// Inverse membrane time constant (1/s)
    pub tau_mem_inv: Tensor,
    /// Leak potential
    pub v_leak: Tensor,
    /// Threshold potential
    pub v_th: Tensor,
    /// Reset potential
    pub v_reset: Tensor,
    /// Surrogate gradient used by the spike threshold
    pub method: SurrogateMethod,
    /// Surrogate gradient steepness
    pub alpha: Tensor,
}

impl Default for LIFBoxParameters {
    fn default() -> Self {
        Self {
            tau_mem_inv: Tensor::scalar(1.0 / 1e-2), // 10ms membrane time constant
            v_leak: Tensor::scalar(0.0),
            v_th: Tensor::scalar(1.0),
            v_reset: Tensor::scalar(0.0),
            method: SurrogateMethod::Super,
            alpha: Tensor::scalar(100.0),
        }
    }
}

impl LIFBoxParameters {
    /// Create scalar parameters with validation
    pub fn new(
        tau_mem_inv: Float,
        v_leak: Float,
        v_th: Float,
        v_reset: Float,
        method: SurrogateMethod,
        alpha: Float,
    ) -> Result<Self> {
        let params = Self {
            tau_mem_inv: Tensor::scalar(tau_mem_inv),
            v_leak: Tensor::scalar(v_leak),
            v_th: Tensor::scalar(v_th),
            v_reset: Tensor::scalar(v_reset),
            method,
            alpha: Tensor::scalar(alpha),
        };
        params.validate()?;
        Ok(params)
    }

    /// Replace the inverse membrane time constant
    pub fn with_tau_mem_inv(mut self, tau_mem_inv: impl Into<Tensor>) -> Self {
        self.tau_mem_inv = tau_mem_inv.into();
        self
    }

    /// Replace the leak potential
    pub fn with_v_leak(mut self, v_leak: impl Into<Tensor>) -> Self {
        self.v_leak = v_leak.into();
        self
    }

    /// Replace the threshold potential
    pub fn with_v_th(mut self, v_th: impl Into<Tensor>) -> Self {
        self.v_th = v_th.into();
        self
    }

    /// Replace the reset potential
    pub fn with_v_reset(mut self, v_reset: impl Into<Tensor>) -> Self {
        self.v_reset = v_reset.into();
        self
    }

    /// Replace the surrogate gradient method
    pub fn with_method(mut self, method: SurrogateMethod) -> Self {
        self.method = method;
        self
    }

    /// Replace the surrogate gradient steepness
    pub fn with_alpha(mut self, alpha: impl Into<Tensor>) -> Self {
        self.alpha = alpha.into();
        self
    }

    /// Threshold function described by `method` and `alpha`
    pub fn threshold(&self) -> Threshold {
        Threshold {
            method: self.method,
            alpha: self.alpha.clone(),
        }
    }

    /// Shape all numeric fields broadcast to
    pub fn broadcast_shape(&self) -> Result<Vec<usize>> {
        let fields = [&self.v_leak, &self.v_th, &self.v_reset, &self.alpha];
        let mut shape = self.tau_mem_inv.shape().to_vec();
        for field in fields {
            shape = broadcast_shape(&shape, field.shape())?;
        }
        Ok(shape)
    }

    /// Validate parameters
    ///
    /// The step function does not call this; it is meant for parameters
    /// coming from user input.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("tau_mem_inv", &self.tau_mem_inv),
            ("v_leak", &self.v_leak),
            ("v_th", &self.v_th),
            ("v_reset", &self.v_reset),
            ("alpha", &self.alpha),
        ];
        for (name, value) in named {
            if !value.all_finite() {
                return Err(RuntimeError::invalid_parameter(
                    name,
                    format!("{:?}", value.to_vec()),
                    "finite values",
                ));
            }
        }

        if self.tau_mem_inv.iter().any(|&t| t < 0.0) {
            return Err(RuntimeError::invalid_parameter(
                "tau_mem_inv",
                format!("{:?}", self.tau_mem_inv.to_vec()),
                ">= 0.0",
            ));
        }
        if self.alpha.iter().any(|&a| a <= 0.0) {
            return Err(RuntimeError::invalid_parameter(
                "alpha",
                format!("{:?}", self.alpha.to_vec()),
                "> 0.0",
            ));
        }

        let shape = self.broadcast_shape()?;
        log::debug!(
            "validated LIF box parameters: method={}, broadcast shape {:?}",
            self.method,
            shape
        );
        Ok(())
    }
}

/// State of a feed-forward boxed LIF neuron
#[derive(Debug, Clone, PartialEq)]
pub struct LIFBoxFeedForwardState {
    /// Membrane potential
    pub v: Tensor,
}

impl LIFBoxFeedForwardState {
    /// Create a state from a membrane potential
    pub fn new(v: impl Into<Tensor>) -> Self {
        Self { v: v.into() }
    }

    /// Initial state: every neuron at zero potential
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            v: Tensor::zeros(shape),
        }
    }
}

/// State of a boxed LIF neuron with recurrent spikes
#[derive(Debug, Clone, PartialEq)]
pub struct LIFBoxState {
    /// Recurrent spikes
    pub z: Tensor,
    /// Membrane potential
    pub v: Tensor,
}

impl LIFBoxState {
    /// Create a state from spikes and membrane potential
    pub fn new(z: impl Into<Tensor>, v: impl Into<Tensor>) -> Self {
        Self {
            z: z.into(),
            v: v.into(),
        }
    }

    /// Initial state: no spikes, every neuron at zero potential
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            z: Tensor::zeros(shape),
            v: Tensor::zeros(shape),
        }
    }

    /// Membrane potential without the recurrent spikes
    pub fn feed_forward(&self) -> LIFBoxFeedForwardState {
        LIFBoxFeedForwardState { v: self.v.clone() }
    }
}

impl From<LIFBoxState> for LIFBoxFeedForwardState {
    fn from(state: LIFBoxState) -> Self {
        Self { v: state.v }
    }
}
