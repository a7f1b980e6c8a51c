//! Spike thresholds with surrogate gradients
//!
//! The forward pass of every threshold is the Heaviside step. The backward
//! pass replaces the step's derivative (zero almost everywhere) with a smooth
//! surrogate selected by [`SurrogateMethod`] and scaled by `alpha`.

use crate::{Float, MathError, Result, Tensor};
use core::f32::consts::FRAC_2_SQRT_PI;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Surrogate derivative used when backpropagating through a spike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "snake_case", try_from = "String")
)]
pub enum SurrogateMethod {
    /// Plain step, no gradient: d = 0
    Heaviside,
    /// SuperSpike: d = 1 / (α|x| + 1)²
    #[default]
    Super,
    /// Triangle: d = α · max(0, 1 - α|x|)
    Triangle,
    /// Hyperbolic tangent: d = α · (1 - tanh²(αx))
    Tanh,
    /// Tent: d = max(0, 1 - |x|)^α
    Tent,
    /// Circular: d = α · (1/√(α² + x²) - x² / (α² + x²)^(3/2))
    Circ,
    /// Logistic: d = α · σ(αx) · (1 - σ(αx))
    Logistic,
    /// Complementary error function: d = α · 2/√π · e^(-(αx)²)
    HeaviErfc,
}

impl SurrogateMethod {
    /// Every supported method, in display order
    pub const ALL: [SurrogateMethod; 8] = [
        SurrogateMethod::Heaviside,
        SurrogateMethod::Super,
        SurrogateMethod::Triangle,
        SurrogateMethod::Tanh,
        SurrogateMethod::Tent,
        SurrogateMethod::Circ,
        SurrogateMethod::Logistic,
        SurrogateMethod::HeaviErfc,
    ];

    /// Canonical name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            SurrogateMethod::Heaviside => "heaviside",
            SurrogateMethod::Super => "super",
            SurrogateMethod::Triangle => "triangle",
            SurrogateMethod::Tanh => "tanh",
            SurrogateMethod::Tent => "tent",
            SurrogateMethod::Circ => "circ",
            SurrogateMethod::Logistic => "logistic",
            SurrogateMethod::HeaviErfc => "heavi_erfc",
        }
    }

    /// Surrogate derivative of the step at `x` with steepness `alpha`
    pub fn derivative(&self, x: Float, alpha: Float) -> Float {
        match self {
            SurrogateMethod::Heaviside => 0.0,
            SurrogateMethod::Super => {
                let denom = alpha * x.abs() + 1.0;
                1.0 / (denom * denom)
            }
            SurrogateMethod::Triangle => alpha * (1.0 - alpha * x.abs()).max(0.0),
            SurrogateMethod::Tanh => {
                let t = (alpha * x).tanh();
                alpha * (1.0 - t * t)
            }
            SurrogateMethod::Tent => (1.0 - x.abs()).max(0.0).powf(alpha),
            SurrogateMethod::Circ => {
                let s = alpha * alpha + x * x;
                alpha * (1.0 / s.sqrt() - x * x / s.powf(1.5))
            }
            SurrogateMethod::Logistic => {
                // σ form stays finite where e^(-αx) overflows
                let sig = 1.0 / (1.0 + (-alpha * x).exp());
                alpha * sig * (1.0 - sig)
            }
            SurrogateMethod::HeaviErfc => {
                let ax = alpha * x;
                alpha * FRAC_2_SQRT_PI * (-(ax * ax)).exp()
            }
        }
    }

    fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SurrogateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurrogateMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| MathError::UnknownSurrogate {
                name: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

impl TryFrom<String> for SurrogateMethod {
    type Error = MathError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

/// Heaviside step: 1 where `x >= 0`, else 0
pub fn heaviside(x: Float) -> Float {
    if x >= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Forward pass of the spike threshold
///
/// Returns a tensor shaped like `x` holding exactly 0.0 or 1.0. `alpha` does
/// not affect the forward value but must broadcast against `x`.
pub fn threshold(x: &Tensor, _method: SurrogateMethod, alpha: &Tensor) -> Result<Tensor> {
    crate::broadcast_shape(x.shape(), alpha.shape())?;
    Ok(x.map(heaviside))
}

/// Backward pass of the spike threshold
///
/// Computes `grad_output * d(x; alpha)` for the selected surrogate and
/// reduces the result to the shape of `x`.
pub fn threshold_backward(
    x: &Tensor,
    grad_output: &Tensor,
    method: SurrogateMethod,
    alpha: &Tensor,
) -> Result<Tensor> {
    let surrogate = x.zip_with(alpha, |x, a| method.derivative(x, a))?;
    grad_output.mul(&surrogate)?.sum_to_shape(x.shape())
}

/// Threshold method bundled with its steepness
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    /// Surrogate gradient method
    pub method: SurrogateMethod,
    /// Surrogate steepness, broadcastable against inputs
    pub alpha: Tensor,
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            method: SurrogateMethod::default(),
            alpha: Tensor::scalar(100.0),
        }
    }
}

impl Threshold {
    /// Create a threshold with a scalar steepness
    pub fn new(method: SurrogateMethod, alpha: Float) -> Self {
        Self {
            method,
            alpha: Tensor::scalar(alpha),
        }
    }

    /// Forward pass, see [`threshold`]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor> {
        threshold(x, self.method, &self.alpha)
    }

    /// Backward pass, see [`threshold_backward`]
    pub fn backward(&self, x: &Tensor, grad_output: &Tensor) -> Result<Tensor> {
        threshold_backward(x, grad_output, self.method, &self.alpha)
    }
}
