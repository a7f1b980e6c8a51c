//! Parameter files for the lifbox CLI
//!
//! A parameter file is TOML. Every numeric field is either a number shared
//! by the whole population or an array with one value per neuron; missing
//! fields keep their defaults.
//!
//! ```toml
//! tau_mem_inv = 100.0
//! v_th = [1.0, 0.8, 1.2]
//! method = "super"
//! alpha = 100.0
//! ```

use std::path::Path;

use lifbox_runtime::{LIFBoxParameters, SurrogateMethod, Tensor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// A numeric parameter: one shared value or one value per neuron
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Shared by every neuron
    Scalar(f64),
    /// One value per neuron
    PerNeuron(Vec<f64>),
}

/// Widen through the shortest decimal form so 0.1f32 is written as 0.1
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

impl ParamValue {
    /// Convert to a scalar or 1-D tensor
    pub fn to_tensor(&self) -> Tensor {
        match self {
            ParamValue::Scalar(value) => Tensor::scalar(*value as f32),
            ParamValue::PerNeuron(values) => {
                Tensor::from_slice(&values.iter().map(|&v| v as f32).collect::<Vec<_>>())
            }
        }
    }

    /// Convert from a tensor; tensors with more than one dimension are
    /// flattened
    pub fn from_tensor(tensor: &Tensor) -> Self {
        if tensor.is_scalar() {
            ParamValue::Scalar(tensor.iter().next().map_or(0.0, |&v| widen(v)))
        } else {
            ParamValue::PerNeuron(tensor.iter().map(|&v| widen(v)).collect())
        }
    }
}

/// Contents of a parameter file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterFile {
    /// Inverse membrane time constant (1/s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tau_mem_inv: Option<ParamValue>,
    /// Leak potential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_leak: Option<ParamValue>,
    /// Threshold potential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_th: Option<ParamValue>,
    /// Reset potential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_reset: Option<ParamValue>,
    /// Surrogate gradient method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<SurrogateMethod>,
    /// Surrogate gradient steepness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<ParamValue>,
}

impl ParameterFile {
    /// Load a parameter file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::config(format!(
                "Parameter file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let file: Self = toml::from_str(&content)?;
        debug!("Loaded parameter file {}", path.display());
        Ok(file)
    }

    /// Save as TOML
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Describe every field of `p`
    pub fn from_parameters(p: &LIFBoxParameters) -> Self {
        Self {
            tau_mem_inv: Some(ParamValue::from_tensor(&p.tau_mem_inv)),
            v_leak: Some(ParamValue::from_tensor(&p.v_leak)),
            v_th: Some(ParamValue::from_tensor(&p.v_th)),
            v_reset: Some(ParamValue::from_tensor(&p.v_reset)),
            method: Some(p.method),
            alpha: Some(ParamValue::from_tensor(&p.alpha)),
        }
    }

    /// Apply the fields present in the file on top of `base`
    pub fn apply(&self, base: LIFBoxParameters) -> LIFBoxParameters {
        let mut p = base;
        if let Some(value) = &self.tau_mem_inv {
            p = p.with_tau_mem_inv(value.to_tensor());
        }
        if let Some(value) = &self.v_leak {
            p = p.with_v_leak(value.to_tensor());
        }
        if let Some(value) = &self.v_th {
            p = p.with_v_th(value.to_tensor());
        }
        if let Some(value) = &self.v_reset {
            p = p.with_v_reset(value.to_tensor());
        }
        if let Some(method) = self.method {
            p = p.with_method(method);
        }
        if let Some(value) = &self.alpha {
            p = p.with_alpha(value.to_tensor());
        }
        p
    }
}
