//! Error types for tensor and threshold operations

use thiserror::Error;

/// Result type for math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Errors that can occur in tensor arithmetic and surrogate selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Two shapes cannot be broadcast together
    #[error("Shapes {lhs:?} and {rhs:?} cannot be broadcast together")]
    ShapeMismatch {
        /// Left-hand shape
        lhs: Vec<usize>,
        /// Right-hand shape
        rhs: Vec<usize>,
    },

    /// Data length does not match the requested shape
    #[error("Invalid shape {shape:?} for {len} elements")]
    InvalidShape {
        /// Requested shape
        shape: Vec<usize>,
        /// Number of elements supplied
        len: usize,
    },

    /// Multi-dimensional index outside the tensor
    #[error("Index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        /// Requested index
        index: Vec<usize>,
        /// Tensor shape
        shape: Vec<usize>,
    },

    /// A single value was requested from a tensor holding several
    #[error("Expected a single-element tensor, found shape {shape:?}")]
    NotScalar {
        /// Tensor shape
        shape: Vec<usize>,
    },

    /// Unknown surrogate gradient method name
    #[error("Unknown threshold method '{name}' (supported: {supported})")]
    UnknownSurrogate {
        /// Name that failed to parse
        name: String,
        /// Comma-separated list of supported names
        supported: String,
    },
}

impl MathError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::ShapeMismatch {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(shape: &[usize], len: usize) -> Self {
        Self::InvalidShape {
            shape: shape.to_vec(),
            len,
        }
    }
}
