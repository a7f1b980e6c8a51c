//! Broadcasting tensor for neuron populations
//!
//! [`Tensor`] is a thin owned wrapper over a dynamic-rank `ndarray` array.
//! All binary operations follow NumPy broadcasting rules and report
//! incompatible shapes as [`MathError::ShapeMismatch`] instead of panicking.

use crate::{Float, MathError, Result};
use ndarray::{Array1, ArrayD, Axis, IxDyn, Zip};

/// Dense n-dimensional `f32` array with broadcasting arithmetic
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<Float>,
}

/// Compute the shape two operands broadcast to
///
/// Shapes are aligned on their trailing dimensions; each pair of sizes must
/// be equal or contain a 1.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let lhs_pad = ndim - lhs.len();
    let rhs_pad = ndim - rhs.len();

    let mut shape = Vec::with_capacity(ndim);
    for axis in 0..ndim {
        let l = if axis < lhs_pad { 1 } else { lhs[axis - lhs_pad] };
        let r = if axis < rhs_pad { 1 } else { rhs[axis - rhs_pad] };
        let size = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => return Err(MathError::shape_mismatch(lhs, rhs)),
        };
        shape.push(size);
    }
    Ok(shape)
}

impl Tensor {
    /// Create a zero-dimensional tensor holding one value
    pub fn scalar(value: Float) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(&[]), value),
        }
    }

    /// Create a tensor from row-major data
    pub fn from_vec(shape: &[usize], data: Vec<Float>) -> Result<Self> {
        let len = data.len();
        let data = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|_| MathError::invalid_shape(shape, len))?;
        Ok(Self { data })
    }

    /// Create a one-dimensional tensor from a slice
    pub fn from_slice(data: &[Float]) -> Self {
        Self {
            data: Array1::from(data.to_vec()).into_dyn(),
        }
    }

    /// Create a tensor of zeros
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    /// Create a tensor filled with `value`
    pub fn full(shape: &[usize], value: Float) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// Zeros with the shape of `self`
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape())
    }

    /// Ones with the shape of `self`
    pub fn ones_like(&self) -> Self {
        Self::full(self.shape(), 1.0)
    }

    /// Shape of the tensor
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if the tensor is zero-dimensional
    pub fn is_scalar(&self) -> bool {
        self.data.ndim() == 0
    }

    /// Value of a single-element tensor
    pub fn item(&self) -> Result<Float> {
        if self.len() != 1 {
            return Err(MathError::NotScalar {
                shape: self.shape().to_vec(),
            });
        }
        self.data
            .iter()
            .next()
            .copied()
            .ok_or_else(|| MathError::NotScalar {
                shape: self.shape().to_vec(),
            })
    }

    /// Element at a multi-dimensional index
    pub fn get(&self, index: &[usize]) -> Result<Float> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| MathError::IndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape().to_vec(),
            })
    }

    /// Iterate over elements in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Float> {
        self.data.iter()
    }

    /// Copy elements into a row-major vector
    pub fn to_vec(&self) -> Vec<Float> {
        self.data.iter().copied().collect()
    }

    /// Check that every element is finite
    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Sum of all elements
    pub fn sum(&self) -> Float {
        self.data.sum()
    }

    /// Apply `f` elementwise
    pub fn map<F>(&self, f: F) -> Tensor
    where
        F: Fn(Float) -> Float,
    {
        Self {
            data: self.data.mapv(f),
        }
    }

    /// Combine two tensors elementwise after broadcasting them together
    pub fn zip_with<F>(&self, other: &Tensor, f: F) -> Result<Tensor>
    where
        F: Fn(Float, Float) -> Float,
    {
        let shape = broadcast_shape(self.shape(), other.shape())?;
        let lhs = self
            .data
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| MathError::shape_mismatch(self.shape(), other.shape()))?;
        let rhs = other
            .data
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| MathError::shape_mismatch(self.shape(), other.shape()))?;

        let data = Zip::from(&lhs).and(&rhs).map_collect(|&a, &b| f(a, b));
        Ok(Self { data })
    }

    /// Expand the tensor to a larger broadcast-compatible shape
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Tensor> {
        let view = self
            .data
            .broadcast(IxDyn(shape))
            .ok_or_else(|| MathError::shape_mismatch(self.shape(), shape))?;
        Ok(Self {
            data: view.to_owned(),
        })
    }

    /// Broadcasting addition
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Broadcasting subtraction
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Broadcasting multiplication
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: &Tensor) -> Result<Tensor> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Add a scalar to every element
    pub fn add_scalar(&self, value: Float) -> Tensor {
        self.map(|x| x + value)
    }

    /// Multiply every element by a scalar
    pub fn mul_scalar(&self, value: Float) -> Tensor {
        self.map(|x| x * value)
    }

    /// Compute `value - x` for every element
    pub fn rsub_scalar(&self, value: Float) -> Tensor {
        self.map(|x| value - x)
    }

    /// Reduce a broadcast result back to an operand's shape
    ///
    /// Sums over the leading axes `shape` lacks and over every axis where
    /// `shape` has size 1. This is the adjoint of broadcasting and is what
    /// turns an elementwise gradient into a gradient for a broadcast operand.
    pub fn sum_to_shape(&self, shape: &[usize]) -> Result<Tensor> {
        let full = broadcast_shape(shape, self.shape())?;
        if full.as_slice() != self.shape() {
            return Err(MathError::shape_mismatch(shape, self.shape()));
        }

        let mut data = self.data.clone();
        for _ in 0..(self.ndim() - shape.len()) {
            data = data.sum_axis(Axis(0));
        }
        for (axis, &size) in shape.iter().enumerate() {
            if size == 1 && data.shape()[axis] != 1 {
                data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
            }
        }
        Ok(Self { data })
    }
}

impl From<Float> for Tensor {
    fn from(value: Float) -> Self {
        Self::scalar(value)
    }
}

impl From<Vec<Float>> for Tensor {
    fn from(data: Vec<Float>) -> Self {
        Self::from_slice(&data)
    }
}
