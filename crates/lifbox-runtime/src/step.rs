//! Euler integration step of the boxed LIF neuron
//!
//! One step integrates
//!
//! ```text
//! dv/dt = tau_mem_inv * (v_leak - v + i)
//! ```
//!
//! applies the jump condition `z = H(v - v_th)` and the transition
//! `v = (1 - z) v + z v_reset`. The traced variant additionally keeps the
//! intermediates needed to backpropagate through the step with the
//! surrogate gradient of the threshold.

use crate::{
    error::*,
    neuron::{LIFBoxFeedForwardState, LIFBoxParameters},
};
use lifbox_math::{broadcast_shape, threshold, threshold_backward, Float, Tensor};

/// Default integration time step (1 ms)
pub const DEFAULT_DT: Float = 0.001;

/// Gradients of a loss with respect to every operand of one step
///
/// Each tensor has the shape of the operand it belongs to, so parameter
/// gradients for shared (scalar) parameters are summed over the population.
#[derive(Debug, Clone, PartialEq)]
pub struct StepGradients {
    /// Gradient for the input current
    pub input: Tensor,
    /// Gradient for the incoming membrane potential
    pub v: Tensor,
    /// Gradient for the inverse membrane time constant
    pub tau_mem_inv: Tensor,
    /// Gradient for the leak potential
    pub v_leak: Tensor,
    /// Gradient for the threshold potential
    pub v_th: Tensor,
    /// Gradient for the reset potential
    pub v_reset: Tensor,
}

/// Intermediates recorded by [`lif_box_feed_forward_step_traced`]
#[derive(Debug, Clone)]
pub struct StepTrace {
    dt: Float,
    input_shape: Vec<usize>,
    v_shape: Vec<usize>,
    output_shape: Vec<usize>,
    /// input + v_leak - v
    drive: Tensor,
    v_decayed: Tensor,
    z_new: Tensor,
}

struct Integrated {
    drive: Tensor,
    v_decayed: Tensor,
    z_new: Tensor,
    v_new: Tensor,
}

fn check_dt(dt: Float) -> Result<()> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(RuntimeError::invalid_parameter(
            "dt",
            dt.to_string(),
            "finite and > 0.0",
        ));
    }
    Ok(())
}

fn integrate(
    input_tensor: &Tensor,
    v: &Tensor,
    p: &LIFBoxParameters,
    dt: Float,
) -> Result<Integrated> {
    check_dt(dt)?;

    // compute voltage updates
    let drive = input_tensor.add(&p.v_leak)?.sub(v)?;
    let dv = p.tau_mem_inv.mul_scalar(dt).mul(&drive)?;
    let v_decayed = v.add(&dv)?;

    // compute new spikes
    let z_new = threshold(&v_decayed.sub(&p.v_th)?, p.method, &p.alpha)?;

    // compute reset
    let v_new = z_new
        .rsub_scalar(1.0)
        .mul(&v_decayed)?
        .add(&z_new.mul(&p.v_reset)?)?;

    log::trace!(
        "lif box step: {} neurons, {} spikes",
        z_new.len(),
        z_new.sum()
    );

    Ok(Integrated {
        drive,
        v_decayed,
        z_new,
        v_new,
    })
}

/// Compute a single Euler-integration step of a LIF neuron without current
/// terms
///
/// `input_tensor` is the input current for this step and must broadcast
/// against the state and the parameters. The input state is left untouched;
/// the updated membrane potential is returned as a new state together with
/// the spikes (exactly 0.0 or 1.0) emitted in this step.
pub fn lif_box_feed_forward_step(
    input_tensor: &Tensor,
    state: &LIFBoxFeedForwardState,
    p: &LIFBoxParameters,
    dt: Float,
) -> Result<(Tensor, LIFBoxFeedForwardState)> {
    let step = integrate(input_tensor, &state.v, p, dt)?;
    Ok((step.z_new, LIFBoxFeedForwardState { v: step.v_new }))
}

/// Same as [`lif_box_feed_forward_step`] but also returns a [`StepTrace`]
/// for the backward pass
pub fn lif_box_feed_forward_step_traced(
    input_tensor: &Tensor,
    state: &LIFBoxFeedForwardState,
    p: &LIFBoxParameters,
    dt: Float,
) -> Result<(Tensor, LIFBoxFeedForwardState, StepTrace)> {
    let step = integrate(input_tensor, &state.v, p, dt)?;
    let trace = StepTrace {
        dt,
        input_shape: input_tensor.shape().to_vec(),
        v_shape: state.v.shape().to_vec(),
        output_shape: step.v_new.shape().to_vec(),
        drive: step.drive,
        v_decayed: step.v_decayed,
        z_new: step.z_new.clone(),
    };
    Ok((step.z_new, LIFBoxFeedForwardState { v: step.v_new }, trace))
}

impl StepTrace {
    /// Spikes emitted by the traced step
    pub fn spikes(&self) -> &Tensor {
        &self.z_new
    }

    /// Membrane potential after integration and before reset
    pub fn v_decayed(&self) -> &Tensor {
        &self.v_decayed
    }

    /// Backpropagate through the step
    ///
    /// `grad_z` and `grad_v` are the gradients of the loss with respect to the
    /// emitted spikes and the new membrane potential; both must broadcast to
    /// the output shape. `p` must be the parameters the step ran with. The
    /// spike threshold contributes its surrogate derivative; `alpha` receives
    /// no gradient.
    pub fn backward(
        &self,
        grad_z: &Tensor,
        grad_v: &Tensor,
        p: &LIFBoxParameters,
    ) -> Result<StepGradients> {
        let grad_z = grad_z.broadcast_to(&self.output_shape)?;
        let grad_v = grad_v.broadcast_to(&self.output_shape)?;

        // v_new depends on z through (1 - z) v_decayed + z v_reset
        let g_z = grad_z.add(&grad_v.mul(&p.v_reset.sub(&self.v_decayed)?)?)?;
        let x = self.v_decayed.sub(&p.v_th)?;
        let g_x = threshold_backward(&x, &g_z, p.method, &p.alpha)?;

        let g_vd = grad_v
            .mul(&self.z_new.rsub_scalar(1.0))?
            .add(&g_x)?
            .sum_to_shape(self.v_decayed.shape())?;

        let rate = p.tau_mem_inv.mul_scalar(self.dt);
        let g_drive = g_vd.mul(&rate)?;

        let grads = StepGradients {
            input: g_drive.sum_to_shape(&self.input_shape)?,
            v: g_vd.mul(&rate.rsub_scalar(1.0))?.sum_to_shape(&self.v_shape)?,
            tau_mem_inv: g_vd
                .mul(&self.drive)?
                .mul_scalar(self.dt)
                .sum_to_shape(p.tau_mem_inv.shape())?,
            v_leak: g_drive.sum_to_shape(p.v_leak.shape())?,
            v_th: g_x.mul_scalar(-1.0).sum_to_shape(p.v_th.shape())?,
            v_reset: grad_v.mul(&self.z_new)?.sum_to_shape(p.v_reset.shape())?,
        };
        Ok(grads)
    }
}

/// Check that the output shape of a step is what a caller expects
///
/// Useful before threading a state through many steps: a parameter array
/// that broadcasts to a larger shape than the state silently grows the
/// state on the first step.
pub fn step_output_shape(
    input_shape: &[usize],
    state: &LIFBoxFeedForwardState,
    p: &LIFBoxParameters,
) -> Result<Vec<usize>> {
    let shape = broadcast_shape(input_shape, state.v.shape())?;
    Ok(broadcast_shape(&shape, &p.broadcast_shape()?)?)
}
