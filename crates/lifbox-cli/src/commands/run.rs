//! Constant-input runs

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, info};

use lifbox_runtime::{
    lif_box_feed_forward_step, step_output_shape, LIFBoxFeedForwardState, LIFBoxParameters,
    RuntimeError, Tensor, DEFAULT_DT,
};

use super::{emit, tensor_arg};
use crate::error::{CliError, CliResult};

/// Trace output format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceFormat {
    /// One JSON document with every step
    Json,
    /// One row per step and neuron
    Csv,
}

/// Drive a population with constant input for several steps
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Input current applied on every step, comma-separated for several neurons
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub input: Vec<f32>,

    /// Number of steps
    #[arg(short = 'n', long, default_value_t = 100)]
    pub steps: usize,

    /// Integration time step
    #[arg(long, default_value_t = DEFAULT_DT)]
    pub dt: f32,

    /// Trace format
    #[arg(short, long, value_enum, default_value_t = TraceFormat::Json)]
    pub format: TraceFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize, Debug)]
struct StepRecord {
    step: usize,
    time: f32,
    spikes: Vec<f32>,
    v: Vec<f32>,
}

#[derive(Serialize, Debug)]
struct RunTrace {
    dt: f32,
    steps: usize,
    shape: Vec<usize>,
    spike_counts: Vec<f32>,
    records: Vec<StepRecord>,
}

impl RunCommand {
    pub fn execute(self, p: &LIFBoxParameters) -> CliResult<()> {
        if self.steps == 0 {
            return Err(CliError::invalid_args("--steps must be at least 1"));
        }

        let input = tensor_arg("input", &self.input)?;
        let trace = simulate(&input, p, self.dt, self.steps)?;

        let total: f32 = trace.spike_counts.iter().sum();
        info!(
            "Ran {} steps of {} neurons: {} spikes",
            trace.steps,
            trace.spike_counts.len(),
            total
        );

        let content = match self.format {
            TraceFormat::Json => serde_json::to_string_pretty(&trace)?,
            TraceFormat::Csv => render_csv(&trace),
        };
        emit(&content, self.output.as_ref())
    }
}

fn simulate(input: &Tensor, p: &LIFBoxParameters, dt: f32, steps: usize) -> CliResult<RunTrace> {
    // Start from the full output shape so the state does not grow on the first step
    let shape = step_output_shape(input.shape(), &LIFBoxFeedForwardState::zeros(input.shape()), p)?;
    debug!("Population shape {:?}", shape);

    let mut state = LIFBoxFeedForwardState::zeros(&shape);
    let mut spike_counts = Tensor::zeros(&shape);
    let mut records = Vec::with_capacity(steps);

    for step in 0..steps {
        let (z, next) = lif_box_feed_forward_step(input, &state, p, dt)?;
        if !next.v.all_finite() {
            return Err(RuntimeError::numerical_error(format!(
                "membrane potential became non-finite at step {}",
                step
            ))
            .into());
        }

        spike_counts = spike_counts.add(&z)?;
        records.push(StepRecord {
            step,
            time: (step + 1) as f32 * dt,
            spikes: z.to_vec(),
            v: next.v.to_vec(),
        });
        state = next;
    }

    Ok(RunTrace {
        dt,
        steps,
        shape,
        spike_counts: spike_counts.to_vec(),
        records,
    })
}

fn render_csv(trace: &RunTrace) -> String {
    let mut out = String::from("step,time,neuron,spike,v\n");
    for record in &trace.records {
        for (neuron, (spike, v)) in record.spikes.iter().zip(&record.v).enumerate() {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{},{},{},{},{}", record.step, record.time, neuron, spike, v);
        }
    }
    out
}
