//! Single-step integration

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use lifbox_runtime::{
    lif_box_feed_forward_step_traced, LIFBoxFeedForwardState, LIFBoxParameters, StepGradients,
    Tensor, DEFAULT_DT,
};

use super::{emit, tensor_arg, OutputFormat};
use crate::error::CliResult;

/// Integrate a single time step
#[derive(Args, Debug)]
pub struct StepCommand {
    /// Input current, comma-separated for several neurons
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub input: Vec<f32>,

    /// Membrane potential before the step (defaults to zero)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub v: Vec<f32>,

    /// Integration time step
    #[arg(long, default_value_t = DEFAULT_DT)]
    pub dt: f32,

    /// Also report gradients of the spike count through the surrogate
    #[arg(long)]
    pub grad: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize, Debug)]
struct GradientReport {
    input: Vec<f32>,
    v: Vec<f32>,
    tau_mem_inv: Vec<f32>,
    v_leak: Vec<f32>,
    v_th: Vec<f32>,
    v_reset: Vec<f32>,
}

impl From<StepGradients> for GradientReport {
    fn from(g: StepGradients) -> Self {
        Self {
            input: g.input.to_vec(),
            v: g.v.to_vec(),
            tau_mem_inv: g.tau_mem_inv.to_vec(),
            v_leak: g.v_leak.to_vec(),
            v_th: g.v_th.to_vec(),
            v_reset: g.v_reset.to_vec(),
        }
    }
}

#[derive(Serialize, Debug)]
struct StepReport {
    shape: Vec<usize>,
    spikes: Vec<f32>,
    v_decayed: Vec<f32>,
    v: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gradients: Option<GradientReport>,
}

impl StepCommand {
    pub fn execute(self, p: &LIFBoxParameters) -> CliResult<()> {
        let input = tensor_arg("input", &self.input)?;
        let state = if self.v.is_empty() {
            LIFBoxFeedForwardState::zeros(input.shape())
        } else {
            LIFBoxFeedForwardState::new(tensor_arg("v", &self.v)?)
        };

        let (z, next, trace) = lif_box_feed_forward_step_traced(&input, &state, p, self.dt)?;
        info!("Step produced {} spikes in {} neurons", z.sum(), z.len());

        let gradients = if self.grad {
            // Loss = number of spikes, so only the surrogate path carries gradient
            let g = trace.backward(&Tensor::scalar(1.0), &Tensor::scalar(0.0), p)?;
            Some(GradientReport::from(g))
        } else {
            None
        };

        let report = StepReport {
            shape: next.v.shape().to_vec(),
            spikes: z.to_vec(),
            v_decayed: trace.v_decayed().to_vec(),
            v: next.v.to_vec(),
            gradients,
        };

        let content = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)?,
            OutputFormat::Text => render_text(&report),
        };
        emit(&content, self.output.as_ref())
    }
}

fn render_text(report: &StepReport) -> String {
    let mut lines = vec![
        format!("shape:     {:?}", report.shape),
        format!("spikes:    {:?}", report.spikes),
        format!("v_decayed: {:?}", report.v_decayed),
        format!("v:         {:?}", report.v),
    ];
    if let Some(g) = &report.gradients {
        lines.push(format!("d/d input:       {:?}", g.input));
        lines.push(format!("d/d v:           {:?}", g.v));
        lines.push(format!("d/d tau_mem_inv: {:?}", g.tau_mem_inv));
        lines.push(format!("d/d v_leak:      {:?}", g.v_leak));
        lines.push(format!("d/d v_th:        {:?}", g.v_th));
        lines.push(format!("d/d v_reset:     {:?}", g.v_reset));
    }
    lines.join("\n")
}
