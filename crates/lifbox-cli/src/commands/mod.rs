//! CLI command implementations for lifbox

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

use lifbox_runtime::{LIFBoxParameters, SurrogateMethod, Tensor};

use crate::config::ParameterFile;
use crate::error::{CliError, CliResult};

pub mod methods;
pub mod params;
pub mod run;
pub mod step;

/// lifbox - boxed leaky integrate-and-fire neurons
#[derive(Parser, Debug)]
#[command(
    name = "lifbox",
    version,
    about = "Boxed leaky integrate-and-fire neurons with surrogate gradients",
    long_about = "Integrate boxed LIF neurons (leaky integrate-and-fire without a current \
                  term) step by step, inspect their spikes and membrane potentials, and \
                  look at the surrogate gradients that make the spike threshold trainable."
)]
pub struct LifboxCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Parameter file (TOML)
    #[arg(short, long, global = true, env = "LIFBOX_PARAMS")]
    pub params: Option<PathBuf>,

    /// Override the surrogate gradient method
    #[arg(long, global = true)]
    pub method: Option<SurrogateMethod>,

    /// Override the surrogate gradient steepness
    #[arg(long, global = true)]
    pub alpha: Option<f32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Integrate a single time step
    Step(step::StepCommand),

    /// Drive a population with constant input for several steps
    Run(run::RunCommand),

    /// List the surrogate gradient methods
    Methods(methods::MethodsCommand),

    /// Print the effective parameters as TOML
    Params(params::ParamsCommand),
}

/// Output format for single steps
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON object
    Json,
    /// Human readable lines
    Text,
}

impl LifboxCli {
    /// Parameters from the defaults, the parameter file and the overrides,
    /// in that order
    pub fn parameters(&self) -> CliResult<LIFBoxParameters> {
        let mut p = LIFBoxParameters::default();
        if let Some(path) = &self.params {
            p = ParameterFile::load_from_file(path)?.apply(p);
        }
        if let Some(method) = self.method {
            p = p.with_method(method);
        }
        if let Some(alpha) = self.alpha {
            p = p.with_alpha(Tensor::scalar(alpha));
        }
        p.validate()?;
        debug!("Effective parameters: {:?}", p);
        Ok(p)
    }

    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        let p = self.parameters()?;

        match self.command {
            Commands::Step(cmd) => cmd.execute(&p),
            Commands::Run(cmd) => cmd.execute(&p),
            Commands::Methods(cmd) => cmd.execute(&p),
            Commands::Params(cmd) => cmd.execute(&p),
        }
    }
}

/// Build a 1-D tensor from a comma-separated command line list
pub(crate) fn tensor_arg(name: &str, values: &[f32]) -> CliResult<Tensor> {
    if values.is_empty() {
        return Err(CliError::invalid_args(format!("--{} needs at least one value", name)));
    }
    Ok(Tensor::from_slice(values))
}

/// Write `content` to `output` or stdout
pub(crate) fn emit(content: &str, output: Option<&PathBuf>) -> CliResult<()> {
    use anyhow::Context;

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing output to {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
