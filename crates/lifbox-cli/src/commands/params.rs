//! Effective parameter dump

use clap::Args;
use std::path::PathBuf;

use lifbox_runtime::LIFBoxParameters;

use crate::config::ParameterFile;
use crate::error::CliResult;

/// Print the effective parameters as TOML
#[derive(Args, Debug)]
pub struct ParamsCommand {
    /// Write the parameter file here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ParamsCommand {
    pub fn execute(self, p: &LIFBoxParameters) -> CliResult<()> {
        let file = ParameterFile::from_parameters(p);
        match &self.output {
            Some(path) => {
                file.save_to_file(path)?;
                tracing::info!("Wrote {}", path.display());
            }
            None => print!("{}", file.to_toml()?),
        }
        Ok(())
    }
}
