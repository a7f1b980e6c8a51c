//! Surrogate gradient listing

use clap::Args;

use lifbox_runtime::{Float, LIFBoxParameters, SurrogateMethod};

use crate::error::CliResult;

/// List the surrogate gradient methods
#[derive(Args, Debug)]
pub struct MethodsCommand {
    /// Also print the surrogate derivative at the threshold, once per
    /// distinct alpha when alpha is per-neuron
    #[arg(short, long)]
    pub detailed: bool,
}

impl MethodsCommand {
    pub fn execute(self, p: &LIFBoxParameters) -> CliResult<()> {
        let alphas = distinct_alphas(p);

        for method in SurrogateMethod::ALL {
            let mut line = method.name().to_string();
            if method == p.method {
                line.push_str(" (selected)");
            }
            if self.detailed {
                line.push('\t');
                line.push_str(&slopes_at_threshold(method, &alphas));
            }
            println!("{}", line);
        }
        Ok(())
    }
}

fn distinct_alphas(p: &LIFBoxParameters) -> Vec<Float> {
    let mut alphas: Vec<Float> = Vec::new();
    for &alpha in p.alpha.iter() {
        if !alphas.contains(&alpha) {
            alphas.push(alpha);
        }
    }
    alphas
}

fn slopes_at_threshold(method: SurrogateMethod, alphas: &[Float]) -> String {
    match alphas {
        [alpha] => format!("d(0) = {}", method.derivative(0.0, *alpha)),
        _ => alphas
            .iter()
            .map(|&alpha| format!("d(0) = {} (alpha {})", method.derivative(0.0, alpha), alpha))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
