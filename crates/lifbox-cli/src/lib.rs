//! lifbox CLI crate
//!
//! Purpose:
//! - Drive boxed LIF neurons from the command line: integrate one step, run a
//!   population under constant input, list surrogate gradients, and dump the
//!   effective parameters.
//!
//! Parameters come from the defaults, then an optional TOML parameter file
//! (see [config]), then the `--method`/`--alpha` overrides.
//!
//! The binary (src/main.rs) wires up logging and argument parsing, calling
//! [`LifboxCli::execute`]. Logs go to stderr so traces on stdout stay
//! machine readable.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::LifboxCli;
