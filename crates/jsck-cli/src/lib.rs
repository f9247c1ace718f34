//! Command-line driver for the jsck variable checker.
//!
//! - `args` - `clap` definition of the `jsck` command line
//! - `config` - `jsck.json` project files
//! - `driver` - Loads a project, runs the check and collects diagnostics
//! - `reporter` - Renders diagnostics for terminals and as JSON
//! - `tracing_config` - Opt-in `tracing` subscriber setup

pub mod args;
pub mod config;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
