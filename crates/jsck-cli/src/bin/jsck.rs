#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use jsck_cli::args::{CliArgs, OutputFormat};
use jsck_cli::reporter::{Reporter, render_json};
use jsck_cli::{driver, tracing_config};

const EXIT_SUCCESS: i32 = 0;
/// At least one diagnostic was reported as an error.
const EXIT_DIAGNOSTIC_ERRORS: i32 = 2;

fn main() -> Result<()> {
    // Initialize tracing if JSCK_LOG or RUST_LOG is set (zero cost otherwise).
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let result = driver::check(&args, &cwd)?;

    match args.format {
        OutputFormat::Json => println!("{}", render_json(&result.diagnostics)?),
        OutputFormat::Text => {
            if !result.diagnostics.is_empty() {
                let pretty = args
                    .pretty
                    .unwrap_or_else(|| std::io::stderr().is_terminal());
                let mut reporter = Reporter::new(pretty);
                for (file, text) in &result.sources {
                    reporter.add_source(file.as_str(), text.as_str());
                }
                eprint!("{}", reporter.render(&result.diagnostics));
                eprintln!("{}", reporter.render_summary(&result.diagnostics));
            }
        }
    }

    if result.has_errors() {
        std::process::exit(EXIT_DIAGNOSTIC_ERRORS);
    }
    std::process::exit(EXIT_SUCCESS);
}
