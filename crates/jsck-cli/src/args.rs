use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the jsck binary.
#[derive(Parser, Debug)]
#[command(
    name = "jsck",
    version,
    about = "Checks JavaScript variable references and module dependencies"
)]
pub struct CliArgs {
    /// Path to jsck.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Externs file; may be repeated. Added to the project's externs.
    #[arg(long = "externs")]
    pub externs: Vec<PathBuf>,

    /// Treat undefined variables as internal errors instead of repairing them.
    #[arg(long = "sanity-check")]
    pub sanity_check: bool,

    /// Report the diagnostic with this key as an error.
    #[arg(long = "jscomp-error", value_name = "KEY")]
    pub jscomp_error: Vec<String>,

    /// Report the diagnostic with this key as a warning.
    #[arg(long = "jscomp-warning", value_name = "KEY")]
    pub jscomp_warning: Vec<String>,

    /// Do not report the diagnostic with this key.
    #[arg(long = "jscomp-off", value_name = "KEY")]
    pub jscomp_off: Vec<String>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable color and source snippets. Defaults to whether stderr is a terminal.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub pretty: Option<bool>,

    /// Source files checked without a project, each outside any module.
    pub files: Vec<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels_and_files() {
        let args = CliArgs::parse_from([
            "jsck",
            "--jscomp-error",
            "JSC_MISSING_MODULE_DEPENDENCY",
            "--jscomp-warning",
            "JSC_STRICT_MODULE_DEPENDENCY",
            "--jscomp-off",
            "JSC_NAME_REFERENCE_IN_EXTERNS",
            "--externs",
            "externs.js",
            "a.js",
            "b.js",
        ]);

        assert_eq!(args.jscomp_error, vec!["JSC_MISSING_MODULE_DEPENDENCY"]);
        assert_eq!(args.jscomp_warning, vec!["JSC_STRICT_MODULE_DEPENDENCY"]);
        assert_eq!(args.jscomp_off, vec!["JSC_NAME_REFERENCE_IN_EXTERNS"]);
        assert_eq!(args.externs, vec![PathBuf::from("externs.js")]);
        assert_eq!(args.files, vec![PathBuf::from("a.js"), PathBuf::from("b.js")]);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.sanity_check);
    }

    #[test]
    fn test_parse_project_format_and_pretty() {
        let args = CliArgs::parse_from([
            "jsck",
            "-p",
            "app",
            "--format",
            "json",
            "--pretty",
            "--sanity-check",
        ]);

        assert_eq!(args.project, Some(PathBuf::from("app")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.pretty, Some(true));
        assert!(args.sanity_check);
    }
}
