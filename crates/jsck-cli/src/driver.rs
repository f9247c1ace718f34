//! Loads a project, runs the variable check and collects its diagnostics.

use anyhow::{Context, Result, bail};
use jsck_binder::{Compiler, CompilerPass, ModuleId};
use jsck_checker::{VarCheck, diagnostics};
use jsck_common::{Diagnostic, DiagnosticCategory, WarningLevels};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span};

use crate::args::CliArgs;
use crate::config::{ModuleConfig, Project, ProjectConfig, find_project, load_project};

#[derive(Debug)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Files read, in the order they were added
    pub files_read: Vec<PathBuf>,
    /// Source text by diagnostic file name, for rendering snippets
    pub sources: FxHashMap<String, String>,
    /// Names given placeholder declarations
    pub synthesized: Vec<String>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Resolve the project for `args`: an explicit `--project`, loose files, or
/// `jsck.json` in `cwd`.
pub fn resolve_project(args: &CliArgs, cwd: &Path) -> Result<Project> {
    if let Some(path) = &args.project {
        return load_project(&cwd.join(path));
    }

    if !args.files.is_empty() {
        let files = args
            .files
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        let config = ProjectConfig {
            modules: vec![ModuleConfig {
                name: String::new(),
                deps: Vec::new(),
                files,
            }],
            ..ProjectConfig::default()
        };
        return Ok(Project {
            config,
            base_dir: cwd.to_path_buf(),
        });
    }

    match find_project(cwd) {
        Some(path) => load_project(&path),
        None => bail!(
            "no input files and no jsck.json found in {}",
            cwd.display()
        ),
    }
}

/// Project warning levels with command-line overrides applied on top.
/// Every key must name a diagnostic the check can report.
pub fn warning_levels(args: &CliArgs, project: &ProjectConfig) -> Result<WarningLevels> {
    let mut levels = project.options.warning_levels.clone();
    let overrides = [
        (&args.jscomp_error, DiagnosticCategory::Error),
        (&args.jscomp_warning, DiagnosticCategory::Warning),
        (&args.jscomp_off, DiagnosticCategory::Disabled),
    ];
    for (keys, category) in overrides {
        for key in keys {
            levels.set(key.clone(), category);
        }
    }

    for (key, category) in levels.iter() {
        if diagnostics::lookup(key).is_none() {
            bail!("unknown diagnostic key '{key}'");
        }
        debug!(key, %category, "warning level");
    }
    Ok(levels)
}

/// Build the compiler for `project`: modules, dependencies, externs and sources.
pub fn build_compiler(
    project: &Project,
    levels: WarningLevels,
    extra_externs: &[PathBuf],
    files_read: &mut Vec<PathBuf>,
) -> Result<Compiler> {
    let config = &project.config;
    let mut compiler = Compiler::with_warning_levels(levels);

    // Loose files live outside any module
    let mut module_ids: FxHashMap<&str, Option<ModuleId>> = FxHashMap::default();
    for module in &config.modules {
        let id = (!module.name.is_empty()).then(|| compiler.module_graph.add_module(&module.name));
        module_ids.insert(module.name.as_str(), id);
    }
    for module in &config.modules {
        let Some(Some(from)) = module_ids.get(module.name.as_str()).copied() else {
            continue;
        };
        for dep in &module.deps {
            if let Some(Some(to)) = module_ids.get(dep.as_str()).copied() {
                compiler.module_graph.add_dependency(from, to);
            }
        }
    }

    let cycles = compiler.module_graph.detect_circular_dependencies();
    if let Some(cycle) = cycles.first() {
        bail!("circular module dependency: {}", cycle.names.join(" -> "));
    }

    let externs = config
        .externs
        .iter()
        .map(|path| project.resolve(path))
        .chain(extra_externs.iter().cloned());
    for path in externs {
        let source = read_source(&path)?;
        let name = path.display().to_string();
        compiler
            .add_extern(&name, &source)
            .with_context(|| format!("failed to parse externs: {name}"))?;
        files_read.push(path);
    }

    for module in &config.modules {
        let id = module_ids.get(module.name.as_str()).copied().flatten();
        for file in &module.files {
            let path = project.resolve(file);
            let source = read_source(&path)?;
            let name = path.display().to_string();
            compiler
                .add_source(&name, &source, id)
                .with_context(|| format!("failed to parse: {name}"))?;
            files_read.push(path);
        }
    }

    Ok(compiler)
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read: {}", path.display()))
}

/// Run the check described by `args` relative to `cwd`.
pub fn check(args: &CliArgs, cwd: &Path) -> Result<CheckResult> {
    let _span = span!(Level::DEBUG, "check", cwd = %cwd.display()).entered();

    let project = resolve_project(args, cwd)?;
    let levels = warning_levels(args, &project.config)?;
    let sanity_check = args.sanity_check || project.config.options.sanity_check.unwrap_or(false);
    let mut files_read = Vec::new();
    let mut compiler = build_compiler(&project, levels, &args.externs, &mut files_read)?;

    let externs = compiler.externs_root();
    let root = compiler.main_root();
    let mut pass = VarCheck::new(sanity_check);
    pass.process(&mut compiler, externs, root)
        .context("variable check aborted")?;

    let synthesized = pass
        .synthetic_externs()
        .map(|synthetic| {
            synthetic
                .declared_names(&compiler)
                .into_iter()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let sources = compiler
        .inputs
        .iter()
        .filter_map(|input| Some((input.name.clone(), input.source.clone()?)))
        .collect();

    debug!(
        files = files_read.len(),
        diagnostics = compiler.diagnostics.len(),
        "check finished"
    );
    Ok(CheckResult {
        diagnostics: compiler.diagnostics.into_vec(),
        files_read,
        sources,
        synthesized,
    })
}
