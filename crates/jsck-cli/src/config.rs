//! `jsck.json` project files.
//!
//! ```json
//! {
//!   "externs": ["externs/browser.js"],
//!   "modules": [
//!     { "name": "base", "files": ["src/base.js"] },
//!     { "name": "app", "deps": ["base"], "files": ["src/app.js"] }
//!   ],
//!   "options": {
//!     "sanityCheck": false,
//!     "warningLevels": { "JSC_STRICT_MODULE_DEPENDENCY": "warning" }
//!   }
//! }
//! ```
//!
//! Paths are relative to the directory holding the project file.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use jsck_common::WarningLevels;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE_NAME: &str = "jsck.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub externs: Vec<String>,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
    #[serde(default)]
    pub options: CheckOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub name: String,
    /// Names of modules this module depends on
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckOptions {
    #[serde(default)]
    pub sanity_check: Option<bool>,
    #[serde(default)]
    pub warning_levels: WarningLevels,
}

/// A loaded project: its configuration and the directory paths resolve from.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
    pub base_dir: PathBuf,
}

impl Project {
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

pub fn parse_project(source: &str) -> Result<ProjectConfig> {
    let config: ProjectConfig = serde_json::from_str(source)?;
    validate_modules(&config.modules)?;
    Ok(config)
}

/// Load a project from a `jsck.json` path or a directory containing one.
pub fn load_project(path: &Path) -> Result<Project> {
    let file = if path.is_dir() {
        path.join(PROJECT_FILE_NAME)
    } else {
        path.to_path_buf()
    };

    let source = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read project: {}", file.display()))?;
    let config = parse_project(&source)
        .with_context(|| format!("failed to parse project: {}", file.display()))?;
    let base_dir = file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    Ok(Project { config, base_dir })
}

/// Find `jsck.json` in `cwd`.
pub fn find_project(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(PROJECT_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Module names must be unique and every dependency must name a module.
fn validate_modules(modules: &[ModuleConfig]) -> Result<()> {
    let mut by_name: IndexMap<&str, &ModuleConfig> = IndexMap::new();
    for module in modules {
        if module.name.is_empty() {
            bail!("module names must not be empty");
        }
        if by_name.insert(module.name.as_str(), module).is_some() {
            bail!("duplicate module '{}'", module.name);
        }
    }

    for module in by_name.values() {
        for dep in &module.deps {
            if !by_name.contains_key(dep.as_str()) {
                bail!(
                    "module '{}' depends on unknown module '{}'",
                    module.name,
                    dep
                );
            }
        }
    }
    Ok(())
}
