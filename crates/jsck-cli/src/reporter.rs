use anyhow::Result;
use colored::Colorize;
use jsck_common::{Diagnostic, DiagnosticCategory, LineMap};
use rustc_hash::FxHashMap;
use std::path::Path;

pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    /// Register the text of `file` so it is not re-read from disk.
    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(file.into(), text.into());
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    /// `N error(s), M warning(s)` line printed after the diagnostics.
    pub fn render_summary(&self, diagnostics: &[Diagnostic]) -> String {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
        let summary = format!("{errors} error(s), {warnings} warning(s)");
        if self.color && errors > 0 {
            summary.red().to_string()
        } else if self.color && warnings > 0 {
            summary.yellow().to_string()
        } else {
            summary
        }
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let location = self.format_location(&diagnostic.file, diagnostic.start);
        let category = self.format_category(diagnostic.category);
        let key = self.format_key(&diagnostic.key);

        let mut output = String::new();
        if let Some(location) = location {
            output.push_str(&location);
        } else if !diagnostic.file.is_empty() {
            output.push_str(&diagnostic.file);
        } else {
            output.push_str("<unknown>");
        }

        output.push_str(" - ");
        output.push_str(&category);
        output.push(' ');
        output.push_str(&key);
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }

        output
    }

    /// Source line with the diagnostic span underlined.
    /// Example:
    ///     2   var a = missing;
    ///                 ~~~~~~~
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;
        let line_text = line_map.line_text(line_num - 1, source)?;

        let first = column - 1;
        let underline: String = line_text
            .chars()
            .enumerate()
            .take_while(|&(i, _)| (i as u32) < first + length)
            .map(|(i, ch)| {
                if i as u32 >= first {
                    '~'
                } else if ch == '\t' {
                    '\t'
                } else {
                    ' '
                }
            })
            .collect();
        let underline = if underline.trim().is_empty() {
            format!("{underline}~")
        } else {
            underline
        };

        let underline_display = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!(
            "\n  {line_num:>3}   {line_text}\n        {underline_display}"
        ))
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }

        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{file}:{line}:{column}"))
    }

    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        if !self.line_maps.contains_key(file) {
            let source = self.sources.get(file)?;
            let map = LineMap::build(source);
            self.line_maps.insert(file.to_string(), map);
        }

        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;
        let position = line_map.offset_to_position(offset, source);
        Some((position.line + 1, position.character + 1))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.name();
        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Disabled => label.dimmed().to_string(),
        }
    }

    fn format_key(&self, key: &str) -> String {
        if self.color {
            key.bright_blue().to_string()
        } else {
            key.to_string()
        }
    }
}

/// Diagnostics as a pretty-printed JSON array.
pub fn render_json(diagnostics: &[Diagnostic]) -> Result<String> {
    Ok(serde_json::to_string_pretty(diagnostics)?)
}
