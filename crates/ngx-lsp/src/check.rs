//! `ngx-lsp check`: diagnostics on the command line.

use anyhow::Context;
use ngx_ide::{collect_diagnostics_with, has_errors, offset_to_line_col, Diagnostic};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{build_catalog, ProjectConfig};

/// Checks every file and prints its diagnostics to stdout.
///
/// Returns `true` when at least one error-severity diagnostic was reported.
pub fn run(files: &[PathBuf], project: Option<PathBuf>) -> anyhow::Result<bool> {
    let root = match project {
        Some(root) => root,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let config = ProjectConfig::load(&root);
    let catalog = build_catalog([&config]);

    let mut failed = false;
    for path in files {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let diagnostics = collect_diagnostics_with(&catalog, &source, &config.diagnostics);
        debug!("{}: {} diagnostic(s)", path.display(), diagnostics.len());
        for diag in &diagnostics {
            println!("{}", render_diagnostic(path, &source, diag));
        }
        failed |= has_errors(&diagnostics);
    }
    Ok(failed)
}

/// Renders `path:line:col: severity[code]: message`, one-based.
pub(crate) fn render_diagnostic(path: &Path, source: &str, diag: &Diagnostic) -> String {
    let (line, col) = offset_to_line_col(source, diag.range.start());
    format!(
        "{}:{}:{}: {}[{}]: {}",
        path.display(),
        line + 1,
        col + 1,
        diag.severity.as_str(),
        diag.code.code(),
        diag.message
    )
}
