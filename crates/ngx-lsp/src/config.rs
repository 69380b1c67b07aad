//! Workspace/project configuration for ngx-lsp.

use ngx_catalog::{builtin_arc, Catalog, CatalogBuilder};
use ngx_ide::{DiagnosticOptions, FormatOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) const CONFIG_FILES: &[&str] = &["ngx-lsp.toml", ".ngx-lsp.toml"];

/// Project configuration loaded from `ngx-lsp.toml`.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Root directory for the workspace.
    pub root: PathBuf,
    /// Config file path (if found).
    pub config_path: Option<PathBuf>,
    /// Extra catalog module files, in load order.
    pub catalog_paths: Vec<PathBuf>,
    /// Which directive checks run.
    pub diagnostics: DiagnosticOptions,
    /// Formatter settings set explicitly in the file.
    pub formatting: FormattingOverrides,
}

/// Formatter settings that override the editor's own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingOverrides {
    pub indent_width: Option<usize>,
    pub use_tabs: Option<bool>,
    pub max_blank_lines: Option<usize>,
}

impl FormattingOverrides {
    pub fn apply(&self, options: &mut FormatOptions) {
        if let Some(width) = self.indent_width {
            options.indent_width = width.max(1);
        }
        if let Some(use_tabs) = self.use_tabs {
            options.insert_spaces = !use_tabs;
        }
        if let Some(max) = self.max_blank_lines {
            options.max_blank_lines = max;
        }
    }
}

impl ProjectConfig {
    /// Load configuration for a workspace root.
    pub fn load(root: &Path) -> Self {
        let config_path = find_config_file(root);
        let Some(path) = config_path.clone() else {
            return ProjectConfig::base(root, None);
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            warn!("Failed to read ngx-lsp config at {}", path.display());
            return ProjectConfig::base(root, config_path);
        };
        ProjectConfig::from_contents(root, config_path, &contents)
    }

    pub fn from_contents(root: &Path, config_path: Option<PathBuf>, contents: &str) -> Self {
        let mut config = ProjectConfig::base(root, config_path);
        let parsed: ConfigFile = match toml::from_str(contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                if let Some(path) = &config.config_path {
                    warn!(
                        "Failed to parse ngx-lsp config at {}: {err}",
                        path.display()
                    );
                } else {
                    warn!("Failed to parse ngx-lsp config: {err}");
                }
                return config;
            }
        };

        config.catalog_paths = expand_patterns(root, &parsed.catalog.paths);
        config.diagnostics = DiagnosticOptions {
            unknown_directive: parsed.diagnostics.unknown_directive.unwrap_or(true),
            context: parsed.diagnostics.context.unwrap_or(true),
            arguments: parsed.diagnostics.arguments.unwrap_or(true),
        };
        config.formatting = FormattingOverrides {
            indent_width: parsed.formatting.indent_width,
            use_tabs: parsed.formatting.use_tabs,
            max_blank_lines: parsed.formatting.max_blank_lines,
        };
        config
    }

    fn base(root: &Path, config_path: Option<PathBuf>) -> Self {
        Self {
            root: root.to_path_buf(),
            config_path,
            catalog_paths: Vec::new(),
            diagnostics: DiagnosticOptions::default(),
            formatting: FormattingOverrides::default(),
        }
    }

    /// Formatter settings with the file's overrides applied on top of the
    /// defaults.
    #[must_use]
    pub fn format_options(&self) -> FormatOptions {
        let mut options = FormatOptions::default();
        self.formatting.apply(&mut options);
        options
    }
}

/// Builds the catalog for a set of projects: the built-in modules plus every
/// project's extra module files.
///
/// Unreadable files are skipped. If the combined catalog is rejected, the
/// error is logged and the built-in catalog is used instead.
pub fn build_catalog<'a>(configs: impl IntoIterator<Item = &'a ProjectConfig>) -> Arc<Catalog> {
    let mut builder = CatalogBuilder::new().with_builtin_sources();
    let builtin_count = builder.source_count();

    for config in configs {
        for path in &config.catalog_paths {
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    builder.add_source(path.display().to_string(), text);
                }
                Err(err) => warn!("Failed to read catalog file {}: {err}", path.display()),
            }
        }
    }

    if builder.source_count() == builtin_count {
        return builtin_arc();
    }
    let extra = builder.source_count() - builtin_count;
    match builder.build() {
        Ok(catalog) => {
            info!(
                "Loaded {extra} extra catalog module(s), {} directives in total",
                catalog.len()
            );
            Arc::new(catalog)
        }
        Err(err) => {
            warn!("Rejected project catalog, using the built-in one: {err}");
            builtin_arc()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    catalog: CatalogSection,
    #[serde(default)]
    diagnostics: DiagnosticSection,
    #[serde(default)]
    formatting: FormattingSection,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogSection {
    #[serde(default)]
    paths: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DiagnosticSection {
    unknown_directive: Option<bool>,
    context: Option<bool>,
    arguments: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FormattingSection {
    indent_width: Option<usize>,
    use_tabs: Option<bool>,
    max_blank_lines: Option<usize>,
}

pub(crate) fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Expands glob patterns relative to `root`. Matches of one pattern are
/// sorted; patterns keep their order.
fn expand_patterns(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let full = resolve_path(root, pattern);
        let entries = match glob::glob(&full.to_string_lossy()) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Invalid catalog pattern '{pattern}': {err}");
                continue;
            }
        };
        let mut matched: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
        matched.sort();
        if matched.is_empty() {
            debug!("Catalog pattern '{pattern}' matched no files");
        }
        for path in matched {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

fn resolve_path(root: &Path, entry: &str) -> PathBuf {
    let path = PathBuf::from(entry);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "ngx-lsp-config-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).expect("create temp root");
        root
    }

    #[test]
    fn defaults_without_file() {
        let root = temp_root("defaults");
        let config = ProjectConfig::load(&root);
        assert!(config.config_path.is_none());
        assert!(config.catalog_paths.is_empty());
        assert_eq!(config.diagnostics, DiagnosticOptions::default());
        assert_eq!(config.format_options(), FormatOptions::default());
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn parses_all_sections() {
        let root = temp_root("sections");
        std::fs::create_dir_all(root.join("catalog")).expect("create catalog dir");
        std::fs::write(root.join("catalog/b.toml"), "").expect("write b");
        std::fs::write(root.join("catalog/a.toml"), "").expect("write a");

        let config = ProjectConfig::from_contents(
            &root,
            None,
            r#"
[catalog]
paths = ["catalog/*.toml"]

[diagnostics]
unknown_directive = false

[formatting]
indent_width = 2
use_tabs = true
"#,
        );
        assert_eq!(
            config.catalog_paths,
            vec![root.join("catalog/a.toml"), root.join("catalog/b.toml")]
        );
        assert!(!config.diagnostics.unknown_directive);
        assert!(config.diagnostics.context);
        let options = config.format_options();
        assert_eq!(options.indent_width, 2);
        assert!(!options.insert_spaces);
        assert_eq!(options.max_blank_lines, 1);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let root = temp_root("invalid");
        let config = ProjectConfig::from_contents(&root, None, "[catalog\npaths = 1");
        assert!(config.catalog_paths.is_empty());
        assert_eq!(config.diagnostics, DiagnosticOptions::default());
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn extra_modules_extend_the_catalog() {
        let root = temp_root("extra");
        std::fs::write(
            root.join("acme.toml"),
            r#"
[module]
name = "ngx_http_acme_module"
imports = ["ngx_http_core_module"]

[[directive]]
name = "acme_certificate"
context = ["server"]

[[directive.parameter]]
name = "issuer"
"#,
        )
        .expect("write module");
        let config = ProjectConfig::from_contents(&root, None, "[catalog]\npaths = [\"*.toml\"]\n");
        let catalog = build_catalog([&config]);
        assert_eq!(catalog.resolve("acme_certificate", &["http", "server"]).len(), 1);
        assert!(catalog.contains("listen"));
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn rejected_modules_fall_back_to_builtin() {
        let root = temp_root("rejected");
        std::fs::write(
            root.join("bad.toml"),
            "[module]\nname = \"bad\"\n\n[[directive]]\nname = \"x\"\ncontext = [\"nowhere\"]\n",
        )
        .expect("write module");
        let config = ProjectConfig::from_contents(&root, None, "[catalog]\npaths = [\"bad.toml\"]\n");
        let catalog = build_catalog([&config]);
        assert!(!catalog.contains("x"));
        assert!(Arc::ptr_eq(&catalog, &builtin_arc()));
        let _ = std::fs::remove_dir_all(root);
    }
}
