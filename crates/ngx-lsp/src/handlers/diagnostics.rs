//! Diagnostics publishing helpers.

use ngx_ide::{collect_diagnostics_with, DiagnosticOptions};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Url};
use tower_lsp::Client;

use crate::state::{Document, ServerState};

use super::lsp_utils::range_to_lsp;

pub(crate) async fn publish_diagnostics(client: &Client, state: &ServerState, doc: &Document) {
    let diagnostics = collect_lsp_diagnostics(state, &doc.uri, &doc.content);
    client
        .publish_diagnostics(doc.uri.clone(), diagnostics, Some(doc.version))
        .await;
}

pub(crate) fn collect_lsp_diagnostics(
    state: &ServerState,
    uri: &Url,
    content: &str,
) -> Vec<Diagnostic> {
    let options = state
        .workspace_config_for_uri(uri)
        .map(|config| config.diagnostics)
        .unwrap_or_default();
    diagnostics_for(state, content, &options)
}

fn diagnostics_for(
    state: &ServerState,
    content: &str,
    options: &DiagnosticOptions,
) -> Vec<Diagnostic> {
    let catalog = state.catalog();
    collect_diagnostics_with(&catalog, content, options)
        .iter()
        .map(|diag| to_lsp(content, diag))
        .collect()
}

fn to_lsp(content: &str, diag: &ngx_ide::Diagnostic) -> Diagnostic {
    let severity = match diag.severity {
        ngx_ide::DiagnosticSeverity::Error => DiagnosticSeverity::ERROR,
        ngx_ide::DiagnosticSeverity::Warning => DiagnosticSeverity::WARNING,
    };
    Diagnostic {
        range: range_to_lsp(content, diag.range),
        severity: Some(severity),
        code: Some(NumberOrString::String(diag.code.code().to_string())),
        source: Some("ngx-lsp".to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}
