//! Document synchronization handlers.

use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tracing::{info, warn};

use crate::state::ServerState;

use super::diagnostics::publish_diagnostics;
use super::lsp_utils::position_to_offset;

pub async fn did_open(client: &Client, state: &ServerState, params: DidOpenTextDocumentParams) {
    let uri = params.text_document.uri;
    let version = params.text_document.version;
    let content = params.text_document.text;

    info!("Document opened: {}", uri);
    state.open_document(uri.clone(), version, content);
    if let Some(doc) = state.get_document(&uri) {
        publish_diagnostics(client, state, &doc).await;
    }
}

pub async fn did_change(client: &Client, state: &ServerState, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;
    let version = params.text_document.version;

    if params.content_changes.is_empty() {
        return;
    }

    let Some(doc) = state.get_document(&uri) else {
        warn!("Received change for unknown document: {}", uri);
        return;
    };

    let Some(updated) = apply_content_changes(&doc.content, &params.content_changes) else {
        warn!("Failed to apply incremental changes for {}", uri);
        return;
    };

    state.update_document(&uri, version, updated);
    if let Some(doc) = state.get_document(&uri) {
        publish_diagnostics(client, state, &doc).await;
    }
}

fn apply_content_changes(
    content: &str,
    changes: &[TextDocumentContentChangeEvent],
) -> Option<String> {
    let mut updated = content.to_string();
    for change in changes {
        if let Some(range) = change.range {
            let start = usize::from(position_to_offset(&updated, range.start)?);
            let end = usize::from(position_to_offset(&updated, range.end)?);
            if start > end || end > updated.len() {
                return None;
            }
            updated.replace_range(start..end, &change.text);
        } else {
            updated = change.text.clone();
        }
    }
    Some(updated)
}

pub async fn did_save(client: &Client, state: &ServerState, params: DidSaveTextDocumentParams) {
    let uri = params.text_document.uri;
    info!("Document saved: {}", uri);

    if let Some(doc) = state.get_document(&uri) {
        publish_diagnostics(client, state, &doc).await;
    }
}

pub async fn did_close(client: &Client, state: &ServerState, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    info!("Document closed: {}", uri);

    state.close_document(&uri);
    client.publish_diagnostics(uri, vec![], None).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(range: Option<Range>, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range,
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn apply_content_changes_inserts_text() {
        let original = "http {\n}\n";
        let insert = change(
            Some(Range::new(Position::new(1, 0), Position::new(1, 0))),
            "    gzip on;\n",
        );
        let updated = apply_content_changes(original, &[insert]).expect("apply change");
        assert_eq!(updated, "http {\n    gzip on;\n}\n");
    }

    #[test]
    fn apply_content_changes_replaces_range() {
        let original = "worker_processes 1;\n";
        let replace = change(
            Some(Range::new(Position::new(0, 17), Position::new(0, 18))),
            "auto",
        );
        let updated = apply_content_changes(original, &[replace]).expect("apply change");
        assert_eq!(updated, "worker_processes auto;\n");
    }

    #[test]
    fn apply_content_changes_full_sync() {
        let updated =
            apply_content_changes("user a;\n", &[change(None, "user b;\n")]).expect("apply");
        assert_eq!(updated, "user b;\n");
    }

    #[test]
    fn apply_content_changes_rejects_missing_lines() {
        let bad = change(
            Some(Range::new(Position::new(4, 0), Position::new(4, 1))),
            "x",
        );
        assert!(apply_content_changes("user a;\n", &[bad]).is_none());
    }
}
