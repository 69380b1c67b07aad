//! LSP workspace/executeCommand handlers.

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_lsp::lsp_types::{
    ExecuteCommandParams, Position, Range, TextDocumentIdentifier, TextEdit, WorkspaceEdit,
};
use tower_lsp::Client;

use ngx_ide::smart_enter_with;

use crate::handlers::lsp_utils::{offset_to_position, position_to_offset};
use crate::state::ServerState;

pub const SMART_ENTER_COMMAND: &str = "nginx.smartEnter";

#[derive(Debug, Deserialize)]
pub struct SmartEnterCommandArgs {
    #[serde(alias = "textDocument")]
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

/// A smart-enter edit and where the caret goes once it is applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SmartEnterEdit {
    pub(crate) edit: WorkspaceEdit,
    pub(crate) caret: Position,
}

pub async fn execute_command(
    client: &Client,
    state: &ServerState,
    params: ExecuteCommandParams,
) -> Option<Value> {
    match params.command.as_str() {
        SMART_ENTER_COMMAND => {
            let args = parse_smart_enter_args(params.arguments)?;
            let SmartEnterEdit { edit, caret } = smart_enter_workspace_edit(state, &args)?;
            let response = client.apply_edit(edit).await.ok()?;
            Some(json!({ "applied": response.applied, "caret": caret }))
        }
        _ => None,
    }
}

fn parse_smart_enter_args(args: Vec<Value>) -> Option<SmartEnterCommandArgs> {
    if args.len() != 1 {
        return None;
    }
    serde_json::from_value(args.into_iter().next()?).ok()
}

pub(crate) fn smart_enter_workspace_edit(
    state: &ServerState,
    args: &SmartEnterCommandArgs,
) -> Option<SmartEnterEdit> {
    let uri = &args.text_document.uri;
    let doc = state.get_document(uri)?;
    let offset = position_to_offset(&doc.content, args.position)?;
    let options = state
        .workspace_config_for_uri(uri)
        .map(|config| config.format_options())
        .unwrap_or_default();
    let catalog = state.catalog();
    let result = smart_enter_with(&catalog, &doc.content, offset, &options)?;

    let at = offset_to_position(&doc.content, result.offset);
    let mut applied = doc.content.clone();
    applied.insert_str(usize::from(result.offset), &result.text);
    let caret = offset_to_position(&applied, result.caret);

    let mut changes = HashMap::new();
    changes.insert(
        uri.clone(),
        vec![TextEdit {
            range: Range { start: at, end: at },
            new_text: result.text,
        }],
    );
    Some(SmartEnterEdit {
        edit: WorkspaceEdit {
            changes: Some(changes),
            document_changes: None,
            change_annotations: None,
        },
        caret,
    })
}
