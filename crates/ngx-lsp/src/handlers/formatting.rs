//! Document formatting handler.

use ngx_ide::{format_document, FormatOptions};
use serde_json::Value;
use tower_lsp::lsp_types::{DocumentFormattingParams, FormattingOptions, Position, Range, TextEdit, Url};

use crate::state::ServerState;

use super::lsp_utils::offset_to_position;

/// Editor options first, then the project file, then client settings.
fn format_options(state: &ServerState, uri: &Url, options: &FormattingOptions) -> FormatOptions {
    let mut config = FormatOptions {
        indent_width: (options.tab_size as usize).max(1),
        insert_spaces: options.insert_spaces,
        ..FormatOptions::default()
    };

    if let Some(workspace_config) = state.workspace_config_for_uri(uri) {
        workspace_config.formatting.apply(&mut config);
    }

    apply_client_settings(&state.config(), &mut config);
    config
}

fn apply_client_settings(value: &Value, config: &mut FormatOptions) {
    let Some(format) = config_section(value).and_then(|v| v.get("formatting")) else {
        return;
    };
    if let Some(width) = format.get("indentWidth").and_then(Value::as_u64) {
        config.indent_width = usize::try_from(width).unwrap_or(usize::MAX).max(1);
    }
    if let Some(insert) = format.get("insertSpaces").and_then(Value::as_bool) {
        config.insert_spaces = insert;
    }
    if let Some(tabs) = format.get("useTabs").and_then(Value::as_bool) {
        config.insert_spaces = !tabs;
    }
    if let Some(max) = format.get("maxBlankLines").and_then(Value::as_u64) {
        config.max_blank_lines = usize::try_from(max).unwrap_or(usize::MAX);
    }
}

fn config_section(value: &Value) -> Option<&Value> {
    value.get("nginx").or_else(|| value.get("ngx-lsp"))
}

pub fn formatting(state: &ServerState, params: DocumentFormattingParams) -> Option<Vec<TextEdit>> {
    let uri = &params.text_document.uri;
    let doc = state.get_document(uri)?;
    let config = format_options(state, uri, &params.options);
    let formatted = format_document(&doc.content, &config);
    if formatted == doc.content {
        return Some(Vec::new());
    }

    let end = offset_to_position(&doc.content, doc.content.len().try_into().ok()?);
    Some(vec![TextEdit {
        range: Range {
            start: Position::new(0, 0),
            end,
        },
        new_text: formatted,
    }])
}
