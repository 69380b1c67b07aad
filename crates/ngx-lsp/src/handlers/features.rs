//! Hover, completion and folding requests.

use tower_lsp::lsp_types::*;

use crate::state::ServerState;

use super::lsp_utils::{offset_to_position, position_to_offset, range_to_lsp};

pub fn hover(state: &ServerState, params: HoverParams) -> Option<Hover> {
    let uri = &params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let doc = state.get_document(uri)?;
    let offset = position_to_offset(&doc.content, position)?;
    let catalog = state.catalog();
    let result = ngx_ide::hover(&catalog, &doc.content, offset)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: result.contents,
        }),
        range: result.range.map(|range| range_to_lsp(&doc.content, range)),
    })
}

pub fn completion(state: &ServerState, params: CompletionParams) -> Option<CompletionResponse> {
    let uri = &params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let doc = state.get_document(uri)?;
    let offset = position_to_offset(&doc.content, position)?;
    let catalog = state.catalog();
    let items = ngx_ide::complete(&catalog, &doc.content, offset);
    if items.is_empty() {
        return None;
    }

    let lsp_items = items
        .into_iter()
        .map(|item| {
            let kind = match item.kind {
                ngx_ide::CompletionKind::Directive => CompletionItemKind::KEYWORD,
                ngx_ide::CompletionKind::Block => CompletionItemKind::MODULE,
            };
            let text_edit = item.text_edit.as_ref().map(|edit| {
                CompletionTextEdit::Edit(TextEdit {
                    range: range_to_lsp(&doc.content, edit.range),
                    new_text: edit.new_text.to_string(),
                })
            });
            CompletionItem {
                label: item.label.to_string(),
                kind: Some(kind),
                detail: item.detail.map(|s| s.to_string()),
                documentation: item.documentation.map(|value| {
                    Documentation::MarkupContent(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value,
                    })
                }),
                sort_text: Some(format!("{:05}", item.sort_priority)),
                text_edit,
                ..Default::default()
            }
        })
        .collect();

    Some(CompletionResponse::Array(lsp_items))
}

pub fn folding_range(state: &ServerState, params: FoldingRangeParams) -> Option<Vec<FoldingRange>> {
    let uri = &params.text_document.uri;
    let doc = state.get_document(uri)?;
    Some(lsp_folding_ranges(&doc.content))
}

fn lsp_folding_ranges(content: &str) -> Vec<FoldingRange> {
    let mut ranges = Vec::new();
    for folding in ngx_ide::folding_ranges(content) {
        let start_line = offset_to_position(content, folding.range.start()).line;
        let end_line = offset_to_position(content, folding.range.end()).line;
        if end_line <= start_line {
            continue;
        }
        let kind = match folding.kind {
            ngx_ide::FoldingKind::Block => FoldingRangeKind::Region,
            ngx_ide::FoldingKind::Comment => FoldingRangeKind::Comment,
        };
        ranges.push(FoldingRange {
            start_line,
            start_character: None,
            end_line,
            end_character: None,
            kind: Some(kind),
            collapsed_text: None,
        });
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(state: &ServerState, content: &str) -> Url {
        let uri = Url::parse("file:///etc/nginx/nginx.conf").expect("uri");
        state.open_document(uri.clone(), 1, content.to_string());
        uri
    }

    fn position_params(uri: Url, line: u32, character: u32) -> TextDocumentPositionParams {
        TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri },
            position: Position::new(line, character),
        }
    }

    #[test]
    fn hover_returns_markdown_for_directive_names() {
        let state = ServerState::new();
        let uri = open(&state, "http {\n    gzip on;\n}\n");
        let result = hover(
            &state,
            HoverParams {
                text_document_position_params: position_params(uri, 1, 6),
                work_done_progress_params: WorkDoneProgressParams::default(),
            },
        )
        .expect("hover");
        let HoverContents::Markup(markup) = result.contents else {
            panic!("expected markup");
        };
        assert!(markup.value.starts_with("**gzip**"));
        assert_eq!(
            result.range,
            Some(Range::new(Position::new(1, 4), Position::new(1, 8)))
        );
    }

    #[test]
    fn completion_maps_kinds_and_edits() {
        let state = ServerState::new();
        let uri = open(&state, "http {\n    serv\n}\n");
        let response = completion(
            &state,
            CompletionParams {
                text_document_position: position_params(uri, 1, 8),
                work_done_progress_params: WorkDoneProgressParams::default(),
                partial_result_params: PartialResultParams::default(),
                context: None,
            },
        )
        .expect("completion");
        let CompletionResponse::Array(items) = response else {
            panic!("expected array");
        };
        let server = items
            .iter()
            .find(|item| item.label == "server")
            .expect("server item");
        assert_eq!(server.kind, Some(CompletionItemKind::MODULE));
        let Some(CompletionTextEdit::Edit(edit)) = &server.text_edit else {
            panic!("expected edit");
        };
        assert_eq!(
            edit.range,
            Range::new(Position::new(1, 4), Position::new(1, 8))
        );
    }

    #[test]
    fn folding_uses_lines() {
        let ranges = lsp_folding_ranges("http {\n    server { listen 80; }\n}\n");
        assert_eq!(ranges.len(), 1);
        assert_eq!((ranges[0].start_line, ranges[0].end_line), (0, 2));
        assert_eq!(ranges[0].kind, Some(FoldingRangeKind::Region));
    }
}
