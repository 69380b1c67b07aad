//! Directive name completion.
//!
//! Completion is offered only where a directive name may start: at the
//! beginning of a statement or while the name itself is being typed. The
//! candidate set comes from the catalog, filtered by the context path at the
//! cursor.

use ngx_catalog::Catalog;
use ngx_syntax::parser::parse;
use ngx_syntax::syntax::SyntaxKind;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use crate::util::{
    in_raw_body, is_name_token, prefix_before, previous_significant_token, token_left_of,
};

/// The kind of completion item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// A simple directive terminated by `;`.
    Directive,
    /// A directive that opens a block.
    Block,
}

/// A completion item.
#[derive(Debug, Clone)]
pub struct CompletionItem {
    /// The label shown in the completion list.
    pub label: SmolStr,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Owning module names.
    pub detail: Option<SmolStr>,
    /// Documentation.
    pub documentation: Option<String>,
    /// Text edit to apply (replaces the typed prefix).
    pub text_edit: Option<CompletionTextEdit>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    /// Creates a new completion item.
    pub fn new(label: impl Into<SmolStr>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            text_edit: None,
            sort_priority: 100,
        }
    }

    /// Sets the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<SmolStr>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the documentation.
    #[must_use]
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Sets the text edit to apply.
    #[must_use]
    pub fn with_text_edit(mut self, edit: CompletionTextEdit) -> Self {
        self.text_edit = Some(edit);
        self
    }

    /// Sets the sort priority.
    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }
}

/// Text edit for completion items.
#[derive(Debug, Clone)]
pub struct CompletionTextEdit {
    /// The range to replace.
    pub range: TextRange,
    /// The new text to insert.
    pub new_text: SmolStr,
}

/// Computes completion items at `offset`.
///
/// Returns an empty list in argument positions, inside comments and
/// strings, and inside entries or Lua bodies.
pub fn complete(catalog: &Catalog, source: &str, offset: TextSize) -> Vec<CompletionItem> {
    let parsed = parse(source);
    let file = parsed.source_file();

    let (prefix, replace) = match token_left_of(&file, offset) {
        Some(token)
            if token.kind() == SyntaxKind::Word && token.text_range().end() >= offset =>
        {
            if !is_name_token(&token) {
                return Vec::new();
            }
            let range = TextRange::new(token.text_range().start(), offset);
            (prefix_before(&token, offset), range)
        }
        Some(token) if token.kind() == SyntaxKind::Comment => return Vec::new(),
        Some(token) if token.kind() == SyntaxKind::String && token.text_range().end() > offset => {
            return Vec::new();
        }
        _ => {
            let at_statement_start = previous_significant_token(&file, offset).is_none_or(|token| {
                matches!(
                    token.kind(),
                    SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace
                )
            });
            if !at_statement_start {
                return Vec::new();
            }
            (SmolStr::default(), TextRange::empty(offset))
        }
    };

    let enclosing = file.enclosing_directives_at(offset);
    if in_raw_body(catalog, &enclosing) {
        return Vec::new();
    }
    let path: Vec<SmolStr> = enclosing.iter().filter_map(|d| d.name()).collect();

    let mut modules: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    let mut order: Vec<&str> = Vec::new();
    for directive in catalog.candidates_for_context(&path) {
        if !directive.name().starts_with(prefix.as_str()) {
            continue;
        }
        let module = catalog.module_of(directive).name();
        let entry = modules.entry(directive.name()).or_insert_with(|| {
            order.push(directive.name());
            Vec::new()
        });
        if !entry.contains(&module) {
            entry.push(module);
        }
    }

    order
        .into_iter()
        .map(|name| {
            let kind = if catalog.has_container_overload(name) {
                CompletionKind::Block
            } else {
                CompletionKind::Directive
            };
            let mut item = CompletionItem::new(name, kind).with_text_edit(CompletionTextEdit {
                range: replace,
                new_text: SmolStr::new(name),
            });
            if let Some(owners) = modules.get(name) {
                item = item.with_detail(owners.join(", "));
            }
            if let Some(doc) = catalog
                .best_match(name, &path)
                .map(|directive| first_paragraph(directive.description()))
                .filter(|doc| !doc.is_empty())
            {
                item = item.with_documentation(doc);
            }
            if prefix.as_str() == name {
                item = item.with_priority(0);
            }
            item
        })
        .collect()
}

fn first_paragraph(text: &str) -> &str {
    text.split("\n\n").next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_paragraph_stops_at_blank_line() {
        assert_eq!(first_paragraph("Sets a value.\n\nMore text."), "Sets a value.");
        assert_eq!(first_paragraph("  single  "), "single");
        assert_eq!(first_paragraph(""), "");
    }
}
