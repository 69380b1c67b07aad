//! Statement completion on Enter.
//!
//! When the cursor sits on a line whose directive has not been closed yet,
//! the directive is finished for the user: block directives get a `{ }`
//! pair with the caret on an indented blank line, everything else gets `;`.

use ngx_catalog::Catalog;
use ngx_syntax::ast::{AstNode, Directive};
use ngx_syntax::parser::parse;
use ngx_syntax::syntax::{SyntaxKind, SyntaxToken};
use text_size::TextSize;

use crate::formatting::FormatOptions;
use crate::util::line_indent_at;

/// Text to insert and where to put the caret afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartEnter {
    /// Insertion point.
    pub offset: TextSize,
    /// Inserted text.
    pub text: String,
    /// Caret position in the edited document.
    pub caret: TextSize,
}

/// Completes the directive on the cursor's line with default indentation.
pub fn smart_enter(catalog: &Catalog, source: &str, offset: TextSize) -> Option<SmartEnter> {
    smart_enter_with(catalog, source, offset, &FormatOptions::default())
}

/// Completes the directive on the cursor's line.
///
/// Returns `None` when there is no directive on the line or it is already
/// terminated on that line.
pub fn smart_enter_with(
    catalog: &Catalog,
    source: &str,
    offset: TextSize,
    options: &FormatOptions,
) -> Option<SmartEnter> {
    let offset = offset.min(TextSize::of(source));
    let line_end = line_end(source, offset);
    let line_start = line_start(source, offset);

    let parsed = parse(source);
    let file = parsed.source_file();
    let directive = file
        .all_directives()
        .filter(|directive| {
            directive.name_range().is_some_and(|range| {
                range.start() >= line_start && range.start() <= line_end
            })
        })
        .last()?;
    let name = directive.name()?;

    if terminator(&directive).is_some_and(|token| token.text_range().start() <= line_end) {
        return None;
    }
    let insert_at = last_token_on_line(&directive, line_end)?.text_range().end();

    // Decided by name alone; the half-typed directive may not resolve yet.
    if catalog.has_container_overload(&name) {
        let indent = line_indent_at(source, directive.text_range().start());
        let unit = options.indent_unit();
        let head = format!(" {{\n{indent}{unit}");
        let caret = insert_at + TextSize::of(head.as_str());
        Some(SmartEnter {
            offset: insert_at,
            text: format!("{head}\n{indent}}}"),
            caret,
        })
    } else {
        Some(SmartEnter {
            offset: insert_at,
            text: ";".to_string(),
            caret: insert_at + TextSize::of(";"),
        })
    }
}

fn terminator(directive: &Directive) -> Option<SyntaxToken> {
    directive.semicolon().or_else(|| {
        directive
            .block()
            .and_then(|block| block.l_brace())
            .or_else(|| directive.lua_block().and_then(|lua| lua.l_brace()))
    })
}

/// The last name or argument token of `directive` that ends on the line.
fn last_token_on_line(directive: &Directive, line_end: TextSize) -> Option<SyntaxToken> {
    directive
        .syntax()
        .descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .filter(|token| matches!(token.kind(), SyntaxKind::Word | SyntaxKind::String))
        .take_while(|token| token.text_range().end() <= line_end)
        .last()
}

fn line_start(source: &str, offset: TextSize) -> TextSize {
    let offset = usize::from(offset);
    let start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    TextSize::try_from(start).unwrap_or_default()
}

fn line_end(source: &str, offset: TextSize) -> TextSize {
    let offset = usize::from(offset);
    let end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    TextSize::try_from(end).unwrap_or_default()
}
