//! Shared helpers for IDE features.

use ngx_catalog::{BodyKind, Catalog};
use ngx_syntax::ast::{AstNode, Directive, SourceFile};
use ngx_syntax::syntax::{SyntaxKind, SyntaxToken};
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// Converts a byte offset into a zero-based `(line, column)` pair, counting
/// columns in characters.
#[must_use]
pub fn offset_to_line_col(source: &str, offset: TextSize) -> (u32, u32) {
    let offset = usize::from(offset);
    let mut line = 0u32;
    let mut col = 0u32;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// The whitespace at the start of the line containing `offset`.
#[must_use]
pub fn line_indent_at(source: &str, offset: TextSize) -> &str {
    let offset = usize::from(offset).min(source.len());
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// The token touching `offset`, preferring the one that ends there.
pub(crate) fn token_left_of(file: &SourceFile, offset: TextSize) -> Option<SyntaxToken> {
    file.syntax().token_at_offset(offset).left_biased()
}

/// The last non-trivia token that ends at or before `offset`.
pub(crate) fn previous_significant_token(
    file: &SourceFile,
    offset: TextSize,
) -> Option<SyntaxToken> {
    let mut token = token_left_of(file, offset)?;
    loop {
        if !token.kind().is_trivia() && token.text_range().end() <= offset {
            return Some(token);
        }
        token = token.prev_token()?;
    }
}

/// Returns `true` if the token sits in the name slot of a directive.
pub(crate) fn is_name_token(token: &SyntaxToken) -> bool {
    token
        .parent()
        .is_some_and(|parent| parent.kind() == SyntaxKind::Name)
}

/// The part of `token` before `offset`.
pub(crate) fn prefix_before(token: &SyntaxToken, offset: TextSize) -> SmolStr {
    let range = token.text_range();
    let end = offset.min(range.end()) - range.start();
    SmolStr::new(&token.text()[..usize::from(end)])
}

/// Returns `true` when the innermost enclosing body is raw text rather than
/// a directive list: a Lua block, or a block whose directive declares an
/// entries table.
pub(crate) fn in_raw_body(catalog: &Catalog, enclosing: &[Directive]) -> bool {
    let Some((innermost, outer)) = enclosing.split_last() else {
        return false;
    };
    if innermost.lua_block().is_some() {
        return true;
    }
    let Some(name) = innermost.name() else {
        return false;
    };
    let path: Vec<SmolStr> = outer.iter().filter_map(Directive::name).collect();
    catalog
        .best_match(&name, &path)
        .is_some_and(|directive| directive.body() == Some(BodyKind::Entries))
}

/// Returns `true` if `range` lies inside any entries or Lua body.
pub(crate) fn range_in_raw_body(catalog: &Catalog, file: &SourceFile, range: TextRange) -> bool {
    let enclosing = file.enclosing_directives_at(range.start());
    (1..=enclosing.len()).any(|len| in_raw_body(catalog, &enclosing[..len]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_characters() {
        let source = "a;\nbé c;\n";
        assert_eq!(offset_to_line_col(source, TextSize::from(0)), (0, 0));
        assert_eq!(offset_to_line_col(source, TextSize::from(3)), (1, 0));
        // 'é' is two bytes wide.
        assert_eq!(offset_to_line_col(source, TextSize::from(6)), (1, 2));
    }

    #[test]
    fn indent_of_current_line() {
        let source = "http {\n\t  server\n}";
        assert_eq!(line_indent_at(source, TextSize::from(14)), "\t  ");
        assert_eq!(line_indent_at(source, TextSize::from(2)), "");
    }
}
