//! Folding ranges for blocks and comment runs.

use ngx_syntax::ast::{AstNode, Block, LuaBlock};
use ngx_syntax::parser::parse;
use ngx_syntax::syntax::{SyntaxKind, SyntaxToken};
use text_size::TextRange;

/// What a folding range covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldingKind {
    /// A `{ ... }` body, braces included.
    Block,
    /// Two or more consecutive full-line comments.
    Comment,
}

/// A foldable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldingRange {
    /// The folded text.
    pub range: TextRange,
    /// The kind of region.
    pub kind: FoldingKind,
}

/// Computes folding ranges, sorted by start offset.
pub fn folding_ranges(source: &str) -> Vec<FoldingRange> {
    let parsed = parse(source);
    let root = parsed.syntax();
    let mut ranges = Vec::new();

    for node in root.descendants() {
        let braces = if let Some(block) = Block::cast(node.clone()) {
            (block.l_brace(), block.r_brace())
        } else if let Some(lua) = LuaBlock::cast(node) {
            (lua.l_brace(), lua.r_brace())
        } else {
            continue;
        };
        let (Some(l_brace), Some(r_brace)) = braces else {
            continue;
        };
        let inner = TextRange::new(l_brace.text_range().end(), r_brace.text_range().start());
        if source[inner].trim().is_empty() {
            continue;
        }
        ranges.push(FoldingRange {
            range: TextRange::new(l_brace.text_range().start(), r_brace.text_range().end()),
            kind: FoldingKind::Block,
        });
    }

    let mut run: Vec<SyntaxToken> = Vec::new();
    let tokens = root
        .descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token);
    for token in tokens {
        match token.kind() {
            SyntaxKind::Comment if starts_line(&token) => {
                let adjacent = run.last().is_some_and(|last| {
                    last.next_token()
                        .is_some_and(|between| between.text().matches('\n').count() == 1)
                });
                if !adjacent {
                    flush_comments(&mut run, &mut ranges);
                }
                run.push(token);
            }
            SyntaxKind::Whitespace => {}
            _ => flush_comments(&mut run, &mut ranges),
        }
    }
    flush_comments(&mut run, &mut ranges);

    ranges.sort_by_key(|folding| folding.range.start());
    ranges
}

fn flush_comments(run: &mut Vec<SyntaxToken>, ranges: &mut Vec<FoldingRange>) {
    if let (true, Some(first), Some(last)) = (run.len() >= 2, run.first(), run.last()) {
        ranges.push(FoldingRange {
            range: TextRange::new(first.text_range().start(), last.text_range().end()),
            kind: FoldingKind::Comment,
        });
    }
    run.clear();
}

fn starts_line(token: &SyntaxToken) -> bool {
    token.prev_token().is_none_or(|prev| {
        prev.kind() == SyntaxKind::Whitespace
            && (prev.text().contains('\n') || prev.prev_token().is_none())
    })
}
