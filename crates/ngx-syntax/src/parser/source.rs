//! Token source for the parser.
//!
//! This module provides the `Source` struct that wraps a token stream
//! and provides lookahead and consumption operations.

use text_size::TextSize;

use crate::lexer::{Token, TokenKind};

/// A token source that provides tokens to the parser.
pub struct Source<'t, 'src> {
    tokens: &'t [Token],
    source: &'src str,
    cursor: usize,
    prev_end: TextSize,
}

impl<'t, 'src> Source<'t, 'src> {
    /// Creates a new source from tokens and source text.
    pub fn new(tokens: &'t [Token], source: &'src str) -> Self {
        Self {
            tokens,
            source,
            cursor: 0,
            prev_end: TextSize::from(0),
        }
    }

    /// Returns the current non-trivia token kind, or `Eof` if at end.
    pub fn current(&self) -> TokenKind {
        self.current_token().map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Returns the current non-trivia token, or `None` if at end.
    pub fn current_token(&self) -> Option<&'t Token> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.kind.is_trivia())
    }

    /// Returns the text of the current non-trivia token.
    pub fn current_text(&self) -> &'src str {
        self.current_token()
            .map(|t| &self.source[usize::from(t.range.start())..usize::from(t.range.end())])
            .unwrap_or("")
    }

    /// Advances past the current non-trivia token (and the trivia before it).
    pub fn bump(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            self.cursor += 1;
            if !token.kind.is_trivia() {
                self.prev_end = token.range.end();
                break;
            }
        }
    }

    /// Returns `true` if at end of input.
    pub fn at_end(&self) -> bool {
        self.current() == TokenKind::Eof
    }

    /// End offset of the last consumed non-trivia token.
    pub fn prev_end(&self) -> TextSize {
        self.prev_end
    }

    /// Total length of the source text.
    pub fn source_len(&self) -> TextSize {
        TextSize::of(self.source)
    }
}
