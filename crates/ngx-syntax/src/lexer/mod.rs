//! Lexer for nginx configuration files.
//!
//! This module provides a lexer that tokenizes configuration source into a
//! stream of tokens with their positions in the source text. The body of a
//! `*_by_lua_block` directive is handed to a Lua-aware scanner and comes back
//! as a single [`TokenKind::LuaCode`] token.

mod lua;
mod tokens;

pub use tokens::TokenKind;

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Returns the length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    /// Returns true if the token has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Directive name suffix whose block holds raw Lua code.
pub const LUA_BLOCK_SUFFIX: &str = "_by_lua_block";

/// Lexer for nginx configuration source.
///
/// The lexer is an iterator over tokens. It handles all error recovery
/// internally - any unrecognized characters are returned as `TokenKind::Error`.
///
/// It follows statement boundaries just far enough to know when a `{` opens
/// a Lua body: the first value after `;`, `{`, `}` or the start of input is
/// the directive name.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    pending: Option<Token>,
    statement_start: bool,
    lua_directive: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            pending: None,
            statement_start: true,
            lua_directive: false,
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the text of the current token.
    #[must_use]
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }

    /// Skips the Lua body that starts at `start` and returns its token, if
    /// the body is not empty.
    fn lua_body(&mut self, start: usize) -> Option<Token> {
        let len = lua::body_len(&self.source[start..]);
        if len == 0 {
            return None;
        }
        self.inner.bump(len);
        Some(Token::new(
            TokenKind::LuaCode,
            TextRange::at(text_offset(start), text_offset(len)),
        ))
    }

    fn track_statement(&mut self, kind: TokenKind, text: &str, end: usize) {
        match kind {
            TokenKind::Semicolon | TokenKind::RBrace => {
                self.statement_start = true;
                self.lua_directive = false;
            }
            TokenKind::LBrace => {
                if self.lua_directive {
                    self.pending = self.lua_body(end);
                }
                self.statement_start = true;
                self.lua_directive = false;
            }
            TokenKind::Word | TokenKind::String if self.statement_start => {
                self.lua_directive = text.ends_with(LUA_BLOCK_SUFFIX);
                self.statement_start = false;
            }
            _ => {}
        }
    }
}

fn text_offset(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or_else(|_| TextSize::from(u32::MAX))
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        let kind = self.inner.next()?;
        let span = self.inner.span();

        let kind = kind.unwrap_or(TokenKind::Error);
        let range = TextRange::new(text_offset(span.start), text_offset(span.end));
        let source = self.source;
        self.track_statement(kind, &source[span.clone()], span.end);

        Some(Token::new(kind, range))
    }
}

/// Lex the entire source and return all tokens.
///
/// This is a convenience function for testing and simple use cases.
/// For the parser, use the `Lexer` iterator directly.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex source and return tokens paired with their text.
///
/// Useful for debugging and testing.
#[must_use]
pub fn lex_with_text(source: &str) -> Vec<(Token, &str)> {
    Lexer::new(source)
        .map(|token| {
            let text = &source[usize::from(token.range.start())..usize::from(token.range.end())];
            (token, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_basic() {
        let source = "worker_processes 4;";
        let tokens = lex(source);

        let non_trivia: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia.len(), 3);
        assert_eq!(non_trivia[0].kind, TokenKind::Word);
        assert_eq!(non_trivia[1].kind, TokenKind::Word);
        assert_eq!(non_trivia[2].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_lexer_preserves_positions() {
        let source = "listen 80;";
        let tokens = lex(source);

        assert_eq!(tokens[0].range, TextRange::new(0.into(), 6.into()));
        assert_eq!(tokens[1].range, TextRange::new(6.into(), 7.into()));
        assert_eq!(tokens[2].range, TextRange::new(7.into(), 9.into()));
        assert_eq!(tokens[3].range, TextRange::new(9.into(), 10.into()));
    }

    #[test]
    fn test_lex_with_text() {
        let source = "root /var/www/$host;";
        let tokens = lex_with_text(source);

        let non_trivia: Vec<_> = tokens.iter().filter(|(t, _)| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia[0].1, "root");
        assert_eq!(non_trivia[1].1, "/var/www/$host");
        assert_eq!(non_trivia[2].1, ";");
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let tokens = lex_with_text("# listen 80; {\nuser nginx;");
        assert_eq!(tokens[0].0.kind, TokenKind::Comment);
        assert_eq!(tokens[0].1, "# listen 80; {");
        assert_eq!(tokens[1].0.kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].1, "user");
    }

    #[test]
    fn test_hash_inside_word_is_not_a_comment() {
        let tokens = lex_with_text("return 301 https://x/#frag;");
        let words: Vec<_> = tokens
            .iter()
            .filter(|(t, _)| t.kind == TokenKind::Word)
            .map(|(_, text)| *text)
            .collect();
        assert_eq!(words, vec!["return", "301", "https://x/#frag"]);
    }

    #[test]
    fn test_braced_variable_stays_in_word() {
        let tokens = lex_with_text("set $a ${host}_suffix;");
        let words: Vec<_> = tokens
            .iter()
            .filter(|(t, _)| t.kind == TokenKind::Word)
            .map(|(_, text)| *text)
            .collect();
        assert_eq!(words, vec!["set", "$a", "${host}_suffix"]);
    }

    #[test]
    fn test_quoted_strings() {
        let tokens = lex_with_text(r#"log_format main '$remote_addr "x"' "a\"b";"#);
        let strings: Vec<_> = tokens
            .iter()
            .filter(|(t, _)| t.kind == TokenKind::String)
            .map(|(_, text)| *text)
            .collect();
        assert_eq!(strings, vec![r#"'$remote_addr "x"'"#, r#""a\"b""#]);
    }

    #[test]
    fn test_regex_with_parentheses_is_one_word() {
        let tokens = lex_with_text(r"location ~ ^/(img|js)/.*\.png$ {");
        let non_trivia: Vec<_> = tokens.iter().filter(|(t, _)| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia.len(), 4);
        assert_eq!(non_trivia[2].1, r"^/(img|js)/.*\.png$");
        assert_eq!(non_trivia[3].0.kind, TokenKind::LBrace);
    }

    #[test]
    fn test_lua_body_is_one_token() {
        let tokens = lex_with_text("init_by_lua_block { n = #t }\nuser x;");
        let non_trivia: Vec<_> = tokens
            .iter()
            .filter(|(t, _)| !t.kind.is_trivia())
            .map(|(t, text)| (t.kind, *text))
            .collect();
        assert_eq!(
            non_trivia,
            vec![
                (TokenKind::Word, "init_by_lua_block"),
                (TokenKind::LBrace, "{"),
                (TokenKind::LuaCode, " n = #t "),
                (TokenKind::RBrace, "}"),
                (TokenKind::Word, "user"),
                (TokenKind::Word, "x"),
                (TokenKind::Semicolon, ";"),
            ]
        );
    }

    #[test]
    fn test_lua_suffix_only_counts_in_name_position() {
        let tokens = lex("set $v x_by_lua_block { '");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::LuaCode));
    }

    #[test]
    fn test_empty_lua_body() {
        let kinds: Vec<_> = lex("content_by_lua_block {}").iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Whitespace,
                TokenKind::LBrace,
                TokenKind::RBrace
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let tokens = lex(r#"root "abc"#);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    }
}
