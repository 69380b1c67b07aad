//! Token definitions for nginx configuration files.
//!
//! The nginx tokenizer is small: everything that is not whitespace, a comment,
//! a quoted string or one of `; { }` is part of a bare word. Parentheses,
//! `$variables` and regex metacharacters all live inside words, exactly the
//! way nginx itself reads them.

use logos::Logos;

/// All token kinds in nginx configuration files.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Whitespace (spaces, tabs, newlines)
    #[regex(r"\s+")]
    Whitespace,

    /// Line comment: # ...
    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// Statement terminator `;`
    #[token(";")]
    Semicolon,

    /// Block opener `{`
    #[token("{")]
    LBrace,

    /// Block closer `}`
    #[token("}")]
    RBrace,

    // =========================================================================
    // VALUES
    // =========================================================================
    /// Quoted string: "..." or '...' with backslash escapes.
    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    #[regex(r#"'([^'\\]|\\[\s\S])*'"#)]
    String,

    /// Bare word, including `${name}` variable interpolations and escapes.
    #[regex(
        r#"([^\s;{}"'\\#]|\\[^\s]|\$\{[A-Za-z0-9_]*\})([^\s;{}"'\\]|\\[^\s]|\$\{[A-Za-z0-9_]*\})*"#
    )]
    Word,

    /// The raw body of a `*_by_lua_block`, between its braces. Produced by
    /// the Lua scanner rather than by these rules.
    LuaCode,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Unrecognized input, such as an unterminated string.
    Error,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is trivia (whitespace or comment).
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns `true` if this token can be a directive name or argument.
    #[inline]
    #[must_use]
    pub fn is_value(self) -> bool {
        matches!(self, Self::Word | Self::String)
    }
}
