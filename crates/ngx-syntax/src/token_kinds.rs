//! Shared list of token kinds.
//!
//! `TokenKind` and the token half of `SyntaxKind` must stay in the same order,
//! so both are generated from this single list.

macro_rules! for_each_token_kind {
    ($m:ident) => {
        $m! {
            Whitespace,
            Comment,
            Semicolon,
            LBrace,
            RBrace,
            String,
            Word,
            LuaCode,
            Error,
            Eof,
        }
    };
}

pub(crate) use for_each_token_kind;
