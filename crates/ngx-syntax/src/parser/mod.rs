//! Parser for nginx configuration files.
//!
//! A configuration is a list of directives. Each directive is a name, zero
//! or more arguments, and either a `;` or a `{ ... }` body. Bodies of
//! `*_by_lua_block` directives are Lua code and are kept as one opaque node.
//!
//! Parsing never fails: missing `;` or `}` are reported in [`Parse::errors`]
//! and the tree still covers every byte of the input. The grammar emits
//! events (see [`event`]) which the sink turns into a `rowan` green tree.

#![allow(clippy::module_inception)]

pub mod event;
mod grammar;
mod parser;
mod sink;
mod source;

pub use crate::lexer::LUA_BLOCK_SUFFIX;
pub use parser::parse;
pub(crate) use parser::Parser;

use crate::syntax::SyntaxNode;

/// Result of parsing source text.
#[derive(Debug, Clone)]
pub struct Parse {
    /// The root syntax node.
    green_node: rowan::GreenNode,
    /// Parsing errors.
    errors: Vec<ParseError>,
}

impl Parse {
    /// Returns the root syntax node.
    #[must_use]
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node.clone())
    }

    /// Returns the typed root of the tree.
    #[must_use]
    pub fn source_file(&self) -> crate::ast::SourceFile {
        crate::ast::SourceFile::from_root(self.syntax())
    }

    /// Returns the parsing errors.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Returns `true` if parsing produced no errors.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The byte range where the error occurred.
    pub range: text_size::TextRange,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

impl std::error::Error for ParseError {}
