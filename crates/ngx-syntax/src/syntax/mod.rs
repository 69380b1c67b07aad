//! Syntax tree types for nginx configuration files.
//!
//! This module provides the `rowan`-based syntax tree implementation,
//! including the `SyntaxKind` enum that covers both tokens and composite nodes.

use crate::lexer::TokenKind;
use crate::token_kinds::for_each_token_kind;

macro_rules! define_syntax_kind {
    ($($token:ident),* $(,)?) => {
        /// All syntax node and token kinds in nginx configuration files.
        ///
        /// This enum includes both token kinds (from the lexer) and composite
        /// node kinds (produced by the parser).
        // Variants mirror lexer/token names; documenting each would be noisy.
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            // =========================================================================
            // TOKEN KINDS (mirrors TokenKind)
            // =========================================================================
            $($token,)*

            // COMPOSITE NODE KINDS (produced by parser)
            // =========================================================================
            /// Root node of a configuration file
            SourceFile,

            /// A directive statement: `name args... ;` or `name args... { ... }`
            Directive,

            /// The directive name
            Name,

            /// A single directive argument
            Arg,

            /// A block of nested directives: `{ ... }`
            Block,

            /// An opaque Lua code body: `content_by_lua_block { ... }`
            LuaBlock,
        }
    };
}

for_each_token_kind!(define_syntax_kind);

impl SyntaxKind {
    /// Returns `true` if this is a trivia kind.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns `true` if this is a token kind (not a composite node).
    #[must_use]
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::Eof as u16)
    }

    /// Returns `true` if this is a composite node kind.
    #[must_use]
    pub fn is_node(self) -> bool {
        !self.is_token()
    }
}

macro_rules! map_token_kinds {
    ($($name:ident),* $(,)?) => {
        impl From<TokenKind> for SyntaxKind {
            fn from(kind: TokenKind) -> Self {
                match kind {
                    $(TokenKind::$name => SyntaxKind::$name,)*
                }
            }
        }
    };
}

for_each_token_kind!(map_token_kinds);

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The language type for nginx configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NginxLanguage {}

macro_rules! define_syntax_kinds {
    ($($token:ident),* $(,)?) => {
        const SYNTAX_KINDS: &[SyntaxKind] = &[
            $(SyntaxKind::$token,)*
            SyntaxKind::SourceFile,
            SyntaxKind::Directive,
            SyntaxKind::Name,
            SyntaxKind::Arg,
            SyntaxKind::Block,
            SyntaxKind::LuaBlock,
        ];
    };
}

for_each_token_kind!(define_syntax_kinds);

impl rowan::Language for NginxLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SYNTAX_KINDS
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A syntax node in the configuration syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<NginxLanguage>;

/// A syntax token in the configuration syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<NginxLanguage>;

/// A syntax element (node or token) in the configuration syntax tree.
pub type SyntaxElement = rowan::SyntaxElement<NginxLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn raw_kinds_round_trip_through_the_table() {
        for kind in SYNTAX_KINDS {
            assert_eq!(NginxLanguage::kind_from_raw((*kind).into()), *kind);
        }
    }

    #[test]
    fn token_and_node_kinds_are_disjoint() {
        assert!(SyntaxKind::Word.is_token());
        assert!(SyntaxKind::Eof.is_token());
        assert!(SyntaxKind::Directive.is_node());
        assert!(SyntaxKind::LuaBlock.is_node());
    }
}
