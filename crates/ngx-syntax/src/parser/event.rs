//! Parser events.
//!
//! The parser produces a flat stream of events that are later converted
//! into a syntax tree. Keeping tree construction out of the grammar makes
//! error recovery a matter of emitting fewer or more events.

use crate::syntax::SyntaxKind;

/// An event produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start a new node.
    Start {
        /// The kind of node being started.
        kind: SyntaxKind,
    },
    /// Add a token to the current node.
    Token {
        /// The kind of token.
        kind: SyntaxKind,
    },
    /// Finish the current node.
    Finish,
    /// Placeholder event (will be replaced or removed).
    Placeholder,
}

impl Event {
    /// Creates a start event.
    #[must_use]
    pub fn start(kind: SyntaxKind) -> Self {
        Self::Start { kind }
    }

    /// Creates a token event.
    #[must_use]
    pub fn token(kind: SyntaxKind) -> Self {
        Self::Token { kind }
    }
}
