//! Sink for converting parser events into a syntax tree.
//!
//! The sink takes the flat event stream and builds a proper `rowan` green tree.
//! Trivia between two nodes is attached to their common parent, so a node's
//! range starts at its first significant token and ends at its last one.

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax::SyntaxKind;

/// Builds a syntax tree from parser events.
pub struct Sink<'t, 'src> {
    tokens: &'t [Token],
    source: &'src str,
    events: Vec<Event>,
    cursor: usize,
    builder: rowan::GreenNodeBuilder<'static>,
}

impl<'t, 'src> Sink<'t, 'src> {
    /// Creates a new sink.
    pub fn new(tokens: &'t [Token], source: &'src str, events: Vec<Event>) -> Self {
        Self {
            tokens,
            source,
            events,
            cursor: 0,
            builder: rowan::GreenNodeBuilder::new(),
        }
    }

    /// Consumes the sink and returns the green tree.
    pub fn finish(mut self) -> rowan::GreenNode {
        let events = std::mem::take(&mut self.events);
        let last = events.len().saturating_sub(1);

        for (i, event) in events.into_iter().enumerate() {
            match event {
                Event::Start { kind } => {
                    // The root owns leading trivia of the file.
                    if i > 0 {
                        self.eat_trivia();
                    }
                    self.builder.start_node(rowan::SyntaxKind(kind as u16));
                }
                Event::Token { kind } => {
                    self.eat_trivia();
                    self.token(kind);
                }
                Event::Finish => {
                    if i == last {
                        self.eat_trivia();
                    }
                    self.builder.finish_node();
                }
                Event::Placeholder => {}
            }
        }

        self.builder.finish()
    }

    /// Adds trivia (whitespace, comments) to the tree.
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if !token.kind.is_trivia() {
                break;
            }
            self.token(SyntaxKind::from(token.kind));
        }
    }

    /// Adds a token to the tree.
    fn token(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.tokens.get(self.cursor) {
            let text =
                &self.source[usize::from(token.range.start())..usize::from(token.range.end())];
            self.builder.token(rowan::SyntaxKind(kind as u16), text);
            self.cursor += 1;
        }
    }
}
