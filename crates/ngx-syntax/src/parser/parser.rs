//! Main parser implementation.

use crate::lexer::{lex, Token, TokenKind};
use crate::parser::event::Event;
use crate::parser::grammar;
use crate::parser::sink::Sink;
use crate::parser::source::Source;
use crate::parser::{Parse, ParseError};
use crate::syntax::SyntaxKind;
use drop_bomb::DropBomb;
use text_size::TextRange;

/// Parses source text into a syntax tree.
#[must_use]
pub fn parse(source: &str) -> Parse {
    let tokens = lex(source);
    let mut parser = Parser::new(&tokens, source);
    grammar::source_file(&mut parser);
    let (events, errors) = parser.finish();

    let green_node = Sink::new(&tokens, source, events).finish();

    Parse { green_node, errors }
}

/// The parser state.
pub(crate) struct Parser<'t, 'src> {
    pub(crate) source: Source<'t, 'src>,
    pub(crate) events: Vec<Event>,
    errors: Vec<ParseError>,
}

pub(crate) struct Marker {
    pos: usize,
    bomb: DropBomb,
}

impl Marker {
    pub(crate) fn complete(mut self, parser: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.bomb.defuse();
        if let Some(event) = parser.events.get_mut(self.pos) {
            *event = Event::start(kind);
        }
        parser.events.push(Event::Finish);
    }
}

impl<'t, 'src> Parser<'t, 'src> {
    fn new(tokens: &'t [Token], source: &'src str) -> Self {
        Self {
            source: Source::new(tokens, source),
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> (Vec<Event>, Vec<ParseError>) {
        (self.events, self.errors)
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    pub(crate) fn current(&self) -> TokenKind {
        self.source.current()
    }

    pub(crate) fn current_text(&self) -> &'src str {
        self.source.current_text()
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.source.current() == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.source.at_end()
    }

    pub(crate) fn bump(&mut self) {
        let kind = self.source.current();
        self.events.push(Event::token(SyntaxKind::from(kind)));
        self.source.bump();
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            bomb: DropBomb::new("uncompleted marker"),
        }
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.events.push(Event::start(kind));
    }

    pub(crate) fn finish_node(&mut self) {
        self.events.push(Event::Finish);
    }

    /// Reports an error at the current token.
    pub(crate) fn error(&mut self, message: &str) {
        let range = self
            .source
            .current_token()
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(self.source.source_len()));

        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    /// Reports an error right after the last consumed token, where a missing
    /// terminator belongs.
    pub(crate) fn error_after_prev(&mut self, message: &str) {
        self.errors.push(ParseError {
            message: message.to_string(),
            range: TextRange::empty(self.source.prev_end()),
        });
    }
}
