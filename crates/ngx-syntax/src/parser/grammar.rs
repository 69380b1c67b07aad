//! Grammar rules for nginx configuration files.
//!
//! ```text
//! SourceFile = Directive*
//! Directive  = Name Arg* (';' | Block | LuaBlock)
//! Block      = '{' Directive* '}'
//! LuaBlock   = '{' LuaCode? '}'
//! ```

use crate::lexer::{TokenKind, LUA_BLOCK_SUFFIX};
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn source_file(p: &mut Parser<'_, '_>) {
    p.start_node(SyntaxKind::SourceFile);

    while !p.at_end() {
        if p.at(TokenKind::RBrace) {
            p.error("unexpected '}'");
            p.bump();
        } else {
            directive(p);
        }
    }

    p.finish_node();
}

fn directive(p: &mut Parser<'_, '_>) {
    match p.current() {
        TokenKind::Semicolon => {
            p.error("unexpected ';'");
            p.bump();
            return;
        }
        TokenKind::Error | TokenKind::LuaCode => {
            p.error("unexpected character");
            p.bump();
            return;
        }
        _ => {}
    }

    let m = p.start();
    let mut lua = false;

    if p.current().is_value() {
        lua = p.current_text().ends_with(LUA_BLOCK_SUFFIX);
        let name = p.start();
        p.bump();
        name.complete(p, SyntaxKind::Name);
    } else {
        p.error("expected directive name");
    }

    loop {
        match p.current() {
            TokenKind::Word | TokenKind::String => {
                let arg = p.start();
                p.bump();
                arg.complete(p, SyntaxKind::Arg);
            }
            TokenKind::Error => {
                p.error("unexpected character");
                p.bump();
            }
            _ => break,
        }
    }

    match p.current() {
        TokenKind::Semicolon => p.bump(),
        TokenKind::LBrace if lua => lua_block(p),
        TokenKind::LBrace => block(p),
        _ => p.error_after_prev("expected ';' or '{'"),
    }

    m.complete(p, SyntaxKind::Directive);
}

fn block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    while !p.at(TokenKind::RBrace) && !p.at_end() {
        directive(p);
    }

    if p.at(TokenKind::RBrace) {
        p.bump();
    } else {
        p.error_after_prev("expected '}'");
    }

    m.complete(p, SyntaxKind::Block);
}

fn lua_block(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    // The lexer has already matched the braces of the body.
    if p.at(TokenKind::LuaCode) {
        p.bump();
    }
    if p.at(TokenKind::RBrace) {
        p.bump();
    } else {
        p.error_after_prev("expected '}'");
    }

    m.complete(p, SyntaxKind::LuaBlock);
}
