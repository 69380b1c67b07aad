//! Whole-document formatting.
//!
//! The formatter re-indents every line by block depth and normalizes the
//! whitespace between statements. It keeps the author's line structure and
//! spacing between arguments, collapses runs of blank lines, and copies Lua
//! code verbatim. A `;` is pulled up against the last argument and a `{`
//! onto the directive's line unless a comment sits in between.

use ngx_syntax::ast::{AstNode, LuaBlock};
use ngx_syntax::parser::parse;
use ngx_syntax::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::NodeOrToken;

/// Formatter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Indent with spaces instead of tabs.
    pub insert_spaces: bool,
    /// Blank lines kept between two statements.
    pub max_blank_lines: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            insert_spaces: true,
            max_blank_lines: 1,
        }
    }
}

impl FormatOptions {
    /// The text of one indentation level.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.indent_width.max(1))
        } else {
            "\t".to_string()
        }
    }
}

/// Formats a whole document.
///
/// The result ends with exactly one newline, unless the document holds no
/// tokens at all. Formatting is idempotent.
#[must_use]
pub fn format_document(source: &str, options: &FormatOptions) -> String {
    let parsed = parse(source);
    let mut printer = Printer::new(options);
    printer.node(&parsed.syntax());

    let mut out = printer.out;
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

struct Printer {
    indent_unit: String,
    max_newlines: usize,
    out: String,
    depth: usize,
    newlines: usize,
    space: Option<String>,
    after_comment: bool,
}

impl Printer {
    fn new(options: &FormatOptions) -> Self {
        Self {
            indent_unit: options.indent_unit(),
            max_newlines: options.max_blank_lines + 1,
            out: String::new(),
            depth: 0,
            newlines: 0,
            space: None,
            after_comment: false,
        }
    }

    fn node(&mut self, node: &SyntaxNode) {
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(child) if child.kind() == SyntaxKind::LuaBlock => {
                    if let Some(lua) = LuaBlock::cast(child) {
                        self.lua_block(&lua);
                    }
                }
                NodeOrToken::Node(child) => self.node(&child),
                NodeOrToken::Token(token) => self.token(&token),
            }
        }
    }

    fn token(&mut self, token: &SyntaxToken) {
        let kind = token.kind();
        let text = token.text();

        if kind == SyntaxKind::Whitespace {
            let newlines = text.matches('\n').count();
            if newlines > 0 {
                self.newlines = (self.newlines + newlines).min(self.max_newlines);
                self.space = None;
            } else if self.newlines == 0 {
                self.space = Some(text.to_string());
            }
            return;
        }

        self.separator(kind);
        self.after_comment = kind == SyntaxKind::Comment;
        if kind == SyntaxKind::Comment {
            self.out.push_str(text.trim_end());
        } else {
            self.out.push_str(text);
        }

        match kind {
            SyntaxKind::LBrace => self.depth += 1,
            SyntaxKind::RBrace => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    /// Writes the whitespace owed before a token of `kind`.
    fn separator(&mut self, kind: SyntaxKind) {
        let newlines = std::mem::take(&mut self.newlines);
        let space = self.space.take();

        if self.out.is_empty() {
            return;
        }
        let pull_up =
            matches!(kind, SyntaxKind::Semicolon | SyntaxKind::LBrace) && !self.after_comment;
        if newlines > 0 && !pull_up {
            for _ in 0..newlines {
                self.out.push('\n');
            }
            let depth = if kind == SyntaxKind::RBrace {
                self.depth.saturating_sub(1)
            } else {
                self.depth
            };
            for _ in 0..depth {
                self.out.push_str(&self.indent_unit);
            }
            return;
        }

        match (kind, space) {
            (SyntaxKind::Semicolon, _) => {}
            (SyntaxKind::LBrace, _) => self.out.push(' '),
            (_, Some(space)) => self.out.push_str(&space),
            (_, None) => {}
        }
    }

    fn lua_block(&mut self, lua: &LuaBlock) {
        let Some(l_brace) = lua.l_brace() else {
            return;
        };
        self.token(&l_brace);

        let code = lua.code();
        let code = code.as_ref().map_or("", SyntaxToken::text);
        let r_brace = lua.r_brace();
        let r_brace = r_brace.as_ref();

        // Code runs verbatim; only the closing brace line is re-indented.
        match (code.rfind('\n'), r_brace) {
            (Some(last_newline), Some(r_brace)) if code[last_newline..].trim().is_empty() => {
                self.out.push_str(&code[..last_newline]);
                self.newlines = 1;
                self.token(r_brace);
            }
            (_, Some(r_brace)) => {
                self.out.push_str(code);
                self.out.push_str(r_brace.text());
                self.depth = self.depth.saturating_sub(1);
            }
            (_, None) => self.out.push_str(code),
        }
    }
}
