//! Typed views over the untyped syntax tree.
//!
//! Each wrapper is a cheap handle around a [`SyntaxNode`] of a known kind.
//! Accessors never fail on broken input; they return `None` or an empty
//! iterator when the parser had to recover.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Conversion between untyped nodes and typed wrappers.
pub trait AstNode: Sized {
    /// Returns `true` if nodes of `kind` can be wrapped by `Self`.
    fn can_cast(kind: SyntaxKind) -> bool;

    /// Wraps `node` if it has the right kind.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Returns the underlying syntax node.
    fn syntax(&self) -> &SyntaxNode;

    /// Returns the range of the node in the source text.
    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(
    /// The root of a configuration file.
    SourceFile => SourceFile
);
ast_node!(
    /// A directive statement, with or without a body.
    Directive => Directive
);
ast_node!(
    /// A `{ ... }` body holding nested directives.
    Block => Block
);
ast_node!(
    /// A `{ ... }` body holding raw Lua code.
    LuaBlock => LuaBlock
);
ast_node!(
    /// One directive argument.
    Arg => Arg
);

impl SourceFile {
    /// Wraps the root node returned by the parser.
    #[must_use]
    pub fn from_root(root: SyntaxNode) -> Self {
        Self(root)
    }

    /// Top-level directives.
    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        self.0.children().filter_map(Directive::cast)
    }

    /// All directives in the file, in source order.
    pub fn all_directives(&self) -> impl Iterator<Item = Directive> {
        self.0.descendants().filter_map(Directive::cast)
    }

    /// Directives whose directive-list body contains `offset`, outermost first.
    ///
    /// A body contains every offset between its braces, inclusive of both
    /// inner edges. A body without a closing brace extends to the end of
    /// the file. Lua bodies are reported too but never descended into.
    #[must_use]
    pub fn enclosing_directives_at(&self, offset: TextSize) -> Vec<Directive> {
        let mut result = Vec::new();
        let mut level: Vec<Directive> = self.directives().collect();

        while let Some(directive) = level
            .into_iter()
            .find(|directive| directive.body_contains(offset))
        {
            level = directive
                .block()
                .map(|block| block.directives().collect())
                .unwrap_or_default();
            result.push(directive);
        }

        result
    }

    /// Names of the block directives enclosing `offset`, outermost first.
    #[must_use]
    pub fn context_path_at(&self, offset: TextSize) -> Vec<SmolStr> {
        self.enclosing_directives_at(offset)
            .iter()
            .filter_map(Directive::name)
            .collect()
    }

    /// The directive whose name token touches `offset`.
    #[must_use]
    pub fn directive_name_at(&self, offset: TextSize) -> Option<Directive> {
        self.0.token_at_offset(offset).find_map(|token| {
            let name = token.parent().filter(|n| n.kind() == SyntaxKind::Name)?;
            name.parent().and_then(Directive::cast)
        })
    }

    /// The innermost directive whose range touches `offset`.
    #[must_use]
    pub fn directive_at(&self, offset: TextSize) -> Option<Directive> {
        self.0
            .token_at_offset(offset)
            .filter_map(|token| token.parent_ancestors().find_map(Directive::cast))
            .min_by_key(|directive| directive.text_range().len())
    }
}

impl Directive {
    /// The name token, if the parser found one.
    #[must_use]
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.0
            .children()
            .find(|child| child.kind() == SyntaxKind::Name)?
            .first_token()
    }

    /// The directive name with surrounding quotes removed.
    #[must_use]
    pub fn name(&self) -> Option<SmolStr> {
        self.name_token()
            .map(|token| SmolStr::new(unquote(token.kind(), token.text())))
    }

    /// The range of the name token.
    #[must_use]
    pub fn name_range(&self) -> Option<TextRange> {
        self.name_token().map(|token| token.text_range())
    }

    /// The directive arguments, in order.
    pub fn args(&self) -> impl Iterator<Item = Arg> {
        self.0.children().filter_map(Arg::cast)
    }

    /// The directive-list body, if any.
    #[must_use]
    pub fn block(&self) -> Option<Block> {
        self.0.children().find_map(Block::cast)
    }

    /// The raw Lua body, if any.
    #[must_use]
    pub fn lua_block(&self) -> Option<LuaBlock> {
        self.0.children().find_map(LuaBlock::cast)
    }

    /// Returns `true` if the directive has any `{ ... }` body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.block().is_some() || self.lua_block().is_some()
    }

    /// The terminating `;`, if present.
    #[must_use]
    pub fn semicolon(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .find(|token| token.kind() == SyntaxKind::Semicolon)
    }

    /// Returns `true` if the directive ends with `;` or a body.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.semicolon().is_some() || self.has_body()
    }

    /// Range strictly between the braces of the body, if there is one.
    #[must_use]
    pub fn body_inner_range(&self) -> Option<TextRange> {
        self.block()
            .map(|block| block.inner_range())
            .or_else(|| self.lua_block().map(|lua| lua.inner_range()))
    }

    /// The directive whose block contains this one.
    #[must_use]
    pub fn parent_directive(&self) -> Option<Directive> {
        self.0.ancestors().skip(1).find_map(Directive::cast)
    }

    /// Names of the enclosing block directives, outermost first, not
    /// including this directive.
    #[must_use]
    pub fn context_path(&self) -> Vec<SmolStr> {
        let mut path: Vec<SmolStr> = self
            .0
            .ancestors()
            .skip(1)
            .filter_map(Directive::cast)
            .filter_map(|directive| directive.name())
            .collect();
        path.reverse();
        path
    }

    fn body_contains(&self, offset: TextSize) -> bool {
        let (l_brace, r_brace) = if let Some(block) = self.block() {
            (block.l_brace(), block.r_brace())
        } else if let Some(lua) = self.lua_block() {
            (lua.l_brace(), lua.r_brace())
        } else {
            return false;
        };
        let Some(l_brace) = l_brace else {
            return false;
        };
        offset >= l_brace.text_range().end()
            && r_brace.is_none_or(|r_brace| offset <= r_brace.text_range().start())
    }
}

impl Block {
    /// The opening brace.
    #[must_use]
    pub fn l_brace(&self) -> Option<SyntaxToken> {
        brace(&self.0, SyntaxKind::LBrace)
    }

    /// The closing brace, missing when the file ends inside the block.
    #[must_use]
    pub fn r_brace(&self) -> Option<SyntaxToken> {
        brace(&self.0, SyntaxKind::RBrace)
    }

    /// Nested directives.
    pub fn directives(&self) -> impl Iterator<Item = Directive> {
        self.0.children().filter_map(Directive::cast)
    }

    /// Range strictly between the braces.
    #[must_use]
    pub fn inner_range(&self) -> TextRange {
        inner_range(&self.0, self.l_brace(), self.r_brace())
    }
}

impl LuaBlock {
    /// The opening brace.
    #[must_use]
    pub fn l_brace(&self) -> Option<SyntaxToken> {
        self.0.first_token().filter(|t| t.kind() == SyntaxKind::LBrace)
    }

    /// The closing brace, missing when the file ends inside the block.
    #[must_use]
    pub fn r_brace(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .find(|token| token.kind() == SyntaxKind::RBrace)
    }

    /// The Lua source between the braces, if any.
    #[must_use]
    pub fn code(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .find(|token| token.kind() == SyntaxKind::LuaCode)
    }

    /// Range strictly between the braces.
    #[must_use]
    pub fn inner_range(&self) -> TextRange {
        inner_range(&self.0, self.l_brace(), self.r_brace())
    }
}

impl Arg {
    /// The argument token.
    #[must_use]
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }

    /// The argument exactly as written.
    #[must_use]
    pub fn text(&self) -> SmolStr {
        self.token()
            .map(|token| SmolStr::new(token.text()))
            .unwrap_or_default()
    }

    /// Returns `true` if the argument is a quoted string.
    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.token()
            .is_some_and(|token| token.kind() == SyntaxKind::String)
    }

    /// The argument value with quotes and escapes removed.
    #[must_use]
    pub fn value(&self) -> String {
        self.token()
            .map(|token| unquote(token.kind(), token.text()))
            .unwrap_or_default()
    }
}

fn brace(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .find(|token| token.kind() == kind)
}

fn inner_range(
    node: &SyntaxNode,
    l_brace: Option<SyntaxToken>,
    r_brace: Option<SyntaxToken>,
) -> TextRange {
    let range = node.text_range();
    let start = l_brace.map_or(range.start(), |t| t.text_range().end());
    let end = r_brace.map_or(range.end(), |t| t.text_range().start());
    TextRange::new(start, end.max(start))
}

/// Strips quotes from a string token and resolves backslash escapes.
fn unquote(kind: SyntaxKind, text: &str) -> String {
    if kind != SyntaxKind::String || text.len() < 2 {
        return text.to_string();
    }
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other @ ('"' | '\'' | '\\')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn file(source: &str) -> SourceFile {
        parse(source).source_file()
    }

    #[test]
    fn directive_parts() {
        let file = file("listen 80 default_server;");
        let directive = file.directives().next().expect("directive");
        assert_eq!(directive.name().as_deref(), Some("listen"));
        let args: Vec<_> = directive.args().map(|arg| arg.text()).collect();
        assert_eq!(args, vec!["80", "default_server"]);
        assert!(directive.semicolon().is_some());
        assert!(!directive.has_body());
    }

    #[test]
    fn quoted_argument_value() {
        let file = file(r#"add_header X-Test "a \"quoted\" value";"#);
        let directive = file.directives().next().expect("directive");
        let arg = directive.args().nth(1).expect("arg");
        assert!(arg.is_quoted());
        assert_eq!(arg.value(), r#"a "quoted" value"#);
    }

    #[test]
    fn context_path_of_nested_directive() {
        let file = file("http { server { location / { root /srv; } } }");
        let root = file
            .all_directives()
            .find(|d| d.name().as_deref() == Some("root"))
            .expect("root directive");
        assert_eq!(root.context_path(), vec!["http", "server", "location"]);
        assert_eq!(
            root.parent_directive().and_then(|d| d.name()).as_deref(),
            Some("location")
        );
    }

    #[test]
    fn context_path_at_offsets() {
        let source = "http {\n  server {\n    \n  }\n}\n";
        let file = file(source);
        assert!(file.context_path_at(0.into()).is_empty());
        assert_eq!(file.context_path_at(7.into()), vec!["http"]);
        let inside_server = TextSize::from(source.find("    ").unwrap_or(0) as u32 + 2);
        assert_eq!(file.context_path_at(inside_server), vec!["http", "server"]);
        let after_http = TextSize::of(source);
        assert!(file.context_path_at(after_http).is_empty());
    }

    #[test]
    fn unterminated_block_extends_to_end_of_file() {
        let source = "events {\n  ";
        let file = file(source);
        assert_eq!(file.context_path_at(TextSize::of(source)), vec!["events"]);
    }

    #[test]
    fn directive_name_lookup() {
        let file = file("gzip on;\nserver_tokens off;");
        let directive = file.directive_name_at(12.into()).expect("name");
        assert_eq!(directive.name().as_deref(), Some("server_tokens"));
        assert!(file.directive_name_at(6.into()).is_none());
    }

    #[test]
    fn lua_block_inner_range() {
        let source = "content_by_lua_block { ngx.say(\"}\") }";
        let file = file(source);
        let directive = file.directives().next().expect("directive");
        let lua = directive.lua_block().expect("lua body");
        let inner = lua.inner_range();
        assert_eq!(&source[inner], " ngx.say(\"}\") ");
    }
}
