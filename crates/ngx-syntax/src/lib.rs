//! `ngx-syntax` - Lexer, parser, and concrete syntax tree for nginx configuration files.
//!
//! This crate provides the low-level syntactic analysis for configuration
//! source:
//!
//! - **Lexer**: Tokenizes source text into a stream of tokens
//! - **Parser**: Builds a concrete syntax tree (CST) from tokens
//! - **Syntax Tree**: Lossless representation of the source code
//! - **AST**: Typed views used by IDE features, including context paths
//!
//! # Design Principles
//!
//! The crate follows the design of `rust-analyzer` and uses the `rowan`
//! library for building lossless syntax trees:
//!
//! - **Lossless**: All source text is preserved, including whitespace and comments
//! - **Error-tolerant**: Parsing continues after errors, producing a partial tree
//!
//! # Example
//!
//! ```
//! use ngx_syntax::parser::parse;
//! use ngx_syntax::text_size::TextSize;
//!
//! let source = "http {\n    server {\n        listen 80;\n    }\n}\n";
//! let parse = parse(source);
//! assert!(parse.ok());
//!
//! let file = parse.source_file();
//! let offset = TextSize::from(source.find("listen").unwrap() as u32);
//! assert_eq!(file.context_path_at(offset), vec!["http", "server"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod syntax;
mod token_kinds;

pub use lexer::{lex, Lexer, Token, TokenKind};
pub use parser::{parse, Parse, ParseError};
pub use syntax::{NginxLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use text_size;
