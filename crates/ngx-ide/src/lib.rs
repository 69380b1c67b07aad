//! `ngx-ide` - Editor features for nginx configuration files.
//!
//! Every feature is a pure function over a [`ngx_catalog::Catalog`] and the
//! document text, so the language server and the command-line checker share
//! one implementation:
//!
//! - **Completion**: directive names valid at the cursor
//! - **Hover**: documentation of the overload that applies in place
//! - **Diagnostics**: unknown, misplaced and malformed directives
//! - **Formatting**: re-indentation by block depth
//! - **Smart Enter**: finishing the statement on the current line
//! - **Folding**: blocks and comment runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod completion;
pub mod diagnostics;
pub mod folding;
pub mod formatting;
pub mod hover;
pub mod smart_enter;
pub mod util;

pub use completion::{complete, CompletionItem, CompletionKind, CompletionTextEdit};
pub use diagnostics::{
    collect_diagnostics, collect_diagnostics_with, errors_only, filter_by_severity, has_errors,
    Diagnostic, DiagnosticCode, DiagnosticOptions, DiagnosticSeverity,
};
pub use folding::{folding_ranges, FoldingKind, FoldingRange};
pub use formatting::{format_document, FormatOptions};
pub use hover::{directive_documentation, hover, HoverResult};
pub use smart_enter::{smart_enter, smart_enter_with, SmartEnter};
pub use util::{line_indent_at, offset_to_line_col};
