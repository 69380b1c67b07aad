//! LSP request handlers.
//!
//! This module wires handler submodules together.

mod commands;
mod diagnostics;
mod features;
mod formatting;
mod lsp_utils;
mod sync;
mod workspace;

pub use commands::{execute_command, SMART_ENTER_COMMAND};
pub use features::{completion, folding_range, hover};
pub use formatting::formatting;
pub use sync::{did_change, did_close, did_open, did_save};
pub use workspace::{
    did_change_configuration, did_change_watched_files, load_workspace_configs,
    refresh_diagnostics, register_file_watchers,
};
