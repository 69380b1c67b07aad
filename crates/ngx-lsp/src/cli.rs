//! CLI definitions for ngx-lsp.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ngx-lsp",
    version,
    about = "Language server and checker for nginx configuration files",
    after_help = "Examples:\n  ngx-lsp                              # serve over stdio\n  ngx-lsp check /etc/nginx/nginx.conf\n  ngx-lsp check --project ./site conf.d/*.conf"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the language server protocol over stdio (default).
    Serve,
    /// Report diagnostics for configuration files and exit.
    Check {
        /// Files to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Project folder holding `ngx-lsp.toml` (defaults to the current directory).
        #[arg(long)]
        project: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_serve() {
        let cli = Cli::try_parse_from(["ngx-lsp"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn check_requires_files() {
        assert!(Cli::try_parse_from(["ngx-lsp", "check"]).is_err());
        let cli = Cli::try_parse_from(["ngx-lsp", "check", "--project", "site", "a.conf", "b.conf"])
            .expect("parse");
        let Some(Command::Check { files, project }) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(files, [PathBuf::from("a.conf"), PathBuf::from("b.conf")]);
        assert_eq!(project, Some(PathBuf::from("site")));
    }
}
