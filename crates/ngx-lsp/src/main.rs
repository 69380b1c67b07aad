//! `ngx-lsp` - Language Server Protocol implementation for nginx configuration files.
//!
//! This is the main entry point for the language server and the `check`
//! command.

mod check;
mod cli;
mod config;
mod handlers;
mod state;

use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::handlers::SMART_ENTER_COMMAND;
use crate::state::ServerState;

/// The main language server struct.
pub struct NgxLanguageServer {
    /// LSP client for sending notifications.
    client: Client,
    /// Server state.
    state: Arc<ServerState>,
}

impl NgxLanguageServer {
    /// Creates a new language server instance.
    fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(ServerState::new()),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for NgxLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("nginx language server initializing");

        let mut workspace_folders = Vec::new();
        if let Some(folders) = params.workspace_folders {
            workspace_folders.extend(folders.into_iter().map(|folder| folder.uri));
        } else if let Some(root_uri) = params.root_uri {
            workspace_folders.push(root_uri);
        }

        if !workspace_folders.is_empty() {
            info!("Workspace folders: {:?}", workspace_folders);
            self.state.set_workspace_folders(workspace_folders);
        }
        handlers::load_workspace_configs(&self.state);

        if let Some(options) = params.initialization_options {
            self.state.set_config(options);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(false),
                        })),
                        ..Default::default()
                    },
                )),

                hover_provider: Some(HoverProviderCapability::Simple(true)),

                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    ..Default::default()
                }),

                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![SMART_ENTER_COMMAND.to_string()],
                    ..Default::default()
                }),

                document_formatting_provider: Some(OneOf::Left(true)),

                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),

                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "ngx-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("nginx language server initialized");
        self.client
            .log_message(MessageType::INFO, "nginx language server initialized")
            .await;
        handlers::register_file_watchers(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("nginx language server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::did_change_configuration(&self.state, params);
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handlers::did_change_watched_files(&self.client, &self.state, params).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handlers::did_open(&self.client, &self.state, params).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handlers::did_change(&self.client, &self.state, params).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        handlers::did_save(&self.client, &self.state, params).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handlers::did_close(&self.client, &self.state, params).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        Ok(handlers::hover(&self.state, params))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        Ok(handlers::completion(&self.state, params))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        Ok(handlers::folding_range(&self.state, params))
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        Ok(handlers::formatting(&self.state, params))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        Ok(handlers::execute_command(&self.client, &self.state, params).await)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Command::Check { files, project }) => {
            if check::run(&files, project)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Serve) | None => {
            info!("Starting nginx language server");

            let stdin = tokio::io::stdin();
            let stdout = tokio::io::stdout();

            let (service, socket) = LspService::new(NgxLanguageServer::new);
            Server::new(stdin, stdout, socket).serve(service).await;
            Ok(())
        }
    }
}
