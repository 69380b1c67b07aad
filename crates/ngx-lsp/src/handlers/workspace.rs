//! Workspace configuration handlers.

use serde_json::json;
use std::path::Path;
use tower_lsp::lsp_types::{
    DidChangeConfigurationParams, DidChangeWatchedFilesParams, MessageType, Registration,
};
use tower_lsp::Client;
use tracing::info;

use crate::config::{build_catalog, ProjectConfig, CONFIG_FILES};
use crate::state::ServerState;

use super::diagnostics::publish_diagnostics;

pub async fn register_file_watchers(client: &Client) {
    let watchers: Vec<_> = CONFIG_FILES
        .iter()
        .map(|name| json!({ "globPattern": format!("**/{name}") }))
        .collect();

    let registration = Registration {
        id: "ngx-lsp-watchers".to_string(),
        method: "workspace/didChangeWatchedFiles".to_string(),
        register_options: Some(json!({ "watchers": watchers })),
    };
    if let Err(err) = client.register_capability(vec![registration]).await {
        client
            .log_message(
                MessageType::WARNING,
                format!("Failed to register file watchers: {err}"),
            )
            .await;
    }
}

/// Loads the project file of every workspace folder and rebuilds the catalog.
pub fn load_workspace_configs(state: &ServerState) {
    for folder in state.workspace_folders() {
        let Ok(root) = folder.to_file_path() else {
            continue;
        };
        let config = ProjectConfig::load(&root);
        if let Some(path) = &config.config_path {
            info!("Loaded project config from {}", path.display());
        }
        state.set_workspace_config(folder, config);
    }
    let mut configs = state.workspace_configs();
    configs.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
    state.set_catalog(build_catalog(configs.iter().map(|(_, config)| config)));
}

pub fn did_change_configuration(state: &ServerState, params: DidChangeConfigurationParams) {
    state.set_config(params.settings);
    info!("Updated workspace configuration");
}

pub async fn did_change_watched_files(
    client: &Client,
    state: &ServerState,
    params: DidChangeWatchedFilesParams,
) {
    let config_changed = params.changes.iter().any(|change| {
        change
            .uri
            .to_file_path()
            .is_ok_and(|path| is_config_file(&path))
    });
    if !config_changed {
        return;
    }

    client
        .log_message(
            MessageType::INFO,
            "Project config changed; reloading".to_string(),
        )
        .await;
    load_workspace_configs(state);
    refresh_diagnostics(client, state).await;
}

/// Re-publishes diagnostics for every open document.
pub async fn refresh_diagnostics(client: &Client, state: &ServerState) {
    for uri in state.document_uris() {
        if let Some(doc) = state.get_document(&uri) {
            publish_diagnostics(client, state, &doc).await;
        }
    }
}

fn is_config_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| CONFIG_FILES.contains(&name))
}
