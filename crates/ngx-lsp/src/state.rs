//! Server state management.
//!
//! Open documents, client settings and per-workspace configuration live
//! behind `parking_lot` locks. The catalog is shared as an `Arc` and only
//! replaced when the workspace configuration is reloaded.

use ngx_catalog::{builtin_arc, Catalog};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower_lsp::lsp_types::Url;

use crate::config::ProjectConfig;

/// A document managed by the server.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document URI.
    pub uri: Url,
    /// The document version.
    pub version: i32,
    /// The document content.
    pub content: String,
}

impl Document {
    /// Creates a new document.
    pub fn new(uri: Url, version: i32, content: String) -> Self {
        Self {
            uri,
            version,
            content,
        }
    }
}

/// The server state.
pub struct ServerState {
    /// Open documents.
    documents: RwLock<FxHashMap<Url, Document>>,
    /// Directive catalog used by every request.
    catalog: RwLock<Arc<Catalog>>,
    /// Current client configuration settings.
    config: RwLock<Value>,
    /// Workspace folders.
    workspace_folders: RwLock<Vec<Url>>,
    /// Workspace configuration per root.
    workspace_configs: RwLock<FxHashMap<Url, ProjectConfig>>,
}

impl ServerState {
    /// Creates a new server state backed by the built-in catalog.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(FxHashMap::default()),
            catalog: RwLock::new(builtin_arc()),
            config: RwLock::new(Value::Null),
            workspace_folders: RwLock::new(Vec::new()),
            workspace_configs: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn open_document(&self, uri: Url, version: i32, content: String) {
        let doc = Document::new(uri.clone(), version, content);
        self.documents.write().insert(uri, doc);
    }

    pub fn update_document(&self, uri: &Url, version: i32, content: String) {
        if let Some(doc) = self.documents.write().get_mut(uri) {
            doc.version = version;
            doc.content = content;
        }
    }

    pub fn get_document(&self, uri: &Url) -> Option<Document> {
        self.documents.read().get(uri).cloned()
    }

    pub fn close_document(&self, uri: &Url) {
        self.documents.write().remove(uri);
    }

    /// URIs of every open document.
    pub fn document_uris(&self) -> Vec<Url> {
        self.documents.read().keys().cloned().collect()
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().clone()
    }

    pub fn set_catalog(&self, catalog: Arc<Catalog>) {
        *self.catalog.write() = catalog;
    }

    pub fn config(&self) -> Value {
        self.config.read().clone()
    }

    pub fn set_config(&self, config: Value) {
        *self.config.write() = config;
    }

    pub fn set_workspace_folders(&self, folders: Vec<Url>) {
        *self.workspace_folders.write() = folders;
    }

    pub fn workspace_folders(&self) -> Vec<Url> {
        self.workspace_folders.read().clone()
    }

    pub fn set_workspace_config(&self, root: Url, config: ProjectConfig) {
        self.workspace_configs.write().insert(root, config);
    }

    pub fn workspace_configs(&self) -> Vec<(Url, ProjectConfig)> {
        self.workspace_configs
            .read()
            .iter()
            .map(|(root, config)| (root.clone(), config.clone()))
            .collect()
    }

    /// The configuration of the deepest workspace root containing `uri`.
    pub fn workspace_config_for_uri(&self, uri: &Url) -> Option<ProjectConfig> {
        let path = uri.to_file_path().ok()?;
        self.workspace_configs
            .read()
            .values()
            .filter(|config| path.starts_with(&config.root))
            .max_by_key(|config| depth(&config.root))
            .cloned()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_round_trip() {
        let state = ServerState::new();
        let uri = Url::parse("file:///etc/nginx/nginx.conf").expect("uri");
        state.open_document(uri.clone(), 1, "user nginx;\n".to_string());
        state.update_document(&uri, 2, "user www;\n".to_string());

        let doc = state.get_document(&uri).expect("document");
        assert_eq!(doc.version, 2);
        assert_eq!(doc.content, "user www;\n");
        assert_eq!(state.document_uris(), vec![uri.clone()]);

        state.close_document(&uri);
        assert!(state.get_document(&uri).is_none());
    }

    #[test]
    fn innermost_workspace_config_wins() {
        let state = ServerState::new();
        let outer = std::env::temp_dir().join("ngx-lsp-state-outer");
        let inner = outer.join("sites");
        let outer_config = ProjectConfig::from_contents(&outer, None, "");
        let mut inner_config = ProjectConfig::from_contents(&inner, None, "");
        inner_config.diagnostics.arguments = false;

        state.set_workspace_config(Url::from_file_path(&outer).expect("url"), outer_config);
        state.set_workspace_config(Url::from_file_path(&inner).expect("url"), inner_config);

        let uri = Url::from_file_path(inner.join("default.conf")).expect("url");
        let config = state.workspace_config_for_uri(&uri).expect("config");
        assert_eq!(config.root, inner);
        assert!(!config.diagnostics.arguments);
    }
}
