use std::path::PathBuf;

use crate::model::defaults::default_navigation;
use crate::model::document::Documents;
use crate::model::nav::NavNode;

/// Error type for document and navigation stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid document id {0:?}")]
    InvalidId(String),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse navigation: {0}")]
    NavigationParseError(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for document contents, keyed by node id.
pub trait DocumentStore {
    /// Every stored document.
    fn load_all(&self) -> Result<Documents, StoreError>;

    /// Create or replace one document.
    fn save(&mut self, id: &str, content: &str) -> Result<(), StoreError>;

    /// Remove one document. Removing a missing id is not an error.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Persistence for the whole navigation tree.
pub trait NavigationStore {
    fn load(&self) -> Result<Vec<NavNode>, StoreError>;

    fn save(&mut self, tree: &[NavNode]) -> Result<(), StoreError>;
}

/// Documents held in memory. Used by tests and as a scratch backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    pub documents: Documents,
}

impl MemoryDocumentStore {
    pub fn new(documents: Documents) -> Self {
        MemoryDocumentStore { documents }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load_all(&self) -> Result<Documents, StoreError> {
        Ok(self.documents.clone())
    }

    fn save(&mut self, id: &str, content: &str) -> Result<(), StoreError> {
        self.documents.insert(id.to_string(), content.to_string());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.documents.shift_remove(id);
        Ok(())
    }
}

/// Navigation held in memory. `None` means nothing saved yet, which loads
/// as the seed tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryNavigationStore {
    pub tree: Option<Vec<NavNode>>,
}

impl MemoryNavigationStore {
    pub fn new(tree: Vec<NavNode>) -> Self {
        MemoryNavigationStore { tree: Some(tree) }
    }
}

impl NavigationStore for MemoryNavigationStore {
    fn load(&self) -> Result<Vec<NavNode>, StoreError> {
        Ok(self.tree.clone().unwrap_or_else(default_navigation))
    }

    fn save(&mut self, tree: &[NavNode]) -> Result<(), StoreError> {
        self.tree = Some(tree.to_vec());
        Ok(())
    }
}
