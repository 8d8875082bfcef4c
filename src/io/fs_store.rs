use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;
use crate::io::store::{DocumentStore, NavigationStore, StoreError};
use crate::model::defaults::default_navigation;
use crate::model::document::Documents;
use crate::model::nav::NavNode;
use crate::ops::check::is_valid_id;

/// Documents stored one per file as `<dir>/<id>.md`.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsDocumentStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a document id, rejecting ids that would escape the
    /// directory or hide the file.
    pub fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.md", id)))
    }
}

impl DocumentStore for FsDocumentStore {
    fn load_all(&self) -> Result<Documents, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Documents::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.dir.clone(),
                    source: e,
                });
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| StoreError::ReadError {
                    path: self.dir.clone(),
                    source: e,
                })?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if is_valid_id(id) {
                paths.push((id.to_string(), path));
            }
        }
        paths.sort();

        let mut documents = Documents::new();
        for (id, path) in paths {
            let content = fs::read_to_string(&path)
                .map_err(|e| StoreError::ReadError { path, source: e })?;
            documents.insert(id, content);
        }
        log::debug!("loaded {} documents from {}", documents.len(), self.dir.display());
        Ok(documents)
    }

    fn save(&mut self, id: &str, content: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::WriteError {
            path: self.dir.clone(),
            source: e,
        })?;
        atomic_write(&path, content.as_bytes())
            .map_err(|e| StoreError::WriteError { path, source: e })?;
        log::info!("saved document {}", id);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("deleted document {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::WriteError { path, source: e }),
        }
    }
}

/// The navigation tree as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FsNavigationStore {
    path: PathBuf,
}

impl FsNavigationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FsNavigationStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize a tree the way it is written to disk.
pub fn navigation_to_json(tree: &[NavNode]) -> Result<String, StoreError> {
    let mut json = serde_json::to_string_pretty(tree)?;
    json.push('\n');
    Ok(json)
}

impl NavigationStore for FsNavigationStore {
    fn load(&self) -> Result<Vec<NavNode>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} not found, using seed navigation", self.path.display());
                return Ok(default_navigation());
            }
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&mut self, tree: &[NavNode]) -> Result<(), StoreError> {
        let json = navigation_to_json(tree)?;
        atomic_write(&self.path, json.as_bytes()).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        log::info!("saved navigation ({} root nodes)", tree.len());
        Ok(())
    }
}
