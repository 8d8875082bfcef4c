use std::fs;
use std::path::{Path, PathBuf};

use crate::io::fs_store::{FsDocumentStore, FsNavigationStore};
use crate::io::recovery::atomic_write;
use crate::io::store::{DocumentStore, NavigationStore, StoreError};
use crate::model::config::WorkspaceConfig;
use crate::model::defaults::{default_documents, default_navigation};

pub const FOLIO_DIR: &str = "folio";
pub const CONFIG_FILE: &str = "folio.toml";
pub const NAVIGATION_FILE: &str = "navigation.json";
pub const DOCS_DIR: &str = "docs";

const CONFIG_TEMPLATE: &str = r##"[workspace]
name = "{name}"

[ids]
# Hex characters of a random UUID used for new node ids (8..=32)
length = 12

[tasks]
root_placeholder = "New task"
child_placeholder = "New subtask"
"##;

/// Error type for workspace I/O
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a folio workspace: no folio/folio.toml found")]
    NotAWorkspace,
    #[error("workspace already exists at {0} (use --force to reinitialize)")]
    AlreadyExists(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse folio.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A located workspace and its configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub folio_dir: PathBuf,
    pub config: WorkspaceConfig,
}

impl Workspace {
    pub fn document_store(&self) -> FsDocumentStore {
        FsDocumentStore::new(self.folio_dir.join(DOCS_DIR))
    }

    pub fn navigation_store(&self) -> FsNavigationStore {
        FsNavigationStore::new(self.folio_dir.join(NAVIGATION_FILE))
    }
}

/// Walk up from `start` looking for `folio/folio.toml`.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(FOLIO_DIR).join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Read and parse `folio.toml`.
pub fn load_config(folio_dir: &Path) -> Result<WorkspaceConfig, WorkspaceError> {
    let path = folio_dir.join(CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|e| WorkspaceError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Open the workspace rooted at `root`.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let folio_dir = root.join(FOLIO_DIR);
    if !folio_dir.join(CONFIG_FILE).is_file() {
        return Err(WorkspaceError::NotAWorkspace);
    }
    let config = load_config(&folio_dir)?;
    log::debug!("loaded workspace {:?} at {}", config.workspace.name, root.display());
    Ok(Workspace {
        root: root.to_path_buf(),
        folio_dir,
        config,
    })
}

pub fn render_config(name: &str) -> String {
    CONFIG_TEMPLATE.replace("{name}", &name.replace('"', "'"))
}

/// Infer a workspace name from a directory name: hyphens become spaces,
/// words are capitalized.
pub fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Options for [`init_workspace`].
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub name: Option<String>,
    /// Start with an empty tree instead of the seed content
    pub empty: bool,
    /// Overwrite config and navigation of an existing workspace
    pub force: bool,
}

/// Create `<root>/folio/` with config, navigation and (unless empty) the
/// seed documents.
pub fn init_workspace(root: &Path, opts: &InitOptions) -> Result<Workspace, WorkspaceError> {
    let folio_dir = root.join(FOLIO_DIR);
    if folio_dir.join(CONFIG_FILE).exists() && !opts.force {
        return Err(WorkspaceError::AlreadyExists(folio_dir));
    }
    fs::create_dir_all(folio_dir.join(DOCS_DIR))?;

    let name = opts.name.clone().unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Docs".to_string())
    });
    atomic_write(&folio_dir.join(CONFIG_FILE), render_config(&name).as_bytes())?;

    let workspace = load_workspace(root)?;
    let (tree, documents) = if opts.empty {
        (Vec::new(), Default::default())
    } else {
        (default_navigation(), default_documents())
    };

    workspace.navigation_store().save(&tree)?;
    let mut docs = workspace.document_store();
    for (id, content) in &documents {
        docs.save(id, content)?;
    }
    log::info!("initialized workspace {:?} in {}", name, folio_dir.display());
    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("team-notes"), "Team Notes");
        assert_eq!(infer_name("docs"), "Docs");
        assert_eq!(infer_name("my_wiki"), "My Wiki");
    }

    #[test]
    fn test_render_config_parses() {
        let config: WorkspaceConfig = toml::from_str(&render_config("Say \"hi\"")).unwrap();
        assert_eq!(config.workspace.name, "Say 'hi'");
        assert_eq!(config.ids.length, 12);
        assert_eq!(config.tasks.root_placeholder, "New task");
    }

    #[test]
    fn test_init_and_load() {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(
            tmp.path(),
            &InitOptions {
                name: Some("Handbook".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(ws.config.workspace.name, "Handbook");

        let tree = ws.navigation_store().load().unwrap();
        assert_eq!(tree, default_navigation());
        let docs = ws.document_store().load_all().unwrap();
        assert_eq!(docs.len(), default_documents().len());
        assert!(tmp.path().join("folio/docs/overview.md").is_file());
    }

    #[test]
    fn test_init_empty() {
        let tmp = TempDir::new().unwrap();
        let ws = init_workspace(
            tmp.path(),
            &InitOptions {
                empty: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(ws.navigation_store().load().unwrap().is_empty());
        assert!(ws.document_store().load_all().unwrap().is_empty());
    }

    #[test]
    fn test_init_twice_needs_force() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), &InitOptions::default()).unwrap();
        assert!(matches!(
            init_workspace(tmp.path(), &InitOptions::default()),
            Err(WorkspaceError::AlreadyExists(_))
        ));
        let forced = InitOptions {
            force: true,
            empty: true,
            ..Default::default()
        };
        assert!(init_workspace(tmp.path(), &forced).is_ok());
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), &InitOptions::default()).unwrap();
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(discover_workspace(&nested).unwrap(), tmp.path());
    }

    #[test]
    fn test_discover_none() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            discover_workspace(tmp.path()),
            Err(WorkspaceError::NotAWorkspace)
        ));
    }

    #[test]
    fn test_load_bad_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("folio")).unwrap();
        fs::write(tmp.path().join("folio/folio.toml"), "[ids]\nlength = \"x\"\n").unwrap();
        assert!(matches!(
            load_workspace(tmp.path()),
            Err(WorkspaceError::ConfigParseError(_))
        ));
    }
}
