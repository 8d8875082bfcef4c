//! Application context: the in-memory tree and documents plus the stores
//! they are persisted to.
//!
//! Every mutating call applies its change in memory first and then persists
//! it. A failed store call is returned as an error (and recorded in the
//! recovery log when one is configured) but the in-memory change is kept, so
//! the caller always sees what the user did.

use std::path::PathBuf;

use crate::io::fs_store::navigation_to_json;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store::{DocumentStore, NavigationStore, StoreError};
use crate::model::config::WorkspaceConfig;
use crate::model::document::{Documents, default_content};
use crate::model::nav::{NavNode, NodeKind};
use crate::model::task::TaskNode;
use crate::ops::ids::{IdGenerator, SequentialIds};
use crate::ops::nav_ops::{self, AddOutcome};
use crate::parse::{encode_document, parse_tasks};

/// Draws from the id generator before giving up on finding an unused id
const MAX_ID_ATTEMPTS: usize = 64;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no node with id {0:?}")]
    NotFound(String),
    #[error("{id:?} is a {kind}, not a task list")]
    NotATaskList { id: String, kind: NodeKind },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What `add_node` did. `node` is the node that was built, whether or not
/// the outcome let it into the tree.
#[derive(Debug, Clone)]
pub struct AddResult {
    pub outcome: AddOutcome,
    pub node: NavNode,
}

/// A document delete that failed during a cascading node delete.
#[derive(Debug)]
pub struct DeleteFailure {
    pub id: String,
    pub error: StoreError,
}

/// Result of a cascading delete. `deleted_ids` is empty when the id was not
/// in the tree.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted_ids: Vec<String>,
    pub failures: Vec<DeleteFailure>,
}

impl DeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Session<D: DocumentStore, N: NavigationStore> {
    tree: Vec<NavNode>,
    documents: Documents,
    docs: D,
    nav: N,
    ids: Box<dyn IdGenerator>,
    config: WorkspaceConfig,
    recovery_dir: Option<PathBuf>,
}

impl<D: DocumentStore, N: NavigationStore> Session<D, N> {
    /// Load the tree and all documents from their stores.
    pub fn open(
        docs: D,
        nav: N,
        ids: Box<dyn IdGenerator>,
        config: WorkspaceConfig,
    ) -> Result<Self, SessionError> {
        let tree = nav.load()?;
        let documents = docs.load_all()?;
        Ok(Session {
            tree,
            documents,
            docs,
            nav,
            ids,
            config,
            recovery_dir: None,
        })
    }

    /// Record payloads of failed store calls in `<dir>/recovery.md`.
    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    pub fn tree(&self) -> &[NavNode] {
        &self.tree
    }

    pub fn documents(&self) -> &Documents {
        &self.documents
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn node(&self, id: &str) -> Option<&NavNode> {
        nav_ops::find_node(&self.tree, id)
    }

    pub fn document(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Add a node of `kind` at the root or under `parent`. An empty or
    /// missing title falls back to the kind's default title. Notes and task
    /// lists get a starter document.
    pub fn add_node(
        &mut self,
        parent: Option<&str>,
        kind: NodeKind,
        title: Option<&str>,
    ) -> Result<AddResult, SessionError> {
        self.add_node_with_icon(parent, kind, title, None)
    }

    pub fn add_node_with_icon(
        &mut self,
        parent: Option<&str>,
        kind: NodeKind,
        title: Option<&str>,
        icon: Option<&str>,
    ) -> Result<AddResult, SessionError> {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => kind.default_title().to_string(),
        };
        let mut node = NavNode::new(self.fresh_id(), title, kind);
        if let Some(icon) = icon {
            node = node.with_icon(icon);
        }

        let outcome = nav_ops::add_node(&mut self.tree, parent, node.clone());
        if !outcome.is_added() {
            return Ok(AddResult { outcome, node });
        }
        log::debug!("added {} {} under {:?}", kind, node.id, parent);

        self.persist_navigation()?;
        let placeholder = &self.config.tasks.root_placeholder;
        if let Some(content) = default_content(kind, &node.title, placeholder) {
            self.documents.insert(node.id.clone(), content.clone());
            self.persist_document(&node.id, &content)?;
        }
        Ok(AddResult { outcome, node })
    }

    /// A generated id that no node or stored document already uses.
    fn fresh_id(&mut self) -> String {
        let mut id = self.ids.next_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !self.id_in_use(&id) {
                return id;
            }
            log::debug!("generated id {} is taken, drawing another", id);
            id = self.ids.next_id();
        }
        if self.id_in_use(&id) {
            log::warn!("no unused id after {} attempts, using {}", MAX_ID_ATTEMPTS, id);
        }
        id
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.documents.contains_key(id) || nav_ops::find_node(&self.tree, id).is_some()
    }

    /// Remove a node and its subtree, then delete every collected document.
    ///
    /// Document deletes continue past failures; each failed id is reported.
    /// A failed navigation save aborts before any document is deleted.
    pub fn delete_node(&mut self, id: &str) -> Result<DeleteReport, SessionError> {
        let ids = nav_ops::collect_subtree_ids(&self.tree, id);
        if ids.is_empty() {
            return Ok(DeleteReport::default());
        }

        nav_ops::remove_node(&mut self.tree, id);
        for removed in &ids {
            self.documents.shift_remove(removed);
        }
        log::debug!("deleted {} ({} nodes)", id, ids.len());
        self.persist_navigation()?;

        let mut failures = Vec::new();
        for doc_id in &ids {
            if let Err(error) = self.docs.delete(doc_id) {
                log::warn!("could not delete document {}: {}", doc_id, error);
                self.record(
                    RecoveryEntry::now(RecoveryCategory::Delete, "document delete failed")
                        .with_field("Id", doc_id.as_str())
                        .with_field("Error", error.to_string()),
                );
                failures.push(DeleteFailure {
                    id: doc_id.clone(),
                    error,
                });
            }
        }

        Ok(DeleteReport {
            deleted_ids: ids,
            failures,
        })
    }

    /// Returns false (and persists nothing) if the id is absent.
    pub fn rename_node(&mut self, id: &str, title: &str) -> Result<bool, SessionError> {
        if !nav_ops::rename_node(&mut self.tree, id, title) {
            return Ok(false);
        }
        self.persist_navigation()?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    /// Replace a document's content. The id need not be in the tree.
    pub fn save_document(&mut self, id: &str, content: &str) -> Result<(), SessionError> {
        self.documents.insert(id.to_string(), content.to_string());
        self.persist_document(id, content)
    }

    /// Decode a task list document. Items are numbered `1`, `2`, ... in
    /// document order, so the same text always yields the same ids.
    pub fn tasks(&self, id: &str) -> Result<Vec<TaskNode>, SessionError> {
        self.task_node(id)?;
        let content = self.document(id).unwrap_or_default();
        Ok(parse_tasks(content, &mut SequentialIds::new("")))
    }

    /// Decode a task list, let `f` edit it, and save the re-encoded document
    /// under the node's title. New items `f` creates take numbers after the
    /// existing ones.
    pub fn edit_tasks<R>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Vec<TaskNode>, &mut SequentialIds) -> R,
    ) -> Result<R, SessionError> {
        let title = self.task_node(id)?.title.clone();
        let mut ids = SequentialIds::new("");
        let content = self.document(id).unwrap_or_default();
        let mut tasks = parse_tasks(content, &mut ids);

        let result = f(&mut tasks, &mut ids);

        let encoded = encode_document(&title, &tasks);
        self.save_document(id, &encoded)?;
        Ok(result)
    }

    fn task_node(&self, id: &str) -> Result<&NavNode, SessionError> {
        let node = self
            .node(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        match node.kind() {
            NodeKind::Task => Ok(node),
            kind => Err(SessionError::NotATaskList {
                id: id.to_string(),
                kind,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn persist_navigation(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.nav.save(&self.tree) {
            log::warn!("navigation save failed: {}", e);
            let body = navigation_to_json(&self.tree).unwrap_or_default();
            self.record(
                RecoveryEntry::now(RecoveryCategory::Write, "navigation save failed")
                    .with_field("Error", e.to_string())
                    .with_body(body),
            );
            return Err(e.into());
        }
        Ok(())
    }

    fn persist_document(&mut self, id: &str, content: &str) -> Result<(), SessionError> {
        if let Err(e) = self.docs.save(id, content) {
            log::warn!("document {} save failed: {}", id, e);
            self.record(
                RecoveryEntry::now(RecoveryCategory::Write, "document save failed")
                    .with_field("Id", id)
                    .with_field("Error", e.to_string())
                    .with_body(content),
            );
            return Err(e.into());
        }
        Ok(())
    }

    fn record(&self, entry: RecoveryEntry) {
        if let Some(dir) = &self.recovery_dir {
            log_recovery(dir, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::read_recovery_entries;
    use crate::io::store::{MemoryDocumentStore, MemoryNavigationStore};
    use crate::ops::task_ops;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    /// Document store that refuses to touch listed ids.
    #[derive(Default)]
    struct FlakyDocs {
        inner: MemoryDocumentStore,
        broken: Vec<String>,
    }

    impl DocumentStore for FlakyDocs {
        fn load_all(&self) -> Result<Documents, StoreError> {
            self.inner.load_all()
        }

        fn save(&mut self, id: &str, content: &str) -> Result<(), StoreError> {
            if self.broken.iter().any(|b| b == id) {
                return Err(StoreError::Unavailable(format!("save {}", id)));
            }
            self.inner.save(id, content)
        }

        fn delete(&mut self, id: &str) -> Result<(), StoreError> {
            if self.broken.iter().any(|b| b == id) {
                return Err(StoreError::Unavailable(format!("delete {}", id)));
            }
            self.inner.delete(id)
        }
    }

    struct DownNav;

    impl NavigationStore for DownNav {
        fn load(&self) -> Result<Vec<NavNode>, StoreError> {
            Ok(vec![NavNode::folder("f", "Folder")])
        }

        fn save(&mut self, _tree: &[NavNode]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("navigation".into()))
        }
    }

    fn tree() -> Vec<NavNode> {
        vec![
            NavNode::folder("a", "A").with_children(vec![
                NavNode::note("a1", "A1"),
                NavNode::folder("a2", "A2").with_children(vec![NavNode::task("a2x", "A2x")]),
            ]),
            NavNode::note("b", "B"),
        ]
    }

    fn docs() -> Documents {
        let mut docs = Documents::new();
        docs.insert("a1".into(), "# A1\n".into());
        docs.insert("a2x".into(), "# A2x\n\n- [ ] one\n  - [x] two\n- [ ] three\n".into());
        docs.insert("b".into(), "# B\n".into());
        docs
    }

    fn session() -> Session<MemoryDocumentStore, MemoryNavigationStore> {
        Session::open(
            MemoryDocumentStore::new(docs()),
            MemoryNavigationStore::new(tree()),
            Box::new(SequentialIds::new("n")),
            WorkspaceConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_open_loads_both_stores() {
        let s = session();
        assert_eq!(s.tree(), tree().as_slice());
        assert_eq!(s.document("b"), Some("# B\n"));
    }

    #[test]
    fn test_add_note_creates_document() {
        let mut s = session();
        let result = s.add_node(Some("a2"), NodeKind::Note, Some("Runbook")).unwrap();
        assert_eq!(result.outcome, AddOutcome::Added);
        assert_eq!(result.node.id, "n1");
        assert_eq!(s.node("n1").map(|n| n.title.as_str()), Some("Runbook"));
        assert_eq!(s.document("n1"), Some("# Runbook\n\n"));
        assert_eq!(s.docs.documents.get("n1").map(String::as_str), Some("# Runbook\n\n"));
        assert_eq!(s.nav.tree.as_deref(), Some(s.tree()));
    }

    #[test]
    fn test_add_task_list_default_title() {
        let mut s = session();
        let result = s.add_node(None, NodeKind::Task, Some("  ")).unwrap();
        assert_eq!(result.node.title, "New task list");
        assert_eq!(s.document("n1"), Some("# New task list\n\n- [ ] New task\n"));
        assert_eq!(s.tree().last().map(|n| n.id.as_str()), Some("n1"));
    }

    #[test]
    fn test_add_folder_has_no_document() {
        let mut s = session();
        s.add_node(None, NodeKind::Folder, None).unwrap();
        assert_eq!(s.document("n1"), None);
    }

    #[test]
    fn test_add_with_icon() {
        let mut s = session();
        let result = s
            .add_node_with_icon(None, NodeKind::Section, Some("Ops"), Some("terminal"))
            .unwrap();
        assert_eq!(result.node.icon.as_deref(), Some("terminal"));
    }

    #[test]
    fn test_add_skips_ids_already_in_use() {
        // "a1" and "a2" are taken by nodes in the tree
        let mut s = Session::open(
            MemoryDocumentStore::new(docs()),
            MemoryNavigationStore::new(tree()),
            Box::new(SequentialIds::new("a")),
            WorkspaceConfig::default(),
        )
        .unwrap();
        let first = s.add_node(None, NodeKind::Folder, Some("One")).unwrap();
        assert_eq!(first.node.id, "a3");

        // A stored document without a node also reserves its id
        s.save_document("a4", "# stray\n").unwrap();
        let second = s.add_node(None, NodeKind::Note, Some("Two")).unwrap();
        assert_eq!(second.node.id, "a5");
        assert_eq!(s.document("a4"), Some("# stray\n"));

        let ids = nav_ops::all_ids(s.tree());
        let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_add_refused_persists_nothing() {
        let mut s = session();
        let missing = s.add_node(Some("nope"), NodeKind::Note, None).unwrap();
        assert_eq!(missing.outcome, AddOutcome::ParentNotFound);
        let leaf = s.add_node(Some("b"), NodeKind::Note, None).unwrap();
        assert_eq!(leaf.outcome, AddOutcome::ParentNotContainer);
        assert_eq!(s.tree(), tree().as_slice());
        assert_eq!(s.nav.tree, Some(tree()));
        assert_eq!(s.documents().len(), 3);
    }

    #[test]
    fn test_delete_cascades_documents() {
        let mut s = session();
        let report = s.delete_node("a").unwrap();
        assert_eq!(report.deleted_ids, vec!["a", "a1", "a2", "a2x"]);
        assert!(report.is_complete());
        assert_eq!(s.tree(), &[NavNode::note("b", "B")]);
        let stored: Vec<&str> = s.docs.documents.keys().map(String::as_str).collect();
        assert_eq!(stored, vec!["b"]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut s = session();
        let report = s.delete_node("zzz").unwrap();
        assert!(report.deleted_ids.is_empty());
        assert_eq!(s.tree(), tree().as_slice());
    }

    #[test]
    fn test_delete_reports_each_failure() {
        let tmp = TempDir::new().unwrap();
        let flaky = FlakyDocs {
            inner: MemoryDocumentStore::new(docs()),
            broken: vec!["a1".into(), "a2x".into()],
        };
        let mut s = Session::open(
            flaky,
            MemoryNavigationStore::new(tree()),
            Box::new(SequentialIds::new("n")),
            WorkspaceConfig::default(),
        )
        .unwrap()
        .with_recovery_dir(tmp.path());

        let report = s.delete_node("a").unwrap();
        assert_eq!(report.deleted_ids.len(), 4);
        let failed: Vec<&str> = report.failures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(failed, vec!["a1", "a2x"]);
        // optimistic: the tree change stands
        assert!(s.node("a").is_none());

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, RecoveryCategory::Delete);
    }

    #[test]
    fn test_failed_navigation_save_keeps_memory_state() {
        let tmp = TempDir::new().unwrap();
        let mut s = Session::open(
            MemoryDocumentStore::default(),
            DownNav,
            Box::new(SequentialIds::new("n")),
            WorkspaceConfig::default(),
        )
        .unwrap()
        .with_recovery_dir(tmp.path());

        let err = s.rename_node("f", "Renamed").unwrap_err();
        assert!(matches!(err, SessionError::Store(StoreError::Unavailable(_))));
        assert_eq!(s.node("f").map(|n| n.title.as_str()), Some("Renamed"));

        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].body.contains("Renamed"));
    }

    #[test]
    fn test_failed_document_save_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let flaky = FlakyDocs {
            broken: vec!["b".into()],
            ..Default::default()
        };
        let mut s = Session::open(
            flaky,
            MemoryNavigationStore::new(tree()),
            Box::new(SequentialIds::new("n")),
            WorkspaceConfig::default(),
        )
        .unwrap()
        .with_recovery_dir(tmp.path());

        assert!(s.save_document("b", "# B\n\nedited\n").is_err());
        assert_eq!(s.document("b"), Some("# B\n\nedited\n"));
        let entries = read_recovery_entries(tmp.path(), None);
        assert_eq!(entries[0].body, "# B\n\nedited");
    }

    #[test]
    fn test_rename() {
        let mut s = session();
        assert!(s.rename_node("a2x", "Launch").unwrap());
        assert!(!s.rename_node("zzz", "x").unwrap());
        assert_eq!(s.node("a2x").map(|n| n.title.as_str()), Some("Launch"));
    }

    #[test]
    fn test_tasks_are_numbered_in_document_order() {
        let s = session();
        let tasks = s.tasks("a2x").unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].children[0].id, "2");
        assert_eq!(tasks[1].id, "3");
        // stable across reads
        assert_eq!(s.tasks("a2x").unwrap()[1].id, "3");
    }

    #[test]
    fn test_tasks_rejects_non_task_nodes() {
        let s = session();
        assert!(matches!(s.tasks("b"), Err(SessionError::NotATaskList { .. })));
        assert!(matches!(s.tasks("zzz"), Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_edit_tasks_reencodes_with_title() {
        let mut s = session();
        let toggled = s.edit_tasks("a2x", |tasks, _| task_ops::toggle(tasks, "1")).unwrap();
        assert_eq!(toggled, Some(true));
        assert_eq!(
            s.document("a2x"),
            Some("# A2x\n\n- [x] one\n  - [x] two\n- [ ] three\n")
        );
    }

    #[test]
    fn test_edit_tasks_new_ids_follow_existing() {
        let mut s = session();
        let id = s
            .edit_tasks("a2x", |tasks, ids| task_ops::add_root(tasks, ids, "four"))
            .unwrap();
        assert_eq!(id, "4");
        assert!(s.document("a2x").unwrap().ends_with("- [ ] three\n- [ ] four\n"));
    }
}
