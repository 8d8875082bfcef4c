use indexmap::IndexMap;

use super::nav::NodeKind;

/// Document content keyed by node id, in load order
pub type Documents = IndexMap<String, String>;

/// Content written for a freshly added node, if its kind owns a document.
pub fn default_content(kind: NodeKind, title: &str, task_placeholder: &str) -> Option<String> {
    match kind {
        NodeKind::Note => Some(format!("# {}\n\n", title)),
        NodeKind::Task => Some(format!("# {}\n\n- [ ] {}\n", title, task_placeholder)),
        NodeKind::Folder | NodeKind::Section => None,
    }
}

/// Content shown for a node that has no stored document yet
pub fn placeholder_content(title: &str) -> String {
    format!("# {}\n", title)
}
