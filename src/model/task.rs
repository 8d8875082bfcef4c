use serde::{Deserialize, Serialize};

/// A checklist item in a task document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskNode {
    /// Identifier, unique within the owning task tree
    pub id: String,
    /// Item text (everything after the checkbox)
    pub text: String,
    /// Checkbox state
    pub completed: bool,
    /// Nested items, in document order. Empty means leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    /// Create an unchecked leaf item
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        TaskNode {
            id: id.into(),
            text: text.into(),
            completed: false,
            children: Vec::new(),
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_children(mut self, children: Vec<TaskNode>) -> Self {
        self.children = children;
        self
    }

    /// Whether this item renders as a group header
    pub fn is_group(&self) -> bool {
        is_group(&self.text)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Equality is structural: ids are regenerated on every decode and are not
/// part of the markdown document.
impl PartialEq for TaskNode {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.completed == other.completed
            && self.children == other.children
    }
}

impl Eq for TaskNode {}

/// Group header rule: the text has a `:` and is not an inline-code reference.
pub fn is_group(text: &str) -> bool {
    text.contains(':') && !text.starts_with('`')
}

/// Split a group header into its emphasized prefix and the remainder.
///
/// `"Backend: wire the API"` → `Some(("Backend", " wire the API"))`.
/// Returns `None` for text that is not a group header.
pub fn group_parts(text: &str) -> Option<(&str, &str)> {
    if !is_group(text) {
        return None;
    }
    text.split_once(':')
}
