use serde::{Deserialize, Serialize};

/// The type tag of a navigation node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Section,
    Folder,
    Note,
    Task,
}

impl NodeKind {
    /// Folders and sections own children; notes and task lists own a document.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Section | NodeKind::Folder)
    }

    /// Title given to a freshly added node when the caller supplies none
    pub fn default_title(self) -> &'static str {
        match self {
            NodeKind::Section => "New section",
            NodeKind::Folder => "New folder",
            NodeKind::Note => "New note",
            NodeKind::Task => "New task list",
        }
    }

    pub fn parse(s: &str) -> Option<NodeKind> {
        match s {
            "section" => Some(NodeKind::Section),
            "folder" => Some(NodeKind::Folder),
            "note" => Some(NodeKind::Note),
            "task" | "tasks" => Some(NodeKind::Task),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Section => write!(f, "section"),
            NodeKind::Folder => write!(f, "folder"),
            NodeKind::Note => write!(f, "note"),
            NodeKind::Task => write!(f, "task"),
        }
    }
}

/// What a node is, and what it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeBody {
    Section { children: Vec<NavNode> },
    Folder { children: Vec<NavNode> },
    Note,
    Task,
}

/// An entry in the navigation tree.
///
/// The tree owns its children outright; there are no parent links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNavNode", into = "RawNavNode")]
pub struct NavNode {
    pub id: String,
    pub title: String,
    /// Presentation tag (e.g. `terminal`, `code`), opaque to the engine
    pub icon: Option<String>,
    pub body: NodeBody,
}

impl NavNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        let body = match kind {
            NodeKind::Section => NodeBody::Section { children: Vec::new() },
            NodeKind::Folder => NodeBody::Folder { children: Vec::new() },
            NodeKind::Note => NodeBody::Note,
            NodeKind::Task => NodeBody::Task,
        };
        NavNode {
            id: id.into(),
            title: title.into(),
            icon: None,
            body,
        }
    }

    pub fn folder(id: impl Into<String>, title: impl Into<String>) -> Self {
        NavNode::new(id, title, NodeKind::Folder)
    }

    pub fn section(id: impl Into<String>, title: impl Into<String>) -> Self {
        NavNode::new(id, title, NodeKind::Section)
    }

    pub fn note(id: impl Into<String>, title: impl Into<String>) -> Self {
        NavNode::new(id, title, NodeKind::Note)
    }

    pub fn task(id: impl Into<String>, title: impl Into<String>) -> Self {
        NavNode::new(id, title, NodeKind::Task)
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Replace the children of a container. Leaves ignore this.
    pub fn with_children(mut self, nodes: Vec<NavNode>) -> Self {
        if let Some(children) = self.children_mut() {
            *children = nodes;
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Section { .. } => NodeKind::Section,
            NodeBody::Folder { .. } => NodeKind::Folder,
            NodeBody::Note => NodeKind::Note,
            NodeBody::Task => NodeKind::Task,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Children of a container; leaves have none.
    pub fn children(&self) -> &[NavNode] {
        match &self.body {
            NodeBody::Section { children } | NodeBody::Folder { children } => children,
            NodeBody::Note | NodeBody::Task => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<NavNode>> {
        match &mut self.body {
            NodeBody::Section { children } | NodeBody::Folder { children } => Some(children),
            NodeBody::Note | NodeBody::Task => None,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON shape
// ---------------------------------------------------------------------------

/// Wire form: `{ id, title, type?, icon?, children? }`.
///
/// Older files carry no `type`; a node with `children` is then a folder and
/// anything else a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNavNode {
    id: String,
    title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<RawNavNode>>,
}

/// Error for JSON that cannot be expressed as a typed node
#[derive(Debug, thiserror::Error)]
#[error("{kind} node {id:?} cannot have children")]
pub struct LeafWithChildren {
    pub id: String,
    pub kind: NodeKind,
}

impl TryFrom<RawNavNode> for NavNode {
    type Error = LeafWithChildren;

    fn try_from(raw: RawNavNode) -> Result<Self, Self::Error> {
        let kind = match raw.kind {
            Some(kind) => kind,
            None if raw.children.is_some() => NodeKind::Folder,
            None => NodeKind::Note,
        };

        let children = raw
            .children
            .unwrap_or_default()
            .into_iter()
            .map(NavNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let body = match kind {
            NodeKind::Section => NodeBody::Section { children },
            NodeKind::Folder => NodeBody::Folder { children },
            NodeKind::Note | NodeKind::Task => {
                if !children.is_empty() {
                    return Err(LeafWithChildren { id: raw.id, kind });
                }
                if kind == NodeKind::Note {
                    NodeBody::Note
                } else {
                    NodeBody::Task
                }
            }
        };

        Ok(NavNode {
            id: raw.id,
            title: raw.title,
            icon: raw.icon,
            body,
        })
    }
}

impl From<NavNode> for RawNavNode {
    fn from(node: NavNode) -> Self {
        let kind = node.kind();
        let children = match node.body {
            NodeBody::Section { children } | NodeBody::Folder { children } => {
                Some(children.into_iter().map(RawNavNode::from).collect())
            }
            NodeBody::Note | NodeBody::Task => None,
        };
        RawNavNode {
            id: node.id,
            title: node.title,
            kind: Some(kind),
            icon: node.icon,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_container_kinds() {
        assert!(NodeKind::Folder.is_container());
        assert!(NodeKind::Section.is_container());
        assert!(!NodeKind::Note.is_container());
        assert!(!NodeKind::Task.is_container());
    }

    #[test]
    fn test_leaf_ignores_with_children() {
        let note = NavNode::note("n", "Note").with_children(vec![NavNode::note("x", "X")]);
        assert!(note.children().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let tree = NavNode::folder("intro", "Introduction")
            .with_icon("file")
            .with_children(vec![NavNode::note("overview", "Overview")]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "intro",
                "title": "Introduction",
                "type": "folder",
                "icon": "file",
                "children": [
                    { "id": "overview", "title": "Overview", "type": "note" }
                ]
            })
        );
    }

    #[test]
    fn test_empty_container_keeps_children_field() {
        let json = serde_json::to_value(NavNode::section("s", "S")).unwrap();
        assert_eq!(json["children"], serde_json::json!([]));
    }

    #[test]
    fn test_untyped_json_is_inferred() {
        let text = r#"[
            { "id": "intro", "title": "Intro", "icon": "file",
              "children": [ { "id": "overview", "title": "Overview" } ] },
            { "id": "empty", "title": "Empty", "children": [] }
        ]"#;
        let tree: Vec<NavNode> = serde_json::from_str(text).unwrap();
        assert_eq!(tree[0].kind(), NodeKind::Folder);
        assert_eq!(tree[0].icon.as_deref(), Some("file"));
        assert_eq!(tree[0].children()[0].kind(), NodeKind::Note);
        assert_eq!(tree[1].kind(), NodeKind::Folder);
        assert!(tree[1].children().is_empty());
    }

    #[test]
    fn test_note_with_children_is_rejected() {
        let text = r#"{ "id": "n", "title": "N", "type": "note",
                        "children": [ { "id": "c", "title": "C" } ] }"#;
        let err = serde_json::from_str::<NavNode>(text).unwrap_err();
        assert!(err.to_string().contains("cannot have children"));
    }

    #[test]
    fn test_task_with_empty_children_is_a_leaf() {
        let text = r#"{ "id": "t", "title": "T", "type": "task", "children": [] }"#;
        let node: NavNode = serde_json::from_str(text).unwrap();
        assert_eq!(node.body, NodeBody::Task);
    }
}
