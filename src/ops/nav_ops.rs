//! Navigation tree engine.
//!
//! All lookups are depth-first pre-order and stop at the first match, so each
//! call changes at most one node even if an id were duplicated. A missing id is
//! never an error: the tree is left as it was and the return value says so.

use log::debug;

use crate::model::nav::NavNode;

/// Result of [`add_node`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// No node carries the requested parent id
    ParentNotFound,
    /// The parent is a note or task list, which cannot own children
    ParentNotContainer,
}

impl AddOutcome {
    pub fn is_added(self) -> bool {
        self == AddOutcome::Added
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_node<'a>(nodes: &'a [NavNode], id: &str) -> Option<&'a NavNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(node.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_node_mut<'a>(nodes: &'a mut [NavNode], id: &str) -> Option<&'a mut NavNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children_mut()
            && let Some(found) = find_node_mut(children, id)
        {
            return Some(found);
        }
    }
    None
}

pub fn find_title<'a>(nodes: &'a [NavNode], id: &str) -> Option<&'a str> {
    find_node(nodes, id).map(|n| n.title.as_str())
}

/// The chain of nodes from the root down to `id`, both ends included.
pub fn breadcrumb<'a>(nodes: &'a [NavNode], id: &str) -> Option<Vec<&'a NavNode>> {
    for node in nodes {
        if node.id == id {
            return Some(vec![node]);
        }
        if let Some(mut path) = breadcrumb(node.children(), id) {
            path.insert(0, node);
            return Some(path);
        }
    }
    None
}

/// First node without children, in pre-order. Empty containers count.
pub fn find_first_leaf(nodes: &[NavNode]) -> Option<&str> {
    for node in nodes {
        if node.children().is_empty() {
            return Some(&node.id);
        }
        if let Some(id) = find_first_leaf(node.children()) {
            return Some(id);
        }
    }
    None
}

/// Every id in the tree, pre-order
pub fn all_ids(nodes: &[NavNode]) -> Vec<&str> {
    let mut ids = Vec::new();
    for node in nodes {
        push_ids(node, &mut ids);
    }
    ids
}

fn push_ids<'a>(node: &'a NavNode, ids: &mut Vec<&'a str>) {
    ids.push(&node.id);
    for child in node.children() {
        push_ids(child, ids);
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Append `node` at the root (no parent) or as the last child of `parent_id`.
pub fn add_node(tree: &mut Vec<NavNode>, parent_id: Option<&str>, node: NavNode) -> AddOutcome {
    let Some(parent_id) = parent_id else {
        tree.push(node);
        return AddOutcome::Added;
    };

    let Some(parent) = find_node_mut(tree, parent_id) else {
        debug!("add_node: parent {} not found", parent_id);
        return AddOutcome::ParentNotFound;
    };

    match parent.children_mut() {
        Some(children) => {
            children.push(node);
            AddOutcome::Added
        }
        None => {
            debug!("add_node: parent {} is a {}", parent_id, parent.kind());
            AddOutcome::ParentNotContainer
        }
    }
}

/// Ids of the node and all its descendants, pre-order. Empty if absent.
pub fn collect_subtree_ids(tree: &[NavNode], id: &str) -> Vec<String> {
    match find_node(tree, id) {
        Some(node) => {
            let mut ids = Vec::new();
            push_ids(node, &mut ids);
            ids.into_iter().map(str::to_string).collect()
        }
        None => Vec::new(),
    }
}

/// Detach the first node with this id from wherever it sits.
pub fn remove_node(nodes: &mut Vec<NavNode>, id: &str) -> Option<NavNode> {
    for idx in 0..nodes.len() {
        if nodes[idx].id == id {
            return Some(nodes.remove(idx));
        }
        if let Some(children) = nodes[idx].children_mut()
            && let Some(removed) = remove_node(children, id)
        {
            return Some(removed);
        }
    }
    None
}

/// Remove a node with its whole subtree.
///
/// Returns the removed ids (the node first, then descendants in pre-order).
/// An empty list means the id was not in the tree and nothing changed.
pub fn delete_node(tree: &mut Vec<NavNode>, id: &str) -> Vec<String> {
    let ids = collect_subtree_ids(tree, id);
    if ids.is_empty() {
        debug!("delete_node: {} not found", id);
        return ids;
    }
    remove_node(tree, id);
    ids
}

/// Set the title of a node. Returns false if the id is absent.
pub fn rename_node(tree: &mut [NavNode], id: &str, title: &str) -> bool {
    match find_node_mut(tree, id) {
        Some(node) => {
            node.title = title.to_string();
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Case-insensitive title search that keeps the path to every hit.
///
/// A leaf survives when its title matches. A container survives when its own
/// title matches or any descendant survives, and it carries only the surviving
/// children. The source tree is not touched.
pub fn filter_tree(nodes: &[NavNode], query: &str) -> Vec<NavNode> {
    let needle = query.to_lowercase();
    filter_nodes(nodes, &needle)
}

fn filter_nodes(nodes: &[NavNode], needle: &str) -> Vec<NavNode> {
    nodes
        .iter()
        .filter_map(|node| {
            let matches = node.title.to_lowercase().contains(needle);
            if !node.is_container() {
                return matches.then(|| node.clone());
            }
            let kept = filter_nodes(node.children(), needle);
            if !matches && kept.is_empty() {
                return None;
            }
            let mut copy = NavNode::new(node.id.clone(), node.title.clone(), node.kind())
                .with_children(kept);
            copy.icon = node.icon.clone();
            Some(copy)
        })
        .collect()
}
