use std::collections::HashMap;

use serde::Serialize;

use crate::model::document::Documents;
use crate::model::nav::NavNode;
use crate::ops::nav_ops;

/// Structured result from `folio check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// Something that breaks a tree invariant and should be fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears on more than one node
    #[serde(rename = "duplicate_id")]
    DuplicateId { id: String, count: usize },
    /// The id cannot be used as a document key
    #[serde(rename = "invalid_id")]
    InvalidId { id: String },
}

/// Something suspicious but harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A stored document whose id has no navigation node
    #[serde(rename = "orphan_document")]
    OrphanDocument { id: String },
    /// A document attached to a folder or section, which never shows it
    #[serde(rename = "container_document")]
    ContainerDocument { id: String },
}

/// Whether an id is usable as a document key (and file name).
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\'])
        && !id.chars().any(char::is_control)
}

/// Validate a navigation tree against its documents. Read-only.
pub fn check_workspace(tree: &[NavNode], documents: &Documents) -> CheckResult {
    let mut result = CheckResult::default();

    let ids = nav_ops::all_ids(tree);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in &ids {
        *counts.entry(*id).or_default() += 1;
    }

    // Report in tree order, once per id
    for id in &ids {
        match counts.get(id) {
            Some(&count) if count > 1 => {
                result.errors.push(CheckError::DuplicateId {
                    id: id.to_string(),
                    count,
                });
                counts.insert(*id, 0);
            }
            _ => {}
        }
        if !is_valid_id(id) {
            result.errors.push(CheckError::InvalidId { id: id.to_string() });
        }
    }

    for id in documents.keys() {
        match nav_ops::find_node(tree, id) {
            None => result
                .warnings
                .push(CheckWarning::OrphanDocument { id: id.clone() }),
            Some(node) if node.is_container() => result
                .warnings
                .push(CheckWarning::ContainerDocument { id: id.clone() }),
            Some(_) => {}
        }
    }

    result.valid = result.errors.is_empty();
    result
}
