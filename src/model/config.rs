use serde::{Deserialize, Serialize};

/// Configuration from folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub ids: IdConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for WorkspaceInfo {
    fn default() -> Self {
        WorkspaceInfo {
            name: default_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    /// Hex characters kept from a v4 UUID for new node ids (clamped to 8..=32)
    #[serde(default = "default_id_length")]
    pub length: usize,
}

impl Default for IdConfig {
    fn default() -> Self {
        IdConfig {
            length: default_id_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Text of items added at the root of a checklist
    #[serde(default = "default_root_placeholder")]
    pub root_placeholder: String,
    /// Text of items added under another item
    #[serde(default = "default_child_placeholder")]
    pub child_placeholder: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            root_placeholder: default_root_placeholder(),
            child_placeholder: default_child_placeholder(),
        }
    }
}

fn default_name() -> String {
    "Docs".to_string()
}

fn default_id_length() -> usize {
    12
}

fn default_root_placeholder() -> String {
    "New task".to_string()
}

fn default_child_placeholder() -> String {
    "New subtask".to_string()
}
