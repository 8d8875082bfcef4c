use serde::Serialize;

use crate::model::nav::{NavNode, NodeKind};
use crate::model::task::{TaskNode, group_parts};
use crate::ops::task_ops::{self, Progress};
use crate::util::unicode::{display_width, fit_to_width};

/// Widest a title column gets in `folio tree`
const TITLE_CELLS: usize = 40;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedJson {
    pub deleted_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_ids: Vec<String>,
    pub next_selection: Option<String>,
}

#[derive(Serialize)]
pub struct ShowJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub group: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub doc: String,
    pub title: String,
    pub progress: Progress,
    pub tasks: Vec<TaskJson>,
}

pub fn task_to_json(task: &TaskNode) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        group: task.is_group(),
        children: task.children.iter().map(task_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn kind_marker(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Section => "§",
        NodeKind::Folder => "▸",
        NodeKind::Note => "·",
        NodeKind::Task => "☐",
    }
}

/// One line per node, indented by depth, with the id in a right-hand column.
pub fn format_nav_tree(nodes: &[NavNode]) -> Vec<String> {
    let mut lines = Vec::new();
    push_nav_lines(nodes, 0, &mut lines);
    lines
}

fn push_nav_lines(nodes: &[NavNode], depth: usize, lines: &mut Vec<String>) {
    for node in nodes {
        let prefix = format!("{}{} ", "  ".repeat(depth), kind_marker(node.kind()));
        let cells = TITLE_CELLS.saturating_sub(display_width(&prefix)).max(8);
        lines.push(format!(
            "{}{}  {}",
            prefix,
            fit_to_width(&node.title, cells),
            node.id
        ));
        push_nav_lines(node.children(), depth + 1, lines);
    }
}

/// `Introduction / Overview`
pub fn format_breadcrumb(path: &[&NavNode]) -> String {
    path.iter()
        .map(|n| n.title.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Format one checklist item: `[x] 3 text (done/total)`.
///
/// Group headers show their prefix in bold markers.
pub fn format_task_line(task: &TaskNode) -> String {
    let check = if task.completed { 'x' } else { ' ' };
    let text = match group_parts(&task.text) {
        Some((head, rest)) => format!("**{}**:{}", head, rest),
        None => task.text.clone(),
    };
    let counts = if task.children.is_empty() {
        String::new()
    } else {
        let p = task_ops::child_progress(task);
        format!(" ({}/{})", p.completed, p.total)
    };
    format!("[{}] {} {}{}", check, task.id, text, counts)
}

/// Format an item with its children, indented
pub fn format_task_tree(task: &TaskNode, indent: usize) -> Vec<String> {
    let mut lines = vec![format!("{}{}", "  ".repeat(indent), format_task_line(task))];
    for child in &task.children {
        lines.extend(format_task_tree(child, indent + 1));
    }
    lines
}

/// Header and items for `folio task list`
pub fn format_task_listing(title: &str, tasks: &[TaskNode]) -> Vec<String> {
    let p = task_ops::progress(tasks);
    let mut lines = vec![
        format!(
            "== {} ({}/{}, {:.0}%) ==",
            title,
            p.completed,
            p.total,
            p.ratio() * 100.0
        ),
        String::new(),
    ];
    for task in tasks {
        lines.extend(format_task_tree(task, 0));
    }
    lines
}
