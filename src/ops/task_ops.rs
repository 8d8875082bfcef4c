use log::debug;
use serde::Serialize;

use crate::model::task::TaskNode;
use crate::ops::ids::IdGenerator;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [TaskNode], id: &str) -> Option<&'a TaskNode> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_task_mut<'a>(tasks: &'a mut [TaskNode], id: &str) -> Option<&'a mut TaskNode> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task_mut(&mut task.children, id) {
            return Some(found);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Flip an item's checkbox and push the new value down to every descendant.
///
/// Parents and siblings are never touched. Returns the new value, or `None`
/// if the id is absent.
pub fn toggle(tasks: &mut [TaskNode], id: &str) -> Option<bool> {
    let Some(task) = find_task_mut(tasks, id) else {
        debug!("toggle: task {} not found", id);
        return None;
    };
    let completed = !task.completed;
    task.completed = completed;
    set_completed_recursive(&mut task.children, completed);
    Some(completed)
}

fn set_completed_recursive(tasks: &mut [TaskNode], completed: bool) {
    for task in tasks {
        task.completed = completed;
        set_completed_recursive(&mut task.children, completed);
    }
}

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

/// Remove an item and everything under it.
pub fn delete_task(tasks: &mut Vec<TaskNode>, id: &str) -> Option<TaskNode> {
    let removed = remove_task(tasks, id);
    if removed.is_none() {
        debug!("delete_task: task {} not found", id);
    }
    removed
}

fn remove_task(tasks: &mut Vec<TaskNode>, id: &str) -> Option<TaskNode> {
    for idx in 0..tasks.len() {
        if tasks[idx].id == id {
            return Some(tasks.remove(idx));
        }
        if let Some(removed) = remove_task(&mut tasks[idx].children, id) {
            return Some(removed);
        }
    }
    None
}

/// Append an unchecked item with `text` to the root list. Returns its id.
pub fn add_root<G>(tasks: &mut Vec<TaskNode>, ids: &mut G, text: &str) -> String
where
    G: IdGenerator + ?Sized,
{
    let task = TaskNode::new(ids.next_id(), text);
    let id = task.id.clone();
    tasks.push(task);
    id
}

/// Append an unchecked item with `text` as the last child of `parent_id`.
pub fn add_child<G>(tasks: &mut [TaskNode], parent_id: &str, ids: &mut G, text: &str) -> Option<String>
where
    G: IdGenerator + ?Sized,
{
    let Some(parent) = find_task_mut(tasks, parent_id) else {
        debug!("add_child: parent {} not found", parent_id);
        return None;
    };
    let task = TaskNode::new(ids.next_id(), text);
    let id = task.id.clone();
    parent.children.push(task);
    Some(id)
}

/// Insert an empty item right after `after_id`, in the same sibling list.
pub fn add_sibling<G>(tasks: &mut Vec<TaskNode>, after_id: &str, ids: &mut G) -> Option<String>
where
    G: IdGenerator + ?Sized,
{
    let Some(siblings) = sibling_list_mut(tasks, after_id) else {
        debug!("add_sibling: task {} not found", after_id);
        return None;
    };
    let pos = siblings.iter().position(|t| t.id == after_id)?;
    let task = TaskNode::new(ids.next_id(), "");
    let id = task.id.clone();
    siblings.insert(pos + 1, task);
    Some(id)
}

/// The list that directly contains `id`
fn sibling_list_mut<'a>(tasks: &'a mut Vec<TaskNode>, id: &str) -> Option<&'a mut Vec<TaskNode>> {
    if tasks.iter().any(|t| t.id == id) {
        return Some(tasks);
    }
    for task in tasks.iter_mut() {
        if let Some(list) = sibling_list_mut(&mut task.children, id) {
            return Some(list);
        }
    }
    None
}

/// Replace an item's text. Group-header status follows the new text.
pub fn update_text(tasks: &mut [TaskNode], id: &str, text: &str) -> bool {
    match find_task_mut(tasks, id) {
        Some(task) => {
            task.text = text.to_string();
            true
        }
        None => {
            debug!("update_text: task {} not found", id);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Completed/total counts over one list of items (not their descendants)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction done, 0.0 for an empty list
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Checklist progress over root items only. Nested items only count through
/// their root item's own checkbox.
pub fn progress(tasks: &[TaskNode]) -> Progress {
    Progress {
        completed: tasks.iter().filter(|t| t.completed).count(),
        total: tasks.len(),
    }
}

/// Progress over an item's direct children
pub fn child_progress(task: &TaskNode) -> Progress {
    progress(&task.children)
}

/// 1-based position of an item in document order, which is the number it
/// gets when the document is decoded again.
pub fn position(tasks: &[TaskNode], id: &str) -> Option<usize> {
    fn walk(tasks: &[TaskNode], id: &str, seen: &mut usize) -> bool {
        for task in tasks {
            *seen += 1;
            if task.id == id || walk(&task.children, id, seen) {
                return true;
            }
        }
        false
    }
    let mut seen = 0;
    walk(tasks, id, &mut seen).then_some(seen)
}

/// Number of items at every depth
pub fn count_tasks(tasks: &[TaskNode]) -> usize {
    tasks.iter().map(|t| 1 + count_tasks(&t.children)).sum()
}
