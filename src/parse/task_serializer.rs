use crate::model::task::TaskNode;

/// Indent emitted per nesting level
pub const INDENT_UNIT: &str = "  ";

/// Serialize a task tree to checkbox lines, starting at nesting `depth`.
pub fn serialize_tasks(tasks: &[TaskNode], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for task in tasks {
        serialize_task(task, depth, &mut lines);
    }
    lines
}

fn serialize_task(task: &TaskNode, depth: usize, lines: &mut Vec<String>) {
    let checkbox = if task.completed { 'x' } else { ' ' };
    lines.push(format!(
        "{}- [{}] {}",
        INDENT_UNIT.repeat(depth),
        checkbox,
        task.text
    ));
    for child in &task.children {
        serialize_task(child, depth + 1, lines);
    }
}

/// Encode a task tree as markdown.
///
/// At depth 0 the output opens with `# <title>` and a blank line; deeper calls
/// emit only the item lines. Every line, the last included, ends with `\n`.
pub fn encode_tasks(title: &str, tasks: &[TaskNode], depth: usize) -> String {
    let mut out = String::new();
    if depth == 0 {
        out.push_str("# ");
        out.push_str(title);
        out.push_str("\n\n");
    }
    for line in serialize_tasks(tasks, depth) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Encode a whole task document (heading + items).
pub fn encode_document(title: &str, tasks: &[TaskNode]) -> String {
    encode_tasks(title, tasks, 0)
}
