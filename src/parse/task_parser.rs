use std::sync::LazyLock;

use regex::Regex;

use crate::model::task::TaskNode;
use crate::ops::ids::IdGenerator;

/// `<indent>- [ ] text`, `- [x] text` or `- [X] text`
static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)- \[([ xX])\] (.*)$").expect("task line pattern is valid")
});

/// A checkbox line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine<'a> {
    /// Length of the leading whitespace run, in characters. Tabs count as one.
    pub indent: usize,
    pub completed: bool,
    pub text: &'a str,
}

/// Match a single line against the task-line grammar.
pub fn parse_task_line(line: &str) -> Option<TaskLine<'_>> {
    let caps = TASK_LINE.captures(line)?;
    let indent = caps.get(1).map_or(0, |m| m.as_str().chars().count());
    let completed = caps.get(2).is_some_and(|m| m.as_str() != " ");
    let text = caps.get(3).map_or("", |m| m.as_str());
    Some(TaskLine {
        indent,
        completed,
        text,
    })
}

/// Decode a markdown document into a task tree.
///
/// Only checkbox lines are kept: headings, prose and malformed items are
/// dropped. Nesting follows indentation length; a line indented the same as
/// (or less than) an open item closes it, so equal indentation means sibling.
pub fn parse_tasks<G>(content: &str, ids: &mut G) -> Vec<TaskNode>
where
    G: IdGenerator + ?Sized,
{
    let mut roots: Vec<TaskNode> = Vec::new();
    // Open items, innermost last, with the indent each was found at
    let mut stack: Vec<(TaskNode, usize)> = Vec::new();

    for line in content.lines() {
        let Some(parsed) = parse_task_line(line) else {
            continue;
        };

        while stack
            .last()
            .is_some_and(|(_, indent)| *indent >= parsed.indent)
        {
            close_top(&mut stack, &mut roots);
        }

        let node = TaskNode::new(ids.next_id(), parsed.text).with_completed(parsed.completed);
        stack.push((node, parsed.indent));
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

/// Pop the innermost open item and attach it to its parent (or the roots).
fn close_top(stack: &mut Vec<(TaskNode, usize)>, roots: &mut Vec<TaskNode>) {
    if let Some((node, _)) = stack.pop() {
        match stack.last_mut() {
            Some((parent, _)) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// The text of the first `# ` heading line, if the document has one.
pub fn parse_heading(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::ids::SequentialIds;
    use pretty_assertions::assert_eq;

    fn decode(content: &str) -> Vec<TaskNode> {
        parse_tasks(content, &mut SequentialIds::new(""))
    }

    #[test]
    fn test_parse_task_line() {
        assert_eq!(
            parse_task_line("  - [x] Ship it"),
            Some(TaskLine {
                indent: 2,
                completed: true,
                text: "Ship it"
            })
        );
        assert_eq!(parse_task_line("- [X] Upper").map(|l| l.completed), Some(true));
        assert_eq!(parse_task_line("- [ ] Open").map(|l| l.completed), Some(false));
        assert_eq!(parse_task_line("\t- [ ] Tab").map(|l| l.indent), Some(1));
    }

    #[test]
    fn test_non_task_lines_do_not_match() {
        assert_eq!(parse_task_line("# Heading"), None);
        assert_eq!(parse_task_line("- plain bullet"), None);
        assert_eq!(parse_task_line("- [>] other state"), None);
        assert_eq!(parse_task_line("- [ ]no space"), None);
        assert_eq!(parse_task_line("* [ ] star bullet"), None);
    }

    #[test]
    fn test_empty_text_after_checkbox() {
        assert_eq!(parse_task_line("- [ ] ").map(|l| l.text), Some(""));
    }

    #[test]
    fn test_decode_nested_document() {
        let tasks = decode("# T\n- [ ] A\n  - [x] B\n- [ ] C\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "A");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].children.len(), 1);
        assert_eq!(tasks[0].children[0].text, "B");
        assert!(tasks[0].children[0].completed);
        assert!(tasks[0].children[0].is_leaf());
        assert_eq!(tasks[1].text, "C");
        assert!(tasks[1].is_leaf());
    }

    #[test]
    fn test_ids_follow_document_order() {
        let tasks = decode("- [ ] A\n  - [ ] B\n- [ ] C\n");
        assert_eq!(tasks[0].id, "1");
        assert_eq!(tasks[0].children[0].id, "2");
        assert_eq!(tasks[1].id, "3");
    }

    #[test]
    fn test_equal_indent_is_sibling() {
        let tasks = decode("  - [ ] A\n  - [ ] B\n");
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_dedent_pops_to_matching_level() {
        let tasks = decode(
            "- [ ] A\n\
             \x20\x20- [ ] A1\n\
             \x20\x20\x20\x20- [ ] A1a\n\
             \x20\x20- [ ] A2\n\
             - [ ] B",
        );
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].children.len(), 2);
        assert_eq!(tasks[0].children[0].children[0].text, "A1a");
        assert_eq!(tasks[0].children[1].text, "A2");
    }

    #[test]
    fn test_indent_width_is_not_fixed() {
        // Four-space and one-space steps nest just like two-space ones
        let tasks = decode("- [ ] A\n    - [ ] B\n     - [ ] C\n");
        assert_eq!(tasks[0].children[0].text, "B");
        assert_eq!(tasks[0].children[0].children[0].text, "C");
    }

    #[test]
    fn test_first_line_indented_is_still_root() {
        let tasks = decode("    - [ ] Deep\n- [ ] Shallow\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "Deep");
    }

    #[test]
    fn test_non_task_lines_are_dropped() {
        let tasks = decode(
            "# Release\n\nSome intro prose.\n- [ ] Build\n  notes under build\n- not a task\n  - [ ] Tag\n",
        );
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].text, "Build");
        assert_eq!(tasks[0].children.len(), 1);
        assert_eq!(tasks[0].children[0].text, "Tag");
    }

    #[test]
    fn test_crlf_line_endings() {
        let tasks = decode("- [ ] A\r\n  - [x] B\r\n");
        assert_eq!(tasks[0].text, "A");
        assert_eq!(tasks[0].children[0].text, "B");
    }

    #[test]
    fn test_group_detection_after_decode() {
        let tasks = decode("- [ ] Backend: API\n- [ ] `main.rs:10` fix\n");
        assert!(tasks[0].is_group());
        assert!(!tasks[1].is_group());
    }

    #[test]
    fn test_empty_document() {
        assert!(decode("").is_empty());
        assert!(decode("# Only a heading\n\nprose").is_empty());
    }

    #[test]
    fn test_parse_heading() {
        assert_eq!(parse_heading("# Release plan\n\n- [ ] A"), Some("Release plan"));
        assert_eq!(parse_heading("intro\n# Later heading"), Some("Later heading"));
        assert_eq!(parse_heading("## Sub only"), None);
        assert_eq!(parse_heading(""), None);
    }
}
