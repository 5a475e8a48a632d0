//! List and task-list construction.
//!
//! A bullet list becomes a task list when *any* of its items opens with a
//! checkbox marker; every item of that list is then built as a task item.

use std::ops::Range;

use crate::models::{Element, List, ListItem, TaskList, TaskListItem};

use super::inline::{plain_text, slice};
use super::syntax::{InlineKind, SyntaxItem};

const UNCHECKED: &str = "[ ] ";
const CHECKED: [&str; 2] = ["[x] ", "[X] "];
const MARKER_LEN: usize = 4;

/// Builds a [`List`] or a [`TaskList`] element for a top-level list.
pub fn build_list(
    source: &str,
    ordered: bool,
    items: &[SyntaxItem],
    range: &Range<usize>,
) -> Element {
    let raw_text = slice(source, range);
    if !ordered && items.iter().any(has_task_marker) {
        Element::TaskList(TaskList {
            raw_text,
            items: task_items(source, items, 0),
        })
    } else {
        Element::List(List {
            raw_text,
            is_ordered: ordered,
            items: list_items(source, items, 0),
        })
    }
}

/// Whether the first literal of the item's first paragraph is a checkbox.
fn has_task_marker(item: &SyntaxItem) -> bool {
    let first = item.first_paragraph().and_then(|inlines| inlines.first());
    match first.map(|node| &node.kind) {
        Some(InlineKind::Text(text)) => marker(text).is_some(),
        _ => false,
    }
}

/// Returns `Some(checked)` when `text` starts with a checkbox marker.
fn marker(text: &str) -> Option<bool> {
    if text.starts_with(UNCHECKED) {
        Some(false)
    } else if CHECKED.iter().any(|m| text.starts_with(m)) {
        Some(true)
    } else {
        None
    }
}

fn item_text(item: &SyntaxItem) -> String {
    item.first_paragraph().map(plain_text).unwrap_or_default()
}

pub fn list_items(source: &str, items: &[SyntaxItem], level: usize) -> Vec<ListItem> {
    items
        .iter()
        .map(|item| ListItem {
            raw_text: slice(source, &item.range),
            text: item_text(item),
            level,
            children: item
                .first_nested_list()
                .map(|(_, nested)| list_items(source, nested, level + 1))
                .unwrap_or_default(),
        })
        .collect()
}

/// Task items. Items without a marker inside a task list stay unchecked and
/// keep their full text.
pub fn task_items(source: &str, items: &[SyntaxItem], level: usize) -> Vec<TaskListItem> {
    items
        .iter()
        .map(|item| {
            let text = item_text(item);
            let (text, is_checked) = match marker(&text) {
                Some(checked) => (text[MARKER_LEN..].to_string(), checked),
                None => (text, false),
            };
            TaskListItem {
                raw_text: slice(source, &item.range),
                text,
                is_checked,
                level,
                children: item
                    .first_nested_list()
                    .map(|(_, nested)| task_items(source, nested, level + 1))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::syntax::{BlockKind, parse_block};
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Options;
    use rstest::rstest;

    fn list(text: &str) -> Element {
        let block = parse_block(text, Options::empty())
            .into_iter()
            .next()
            .expect("one block");
        match &block.kind {
            BlockKind::List { ordered, items } => build_list(text, *ordered, items, &block.range),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn checkbox_items_become_task_list() {
        let Element::TaskList(tasks) = list("- [ ] foo\n- [x] bar\n") else {
            panic!("expected task list");
        };
        let summary: Vec<_> = tasks
            .items
            .iter()
            .map(|i| (i.text.as_str(), i.is_checked, i.level))
            .collect();
        assert_eq!(summary, vec![("foo", false, 0), ("bar", true, 0)]);
    }

    #[test]
    fn single_marker_flips_whole_list() {
        let Element::TaskList(tasks) = list("- plain\n- [X] done\n") else {
            panic!("expected task list");
        };
        assert_eq!(tasks.items[0].text, "plain");
        assert!(!tasks.items[0].is_checked);
        assert!(tasks.items[1].is_checked);
    }

    #[rstest]
    #[case("1. [ ] a\n2. [x] b\n")]
    #[case("- [] a\n")]
    #[case("- [x]\n")]
    fn not_a_task_list(#[case] text: &str) {
        assert!(matches!(list(text), Element::List(_)));
    }

    #[test]
    fn nested_items_increase_level_by_one() {
        let Element::List(list) = list("- a\n  - b\n    - c\n- d\n") else {
            panic!("expected list");
        };
        assert!(!list.is_ordered);
        assert_eq!(list.items.len(), 2);
        let b = &list.items[0].children[0];
        assert_eq!((b.text.as_str(), b.level), ("b", 1));
        let c = &b.children[0];
        assert_eq!((c.text.as_str(), c.level), ("c", 2));
        assert!(list.items[1].children.is_empty());
    }

    #[test]
    fn nested_task_items_strip_markers() {
        let Element::TaskList(tasks) = list("- [ ] parent\n  - [x] child\n") else {
            panic!("expected task list");
        };
        let child = &tasks.items[0].children[0];
        assert_eq!(child.text, "child");
        assert!(child.is_checked);
        assert_eq!(child.level, 1);
    }

    #[test]
    fn ordered_list_keeps_item_text() {
        let Element::List(list) = list("1. one\n2. two\n") else {
            panic!("expected list");
        };
        assert!(list.is_ordered);
        let texts: Vec<_> = list.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }
}
