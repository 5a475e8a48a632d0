//! Plain-text backend.
//!
//! Every visual is a handful of text lines plus child visuals. Writing the
//! tree out gives a readable outline of a rendered document, which is what
//! the command line `--dump` mode prints.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::{
    CodeBlock, CodeInline, ElementKind, Emphasis, Heading, HorizontalRule, Image, Inline, Link,
    List, ListItem, Paragraph, Quote, Table, TaskList, TaskListItem, TextElement,
};

use super::{Applied, ImageOutcome, RenderContext, VisualBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Visual {
    lines: Vec<String>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct ImageSlot {
    /// Number of the latest request; results of older ones are dropped.
    request: u64,
    /// `None` while that request is in flight.
    outcome: Option<ImageOutcome>,
}

type ImageStates = Arc<Mutex<HashMap<NodeId, ImageSlot>>>;

#[derive(Debug, Default)]
pub struct OutlineBackend {
    visuals: Vec<Visual>,
    images: ImageStates,
}

impl OutlineBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, lines: Vec<String>) -> NodeId {
        self.visuals.push(Visual {
            lines,
            children: vec![],
        });
        NodeId(self.visuals.len() - 1)
    }

    fn set_lines(&mut self, node: NodeId, lines: Vec<String>) {
        if let Some(visual) = self.visuals.get_mut(node.0) {
            visual.lines = lines;
        }
    }

    fn load_image(&self, node: NodeId, url: &str, cx: &RenderContext) {
        let request = {
            let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
            let request = images.get(&node).map_or(0, |slot| slot.request + 1);
            images.insert(
                node,
                ImageSlot {
                    request,
                    outcome: None,
                },
            );
            request
        };
        let states = Arc::clone(&self.images);
        cx.request_image(url, move |outcome| {
            let mut images = states.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = images.get_mut(&node).filter(|s| s.request == request) {
                slot.outcome = Some(outcome);
            }
        });
    }

    /// Text lines of one visual, without its children.
    pub fn lines(&self, node: NodeId) -> Vec<String> {
        let mut lines = self
            .visuals
            .get(node.0)
            .map(|v| v.lines.clone())
            .unwrap_or_default();
        let images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        match images.get(&node).map(|slot| &slot.outcome) {
            Some(None) => lines.push("  (loading)".to_string()),
            Some(Some(ImageOutcome::Loaded(bytes))) => {
                lines.push(format!("  ({} bytes)", bytes.len()))
            }
            Some(Some(ImageOutcome::Placeholder { message })) => {
                lines.push(format!("  (image unavailable: {message})"))
            }
            None => {}
        }
        lines
    }

    /// The whole subtree below `node`, one visual after another.
    pub fn write(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_into(node, &mut out);
        out
    }

    fn write_into(&self, node: NodeId, out: &mut String) {
        for line in self.lines(node) {
            out.push_str(&line);
            out.push('\n');
        }
        let children = self
            .visuals
            .get(node.0)
            .map(|v| v.children.as_slice())
            .unwrap_or_default();
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_into(*child, out);
        }
    }
}

fn inline_text(inlines: &[Inline]) -> String {
    inlines.iter().map(inline_span).collect()
}

fn inline_span(inline: &Inline) -> String {
    match inline {
        Inline::Text(t) => t.text.clone(),
        Inline::Emphasis(e) if e.is_strong => format!("**{}**", e.text),
        Inline::Emphasis(e) => format!("*{}*", e.text),
        Inline::Link(l) => format!("{} <{}>", l.text, l.url),
        Inline::Image(i) => format!("[image: {}]", i.alt),
        Inline::Code(c) => format!("`{}`", c.code),
    }
}

fn heading_lines(heading: &Heading) -> Vec<String> {
    vec![format!("{} {}", "#".repeat(heading.level.into()), heading.text)]
}

fn code_lines(code: &CodeBlock) -> Vec<String> {
    let mut lines = vec![format!("```{}", code.language)];
    lines.extend(code.code.lines().map(str::to_string));
    lines.push("```".to_string());
    lines
}

fn list_item_lines(item: &ListItem, marker: &str, ordered: bool, out: &mut Vec<String>) {
    out.push(format!("{}{marker} {}", "  ".repeat(item.level), item.text));
    for (i, child) in item.children.iter().enumerate() {
        list_item_lines(child, &list_marker(ordered, i), ordered, out);
    }
}

fn list_marker(ordered: bool, index: usize) -> String {
    if ordered {
        format!("{}.", index + 1)
    } else {
        "-".to_string()
    }
}

fn list_lines(list: &List) -> Vec<String> {
    let mut out = vec![];
    for (i, item) in list.items.iter().enumerate() {
        list_item_lines(item, &list_marker(list.is_ordered, i), list.is_ordered, &mut out);
    }
    out
}

fn task_item_lines(item: &TaskListItem, out: &mut Vec<String>) {
    let check = if item.is_checked { 'x' } else { ' ' };
    out.push(format!("{}[{check}] {}", "  ".repeat(item.level), item.text));
    for child in &item.children {
        task_item_lines(child, out);
    }
}

fn task_list_lines(list: &TaskList) -> Vec<String> {
    let mut out = vec![];
    for item in &list.items {
        task_item_lines(item, &mut out);
    }
    out
}

fn quote_lines(quote: &Quote) -> Vec<String> {
    inline_text(&quote.inlines)
        .lines()
        .map(|line| format!("> {line}"))
        .collect()
}

fn image_lines(image: &Image) -> Vec<String> {
    vec![format!("[image: {}] ({})", image.alt, image.source)]
}

fn table_lines(table: &Table) -> Vec<String> {
    let mut lines = vec![
        table.headers.join(" | "),
        vec!["---"; table.column_count()].join(" | "),
    ];
    for row in 0..table.rows.len() {
        let cells: Vec<&str> = table.cells(row).map(|(_, cell)| cell).collect();
        lines.push(cells.join(" | "));
    }
    lines
}

impl VisualBackend for OutlineBackend {
    type Node = NodeId;
    type Error = Infallible;

    fn container(&mut self) -> Result<NodeId, Infallible> {
        Ok(self.push(vec![]))
    }

    fn append(&mut self, parent: &NodeId, child: NodeId) -> Result<(), Infallible> {
        if let Some(visual) = self.visuals.get_mut(parent.0) {
            visual.children.push(child);
        }
        Ok(())
    }

    fn unsupported(&mut self, _kind: ElementKind) -> Result<NodeId, Infallible> {
        Ok(self.push(vec!["Unsupported element".to_string()]))
    }

    fn create_heading(
        &mut self,
        heading: &Heading,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        Ok(self.push(heading_lines(heading)))
    }

    fn create_paragraph(&mut self, p: &Paragraph, _: &RenderContext) -> Result<NodeId, Infallible> {
        Ok(self.push(vec![inline_text(&p.inlines)]))
    }

    fn create_code_block(
        &mut self,
        code: &CodeBlock,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        Ok(self.push(code_lines(code)))
    }

    fn create_list(&mut self, list: &List, _: &RenderContext) -> Result<NodeId, Infallible> {
        Ok(self.push(list_lines(list)))
    }

    fn create_task_list(
        &mut self,
        list: &TaskList,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        Ok(self.push(task_list_lines(list)))
    }

    fn create_quote(&mut self, quote: &Quote, _: &RenderContext) -> Result<NodeId, Infallible> {
        Ok(self.push(quote_lines(quote)))
    }

    fn create_image(&mut self, image: &Image, cx: &RenderContext) -> Result<NodeId, Infallible> {
        let node = self.push(image_lines(image));
        self.load_image(node, &image.source, cx);
        Ok(node)
    }

    fn create_table(&mut self, table: &Table, _: &RenderContext) -> Result<NodeId, Infallible> {
        Ok(self.push(table_lines(table)))
    }

    fn create_horizontal_rule(
        &mut self,
        _: &HorizontalRule,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        Ok(self.push(vec!["---".to_string()]))
    }

    fn create_list_item(
        &mut self,
        item: &ListItem,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        let mut lines = vec![];
        list_item_lines(item, "-", false, &mut lines);
        Ok(self.push(lines))
    }

    fn create_task_list_item(
        &mut self,
        item: &TaskListItem,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        let mut lines = vec![];
        task_item_lines(item, &mut lines);
        Ok(self.push(lines))
    }

    fn create_link(&mut self, link: &Link, _: &RenderContext) -> Result<NodeId, Infallible> {
        Ok(self.push(vec![inline_span(&Inline::Link(link.clone()))]))
    }

    fn create_emphasis(
        &mut self,
        emphasis: &Emphasis,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        Ok(self.push(vec![inline_span(&Inline::Emphasis(emphasis.clone()))]))
    }

    fn create_text(&mut self, text: &TextElement, _: &RenderContext) -> Result<NodeId, Infallible> {
        Ok(self.push(vec![text.text.clone()]))
    }

    fn create_code_inline(
        &mut self,
        code: &CodeInline,
        _: &RenderContext,
    ) -> Result<NodeId, Infallible> {
        Ok(self.push(vec![format!("`{}`", code.code)]))
    }

    fn update_heading(
        &mut self,
        node: &mut NodeId,
        heading: &Heading,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, heading_lines(heading));
        Ok(())
    }

    fn update_paragraph(
        &mut self,
        node: &mut NodeId,
        p: &Paragraph,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, vec![inline_text(&p.inlines)]);
        Ok(())
    }

    fn update_code_block(
        &mut self,
        node: &mut NodeId,
        code: &CodeBlock,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, code_lines(code));
        Ok(())
    }

    fn update_list(
        &mut self,
        node: &mut NodeId,
        list: &List,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, list_lines(list));
        Ok(())
    }

    fn update_task_list(
        &mut self,
        node: &mut NodeId,
        list: &TaskList,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, task_list_lines(list));
        Ok(())
    }

    fn update_quote(
        &mut self,
        node: &mut NodeId,
        quote: &Quote,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, quote_lines(quote));
        Ok(())
    }

    fn update_image(
        &mut self,
        node: &mut NodeId,
        image: &Image,
        cx: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, image_lines(image));
        self.load_image(*node, &image.source, cx);
        Ok(())
    }

    fn update_table(
        &mut self,
        node: &mut NodeId,
        table: &Table,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.set_lines(*node, table_lines(table));
        Ok(())
    }

    fn update_link(
        &mut self,
        node: &mut NodeId,
        link: &Link,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        self.set_lines(*node, vec![inline_span(&Inline::Link(link.clone()))]);
        Ok(Applied::Changed)
    }

    fn update_emphasis(
        &mut self,
        node: &mut NodeId,
        emphasis: &Emphasis,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        self.set_lines(*node, vec![inline_span(&Inline::Emphasis(emphasis.clone()))]);
        Ok(Applied::Changed)
    }

    fn update_text(
        &mut self,
        node: &mut NodeId,
        text: &TextElement,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        self.set_lines(*node, vec![text.text.clone()]);
        Ok(Applied::Changed)
    }

    fn update_code_inline(
        &mut self,
        node: &mut NodeId,
        code: &CodeInline,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        self.set_lines(*node, vec![format!("`{}`", code.code)]);
        Ok(Applied::Changed)
    }

    fn update_list_item(
        &mut self,
        node: &mut NodeId,
        item: &ListItem,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let mut lines = vec![];
        list_item_lines(item, "-", false, &mut lines);
        self.set_lines(*node, lines);
        Ok(Applied::Changed)
    }

    fn update_task_list_item(
        &mut self,
        node: &mut NodeId,
        item: &TaskListItem,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let mut lines = vec![];
        task_item_lines(item, &mut lines);
        self.set_lines(*node, lines);
        Ok(Applied::Changed)
    }
}
