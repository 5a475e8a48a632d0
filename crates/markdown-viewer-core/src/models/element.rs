use serde::Serialize;

use super::inline::Inline;

/// Tag identifying an element variant without its payload.
///
/// Rendered visual nodes record the kind they were created for, so that
/// updates can be checked for compatibility without holding on to the
/// original element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    Heading,
    Paragraph,
    CodeBlock,
    List,
    ListItem,
    TaskList,
    TaskListItem,
    Quote,
    Image,
    Link,
    Emphasis,
    Text,
    CodeInline,
    Table,
    HorizontalRule,
}

impl ElementKind {
    /// Human readable name, used in diagnostics and fallback visuals.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Heading => "heading",
            ElementKind::Paragraph => "paragraph",
            ElementKind::CodeBlock => "code block",
            ElementKind::List => "list",
            ElementKind::ListItem => "list item",
            ElementKind::TaskList => "task list",
            ElementKind::TaskListItem => "task list item",
            ElementKind::Quote => "quote",
            ElementKind::Image => "image",
            ElementKind::Link => "link",
            ElementKind::Emphasis => "emphasis",
            ElementKind::Text => "text",
            ElementKind::CodeInline => "inline code",
            ElementKind::Table => "table",
            ElementKind::HorizontalRule => "horizontal rule",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed, immutable document node produced by one parse pass.
///
/// Document-level parsing only ever yields the block variants (heading,
/// paragraph, code block, list, task list, quote, image, table, rule); the
/// remaining variants exist so that any node of the tree, including list
/// items and inline runs, can be handed to the renderer on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Element {
    Heading(Heading),
    Paragraph(Paragraph),
    CodeBlock(CodeBlock),
    List(List),
    ListItem(ListItem),
    TaskList(TaskList),
    TaskListItem(TaskListItem),
    Quote(Quote),
    Image(Image),
    Link(Link),
    Emphasis(Emphasis),
    Text(TextElement),
    CodeInline(CodeInline),
    Table(Table),
    HorizontalRule(HorizontalRule),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Heading(_) => ElementKind::Heading,
            Element::Paragraph(_) => ElementKind::Paragraph,
            Element::CodeBlock(_) => ElementKind::CodeBlock,
            Element::List(_) => ElementKind::List,
            Element::ListItem(_) => ElementKind::ListItem,
            Element::TaskList(_) => ElementKind::TaskList,
            Element::TaskListItem(_) => ElementKind::TaskListItem,
            Element::Quote(_) => ElementKind::Quote,
            Element::Image(_) => ElementKind::Image,
            Element::Link(_) => ElementKind::Link,
            Element::Emphasis(_) => ElementKind::Emphasis,
            Element::Text(_) => ElementKind::Text,
            Element::CodeInline(_) => ElementKind::CodeInline,
            Element::Table(_) => ElementKind::Table,
            Element::HorizontalRule(_) => ElementKind::HorizontalRule,
        }
    }

    /// The source slice this element was built from.
    pub fn raw_text(&self) -> &str {
        match self {
            Element::Heading(e) => &e.raw_text,
            Element::Paragraph(e) => &e.raw_text,
            Element::CodeBlock(e) => &e.raw_text,
            Element::List(e) => &e.raw_text,
            Element::ListItem(e) => &e.raw_text,
            Element::TaskList(e) => &e.raw_text,
            Element::TaskListItem(e) => &e.raw_text,
            Element::Quote(e) => &e.raw_text,
            Element::Image(e) => &e.raw_text,
            Element::Link(e) => &e.raw_text,
            Element::Emphasis(e) => &e.raw_text,
            Element::Text(e) => &e.raw_text,
            Element::CodeInline(e) => &e.raw_text,
            Element::Table(e) => &e.raw_text,
            Element::HorizontalRule(e) => &e.raw_text,
        }
    }
}

impl From<Inline> for Element {
    fn from(inline: Inline) -> Self {
        match inline {
            Inline::Text(e) => Element::Text(e),
            Inline::Emphasis(e) => Element::Emphasis(e),
            Inline::Link(e) => Element::Link(e),
            Inline::Image(e) => Element::Image(e),
            Inline::Code(e) => Element::CodeInline(e),
        }
    }
}

/// ATX or setext heading; inline markup is flattened into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub raw_text: String,
    /// 1 to 6.
    pub level: u8,
    pub text: String,
}

impl Heading {
    /// Font scale relative to body text for this heading level.
    pub fn scale(&self) -> f32 {
        match self.level {
            1 => 2.0,
            2 => 1.7,
            3 => 1.4,
            4 => 1.2,
            5 => 1.1,
            _ => 1.0,
        }
    }
}

/// A paragraph keeping its inline structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub raw_text: String,
    pub inlines: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub raw_text: String,
    /// Verbatim content lines joined with `\n`, fences excluded.
    pub code: String,
    /// First word of the fence info string, empty when absent.
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub raw_text: String,
    pub is_ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    pub raw_text: String,
    pub text: String,
    /// Nesting depth, 0 for top-level items.
    pub level: usize,
    pub children: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList {
    pub raw_text: String,
    pub items: Vec<TaskListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskListItem {
    pub raw_text: String,
    /// Item text with the `[ ] ` / `[x] ` marker removed.
    pub text: String,
    pub is_checked: bool,
    pub level: usize,
    pub children: Vec<TaskListItem>,
}

/// Block quote with structured inline content gathered from its paragraphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub raw_text: String,
    pub inlines: Vec<Inline>,
}

impl Quote {
    /// Flattened display text of the quote.
    pub fn plain_text(&self) -> String {
        self.inlines.iter().map(Inline::plain_text).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub raw_text: String,
    pub source: String,
    pub title: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub raw_text: String,
    pub text: String,
    pub url: String,
    pub title: String,
}

/// Emphasised run. Nested markup inside is flattened to `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emphasis {
    pub raw_text: String,
    pub text: String,
    /// Bold (`**`) rather than italic (`*`).
    pub is_strong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextElement {
    pub raw_text: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeInline {
    pub raw_text: String,
    pub code: String,
}

/// Table with cells flattened to display strings.
///
/// Rows may be shorter or longer than the header; consumers pair cells with
/// headers through [`Table::cells`], which truncates instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub raw_text: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of columns a consumer should draw.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// `(header, cell)` pairs of one row, truncated to the shorter of the two.
    pub fn cells(&self, row: usize) -> impl Iterator<Item = (&str, &str)> {
        let cells = self.rows.get(row).map(Vec::as_slice).unwrap_or_default();
        self.headers
            .iter()
            .zip(cells)
            .map(|(header, cell)| (header.as_str(), cell.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HorizontalRule {
    pub raw_text: String,
}
