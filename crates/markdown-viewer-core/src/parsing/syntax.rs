//! Owned syntax tree for a single block of Markdown.
//!
//! `pulldown-cmark` emits a flat event stream; the element builders want to
//! ask structural questions ("first paragraph among this item's
//! descendants", "first inline of this paragraph"). This module folds the
//! offset events into a small tree with source ranges attached, so every
//! node can recover the text that produced it.
//!
//! ## Event shape notes
//!
//! - Tight list items carry their inline content directly inside `Item`
//!   with no `Paragraph`; an implicit paragraph is opened for them.
//! - Table cells carry inline content directly; cells keep their inlines.
//! - Adjacent text events are merged, so a literal run is one node even when
//!   the tokenizer split it around `[`, escapes or entities.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxBlock {
    pub kind: BlockKind,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading {
        level: u8,
        inlines: Vec<SyntaxInline>,
    },
    Paragraph {
        inlines: Vec<SyntaxInline>,
    },
    CodeBlock {
        info: String,
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<SyntaxItem>,
    },
    Quote {
        children: Vec<SyntaxBlock>,
    },
    ThematicBreak,
    /// First row is the header row.
    Table {
        rows: Vec<SyntaxRow>,
    },
    /// HTML blocks, footnote definitions, metadata and anything else the
    /// element builder has no mapping for.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxItem {
    pub children: Vec<SyntaxBlock>,
    pub range: Range<usize>,
}

impl SyntaxItem {
    /// First paragraph among the item's descendants, depth first.
    pub fn first_paragraph(&self) -> Option<&[SyntaxInline]> {
        self.children.iter().find_map(SyntaxBlock::first_paragraph)
    }

    /// First list among the item's descendants, depth first.
    pub fn first_nested_list(&self) -> Option<(bool, &[SyntaxItem])> {
        self.children.iter().find_map(SyntaxBlock::first_list)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxRow {
    pub cells: Vec<SyntaxCell>,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxCell {
    pub inlines: Vec<SyntaxInline>,
    pub range: Range<usize>,
}

impl SyntaxBlock {
    fn first_paragraph(&self) -> Option<&[SyntaxInline]> {
        match &self.kind {
            BlockKind::Paragraph { inlines } => Some(inlines),
            BlockKind::Quote { children } => children.iter().find_map(Self::first_paragraph),
            BlockKind::List { items, .. } => items.iter().find_map(SyntaxItem::first_paragraph),
            _ => None,
        }
    }

    fn first_list(&self) -> Option<(bool, &[SyntaxItem])> {
        match &self.kind {
            BlockKind::List { ordered, items } => Some((*ordered, items)),
            BlockKind::Quote { children } => children.iter().find_map(Self::first_list),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxInline {
    pub kind: InlineKind,
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineKind {
    Text(String),
    Code(String),
    Emphasis {
        strong: bool,
        children: Vec<SyntaxInline>,
    },
    Link {
        is_image: bool,
        url: String,
        title: String,
        children: Vec<SyntaxInline>,
    },
    Break {
        hard: bool,
    },
    /// Strikethrough, inline HTML, footnote references and similar.
    /// `literal` holds the event text when the node has no children.
    Other {
        literal: String,
        children: Vec<SyntaxInline>,
    },
}

impl SyntaxInline {
    pub fn is_image(&self) -> bool {
        matches!(self.kind, InlineKind::Link { is_image: true, .. })
    }
}

/// Parses one block of text into syntax nodes.
pub fn parse_block(source: &str, options: Options) -> Vec<SyntaxBlock> {
    let mut builder = TreeBuilder::new(source);
    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        builder.push(event, range);
    }
    builder.finish()
}

enum Frame {
    Paragraph {
        inlines: Vec<SyntaxInline>,
        start: usize,
        end: usize,
        implicit: bool,
    },
    Heading {
        level: u8,
        inlines: Vec<SyntaxInline>,
        start: usize,
    },
    Code {
        info: String,
        text: String,
        start: usize,
    },
    Quote {
        children: Vec<SyntaxBlock>,
        start: usize,
    },
    List {
        ordered: bool,
        items: Vec<SyntaxItem>,
        start: usize,
    },
    Item {
        children: Vec<SyntaxBlock>,
        start: usize,
    },
    Table {
        rows: Vec<SyntaxRow>,
        start: usize,
    },
    Row {
        cells: Vec<SyntaxCell>,
        start: usize,
    },
    Cell {
        inlines: Vec<SyntaxInline>,
        start: usize,
    },
    Span {
        kind: SpanKind,
        children: Vec<SyntaxInline>,
        start: usize,
    },
    Opaque {
        start: usize,
    },
}

enum SpanKind {
    Emphasis { strong: bool },
    Link { is_image: bool, url: String, title: String },
    Other,
}

struct TreeBuilder<'s> {
    source: &'s str,
    stack: Vec<Frame>,
    out: Vec<SyntaxBlock>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            stack: vec![],
            out: vec![],
        }
    }

    fn push(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.open(tag, range),
            Event::End(tag) => self.close(tag, range),
            Event::Text(text) => {
                if let Some(Frame::Code { text: buf, .. }) = self.stack.last_mut() {
                    buf.push_str(&text);
                } else {
                    self.inline(InlineKind::Text(text.into_string()), range);
                }
            }
            Event::Code(code) => self.inline(InlineKind::Code(code.into_string()), range),
            Event::SoftBreak => self.inline(InlineKind::Break { hard: false }, range),
            Event::HardBreak => self.inline(InlineKind::Break { hard: true }, range),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.inline(InlineKind::Text(marker.to_string()), range);
            }
            Event::Rule => {
                self.close_implicit_paragraph();
                self.block(SyntaxBlock {
                    kind: BlockKind::ThematicBreak,
                    range,
                });
            }
            Event::FootnoteReference(label) => self.inline(
                InlineKind::Other {
                    literal: format!("[^{label}]"),
                    children: vec![],
                },
                range,
            ),
            Event::Html(html) | Event::InlineHtml(html) => {
                if !matches!(self.stack.last(), Some(Frame::Opaque { .. })) {
                    self.inline(
                        InlineKind::Other {
                            literal: html.into_string(),
                            children: vec![],
                        },
                        range,
                    );
                }
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => self.inline(
                InlineKind::Other {
                    literal: math.into_string(),
                    children: vec![],
                },
                range,
            ),
        }
    }

    fn open(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let is_inline = matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
        );
        if !is_inline {
            self.close_implicit_paragraph();
        }
        let start = range.start;
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph {
                inlines: vec![],
                start,
                end: range.end,
                implicit: false,
            },
            Tag::Heading { level, .. } => Frame::Heading {
                level: level as u8,
                inlines: vec![],
                start,
            },
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                Frame::Code {
                    info,
                    text: String::new(),
                    start,
                }
            }
            Tag::BlockQuote(_) => Frame::Quote {
                children: vec![],
                start,
            },
            Tag::List(first) => Frame::List {
                ordered: first.is_some(),
                items: vec![],
                start,
            },
            Tag::Item => Frame::Item {
                children: vec![],
                start,
            },
            Tag::Table(_) => Frame::Table {
                rows: vec![],
                start,
            },
            Tag::TableHead | Tag::TableRow => Frame::Row {
                cells: vec![],
                start,
            },
            Tag::TableCell => Frame::Cell {
                inlines: vec![],
                start,
            },
            Tag::Emphasis => Frame::Span {
                kind: SpanKind::Emphasis { strong: false },
                children: vec![],
                start,
            },
            Tag::Strong => Frame::Span {
                kind: SpanKind::Emphasis { strong: true },
                children: vec![],
                start,
            },
            Tag::Link {
                dest_url, title, ..
            } => Frame::Span {
                kind: SpanKind::Link {
                    is_image: false,
                    url: dest_url.into_string(),
                    title: title.into_string(),
                },
                children: vec![],
                start,
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Span {
                kind: SpanKind::Link {
                    is_image: true,
                    url: dest_url.into_string(),
                    title: title.into_string(),
                },
                children: vec![],
                start,
            },
            Tag::Strikethrough => Frame::Span {
                kind: SpanKind::Other,
                children: vec![],
                start,
            },
            _ => Frame::Opaque { start },
        };
        self.stack.push(frame);
    }

    fn close(&mut self, tag: TagEnd, range: Range<usize>) {
        if matches!(tag, TagEnd::Item) {
            self.close_implicit_paragraph();
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let end = range.end;
        match frame {
            Frame::Paragraph { inlines, start, .. } => self.block(SyntaxBlock {
                kind: BlockKind::Paragraph { inlines },
                range: start..end,
            }),
            Frame::Heading {
                level,
                inlines,
                start,
            } => self.block(SyntaxBlock {
                kind: BlockKind::Heading { level, inlines },
                range: start..end,
            }),
            Frame::Code { info, text, start } => self.block(SyntaxBlock {
                kind: BlockKind::CodeBlock { info, text },
                range: start..end,
            }),
            Frame::Quote { children, start } => self.block(SyntaxBlock {
                kind: BlockKind::Quote { children },
                range: start..end,
            }),
            Frame::List {
                ordered,
                items,
                start,
            } => self.block(SyntaxBlock {
                kind: BlockKind::List { ordered, items },
                range: start..end,
            }),
            Frame::Item { children, start } => {
                if let Some(Frame::List { items, .. }) = self.stack.last_mut() {
                    items.push(SyntaxItem {
                        children,
                        range: start..end,
                    });
                }
            }
            Frame::Table { rows, start } => self.block(SyntaxBlock {
                kind: BlockKind::Table { rows },
                range: start..end,
            }),
            Frame::Row { mut cells, start } => {
                let row_range = start..end;
                self.drop_padding_cells(&mut cells, &row_range);
                if let Some(Frame::Table { rows, .. }) = self.stack.last_mut() {
                    rows.push(SyntaxRow {
                        cells,
                        range: row_range,
                    });
                }
            }
            Frame::Cell { inlines, start } => {
                if let Some(Frame::Row { cells, .. }) = self.stack.last_mut() {
                    cells.push(SyntaxCell {
                        inlines,
                        range: start..end,
                    });
                }
            }
            Frame::Span {
                kind,
                children,
                start,
            } => {
                let kind = match kind {
                    SpanKind::Emphasis { strong } => InlineKind::Emphasis { strong, children },
                    SpanKind::Link {
                        is_image,
                        url,
                        title,
                    } => InlineKind::Link {
                        is_image,
                        url,
                        title,
                        children,
                    },
                    SpanKind::Other => InlineKind::Other {
                        literal: String::new(),
                        children,
                    },
                };
                self.inline(kind, start..end);
            }
            Frame::Opaque { start } => self.block(SyntaxBlock {
                kind: BlockKind::Other,
                range: start..end,
            }),
        }
    }

    fn block(&mut self, block: SyntaxBlock) {
        match self.stack.last_mut() {
            None => self.out.push(block),
            Some(Frame::Quote { children, .. }) | Some(Frame::Item { children, .. }) => {
                children.push(block)
            }
            // Content nested in something we do not model is dropped.
            Some(_) => {}
        }
    }

    fn inline(&mut self, kind: InlineKind, range: Range<usize>) {
        if matches!(self.stack.last(), Some(Frame::Item { .. })) {
            self.stack.push(Frame::Paragraph {
                inlines: vec![],
                start: range.start,
                end: range.end,
                implicit: true,
            });
        }
        let node = SyntaxInline { kind, range };
        match self.stack.last_mut() {
            Some(Frame::Paragraph { inlines, end, .. }) => {
                *end = node.range.end;
                push_merged(inlines, node);
            }
            Some(Frame::Heading { inlines, .. }) | Some(Frame::Cell { inlines, .. }) => {
                push_merged(inlines, node)
            }
            Some(Frame::Span { children, .. }) => push_merged(children, node),
            _ => {}
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if !matches!(
            self.stack.last(),
            Some(Frame::Paragraph { implicit: true, .. })
        ) {
            return;
        }
        if let Some(Frame::Paragraph {
            inlines,
            start,
            end,
            ..
        }) = self.stack.pop()
        {
            self.block(SyntaxBlock {
                kind: BlockKind::Paragraph { inlines },
                range: start..end,
            });
        }
    }

    /// The GFM table extension pads short rows with empty cells. Those cells
    /// have an empty range located after the last authored cell; removing
    /// them keeps the row length the author wrote.
    fn drop_padding_cells(&self, cells: &mut Vec<SyntaxCell>, row: &Range<usize>) {
        let row_text = self.source.get(row.clone()).unwrap_or_default();
        let content_end = row.start + row_text.trim_end().len();
        while let Some(last) = cells.last() {
            if last.range.is_empty() && last.range.start >= content_end {
                cells.pop();
            } else {
                break;
            }
        }
    }

    fn finish(mut self) -> Vec<SyntaxBlock> {
        while !self.stack.is_empty() {
            self.close(TagEnd::Paragraph, self.source.len()..self.source.len());
        }
        self.out
    }
}

fn push_merged(inlines: &mut Vec<SyntaxInline>, node: SyntaxInline) {
    if let InlineKind::Text(text) = &node.kind
        && let Some(SyntaxInline {
            kind: InlineKind::Text(prev),
            range,
        }) = inlines.last_mut()
    {
        prev.push_str(text);
        range.end = node.range.end;
        return;
    }
    inlines.push(node);
}
