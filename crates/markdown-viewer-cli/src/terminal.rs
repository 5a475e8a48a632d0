//! ratatui visual backend.
//!
//! Visuals are styled [`Line`]s plus child visuals, keyed by [`VisualId`].
//! A document replaced on reload is removed with all its visuals. The app
//! flattens the tree under the document root into one scrollable paragraph
//! on every frame, so updates and late image results show up on the next
//! draw.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use markdown_viewer_core::{
    CodeBlock, CodeInline, ElementKind, Emphasis, Heading, HorizontalRule, Image, ImageOutcome,
    Applied, Inline, Link, LinkSignal, List, ListItem, Paragraph, Quote, RenderContext, Table,
    TaskList, TaskListItem, TextElement, VisualBackend,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(usize);

/// A drawn link and the signal that fires when the user picks it.
#[derive(Debug, Clone)]
pub struct LinkTarget {
    pub text: String,
    pub url: String,
    signal: LinkSignal,
}

impl LinkTarget {
    fn new(link: &Link, cx: &RenderContext) -> Self {
        Self {
            text: link.text.clone(),
            url: link.url.clone(),
            signal: cx.links().clone(),
        }
    }

    pub fn activate(&self) {
        self.signal.activate(&self.url);
    }
}

#[derive(Debug, Default)]
struct Drawn {
    lines: Vec<Line<'static>>,
    links: Vec<LinkTarget>,
}

impl From<Vec<Line<'static>>> for Drawn {
    fn from(lines: Vec<Line<'static>>) -> Self {
        Self {
            lines,
            links: vec![],
        }
    }
}

#[derive(Debug, Default)]
struct Visual {
    drawn: Drawn,
    children: Vec<VisualId>,
}

#[derive(Debug, Clone)]
enum ImageState {
    Loading,
    Done(ImageOutcome),
}

#[derive(Debug)]
struct ImageSlot {
    /// Results of requests older than this one are dropped.
    request: u64,
    state: ImageState,
}

#[derive(Debug, Default)]
pub struct TerminalBackend {
    visuals: HashMap<VisualId, Visual>,
    next_id: usize,
    images: Arc<Mutex<HashMap<VisualId, ImageSlot>>>,
}

impl TerminalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, drawn: impl Into<Drawn>) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.visuals.insert(
            id,
            Visual {
                drawn: drawn.into(),
                children: vec![],
            },
        );
        id
    }

    fn redraw(&mut self, node: VisualId, drawn: impl Into<Drawn>) {
        if let Some(visual) = self.visuals.get_mut(&node) {
            visual.drawn = drawn.into();
        }
    }

    fn load_image(&self, node: VisualId, url: &str, cx: &RenderContext) {
        let request = {
            let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
            let request = images.get(&node).map_or(0, |slot| slot.request + 1);
            images.insert(
                node,
                ImageSlot {
                    request,
                    state: ImageState::Loading,
                },
            );
            request
        };
        let images = Arc::clone(&self.images);
        cx.request_image(url, move |outcome| {
            let mut images = images.lock().unwrap_or_else(PoisonError::into_inner);
            // A removed visual or a newer request leaves no slot to fill.
            if let Some(slot) = images.get_mut(&node).filter(|s| s.request == request) {
                slot.state = ImageState::Done(outcome);
            }
        });
    }

    fn image_status(&self, node: VisualId) -> Option<Line<'static>> {
        let images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        let status = match &images.get(&node)?.state {
            ImageState::Loading => "  loading...".to_string(),
            ImageState::Done(ImageOutcome::Loaded(bytes)) => {
                format!("  {} bytes loaded", bytes.len())
            }
            ImageState::Done(ImageOutcome::Placeholder { message }) => {
                format!("  image unavailable: {message}")
            }
        };
        Some(Line::styled(status, Style::default().fg(Color::DarkGray)))
    }

    /// Every line of the subtree under `node`, a blank line between siblings.
    pub fn lines(&self, node: VisualId) -> Vec<Line<'static>> {
        let mut out = vec![];
        self.lines_into(node, &mut out);
        out
    }

    fn lines_into(&self, node: VisualId, out: &mut Vec<Line<'static>>) {
        let Some(visual) = self.visuals.get(&node) else {
            return;
        };
        out.extend(visual.drawn.lines.iter().cloned());
        out.extend(self.image_status(node));
        for (i, child) in visual.children.iter().enumerate() {
            if i > 0 {
                out.push(Line::default());
            }
            self.lines_into(*child, out);
        }
    }

    /// Links of the subtree under `node` in reading order.
    pub fn links(&self, node: VisualId) -> Vec<LinkTarget> {
        let mut out = vec![];
        self.links_into(node, &mut out);
        out
    }

    fn links_into(&self, node: VisualId, out: &mut Vec<LinkTarget>) {
        if let Some(visual) = self.visuals.get(&node) {
            out.extend(visual.drawn.links.iter().cloned());
            for child in &visual.children {
                self.links_into(*child, out);
            }
        }
    }
}

fn heading_style(heading: &Heading) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match heading.scale() {
        s if s >= 1.7 => style.fg(Color::Cyan),
        s if s >= 1.2 => style.fg(Color::LightCyan),
        _ => style,
    }
}

fn draw_heading(heading: &Heading) -> Drawn {
    let style = heading_style(heading);
    let mut lines = vec![Line::styled(heading.text.clone(), style)];
    // Terminals have one font size; the two largest levels get an underline.
    if heading.scale() >= 1.7 {
        let rule = if heading.level == 1 { "═" } else { "─" };
        lines.push(Line::styled(rule.repeat(heading.text.chars().count()), style));
    }
    lines.into()
}

fn push_text(spans: &mut Vec<Span<'static>>, text: &str, style: Style) {
    if !text.is_empty() {
        spans.push(Span::styled(text.to_string(), style));
    }
}

fn inline_span(inline: &Inline, base: Style) -> Span<'static> {
    match inline {
        Inline::Text(t) => Span::styled(t.text.clone(), base),
        Inline::Emphasis(e) if e.is_strong => {
            Span::styled(e.text.clone(), base.add_modifier(Modifier::BOLD))
        }
        Inline::Emphasis(e) => Span::styled(e.text.clone(), base.add_modifier(Modifier::ITALIC)),
        Inline::Link(l) => Span::styled(
            l.text.clone(),
            base.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ),
        Inline::Image(i) => Span::styled(
            format!("[image: {}]", i.alt),
            base.fg(Color::Magenta),
        ),
        Inline::Code(c) => Span::styled(c.code.clone(), base.fg(Color::Yellow)),
    }
}

/// Lays out inline runs, starting a new line at every hard break.
fn draw_inlines(inlines: &[Inline], base: Style, cx: &RenderContext) -> Drawn {
    let mut drawn = Drawn::default();
    let mut spans = vec![];
    for inline in inlines {
        match inline {
            Inline::Text(t) => {
                let mut parts = t.text.split('\n');
                if let Some(first) = parts.next() {
                    push_text(&mut spans, first, base);
                }
                for part in parts {
                    drawn.lines.push(Line::from(std::mem::take(&mut spans)));
                    push_text(&mut spans, part, base);
                }
            }
            Inline::Link(l) => {
                drawn.links.push(LinkTarget::new(l, cx));
                spans.push(inline_span(inline, base));
            }
            _ => spans.push(inline_span(inline, base)),
        }
    }
    drawn.lines.push(Line::from(spans));
    drawn
}

fn draw_quote(quote: &Quote, cx: &RenderContext) -> Drawn {
    let mut drawn = draw_inlines(
        &quote.inlines,
        Style::default().add_modifier(Modifier::ITALIC),
        cx,
    );
    for line in &mut drawn.lines {
        line.spans
            .insert(0, Span::styled("│ ", Style::default().fg(Color::DarkGray)));
    }
    drawn
}

fn draw_code(code: &CodeBlock) -> Drawn {
    let mut lines = vec![];
    if !code.language.is_empty() {
        lines.push(Line::styled(
            code.language.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let style = Style::default().fg(Color::Green);
    lines.extend(code.code.lines().map(|l| Line::styled(format!("  {l}"), style)));
    lines.into()
}

fn list_marker(ordered: bool, index: usize) -> String {
    if ordered {
        format!("{}.", index + 1)
    } else {
        "•".to_string()
    }
}

fn list_item_lines(item: &ListItem, marker: &str, ordered: bool, out: &mut Vec<Line<'static>>) {
    out.push(Line::from(vec![
        Span::styled(
            format!("{}{marker} ", "  ".repeat(item.level)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(item.text.clone()),
    ]));
    for (i, child) in item.children.iter().enumerate() {
        list_item_lines(child, &list_marker(ordered, i), ordered, out);
    }
}

fn draw_list(list: &List) -> Drawn {
    let mut lines = vec![];
    for (i, item) in list.items.iter().enumerate() {
        list_item_lines(item, &list_marker(list.is_ordered, i), list.is_ordered, &mut lines);
    }
    lines.into()
}

fn task_item_lines(item: &TaskListItem, out: &mut Vec<Line<'static>>) {
    let indent = "  ".repeat(item.level);
    let (check, text_style) = if item.is_checked {
        ("[x]", Style::default().add_modifier(Modifier::CROSSED_OUT))
    } else {
        ("[ ]", Style::default())
    };
    out.push(Line::from(vec![
        Span::styled(format!("{indent}{check} "), Style::default().fg(Color::Green)),
        Span::styled(item.text.clone(), text_style),
    ]));
    for child in &item.children {
        task_item_lines(child, out);
    }
}

fn draw_task_list(list: &TaskList) -> Drawn {
    let mut lines = vec![];
    for item in &list.items {
        task_item_lines(item, &mut lines);
    }
    lines.into()
}

fn draw_image(image: &Image) -> Drawn {
    vec![Line::styled(
        format!("[image: {}] ({})", image.alt, image.source),
        Style::default().fg(Color::Magenta),
    )]
    .into()
}

fn table_row(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join(" │ ").trim_end().to_string()
}

fn draw_table(table: &Table) -> Drawn {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in 0..table.rows.len() {
        for (i, (_, cell)) in table.cells(row).enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    let mut lines = vec![
        Line::styled(
            table_row(&headers, &widths),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(separator.join("─┼─"), Style::default().fg(Color::DarkGray)),
    ];
    for row in 0..table.rows.len() {
        let cells: Vec<&str> = table.cells(row).map(|(_, cell)| cell).collect();
        lines.push(Line::raw(table_row(&cells, &widths)));
    }
    lines.into()
}

fn draw_rule() -> Drawn {
    vec![Line::styled(
        "─".repeat(RULE_WIDTH),
        Style::default().fg(Color::DarkGray),
    )]
    .into()
}

impl VisualBackend for TerminalBackend {
    type Node = VisualId;
    type Error = Infallible;

    fn container(&mut self) -> Result<VisualId, Infallible> {
        Ok(self.push(Drawn::default()))
    }

    fn append(&mut self, parent: &VisualId, child: VisualId) -> Result<(), Infallible> {
        if let Some(visual) = self.visuals.get_mut(parent) {
            visual.children.push(child);
        }
        Ok(())
    }

    fn remove(&mut self, node: &VisualId) -> Result<(), Infallible> {
        let mut pending = vec![*node];
        let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(id) = pending.pop() {
            if let Some(visual) = self.visuals.remove(&id) {
                pending.extend(visual.children);
            }
            images.remove(&id);
        }
        Ok(())
    }

    fn unsupported(&mut self, _kind: ElementKind) -> Result<VisualId, Infallible> {
        Ok(self.push(vec![Line::styled(
            "Unsupported element",
            Style::default().fg(Color::Red),
        )]))
    }

    fn create_heading(&mut self, h: &Heading, _: &RenderContext) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_heading(h)))
    }

    fn create_paragraph(
        &mut self,
        p: &Paragraph,
        cx: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_inlines(&p.inlines, Style::default(), cx)))
    }

    fn create_code_block(
        &mut self,
        code: &CodeBlock,
        _: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_code(code)))
    }

    fn create_list(&mut self, list: &List, _: &RenderContext) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_list(list)))
    }

    fn create_task_list(
        &mut self,
        list: &TaskList,
        _: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_task_list(list)))
    }

    fn create_quote(&mut self, quote: &Quote, cx: &RenderContext) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_quote(quote, cx)))
    }

    fn create_image(&mut self, image: &Image, cx: &RenderContext) -> Result<VisualId, Infallible> {
        let node = self.push(draw_image(image));
        self.load_image(node, &image.source, cx);
        Ok(node)
    }

    fn create_table(&mut self, table: &Table, _: &RenderContext) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_table(table)))
    }

    fn create_horizontal_rule(
        &mut self,
        _: &HorizontalRule,
        _: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_rule()))
    }

    fn create_list_item(
        &mut self,
        item: &ListItem,
        _: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        let mut lines = vec![];
        list_item_lines(item, "•", false, &mut lines);
        Ok(self.push(lines))
    }

    fn create_task_list_item(
        &mut self,
        item: &TaskListItem,
        _: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        let mut lines = vec![];
        task_item_lines(item, &mut lines);
        Ok(self.push(lines))
    }

    fn create_link(&mut self, link: &Link, cx: &RenderContext) -> Result<VisualId, Infallible> {
        Ok(self.push(draw_inlines(&[Inline::Link(link.clone())], Style::default(), cx)))
    }

    fn create_emphasis(
        &mut self,
        emphasis: &Emphasis,
        cx: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        let inline = Inline::Emphasis(emphasis.clone());
        Ok(self.push(draw_inlines(&[inline], Style::default(), cx)))
    }

    fn create_text(
        &mut self,
        text: &TextElement,
        cx: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        let inline = Inline::Text(text.clone());
        Ok(self.push(draw_inlines(&[inline], Style::default(), cx)))
    }

    fn create_code_inline(
        &mut self,
        code: &CodeInline,
        cx: &RenderContext,
    ) -> Result<VisualId, Infallible> {
        let inline = Inline::Code(code.clone());
        Ok(self.push(draw_inlines(&[inline], Style::default(), cx)))
    }

    fn update_heading(
        &mut self,
        node: &mut VisualId,
        heading: &Heading,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_heading(heading));
        Ok(())
    }

    fn update_paragraph(
        &mut self,
        node: &mut VisualId,
        p: &Paragraph,
        cx: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_inlines(&p.inlines, Style::default(), cx));
        Ok(())
    }

    fn update_code_block(
        &mut self,
        node: &mut VisualId,
        code: &CodeBlock,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_code(code));
        Ok(())
    }

    fn update_list(
        &mut self,
        node: &mut VisualId,
        list: &List,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_list(list));
        Ok(())
    }

    fn update_task_list(
        &mut self,
        node: &mut VisualId,
        list: &TaskList,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_task_list(list));
        Ok(())
    }

    fn update_quote(
        &mut self,
        node: &mut VisualId,
        quote: &Quote,
        cx: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_quote(quote, cx));
        Ok(())
    }

    fn update_image(
        &mut self,
        node: &mut VisualId,
        image: &Image,
        cx: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_image(image));
        self.load_image(*node, &image.source, cx);
        Ok(())
    }

    fn update_table(
        &mut self,
        node: &mut VisualId,
        table: &Table,
        _: &RenderContext,
    ) -> Result<(), Infallible> {
        self.redraw(*node, draw_table(table));
        Ok(())
    }

    fn update_link(
        &mut self,
        node: &mut VisualId,
        link: &Link,
        cx: &RenderContext,
    ) -> Result<Applied, Infallible> {
        self.redraw(*node, draw_inlines(&[Inline::Link(link.clone())], Style::default(), cx));
        Ok(Applied::Changed)
    }

    fn update_emphasis(
        &mut self,
        node: &mut VisualId,
        emphasis: &Emphasis,
        cx: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let inline = Inline::Emphasis(emphasis.clone());
        self.redraw(*node, draw_inlines(&[inline], Style::default(), cx));
        Ok(Applied::Changed)
    }

    fn update_text(
        &mut self,
        node: &mut VisualId,
        text: &TextElement,
        cx: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let inline = Inline::Text(text.clone());
        self.redraw(*node, draw_inlines(&[inline], Style::default(), cx));
        Ok(Applied::Changed)
    }

    fn update_code_inline(
        &mut self,
        node: &mut VisualId,
        code: &CodeInline,
        cx: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let inline = Inline::Code(code.clone());
        self.redraw(*node, draw_inlines(&[inline], Style::default(), cx));
        Ok(Applied::Changed)
    }

    fn update_list_item(
        &mut self,
        node: &mut VisualId,
        item: &ListItem,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let mut lines = vec![];
        list_item_lines(item, "•", false, &mut lines);
        self.redraw(*node, lines);
        Ok(Applied::Changed)
    }

    fn update_task_list_item(
        &mut self,
        node: &mut VisualId,
        item: &TaskListItem,
        _: &RenderContext,
    ) -> Result<Applied, Infallible> {
        let mut lines = vec![];
        task_item_lines(item, &mut lines);
        self.redraw(*node, lines);
        Ok(Applied::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_viewer_core::{Element, Refresh, Renderer, UpdateOutcome};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn render(md: &str) -> (Renderer<TerminalBackend>, VisualId) {
        let mut renderer = Renderer::new(TerminalBackend::new());
        let doc = renderer.render_document(md).unwrap();
        let root = *doc.root();
        (renderer, root)
    }

    #[test]
    fn top_level_headings_are_underlined() {
        let (renderer, root) = render("# Title\n\n### Small\n");
        let lines = renderer.backend().lines(root);
        assert_eq!(text(&lines), vec!["Title", "═════", "", "Small"]);
        assert!(lines[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn nested_ordered_list_is_numbered_per_level() {
        let (renderer, root) = render("1. one\n2. two\n   1. inner\n");
        assert_eq!(
            text(&renderer.backend().lines(root)),
            vec!["1. one", "2. two", "  1. inner"]
        );
    }

    #[test]
    fn task_items_show_their_state() {
        let (renderer, root) = render("- [x] done\n- [ ] open\n");
        let lines = renderer.backend().lines(root);
        assert_eq!(text(&lines), vec!["[x] done", "[ ] open"]);
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn table_columns_are_aligned() {
        let (renderer, root) = render("| Day | Hours |\n|---|---|\n| Monday | 8 |\n| Tue |\n");
        assert_eq!(
            text(&renderer.backend().lines(root)),
            vec![
                "Day    │ Hours",
                "───────┼──────",
                "Monday │ 8",
                "Tue",
            ]
        );
    }

    #[test]
    fn hard_break_starts_a_new_line() {
        let (renderer, root) = render("first\\\nsecond\n");
        assert_eq!(text(&renderer.backend().lines(root)), vec!["first", "second"]);
    }

    #[test]
    fn quote_lines_get_a_bar() {
        let (renderer, root) = render("> quoted *words*\n");
        assert_eq!(text(&renderer.backend().lines(root)), vec!["│ quoted words"]);
    }

    #[test]
    fn image_without_fetcher_shows_reason() {
        let (renderer, root) = render("![cat](cat.png)\n");
        assert_eq!(
            text(&renderer.backend().lines(root)),
            vec![
                "[image: cat] (cat.png)",
                "  image unavailable: image loading is disabled",
            ]
        );
    }

    #[test]
    fn links_are_collected_and_activate_the_signal() {
        let seen = Arc::new(Mutex::new(vec![]));
        let sink = seen.clone();
        let mut renderer = Renderer::new(TerminalBackend::new())
            .on_link_activated(move |url| sink.lock().unwrap().push(url.to_string()));
        let doc = renderer
            .render_document("see [a](a.md)\n\n> and [b](https://b.org)\n")
            .unwrap();

        let links = renderer.backend().links(*doc.root());
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["a.md", "https://b.org"]);

        links[1].activate();
        assert_eq!(*seen.lock().unwrap(), vec!["https://b.org"]);
    }

    #[test]
    fn refresh_redraws_existing_visuals() {
        let (mut renderer, _) = render("");
        let mut doc = renderer.render_document("# Old\n\n- a\n").unwrap();
        renderer.refresh(&mut doc, "# New\n\n- a\n- b\n").unwrap();
        assert_eq!(
            text(&renderer.backend().lines(*doc.root())),
            vec!["New", "═══", "", "• a", "• b"]
        );
    }

    #[test]
    fn rebuilt_document_releases_old_visuals() {
        let (mut renderer, _) = render("");
        let mut doc = renderer.render_document("# Old\n\n![a](a.png)\n").unwrap();
        let old_root = *doc.root();

        let refresh = renderer.refresh(&mut doc, "- only a list\n").unwrap();

        assert_eq!(refresh, Refresh::Rebuilt);
        let backend = renderer.backend();
        assert!(backend.lines(old_root).is_empty());
        // The first render from `render("")` left an empty container behind.
        assert_eq!(backend.visuals.len(), 3);
        assert!(backend.images.lock().unwrap().is_empty());
        assert_eq!(text(&backend.lines(*doc.root())), vec!["• only a list"]);
    }

    #[rstest]
    #[case::text(
        Element::Text(TextElement { raw_text: "a".into(), text: "a".into() }),
        Element::Text(TextElement { raw_text: "b".into(), text: "b".into() }),
        vec!["b"]
    )]
    #[case::inline_code(
        Element::CodeInline(CodeInline { raw_text: "`a`".into(), code: "a".into() }),
        Element::CodeInline(CodeInline { raw_text: "`b`".into(), code: "b".into() }),
        vec!["b"]
    )]
    #[case::task_list_item(
        Element::TaskListItem(TaskListItem {
            raw_text: "- [ ] a".into(),
            text: "a".into(),
            is_checked: false,
            level: 0,
            children: vec![],
        }),
        Element::TaskListItem(TaskListItem {
            raw_text: "- [x] a".into(),
            text: "a".into(),
            is_checked: true,
            level: 0,
            children: vec![],
        }),
        vec!["[x] a"]
    )]
    fn nested_kinds_redraw_on_update(
        #[case] old: Element,
        #[case] new: Element,
        #[case] expected: Vec<&str>,
    ) {
        let mut renderer = Renderer::new(TerminalBackend::new());
        let mut rendered = renderer.render_element(&old).unwrap();

        let outcome = renderer.update_element(&mut rendered, &new).unwrap();

        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(text(&renderer.backend().lines(*rendered.node())), expected);
    }
}
