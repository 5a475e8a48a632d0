//! # Rendering
//!
//! Maps document elements onto visual nodes owned by a [`VisualBackend`].
//! The [`Renderer`] owns the dispatch: one create call per element when a
//! document is first drawn, one update call per element when content changes
//! and the existing visual can be kept.
//!
//! ## Updates
//!
//! Every [`Rendered`] node remembers the [`ElementKind`] it was created for.
//! Updating it with an element of a different kind changes nothing and
//! reports [`UpdateOutcome::Incompatible`]; the caller decides whether to
//! rebuild. [`Renderer::refresh`] does that for a whole document.
//!
//! ## Collaborators
//!
//! Backends receive a [`RenderContext`] with every call. It carries the link
//! activation callback and the image loader, so a backend can wire link
//! targets into its input handling and start image loads for image nodes.

pub mod images;
pub mod link;
pub mod outline;

use std::sync::Arc;

use log::{debug, warn};

use crate::error::RenderError;
use crate::models::{
    CodeBlock, CodeInline, Element, ElementKind, Emphasis, Heading, HorizontalRule, Image, Link,
    List, ListItem, Paragraph, Quote, Table, TaskList, TaskListItem, TextElement,
};
use crate::parsing::MarkdownParser;

pub use images::{Diagnostic, Diagnostics, ImageFetcher, ImageLoader, ImageOutcome};
pub use link::LinkSignal;
pub use outline::OutlineBackend;

/// What a backend gets to see besides the element itself.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    links: LinkSignal,
    images: ImageLoader,
}

impl RenderContext {
    pub fn links(&self) -> &LinkSignal {
        &self.links
    }

    /// Starts an asynchronous image load; see [`ImageLoader::request`].
    pub fn request_image(&self, url: &str, on_done: impl FnOnce(ImageOutcome) + Send + 'static) {
        self.images.request(url, Box::new(on_done));
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.images.diagnostics()
    }
}

/// Whether an update for a nested kind changed the visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Skipped,
}

/// A visual node capability.
///
/// Nodes are handles: cloning one must refer to the same visual. The nine
/// document-level kinds must be drawable; the kinds that only occur nested
/// inside other elements fall back to [`VisualBackend::unsupported`] unless
/// a backend overrides them.
pub trait VisualBackend {
    type Node: Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    /// An empty vertical container for a whole document.
    fn container(&mut self) -> Result<Self::Node, Self::Error>;
    fn append(&mut self, parent: &Self::Node, child: Self::Node) -> Result<(), Self::Error>;
    /// Drops `node` and everything appended under it. Called once a rebuilt
    /// document has replaced it.
    fn remove(&mut self, _node: &Self::Node) -> Result<(), Self::Error> {
        Ok(())
    }
    /// Visual shown for an element this backend cannot draw.
    fn unsupported(&mut self, kind: ElementKind) -> Result<Self::Node, Self::Error>;

    fn create_heading(
        &mut self,
        heading: &Heading,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    fn create_paragraph(
        &mut self,
        paragraph: &Paragraph,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    fn create_code_block(
        &mut self,
        code: &CodeBlock,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    fn create_list(&mut self, list: &List, cx: &RenderContext) -> Result<Self::Node, Self::Error>;
    fn create_task_list(
        &mut self,
        list: &TaskList,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    fn create_quote(
        &mut self,
        quote: &Quote,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    /// Should return a placeholder at once and start the load with
    /// [`RenderContext::request_image`].
    fn create_image(
        &mut self,
        image: &Image,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    fn create_table(
        &mut self,
        table: &Table,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;
    fn create_horizontal_rule(
        &mut self,
        rule: &HorizontalRule,
        cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error>;

    fn create_list_item(
        &mut self,
        _item: &ListItem,
        _cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error> {
        fall_back(self, ElementKind::ListItem)
    }
    fn create_task_list_item(
        &mut self,
        _item: &TaskListItem,
        _cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error> {
        fall_back(self, ElementKind::TaskListItem)
    }
    fn create_link(
        &mut self,
        _link: &Link,
        _cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error> {
        fall_back(self, ElementKind::Link)
    }
    fn create_emphasis(
        &mut self,
        _emphasis: &Emphasis,
        _cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error> {
        fall_back(self, ElementKind::Emphasis)
    }
    fn create_text(
        &mut self,
        _text: &TextElement,
        _cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error> {
        fall_back(self, ElementKind::Text)
    }
    fn create_code_inline(
        &mut self,
        _code: &CodeInline,
        _cx: &RenderContext,
    ) -> Result<Self::Node, Self::Error> {
        fall_back(self, ElementKind::CodeInline)
    }

    fn update_heading(
        &mut self,
        node: &mut Self::Node,
        heading: &Heading,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_paragraph(
        &mut self,
        node: &mut Self::Node,
        paragraph: &Paragraph,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_code_block(
        &mut self,
        node: &mut Self::Node,
        code: &CodeBlock,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_list(
        &mut self,
        node: &mut Self::Node,
        list: &List,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_task_list(
        &mut self,
        node: &mut Self::Node,
        list: &TaskList,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_quote(
        &mut self,
        node: &mut Self::Node,
        quote: &Quote,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    /// Expected to request the image again, even when the source is unchanged.
    fn update_image(
        &mut self,
        node: &mut Self::Node,
        image: &Image,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_table(
        &mut self,
        node: &mut Self::Node,
        table: &Table,
        cx: &RenderContext,
    ) -> Result<(), Self::Error>;
    fn update_horizontal_rule(
        &mut self,
        _node: &mut Self::Node,
        _rule: &HorizontalRule,
        _cx: &RenderContext,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Updates for the nested kinds. A backend that overrides the matching
    /// `create_*` method must override these too; the defaults report
    /// [`Applied::Skipped`].
    fn update_list_item(
        &mut self,
        _node: &mut Self::Node,
        _item: &ListItem,
        _cx: &RenderContext,
    ) -> Result<Applied, Self::Error> {
        Ok(Applied::Skipped)
    }
    fn update_task_list_item(
        &mut self,
        _node: &mut Self::Node,
        _item: &TaskListItem,
        _cx: &RenderContext,
    ) -> Result<Applied, Self::Error> {
        Ok(Applied::Skipped)
    }
    fn update_link(
        &mut self,
        _node: &mut Self::Node,
        _link: &Link,
        _cx: &RenderContext,
    ) -> Result<Applied, Self::Error> {
        Ok(Applied::Skipped)
    }
    fn update_emphasis(
        &mut self,
        _node: &mut Self::Node,
        _emphasis: &Emphasis,
        _cx: &RenderContext,
    ) -> Result<Applied, Self::Error> {
        Ok(Applied::Skipped)
    }
    fn update_text(
        &mut self,
        _node: &mut Self::Node,
        _text: &TextElement,
        _cx: &RenderContext,
    ) -> Result<Applied, Self::Error> {
        Ok(Applied::Skipped)
    }
    fn update_code_inline(
        &mut self,
        _node: &mut Self::Node,
        _code: &CodeInline,
        _cx: &RenderContext,
    ) -> Result<Applied, Self::Error> {
        Ok(Applied::Skipped)
    }
}

fn fall_back<B: VisualBackend + ?Sized>(
    backend: &mut B,
    kind: ElementKind,
) -> Result<B::Node, B::Error> {
    warn!("backend has no visual for {kind}, drawing the unsupported fallback");
    backend.unsupported(kind)
}

/// A visual node and the element kind it was created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered<N> {
    node: N,
    kind: ElementKind,
}

impl<N> Rendered<N> {
    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }
}

/// Root container plus one rendered child per document element, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument<N> {
    root: N,
    children: Vec<Rendered<N>>,
}

impl<N> RenderedDocument<N> {
    pub fn root(&self) -> &N {
        &self.root
    }

    pub fn children(&self) -> &[Rendered<N>] {
        &self.children
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// Nothing was changed; the node was created for `existing`.
    Incompatible {
        existing: ElementKind,
        new: ElementKind,
    },
    /// The backend has no update for `kind`; the node shows the old content.
    Skipped { kind: ElementKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Every child was updated in place.
    InPlace,
    /// The element sequence changed shape and a new document was rendered.
    Rebuilt,
}

/// Drives a [`VisualBackend`] from Markdown text or elements.
#[derive(Debug)]
pub struct Renderer<B> {
    backend: B,
    parser: MarkdownParser,
    cx: RenderContext,
}

impl<B: VisualBackend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            parser: MarkdownParser::default(),
            cx: RenderContext::default(),
        }
    }

    pub fn with_parser(mut self, parser: MarkdownParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_image_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.cx.images = ImageLoader::new(Some(fetcher));
        self
    }

    pub fn on_link_activated(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.cx.links = LinkSignal::new(handler);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn context(&self) -> &RenderContext {
        &self.cx
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.cx.diagnostics()
    }

    /// Parses `text` to completion and renders every element into a fresh
    /// container.
    pub fn render_document(
        &mut self,
        text: &str,
    ) -> Result<RenderedDocument<B::Node>, RenderError> {
        let elements = self.parser.parse_str(text);
        self.render_elements(&elements)
    }

    pub fn render_elements(
        &mut self,
        elements: &[Element],
    ) -> Result<RenderedDocument<B::Node>, RenderError> {
        let root = self
            .backend
            .container()
            .map_err(|e| RenderError::Container { source: Box::new(e) })?;
        let mut children = Vec::with_capacity(elements.len());
        for element in elements {
            let rendered = self.render_element(element)?;
            self.backend
                .append(&root, rendered.node.clone())
                .map_err(|e| RenderError::Append {
                    kind: rendered.kind,
                    source: Box::new(e),
                })?;
            children.push(rendered);
        }
        debug!("rendered document with {} elements", children.len());
        Ok(RenderedDocument { root, children })
    }

    pub fn render_element(&mut self, element: &Element) -> Result<Rendered<B::Node>, RenderError> {
        let kind = element.kind();
        let b = &mut self.backend;
        let cx = &self.cx;
        let node = match element {
            Element::Heading(e) => b.create_heading(e, cx),
            Element::Paragraph(e) => b.create_paragraph(e, cx),
            Element::CodeBlock(e) => b.create_code_block(e, cx),
            Element::List(e) => b.create_list(e, cx),
            Element::ListItem(e) => b.create_list_item(e, cx),
            Element::TaskList(e) => b.create_task_list(e, cx),
            Element::TaskListItem(e) => b.create_task_list_item(e, cx),
            Element::Quote(e) => b.create_quote(e, cx),
            Element::Image(e) => b.create_image(e, cx),
            Element::Link(e) => b.create_link(e, cx),
            Element::Emphasis(e) => b.create_emphasis(e, cx),
            Element::Text(e) => b.create_text(e, cx),
            Element::CodeInline(e) => b.create_code_inline(e, cx),
            Element::Table(e) => b.create_table(e, cx),
            Element::HorizontalRule(e) => b.create_horizontal_rule(e, cx),
        }
        .map_err(|e| RenderError::Create {
            kind,
            source: Box::new(e),
        })?;
        Ok(Rendered { node, kind })
    }

    /// Applies `element` to an existing visual. A kind mismatch leaves the
    /// node untouched.
    pub fn update_element(
        &mut self,
        rendered: &mut Rendered<B::Node>,
        element: &Element,
    ) -> Result<UpdateOutcome, RenderError> {
        let kind = element.kind();
        if rendered.kind != kind {
            warn!(
                "cannot update {} visual with {} content, leaving it unchanged",
                rendered.kind, kind
            );
            return Ok(UpdateOutcome::Incompatible {
                existing: rendered.kind,
                new: kind,
            });
        }
        let b = &mut self.backend;
        let cx = &self.cx;
        let node = &mut rendered.node;
        let changed = |r: Result<(), B::Error>| r.map(|()| Applied::Changed);
        let applied = match element {
            Element::Heading(e) => changed(b.update_heading(node, e, cx)),
            Element::Paragraph(e) => changed(b.update_paragraph(node, e, cx)),
            Element::CodeBlock(e) => changed(b.update_code_block(node, e, cx)),
            Element::List(e) => changed(b.update_list(node, e, cx)),
            Element::TaskList(e) => changed(b.update_task_list(node, e, cx)),
            Element::Quote(e) => changed(b.update_quote(node, e, cx)),
            Element::Image(e) => changed(b.update_image(node, e, cx)),
            Element::Table(e) => changed(b.update_table(node, e, cx)),
            Element::HorizontalRule(e) => changed(b.update_horizontal_rule(node, e, cx)),
            Element::ListItem(e) => b.update_list_item(node, e, cx),
            Element::TaskListItem(e) => b.update_task_list_item(node, e, cx),
            Element::Link(e) => b.update_link(node, e, cx),
            Element::Emphasis(e) => b.update_emphasis(node, e, cx),
            Element::Text(e) => b.update_text(node, e, cx),
            Element::CodeInline(e) => b.update_code_inline(node, e, cx),
        }
        .map_err(|e| RenderError::Update {
            kind,
            source: Box::new(e),
        })?;
        match applied {
            Applied::Changed => Ok(UpdateOutcome::Updated),
            Applied::Skipped => {
                warn!("backend has no update for {kind}, the visual keeps its old content");
                Ok(UpdateOutcome::Skipped { kind })
            }
        }
    }

    /// Brings `document` in line with `text`, updating in place when the new
    /// elements line up kind for kind with the rendered ones and rendering a
    /// new document otherwise. A replaced document is removed from the
    /// backend.
    pub fn refresh(
        &mut self,
        document: &mut RenderedDocument<B::Node>,
        text: &str,
    ) -> Result<Refresh, RenderError> {
        let elements = self.parser.parse_str(text);
        let same_shape = elements.len() == document.children.len()
            && elements
                .iter()
                .zip(&document.children)
                .all(|(element, rendered)| element.kind() == rendered.kind);
        if same_shape {
            let mut in_place = true;
            for (element, rendered) in elements.iter().zip(document.children.iter_mut()) {
                in_place &= self.update_element(rendered, element)? == UpdateOutcome::Updated;
            }
            if in_place {
                return Ok(Refresh::InPlace);
            }
        }
        let old = std::mem::replace(document, self.render_elements(&elements)?);
        self.backend
            .remove(&old.root)
            .map_err(|e| RenderError::Remove { source: Box::new(e) })?;
        Ok(Refresh::Rebuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Draws only the mandatory kinds and logs every call.
    #[derive(Default)]
    struct Minimal {
        calls: Vec<String>,
        next: usize,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("backend refused")]
    struct Refused;

    impl Minimal {
        fn node(&mut self, call: String) -> Result<usize, Refused> {
            self.calls.push(call);
            self.next += 1;
            Ok(self.next)
        }

        fn touch(&mut self, node: &usize, call: &str) -> Result<(), Refused> {
            self.calls.push(format!("{call}#{node}"));
            Ok(())
        }
    }

    impl VisualBackend for Minimal {
        type Node = usize;
        type Error = Refused;

        fn container(&mut self) -> Result<usize, Refused> {
            self.node("container".into())
        }
        fn append(&mut self, parent: &usize, child: usize) -> Result<(), Refused> {
            self.calls.push(format!("append {child} to {parent}"));
            Ok(())
        }
        fn unsupported(&mut self, kind: ElementKind) -> Result<usize, Refused> {
            self.node(format!("unsupported {kind}"))
        }
        fn remove(&mut self, node: &usize) -> Result<(), Refused> {
            self.calls.push(format!("remove {node}"));
            Ok(())
        }
        fn create_heading(&mut self, h: &Heading, _: &RenderContext) -> Result<usize, Refused> {
            self.node(format!("heading {}", h.text))
        }
        fn create_paragraph(&mut self, _: &Paragraph, _: &RenderContext) -> Result<usize, Refused> {
            self.node("paragraph".into())
        }
        fn create_code_block(
            &mut self,
            _: &CodeBlock,
            _: &RenderContext,
        ) -> Result<usize, Refused> {
            Err(Refused)
        }
        fn create_list(&mut self, _: &List, _: &RenderContext) -> Result<usize, Refused> {
            self.node("list".into())
        }
        fn create_task_list(&mut self, _: &TaskList, _: &RenderContext) -> Result<usize, Refused> {
            self.node("task list".into())
        }
        fn create_quote(&mut self, _: &Quote, _: &RenderContext) -> Result<usize, Refused> {
            self.node("quote".into())
        }
        fn create_image(&mut self, _: &Image, _: &RenderContext) -> Result<usize, Refused> {
            self.node("image".into())
        }
        fn create_table(&mut self, _: &Table, _: &RenderContext) -> Result<usize, Refused> {
            self.node("table".into())
        }
        fn create_horizontal_rule(
            &mut self,
            _: &HorizontalRule,
            _: &RenderContext,
        ) -> Result<usize, Refused> {
            self.node("rule".into())
        }
        fn update_heading(
            &mut self,
            n: &mut usize,
            h: &Heading,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, &format!("update heading {}", h.text))
        }
        fn update_paragraph(
            &mut self,
            n: &mut usize,
            _: &Paragraph,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, "update paragraph")
        }
        fn update_code_block(
            &mut self,
            _: &mut usize,
            _: &CodeBlock,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            Err(Refused)
        }
        fn update_list(
            &mut self,
            n: &mut usize,
            _: &List,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, "update list")
        }
        fn update_task_list(
            &mut self,
            n: &mut usize,
            _: &TaskList,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, "update task list")
        }
        fn update_quote(
            &mut self,
            n: &mut usize,
            _: &Quote,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, "update quote")
        }
        fn update_image(
            &mut self,
            n: &mut usize,
            _: &Image,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, "update image")
        }
        fn update_table(
            &mut self,
            n: &mut usize,
            _: &Table,
            _: &RenderContext,
        ) -> Result<(), Refused> {
            self.touch(n, "update table")
        }
    }

    fn element(text: &str) -> Element {
        MarkdownParser::default().parse_str(text).remove(0)
    }

    #[test]
    fn document_children_are_appended_in_order() {
        let mut renderer = Renderer::new(Minimal::default());
        let doc = renderer.render_document("# a\n\ntext\n\n---\n").unwrap();
        let kinds: Vec<_> = doc.children().iter().map(Rendered::kind).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Heading, ElementKind::Paragraph, ElementKind::HorizontalRule]
        );
        assert_eq!(
            renderer.backend().calls,
            vec![
                "container",
                "heading a",
                "append 2 to 1",
                "paragraph",
                "append 3 to 1",
                "rule",
                "append 4 to 1",
            ]
        );
    }

    #[test]
    fn nested_kinds_fall_back_to_unsupported() {
        let mut renderer = Renderer::new(Minimal::default());
        let link = Element::Link(Link {
            raw_text: "[a](b)".into(),
            text: "a".into(),
            url: "b".into(),
            title: String::new(),
        });
        let mut rendered = renderer.render_element(&link).unwrap();
        assert_eq!(rendered.kind(), ElementKind::Link);
        assert_eq!(renderer.backend().calls, vec!["unsupported link"]);
        assert_eq!(
            renderer.update_element(&mut rendered, &link).unwrap(),
            UpdateOutcome::Skipped {
                kind: ElementKind::Link
            }
        );
        assert_eq!(renderer.backend().calls.len(), 1);
    }

    #[test]
    fn incompatible_update_is_a_no_op() {
        let mut renderer = Renderer::new(Minimal::default());
        let mut rendered = renderer.render_element(&element("# title")).unwrap();
        let outcome = renderer
            .update_element(&mut rendered, &element("just text"))
            .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Incompatible {
                existing: ElementKind::Heading,
                new: ElementKind::Paragraph,
            }
        );
        assert_eq!(renderer.backend().calls, vec!["heading title"]);
    }

    #[test]
    fn compatible_update_reaches_backend() {
        let mut renderer = Renderer::new(Minimal::default());
        let mut rendered = renderer.render_element(&element("# old")).unwrap();
        renderer
            .update_element(&mut rendered, &element("## new"))
            .unwrap();
        assert_eq!(renderer.backend().calls, vec!["heading old", "update heading new#1"]);
    }

    #[test]
    fn backend_errors_carry_the_kind() {
        let mut renderer = Renderer::new(Minimal::default());
        let err = renderer.render_document("```\ncode\n```\n").unwrap_err();
        assert!(matches!(
            err,
            RenderError::Create {
                kind: ElementKind::CodeBlock,
                ..
            }
        ));
    }

    #[test]
    fn refresh_updates_in_place_when_shape_matches() {
        let mut renderer = Renderer::new(Minimal::default());
        let mut doc = renderer.render_document("# a\n\nbody\n").unwrap();
        let refresh = renderer.refresh(&mut doc, "# b\n\nother body\n").unwrap();
        assert_eq!(refresh, Refresh::InPlace);
        assert_eq!(*doc.root(), 1);
        assert!(!renderer.backend().calls.iter().any(|c| c.starts_with("remove")));
    }

    #[test]
    fn refresh_rebuilds_when_shape_changes() {
        let mut renderer = Renderer::new(Minimal::default());
        let mut doc = renderer.render_document("# a\n\nbody\n").unwrap();
        let refresh = renderer.refresh(&mut doc, "body\n\n# a\n").unwrap();
        assert_eq!(refresh, Refresh::Rebuilt);
        assert_ne!(*doc.root(), 1);
        assert_eq!(doc.children()[0].kind(), ElementKind::Paragraph);
        assert_eq!(renderer.backend().calls.last().unwrap(), "remove 1");
    }

    #[test]
    fn link_signal_reaches_backend_context() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let renderer = Renderer::new(Minimal::default())
            .on_link_activated(move |url| *sink.lock().unwrap() = Some(url.to_string()));
        renderer.context().links().activate("https://example.org");
        assert_eq!(seen.lock().unwrap().as_deref(), Some("https://example.org"));
    }
}
