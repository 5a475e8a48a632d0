//! # Inline Processing
//!
//! Two views of the same inline syntax:
//!
//! - **Structured** ([`build_inlines`]): one typed [`Inline`] per top-level
//!   inline node, in source order. Emphasis and link labels are flattened to
//!   strings; inner structure below the first level is not kept.
//! - **Plain** ([`plain_text`]): a single display string, for headings, list
//!   items and link labels.

use std::ops::Range;

use crate::models::{CodeInline, Emphasis, Image, Inline, Link, TextElement};

use super::syntax::{InlineKind, SyntaxInline};

/// Source text covered by `range`, empty if the range is out of bounds.
pub(crate) fn slice(source: &str, range: &Range<usize>) -> String {
    source.get(range.clone()).unwrap_or_default().to_string()
}

/// Maps every inline node to a typed inline.
pub fn build_inlines(source: &str, nodes: &[SyntaxInline]) -> Vec<Inline> {
    nodes.iter().map(|node| map_inline(source, node)).collect()
}

/// Maps one inline node. Anything without a dedicated variant becomes a text
/// run holding its best-effort string form.
pub fn map_inline(source: &str, node: &SyntaxInline) -> Inline {
    let raw_text = slice(source, &node.range);
    match &node.kind {
        InlineKind::Link {
            is_image: true,
            url,
            title,
            children,
        } => Inline::Image(Image {
            raw_text,
            source: url.clone(),
            title: title.clone(),
            alt: plain_text(children),
        }),
        InlineKind::Link {
            is_image: false,
            url,
            title,
            children,
        } => Inline::Link(Link {
            raw_text,
            text: plain_text(children),
            url: url.clone(),
            title: title.clone(),
        }),
        InlineKind::Emphasis { strong, children } => Inline::Emphasis(Emphasis {
            raw_text,
            text: plain_text(children),
            is_strong: *strong,
        }),
        InlineKind::Code(code) => Inline::Code(CodeInline {
            raw_text,
            code: code.clone(),
        }),
        InlineKind::Text(text) => Inline::Text(TextElement {
            raw_text,
            text: text.clone(),
        }),
        InlineKind::Break { .. } | InlineKind::Other { .. } => Inline::Text(TextElement {
            raw_text,
            text: plain_inline(node),
        }),
    }
}

/// Builds an [`Image`] from an image link node.
pub fn image(source: &str, node: &SyntaxInline) -> Option<Image> {
    match map_inline(source, node) {
        Inline::Image(image) => Some(image),
        _ => None,
    }
}

/// Concatenated display string of a sequence of inline nodes.
pub fn plain_text(nodes: &[SyntaxInline]) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&plain_inline(node));
    }
    out
}

/// Display string of one inline node.
pub fn plain_inline(node: &SyntaxInline) -> String {
    match &node.kind {
        InlineKind::Text(text) => text.clone(),
        InlineKind::Code(code) => code.clone(),
        InlineKind::Emphasis { children, .. } | InlineKind::Link { children, .. } => {
            plain_text(children)
        }
        InlineKind::Break { hard: false } => " ".to_string(),
        InlineKind::Break { hard: true } => "\n".to_string(),
        InlineKind::Other { literal, children } => {
            if children.is_empty() {
                literal.clone()
            } else {
                plain_text(children)
            }
        }
    }
}
