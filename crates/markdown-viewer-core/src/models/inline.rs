use serde::Serialize;

use super::element::{CodeInline, Emphasis, Image, Link, TextElement};

/// Inline content allowed inside paragraphs and quotes, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Inline {
    Text(TextElement),
    Emphasis(Emphasis),
    Link(Link),
    Image(Image),
    Code(CodeInline),
}

impl Inline {
    /// Display string of this inline, as used when a single string is needed.
    pub fn plain_text(&self) -> &str {
        match self {
            Inline::Text(t) => &t.text,
            Inline::Emphasis(e) => &e.text,
            Inline::Link(l) => &l.text,
            Inline::Image(i) => &i.alt,
            Inline::Code(c) => &c.code,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            Inline::Text(t) => &t.raw_text,
            Inline::Emphasis(e) => &e.raw_text,
            Inline::Link(l) => &l.raw_text,
            Inline::Image(i) => &i.raw_text,
            Inline::Code(c) => &c.raw_text,
        }
    }
}
