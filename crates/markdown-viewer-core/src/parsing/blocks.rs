//! Block-to-element mapping.
//!
//! Each segmented block is parsed on its own and every top-level syntax node
//! maps to at most one document element. Nodes without a mapping (HTML
//! blocks, footnote definitions, front matter) are skipped with a debug log.

use log::debug;
use pulldown_cmark::Options;

use crate::models::{
    CodeBlock, Element, Heading, HorizontalRule, Inline, Paragraph, Quote, TextElement,
};

use super::inline::{build_inlines, image, plain_text, slice};
use super::lists::build_list;
use super::syntax::{BlockKind, SyntaxBlock, SyntaxInline, parse_block};
use super::table::build_table;

/// Parses one segmented block into document elements.
pub fn block_elements(block: &str, options: Options) -> Vec<Element> {
    parse_block(block, options)
        .iter()
        .filter_map(|node| build_element(block, node))
        .collect()
}

pub fn build_element(source: &str, block: &SyntaxBlock) -> Option<Element> {
    let raw_text = slice(source, &block.range);
    let element = match &block.kind {
        BlockKind::Heading { level, inlines } => Element::Heading(Heading {
            raw_text,
            level: *level,
            text: plain_text(inlines),
        }),
        BlockKind::Paragraph { inlines } => match leading_image(inlines) {
            Some(node) => Element::Image(image(source, node)?),
            None => Element::Paragraph(Paragraph {
                raw_text,
                inlines: build_inlines(source, inlines),
            }),
        },
        BlockKind::CodeBlock { info, text } => Element::CodeBlock(CodeBlock {
            raw_text,
            code: text.strip_suffix('\n').unwrap_or(text).to_string(),
            language: info.split_whitespace().next().unwrap_or_default().to_string(),
        }),
        BlockKind::List { ordered, items } => build_list(source, *ordered, items, &block.range),
        BlockKind::Quote { children } => Element::Quote(Quote {
            raw_text,
            inlines: quote_inlines(source, children),
        }),
        BlockKind::ThematicBreak => Element::HorizontalRule(HorizontalRule { raw_text }),
        BlockKind::Table { rows } => Element::Table(build_table(source, rows, &block.range)),
        BlockKind::Other => {
            debug!("skipping unmapped block {:?}", raw_text.trim_end());
            return None;
        }
    };
    Some(element)
}

/// A paragraph opening with an image is drawn as that image alone.
fn leading_image(inlines: &[SyntaxInline]) -> Option<&SyntaxInline> {
    inlines.first().filter(|node| node.is_image())
}

/// Inlines of every direct paragraph of a quote, separated by a newline run.
/// Nested constructs inside the quote contribute nothing.
fn quote_inlines(source: &str, children: &[SyntaxBlock]) -> Vec<Inline> {
    let mut out = Vec::new();
    for child in children {
        let BlockKind::Paragraph { inlines } = &child.kind else {
            continue;
        };
        if !out.is_empty() {
            out.push(Inline::Text(TextElement {
                raw_text: String::new(),
                text: "\n".to_string(),
            }));
        }
        match leading_image(inlines).and_then(|node| image(source, node)) {
            Some(img) => out.push(Inline::Image(img)),
            None => out.extend(build_inlines(source, inlines)),
        }
    }
    out
}
