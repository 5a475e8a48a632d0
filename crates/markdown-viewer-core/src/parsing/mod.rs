//! Markdown to document elements.
//!
//! Text is segmented into blank-line separated blocks ([`segment`]), each
//! block is parsed in isolation ([`syntax`]) and mapped to elements
//! ([`blocks`], [`lists`], [`table`], [`inline`]). [`stream`] wires the steps
//! into lazy sequences.

pub mod blocks;
pub mod cancel;
pub mod inline;
pub mod lists;
pub mod segment;
pub mod stream;
pub mod syntax;
pub mod table;

use std::io::BufRead;

use pulldown_cmark::Options;
use tokio::io::AsyncBufRead;

use crate::models::Element;

pub use cancel::Cancellation;
pub use stream::{ElementStream, Elements, ReaderElements};

/// Markdown extensions enabled for every block parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub footnotes: bool,
    pub smart_punctuation: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            footnotes: false,
            smart_punctuation: false,
        }
    }
}

impl From<ParseOptions> for Options {
    fn from(o: ParseOptions) -> Self {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, o.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, o.strikethrough);
        options.set(Options::ENABLE_FOOTNOTES, o.footnotes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, o.smart_punctuation);
        options
    }
}

/// Immutable parser configuration, cheap to copy and safe to share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownParser {
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl MarkdownParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options: options.into(),
        }
    }

    /// Parses a whole string to completion.
    pub fn parse_str(&self, text: &str) -> Vec<Element> {
        self.elements(text, Cancellation::new()).collect()
    }

    /// Parses one already-segmented block.
    pub fn parse_block(&self, block: &str) -> Vec<Element> {
        blocks::block_elements(block, self.options)
    }

    pub fn elements<'a>(&self, text: &'a str, cancel: Cancellation) -> Elements<'a> {
        Elements::new(text, *self, cancel)
    }

    pub fn read_elements<R: BufRead>(&self, reader: R, cancel: Cancellation) -> ReaderElements<R> {
        ReaderElements::new(reader, *self, cancel)
    }

    pub fn stream<R: AsyncBufRead + Unpin>(
        &self,
        reader: R,
        cancel: Cancellation,
    ) -> ElementStream<R> {
        ElementStream::new(reader, *self, cancel)
    }
}
