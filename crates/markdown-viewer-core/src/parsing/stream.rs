//! Lazy element sequences.
//!
//! Every sequence pulls one block from its segmenter, parses it, and hands
//! out the resulting elements before touching the source again. The
//! [`Cancellation`] flag is read only when the next block is about to be
//! pulled.

use std::collections::VecDeque;
use std::io::{self, BufRead};

use log::debug;
use tokio::io::AsyncBufRead;

use crate::models::Element;

use super::MarkdownParser;
use super::cancel::Cancellation;
use super::segment::{AsyncBlocks, ReaderBlocks, TextBlocks};

/// Parse state shared by the three drivers.
#[derive(Debug)]
struct Pump {
    parser: MarkdownParser,
    cancel: Cancellation,
    pending: VecDeque<Element>,
    done: bool,
}

impl Pump {
    fn new(parser: MarkdownParser, cancel: Cancellation) -> Self {
        Self {
            parser,
            cancel,
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn pending(&mut self) -> Option<Element> {
        self.pending.pop_front()
    }

    /// Whether another block may be pulled from the source.
    fn wants_block(&mut self) -> bool {
        if !self.done && self.cancel.is_cancelled() {
            debug!("element sequence cancelled");
            self.done = true;
        }
        !self.done
    }

    fn feed(&mut self, block: &str) {
        let elements = self.parser.parse_block(block);
        debug!("block of {} bytes -> {} elements", block.len(), elements.len());
        self.pending.extend(elements);
    }

    fn end(&mut self) {
        self.done = true;
    }
}

/// Elements of an in-memory string.
#[derive(Debug)]
pub struct Elements<'a> {
    blocks: TextBlocks<'a>,
    pump: Pump,
}

impl<'a> Elements<'a> {
    pub(crate) fn new(text: &'a str, parser: MarkdownParser, cancel: Cancellation) -> Self {
        Self {
            blocks: TextBlocks::new(text),
            pump: Pump::new(parser, cancel),
        }
    }
}

impl Iterator for Elements<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        loop {
            if let Some(element) = self.pump.pending() {
                return Some(element);
            }
            if !self.pump.wants_block() {
                return None;
            }
            match self.blocks.next() {
                Some(block) => self.pump.feed(&block),
                None => {
                    self.pump.end();
                    return None;
                }
            }
        }
    }
}

/// Elements read from a blocking line source.
///
/// A read error is yielded once and ends the sequence; elements already
/// produced stay valid.
#[derive(Debug)]
pub struct ReaderElements<R> {
    blocks: ReaderBlocks<R>,
    pump: Pump,
}

impl<R: BufRead> ReaderElements<R> {
    pub(crate) fn new(reader: R, parser: MarkdownParser, cancel: Cancellation) -> Self {
        Self {
            blocks: ReaderBlocks::new(reader),
            pump: Pump::new(parser, cancel),
        }
    }
}

impl<R: BufRead> Iterator for ReaderElements<R> {
    type Item = io::Result<Element>;

    fn next(&mut self) -> Option<io::Result<Element>> {
        loop {
            if let Some(element) = self.pump.pending() {
                return Some(Ok(element));
            }
            if !self.pump.wants_block() {
                return None;
            }
            match self.blocks.next() {
                Some(Ok(block)) => self.pump.feed(&block),
                Some(Err(e)) => {
                    self.pump.end();
                    return Some(Err(e));
                }
                None => {
                    self.pump.end();
                    return None;
                }
            }
        }
    }
}

/// Elements read from an async line source. The task yields to the runtime
/// after each parsed block.
#[derive(Debug)]
pub struct ElementStream<R> {
    blocks: AsyncBlocks<R>,
    pump: Pump,
}

impl<R: AsyncBufRead + Unpin> ElementStream<R> {
    pub(crate) fn new(reader: R, parser: MarkdownParser, cancel: Cancellation) -> Self {
        Self {
            blocks: AsyncBlocks::new(reader),
            pump: Pump::new(parser, cancel),
        }
    }

    /// Next element, `Ok(None)` once the source is exhausted or cancelled.
    pub async fn next(&mut self) -> io::Result<Option<Element>> {
        loop {
            if let Some(element) = self.pump.pending() {
                return Ok(Some(element));
            }
            if !self.pump.wants_block() {
                return Ok(None);
            }
            match self.blocks.next_block().await {
                Ok(Some(block)) => {
                    self.pump.feed(&block);
                    tokio::task::yield_now().await;
                }
                Ok(None) => {
                    self.pump.end();
                    return Ok(None);
                }
                Err(e) => {
                    self.pump.end();
                    return Err(e);
                }
            }
        }
    }

    /// Drains the stream into a list.
    pub async fn collect(mut self) -> io::Result<Vec<Element>> {
        let mut out = Vec::new();
        while let Some(element) = self.next().await? {
            out.push(element);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ElementKind;
    use pretty_assertions::assert_eq;

    const THREE_BLOCKS: &str = "# one\n\ntwo\n\n---\n";

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk gone"))
        }
    }

    #[test]
    fn cancel_after_first_element_truncates() {
        let cancel = Cancellation::new();
        let mut elements = MarkdownParser::default().elements(THREE_BLOCKS, cancel.clone());
        let first = elements.next().expect("first element");
        assert_eq!(first.kind(), ElementKind::Heading);
        cancel.cancel();
        assert!(elements.next().is_none());
        assert!(elements.next().is_none());
    }

    #[test]
    fn cancel_does_not_drop_rest_of_current_block() {
        let cancel = Cancellation::new();
        let mut elements =
            MarkdownParser::default().elements("# a\ntext\n\nmore\n", cancel.clone());
        elements.next();
        cancel.cancel();
        let rest: Vec<_> = elements.map(|e| e.kind()).collect();
        assert_eq!(rest, vec![ElementKind::Paragraph]);
    }

    #[test]
    fn reader_error_ends_sequence() {
        let reader = io::BufReader::new(FailingReader);
        let mut elements = MarkdownParser::default().read_elements(reader, Cancellation::new());
        assert!(matches!(elements.next(), Some(Err(_))));
        assert!(elements.next().is_none());
    }

    #[test]
    fn reader_matches_in_memory() {
        let parser = MarkdownParser::default();
        let from_reader = parser
            .read_elements(THREE_BLOCKS.as_bytes(), Cancellation::new())
            .collect::<io::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(from_reader, parser.parse_str(THREE_BLOCKS));
    }

    #[tokio::test]
    async fn async_stream_matches_sync() {
        let parser = MarkdownParser::default();
        let streamed = parser
            .stream(THREE_BLOCKS.as_bytes(), Cancellation::new())
            .collect()
            .await
            .unwrap();
        assert_eq!(streamed, parser.parse_str(THREE_BLOCKS));
    }

    #[tokio::test]
    async fn async_stream_observes_cancellation() {
        let cancel = Cancellation::new();
        let mut stream =
            MarkdownParser::default().stream(THREE_BLOCKS.as_bytes(), cancel.clone());
        assert!(stream.next().await.unwrap().is_some());
        cancel.cancel();
        assert!(stream.next().await.unwrap().is_none());
    }
}
