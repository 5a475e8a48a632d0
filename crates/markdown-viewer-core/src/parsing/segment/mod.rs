//! # Block Segmentation
//!
//! Splits raw text into blocks separated by blank lines, keeping fenced code
//! regions intact. Each block is later parsed on its own.
//!
//! ## Parsing Phases
//!
//! 1. **Line feeding**: lines are pushed one at a time into a [`BlockSegmenter`],
//!    which tracks whether it is inside a backtick fence.
//! 2. **Emission**: a blank line outside a fence closes the current block.
//!    End of input flushes whatever remains.
//!
//! ## Drivers
//!
//! - [`TextBlocks`]: in-memory `&str`
//! - [`ReaderBlocks`]: blocking [`std::io::BufRead`]
//! - [`AsyncBlocks`]: [`tokio::io::AsyncBufRead`]
//!
//! ## Known limitation
//!
//! A blank line always ends a block outside fences, even in the middle of a
//! construct that Markdown would treat as continuous (a quote with a blank
//! line, a loose list). The fragments are parsed independently.

pub mod fence;

use std::io::{self, BufRead};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub use fence::CodeFence;

/// Line-at-a-time block accumulator.
#[derive(Debug, Default)]
pub struct BlockSegmenter {
    in_fence: bool,
    buffer: String,
}

impl BlockSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line (without its terminator). Returns a completed block
    /// when the line closes one.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if CodeFence::is_marker(line) {
            self.in_fence = !self.in_fence;
        }

        if !self.in_fence && line.trim().is_empty() && !self.buffer.is_empty() {
            return Some(std::mem::take(&mut self.buffer));
        }

        self.buffer.push_str(line);
        self.buffer.push('\n');
        None
    }

    /// Flushes the trailing block at end of input.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

/// Blocks of an in-memory string.
#[derive(Debug)]
pub struct TextBlocks<'a> {
    lines: std::str::Lines<'a>,
    segmenter: BlockSegmenter,
    done: bool,
}

impl<'a> TextBlocks<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            segmenter: BlockSegmenter::new(),
            done: false,
        }
    }
}

impl Iterator for TextBlocks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        for line in self.lines.by_ref() {
            if let Some(block) = self.segmenter.push_line(line) {
                return Some(block);
            }
        }
        self.done = true;
        self.segmenter.finish()
    }
}

/// Blocks read from a blocking line source.
///
/// An I/O error is yielded once and ends the sequence.
#[derive(Debug)]
pub struct ReaderBlocks<R> {
    lines: io::Lines<R>,
    segmenter: BlockSegmenter,
    done: bool,
}

impl<R: BufRead> ReaderBlocks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            segmenter: BlockSegmenter::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for ReaderBlocks<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<io::Result<String>> {
        if self.done {
            return None;
        }
        for line in self.lines.by_ref() {
            match line {
                Ok(line) => {
                    if let Some(block) = self.segmenter.push_line(&line) {
                        return Some(Ok(block));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        self.segmenter.finish().map(Ok)
    }
}

/// Blocks read from an async line source.
#[derive(Debug)]
pub struct AsyncBlocks<R> {
    lines: tokio::io::Lines<R>,
    segmenter: BlockSegmenter,
    done: bool,
}

impl<R: AsyncBufRead + Unpin> AsyncBlocks<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            segmenter: BlockSegmenter::new(),
            done: false,
        }
    }

    /// Reads until the next block is complete. `Ok(None)` at end of input.
    pub async fn next_block(&mut self) -> io::Result<Option<String>> {
        if self.done {
            return Ok(None);
        }
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(block) = self.segmenter.push_line(&line) {
                        return Ok(Some(block));
                    }
                }
                Ok(None) => {
                    self.done = true;
                    return Ok(self.segmenter.finish());
                }
                Err(e) => {
                    self.done = true;
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blocks(text: &str) -> Vec<String> {
        TextBlocks::new(text).collect()
    }

    #[test]
    fn blank_line_splits_blocks() {
        assert_eq!(blocks("a\nb\n\nc"), vec!["a\nb\n", "c\n"]);
    }

    #[test]
    fn blank_line_inside_fence_is_kept() {
        let text = "```\nx\n\ny\n```\nafter";
        assert_eq!(blocks(text), vec!["```\nx\n\ny\n```\nafter\n"]);
    }

    #[test]
    fn consecutive_blank_lines_are_kept_with_next_block() {
        assert_eq!(blocks("a\n\n\nb"), vec!["a\n", "\nb\n"]);
    }

    #[test]
    fn whitespace_only_line_counts_as_blank() {
        assert_eq!(blocks("a\n   \nb"), vec!["a\n", "b\n"]);
    }

    #[test]
    fn quote_is_split_by_blank_line() {
        assert_eq!(
            blocks("> quote line 1\n\n> quote line 2"),
            vec!["> quote line 1\n", "> quote line 2\n"]
        );
    }

    #[test]
    fn unterminated_fence_swallows_rest_of_input() {
        let text = "```\ncode\n\nmore";
        assert_eq!(blocks(text), vec!["```\ncode\n\nmore\n"]);
    }

    #[test]
    fn empty_input_has_no_blocks() {
        assert!(blocks("").is_empty());
    }

    #[test]
    fn crlf_line_endings_are_normalised() {
        assert_eq!(blocks("a\r\n\r\nb\r\n"), vec!["a\n", "b\n"]);
    }

    #[test]
    fn reader_blocks_match_text_blocks() {
        let text = "# h\n\npara\n\n```\n\n```\n";
        let from_reader: Vec<String> = ReaderBlocks::new(text.as_bytes())
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(from_reader, blocks(text));
    }

    #[tokio::test]
    async fn async_blocks_match_text_blocks() {
        let text = "one\n\ntwo\nlines\n\n```\n\n```";
        let mut source = AsyncBlocks::new(text.as_bytes());
        let mut out = vec![];
        while let Some(block) = source.next_block().await.unwrap() {
            out.push(block);
        }
        assert_eq!(out, blocks(text));
    }
}
