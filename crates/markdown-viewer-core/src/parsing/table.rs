//! Table construction. Cells are flattened to strings; code, links and
//! images inside a cell are written back in Markdown form so the cell reads
//! the way it was authored.

use std::ops::Range;

use crate::models::Table;

use super::inline::{plain_inline, plain_text, slice};
use super::syntax::{InlineKind, SyntaxInline, SyntaxRow};

/// First row is the header; the rest are body rows. Row lengths are kept as
/// written.
pub fn build_table(source: &str, rows: &[SyntaxRow], range: &Range<usize>) -> Table {
    let mut rows = rows.iter().map(row_cells);
    let headers = rows.next().unwrap_or_default();
    Table {
        raw_text: slice(source, range),
        headers,
        rows: rows.collect(),
    }
}

fn row_cells(row: &SyntaxRow) -> Vec<String> {
    row.cells.iter().map(|cell| cell_content(&cell.inlines)).collect()
}

pub fn cell_content(nodes: &[SyntaxInline]) -> String {
    let mut out = String::new();
    for node in nodes {
        match &node.kind {
            InlineKind::Code(code) => {
                out.push('`');
                out.push_str(code);
                out.push('`');
            }
            InlineKind::Link {
                is_image: true,
                url,
                title,
                children,
            } => {
                out.push_str("![");
                out.push_str(&plain_text(children));
                out.push_str("](");
                out.push_str(url);
                if !title.is_empty() {
                    out.push_str(&format!(" \"{title}\""));
                }
                out.push(')');
            }
            InlineKind::Link { url, children, .. } => {
                out.push('[');
                out.push_str(&plain_text(children));
                out.push_str("](");
                out.push_str(url);
                out.push(')');
            }
            _ => out.push_str(&plain_inline(node)),
        }
    }
    out
}
