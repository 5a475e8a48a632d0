// Shared by the benchmark targets; each target uses a different subset.
#![allow(dead_code)]

use std::fmt::Write;

/// Daily notes: a heading, tasks, a time table, a quote and a chart per day.
pub fn notes_document(days: usize) -> String {
    let mut out = String::new();
    for day in 0..days {
        let _ = write!(
            out,
            "## Day {day}\n\n\
             Met with **team {t}** about the [roadmap](notes/roadmap.md) and `build.rs`.\n\n\
             - [x] review PR {day}\n- [ ] write summary\n  - [ ] attach chart\n\n\
             | Task | Hours | Owner |\n|---|---|---|\n| Review | 2 | Ana |\n| Notes | 1 |\n\n\
             > Keep the log short.\n\n\
             ![chart {day}](charts/day{day}.png)\n\n",
            t = day % 7,
        );
    }
    out
}

/// One table with `rows` data rows; every third row is left short.
pub fn wide_table(rows: usize, columns: usize) -> String {
    let header: Vec<String> = (0..columns).map(|c| format!("col {c}")).collect();
    let mut out = format!("| {} |\n|{}\n", header.join(" | "), "---|".repeat(columns));
    for row in 0..rows {
        let width = if row % 3 == 0 { columns - 1 } else { columns };
        let cells: Vec<String> = (0..width).map(|c| format!("r{row}c{c} *x*")).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}

/// Fenced code blocks holding blank lines, which the segmenter must not split.
pub fn fenced_code(blocks: usize, lines: usize) -> String {
    let mut out = String::new();
    for block in 0..blocks {
        let _ = writeln!(out, "```rust");
        for line in 0..lines {
            if line % 4 == 3 {
                out.push('\n');
            } else {
                let _ = writeln!(out, "let v{block}_{line} = {line};");
            }
        }
        out.push_str("```\n\nBetween fences.\n\n");
    }
    out
}

/// A task list `depth` levels deep with `width` items per level.
pub fn nested_tasks(depth: usize, width: usize) -> String {
    fn level(out: &mut String, depth: usize, width: usize, indent: usize) {
        if depth == 0 {
            return;
        }
        for i in 0..width {
            let check = if i % 2 == 0 { 'x' } else { ' ' };
            let _ = writeln!(out, "{}- [{check}] task {indent}.{i}", "  ".repeat(indent));
            level(out, depth - 1, width, indent + 1);
        }
    }
    let mut out = String::new();
    level(&mut out, depth, width, 0);
    out
}
