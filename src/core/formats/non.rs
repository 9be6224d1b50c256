//! The `.non` clue-list text format.

use crate::domain::model::{ClueLine, Puzzle};

/// True when all four structural lines of a `.non` file are present, in any order.
pub fn has_required_sections(content: &str) -> bool {
    let mut width_found = false;
    let mut height_found = false;
    let mut rows_found = false;
    let mut columns_found = false;

    for line in content.lines().map(str::trim) {
        if line.starts_with("width ") {
            width_found = true;
        } else if line.starts_with("height ") {
            height_found = true;
        } else if line == "rows" {
            rows_found = true;
        } else if line == "columns" {
            columns_found = true;
        }
    }

    width_found && height_found && rows_found && columns_found
}

fn join_line(line: &ClueLine) -> String {
    line.iter()
        .map(|clue| clue.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn render(puzzle: &Puzzle) -> String {
    let mut lines = Vec::with_capacity(10 + puzzle.row_clues.len() + puzzle.column_clues.len());

    lines.push(format!("catalogue \"nonograms.org #{}\"", puzzle.id));
    lines.push(format!("title \"{}\"", puzzle.title));
    lines.push(format!("by \"{}\"", puzzle.author));
    lines.push(format!("copyright \"{}\"", puzzle.copyright));
    lines.push(format!("width {}", puzzle.width));
    lines.push(format!("height {}", puzzle.height));
    lines.push(String::new());

    lines.push("rows".to_string());
    lines.extend(puzzle.row_clues.iter().map(join_line));
    lines.push(String::new());

    lines.push("columns".to_string());
    lines.extend(puzzle.column_clues.iter().map(join_line));

    lines.join("\n")
}
