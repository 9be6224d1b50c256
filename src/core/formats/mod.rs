pub mod non;
pub mod xml;

use crate::domain::model::Puzzle;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phrase webpbn puts in its "no such puzzle" page.
pub const NOT_FOUND_MARKER: &str = "No such puzzle";
/// Generic error marker; only trusted on short bodies.
pub const ERROR_MARKER: &str = "Error";
/// Bodies shorter than this that mention an error are error pages.
pub const SHORT_CONTENT_THRESHOLD: usize = 500;
/// No real puzzle file is shorter than this once trimmed.
pub const MIN_CONTENT_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PuzzleFormat {
    /// Plain text clue lists (`rows` / `columns` sections)
    Non,
    /// PBN XML with clue groups and colors
    Xml,
}

impl PuzzleFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PuzzleFormat::Non => "non",
            PuzzleFormat::Xml => "xml",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            PuzzleFormat::Non => "application/octet-stream",
            PuzzleFormat::Xml => "application/xml",
        }
    }

    /// Decides whether a downloaded body is a genuine puzzle file.
    pub fn validate_raw(&self, content: &str) -> bool {
        if looks_like_error_page(content) {
            return false;
        }
        if content.trim().chars().count() < MIN_CONTENT_LENGTH {
            return false;
        }
        match self {
            PuzzleFormat::Non => non::has_required_sections(content),
            PuzzleFormat::Xml => xml::has_puzzle_structure(content),
        }
    }

    pub fn serialize(&self, puzzle: &Puzzle) -> Result<String> {
        match self {
            PuzzleFormat::Non => Ok(non::render(puzzle)),
            PuzzleFormat::Xml => xml::render(puzzle),
        }
    }
}

impl fmt::Display for PuzzleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn looks_like_error_page(content: &str) -> bool {
    content.contains(NOT_FOUND_MARKER)
        || (content.contains(ERROR_MARKER) && content.chars().count() < SHORT_CONTENT_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NON_BODY: &str = "catalogue \"webpbn.com #1\"\ntitle \"Demo\"\nwidth 5\nheight 5\n\nrows\n1\n1\n1\n1\n1\n\ncolumns\n5\n\n\n\n\n";

    #[test]
    fn test_no_such_puzzle_rejected_for_both_formats() {
        let body = "No such puzzle 99999999";
        assert!(!PuzzleFormat::Non.validate_raw(body));
        assert!(!PuzzleFormat::Xml.validate_raw(body));
    }

    #[test]
    fn test_not_found_marker_rejected_even_in_long_content() {
        let body = format!("{}\nNo such puzzle\n{}", NON_BODY, "x".repeat(600));
        assert!(!PuzzleFormat::Non.validate_raw(&body));
    }

    #[test]
    fn test_short_error_page_rejected() {
        let body = format!("{}Error: database unavailable", NON_BODY);
        assert!(body.chars().count() < SHORT_CONTENT_THRESHOLD);
        assert!(!PuzzleFormat::Non.validate_raw(&body));
    }

    #[test]
    fn test_long_content_mentioning_error_accepted() {
        let body = format!("{}title \"Error Prone\"\n{}", NON_BODY, "# padding\n".repeat(60));
        assert!(body.chars().count() >= SHORT_CONTENT_THRESHOLD);
        assert!(PuzzleFormat::Non.validate_raw(&body));
    }

    #[test]
    fn test_short_content_rejected_for_any_format() {
        let body = "  width 1\nrows  \n";
        assert!(!PuzzleFormat::Non.validate_raw(body));
        assert!(!PuzzleFormat::Xml.validate_raw(body));
        assert!(!PuzzleFormat::Non.validate_raw(""));
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(PuzzleFormat::Non.extension(), "non");
        assert_eq!(PuzzleFormat::Xml.media_type(), "application/xml");
        assert_eq!(PuzzleFormat::Non.media_type(), "application/octet-stream");
    }

    #[test]
    fn test_non_sections_in_any_order_accepted() {
        let body = "columns\n5\n\nheight 5\n\nrows\n1\n1\n1\n1\n1\nwidth 5\n";
        assert!(body.trim().chars().count() >= MIN_CONTENT_LENGTH);
        assert!(PuzzleFormat::Non.validate_raw(body));
        assert!(!PuzzleFormat::Non.validate_raw(&format!("{}Error\n", body)));
    }
}
