use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric puzzle id as both sources address puzzles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleId(pub u64);

impl PuzzleId {
    /// Eight digit, zero padded form used in webpbn export file names.
    pub fn padded(&self) -> String {
        format!("{:08}", self.0)
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PuzzleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PuzzleId)
    }
}

/// One clue value: a run length, or the raw cell text when it was not numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Clue {
    Run(u32),
    Token(String),
}

impl Clue {
    /// Parses trimmed cell text. Returns `None` for blank cells.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(match text.parse::<u32>() {
            Ok(run) => Clue::Run(run),
            Err(_) => Clue::Token(text.to_string()),
        })
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clue::Run(run) => write!(f, "{}", run),
            Clue::Token(token) => f.write_str(token),
        }
    }
}

impl From<u32> for Clue {
    fn from(run: u32) -> Self {
        Clue::Run(run)
    }
}

pub type ClueLine = Vec<Clue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub title: String,
    pub author: String,
    pub authorid: String,
    pub copyright: String,
    pub description: String,
    pub note: String,
    pub width: usize,
    pub height: usize,
    pub row_clues: Vec<ClueLine>,
    pub column_clues: Vec<ClueLine>,
    pub solution_reference: Option<String>,
}

/// Where a puzzle is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SourceKind {
    /// webpbn.com, serves export files directly
    Webpbn,
    /// nonograms.org, clues must be scraped from the rendered page
    #[cfg_attr(feature = "cli", value(name = "nonograms-org"))]
    NonogramsOrg,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Webpbn => "webpbn.com",
            SourceKind::NonogramsOrg => "nonograms.org",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            SourceKind::Webpbn => "webpbn",
            SourceKind::NonogramsOrg => "nonograms_org",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Everything needed to produce one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRequest {
    pub id: PuzzleId,
    pub source: SourceKind,
    pub format: crate::core::formats::PuzzleFormat,
    pub include_solution: bool,
}

/// What a source hands back before format handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// A ready-made file body that still has to pass the text validator.
    Raw(String),
    /// A model built by scraping, still unvalidated.
    Model(Puzzle),
}
