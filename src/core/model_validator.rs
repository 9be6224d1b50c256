use crate::domain::model::{Clue, ClueLine, Puzzle};
use crate::utils::error::{NonogramError, Result};
use crate::utils::validation::Validate;

fn invalid(reason: String) -> NonogramError {
    NonogramError::InvalidModel { reason }
}

/// A line with no clues, or only zero runs, carries no information.
fn is_blank(line: &ClueLine) -> bool {
    line.iter().all(|clue| matches!(clue, Clue::Run(0)))
}

impl Validate for Puzzle {
    /// Checked in order, first failure wins.
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.row_clues.len() != self.height {
            return Err(invalid(format!(
                "height is {} but {} row clue lines were found",
                self.height,
                self.row_clues.len()
            )));
        }
        if self.column_clues.len() != self.width {
            return Err(invalid(format!(
                "width is {} but {} column clue lines were found",
                self.width,
                self.column_clues.len()
            )));
        }
        // an all-blank grid means the clue tables were not read, not an empty puzzle
        if self.row_clues.iter().all(is_blank) {
            return Err(invalid("all row clue lines are empty".to_string()));
        }
        if self.column_clues.iter().all(is_blank) {
            return Err(invalid("all column clue lines are empty".to_string()));
        }
        Ok(())
    }
}

pub fn is_valid_puzzle(puzzle: &Puzzle) -> bool {
    match puzzle.validate() {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Puzzle {} rejected: {}", puzzle.id, e);
            false
        }
    }
}
