pub mod engine;
pub mod formats;
pub mod model_validator;
pub mod sources;

pub use crate::domain::model::{Clue, ClueLine, Fetched, Puzzle, PuzzleId, PuzzleRequest, SourceKind};
pub use crate::domain::ports::{PageRenderer, PuzzleSource, RenderedPage, Storage};
pub use crate::utils::error::Result;
