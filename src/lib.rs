pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::Cli;

pub use adapters::{LocalStorage, WebDriverRenderer};
pub use config::AppConfig;
pub use core::engine::{download_file_name, Artifact, PuzzleEngine};
pub use core::formats::PuzzleFormat;
pub use core::model_validator::is_valid_puzzle;
pub use core::sources::{NonogramsOrgSource, WebpbnSource};
pub use domain::model::{Clue, Puzzle, PuzzleId, PuzzleRequest, SourceKind};
pub use utils::error::{NonogramError, Result};
