use crate::domain::model::{Fetched, PuzzleRequest, SourceKind};
use crate::domain::ports::{PuzzleSource, Storage};
use crate::utils::error::{NonogramError, Result};
use crate::utils::validation::Validate;
use std::collections::HashMap;

/// Result of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub path: String,
    pub size: usize,
}

/// Composes a puzzle source with a puzzle format and writes the result.
pub struct PuzzleEngine<S: Storage> {
    sources: HashMap<SourceKind, Box<dyn PuzzleSource>>,
    storage: S,
}

impl<S: Storage> PuzzleEngine<S> {
    pub fn new(storage: S) -> Self {
        Self {
            sources: HashMap::new(),
            storage,
        }
    }

    pub fn with_source(mut self, source: impl PuzzleSource + 'static) -> Self {
        self.sources.insert(source.kind(), Box::new(source));
        self
    }

    fn source(&self, kind: SourceKind) -> Result<&dyn PuzzleSource> {
        self.sources
            .get(&kind)
            .map(|source| source.as_ref())
            .ok_or_else(|| NonogramError::UnsupportedSource {
                source_name: kind.display_name().to_string(),
            })
    }

    /// Fetches and encodes one puzzle. Nothing is written.
    pub async fn produce(&self, request: &PuzzleRequest) -> Result<Vec<u8>> {
        let source = self.source(request.source)?;

        tracing::info!(
            "🚀 Fetching puzzle {} from {} as {}",
            request.id,
            request.source,
            request.format
        );

        match source.fetch(request).await? {
            Fetched::Raw(content) => {
                if !request.format.validate_raw(&content) {
                    tracing::error!(
                        "Downloaded content for puzzle {} does not appear to be a valid nonogram",
                        request.id
                    );
                    return Err(NonogramError::InvalidContent {
                        message: format!(
                            "{} returned no valid {} file for puzzle {}",
                            request.source, request.format, request.id
                        ),
                    });
                }
                Ok(content.into_bytes())
            }
            Fetched::Model(puzzle) => {
                puzzle.validate()?;
                tracing::debug!(
                    "Puzzle {} validated: {} rows, {} columns",
                    puzzle.id,
                    puzzle.row_clues.len(),
                    puzzle.column_clues.len()
                );
                let content = request.format.serialize(&puzzle)?;
                Ok(content.into_bytes())
            }
        }
    }

    /// Produces the puzzle and stores it as `<id>.<ext>`.
    pub async fn download(&self, request: &PuzzleRequest) -> Result<Artifact> {
        let data = self.produce(request).await?;
        let file_name = format!("{}.{}", request.id, request.format.extension());
        let path = self.storage.write_file(&file_name, &data).await?;

        tracing::info!("📁 Puzzle {} saved to {}", request.id, path);
        Ok(Artifact {
            file_name,
            path,
            size: data.len(),
        })
    }
}

/// Name offered to users for a downloaded file.
pub fn download_file_name(request: &PuzzleRequest) -> String {
    format!(
        "nonogram-{}-{}.{}",
        request.source.slug(),
        request.id,
        request.format.extension()
    )
}
