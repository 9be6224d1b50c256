use crate::domain::model::{Clue, ClueLine, Fetched, Puzzle, PuzzleId, PuzzleRequest, SourceKind};
use crate::domain::ports::{ElementHandle, Locator, PageRenderer, PuzzleSource, RenderedPage};
use crate::utils::error::{NonogramError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.nonograms.org";
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

pub const ERROR_BLOCK: &str = "div.error_block";
pub const PUZZLE_TABLE: &str = "#nonogram_table";
pub const COLUMN_CLUE_TABLE: &str = "#nonogram_table .nmtt table";
pub const ROW_CLUE_TABLE: &str = "#nonogram_table .nmtl table";
pub const TITLE: &str = "#nonogram_title";
pub const ANSWER_LINK: &str = "#nonogram_answer";
pub const INFO_TABLE: &str = "//h1/following-sibling::table[1]";

const AUTHOR: &str = "Unknown";
const AUTHOR_ID: &str = "unknown";
const COPYRIGHT: &str = "(c) nonograms.org";

fn size_pattern() -> &'static Regex {
    static SIZE: OnceLock<Regex> = OnceLock::new();
    SIZE.get_or_init(|| Regex::new(r"Size:\s*(\d+)x(\d+)").expect("size pattern is valid"))
}

/// Finds the `WxH` size in the text of the puzzle's info table.
pub fn parse_size(info_text: &str) -> Option<(usize, usize)> {
    let caps = size_pattern().captures(info_text)?;
    let width = caps[1].parse().ok()?;
    let height = caps[2].parse().ok()?;
    Some((width, height))
}

/// Scrapes puzzles from nonograms.org pages through a [`PageRenderer`].
pub struct NonogramsOrgSource<R: PageRenderer> {
    renderer: R,
    base_url: String,
    wait_timeout: Duration,
    diagnostics_dir: Option<PathBuf>,
}

impl<R: PageRenderer> NonogramsOrgSource<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            base_url: DEFAULT_BASE_URL.to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            diagnostics_dir: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Directory for `error_<id>.png` screenshots taken when scraping fails.
    pub fn with_diagnostics_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.diagnostics_dir = Some(dir.into());
        self
    }

    pub fn puzzle_url(&self, id: PuzzleId) -> String {
        format!("{}/nonograms/i/{}", self.base_url, id)
    }

    /// Opens the puzzle page, scrapes it and always closes the page again.
    pub async fn extract(&self, id: PuzzleId) -> Result<Puzzle> {
        let url = self.puzzle_url(id);
        tracing::info!("🌐 Scraping puzzle {} from {}", id, url);

        let page = self
            .renderer
            .open(&url)
            .await
            .map_err(|e| NonogramError::ScrapeError {
                message: format!("could not open {}: {}", url, e),
            })?;

        let result = match scrape_puzzle(page.as_ref(), id, self.wait_timeout).await {
            Ok(puzzle) => Ok(puzzle),
            Err(e @ (NonogramError::NotFound { .. } | NonogramError::LayoutMissing { .. })) => {
                tracing::error!("Puzzle {}: {}", id, e);
                Err(e)
            }
            Err(e) => {
                tracing::error!("An error occurred while scraping puzzle {}: {}", id, e);
                self.capture_diagnostics(page.as_ref(), id).await;
                Err(match e {
                    NonogramError::ScrapeError { .. } => e,
                    other => NonogramError::ScrapeError {
                        message: other.to_string(),
                    },
                })
            }
        };

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close page for puzzle {}: {}", id, e);
        }
        result
    }

    async fn capture_diagnostics(&self, page: &dyn RenderedPage, id: PuzzleId) {
        let Some(dir) = &self.diagnostics_dir else {
            return;
        };
        let path = dir.join(format!("error_{}.png", id));
        match page.screenshot(&path).await {
            Ok(()) => tracing::info!("📸 Saved error screenshot to {}", path.display()),
            Err(e) => tracing::warn!("Could not save error screenshot: {}", e),
        }
    }
}

#[async_trait]
impl<R: PageRenderer> PuzzleSource for NonogramsOrgSource<R> {
    fn kind(&self) -> SourceKind {
        SourceKind::NonogramsOrg
    }

    async fn fetch(&self, request: &PuzzleRequest) -> Result<Fetched> {
        if request.include_solution {
            tracing::debug!("nonograms.org pages carry no solution grid, include_solution ignored");
        }
        self.extract(request.id).await.map(Fetched::Model)
    }
}

async fn cell_clues(page: &dyn RenderedPage, row: &ElementHandle) -> Result<Vec<Option<Clue>>> {
    let cells = page.find_all(Some(row), &Locator::css("td")).await?;
    let mut clues = Vec::with_capacity(cells.len());
    for cell in &cells {
        let text = page.text(cell).await?;
        let clue = Clue::parse(&text);
        if let Some(Clue::Token(token)) = &clue {
            tracing::warn!("Could not convert clue '{}' to int, keeping it as text", token);
        }
        clues.push(clue);
    }
    Ok(clues)
}

async fn table_rows(page: &dyn RenderedPage, table: &str) -> Result<Vec<ElementHandle>> {
    match page.find(None, &Locator::css(table)).await? {
        Some(table) => page.find_all(Some(&table), &Locator::css("tr")).await,
        None => {
            tracing::warn!("Clue table '{}' not found", table);
            Ok(Vec::new())
        }
    }
}

/// Builds a puzzle from an already loaded nonograms.org page.
pub async fn scrape_puzzle(
    page: &dyn RenderedPage,
    id: PuzzleId,
    wait_timeout: Duration,
) -> Result<Puzzle> {
    if let Some(error_block) = page.find(None, &Locator::css(ERROR_BLOCK)).await? {
        let message = page.text(&error_block).await?.trim().to_string();
        return Err(NonogramError::NotFound { message });
    }

    page.wait_for(&Locator::css(PUZZLE_TABLE), wait_timeout).await?;

    // Header rows are padded to full width, so the first row gives the column count.
    let column_rows = table_rows(page, COLUMN_CLUE_TABLE).await?;
    let num_columns = match column_rows.first() {
        Some(first) => page.find_all(Some(first), &Locator::css("td")).await?.len(),
        None => 0,
    };
    let mut column_clues: Vec<ClueLine> = vec![Vec::new(); num_columns];
    if num_columns > 0 {
        for row in &column_rows {
            for (index, clue) in cell_clues(page, row).await?.into_iter().enumerate() {
                if let Some(clue) = clue {
                    column_clues[index % num_columns].push(clue);
                }
            }
        }
    }

    let row_rows = table_rows(page, ROW_CLUE_TABLE).await?;
    let mut row_clues: Vec<ClueLine> = Vec::with_capacity(row_rows.len());
    for row in &row_rows {
        row_clues.push(cell_clues(page, row).await?.into_iter().flatten().collect());
    }

    let title = match page.find(None, &Locator::css(TITLE)).await? {
        Some(element) => page.text(&element).await?.trim().to_string(),
        None => format!("Nonogram {}", id),
    };

    let solution_reference = match page.find(None, &Locator::css(ANSWER_LINK)).await? {
        Some(element) => page.attribute(&element, "href").await?,
        None => None,
    }
    .filter(|href| !href.is_empty());

    let info_text = match page.find(None, &Locator::xpath(INFO_TABLE)).await? {
        Some(element) => page.text(&element).await?,
        None => String::new(),
    };

    let (width, height) = match parse_size(&info_text) {
        Some((width, height)) => {
            if width != num_columns || height != row_rows.len() {
                tracing::warn!(
                    "Puzzle {} declares size {}x{} but clue tables are {}x{}",
                    id,
                    width,
                    height,
                    num_columns,
                    row_rows.len()
                );
            }
            (width, height)
        }
        None => {
            tracing::debug!("No size label for puzzle {}, using clue table dimensions", id);
            (num_columns, row_rows.len())
        }
    };

    tracing::info!(
        "✅ Scraped puzzle {} \"{}\" ({}x{})",
        id,
        title,
        width,
        height
    );

    Ok(Puzzle {
        id: id.to_string(),
        title,
        author: AUTHOR.to_string(),
        authorid: AUTHOR_ID.to_string(),
        copyright: COPYRIGHT.to_string(),
        description: format!("Nonogram puzzle from nonograms.org, ID: {}", id),
        note: String::new(),
        width,
        height,
        row_clues,
        column_clues,
        solution_reference,
    })
}
