#![allow(dead_code)]

use async_trait::async_trait;
use nonogram_fetch::core::sources::nonograms_org::{
    ANSWER_LINK, COLUMN_CLUE_TABLE, ERROR_BLOCK, INFO_TABLE, PUZZLE_TABLE, ROW_CLUE_TABLE, TITLE,
};
use nonogram_fetch::domain::ports::{ElementHandle, Locator, PageRenderer, RenderedPage};
use nonogram_fetch::{NonogramError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct PageState {
    pub closed: bool,
    pub screenshots: Vec<PathBuf>,
    pub opened_urls: Vec<String>,
}

/// In-memory page: lookups are answered from a fixed table keyed by (scope, locator).
#[derive(Clone, Default)]
pub struct FakePage {
    lookups: HashMap<(Option<String>, Locator), Vec<String>>,
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    failing_text: Option<String>,
    failing_screenshot: bool,
    state: Arc<Mutex<PageState>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with the board plus the column and row clue tables.
    pub fn nonogram(columns: &[&[&str]], rows: &[&[&str]]) -> Self {
        Self::new()
            .with_element(Locator::css(PUZZLE_TABLE), "board", "")
            .with_table(COLUMN_CLUE_TABLE, "cols", columns)
            .with_table(ROW_CLUE_TABLE, "rows", rows)
    }

    fn add(&mut self, scope: Option<&str>, locator: Locator, ids: Vec<String>) {
        self.lookups
            .insert((scope.map(str::to_string), locator), ids);
    }

    pub fn with_element(mut self, locator: Locator, id: &str, text: &str) -> Self {
        self.add(None, locator, vec![id.to_string()]);
        self.texts.insert(id.to_string(), text.to_string());
        self
    }

    pub fn with_attribute(mut self, id: &str, name: &str, value: &str) -> Self {
        self.attributes
            .insert((id.to_string(), name.to_string()), value.to_string());
        self
    }

    pub fn with_table(mut self, selector: &str, id: &str, rows: &[&[&str]]) -> Self {
        self.add(None, Locator::css(selector), vec![id.to_string()]);

        let row_ids: Vec<String> = (0..rows.len()).map(|r| format!("{}-r{}", id, r)).collect();
        self.add(Some(id), Locator::css("tr"), row_ids.clone());

        for (row_id, cells) in row_ids.iter().zip(rows) {
            let cell_ids: Vec<String> = (0..cells.len())
                .map(|c| format!("{}-c{}", row_id, c))
                .collect();
            for (cell_id, text) in cell_ids.iter().zip(cells.iter()) {
                self.texts.insert(cell_id.clone(), text.to_string());
            }
            self.add(Some(row_id), Locator::css("td"), cell_ids);
        }
        self
    }

    pub fn with_title(self, title: &str) -> Self {
        self.with_element(Locator::css(TITLE), "title", title)
    }

    pub fn with_answer(self, href: &str) -> Self {
        self.with_element(Locator::css(ANSWER_LINK), "answer", "")
            .with_attribute("answer", "href", href)
    }

    pub fn with_info(self, text: &str) -> Self {
        self.with_element(Locator::xpath(INFO_TABLE), "info", text)
    }

    pub fn with_error_block(self, text: &str) -> Self {
        self.with_element(Locator::css(ERROR_BLOCK), "error", text)
    }

    pub fn failing_text_on(mut self, id: &str) -> Self {
        self.failing_text = Some(id.to_string());
        self
    }

    pub fn failing_screenshot(mut self) -> Self {
        self.failing_screenshot = true;
        self
    }

    pub fn state(&self) -> Arc<Mutex<PageState>> {
        self.state.clone()
    }

    fn ids(&self, scope: Option<&ElementHandle>, locator: &Locator) -> Vec<ElementHandle> {
        self.lookups
            .get(&(scope.map(|e| e.0.clone()), locator.clone()))
            .map(|ids| ids.iter().cloned().map(ElementHandle).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RenderedPage for FakePage {
    async fn find(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>> {
        Ok(self.ids(scope, locator).into_iter().next())
    }

    async fn find_all(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>> {
        Ok(self.ids(scope, locator))
    }

    async fn text(&self, element: &ElementHandle) -> Result<String> {
        if self.failing_text.as_deref() == Some(element.0.as_str()) {
            return Err(NonogramError::RendererError {
                message: format!("stale element reference: {}", element.0),
            });
        }
        Ok(self.texts.get(&element.0).cloned().unwrap_or_default())
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        Ok(self
            .attributes
            .get(&(element.0.clone(), name.to_string()))
            .cloned())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if self.failing_screenshot {
            return Err(NonogramError::RendererError {
                message: "screenshot failed".to_string(),
            });
        }
        self.state.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// Hands out clones of one fake page, all sharing the same state.
pub struct FakeRenderer {
    pub page: FakePage,
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn RenderedPage>> {
        self.page
            .state
            .lock()
            .unwrap()
            .opened_urls
            .push(url.to_string());
        Ok(Box::new(self.page.clone()))
    }
}

/// Column headers are padded to full width, shorter lists are blank on top.
pub const BOAT_COLUMNS: &[&[&str]] = &[&["", "", "", "", "1"], &["1", "2", "3", "", "1"]];
pub const BOAT_ROWS: &[&[&str]] = &[&["1", "2"], &["", "3"], &["", ""]];
