use crate::domain::model::{Fetched, PuzzleRequest, SourceKind};
use crate::utils::error::{NonogramError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// A puzzle site. Yields either a raw file body or a scraped model.
#[async_trait]
pub trait PuzzleSource: Send + Sync {
    fn kind(&self) -> SourceKind;
    async fn fetch(&self, request: &PuzzleRequest) -> Result<Fetched>;
}

/// How an element is looked up on a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => f.write_str(selector),
            Locator::XPath(expression) => write!(f, "xpath={}", expression),
        }
    }
}

/// Opaque reference to an element on a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub String);

/// Polling interval of the default `wait_for`.
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A loaded page that can be queried. Lookups may be scoped to an element.
#[async_trait]
pub trait RenderedPage: Send + Sync {
    async fn find(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>>;

    async fn find_all(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>>;

    async fn text(&self, element: &ElementHandle) -> Result<String>;

    async fn attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>>;

    async fn screenshot(&self, path: &Path) -> Result<()>;

    async fn close(&self) -> Result<()>;

    /// Polls `find` until the element shows up or `timeout` elapses.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<ElementHandle> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(element) = self.find(None, locator).await? {
                return Ok(element);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(NonogramError::LayoutMissing {
                    selector: locator.to_string(),
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}

/// Something that can load a URL into a queryable page.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn RenderedPage>>;
}
