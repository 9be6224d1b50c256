//! [`PageRenderer`] over the W3C WebDriver HTTP protocol (chromedriver, geckodriver,
//! selenium). Each opened page is its own browser session.

use crate::domain::ports::{ElementHandle, Locator, PageRenderer, RenderedPage};
use crate::utils::error::{NonogramError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:4444";

/// Key under which WebDriver returns element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

enum Reply {
    Value(Value),
    Error(WireError),
}

fn renderer_error(message: impl Into<String>) -> NonogramError {
    NonogramError::RendererError {
        message: message.into(),
    }
}

async fn call(client: &Client, method: Method, url: &str, body: Option<Value>) -> Result<Reply> {
    tracing::debug!("WebDriver {} {}", method, url);
    let mut request = client.request(method, url).timeout(COMMAND_TIMEOUT);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await?;
    let status = response.status();
    let mut payload: Value = response.json().await?;
    let value = payload
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(Reply::Value(value));
    }
    match serde_json::from_value::<WireError>(value) {
        Ok(error) => Ok(Reply::Error(error)),
        Err(_) => Err(renderer_error(format!("HTTP {} from {}", status, url))),
    }
}

fn expect_value(reply: Reply) -> Result<Value> {
    match reply {
        Reply::Value(value) => Ok(value),
        Reply::Error(e) => Err(renderer_error(format!("{}: {}", e.error, e.message))),
    }
}

fn element_from(value: &Value) -> Result<ElementHandle> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementHandle(id.to_string()))
        .ok_or_else(|| renderer_error(format!("malformed element reference: {}", value)))
}

fn locator_body(locator: &Locator) -> Value {
    match locator {
        Locator::Css(selector) => json!({ "using": "css selector", "value": selector }),
        Locator::XPath(expression) => json!({ "using": "xpath", "value": expression }),
    }
}

#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    client: Client,
    endpoint: String,
    headless: bool,
}

impl WebDriverRenderer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            headless: true,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    fn capabilities(&self) -> Value {
        let mut args = vec!["--disable-gpu", "--no-sandbox"];
        if self.headless {
            args.push("--headless=new");
        }
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn RenderedPage>> {
        let session_url = format!("{}/session", self.endpoint);
        let created = expect_value(
            call(&self.client, Method::POST, &session_url, Some(self.capabilities())).await?,
        )?;
        let session_id = created
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| renderer_error("new session response carries no sessionId"))?;
        tracing::debug!("Started WebDriver session {}", session_id);

        let page = WebDriverPage {
            client: self.client.clone(),
            session_url: format!("{}/{}", session_url, session_id),
        };
        if let Err(e) = page.navigate(url).await {
            if let Err(close_err) = page.close().await {
                tracing::warn!("Failed to end WebDriver session: {}", close_err);
            }
            return Err(e);
        }
        Ok(Box::new(page))
    }
}

/// One WebDriver session showing one page.
pub struct WebDriverPage {
    client: Client,
    session_url: String,
}

impl WebDriverPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let reply = call(
            &self.client,
            Method::POST,
            &format!("{}/url", self.session_url),
            Some(json!({ "url": url })),
        )
        .await?;
        expect_value(reply).map(|_| ())
    }

    fn lookup_url(&self, scope: Option<&ElementHandle>, endpoint: &str) -> String {
        match scope {
            Some(element) => format!("{}/element/{}/{}", self.session_url, element.0, endpoint),
            None => format!("{}/{}", self.session_url, endpoint),
        }
    }
}

#[async_trait]
impl RenderedPage for WebDriverPage {
    async fn find(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>> {
        let url = self.lookup_url(scope, "element");
        match call(&self.client, Method::POST, &url, Some(locator_body(locator))).await? {
            Reply::Value(value) => element_from(&value).map(Some),
            Reply::Error(e) if e.error == "no such element" => Ok(None),
            Reply::Error(e) => Err(renderer_error(format!(
                "{} while looking up '{}': {}",
                e.error, locator, e.message
            ))),
        }
    }

    async fn find_all(
        &self,
        scope: Option<&ElementHandle>,
        locator: &Locator,
    ) -> Result<Vec<ElementHandle>> {
        let url = self.lookup_url(scope, "elements");
        let value = expect_value(
            call(&self.client, Method::POST, &url, Some(locator_body(locator))).await?,
        )?;
        match value {
            Value::Array(items) => items.iter().map(element_from).collect(),
            other => Err(renderer_error(format!("expected element list, got {}", other))),
        }
    }

    async fn text(&self, element: &ElementHandle) -> Result<String> {
        let url = format!("{}/element/{}/text", self.session_url, element.0);
        let value = expect_value(call(&self.client, Method::GET, &url, None).await?)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/element/{}/attribute/{}",
            self.session_url, element.0, name
        );
        let value = expect_value(call(&self.client, Method::GET, &url, None).await?)?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let url = format!("{}/screenshot", self.session_url);
        let value = expect_value(call(&self.client, Method::GET, &url, None).await?)?;
        let encoded = value
            .as_str()
            .ok_or_else(|| renderer_error("screenshot response is not a string"))?;
        let png = STANDARD
            .decode(encoded)
            .map_err(|e| renderer_error(format!("screenshot is not valid base64: {}", e)))?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, png).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let reply = call(&self.client, Method::DELETE, &self.session_url, None).await?;
        expect_value(reply).map(|_| ())
    }
}
