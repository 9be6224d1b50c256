use crate::core::formats::PuzzleFormat;
use crate::domain::model::{Fetched, PuzzleId, PuzzleRequest, SourceKind};
use crate::domain::ports::PuzzleSource;
use crate::utils::error::{NonogramError, Result};
use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://webpbn.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads ready-made export files from webpbn's `export.cgi`.
pub struct WebpbnSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl WebpbnSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn export_url(&self, id: PuzzleId, format: PuzzleFormat) -> String {
        format!(
            "{}/export.cgi/webpbn{}.{}",
            self.base_url,
            id.padded(),
            format.extension()
        )
    }

    fn referer(&self) -> String {
        format!("{}/export.cgi", self.base_url)
    }

    /// Export form fields, as the site's own export page submits them.
    pub fn query_params(request: &PuzzleRequest) -> Vec<(String, String)> {
        let fmt = match request.format {
            PuzzleFormat::Non => "ss",
            PuzzleFormat::Xml => "xml",
        };

        let mut params = vec![
            ("go".to_string(), "1".to_string()),
            ("sid".to_string(), String::new()),
            ("id".to_string(), request.id.to_string()),
            ("fmt".to_string(), fmt.to_string()),
        ];
        if request.include_solution {
            params.push((format!("{}_soln", fmt), "on".to_string()));
        }
        params
    }
}

impl Default for WebpbnSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl PuzzleSource for WebpbnSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Webpbn
    }

    async fn fetch(&self, request: &PuzzleRequest) -> Result<Fetched> {
        let url = self.export_url(request.id, request.format);
        tracing::info!(
            "⬇️ Downloading puzzle {} from webpbn.com in {} format",
            request.id,
            request.format.extension().to_uppercase()
        );
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(request))
            .header(REFERER, self.referer())
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("webpbn response status: {}", status);
        if !status.is_success() {
            tracing::error!("Error downloading puzzle {}: HTTP {}", request.id, status);
            return Err(NonogramError::HttpStatusError {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        tracing::debug!("Received {} bytes for puzzle {}", body.len(), request.id);
        Ok(Fetched::Raw(body))
    }
}
