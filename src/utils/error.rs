use thiserror::Error;

#[derive(Error, Debug)]
pub enum NonogramError {
    /// Transport failures are this variant plus `HttpStatusError`; both map to
    /// `ErrorCategory::Network`.
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    /// The server answered, but with a non-2xx status.
    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Downloaded content is not a valid puzzle: {message}")]
    InvalidContent { message: String },

    #[error("Puzzle not found: {message}")]
    NotFound { message: String },

    #[error("Page layout missing expected element: {selector}")]
    LayoutMissing { selector: String },

    #[error("Scraping failed: {message}")]
    ScrapeError { message: String },

    #[error("Extracted puzzle is invalid: {reason}")]
    InvalidModel { reason: String },

    #[error("Renderer error: {message}")]
    RendererError { message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("No downloader registered for source: {source_name}")]
    UnsupportedSource { source_name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Content,
    Extraction,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NonogramError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TransportError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::InvalidContent { .. } | Self::NotFound { .. } | Self::InvalidModel { .. } => {
                ErrorCategory::Content
            }
            Self::LayoutMissing { .. } | Self::ScrapeError { .. } | Self::RendererError { .. } => {
                ErrorCategory::Extraction
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UnsupportedSource { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the caller may simply try again later
            ErrorCategory::Network | ErrorCategory::Extraction => ErrorSeverity::Medium,
            ErrorCategory::Content | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::TransportError(_) | Self::HttpStatusError { .. } => {
                "Check network connectivity and that the puzzle site is reachable, then retry"
            }
            Self::InvalidContent { .. } | Self::NotFound { .. } => {
                "Verify that the puzzle id exists on the selected source"
            }
            Self::LayoutMissing { .. } | Self::ScrapeError { .. } => {
                "The page layout may have changed; inspect the saved error screenshot"
            }
            Self::RendererError { .. } => {
                "Make sure a WebDriver server (e.g. chromedriver) is running at the configured URL"
            }
            Self::InvalidModel { .. } => "The scraped clues are inconsistent; try the other source",
            Self::SerializationError { .. } => "Report this puzzle id, the model could not be encoded",
            Self::UnsupportedSource { .. } => "Use one of: webpbn, nonograms-org",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
            Self::IoError(_) => "Check that the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::TransportError(_) | Self::HttpStatusError { .. } => {
                format!("Could not download the puzzle: {}", self)
            }
            Self::NotFound { message } => format!("Puzzle does not exist: {}", message),
            Self::InvalidContent { .. } => {
                "The source did not return a valid puzzle (it may not exist)".to_string()
            }
            Self::LayoutMissing { .. } | Self::ScrapeError { .. } | Self::RendererError { .. } => {
                format!("Could not read the puzzle page: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NonogramError>;
