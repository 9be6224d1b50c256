use crate::adapters::webdriver;
use crate::core::sources::{nonograms_org, webpbn};
use crate::utils::error::{NonogramError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub webpbn: WebpbnConfig,
    pub nonograms_org: NonogramsOrgConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebpbnConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for WebpbnConfig {
    fn default() -> Self {
        Self {
            base_url: webpbn::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: webpbn::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NonogramsOrgConfig {
    pub base_url: String,
    pub wait_timeout_seconds: u64,
    pub webdriver_url: String,
    pub headless: bool,
}

impl Default for NonogramsOrgConfig {
    fn default() -> Self {
        Self {
            base_url: nonograms_org::DEFAULT_BASE_URL.to_string(),
            wait_timeout_seconds: nonograms_org::DEFAULT_WAIT_TIMEOUT.as_secs(),
            webdriver_url: webdriver::DEFAULT_ENDPOINT.to_string(),
            headless: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./puzzles".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NonogramError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NonogramError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NonogramError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn webpbn_timeout(&self) -> Duration {
        Duration::from_secs(self.webpbn.timeout_seconds)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.nonograms_org.wait_timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        // 驗證 webpbn 設定
        validate_url("webpbn.base_url", &self.webpbn.base_url)?;
        validate_range("webpbn.timeout_seconds", self.webpbn.timeout_seconds, 1, 300)?;

        // 驗證 nonograms.org 與 WebDriver 設定
        validate_url("nonograms_org.base_url", &self.nonograms_org.base_url)?;
        validate_url("nonograms_org.webdriver_url", &self.nonograms_org.webdriver_url)?;
        validate_range(
            "nonograms_org.wait_timeout_seconds",
            self.nonograms_org.wait_timeout_seconds,
            1,
            120,
        )?;

        // 驗證輸出路徑
        validate_path("output.path", &self.output.path)?;
        Ok(())
    }
}
