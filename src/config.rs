use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Top-level configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root; search URLs and product links are built from it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Directory holding the raw HTML artifact of each run
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Directory the spreadsheet is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Number of products scraped when the user does not ask for a count
    #[serde(default = "default_product_count")]
    pub default_product_count: usize,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Browser session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub user_agent: String,
    /// Extra command-line switches passed to Chrome
    pub extra_args: Vec<String>,
}

/// Pacing of the lazy-load scroll loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels scrolled per increment
    pub step_px: u64,
    /// Pause after each increment
    pub step_pause_ms: u64,
    /// Pause after a full pass, before re-measuring the page height
    pub settle_ms: u64,
    /// Wait after navigation for the first scripts to run
    pub initial_wait_ms: u64,
    /// Upper bound on full scroll passes
    pub max_passes: u32,
    /// Overall deadline for the scroll loop
    pub deadline_secs: u64,
}

/// CSS selectors locating the product fields in a listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub container: String,
    pub name: String,
    pub price: String,
    pub rating: String,
    /// Element inside the rating container holding the rating text
    pub rating_value: String,
    pub picture: String,
    pub image: String,
    pub link: String,
}

/// Default value for base_url
fn default_base_url() -> String {
    "https://www.myntra.com".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("temp_files")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_product_count() -> usize {
    10
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36"
                .to_string(),
            extra_args: vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step_px: 300,
            step_pause_ms: 500,
            settle_ms: 1000,
            initial_wait_ms: 5000,
            max_passes: 50,
            deadline_secs: 120,
        }
    }
}

impl ScrollConfig {
    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn initial_wait(&self) -> Duration {
        Duration::from_millis(self.initial_wait_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: ".results-base".to_string(),
            name: ".product-product".to_string(),
            price: ".product-discountedPrice".to_string(),
            rating: ".product-ratingsContainer".to_string(),
            rating_value: "span".to_string(),
            picture: "picture".to_string(),
            image: "img".to_string(),
            link: "a".to_string(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            temp_dir: default_temp_dir(),
            output_dir: default_output_dir(),
            default_product_count: default_product_count(),
            browser: BrowserConfig::default(),
            scroll: ScrollConfig::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the WebDriver URL with an environment variable if provided
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                ::log::debug!("Using WEBDRIVER_URL from environment: {}", webdriver_url);
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        if self.scroll.step_px == 0 {
            return Err(ConfigError::Value {
                field: "scroll.step_px",
                message: "must be greater than 0".to_string(),
            });
        }

        if self.default_product_count == 0 {
            return Err(ConfigError::Value {
                field: "default_product_count",
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ScraperConfig::from_json("{}").unwrap();
        assert_eq!(config.base_url, "https://www.myntra.com");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.temp_dir, PathBuf::from("temp_files"));
        assert_eq!(config.default_product_count, 10);
        assert_eq!(config.scroll.step_px, 300);
        assert_eq!(config.selectors.container, ".results-base");
        assert!(config.browser.headless);
    }

    #[test]
    fn test_partial_nested_override() {
        let json = r##"{
            "base_url": "https://shop.example.com",
            "scroll": { "step_px": 500 },
            "selectors": { "container": "#grid" }
        }"##;
        let config = ScraperConfig::from_json(json).unwrap();
        assert_eq!(config.base_url, "https://shop.example.com");
        assert_eq!(config.scroll.step_px, 500);
        assert_eq!(config.scroll.step_pause_ms, 500);
        assert_eq!(config.selectors.container, "#grid");
        assert_eq!(config.selectors.name, ".product-product");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ScraperConfig::from_json(r#"{ "base_url": "not a url" }"#);
        assert!(matches!(result, Err(ConfigError::BaseUrl { .. })));
    }

    #[test]
    fn test_zero_step_rejected() {
        let result = ScraperConfig::from_json(r#"{ "scroll": { "step_px": 0 } }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Value {
                field: "scroll.step_px",
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = ScraperConfig::from_json("{ base_url: ");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_product_count": 25 }"#).unwrap();

        let config = ScraperConfig::from_file(&path).unwrap();
        assert_eq!(config.default_product_count, 25);

        let missing = ScraperConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
