use crate::config::{BrowserConfig, ScraperConfig, ScrollConfig};
use crate::crawlers::fetcher::PageFetcher;
use crate::crawlers::scroll::{self, ScrollSurface, Sleeper, TokioSleeper};
use crate::error::FetchError;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use tokio::time::timeout;

/// Fetches pages through a WebDriver-controlled Chrome session.
///
/// Every call to [`PageFetcher::fetch`] opens its own session and closes it
/// before returning, whether or not the page loaded.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    webdriver_url: String,
    browser: BrowserConfig,
    scroll: ScrollConfig,
}

impl BrowserFetcher {
    pub fn new(
        webdriver_url: impl Into<String>,
        browser: BrowserConfig,
        scroll: ScrollConfig,
    ) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            browser,
            scroll,
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(
            config.webdriver_url.clone(),
            config.browser.clone(),
            config.scroll.clone(),
        )
    }

    /// Session capabilities for a desktop Chrome with the configured switches
    pub fn capabilities(&self) -> Map<String, Value> {
        let mut args: Vec<String> = Vec::new();
        if self.browser.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(self.browser.extra_args.iter().cloned());
        args.push(format!("--user-agent={}", self.browser.user_agent));

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    /// Connects to the WebDriver instance and opens a new session
    async fn connect(&self) -> Result<Client, FetchError> {
        if self.webdriver_url.is_empty() {
            return Err(FetchError::Unavailable(
                "no WebDriver URL configured".to_string(),
            ));
        }

        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        match builder.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                Ok(client)
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
                ::log::error!(
                    "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
                );
                Err(FetchError::Session {
                    url: self.webdriver_url.clone(),
                    source: e,
                })
            }
        }
    }

    /// Navigates, scrolls until the listing stops growing and reads the markup
    async fn render(&self, client: &Client, url: &str) -> Result<String, FetchError> {
        let start = std::time::Instant::now();

        client
            .goto(url)
            .await
            .map_err(|source| FetchError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let sleeper = TokioSleeper;
        sleeper.sleep(self.scroll.initial_wait()).await;

        let mut surface = ClientSurface { client };
        match timeout(
            self.scroll.deadline(),
            scroll::scroll_until_stable(&mut surface, &self.scroll, &sleeper),
        )
        .await
        {
            Ok(Ok(summary)) => {
                ::log::debug!(
                    "Scrolled {} in {} passes (final height {}px)",
                    url,
                    summary.passes,
                    summary.final_height
                );
            }
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                ::log::warn!(
                    "Scrolling {} did not settle within {}s, using current content",
                    url,
                    self.scroll.deadline_secs
                );
            }
        }

        let html = client.source().await.map_err(FetchError::Source)?;

        ::log::info!(
            "Rendered {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(html)
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        ::log::info!("Fetching {}", url);
        let client = self.connect().await?;

        let result = self.render(&client, url).await;

        // Close the session whether or not rendering succeeded
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        result
    }
}

/// Scroll surface backed by a live WebDriver session
struct ClientSurface<'a> {
    client: &'a Client,
}

impl ScrollSurface for ClientSurface<'_> {
    async fn scroll_height(&mut self) -> Result<u64, FetchError> {
        let value = self
            .client
            .execute("return document.body.scrollHeight", vec![])
            .await
            .map_err(FetchError::Script)?;
        parse_height(&value)
    }

    async fn scroll_by(&mut self, pixels: u64) -> Result<(), FetchError> {
        self.client
            .execute("window.scrollBy(0, arguments[0]);", vec![json!(pixels)])
            .await
            .map_err(FetchError::Script)?;
        Ok(())
    }
}

/// Reads a height returned by the page script
fn parse_height(value: &Value) -> Result<u64, FetchError> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|h| *h >= 0.0).map(|h| h as u64))
        .ok_or_else(|| FetchError::InvalidHeight(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_include_browser_switches() {
        let fetcher = BrowserFetcher::new(
            "http://localhost:4444",
            BrowserConfig::default(),
            ScrollConfig::default(),
        );
        let caps = fetcher.capabilities();
        let args: Vec<&str> = caps["goog:chromeOptions"]["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        assert!(args.contains(&"--headless=new"));
        assert!(args.contains(&"--no-sandbox"));
        assert!(
            args.iter()
                .any(|a| a.starts_with("--user-agent=Mozilla/5.0 (Windows NT 10.0"))
        );
    }

    #[test]
    fn test_headful_session_omits_headless_switch() {
        let browser = BrowserConfig {
            headless: false,
            ..BrowserConfig::default()
        };
        let fetcher =
            BrowserFetcher::new("http://localhost:4444", browser, ScrollConfig::default());
        let caps = fetcher.capabilities();
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a.as_str() == Some("--headless=new")));
    }

    #[test]
    fn test_parse_height() {
        assert_eq!(parse_height(&json!(2400)).unwrap(), 2400);
        assert_eq!(parse_height(&json!(2400.0)).unwrap(), 2400);
        assert!(matches!(
            parse_height(&Value::Null),
            Err(FetchError::InvalidHeight(_))
        ));
        assert!(matches!(
            parse_height(&json!("tall")),
            Err(FetchError::InvalidHeight(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_webdriver_url_fails_without_connecting() {
        let fetcher = BrowserFetcher::new("", BrowserConfig::default(), ScrollConfig::default());
        let result = fetcher.fetch("https://www.myntra.com/shirts").await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }
}
