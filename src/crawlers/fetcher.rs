use crate::error::FetchError;

/// Source of fully rendered page markup
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Load `url` and return its final HTML once lazy content has loaded
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
