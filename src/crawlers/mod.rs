pub mod fetcher;
pub mod scroll;
pub mod web;

pub use fetcher::PageFetcher;
pub use web::BrowserFetcher;
