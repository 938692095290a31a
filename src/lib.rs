//! Scrapes a product listing page into a spreadsheet.
//!
//! The page is rendered in a WebDriver-controlled browser and scrolled until
//! its lazy-loaded tiles stop appearing. Product tiles are then read out of
//! the results container and written to an `.xlsx` file.

pub mod artifact;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod exporters;
pub mod parsers;
pub mod pipeline;
pub mod request;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::{ScrapeError, ScrapeResult};
pub use pipeline::{ScrapeOutcome, ScrapePipeline, ScrapeReport};
pub use request::ScrapeRequest;
pub use results::ProductRecord;
