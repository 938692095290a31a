use std::io;
use std::path::PathBuf;

use fantoccini::error::{CmdError, NewSessionError};
use thiserror::Error;

/// Failures while driving the browser session for one page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("browser unavailable: {0}")]
    Unavailable(String),

    #[error("failed to start browser session at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: NewSessionError,
    },

    #[error("failed to navigate to {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: CmdError,
    },

    #[error("browser script failed: {0}")]
    Script(#[source] CmdError),

    #[error("failed to read page source: {0}")]
    Source(#[source] CmdError),

    #[error("page reported a non-numeric scroll height: {0}")]
    InvalidHeight(String),
}

/// A product tile whose structure could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTile {
    #[error("tile {index}: rating container has no rating value")]
    MissingRatingValue { index: usize },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid CSS selector for {field}: {message}")]
    Selector { field: &'static str, message: String },

    #[error("no products could be extracted: {0}")]
    Malformed(MalformedTile),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write spreadsheet {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid config value for {field}: {message}")]
    Value { field: &'static str, message: String },
}

/// Rejected interactive input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no search key provided")]
    EmptySearchKey,

    #[error("please enter a valid search term, not a number")]
    NumericSearchKey,

    #[error("product count must be a whole number, got {0:?}")]
    NonNumericCount(String),

    #[error("product count must be greater than 0")]
    CountTooSmall,
}

/// Any failure of one scrape run
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("temporary artifact error: {0}")]
    Artifact(#[from] io::Error),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
