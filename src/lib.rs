//! Sprobot: a roster harvester for the sofifa player catalog
//!
//! This crate walks a paginated player listing to discover every player
//! reference, then fans the references out across a fixed pool of workers
//! that fetch and extract each player's detail page into a structured
//! record.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for sprobot operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while extracting a detail page into a player record.
///
/// Any of these aborts the record being built; fields assigned before the
/// failure stay assigned.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing expected node: {0}")]
    MissingNode(&'static str),

    #[error("Pattern did not match for {0}")]
    Pattern(&'static str),

    #[error("Failed to parse number for {field}: {text:?}")]
    Number { field: &'static str, text: String },

    #[error("Failed to parse date: {text:?}")]
    Date { text: String },

    #[error("Property group mismatch: {headers} headers, list node {list_index} unpaired")]
    GroupMismatch { headers: usize, list_index: usize },
}

/// URL resolution errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Cannot replace path of URL: {0}")]
    BadBase(String),
}

/// Result type alias for sprobot operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use model::{Player, PlayerRef, Property, PropertyGroup};
pub use self::url::resolve_href;
