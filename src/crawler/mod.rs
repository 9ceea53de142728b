//! Crawler module for listing discovery and detail extraction
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with a shared cookie jar and browser headers
//! - Listing-page extraction and pagination traversal
//! - Detail-page extraction into player records
//! - The worker pool and completion aggregation

mod detail;
mod discover;
mod fetcher;
mod listing;
mod workers;

pub use detail::extract_player;
pub use discover::discover_players;
pub use fetcher::{build_http_client, fetch_page, Page};
pub use listing::{extract_listing, ListingPage};
pub use workers::{crawl_details, Event, Progress};
