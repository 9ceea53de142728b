//! Run configuration
//!
//! Unlike a long-running crawler, everything here comes off the command
//! line; there is no config file.

use crate::ScrapeError;
use std::path::PathBuf;
use std::time::Duration;

/// Default worker count for the detail-page fan-out.
pub const DEFAULT_WORKERS: usize = 10;

/// Fixed pause between successive listing-page fetches.
pub const DEFAULT_LISTING_DELAY: Duration = Duration::from_secs(1);

/// Configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of parallel detail-page workers
    pub workers: usize,

    /// Pause between successive listing-page fetches. No pause is imposed
    /// between detail-page fetches within a worker.
    pub listing_delay: Duration,

    /// Where the aggregated JSON collection is written
    pub output: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            workers: DEFAULT_WORKERS,
            listing_delay: DEFAULT_LISTING_DELAY,
            output: PathBuf::from("data.json"),
        }
    }
}

impl CrawlConfig {
    /// Validates the configuration, rejecting values the pipeline cannot
    /// run with.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.workers == 0 {
            return Err(ScrapeError::Config(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
