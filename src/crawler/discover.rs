//! Pagination traversal
//!
//! The discovery phase is strictly sequential: each page's URL comes from
//! resolving the previous page's next link, and a fixed delay bounds the
//! request rate. Discovery is fail-fast; any fetch or extraction error
//! aborts the whole traversal.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::listing::extract_listing;
use crate::model::PlayerRef;
use crate::Result;
use reqwest::Client;
use url::Url;

/// Walks the listing chain from `start_url`, accumulating every player
/// reference in page-then-row order.
///
/// The first page is fetched without a Referer; each subsequent page is
/// fetched with the previous listing URL as Referer. Terminates when a
/// page has no usable next link.
///
/// # Errors
///
/// Any fetch or extraction failure on a listing page surfaces here and
/// the partial accumulation is discarded by the caller.
pub async fn discover_players(
    client: &Client,
    start_url: Url,
    config: &CrawlConfig,
) -> Result<Vec<PlayerRef>> {
    let mut players = Vec::new();
    let mut current = start_url;
    let mut referer: Option<String> = None;

    loop {
        tracing::info!("Fetching listing page {} ({} players so far)", current, players.len());
        let page = fetch_page(client, &current, referer.as_deref()).await?;
        let listing = extract_listing(&page)?;
        players.extend(listing.players);

        match listing.next {
            Some(next) => {
                referer = Some(current.to_string());
                current = next;
            }
            None => break,
        }

        tokio::time::sleep(config.listing_delay).await;
    }

    tracing::info!("Discovery complete: {} players", players.len());
    Ok(players)
}
