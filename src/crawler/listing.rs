//! Listing-page extraction
//!
//! One listing page yields the ordered player references found in its
//! table rows plus the link to the next page, if any. In each row's name
//! cell the first anchor is the small flag/icon link; the second anchor is
//! the player link. Rows without a usable anchor are skipped silently.

use crate::crawler::fetcher::Page;
use crate::model::PlayerRef;
use crate::url::resolve_href;
use crate::ScrapeError;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article #pjax-container table tbody tr").expect("valid selector")
});
static NAME_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td div.col-name").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));
static NEXT_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".pagination .page-item a").expect("valid selector"));

/// The result of extracting one listing page.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Player references in row order
    pub players: Vec<PlayerRef>,

    /// Resolved URL of the next listing page, `None` on the last page
    pub next: Option<Url>,
}

/// Extracts player references and the next-page link from a listing page.
pub fn extract_listing(page: &Page) -> Result<ListingPage, ScrapeError> {
    let document = Html::parse_document(&page.body);

    let mut players = Vec::new();
    for row in document.select(&ROW_SELECTOR) {
        let Some(cell) = row.select(&NAME_CELL_SELECTOR).next() else {
            continue;
        };
        // Second anchor in the cell; the first is the flag icon.
        let Some(anchor) = cell.select(&ANCHOR_SELECTOR).nth(1) else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = resolve_href(&page.url, href)?;
        let name = anchor.text().collect::<String>();
        players.push(PlayerRef {
            url,
            name,
            referer: Some(page.url.to_string()),
        });
    }

    Ok(ListingPage {
        players,
        next: next_link(&document, &page.url)?,
    })
}

/// Finds the next-page link: the last pagination anchor, unless it is
/// marked disabled or carries no href.
fn next_link(document: &Html, base: &Url) -> Result<Option<Url>, ScrapeError> {
    let Some(anchor) = document.select(&NEXT_LINK_SELECTOR).last() else {
        return Ok(None);
    };
    if anchor.value().classes().any(|class| class == "disabled") {
        return Ok(None);
    }
    let Some(href) = anchor.value().attr("href") else {
        return Ok(None);
    };
    Ok(Some(resolve_href(base, href)?))
}
