//! HTTP fetcher
//!
//! All page retrieval goes through here: one shared client carrying a
//! browser-identifying header set and a cookie jar that persists for the
//! whole run, plus an explicit Referer header when the caller supplies
//! one.

use crate::ScrapeError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, REFERER, USER_AGENT};
use reqwest::Client;
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/63.0.3239.84 Safari/537.36";

/// A fetched page: the final URL it was served from and its body text.
///
/// The body is kept as a string rather than a parsed tree so that it can
/// cross task boundaries; `scraper::Html` is not `Send`, so callers parse
/// it locally, off any await point.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub body: String,
}

/// Builds the shared HTTP client.
///
/// The client persists cookies across all requests in the run and sends a
/// browser-identifying header set on every request. No timeout is
/// configured; a stalled fetch stalls its worker without affecting
/// siblings.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page with an optional Referer header.
///
/// # Errors
///
/// * `ScrapeError::Http` on a network-level failure
/// * `ScrapeError::Status` on a non-2xx response
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    referer: Option<&str>,
) -> Result<Page, ScrapeError> {
    let mut request = client.get(url.clone());
    if let Some(referer) = referer {
        request = request.header(REFERER, referer);
    }

    let response = request.send().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })?;

    Ok(Page {
        url: final_url,
        body,
    })
}
