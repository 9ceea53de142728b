//! Resolution of listing/detail hrefs against a page's own URL
//!
//! The catalog emits two href shapes: absolute paths ("/players?offset=60")
//! and sibling segments ("page3"). Resolution replaces either the whole
//! path or just the final path segment of the base URL; scheme, host and
//! query stay inherited from the base. `Url::join` is deliberately not
//! used here because it drops the base URL's query string.

use crate::UrlError;
use url::Url;

/// Resolves a possibly-relative `href` against the URL of the document it
/// was found on.
///
/// * `href` starting with `/` replaces the entire path of `base`.
/// * Otherwise `href` replaces only the final path segment of `base`.
///
/// No percent-decoding or normalization is performed.
pub fn resolve_href(base: &Url, href: &str) -> Result<Url, UrlError> {
    let mut resolved = base.clone();
    if href.starts_with('/') {
        resolved.set_path(href);
    } else {
        let mut segments: Vec<&str> = base.path().split('/').collect();
        match segments.last_mut() {
            Some(last) => *last = href,
            None => return Err(UrlError::BadBase(base.to_string())),
        }
        resolved.set_path(&segments.join("/"));
    }
    Ok(resolved)
}

/// Parses a raw start URL supplied on the command line.
pub fn parse_start_url(raw: &str) -> Result<Url, UrlError> {
    Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))
}
