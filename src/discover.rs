//! Custom-template discovery from the directory-listing page.

use futures_util::future::join_all;
use indexmap::IndexMap;
use regex::Regex;

use crate::error::SelectorError;
use crate::fetch::TemplateFetcher;
use crate::TEMPLATE_DIR;

/// Relative template paths scraped from the listing HTML, in document order.
///
/// Deliberately a single regex pass over the raw markup, not a DOM parse; it
/// holds as long as file links carry an `href` ending in
/// `PULL_REQUEST_TEMPLATE/<path>.md`. Swapping in a structured parser only
/// requires replacing this function.
pub fn template_paths(listing_html: &str) -> Vec<String> {
    let pattern = format!(r#"href="[^"]*({}/[^"]+\.md)""#, TEMPLATE_DIR);
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures_iter(listing_html)
            .map(|caps| caps[1].to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Final path segment, extension kept. `PULL_REQUEST_TEMPLATE/bug.md` becomes
/// `bug.md`; a path without separators is returned unchanged.
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Scrape the listing, then fetch every discovered file concurrently.
///
/// The fan-out preserves input order, so scraped names and fetched bodies zip
/// positionally even when responses complete out of order. No matches is an
/// empty map, not an error; any single fetch failure fails the discovery.
pub async fn discover_custom(
    fetcher: &TemplateFetcher,
) -> Result<IndexMap<String, String>, SelectorError> {
    let listing = fetcher.fetch_template_listing().await?;
    let paths = template_paths(&listing);

    let bodies = join_all(paths.iter().map(|path| fetcher.fetch_raw(path))).await;

    let mut templates = IndexMap::new();
    for (path, body) in paths.iter().zip(bodies) {
        templates.insert(base_name(path).to_string(), body?);
    }
    Ok(templates)
}
