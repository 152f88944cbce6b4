//! HTML parser for listing pages
//!
//! This module parses a fetched page once and runs both readers over it:
//! - Trade records from the trades table
//! - The next-page link
//!
//! Parsing is synchronous and the parsed document never outlives this call,
//! so traversal futures stay `Send`.

use crate::crawler::extractor::{extract_records, Extraction};
use crate::crawler::navigator::{find_next_page, NextPage};
use scraper::Html;
use url::Url;

/// Everything the traversal needs from one page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Records and warnings from the trades table
    pub extraction: Extraction,

    /// Where the listing continues, if anywhere
    pub next: NextPage,
}

/// Parses a listing page body fetched from `page_url`
///
/// # Example
///
/// ```no_run
/// use disclosure_tracker::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><a aria-label="Go to next page" href="/trades?page=2">Next</a></body></html>"#;
/// let page_url = Url::parse("https://www.capitoltrades.com/trades?page=1").unwrap();
/// let parsed = parse_page(html, &page_url);
/// assert!(parsed.extraction.records.is_empty());
/// ```
pub fn parse_page(html: &str, page_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        extraction: extract_records(&document),
        next: find_next_page(&document, page_url),
    }
}
