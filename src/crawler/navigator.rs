//! Pagination: finding the "next page" control on a listing page

use scraper::{Html, Selector};
use url::Url;

/// The single link that advances the listing
pub const NEXT_PAGE_SELECTOR: &str = r#"a[aria-label="Go to next page"]"#;

/// Outcome of looking for the next page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// A resolvable next-page link
    Found(Url),

    /// No next-page control; this is the last page
    Absent,

    /// The control exists but carries no link target
    MissingHref,

    /// The link target could not be resolved against the page URL, or it
    /// leads off the site being traversed
    Unresolvable(String),
}

impl NextPage {
    pub fn into_url(self) -> Option<Url> {
        match self {
            NextPage::Found(url) => Some(url),
            _ => None,
        }
    }
}

/// Finds the next-page control and resolves its target against `page_url`
///
/// Relative targets ("/trades?page=2", "?page=2") are resolved with standard
/// URL rules, so the result is always a well-formed absolute URL. A target on
/// a different origin than `page_url` is refused.
pub fn find_next_page(document: &Html, page_url: &Url) -> NextPage {
    let Ok(selector) = Selector::parse(NEXT_PAGE_SELECTOR) else {
        return NextPage::Absent;
    };

    let Some(link) = document.select(&selector).next() else {
        return NextPage::Absent;
    };

    let href = match link.value().attr("href").map(str::trim) {
        Some(href) if !href.is_empty() => href,
        _ => {
            tracing::debug!("Next-page control on {} has no href", page_url);
            return NextPage::MissingHref;
        }
    };

    match page_url.join(href) {
        Ok(next) if next.origin() == page_url.origin() => NextPage::Found(next),
        Ok(next) => {
            tracing::warn!(
                "Refusing off-site next-page link {} on {}",
                next,
                page_url
            );
            NextPage::Unresolvable(href.to_string())
        }
        Err(e) => {
            tracing::warn!("Cannot resolve next-page link '{}' on {}: {}", href, page_url, e);
            NextPage::Unresolvable(href.to_string())
        }
    }
}
