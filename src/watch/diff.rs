// src/watch/diff.rs

//! New-listing detection against the last-seen baseline.
//!
//! Listings arrive in document order, newest first. Everything ahead of
//! the baseline URL is new; the scan stops at the first previously seen
//! listing.

use crate::models::Listing;

/// Result of diffing a freshly parsed page against a baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Newly appeared listings, most-recent-first
    pub new_listings: Vec<Listing>,
    /// Baseline to record for the next cycle: the newest listing's URL.
    /// `None` only when the input page had no listings.
    pub next_last_seen: Option<String>,
}

impl DiffResult {
    /// Check if anything new appeared.
    pub fn has_new(&self) -> bool {
        !self.new_listings.is_empty()
    }
}

/// Diff a page of listings against the last-seen listing identity.
///
/// With no baseline (first-ever poll) nothing counts as new — the cycle
/// establishes the baseline silently — but the top of the page is still
/// recorded so the next diff is bounded.
pub fn diff(listings: &[Listing], last_seen_url: Option<&str>) -> DiffResult {
    let next_last_seen = listings.first().map(|l| l.url.clone());

    let Some(seen) = last_seen_url else {
        return DiffResult {
            new_listings: Vec::new(),
            next_last_seen,
        };
    };

    let new_listings: Vec<Listing> = listings
        .iter()
        .take_while(|l| l.url != seen)
        .cloned()
        .collect();

    DiffResult {
        new_listings,
        next_last_seen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_listing(id: &str) -> Listing {
        Listing {
            title: format!("Anzeige {id}"),
            price: Some(10),
            negotiable: false,
            link: format!("/a/{id}"),
            url: format!("https://example.com/a/{id}"),
            image_url: format!("https://img.example.com/{id}.jpg"),
        }
    }

    fn urls(result: &DiffResult) -> Vec<&str> {
        result.new_listings.iter().map(|l| l.url.as_str()).collect()
    }

    #[test]
    fn stops_at_last_seen_exclusive() {
        let listings: Vec<_> = ["a", "b", "c", "d"].map(make_listing).into();
        let result = diff(&listings, Some("https://example.com/a/c"));

        assert!(result.has_new());
        assert_eq!(urls(&result), ["https://example.com/a/a", "https://example.com/a/b"]);
        assert_eq!(result.next_last_seen.as_deref(), Some("https://example.com/a/a"));
    }

    #[test]
    fn unseen_baseline_marks_everything_new() {
        let listings: Vec<_> = ["a", "b", "c"].map(make_listing).into();
        let result = diff(&listings, Some("https://example.com/a/x"));
        assert_eq!(result.new_listings.len(), 3);
    }

    #[test]
    fn no_baseline_is_silent_but_records_top() {
        let listings: Vec<_> = ["a", "b"].map(make_listing).into();
        let result = diff(&listings, None);

        assert!(!result.has_new());
        assert_eq!(result.next_last_seen.as_deref(), Some("https://example.com/a/a"));
    }

    #[test]
    fn baseline_on_top_means_nothing_new() {
        let listings: Vec<_> = ["a", "b"].map(make_listing).into();
        let result = diff(&listings, Some("https://example.com/a/a"));

        assert!(!result.has_new());
        // Baseline stays at the unchanged top of page.
        assert_eq!(result.next_last_seen.as_deref(), Some("https://example.com/a/a"));
    }

    #[test]
    fn empty_page_yields_empty_result() {
        let result = diff(&[], Some("https://example.com/a/a"));
        assert!(!result.has_new());
        assert!(result.next_last_seen.is_none());
    }

    #[test]
    fn preserves_document_order() {
        let listings: Vec<_> = ["neu2", "neu1", "alt"].map(make_listing).into();
        let result = diff(&listings, Some("https://example.com/a/alt"));
        assert_eq!(
            urls(&result),
            ["https://example.com/a/neu2", "https://example.com/a/neu1"]
        );
    }
}
