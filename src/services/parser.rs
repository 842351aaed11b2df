// src/services/parser.rs

//! Listing extraction from raw HTML.
//!
//! The page is scanned segment-at-a-time with regular expressions rather
//! than parsed into a DOM. The scan tolerates malformed markup inside a
//! segment: anything that cannot be extracted skips that segment only,
//! never the whole parse.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Listing;

/// One `<article …> … </article` block, attributes and newlines included.
static ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<article(.*?)</article").unwrap());

/// First anchor carrying an href, with its inner text.
static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<a[^>]*?href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap());

/// Price container.
static PRICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<strong>(.*?)</strong>").unwrap());

/// First run of decimal digits in the price text.
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Image source attribute.
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<img[^>]*?src="([^"]*)""#).unwrap());

/// Marker token in the price text for a negotiable price.
const NEGOTIABLE_MARKER: &str = "VB";

/// Extracts [`Listing`] records from raw listing-page HTML.
pub struct ListingParser {
    base_url: String,
}

impl ListingParser {
    /// Create a parser building absolute URLs against the given site origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Parse a page into listings, preserving document order.
    ///
    /// Pure function of its input: no network, no state. Segments missing
    /// an anchor or an image yield no listing and are skipped silently.
    pub fn parse(&self, html: &str) -> Vec<Listing> {
        ARTICLE
            .captures_iter(html)
            .filter_map(|segment| self.parse_segment(&segment[1]))
            .collect()
    }

    fn parse_segment(&self, segment: &str) -> Option<Listing> {
        let anchor = ANCHOR.captures(segment)?;
        let link = anchor[1].to_string();
        let title = normalize_whitespace(&anchor[2]);
        if title.is_empty() {
            return None;
        }

        let price_text = PRICE
            .captures(segment)
            .map(|c| c[1].to_string())
            .unwrap_or_default();
        let negotiable = price_text.contains(NEGOTIABLE_MARKER);
        let price = DIGITS
            .find(&price_text)
            .and_then(|m| m.as_str().parse().ok());

        // A listing without an image is not representable; drop the segment.
        let image_url = IMAGE.captures(segment)?[1].trim().to_string();

        let url = format!("{}{}", self.base_url, link);

        Some(Listing {
            title,
            price,
            negotiable,
            link,
            url,
            image_url,
        })
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.ebay-kleinanzeigen.de";

    fn segment(href: &str, title: &str, price: &str, image: Option<&str>) -> String {
        let img = image
            .map(|src| format!(r#"<img class="thumb" src="{src}">"#))
            .unwrap_or_default();
        format!(
            "<article class=\"aditem\" data-href=\"{href}\">\n  {img}\n  \
             <a class=\"ellipsis\" href=\"{href}\">{title}</a>\n  \
             <strong>{price}</strong>\n</article>"
        )
    }

    fn parser() -> ListingParser {
        ListingParser::new(BASE)
    }

    #[test]
    fn parses_full_segment() {
        let html = segment("/s-anzeige/fahrrad/123", "Fahrrad 28 Zoll", "120 € VB", Some("https://img.example.com/1.jpg"));
        let listings = parser().parse(&html);

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.title, "Fahrrad 28 Zoll");
        assert_eq!(listing.price, Some(120));
        assert!(listing.negotiable);
        assert_eq!(listing.link, "/s-anzeige/fahrrad/123");
        assert_eq!(listing.url, format!("{BASE}/s-anzeige/fahrrad/123"));
        assert_eq!(listing.image_url, "https://img.example.com/1.jpg");
    }

    #[test]
    fn price_without_digits_is_absent() {
        let html = segment("/a/1", "Regal", "Zu verschenken", Some("i.jpg"));
        let listings = parser().parse(&html);
        assert_eq!(listings[0].price, None);
        assert!(!listings[0].negotiable);
    }

    #[test]
    fn first_digit_run_wins() {
        let html = segment("/a/1", "Sofa", "1.200 €", Some("i.jpg"));
        // The first run of digits is the price, thousands separators and all.
        assert_eq!(parser().parse(&html)[0].price, Some(1));
    }

    #[test]
    fn missing_price_container_is_tolerated() {
        let html = "<article>\n<img src=\"i.jpg\">\n<a href=\"/a/1\">Lampe</a>\n</article>";
        let listings = parser().parse(html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, None);
        assert!(!listings[0].negotiable);
    }

    #[test]
    fn segment_without_image_is_dropped() {
        let html = format!(
            "{}{}",
            segment("/a/1", "Mit Bild", "5 €", Some("i.jpg")),
            segment("/a/2", "Ohne Bild", "5 €", None)
        );
        let listings = parser().parse(&html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Mit Bild");
    }

    #[test]
    fn segment_without_anchor_is_skipped() {
        let html = "<article><img src=\"i.jpg\"><strong>5 €</strong></article>";
        assert!(parser().parse(html).is_empty());
    }

    #[test]
    fn preserves_document_order() {
        let html: String = (1..=4)
            .map(|i| segment(&format!("/a/{i}"), &format!("Anzeige {i}"), "10 €", Some("i.jpg")))
            .collect();
        let titles: Vec<_> = parser().parse(&html).iter().map(|l| l.title.clone()).collect();
        assert_eq!(titles, ["Anzeige 1", "Anzeige 2", "Anzeige 3", "Anzeige 4"]);
    }

    #[test]
    fn parse_is_idempotent() {
        let html = format!(
            "{}{}",
            segment("/a/1", "Eins", "1 €", Some("1.jpg")),
            segment("/a/2", "Zwei", "2 €", Some("2.jpg"))
        );
        let parser = parser();
        assert_eq!(parser.parse(&html), parser.parse(&html));
    }

    #[test]
    fn title_whitespace_is_normalized() {
        let html = segment("/a/1", "  Alte\n   Kommode ", "40 €", Some("i.jpg"));
        assert_eq!(parser().parse(&html)[0].title, "Alte Kommode");
    }

    #[test]
    fn malformed_segment_does_not_abort_parse() {
        // First segment is closed but its anchor carries no href.
        let html = format!(
            "<article><img src=\"x.jpg\"><a>kaputt</a></article>{}",
            segment("/a/2", "Intakt", "9 €", Some("i.jpg"))
        );
        let listings = parser().parse(&html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Intakt");
    }

    #[test]
    fn no_articles_yields_empty() {
        assert!(parser().parse("<html><body>nichts</body></html>").is_empty());
    }
}
