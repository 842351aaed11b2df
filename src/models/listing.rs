//! Listing data structure.

use serde::{Deserialize, Serialize};

/// A single classified-ad listing extracted from a page.
///
/// The absolute `url` is the listing's identity: two listings are the same
/// listing iff their URLs are equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// Listing title
    pub title: String,

    /// Advertised price in whole currency units, if the price text
    /// contained any digits
    pub price: Option<u32>,

    /// Whether the price text carried the "VB" negotiable marker
    pub negotiable: bool,

    /// Relative link as extracted from the page
    pub link: String,

    /// Absolute listing URL (site origin + relative link)
    pub url: String,

    /// Image source URL (every valid listing has one)
    pub image_url: String,
}

impl Listing {
    /// Render the listing as outbound notification text.
    ///
    /// Format: `"{title} - {price}[ VB]\n{url}\n"`, with the price blank
    /// when absent and `" VB"` appended iff the price is negotiable.
    pub fn render(&self) -> String {
        let mut out = format!("{} - ", self.title);
        if let Some(price) = self.price {
            out.push_str(&price.to_string());
        }
        if self.negotiable {
            out.push_str(" VB");
        }
        out.push('\n');
        out.push_str(&self.url);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            title: "Fahrrad 28 Zoll".to_string(),
            price: Some(120),
            negotiable: true,
            link: "/s-anzeige/fahrrad/123".to_string(),
            url: "https://www.ebay-kleinanzeigen.de/s-anzeige/fahrrad/123".to_string(),
            image_url: "https://img.example.com/123.jpg".to_string(),
        }
    }

    #[test]
    fn render_with_price_and_marker() {
        let listing = sample_listing();
        assert_eq!(
            listing.render(),
            "Fahrrad 28 Zoll - 120 VB\nhttps://www.ebay-kleinanzeigen.de/s-anzeige/fahrrad/123\n"
        );
    }

    #[test]
    fn render_without_price() {
        let mut listing = sample_listing();
        listing.price = None;
        listing.negotiable = false;
        assert_eq!(
            listing.render(),
            "Fahrrad 28 Zoll - \nhttps://www.ebay-kleinanzeigen.de/s-anzeige/fahrrad/123\n"
        );
    }
}
