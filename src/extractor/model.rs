use serde::{Deserialize, Serialize};

/// One listing as it appears on a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingStub {
    pub name: String,
    #[serde(rename = "yelp_url")]
    pub detail_url: String,
    pub rating: Option<String>,
    #[serde(rename = "number_of_reviews")]
    pub review_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Review {
    pub reviewer_name: String,
    pub reviewer_location: Option<String>,
    pub date: String,
}

/// Listings found on a single search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub stubs: Vec<ListingStub>,
    pub is_last_page: bool,
}

/// What a detail page contributes to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub website_url: Option<String>,
    pub reviews: Vec<Review>,
}

/// Collapses runs of whitespace and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenates the ASCII digits of `text` into a count.
///
/// Text without digits counts as zero; a digit run too long for `u64`
/// saturates instead of failing the listing.
pub fn digits_to_count(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}
