use scraper::Html;
use std::fs;

use crate::extractor::detail::{extract_reviews, extract_website_url};
use crate::extractor::{ExtractError, extract_detail, extract_listings};
use crate::schema::{CompiledSchema, ExtractionSchema};

const BASE_URL: &str = "https://yelp.com";

fn schema() -> CompiledSchema {
    ExtractionSchema::yelp().compile().unwrap()
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_listings_from_search_page() {
    let page = extract_listings(&fixture("search_page.html"), &schema(), BASE_URL).unwrap();

    assert!(!page.is_last_page);
    assert_eq!(page.stubs.len(), 2);

    let first = &page.stubs[0];
    assert_eq!(first.name, "Bay Area Builders");
    assert_eq!(
        first.detail_url,
        "https://yelp.com/biz/bay-area-builders-san-francisco"
    );
    assert_eq!(first.rating.as_deref(), Some("4.8"));
    assert_eq!(first.review_count, 127);

    // Unrated listing without digits in its review span
    let second = &page.stubs[1];
    assert_eq!(second.name, "Müller Renovation");
    assert_eq!(second.rating, None);
    assert_eq!(second.review_count, 0);
}

#[test]
fn test_disabled_pagination_marks_last_page() {
    let html = r#"<html><body>
        <div class="container__09f24__FeTO6"><a class="css-19v1rkv" href="/biz/solo">Solo</a>
        <span class="css-chan6m">42 reviews</span></div>
        <button class="pagination-button__09f24__kbFYf" disabled>Next</button>
        </body></html>"#;

    let page = extract_listings(html, &schema(), BASE_URL).unwrap();
    assert!(page.is_last_page);
    assert_eq!(page.stubs.len(), 1);
    assert_eq!(page.stubs[0].review_count, 42);
}

#[test]
fn test_missing_pagination_is_structure_error() {
    let html = r#"<html><body><div class="container__09f24__FeTO6">
        <a class="css-19v1rkv" href="/biz/solo">Solo</a></div></body></html>"#;

    let err = extract_listings(html, &schema(), BASE_URL).unwrap_err();
    assert_eq!(err, ExtractError::missing("pagination button"));
}

#[test]
fn test_listing_without_link_is_structure_error() {
    let html = r#"<html><body>
        <div class="container__09f24__FeTO6"><span class="css-gutk1c">4.0</span></div>
        <button class="pagination-button__09f24__kbFYf">Next</button>
        </body></html>"#;

    let err = extract_listings(html, &schema(), BASE_URL).unwrap_err();
    assert_eq!(err, ExtractError::missing("business name link"));
}

#[test]
fn test_empty_results_page() {
    let html = r#"<html><body><p>No results</p>
        <button class="pagination-button__09f24__kbFYf" disabled="">Next</button></body></html>"#;

    let page = extract_listings(html, &schema(), BASE_URL).unwrap();
    assert!(page.stubs.is_empty());
    assert!(page.is_last_page);
}

#[test]
fn test_extract_detail_skips_template_item_and_caps_reviews() {
    let detail = extract_detail(&fixture("detail.html"), &schema(), 5)
        .unwrap()
        .expect("reviews block present");

    assert_eq!(
        detail.website_url.as_deref(),
        Some("https://bayareabuilders.example.com")
    );
    assert_eq!(detail.reviews.len(), 5);

    let names: Vec<_> = detail
        .reviews
        .iter()
        .map(|r| r.reviewer_name.as_str())
        .collect();
    assert_eq!(names, ["Ana P.", "José R.", "Kim L.", "Dev S.", "Mo T."]);

    assert_eq!(detail.reviews[0].reviewer_location.as_deref(), Some("Oakland, CA"));
    assert_eq!(detail.reviews[0].date, "Mar 3, 2024");
    assert_eq!(detail.reviews[1].reviewer_location, None);
}

#[test]
fn test_extract_detail_respects_smaller_limit() {
    let detail = extract_detail(&fixture("detail.html"), &schema(), 2)
        .unwrap()
        .unwrap();
    assert_eq!(detail.reviews.len(), 2);

    let none = extract_detail(&fixture("detail.html"), &schema(), 0)
        .unwrap()
        .unwrap();
    assert!(none.reviews.is_empty());
}

#[test]
fn test_pending_detail_page_returns_none() {
    let result = extract_detail(&fixture("detail_pending.html"), &schema(), 5).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_only_template_item_yields_no_reviews() {
    let html = r#"<div id="reviews"><ul><li class="css-1q2nwpv"><input></li></ul></div>"#;
    let document = Html::parse_document(html);
    let reviews = extract_reviews(&document, &schema(), 5).unwrap().unwrap();
    assert!(reviews.is_empty());
}

#[test]
fn test_review_without_name_is_structure_error() {
    let html = r#"<div id="reviews"><ul>
        <li class="css-1q2nwpv"><input></li>
        <li class="css-1q2nwpv"><span class="css-chan6m">Jan 1, 2024</span></li>
        </ul></div>"#;
    let document = Html::parse_document(html);
    let err = extract_reviews(&document, &schema(), 5).unwrap_err();
    assert_eq!(err, ExtractError::missing("reviewer name"));
}

#[test]
fn test_review_without_date_is_structure_error() {
    let html = r#"<div id="reviews"><ul>
        <li class="css-1q2nwpv"><input></li>
        <li class="css-1q2nwpv"><span class="css-ux5mu6">Ana P.</span></li>
        </ul></div>"#;
    let document = Html::parse_document(html);
    let err = extract_reviews(&document, &schema(), 5).unwrap_err();
    assert_eq!(err, ExtractError::missing("review date"));
}

#[test]
fn test_website_absent_without_redirect_link() {
    let html = r#"<section class="css-2entjo"><a href="https://yelp.com/map">Map</a></section>
        <a href="/biz_redir?url=https%3A%2F%2Foutside.example.com">outside contact section</a>"#;
    let document = Html::parse_document(html);
    assert_eq!(extract_website_url(&document, &schema()).unwrap(), None);
}

#[test]
fn test_first_redirect_link_wins_across_sections() {
    let html = r#"
        <section class="css-2entjo"><a>no href</a><a href="/biz_redir?url=https%3A%2F%2Ffirst.example.com">first</a></section>
        <section class="css-2entjo"><a href="/biz_redir?url=https%3A%2F%2Fsecond.example.com">second</a></section>"#;
    let document = Html::parse_document(html);
    assert_eq!(
        extract_website_url(&document, &schema()).unwrap().as_deref(),
        Some("https://first.example.com")
    );
}

#[test]
fn test_redirect_without_url_param_fails() {
    let html = r#"<section class="css-2entjo"><a href="/biz_redir?src=abc">site</a></section>"#;
    let document = Html::parse_document(html);
    let err = extract_website_url(&document, &schema()).unwrap_err();
    assert!(matches!(err, ExtractError::RedirectTarget { ref param, .. } if param == "url"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extractors_never_panic(html in ".*") {
            let schema = schema();
            let _ = extract_listings(&html, &schema, BASE_URL);
            let _ = extract_detail(&html, &schema, 5);
        }

        #[test]
        fn test_review_count_is_digit_concatenation(prefix in "[a-z ]{0,8}", n in 0u32..1_000_000, suffix in "[a-z ]{0,8}") {
            let html = format!(
                r#"<div class="container__09f24__FeTO6"><a class="css-19v1rkv" href="/biz/x">X</a>
                <span class="css-chan6m">{prefix}{n}{suffix}</span></div>
                <button class="pagination-button__09f24__kbFYf">Next</button>"#
            );
            let page = extract_listings(&html, &schema(), BASE_URL).unwrap();
            prop_assert_eq!(page.stubs[0].review_count, u64::from(n));
        }
    }
}
