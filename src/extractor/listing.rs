use scraper::{ElementRef, Html};
use tracing::debug;

use crate::extractor::errors::ExtractError;
use crate::extractor::model::{ListingPage, ListingStub, digits_to_count, normalize_whitespace};
use crate::schema::CompiledSchema;

/// Pulls every listing stub and the pagination state out of a search page.
pub fn extract_listings(
    html: &str,
    schema: &CompiledSchema,
    base_url: &str,
) -> Result<ListingPage, ExtractError> {
    let document = Html::parse_document(html);

    let next_button = document
        .select(&schema.next_page_button)
        .next()
        .ok_or(ExtractError::missing("pagination button"))?;
    let is_last_page = next_button.value().attr("disabled").is_some();

    let stubs = document
        .select(&schema.listing_container)
        .map(|container| extract_stub(container, schema, base_url))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(listings = stubs.len(), is_last_page, "parsed search page");
    Ok(ListingPage {
        stubs,
        is_last_page,
    })
}

fn extract_stub(
    container: ElementRef<'_>,
    schema: &CompiledSchema,
    base_url: &str,
) -> Result<ListingStub, ExtractError> {
    let anchor = container
        .select(&schema.name_and_link)
        .next()
        .ok_or(ExtractError::missing("business name link"))?;
    let name = normalize_whitespace(&anchor.text().collect::<String>());
    let href = anchor
        .value()
        .attr("href")
        .ok_or(ExtractError::missing("business link href"))?;

    let rating = container
        .select(&schema.rating)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()));

    let review_count = container
        .select(&schema.review_count)
        .next()
        .map(|el| digits_to_count(&el.text().collect::<String>()))
        .unwrap_or(0);

    Ok(ListingStub {
        name,
        detail_url: absolute_url(base_url, href),
        rating,
        review_count,
    })
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}
