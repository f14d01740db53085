use scraper::{Html, Selector};
use url::form_urlencoded;

use crate::extractor::errors::ExtractError;
use crate::extractor::model::{DetailPage, Review, normalize_whitespace};
use crate::schema::CompiledSchema;

/// Parses a detail page.
///
/// Returns `Ok(None)` when the reviews block has not been rendered yet, which
/// callers treat as a signal to fetch the page again.
pub fn extract_detail(
    html: &str,
    schema: &CompiledSchema,
    reviews_limit: usize,
) -> Result<Option<DetailPage>, ExtractError> {
    let document = Html::parse_document(html);

    let Some(reviews) = extract_reviews(&document, schema, reviews_limit)? else {
        return Ok(None);
    };
    let website_url = extract_website_url(&document, schema)?;

    Ok(Some(DetailPage {
        website_url,
        reviews,
    }))
}

/// The first outbound tracking link across all contact sections wins.
pub fn extract_website_url(
    document: &Html,
    schema: &CompiledSchema,
) -> Result<Option<String>, ExtractError> {
    let redirect_href = document
        .select(&schema.contact_section)
        .flat_map(|section| section.select(&schema.contact_link))
        .filter_map(|link| link.value().attr("href"))
        .find(|href| href.contains(schema.redirect_marker.as_str()));

    let Some(href) = redirect_href else {
        return Ok(None);
    };

    redirect_target(href, &schema.redirect_param)
        .map(Some)
        .ok_or_else(|| ExtractError::RedirectTarget {
            href: href.to_string(),
            param: schema.redirect_param.clone(),
        })
}

/// Reads `param` from the query string of `href`, absolute or relative.
pub fn redirect_target(href: &str, param: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
}

/// Reviews after the first (template) item, capped at `limit`.
pub fn extract_reviews(
    document: &Html,
    schema: &CompiledSchema,
    limit: usize,
) -> Result<Option<Vec<Review>>, ExtractError> {
    let Some(container) = document.select(&schema.reviews_container).next() else {
        return Ok(None);
    };

    container
        .select(&schema.review_item)
        .skip(1)
        .take(limit)
        .map(|item| -> Result<Review, ExtractError> {
            let text_of = |selector: &Selector| {
                item.select(selector)
                    .next()
                    .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            };
            Ok(Review {
                reviewer_name: text_of(&schema.reviewer_name)
                    .ok_or(ExtractError::missing("reviewer name"))?,
                reviewer_location: text_of(&schema.reviewer_location),
                date: text_of(&schema.review_date).ok_or(ExtractError::missing("review date"))?,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
