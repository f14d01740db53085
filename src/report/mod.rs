//! The terminal output of a crawl and the JSON writer for it.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

use crate::extractor::{DetailPage, ListingStub, Review};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// A listing merged with what its detail page yielded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BusinessRecord {
    pub name: String,
    pub rating: Option<String>,
    #[serde(rename = "number_of_reviews")]
    pub review_count: u64,
    #[serde(rename = "yelp_url")]
    pub detail_url: String,
    pub website_url: Option<String>,
    pub reviews: Vec<Review>,
}

impl BusinessRecord {
    pub fn from_parts(stub: ListingStub, detail: DetailPage) -> Self {
        Self {
            name: stub.name,
            rating: stub.rating,
            review_count: stub.review_count,
            detail_url: stub.detail_url,
            website_url: detail.website_url,
            reviews: detail.reviews,
        }
    }
}

/// A listing whose detail page could not be extracted. Only produced when
/// the crawl isolates per-listing failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingFailure {
    pub name: String,
    #[serde(rename = "yelp_url")]
    pub detail_url: String,
    pub error: String,
}

/// Result of one crawl. `count` always equals the number of results.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    category: String,
    location: String,
    count: usize,
    results: Vec<BusinessRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<ListingFailure>,
}

impl CrawlReport {
    pub fn new(
        category: impl Into<String>,
        location: impl Into<String>,
        results: Vec<BusinessRecord>,
        failures: Vec<ListingFailure>,
    ) -> Self {
        Self {
            category: category.into(),
            location: location.into(),
            count: results.len(),
            results,
            failures,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn count(&self) -> usize {
        self.count
    }
    /// Records in the order their detail tasks completed.
    pub fn results(&self) -> &[BusinessRecord] {
        &self.results
    }
    pub fn failures(&self) -> &[ListingFailure] {
        &self.failures
    }

    /// Pretty JSON with four-space indentation and non-ASCII kept as-is.
    pub fn to_json(&self) -> Result<Vec<u8>, ReportError> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)?;
        Ok(buf)
    }
}

/// Serializes the whole report before touching the file, so a failed
/// serialization never leaves a truncated report behind.
#[instrument(skip_all, fields(path = %path.as_ref().display(), count = report.count()))]
pub async fn write_report(report: &CrawlReport, path: impl AsRef<Path>) -> Result<(), ReportError> {
    let json = report.to_json()?;
    tokio::fs::write(path.as_ref(), json).await?;
    info!("report written");
    Ok(())
}
