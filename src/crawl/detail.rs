use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::crawl::backoff::refetch_delay;
use crate::error::{CrawlError, Result};
use crate::extractor::{ListingStub, extract_detail};
use crate::fetcher::PageSource;
use crate::report::BusinessRecord;
use crate::schema::CompiledSchema;

/// Turns one listing stub into a full record by polling its detail page
/// until the reviews block has been rendered.
#[derive(Clone)]
pub struct DetailExtractor {
    source: Arc<dyn PageSource>,
    schema: Arc<CompiledSchema>,
    reviews_limit: usize,
    retry_limit: u32,
    backoff_ms: u64,
}

impl DetailExtractor {
    pub fn new(source: Arc<dyn PageSource>, schema: Arc<CompiledSchema>, config: &Config) -> Self {
        Self {
            source,
            schema,
            reviews_limit: config.reviews_limit(),
            retry_limit: config.detail_retry_limit().max(1),
            backoff_ms: config.refetch_backoff_ms(),
        }
    }

    /// Fetches the detail page at most `retry_limit` times. Website and
    /// reviews are both read from the first copy that has a reviews block.
    #[instrument(skip_all, fields(url = %stub.detail_url))]
    pub async fn extract(&self, stub: ListingStub) -> Result<BusinessRecord> {
        for attempt in 1..=self.retry_limit {
            let page = match self.source.fetch(&stub.detail_url, &[]).await {
                Ok(page) => page,
                Err(source) => {
                    warn!(
                        attempt,
                        retryable = source.should_retry(),
                        "detail request failed: {}",
                        source
                    );
                    return Err(CrawlError::Fetch {
                        url: stub.detail_url,
                        source,
                    });
                }
            };

            let parsed = extract_detail(&page.body_utf8, &self.schema, self.reviews_limit)
                .map_err(|source| CrawlError::Structure {
                    url: stub.detail_url.clone(),
                    source,
                })?;

            if let Some(detail) = parsed {
                debug!(attempt, reviews = detail.reviews.len(), "detail page extracted");
                return Ok(BusinessRecord::from_parts(stub, detail));
            }

            debug!(attempt, limit = self.retry_limit, "reviews block missing");
            if attempt < self.retry_limit {
                sleep(refetch_delay(attempt - 1, self.backoff_ms)).await;
            }
        }

        warn!(attempts = self.retry_limit, "reviews block never appeared");
        Err(CrawlError::Extraction {
            url: stub.detail_url,
            attempts: self.retry_limit,
        })
    }
}
