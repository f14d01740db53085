use std::sync::Arc;
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::config::{Config, FailurePolicy};
use crate::crawl::detail::DetailExtractor;
use crate::error::{CrawlError, Result};
use crate::extractor::{ListingStub, extract_listings};
use crate::fetcher::PageSource;
use crate::report::{BusinessRecord, CrawlReport, ListingFailure};
use crate::schema::{CompiledSchema, ExtractionSchema};

type TaskOutcome = (ListingStub, Result<BusinessRecord>);

/// Drives pagination over the search endpoint and fans out one detail task
/// per discovered listing.
pub struct Crawler {
    config: Config,
    source: Arc<dyn PageSource>,
    schema: Arc<CompiledSchema>,
}

impl Crawler {
    /// Crawler using the default (Yelp) extraction schema.
    pub fn new(config: Config, source: Arc<dyn PageSource>) -> Result<Self> {
        Self::with_schema(config, source, &ExtractionSchema::default())
    }

    pub fn with_schema(
        config: Config,
        source: Arc<dyn PageSource>,
        schema: &ExtractionSchema,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            schema: Arc::new(schema.compile()?),
        })
    }

    #[instrument(skip(self))]
    pub async fn crawl(&self, category: &str, location: &str) -> Result<CrawlReport> {
        info!(
            "Starting crawl - page limit: {}, detail concurrency: {}, policy: {:?}",
            self.config.search_page_limit(),
            self.config.detail_concurrency(),
            self.config.failure_policy()
        );

        let stubs = self.collect_listings(category, location).await?;
        info!("Discovered {} listings", stubs.len());

        let (results, failures) = self.fetch_details(stubs).await?;
        info!(
            "Crawl finished with {} records and {} failed listings",
            results.len(),
            failures.len()
        );

        Ok(CrawlReport::new(category, location, results, failures))
    }

    /// Walks search pages in order until the last page or the page limit.
    async fn collect_listings(&self, category: &str, location: &str) -> Result<Vec<ListingStub>> {
        let search_url = self.config.search_url();
        let mut stubs = Vec::new();
        let mut page_index: u32 = 1;
        let mut is_last_page = false;

        while !is_last_page && page_index <= self.config.search_page_limit() {
            let start = u64::from(page_index) * u64::from(self.config.elements_per_page());
            let query = [
                ("find_desc", category.to_string()),
                ("find_loc", location.to_string()),
                ("start", start.to_string()),
            ];

            let page = match self.source.fetch(&search_url, &query).await {
                Ok(page) => page,
                Err(source) => {
                    warn!(
                        page_index,
                        retryable = source.should_retry(),
                        "search request failed: {}",
                        source
                    );
                    return Err(CrawlError::SiteRejected {
                        url: search_url,
                        source,
                    });
                }
            };

            let base_url = self.config.base_url();
            let listing_page =
                extract_listings(&page.body_utf8, &self.schema, base_url).map_err(|source| {
                    CrawlError::Structure {
                        url: page.url_final.to_string(),
                        source,
                    }
                })?;

            debug!(
                page_index,
                start,
                listings = listing_page.stubs.len(),
                is_last_page = listing_page.is_last_page,
                "search page processed"
            );

            is_last_page = listing_page.is_last_page;
            stubs.extend(listing_page.stubs);
            page_index += 1;
        }

        Ok(stubs)
    }

    /// Runs every detail task with at most `detail_concurrency` in flight.
    async fn fetch_details(
        &self,
        stubs: Vec<ListingStub>,
    ) -> Result<(Vec<BusinessRecord>, Vec<ListingFailure>)> {
        let semaphore = Arc::new(Semaphore::new(self.config.detail_concurrency().max(1)));
        let extractor =
            DetailExtractor::new(self.source.clone(), self.schema.clone(), &self.config);
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();

        for stub in stubs {
            let semaphore = semaphore.clone();
            let extractor = extractor.clone();
            let span = info_span!("listing", name = %stub.name);

            tasks.spawn(
                async move {
                    // Hold permit until the detail page is done
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return (stub, Err(CrawlError::Task(e.to_string()))),
                    };
                    let outcome = extractor.extract(stub.clone()).await;
                    (stub, outcome)
                }
                .instrument(span),
            );
        }

        let mut results = Vec::new();
        let mut failures = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let (stub, outcome) = joined.map_err(|e| CrawlError::Task(e.to_string()))?;
            match outcome {
                Ok(record) => results.push(record),
                Err(err) => match self.config.failure_policy() {
                    FailurePolicy::FailFast => {
                        warn!("Aborting crawl, listing {} failed: {}", stub.name, err);
                        tasks.abort_all();
                        return Err(err);
                    }
                    FailurePolicy::Isolate => {
                        warn!("Listing {} failed, continuing: {}", stub.name, err);
                        failures.push(ListingFailure {
                            name: stub.name,
                            detail_url: stub.detail_url,
                            error: err.to_string(),
                        });
                    }
                },
            }
        }

        Ok((results, failures))
    }
}
