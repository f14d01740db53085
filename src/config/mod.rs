//! Configuration handling for a crawl.
//!
//! Every tunable that drives a crawl lives on [`Config`] and is threaded into
//! the [`Crawler`](crate::crawl::Crawler) at construction, so several crawls
//! with different parameters can run in one process. `Config::from_env`
//! reads `BIZCRAWL_*` variables and falls back to the defaults below.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Environment variable names. Public so tests and wrappers can refer to them.
pub const ENV_BASE_URL: &str = "BIZCRAWL_BASE_URL";
pub const ENV_RESULTS_FILE: &str = "BIZCRAWL_RESULTS_FILE";
pub const ENV_ELEMENTS_PER_PAGE: &str = "BIZCRAWL_ELEMENTS_PER_PAGE";
pub const ENV_REVIEWS_LIMIT: &str = "BIZCRAWL_REVIEWS_LIMIT";
pub const ENV_SEARCH_PAGE_LIMIT: &str = "BIZCRAWL_SEARCH_PAGE_LIMIT";
pub const ENV_DETAIL_RETRY_LIMIT: &str = "BIZCRAWL_DETAIL_RETRY_LIMIT";
pub const ENV_DETAIL_CONCURRENCY: &str = "BIZCRAWL_DETAIL_CONCURRENCY";
pub const ENV_REFETCH_BACKOFF_MS: &str = "BIZCRAWL_REFETCH_BACKOFF_MS";
pub const ENV_FAILURE_POLICY: &str = "BIZCRAWL_FAILURE_POLICY";

const DEFAULT_BASE_URL: &str = "https://yelp.com";
const DEFAULT_RESULTS_FILE: &str = "yelp_businesses.json";
const DEFAULT_ELEMENTS_PER_PAGE: u32 = 10;
const DEFAULT_REVIEWS_LIMIT: usize = 5;
const DEFAULT_SEARCH_PAGE_LIMIT: u32 = 2;
const DEFAULT_DETAIL_RETRY_LIMIT: u32 = 10;
const DEFAULT_DETAIL_CONCURRENCY: usize = 4;
const DEFAULT_REFETCH_BACKOFF_MS: u64 = 250;

/// What the orchestrator does when a single listing cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first listing failure aborts the crawl and no report is produced.
    #[default]
    FailFast,
    /// Listing failures are recorded on the report next to the successes.
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Ok(Self::FailFast),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

/// Crawl runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
    results_file: String,
    elements_per_page: u32,
    reviews_limit: usize,
    search_page_limit: u32,
    detail_retry_limit: u32,
    detail_concurrency: usize,
    refetch_backoff_ms: u64,
    failure_policy: FailurePolicy,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url = env::var(ENV_BASE_URL).unwrap_or(defaults.base_url);
        let results_file = env::var(ENV_RESULTS_FILE).unwrap_or(defaults.results_file);

        let config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            results_file,
            elements_per_page: read_positive(ENV_ELEMENTS_PER_PAGE, defaults.elements_per_page)?,
            reviews_limit: read_var(ENV_REVIEWS_LIMIT, defaults.reviews_limit)?,
            search_page_limit: read_positive(ENV_SEARCH_PAGE_LIMIT, defaults.search_page_limit)?,
            detail_retry_limit: read_positive(
                ENV_DETAIL_RETRY_LIMIT,
                defaults.detail_retry_limit,
            )?,
            detail_concurrency: read_positive(
                ENV_DETAIL_CONCURRENCY,
                defaults.detail_concurrency,
            )?,
            refetch_backoff_ms: read_var(ENV_REFETCH_BACKOFF_MS, defaults.refetch_backoff_ms)?,
            failure_policy: read_var(ENV_FAILURE_POLICY, defaults.failure_policy)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the values the setters accept unchecked. Run by `from_env` and
    /// again when a crawler is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_BASE_URL,
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Site root prefixed to every relative listing link. Never ends in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
    pub fn results_file(&self) -> &str {
        &self.results_file
    }
    pub fn elements_per_page(&self) -> u32 {
        self.elements_per_page
    }
    pub fn reviews_limit(&self) -> usize {
        self.reviews_limit
    }
    /// Upper bound on search pages fetched per crawl.
    pub fn search_page_limit(&self) -> u32 {
        self.search_page_limit
    }
    /// Total fetches allowed per detail page while waiting for the reviews block.
    pub fn detail_retry_limit(&self) -> u32 {
        self.detail_retry_limit
    }
    /// Maximum number of detail pages in flight at once.
    pub fn detail_concurrency(&self) -> usize {
        self.detail_concurrency
    }
    pub fn refetch_backoff_ms(&self) -> u64 {
        self.refetch_backoff_ms
    }
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
    pub fn with_results_file(mut self, results_file: impl Into<String>) -> Self {
        self.results_file = results_file.into();
        self
    }
    pub fn with_search_page_limit(mut self, limit: u32) -> Self {
        self.search_page_limit = limit;
        self
    }
    pub fn with_reviews_limit(mut self, limit: usize) -> Self {
        self.reviews_limit = limit;
        self
    }
    pub fn with_detail_retry_limit(mut self, limit: u32) -> Self {
        self.detail_retry_limit = limit;
        self
    }
    pub fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency.max(1);
        self
    }
    pub fn with_refetch_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.refetch_backoff_ms = backoff_ms;
        self
    }
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            results_file: DEFAULT_RESULTS_FILE.to_string(),
            elements_per_page: DEFAULT_ELEMENTS_PER_PAGE,
            reviews_limit: DEFAULT_REVIEWS_LIMIT,
            search_page_limit: DEFAULT_SEARCH_PAGE_LIMIT,
            detail_retry_limit: DEFAULT_DETAIL_RETRY_LIMIT,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
            refetch_backoff_ms: DEFAULT_REFETCH_BACKOFF_MS,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

fn read_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn read_positive<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: Display,
{
    let value = read_var(key, default)?;
    if value == T::default() {
        return Err(ConfigError::InvalidValue {
            field: key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
