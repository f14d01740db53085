//! Crawl-level error taxonomy.

use thiserror::Error;

use crate::config::ConfigError;
use crate::extractor::ExtractError;
use crate::fetcher::FetchError;
use crate::schema::SchemaError;

#[derive(Error, Debug)]
pub enum CrawlError {
    /// The site refused or failed a search page request; pagination cannot
    /// continue past this point.
    #[error("search request to {url} was rejected, please try again: {source}")]
    SiteRejected {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("unexpected page structure at {url}: {source}")]
    Structure {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("could not find reviews block after {attempts} attempts, please try again: {url}")]
    Extraction { url: String, attempts: u32 },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("detail task failed: {0}")]
    Task(String),
}

impl CrawlError {
    /// The page the error is about, when there is one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::SiteRejected { url, .. }
            | Self::Structure { url, .. }
            | Self::Extraction { url, .. }
            | Self::Fetch { url, .. } => Some(url),
            Self::Config(_) | Self::Schema(_) | Self::Task(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
