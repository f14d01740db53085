pub mod config;
pub mod crawl;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod report;
pub mod schema;

pub use config::{Config, FailurePolicy};
pub use crawl::Crawler;
pub use error::CrawlError;
pub use report::{BusinessRecord, CrawlReport};
