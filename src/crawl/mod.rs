//! The crawl pipeline: sequential pagination, then bounded concurrent
//! detail extraction.

pub mod backoff;
pub mod detail;
pub mod orchestrator;

pub use backoff::refetch_delay;
pub use detail::DetailExtractor;
pub use orchestrator::Crawler;
