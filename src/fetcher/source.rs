use crate::fetcher::{errors::FetchError, types::PageResponse};
use async_trait::async_trait;

/// Anything that can turn a URL plus query parameters into a decoded page.
///
/// Transport-level retry belongs to implementations; callers treat every
/// error as final for that fetch.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    async fn fetch(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<PageResponse, FetchError>;
}
