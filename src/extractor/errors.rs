use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// An element the schema promises is not on the page.
    #[error("missing {element} (extraction schema may be stale)")]
    Structure { element: &'static str },

    #[error("redirect link '{href}' has no '{param}' parameter")]
    RedirectTarget { href: String, param: String },
}

impl ExtractError {
    pub fn missing(element: &'static str) -> Self {
        Self::Structure { element }
    }
}
