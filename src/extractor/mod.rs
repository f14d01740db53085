//! Pure extraction from fetched documents. Nothing in here touches the network.

pub mod detail;
pub mod errors;
pub mod listing;
pub mod model;

#[cfg(test)]
mod tests;

pub use detail::{extract_detail, redirect_target};
pub use errors::ExtractError;
pub use listing::extract_listings;
pub use model::{DetailPage, ListingPage, ListingStub, Review};
