//! Site structure as data.
//!
//! Each semantic element the extractors look for is described once here as a
//! tag plus an attribute predicate. When the live site changes its markup
//! only this table needs to move; the extractors never carry selector
//! literals of their own.

use scraper::Selector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid selector for {field} ('{selector}'): {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

/// Attribute test applied to an element with a matching tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrPredicate {
    Any,
    Class(String),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSpec {
    pub tag: String,
    pub attr: AttrPredicate,
}

impl SelectorSpec {
    pub fn class(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attr: AttrPredicate::Class(class.to_string()),
        }
    }

    pub fn id(tag: &str, id: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attr: AttrPredicate::Id(id.to_string()),
        }
    }

    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attr: AttrPredicate::Any,
        }
    }

    /// CSS form, e.g. `span.css-gutk1c` or `div#reviews`.
    pub fn to_css(&self) -> String {
        match &self.attr {
            AttrPredicate::Any => self.tag.clone(),
            AttrPredicate::Class(class) => format!("{}.{}", self.tag, class),
            AttrPredicate::Id(id) => format!("{}#{}", self.tag, id),
        }
    }

    fn compile(&self, field: &'static str) -> Result<Selector, SchemaError> {
        let css = self.to_css();
        Selector::parse(&css).map_err(|e| SchemaError::InvalidSelector {
            field,
            selector: css.clone(),
            reason: e.to_string(),
        })
    }
}

/// Semantic field name to selector mapping for search and detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSchema {
    pub next_page_button: SelectorSpec,
    pub listing_container: SelectorSpec,
    pub name_and_link: SelectorSpec,
    pub rating: SelectorSpec,
    pub review_count: SelectorSpec,
    pub contact_section: SelectorSpec,
    pub reviews_container: SelectorSpec,
    pub review_item: SelectorSpec,
    pub reviewer_name: SelectorSpec,
    pub reviewer_location: SelectorSpec,
    pub review_date: SelectorSpec,
    /// Substring identifying an outbound tracking link.
    pub redirect_marker: String,
    /// Query parameter of a tracking link that carries the real destination.
    pub redirect_param: String,
}

impl ExtractionSchema {
    /// Yelp's markup as last observed.
    pub fn yelp() -> Self {
        Self {
            next_page_button: SelectorSpec::class("button", "pagination-button__09f24__kbFYf"),
            listing_container: SelectorSpec::class("div", "container__09f24__FeTO6"),
            name_and_link: SelectorSpec::class("a", "css-19v1rkv"),
            rating: SelectorSpec::class("span", "css-gutk1c"),
            review_count: SelectorSpec::class("span", "css-chan6m"),
            contact_section: SelectorSpec::class("section", "css-2entjo"),
            reviews_container: SelectorSpec::id("div", "reviews"),
            review_item: SelectorSpec::class("li", "css-1q2nwpv"),
            reviewer_name: SelectorSpec::class("span", "css-ux5mu6"),
            reviewer_location: SelectorSpec::class("span", "css-qgunke"),
            review_date: SelectorSpec::class("span", "css-chan6m"),
            redirect_marker: "/biz_redir".to_string(),
            redirect_param: "url".to_string(),
        }
    }

    pub fn compile(&self) -> Result<CompiledSchema, SchemaError> {
        Ok(CompiledSchema {
            next_page_button: self.next_page_button.compile("next_page_button")?,
            listing_container: self.listing_container.compile("listing_container")?,
            name_and_link: self.name_and_link.compile("name_and_link")?,
            rating: self.rating.compile("rating")?,
            review_count: self.review_count.compile("review_count")?,
            contact_section: self.contact_section.compile("contact_section")?,
            contact_link: SelectorSpec::tag("a").compile("contact_link")?,
            reviews_container: self.reviews_container.compile("reviews_container")?,
            review_item: self.review_item.compile("review_item")?,
            reviewer_name: self.reviewer_name.compile("reviewer_name")?,
            reviewer_location: self.reviewer_location.compile("reviewer_location")?,
            review_date: self.review_date.compile("review_date")?,
            redirect_marker: self.redirect_marker.clone(),
            redirect_param: self.redirect_param.clone(),
        })
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::yelp()
    }
}

/// An [`ExtractionSchema`] with every selector parsed. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub next_page_button: Selector,
    pub listing_container: Selector,
    pub name_and_link: Selector,
    pub rating: Selector,
    pub review_count: Selector,
    pub contact_section: Selector,
    pub contact_link: Selector,
    pub reviews_container: Selector,
    pub review_item: Selector,
    pub reviewer_name: Selector,
    pub reviewer_location: Selector,
    pub review_date: Selector,
    pub redirect_marker: String,
    pub redirect_param: String,
}
