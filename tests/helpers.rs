#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

use bizcrawl::fetcher::{FetchError, PageResponse, PageSource, build_url};

pub const BASE_URL: &str = "https://yelp.com";
pub const CATEGORY: &str = "contractors";
pub const LOCATION: &str = "San Francisco, CA";

#[derive(Clone, Debug)]
pub enum Reply {
    Html(String),
    Status(u16),
}

/// In-memory page source. Each route serves its replies in order and keeps
/// repeating the last one once exhausted. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakePageSource {
    routes: Mutex<HashMap<String, Vec<Reply>>>,
    hits: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl FakePageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `url` must be the full request URL, query string included.
    pub fn route(&self, url: impl Into<String>, replies: Vec<Reply>) {
        assert!(!replies.is_empty(), "route needs at least one reply");
        self.routes.lock().unwrap().insert(url.into(), replies);
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, key: &str) -> Option<Reply> {
        let mut hits = self.hits.lock().unwrap();
        let seen = hits.entry(key.to_string()).or_insert(0);
        let index = *seen;
        *seen += 1;

        let routes = self.routes.lock().unwrap();
        let replies = routes.get(key)?;
        replies.get(index.min(replies.len() - 1)).cloned()
    }
}

#[async_trait]
impl PageSource for FakePageSource {
    async fn fetch(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<PageResponse, FetchError> {
        let request_url = build_url(url, query)?;
        let key = request_url.to_string();

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self.next_reply(&key);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Some(Reply::Html(html)) => Ok(PageResponse::from_html(request_url, html)),
            Some(Reply::Status(code)) => Err(http_error(code)),
            None => Err(http_error(404)),
        }
    }
}

fn http_error(code: u16) -> FetchError {
    let status = reqwest::StatusCode::from_u16(code).unwrap();
    FetchError::Http {
        status,
        retriable: status.is_server_error(),
    }
}

/// Request URL the crawler uses for search page `page_index` (10 per page).
pub fn search_url(base: &str, category: &str, location: &str, page_index: u32) -> String {
    build_url(
        &format!("{base}/search"),
        &[
            ("find_desc", category.to_string()),
            ("find_loc", location.to_string()),
            ("start", (page_index * 10).to_string()),
        ],
    )
    .unwrap()
    .to_string()
}

pub fn detail_url(base: &str, slug: &str) -> String {
    Url::parse(&format!("{base}/biz/{slug}")).unwrap().to_string()
}

pub struct Listing<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub rating: Option<&'a str>,
    pub review_text: &'a str,
}

pub fn search_page(listings: &[Listing<'_>], last: bool) -> String {
    let mut html = String::from("<html><body><ul>");
    for listing in listings {
        html.push_str(&format!(
            r#"<li><div class="container__09f24__FeTO6"><h3><a class="css-19v1rkv" href="/biz/{}">{}</a></h3>"#,
            listing.slug, listing.name
        ));
        if let Some(rating) = listing.rating {
            html.push_str(&format!(r#"<span class="css-gutk1c">{rating}</span>"#));
        }
        html.push_str(&format!(
            r#"<span class="css-chan6m">{}</span></div></li>"#,
            listing.review_text
        ));
    }
    html.push_str("</ul>");
    let disabled = if last { " disabled" } else { "" };
    html.push_str(&format!(
        r#"<button class="pagination-button__09f24__kbFYf"{disabled}>Next</button></body></html>"#
    ));
    html
}

/// Detail page with a rendered reviews block. The first list item is the
/// search box template, followed by one item per reviewer.
pub fn detail_page(website: Option<&str>, reviewers: &[&str]) -> String {
    let mut html = String::from("<html><body>");
    html.push_str(r#"<section class="css-2entjo"><a href="/map">Get directions</a>"#);
    if let Some(website) = website {
        let encoded: String = url::form_urlencoded::byte_serialize(website.as_bytes()).collect();
        html.push_str(&format!(
            r#"<a href="/biz_redir?url={encoded}&amp;website_link_type=website">site</a>"#
        ));
    }
    html.push_str("</section>");
    html.push_str(r#"<div id="reviews"><ul><li class="css-1q2nwpv"><input type="text"></li>"#);
    for reviewer in reviewers {
        html.push_str(&format!(
            r#"<li class="css-1q2nwpv"><span class="css-ux5mu6">{reviewer}</span><span class="css-qgunke">San Francisco, CA</span><span class="css-chan6m">Jan 5, 2024</span></li>"#
        ));
    }
    html.push_str("</ul></div></body></html>");
    html
}

/// Detail page before the reviews block has rendered.
pub fn pending_detail_page() -> String {
    r#"<html><body><section class="css-2entjo"><a href="/map">Get directions</a></section><p>Loading</p></body></html>"#
        .to_string()
}
