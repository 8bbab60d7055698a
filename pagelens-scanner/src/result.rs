use serde::{Deserialize, Serialize};
use std::fmt;

/// One successfully fetched HTML page. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub status_code: u16,
    pub title: Option<String>,
    pub description: Option<String>,
    pub h1: Option<String>,
    pub canonical: Option<String>,
    pub breadcrumbs: Option<String>,
    pub in_sitemap: bool,
}

/// An internal link that did not resolve to a healthy HTML page.
/// `parent` is the page the link was discovered on (the seed refers to itself).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenLinkResult {
    pub url: String,
    pub parent: String,
    pub reason: BrokenReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrokenReason {
    /// Non-2xx final status.
    HttpStatus(u16),
    /// 2xx response whose content type is not HTML.
    NonHtml(String),
    Timeout,
    ConnectionFailed,
    TooManyRedirects,
    RequestFailed(String),
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenReason::HttpStatus(code) => write!(f, "HTTP {}", code),
            BrokenReason::NonHtml(ct) => write!(f, "non-HTML content ({})", ct),
            BrokenReason::Timeout => write!(f, "timeout"),
            BrokenReason::ConnectionFailed => write!(f, "connection failed"),
            BrokenReason::TooManyRedirects => write!(f, "too many redirects"),
            BrokenReason::RequestFailed(msg) => write!(f, "request failed: {}", msg),
        }
    }
}

/// Everything one crawl run produced. The two result sets are disjoint by URL:
/// a target ends up either as a page or as a broken link, never both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutput {
    pub pages: Vec<PageResult>,
    pub broken: Vec<BrokenLinkResult>,
}
