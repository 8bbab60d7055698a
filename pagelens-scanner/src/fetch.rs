use crate::result::BrokenReason;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Redirect chains longer than this are reported as broken rather than
/// followed forever.
const MAX_REDIRECTS: usize = 10;

/// Outcome of a single GET. Any HTTP response, healthy or not, is `Success`;
/// `Failure` is reserved for requests that never produced a response.
#[derive(Debug)]
pub enum FetchOutcome {
    Success {
        status: u16,
        final_url: Url,
        content_type: Option<String>,
        body: String,
    },
    Failure {
        reason: BrokenReason,
    },
}

/// Thin wrapper around a pooled reqwest client. One `Fetcher` is shared by all
/// crawl workers; a failed fetch is terminal for that URL within the run (no
/// retries, by design).
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Pagelens/0.2 (https://github.com/pagelens/pagelens)")
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!("Fetching {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::Failure {
                    reason: classify_error(&e),
                };
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                status,
                final_url,
                content_type,
                body,
            },
            Err(e) => FetchOutcome::Failure {
                reason: classify_error(&e),
            },
        }
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(10)
    }
}

fn classify_error(e: &reqwest::Error) -> BrokenReason {
    if e.is_timeout() {
        BrokenReason::Timeout
    } else if e.is_redirect() {
        BrokenReason::TooManyRedirects
    } else if e.is_connect() {
        // DNS failures surface as connect errors in reqwest
        BrokenReason::ConnectionFailed
    } else {
        BrokenReason::RequestFailed(e.to_string())
    }
}
