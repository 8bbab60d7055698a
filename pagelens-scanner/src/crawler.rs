use crate::error::{CrawlError, Result};
use crate::extract::PageDocument;
use crate::fetch::{FetchOutcome, Fetcher};
use crate::norm;
use crate::result::{BrokenLinkResult, BrokenReason, CrawlOutput, PageResult};
use futures::future;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Breadth-first crawl orchestrator, scoped to the seed's host.
///
/// A bounded pool of workers pulls from one shared FIFO frontier. Targets are
/// marked visited at enqueue time, under the frontier lock, so each unique
/// normalized URL is fetched at most once no matter how many workers race.
/// With `workers = 1` the traversal is the plain deterministic BFS.
pub struct Crawler {
    fetcher: Fetcher,
    workers: usize,
    max_pages: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Self {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            fetcher: Fetcher::new(timeout_secs),
            workers: 8,
            max_pages: 500,
            progress_callback: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Safety cap on fetched targets; bounds worst-case runtime on large
    /// sites.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl from `seed`, classifying every in-scope target as either a
    /// healthy page or a broken link. `sitemap` holds normalized URLs used
    /// only for membership checks.
    pub async fn crawl(&self, seed: &str, sitemap: HashSet<String>) -> Result<CrawlOutput> {
        let seed_url = Url::parse(seed)
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", seed, e)))?;
        let seed_host = seed_url
            .host_str()
            .ok_or_else(|| CrawlError::InvalidUrl(format!("{}: no host", seed)))?
            .to_string();
        let seed_target = norm::normalize(&seed_url);

        info!(
            "Starting crawl of {} with {} workers (cap {} pages)",
            seed_target, self.workers, self.max_pages
        );

        let shared = Arc::new(Shared {
            fetcher: self.fetcher.clone(),
            seed_host,
            sitemap,
            frontier: Mutex::new(VecDeque::from([(seed_target.clone(), seed_target.clone())])),
            visited: Mutex::new(HashSet::from([seed_target.clone()])),
            pages: Mutex::new(Vec::new()),
            broken: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            dequeued: AtomicUsize::new(0),
            max_pages: self.max_pages,
        });

        let handles: Vec<_> = (0..self.workers)
            .map(|worker_id| {
                let shared = shared.clone();
                let progress = self.progress_callback.clone();
                tokio::spawn(run_worker(worker_id, shared, progress))
            })
            .collect();

        for joined in future::join_all(handles).await {
            joined?;
        }

        let pages = std::mem::take(&mut *shared.pages.lock().await);
        let broken = std::mem::take(&mut *shared.broken.lock().await);

        if pages.is_empty() {
            let reason = broken
                .iter()
                .find(|b| b.url == seed_target)
                .map(|b| b.reason.to_string())
                .unwrap_or_else(|| "no page recorded".to_string());
            return Err(CrawlError::SeedUnreachable(reason));
        }

        info!(
            "Crawl complete. {} pages, {} broken links",
            pages.len(),
            broken.len()
        );
        Ok(CrawlOutput { pages, broken })
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

struct Shared {
    fetcher: Fetcher,
    seed_host: String,
    sitemap: HashSet<String>,
    /// Frontier entries are (target, referrer page).
    frontier: Mutex<VecDeque<(String, String)>>,
    visited: Mutex<HashSet<String>>,
    pages: Mutex<Vec<PageResult>>,
    broken: Mutex<Vec<BrokenLinkResult>>,
    in_flight: AtomicUsize,
    dequeued: AtomicUsize,
    max_pages: usize,
}

async fn run_worker(worker_id: usize, shared: Arc<Shared>, progress: Option<ProgressCallback>) {
    debug!("Worker {} started", worker_id);

    loop {
        // in_flight must rise under the same lock as the pop, otherwise a
        // sibling can observe an empty frontier with nothing in flight and
        // exit while this target is still about to fan out.
        let item = {
            let mut frontier = shared.frontier.lock().await;
            match frontier.pop_front() {
                Some(item) => {
                    shared.in_flight.fetch_add(1, Ordering::SeqCst);
                    Some(item)
                }
                None => None,
            }
        };

        let Some((url, parent)) = item else {
            if shared.in_flight.load(Ordering::SeqCst) == 0 {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
            continue;
        };

        let index = shared.dequeued.fetch_add(1, Ordering::SeqCst);
        if index >= shared.max_pages {
            // Cap reached: drain the frontier without fetching.
            shared.in_flight.fetch_sub(1, Ordering::SeqCst);
            continue;
        }

        if let Some(ref callback) = progress {
            callback(worker_id, url.clone());
        }

        process_target(&shared, &url, &parent).await;
        shared.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    debug!("Worker {} finished", worker_id);
}

async fn process_target(shared: &Shared, url: &str, parent: &str) {
    match shared.fetcher.fetch(url).await {
        FetchOutcome::Failure { reason } => {
            debug!("Broken link {} ({})", url, reason);
            shared.broken.lock().await.push(BrokenLinkResult {
                url: url.to_string(),
                parent: parent.to_string(),
                reason,
            });
        }
        FetchOutcome::Success {
            status,
            final_url,
            content_type,
            body,
        } => {
            let is_html = content_type
                .as_deref()
                .map(|ct| ct.contains("text/html"))
                .unwrap_or(false);

            if !(200..300).contains(&status) {
                shared.broken.lock().await.push(BrokenLinkResult {
                    url: url.to_string(),
                    parent: parent.to_string(),
                    reason: BrokenReason::HttpStatus(status),
                });
                return;
            }
            if !is_html {
                shared.broken.lock().await.push(BrokenLinkResult {
                    url: url.to_string(),
                    parent: parent.to_string(),
                    reason: BrokenReason::NonHtml(
                        content_type.unwrap_or_else(|| "unknown".to_string()),
                    ),
                });
                return;
            }

            // The DOM is not Send; parse and extract inside one block so it
            // never lives across an await point.
            let (metadata, links) = {
                let doc = PageDocument::parse(&body);
                (
                    doc.metadata(),
                    doc.internal_links(&final_url, &shared.seed_host),
                )
            };

            shared.pages.lock().await.push(PageResult {
                url: url.to_string(),
                status_code: status,
                title: metadata.title,
                description: metadata.description,
                h1: metadata.h1,
                canonical: metadata.canonical,
                breadcrumbs: metadata.breadcrumbs,
                in_sitemap: shared.sitemap.contains(url),
            });

            // Visited-check and mark are one atomic step.
            let fresh: Vec<String> = {
                let mut visited = shared.visited.lock().await;
                links
                    .into_iter()
                    .filter(|link| visited.insert(link.clone()))
                    .collect()
            };

            if !fresh.is_empty() {
                debug!("{} discovered {} new targets", url, fresh.len());
                let mut frontier = shared.frontier.lock().await;
                for link in fresh {
                    frontier.push_back((link, url.to_string()));
                }
            }
        }
    }
}
