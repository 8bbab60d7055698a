//! Audit orchestration: sitemap discovery followed by the crawl itself.

use crate::config::AuditConfig;
use indicatif::{ProgressBar, ProgressStyle};
use pagelens_scanner::error::CrawlError;
use pagelens_scanner::sitemap::load_sitemap;
use pagelens_scanner::{BrokenLinkResult, Crawler, Fetcher, PageResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Callback for reporting audit progress messages
pub type AuditProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Everything an audit run produced.
pub struct AuditOutcome {
    pub seed: String,
    pub pages: Vec<PageResult>,
    pub broken: Vec<BrokenLinkResult>,
    /// URLs the site's sitemap declared. Zero when no sitemap was reachable.
    pub sitemap_urls: usize,
}

/// Run a full audit of the configured seed.
///
/// The sitemap is loaded up front so that each page result can be flagged
/// with its membership; a site without a reachable sitemap audits normally
/// with every page flagged absent.
pub async fn execute_audit(
    config: &AuditConfig,
    progress_callback: Option<AuditProgressCallback>,
) -> Result<AuditOutcome, CrawlError> {
    let seed_url =
        Url::parse(&config.seed).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", config.seed, e)))?;

    // Single spinner for overall progress (only if enabled)
    let progress_bar = if config.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Checking sitemap...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let fetcher = Fetcher::new(config.timeout_secs);
    let sitemap = load_sitemap(&fetcher, &seed_url).await;
    let sitemap_urls = sitemap.len();

    if let Some(ref callback) = progress_callback {
        if sitemap_urls > 0 {
            callback(format!("Sitemap declares {} URLs", sitemap_urls));
        } else {
            callback("No sitemap found, continuing without one".to_string());
        }
    }

    let processed_count = Arc::new(AtomicUsize::new(0));

    let internal_progress_callback: pagelens_scanner::ProgressCallback = if config.show_progress {
        let pb_clone = progress_bar.clone().unwrap();
        let count_clone = processed_count.clone();
        Arc::new(move |_worker_id: usize, _url: String| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!("Auditing... {} URLs fetched", count));
            pb_clone.tick();
        })
    } else {
        let count_clone = processed_count.clone();
        Arc::new(move |_worker_id: usize, _url: String| {
            count_clone.fetch_add(1, Ordering::Relaxed);
        })
    };

    let crawler = Crawler::with_timeout(config.timeout_secs)
        .with_workers(config.workers)
        .with_max_pages(config.max_pages)
        .with_progress_callback(internal_progress_callback);

    let output = crawler.crawl(seed_url.as_str(), sitemap).await?;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Audit complete! {} URLs fetched", total));
    }

    Ok(AuditOutcome {
        seed: seed_url.to_string(),
        pages: output.pages,
        broken: output.broken,
        sitemap_urls,
    })
}
