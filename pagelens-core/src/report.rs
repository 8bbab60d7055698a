//! Report generation from audit outcomes.

use crate::audit::AuditOutcome;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

pub fn generate_text_report(outcome: &AuditOutcome) -> String {
    let mut report = String::new();

    // Header
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                           PAGELENS SEO AUDIT REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Site:           {}\n", outcome.seed));
    report.push_str(&format!("Pages Audited:  {}\n", outcome.pages.len()));
    report.push_str(&format!("Broken Links:   {}\n", outcome.broken.len()));
    if outcome.sitemap_urls > 0 {
        report.push_str(&format!("Sitemap URLs:   {}\n", outcome.sitemap_urls));
    } else {
        report.push_str("Sitemap URLs:   none found\n");
    }
    report.push('\n');

    // Per-page detail
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("PAGES\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for page in &outcome.pages {
        let path = extract_url_path(&page.url);

        // Color code based on status
        let status_str = match page.status_code {
            200..=299 => format!("\x1b[32m{}\x1b[0m", page.status_code), // Green
            300..=399 => format!("\x1b[36m{}\x1b[0m", page.status_code), // Cyan
            _ => format!("{}", page.status_code),
        };

        let mut line = format!("  {} {}", status_str, path);

        let mut flags = Vec::new();
        if page.title.is_none() {
            flags.push("no title");
        }
        if page.description.is_none() {
            flags.push("no description");
        }
        if page.h1.is_none() {
            flags.push("no h1");
        }
        if !page.in_sitemap {
            flags.push("not in sitemap");
        }
        if !flags.is_empty() {
            line.push_str(&format!(" \x1b[33m[{}]\x1b[0m", flags.join(", ")));
        }

        report.push_str(&line);
        report.push('\n');
    }
    report.push('\n');

    // Broken links
    if !outcome.broken.is_empty() {
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str("BROKEN LINKS\n");
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

        for broken in &outcome.broken {
            report.push_str(&format!("  \x1b[31m{}\x1b[0m ({})\n", broken.url, broken.reason));
            report.push_str(&format!("    found on: {}\n", broken.parent));
        }
        report.push('\n');
    }

    // Footer
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                                End of Report\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("\nGenerated by Pagelens - SEO site auditor\n\n");

    report
}

pub fn generate_json_report(outcome: &AuditOutcome) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Pagelens",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "site": outcome.seed,
                "total_pages": outcome.pages.len(),
                "total_broken_links": outcome.broken.len(),
                "sitemap_urls": outcome.sitemap_urls,
                "pages_missing_title": outcome.pages.iter().filter(|p| p.title.is_none()).count(),
                "pages_missing_description": outcome.pages.iter().filter(|p| p.description.is_none()).count(),
                "pages_missing_h1": outcome.pages.iter().filter(|p| p.h1.is_none()).count(),
                "pages_not_in_sitemap": outcome.pages.iter().filter(|p| !p.in_sitemap).count()
            },
            "pages": outcome.pages,
            "broken_links": outcome.broken
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
