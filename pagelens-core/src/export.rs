//! Tabular export: spreadsheet publishing and local CSV sinks.

use crate::config::Credentials;
use pagelens_scanner::{BrokenLinkResult, PageResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const PAGE_HEADERS: [&str; 9] = [
    "Link",
    "Title",
    "Title Characters",
    "Meta Description",
    "Meta Description Characters",
    "H1 Title",
    "Canonical URL",
    "Breadcrumbs",
    "In Sitemap",
];

pub const BROKEN_HEADERS: [&str; 3] = ["Broken Link", "Parent URL", "Status"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("request to sheet service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheet service rejected {context} (HTTP {status})")]
    Rejected { status: u16, context: String },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn char_count(value: &Option<String>) -> String {
    value
        .as_ref()
        .map(|v| v.chars().count().to_string())
        .unwrap_or_else(|| "0".to_string())
}

fn page_row(page: &PageResult) -> Vec<String> {
    vec![
        page.url.clone(),
        opt_str(&page.title),
        char_count(&page.title),
        opt_str(&page.description),
        char_count(&page.description),
        opt_str(&page.h1),
        opt_str(&page.canonical),
        opt_str(&page.breadcrumbs),
        if page.in_sitemap { "Yes" } else { "No" }.to_string(),
    ]
}

fn broken_row(broken: &BrokenLinkResult) -> Vec<String> {
    vec![
        broken.url.clone(),
        broken.parent.clone(),
        broken.reason.to_string(),
    ]
}

/// Page rows including the header row, ready for any tabular sink.
pub fn page_table(pages: &[PageResult]) -> Vec<Vec<String>> {
    let mut rows = vec![PAGE_HEADERS.iter().map(|h| h.to_string()).collect()];
    rows.extend(pages.iter().map(page_row));
    rows
}

pub fn broken_table(broken: &[BrokenLinkResult]) -> Vec<Vec<String>> {
    let mut rows = vec![BROKEN_HEADERS.iter().map(|h| h.to_string()).collect()];
    rows.extend(broken.iter().map(broken_row));
    rows
}

pub fn write_pages_csv(path: &Path, pages: &[PageResult]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in page_table(pages) {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_broken_csv(path: &Path, broken: &[BrokenLinkResult]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in broken_table(broken) {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// A document created on the sheet service.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedSheet {
    pub id: String,
    pub url: String,
}

/// Client for the sheet publishing service. Creates a document, uploads
/// both result tables as named sheets, and shares it with a recipient.
pub struct SheetPublisher {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl SheetPublisher {
    pub fn new(credentials: &Credentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: credentials.endpoint.trim_end_matches('/').to_string(),
            token: credentials.token.clone(),
        }
    }

    pub async fn publish(
        &self,
        title: &str,
        pages: &[PageResult],
        broken: &[BrokenLinkResult],
        share_with: &str,
    ) -> Result<PublishedSheet, ExportError> {
        let sheet = self.create_document(title).await?;
        debug!(id = %sheet.id, "created sheet document");

        self.upload_sheet(&sheet.id, "seo-analysis", "SEO Analysis", page_table(pages))
            .await?;
        self.upload_sheet(&sheet.id, "broken-links", "Broken Links", broken_table(broken))
            .await?;
        self.share(&sheet.id, share_with).await?;

        Ok(sheet)
    }

    async fn create_document(&self, title: &str) -> Result<PublishedSheet, ExportError> {
        let response = self
            .client
            .post(format!("{}/v1/documents", self.endpoint))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExportError::Rejected {
                status: response.status().as_u16(),
                context: "document creation".to_string(),
            });
        }

        Ok(response.json().await?)
    }

    async fn upload_sheet(
        &self,
        document_id: &str,
        slug: &str,
        title: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<(), ExportError> {
        let response = self
            .client
            .put(format!(
                "{}/v1/documents/{}/sheets/{}",
                self.endpoint, document_id, slug
            ))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "title": title, "rows": rows }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExportError::Rejected {
                status: response.status().as_u16(),
                context: format!("sheet upload ({})", slug),
            });
        }

        Ok(())
    }

    async fn share(&self, document_id: &str, email: &str) -> Result<(), ExportError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/documents/{}/permissions",
                self.endpoint, document_id
            ))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "type": "user",
                "role": "writer",
                "email": email
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExportError::Rejected {
                status: response.status().as_u16(),
                context: "sharing".to_string(),
            });
        }

        Ok(())
    }
}
