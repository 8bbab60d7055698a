//! Parsed-page access. A fetched body is parsed once into a [`PageDocument`]
//! which exposes typed accessors for the handful of elements the audit cares
//! about, instead of ad-hoc tree queries scattered over the crawler.

use crate::norm;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// SEO fields of one page. Every field is optional; a missing tag is
/// represented as `None`, never as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub h1: Option<String>,
    pub canonical: Option<String>,
    pub breadcrumbs: Option<String>,
}

pub struct PageDocument {
    doc: Html,
}

impl PageDocument {
    /// Never fails: malformed HTML parses into whatever tree html5ever can
    /// recover, and absent elements degrade to `None` fields.
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.title(),
            description: self.meta_description(),
            h1: self.first_h1(),
            canonical: self.canonical(),
            breadcrumbs: self.breadcrumbs(),
        }
    }

    /// First `<title>` in document order.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").unwrap();
        self.doc
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    /// Content of the meta tag whose name equals "description",
    /// case-insensitively.
    pub fn meta_description(&self) -> Option<String> {
        let selector = Selector::parse("meta[name][content]").unwrap();
        self.doc.select(&selector).find_map(|el| {
            let name = el.value().attr("name")?;
            if name.eq_ignore_ascii_case("description") {
                el.value().attr("content").map(|c| c.to_string())
            } else {
                None
            }
        })
    }

    /// First `<h1>` only; subsequent occurrences are ignored.
    pub fn first_h1(&self) -> Option<String> {
        let selector = Selector::parse("h1").unwrap();
        self.doc
            .select(&selector)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
    }

    pub fn canonical(&self) -> Option<String> {
        let selector = Selector::parse("link[href]").unwrap();
        self.doc.select(&selector).find_map(|el| {
            let rel = el.value().attr("rel")?;
            if rel.eq_ignore_ascii_case("canonical") {
                el.value().attr("href").map(|h| h.to_string())
            } else {
                None
            }
        })
    }

    /// Breadcrumb trail as "1: Home (url) > 2: Blog (url)". JSON-LD
    /// `BreadcrumbList` blocks win; a breadcrumb `<nav>`/`<ul>` is the
    /// fallback.
    pub fn breadcrumbs(&self) -> Option<String> {
        self.breadcrumbs_from_json_ld()
            .or_else(|| self.breadcrumbs_from_markup())
    }

    /// Raw href of every anchor, in document order.
    pub fn anchor_hrefs(&self) -> Vec<String> {
        let selector = Selector::parse("a[href]").unwrap();
        self.doc
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .map(|href| href.to_string())
            .collect()
    }

    /// Anchors resolved against `page_url`, kept only when they stay on the
    /// seed host, returned normalized. May contain duplicates; the crawler's
    /// visited set is the single deduplication point.
    pub fn internal_links(&self, page_url: &Url, seed_host: &str) -> Vec<String> {
        self.anchor_hrefs()
            .iter()
            .filter_map(|href| norm::resolve(page_url, href))
            .filter(|resolved| norm::is_same_domain(resolved, seed_host))
            .map(|resolved| norm::normalize(&resolved))
            .collect()
    }

    fn breadcrumbs_from_json_ld(&self) -> Option<String> {
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

        for script in self.doc.select(&selector) {
            let raw = element_text(script);
            let value: serde_json::Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Skipping unparseable JSON-LD block: {}", e);
                    continue;
                }
            };

            if value.get("@type").and_then(|t| t.as_str()) != Some("BreadcrumbList") {
                continue;
            }
            let Some(items) = value.get("itemListElement").and_then(|i| i.as_array()) else {
                continue;
            };

            let crumbs: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    let position = item
                        .get("position")
                        .and_then(|p| p.as_u64())
                        .unwrap_or(idx as u64 + 1);
                    let name = item.get("name").and_then(|n| n.as_str()).unwrap_or("");
                    let url = item
                        .get("item")
                        .and_then(|u| u.as_str())
                        .unwrap_or("No URL");
                    format!("{}: {} ({})", position, name, url)
                })
                .collect();

            if !crumbs.is_empty() {
                return Some(crumbs.join(" > "));
            }
        }

        None
    }

    fn breadcrumbs_from_markup(&self) -> Option<String> {
        let nav = Selector::parse(r#"nav[aria-label="breadcrumb"]"#).unwrap();
        let list = Selector::parse("ul.breadcrumb").unwrap();
        let item = Selector::parse("li").unwrap();
        let anchor = Selector::parse("a").unwrap();

        let container = self
            .doc
            .select(&nav)
            .next()
            .or_else(|| self.doc.select(&list).next())?;

        let crumbs: Vec<String> = container
            .select(&item)
            .enumerate()
            .map(|(idx, li)| {
                if let Some(link) = li.select(&anchor).next() {
                    let name = element_text(link);
                    let href = link.value().attr("href").unwrap_or("No URL");
                    format!("{}: {} ({})", idx + 1, name, href)
                } else {
                    format!("{}: {} (No URL)", idx + 1, element_text(li))
                }
            })
            .collect();

        if crumbs.is_empty() {
            None
        } else {
            Some(crumbs.join(" > "))
        }
    }
}

fn element_text(el: scraper::ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
