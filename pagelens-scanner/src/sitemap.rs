//! Sitemap validation. The sitemap is fetched once per run and only ever used
//! for membership checks, so its URLs go through the same normalization as
//! every crawl target.

use crate::fetch::{FetchOutcome, Fetcher};
use crate::norm;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Well-known locations probed in order. All hits are merged; localized
/// sites often keep per-language sitemaps next to the main one.
pub const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/en/sitemap.xml", "/es/sitemap.xml"];

/// Fetch and merge all reachable sitemaps for the seed's origin.
///
/// Degrades rather than fails: an unreachable or unparseable sitemap yields an
/// empty set, which simply marks every page `in_sitemap = false`.
pub async fn load_sitemap(fetcher: &Fetcher, base: &Url) -> HashSet<String> {
    let mut all = HashSet::new();

    for sitemap_path in SITEMAP_PATHS {
        let Ok(sitemap_url) = base.join(sitemap_path) else {
            continue;
        };

        match fetcher.fetch(sitemap_url.as_str()).await {
            FetchOutcome::Success { status, body, .. } if (200..300).contains(&status) => {
                let urls = parse_sitemap(base, &body);
                debug!("Sitemap {} declared {} URLs", sitemap_url, urls.len());
                all.extend(urls);
            }
            FetchOutcome::Success { status, .. } => {
                debug!("No sitemap at {} (HTTP {})", sitemap_url, status);
            }
            FetchOutcome::Failure { reason } => {
                debug!("No sitemap at {} ({})", sitemap_url, reason);
            }
        }
    }

    all
}

/// Extract `<loc>` entries from a sitemap document. Relative locations are
/// joined against `base`; results come back normalized.
pub fn parse_sitemap(base: &Url, xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => in_loc = true,
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => in_loc = false,
            Ok(Event::Text(t)) if in_loc => {
                let Ok(text) = t.unescape() else { continue };
                let loc = text.trim();
                if loc.is_empty() {
                    continue;
                }
                match base.join(loc) {
                    Ok(joined) => urls.push(norm::normalize(&joined)),
                    Err(e) => debug!("Skipping sitemap entry '{}': {}", loc, e),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("Sitemap parse error, keeping {} URLs: {}", urls.len(), e);
                break;
            }
            _ => {}
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_parse_basic_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url>
    <loc>
      https://example.com/about
    </loc>
  </url>
</urlset>"#;

        let urls = parse_sitemap(&base(), xml);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], "https://example.com/");
        assert_eq!(urls[1], "https://example.com/about");
    }

    #[test]
    fn test_parse_joins_relative_locations() {
        let xml = "<urlset><url><loc>/relative/page</loc></url></urlset>";
        let urls = parse_sitemap(&base(), xml);
        assert_eq!(urls, vec!["https://example.com/relative/page".to_string()]);
    }

    #[test]
    fn test_parse_normalizes_entries() {
        let xml = "<urlset><url><loc>HTTPS://EXAMPLE.COM/a//#frag</loc></url></urlset>";
        let urls = parse_sitemap(&base(), xml);
        assert_eq!(urls, vec!["https://example.com/a/".to_string()]);
    }

    #[test]
    fn test_parse_garbage_yields_nothing() {
        assert!(parse_sitemap(&base(), "this is not xml at all <<<").is_empty());
    }

    #[tokio::test]
    async fn test_load_merges_reachable_sitemaps() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<urlset><url><loc>/a</loc></url></urlset>",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/en/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<urlset><url><loc>/en/b</loc></url></urlset>",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/es/sitemap.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let origin = Url::parse(&server.uri()).unwrap();
        let set = load_sitemap(&Fetcher::new(5), &origin).await;

        assert_eq!(set.len(), 2);
        assert!(set.contains(&format!("{}/a", server.uri())));
        assert!(set.contains(&format!("{}/en/b", server.uri())));
    }

    #[tokio::test]
    async fn test_load_absent_sitemap_is_empty_not_error() {
        let server = MockServer::start().await;
        // No mounts at all: every probe 404s.
        let origin = Url::parse(&server.uri()).unwrap();
        let set = load_sitemap(&Fetcher::new(5), &origin).await;
        assert!(set.is_empty());
    }
}
