//! URL normalization.
//!
//! Every place a URL is compared (frontier, visited set, sitemap membership)
//! must go through [`normalize`], otherwise the same page can be fetched twice
//! under different spellings.

use url::Url;

/// Canonical string form of a URL: lowercase scheme and host, no fragment,
/// no default port, duplicate trailing slashes collapsed to one.
///
/// Idempotent: `normalize` of an already-normalized URL is a no-op.
pub fn normalize(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);

    let path = url.path();
    if path.ends_with("//") {
        let collapsed = format!("{}/", path.trim_end_matches('/'));
        url.set_path(&collapsed);
    }

    url.to_string()
}

/// Parse and normalize in one step. `None` for unparseable input.
pub fn normalize_str(raw: &str) -> Option<String> {
    Url::parse(raw).ok().map(|u| normalize(&u))
}

/// Resolve an anchor href against the page it appeared on. Skips empty hrefs,
/// pure fragment anchors and non-http(s) schemes (mailto, tel, javascript).
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}

/// Domain scoping: the crawl never leaves the seed's host.
pub fn is_same_domain(url: &Url, seed_host: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(seed_host))
}
