// Tests for report generation functionality

use pagelens_core::audit::AuditOutcome;
use pagelens_core::report::{
    ReportFormat, extract_url_path, generate_json_report, generate_text_report, save_report,
};
use pagelens_scanner::{BrokenLinkResult, BrokenReason, PageResult};

fn sample_page(url: &str) -> PageResult {
    PageResult {
        url: url.to_string(),
        status_code: 200,
        title: Some("Welcome".to_string()),
        description: Some("A welcome page".to_string()),
        h1: Some("Hello".to_string()),
        canonical: None,
        breadcrumbs: None,
        in_sitemap: true,
    }
}

fn sample_outcome() -> AuditOutcome {
    AuditOutcome {
        seed: "https://example.com/".to_string(),
        pages: vec![
            sample_page("https://example.com/"),
            PageResult {
                url: "https://example.com/about".to_string(),
                status_code: 200,
                title: None,
                description: None,
                h1: Some("About".to_string()),
                canonical: None,
                breadcrumbs: None,
                in_sitemap: false,
            },
        ],
        broken: vec![BrokenLinkResult {
            url: "https://example.com/missing".to_string(),
            parent: "https://example.com/".to_string(),
            reason: BrokenReason::HttpStatus(404),
        }],
        sitemap_urls: 5,
    }
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str_text() {
    let format = ReportFormat::from_str("text");
    assert!(matches!(format, Some(ReportFormat::Text)));
}

#[test]
fn test_report_format_from_str_json() {
    let format = ReportFormat::from_str("json");
    assert!(matches!(format, Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_csv() {
    let format = ReportFormat::from_str("csv");
    assert!(matches!(format, Some(ReportFormat::Csv)));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert!(matches!(
        ReportFormat::from_str("TEXT"),
        Some(ReportFormat::Text)
    ));
    assert!(matches!(
        ReportFormat::from_str("Json"),
        Some(ReportFormat::Json)
    ));
}

#[test]
fn test_report_format_from_str_unknown() {
    assert!(ReportFormat::from_str("xml").is_none());
}

// ============================================================================
// URL Path Extraction Tests
// ============================================================================

#[test]
fn test_extract_url_path_root() {
    assert_eq!(extract_url_path("https://example.com/"), "/");
    assert_eq!(extract_url_path("https://example.com"), "/");
}

#[test]
fn test_extract_url_path_nested() {
    assert_eq!(
        extract_url_path("https://example.com/blog/post-1"),
        "/blog/post-1"
    );
}

#[test]
fn test_extract_url_path_invalid_url_passthrough() {
    assert_eq!(extract_url_path("not a url"), "not a url");
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_contains_summary() {
    let report = generate_text_report(&sample_outcome());

    assert!(report.contains("PAGELENS SEO AUDIT REPORT"));
    assert!(report.contains("https://example.com/"));
    assert!(report.contains("Pages Audited:  2"));
    assert!(report.contains("Broken Links:   1"));
    assert!(report.contains("Sitemap URLs:   5"));
}

#[test]
fn test_text_report_flags_missing_metadata() {
    let report = generate_text_report(&sample_outcome());

    assert!(report.contains("no title"));
    assert!(report.contains("no description"));
    assert!(report.contains("not in sitemap"));
}

#[test]
fn test_text_report_lists_broken_links() {
    let report = generate_text_report(&sample_outcome());

    assert!(report.contains("https://example.com/missing"));
    assert!(report.contains("HTTP 404"));
    assert!(report.contains("found on: https://example.com/"));
}

#[test]
fn test_text_report_without_broken_links() {
    let mut outcome = sample_outcome();
    outcome.broken.clear();

    let report = generate_text_report(&outcome);
    assert!(!report.contains("BROKEN LINKS"));
}

#[test]
fn test_text_report_no_sitemap() {
    let mut outcome = sample_outcome();
    outcome.sitemap_urls = 0;

    let report = generate_text_report(&outcome);
    assert!(report.contains("none found"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_is_valid_json() {
    let report = generate_json_report(&sample_outcome()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(parsed["report"]["metadata"]["generator"], "Pagelens");
    assert_eq!(parsed["report"]["summary"]["total_pages"], 2);
    assert_eq!(parsed["report"]["summary"]["total_broken_links"], 1);
}

#[test]
fn test_json_report_summary_counts() {
    let report = generate_json_report(&sample_outcome()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();

    let summary = &parsed["report"]["summary"];
    assert_eq!(summary["pages_missing_title"], 1);
    assert_eq!(summary["pages_missing_description"], 1);
    assert_eq!(summary["pages_missing_h1"], 0);
    assert_eq!(summary["pages_not_in_sitemap"], 1);
}

#[test]
fn test_json_report_includes_page_fields() {
    let report = generate_json_report(&sample_outcome()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();

    let pages = parsed["report"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["url"], "https://example.com/");
    assert_eq!(pages[0]["title"], "Welcome");
    assert_eq!(pages[0]["in_sitemap"], true);
}

// ============================================================================
// Save Report Tests
// ============================================================================

#[test]
fn test_save_report_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    save_report("audit contents", &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "audit contents");
}
