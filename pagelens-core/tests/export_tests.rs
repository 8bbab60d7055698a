// Tests for CSV sinks and the sheet publisher

use pagelens_core::config::Credentials;
use pagelens_core::export::{
    ExportError, SheetPublisher, broken_table, page_table, write_broken_csv, write_pages_csv,
};
use pagelens_scanner::{BrokenLinkResult, BrokenReason, PageResult};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_pages() -> Vec<PageResult> {
    vec![PageResult {
        url: "https://example.com/".to_string(),
        status_code: 200,
        title: Some("Home".to_string()),
        description: Some("The home page".to_string()),
        h1: Some("Welcome".to_string()),
        canonical: Some("https://example.com/".to_string()),
        breadcrumbs: None,
        in_sitemap: true,
    }]
}

fn sample_broken() -> Vec<BrokenLinkResult> {
    vec![BrokenLinkResult {
        url: "https://example.com/gone".to_string(),
        parent: "https://example.com/".to_string(),
        reason: BrokenReason::HttpStatus(404),
    }]
}

fn credentials_for(server: &MockServer) -> Credentials {
    serde_json::from_value(serde_json::json!({
        "token": "test-token",
        "endpoint": server.uri()
    }))
    .unwrap()
}

// ============================================================================
// Table Shape Tests
// ============================================================================

#[test]
fn test_page_table_headers_and_rows() {
    let table = page_table(&sample_pages());

    assert_eq!(table.len(), 2);
    assert_eq!(table[0][0], "Link");
    assert_eq!(table[0][8], "In Sitemap");
    assert_eq!(table[1][0], "https://example.com/");
    assert_eq!(table[1][1], "Home");
    assert_eq!(table[1][2], "4"); // "Home" is four characters
    assert_eq!(table[1][8], "Yes");
}

#[test]
fn test_page_table_empty_metadata_is_blank() {
    let pages = vec![PageResult {
        url: "https://example.com/bare".to_string(),
        status_code: 200,
        title: None,
        description: None,
        h1: None,
        canonical: None,
        breadcrumbs: None,
        in_sitemap: false,
    }];

    let table = page_table(&pages);
    assert_eq!(table[1][1], "");
    assert_eq!(table[1][2], "0");
    assert_eq!(table[1][8], "No");
}

#[test]
fn test_broken_table_rows() {
    let table = broken_table(&sample_broken());

    assert_eq!(table[0], vec!["Broken Link", "Parent URL", "Status"]);
    assert_eq!(table[1][0], "https://example.com/gone");
    assert_eq!(table[1][1], "https://example.com/");
    assert_eq!(table[1][2], "HTTP 404");
}

// ============================================================================
// CSV Sink Tests
// ============================================================================

#[test]
fn test_write_pages_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("pages.csv");

    write_pages_csv(&csv_path, &sample_pages()).unwrap();

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = contents.lines();
    assert!(lines.next().unwrap().starts_with("Link,Title,Title Characters"));
    assert!(lines.next().unwrap().contains("https://example.com/"));
}

#[test]
fn test_write_broken_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("broken_links.csv");

    write_broken_csv(&csv_path, &sample_broken()).unwrap();

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("Broken Link,Parent URL,Status"));
    assert!(contents.contains("HTTP 404"));
}

// ============================================================================
// Sheet Publisher Tests
// ============================================================================

#[tokio::test]
async fn test_publish_creates_uploads_and_shares() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "doc-1",
            "url": "https://sheets.example.com/doc-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/documents/doc-1/sheets/seo-analysis"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/documents/doc-1/sheets/broken-links"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/doc-1/permissions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = SheetPublisher::new(&credentials_for(&server));
    let sheet = publisher
        .publish(
            "example.com audit",
            &sample_pages(),
            &sample_broken(),
            "team@example.com",
        )
        .await
        .unwrap();

    assert_eq!(sheet.id, "doc-1");
    assert_eq!(sheet.url, "https://sheets.example.com/doc-1");
}

#[tokio::test]
async fn test_publish_rejected_document_creation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let publisher = SheetPublisher::new(&credentials_for(&server));
    let err = publisher
        .publish("audit", &sample_pages(), &sample_broken(), "a@b.com")
        .await
        .unwrap_err();

    match err {
        ExportError::Rejected { status, .. } => assert_eq!(status, 401),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_publish_rejected_sheet_upload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/documents"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "doc-2",
            "url": "https://sheets.example.com/doc-2"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/documents/doc-2/sheets/seo-analysis"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let publisher = SheetPublisher::new(&credentials_for(&server));
    let err = publisher
        .publish("audit", &sample_pages(), &sample_broken(), "a@b.com")
        .await
        .unwrap_err();

    assert!(matches!(err, ExportError::Rejected { status: 500, .. }));
}
