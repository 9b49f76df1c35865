//! Integration tests for the HTTP fetcher against mock servers

use phone_harvest::config::UserAgentConfig;
use phone_harvest::crawler::{FetchError, HttpFetcher, PageFetch};
use phone_harvest::state::LinkState;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&UserAgentConfig::default()).expect("client should build")
}

#[tokio::test]
async fn test_fetch_html_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>Tel: 021-12345678</p>", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/page", mock_server.uri());
    let page = fetcher().fetch(&url, TIMEOUT).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.final_url, url);
    assert_eq!(page.status_code, 200);
    assert!(page.content_type.unwrap().starts_with("text/html"));
    assert_eq!(page.body, "<p>Tel: 021-12345678</p>");
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let mock_server = MockServer::start().await;
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "2.0".to_string(),
        contact_url: Some("https://example.com/bot".to_string()),
        contact_email: Some("bot@example.com".to_string()),
    };

    Mock::given(method("GET"))
        .and(header(
            "user-agent",
            "TestBot/2.0 (+https://example.com/bot; bot@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/plain"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&user_agent).unwrap();
    let page = fetcher.fetch(&mock_server.uri(), TIMEOUT).await.unwrap();
    assert_eq!(page.body, "ok");
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let mock_server = MockServer::start().await;
    let target = format!("{}/new", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", target.as_str()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("moved here", "text/html"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/old", mock_server.uri());
    let page = fetcher().fetch(&url, TIMEOUT).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.final_url, target);
    assert_eq!(page.body, "moved here");
}

#[tokio::test]
async fn test_fetch_not_found_is_dead_link() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/gone", mock_server.uri());
    let err = fetcher().fetch(&url, TIMEOUT).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert_eq!(err.state(), LinkState::DeadLink);
    assert_eq!(err.url(), url);
}

#[tokio::test]
async fn test_fetch_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = fetcher()
        .fetch(&mock_server.uri(), TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(err.state(), LinkState::HttpError);
}

#[tokio::test]
async fn test_fetch_rejects_binary_content() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "image/png"))
        .mount(&mock_server)
        .await;

    let err = fetcher()
        .fetch(&mock_server.uri(), TIMEOUT)
        .await
        .unwrap_err();

    match &err {
        FetchError::ContentMismatch { content_type, .. } => assert_eq!(content_type, "image/png"),
        other => panic!("expected content mismatch, got {:?}", other),
    }
    assert_eq!(err.state(), LinkState::ContentMismatch);
}

#[tokio::test]
async fn test_fetch_accepts_xhtml() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html/>", "application/xhtml+xml"),
        )
        .mount(&mock_server)
        .await;

    let page = fetcher().fetch(&mock_server.uri(), TIMEOUT).await.unwrap();
    assert_eq!(page.body, "<html/>");
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("late", "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let err = fetcher()
        .fetch(&mock_server.uri(), Duration::from_millis(200))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout { .. }));
    assert_eq!(err.state(), LinkState::TimedOut);
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Reserve a port, then free it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}/", addr);
    let err = fetcher().fetch(&url, TIMEOUT).await.unwrap_err();

    assert!(matches!(err, FetchError::Connect { .. }));
    assert_eq!(err.state(), LinkState::Unreachable);
}
