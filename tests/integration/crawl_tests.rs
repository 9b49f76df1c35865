//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for both the search engine and the
//! linked sites, and run the full crawl cycle end-to-end.

use phone_harvest::config::Config;
use phone_harvest::crawler::{crawl, Crawler, FetchError, SearchQuery};
use phone_harvest::output::{format_text_report, CrawlStatistics};
use phone_harvest::state::{CrawlPhase, LinkState};
use phone_harvest::HarvestError;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing the search endpoint at `base_url`
fn create_test_config(base_url: &str, timeout_ms: u64) -> Config {
    let mut config = Config::default();
    config.search.endpoint = format!("{}/search", base_url);
    config.crawler.fetch_timeout_ms = timeout_ms;
    config.crawler.max_concurrent_fetches = 4;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

/// Mounts a search results page for `query` linking to `links`
async fn mount_search_page(server: &MockServer, query: &str, links: &[String]) {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">result</a>"#, link))
        .collect();

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .respond_with(html_page(&anchors))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_with_one_slow_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let contact = format!("{}/contact", base_url);
    let slow = format!("{}/slow", base_url);
    mount_search_page(&mock_server, "universities", &[contact.clone(), slow.clone()]).await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_page("Admissions: 021-12345678, fax 0755-7654321"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Office 010-87654321").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 500);
    let query = SearchQuery::new("universities").unwrap();
    let report = crawl(&config, &query).await.expect("Crawl should succeed");

    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(report.query.as_deref(), Some("universities"));
    assert_eq!(report.links_extracted, 2);
    assert_eq!(report.results.len(), 1);

    let numbers: Vec<&str> = report.results[&contact].iter().map(String::as_str).collect();
    assert_eq!(numbers, vec!["021-12345678", "0755-7654321"]);
    assert!(!report.results.contains_key(&slow));

    let slow_report = report
        .links
        .iter()
        .find(|link| link.url == slow)
        .expect("slow link should be reported");
    assert_eq!(slow_report.state(), LinkState::TimedOut);

    assert_eq!(
        format_text_report(&report.results),
        format!(
            "URL: {}\n - Phone: 021-12345678\n - Phone: 0755-7654321\n",
            contact
        )
    );
}

#[tokio::test]
async fn test_seed_failure_fetches_no_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Nothing but the seed may be requested
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_page("021-12345678"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2_000);
    let query = SearchQuery::new("universities").unwrap();
    let result = crawl(&config, &query).await;

    match result {
        Err(HarvestError::SeedFetch(FetchError::Status { status, .. })) => {
            assert_eq!(status, 503)
        }
        other => panic!("expected seed failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let page = format!("{}/page", base_url);
    mount_search_page(
        &mock_server,
        "hospitals",
        &[page.clone(), page.clone(), format!("{}#top", page)],
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_page("Call 021-12345678 or 021-12345678"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 2_000);
    let query = SearchQuery::new("hospitals").unwrap();
    let report = crawl(&config, &query).await.unwrap();

    // `page` and `page#top` are distinct link strings
    assert_eq!(report.links_extracted, 2);
    assert_eq!(report.results[&page].len(), 1);
    assert_eq!(report.distinct_numbers(), 1);
}

#[tokio::test]
async fn test_failed_links_are_classified() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let missing = format!("{}/missing", base_url);
    let broken = format!("{}/broken", base_url);
    let image = format!("{}/logo.png", base_url);
    let plain = format!("{}/plain", base_url);
    mount_search_page(
        &mock_server,
        "schools",
        &[missing.clone(), broken.clone(), image.clone(), plain.clone()],
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"\x89PNG 021-12345678".to_vec(),
            "image/png",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(html_page("No contact details here"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 2_000);
    let query = SearchQuery::new("schools").unwrap();
    let report = crawl(&config, &query).await.unwrap();

    assert!(report.is_complete());
    assert!(report.results.is_empty());
    assert_eq!(format_text_report(&report.results), "");

    let counts = report.count_by_state();
    assert_eq!(counts.get(&LinkState::DeadLink), Some(&1));
    assert_eq!(counts.get(&LinkState::HttpError), Some(&1));
    assert_eq!(counts.get(&LinkState::ContentMismatch), Some(&1));
    assert_eq!(counts.get(&LinkState::NoMatches), Some(&1));

    let stats = CrawlStatistics::from_report(&report);
    assert_eq!(stats.links_extracted, 4);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.unique_domains, 1);
}

#[tokio::test]
async fn test_redirected_link_keyed_by_requested_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let moved = format!("{}/moved", base_url);
    let target = format!("{}/final", base_url);
    mount_search_page(&mock_server, "clinics", &[moved.clone()]).await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(html_page("Front desk 0571-88888888"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 2_000);
    let query = SearchQuery::new("clinics").unwrap();
    let report = crawl(&config, &query).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert!(report.results[&moved].contains("0571-88888888"));
}

#[tokio::test]
async fn test_cancelled_run_returns_partial_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let fast = format!("{}/fast", base_url);
    let stuck = format!("{}/stuck", base_url);
    mount_search_page(&mock_server, "libraries", &[fast.clone(), stuck.clone()]).await;

    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(html_page("Reference desk 020-33334444"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stuck"))
        .respond_with(html_page("020-55556666").set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, 60_000);
    let crawler = Crawler::from_config(&config).unwrap();
    let query = SearchQuery::new("libraries").unwrap();

    let report = crawler
        .run_until(&query, tokio::time::sleep(Duration::from_millis(1_000)))
        .await
        .unwrap();

    assert_eq!(report.phase, CrawlPhase::Aborted);
    assert!(report.results.contains_key(&fast));
    assert!(!report.results.contains_key(&stuck));
    assert_eq!(report.lost_links, vec![stuck]);
}

#[tokio::test]
async fn test_query_is_url_encoded() {
    let mock_server = MockServer::start().await;

    // query_param matches against the decoded value
    mount_search_page(&mock_server, "高校 电话", &[]).await;

    let config = create_test_config(&mock_server.uri(), 2_000);
    let query = SearchQuery::new("高校 电话").unwrap();
    let report = crawl(&config, &query).await.unwrap();

    assert_eq!(report.links_extracted, 0);
    assert!(report.seed_url.contains("q=%E9%AB%98%E6%A0%A1+%E7%94%B5%E8%AF%9D"));
}
