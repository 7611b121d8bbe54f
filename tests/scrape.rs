mod common;

use std::time::{Duration, Instant};

use common::html_page;
use kluster_tweets::docs::fetch::MAX_CONCURRENT_CAP;
use kluster_tweets::docs::{scrape_run, DocFetcher, DocSource, ScrapeConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page(body)))
        .mount(server)
        .await;
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let bytes = std::fs::read(path).expect("Failed to read cache file");
    serde_json::from_slice(&bytes).expect("Cache file is not JSON")
}

#[tokio::test]
async fn single_page_lands_in_cache() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/overview",
        "<p>kluster.ai   provides\n distributed inference</p>",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("kluster_docs.json");
    let config = ScrapeConfig::new(vec![DocSource::new(
        "platform",
        "overview",
        format!("{}/overview", server.uri()),
    )]);

    let report = scrape_run(&config, &cache).await.expect("Scrape run failed");

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(
        read_json(&cache),
        json!({"platform": {"overview": "kluster.ai provides distributed inference"}})
    );
}

#[tokio::test]
async fn failed_pages_are_skipped_without_touching_others() {
    let server = MockServer::start().await;
    mount_page(&server, "/models", "<main><h1>Models</h1><p>DeepSeek and Llama</p></main>").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><script>x()</script></body></html>"))
        .mount(&server)
        .await;

    let config = ScrapeConfig::new(vec![
        DocSource::new("start", "models", format!("{}/models", server.uri())),
        DocSource::new("start", "missing", format!("{}/missing", server.uri())),
        DocSource::new("tutorials", "broken", format!("{}/broken", server.uri())),
        DocSource::new("tutorials", "blank", format!("{}/blank", server.uri())),
        DocSource::new("tutorials", "bad-url", "mailto:docs@kluster.ai"),
    ]);

    let fetcher = DocFetcher::new(&config).unwrap();
    let outcome = fetcher.fetch_all(&config.sources).await;

    assert_eq!(outcome.index.get("start", "models"), Some("Models DeepSeek and Llama"));
    assert_eq!(outcome.index.get("start", "missing"), None);
    assert_eq!(outcome.index.get("tutorials", "broken"), None);
    assert_eq!(outcome.index.get("tutorials", "blank"), None);
    assert_eq!(outcome.index.get("tutorials", "bad-url"), None);
    assert!(outcome.index.subtopics("tutorials").is_empty());
    assert_eq!(outcome.succeeded(), 1);

    let mut skipped: Vec<&str> = outcome.failures.iter().map(|f| f.subtopic.as_str()).collect();
    skipped.sort_unstable();
    assert_eq!(skipped, vec!["bad-url", "blank", "broken", "missing"]);
    let missing = outcome.failures.iter().find(|f| f.subtopic == "missing").unwrap();
    assert!(missing.reason.contains("404"), "{}", missing.reason);
}

#[tokio::test]
async fn all_failures_still_write_empty_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("docs.json");
    let config = ScrapeConfig::new(vec![
        DocSource::new("a", "one", format!("{}/one", server.uri())),
        DocSource::new("b", "two", format!("{}/two", server.uri())),
    ]);

    let report = scrape_run(&config, &cache).await.expect("Scrape run failed");

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.skipped, 2);
    assert_eq!(read_json(&cache), json!({}));
}

#[tokio::test]
async fn empty_configuration_writes_empty_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("nested").join("docs.json");

    let report = scrape_run(&ScrapeConfig::new(vec![]), &cache)
        .await
        .expect("Scrape run failed");

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(std::fs::read_to_string(&cache).unwrap().trim(), "{}");
}

#[tokio::test]
async fn repeated_runs_produce_identical_bytes() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "<article>Batch inference at scale ⚡</article>").await;
    mount_page(&server, "/b", "<p>Fine-tune Llama models</p>").await;
    mount_page(&server, "/c", "<p>Verify catches hallucinations</p>").await;

    let sources = vec![
        DocSource::new("📈 Use Cases", "Batch", format!("{}/a", server.uri())),
        DocSource::new("🎯 Fine-tuning", "Fine Tuning", format!("{}/b", server.uri())),
        DocSource::new("🛡️ Verify", "Reliability", format!("{}/c", server.uri())),
    ];
    let dir = tempfile::tempdir().unwrap();
    let first_path = dir.path().join("first.json");
    let second_path = dir.path().join("second.json");

    let first = scrape_run(&ScrapeConfig::new(sources.clone()), &first_path).await.unwrap();
    let mut reversed = sources;
    reversed.reverse();
    let second = scrape_run(&ScrapeConfig::new(reversed), &second_path).await.unwrap();

    assert_eq!(
        std::fs::read(&first_path).unwrap(),
        std::fs::read(&second_path).unwrap()
    );
    assert_eq!(first.digest, second.digest);
}

#[tokio::test]
async fn slow_page_times_out_and_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("<p>too late</p>"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", "<p>on time</p>").await;

    let mut config = ScrapeConfig::new(vec![
        DocSource::new("t", "slow", format!("{}/slow", server.uri())),
        DocSource::new("t", "fast", format!("{}/fast", server.uri())),
    ]);
    config.request_timeout = Duration::from_millis(300);

    let outcome = DocFetcher::new(&config).unwrap().fetch_all(&config.sources).await;

    assert_eq!(outcome.index.get("t", "fast"), Some("on time"));
    assert_eq!(outcome.index.get("t", "slow"), None);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].reason.contains("timeout"), "{}", outcome.failures[0].reason);
}

#[tokio::test]
async fn later_source_wins_on_duplicate_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("<p>old text</p>"))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/new", "<p>new text</p>").await;

    let config = ScrapeConfig::new(vec![
        DocSource::new("platform", "overview", format!("{}/old", server.uri())),
        DocSource::new("platform", "overview", format!("{}/new", server.uri())),
    ]);

    let outcome = DocFetcher::new(&config).unwrap().fetch_all(&config.sources).await;

    assert_eq!(outcome.index.get("platform", "overview"), Some("new text"));
    assert_eq!(outcome.index.len(), 1);
}

#[tokio::test]
async fn sends_configured_user_agent_with_single_worker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "docs-bot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("<p>ok</p>")))
        .expect(3)
        .mount(&server)
        .await;

    let mut config = ScrapeConfig::new(
        (0..3)
            .map(|i| DocSource::new("t", format!("s{}", i), format!("{}/p{}", server.uri(), i)))
            .collect(),
    );
    config.user_agent = "docs-bot/1.0".to_string();
    config.max_concurrent = 1;

    let outcome = DocFetcher::new(&config).unwrap().fetch_all(&config.sources).await;

    assert_eq!(outcome.index.len(), 3);
    assert!(outcome.failures.is_empty());
}

async fn mount_slow_pages(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("<p>slow page</p>"))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

fn numbered_sources(server: &MockServer, count: usize) -> Vec<DocSource> {
    (0..count)
        .map(|i| DocSource::new("t", format!("s{}", i), format!("{}/p{}", server.uri(), i)))
        .collect()
}

#[tokio::test]
async fn requests_run_in_waves_of_max_concurrent() {
    let delay = Duration::from_millis(200);
    let server = MockServer::start().await;
    mount_slow_pages(&server, delay).await;

    let mut config = ScrapeConfig::new(numbered_sources(&server, 6));
    config.max_concurrent = 2;

    let started = Instant::now();
    let outcome = DocFetcher::new(&config).unwrap().fetch_all(&config.sources).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.index.len(), 6);
    // 6 pages two at a time is three back-to-back waves.
    assert!(elapsed >= delay * 3 - Duration::from_millis(50), "{elapsed:?}");
    assert!(elapsed < delay * 6, "{elapsed:?}");
}

#[tokio::test]
async fn oversized_concurrency_still_runs_at_the_cap() {
    let delay = Duration::from_millis(200);
    let server = MockServer::start().await;
    mount_slow_pages(&server, delay).await;

    let mut config = ScrapeConfig::new(numbered_sources(&server, MAX_CONCURRENT_CAP + 2));
    config.max_concurrent = 500;

    let started = Instant::now();
    let outcome = DocFetcher::new(&config).unwrap().fetch_all(&config.sources).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.index.len(), MAX_CONCURRENT_CAP + 2);
    // The two pages past the cap wait for a free slot.
    assert!(elapsed >= delay * 2 - Duration::from_millis(50), "{elapsed:?}");
}
