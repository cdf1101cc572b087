//! `HttpFetcher` and the cache against a local HTTP server.

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use iconlens_cli::cache::{HttpFetcher, IconSetCache, IconSetFetcher};
use iconlens_cli::test_utils::{RecordingNotifier, demo_icon_set_json};

async fn cache_for(server: &MockServer, temp_dir: &TempDir) -> (IconSetCache, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let cache = IconSetCache::builder(temp_dir.path().join("collections"))
        .base_url(format!("{}/collections/", server.uri()))
        .fetcher(Arc::new(HttpFetcher::new().unwrap()))
        .notifier(notifier.clone())
        .build()
        .await
        .unwrap();
    (cache, notifier)
}

#[tokio::test]
async fn downloads_collection_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections/demo.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(demo_icon_set_json())
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let (cache, notifier) = cache_for(&server, &temp_dir).await;

    let (a, b) = tokio::join!(cache.load("demo"), cache.load("demo"));
    assert!(a.is_some());
    assert!(b.is_some());
    assert!(notifier.messages().is_empty());
    // `expect(1)` is verified when the server drops
}

#[tokio::test]
async fn http_error_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections/gone.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let (cache, notifier) = cache_for(&server, &temp_dir).await;

    assert!(cache.load("gone").await.is_none());
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("404"));
}

#[tokio::test]
async fn invalid_json_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections/broken.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let (cache, notifier) = cache_for(&server, &temp_dir).await;

    assert!(cache.load("broken").await.is_none());
    assert_eq!(notifier.messages().len(), 1);
    assert!(!cache.collection_path("broken").exists());
}

#[tokio::test]
async fn fetcher_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
    let url = format!("{}/collections/mdi.json", server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains(&url));
}

#[tokio::test]
async fn fetcher_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::with_timeout(Duration::from_millis(100)).unwrap();
    let url = format!("{}/collections/slow.json", server.uri());
    assert!(fetcher.fetch(&url).await.is_err());
}
