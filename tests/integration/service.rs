//! End-to-end behavior of `IconService` over a mock CDN.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use iconlens_cli::cache::{IconSetCache, MemoryStore};
use iconlens_cli::constants::SVG_DATA_URL_PREFIX;
use iconlens_cli::resolver::{IconLookup, IconResolver, ResolverSettings};
use iconlens_cli::service::IconService;
use iconlens_cli::test_utils::{
    MockFetcher, RecordingNotifier, demo_icon_set_json, init_test_logging,
};

const CDN: &str = "https://cdn.test/collections";

struct Fixture {
    _temp_dir: TempDir,
    service: IconService,
    fetcher: Arc<MockFetcher>,
    notifier: Arc<RecordingNotifier>,
}

async fn fixture(settings: ResolverSettings) -> Fixture {
    init_test_logging(None);

    let temp_dir = TempDir::new().unwrap();
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_body(&format!("{CDN}/demo.json"), &demo_icon_set_json())
            .with_delay(Duration::from_millis(20)),
    );
    let notifier = Arc::new(RecordingNotifier::default());

    let cache = IconSetCache::builder(temp_dir.path().join("collections"))
        .base_url(CDN)
        .fetcher(fetcher.clone())
        .notifier(notifier.clone())
        .build()
        .await
        .unwrap();

    Fixture {
        _temp_dir: temp_dir,
        service: IconService::new(IconResolver::new(cache, settings), "#eee"),
        fetcher,
        notifier,
    }
}

/// Waits for the background write that follows a download.
async fn wait_for_file(path: &Path) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !path.exists() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("collection was not persisted");
}

fn decode(url: &str) -> String {
    let payload = url.strip_prefix(SVG_DATA_URL_PREFIX).unwrap();
    String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
}

#[tokio::test]
async fn demo_icon_end_to_end() {
    let f = fixture(ResolverSettings::default()).await;

    let info = f.service.get_icon_info("demo:a", true).await.found().unwrap();
    assert_eq!(info.collection, "demo");
    assert_eq!(info.id, "a");
    assert_eq!((info.icon.width, info.icon.height, info.ratio), (20.0, 10.0, 2.0));

    let url = f.service.get_data_url("demo:a".into()).await;
    assert!(url.starts_with("data:image/svg+xml;base64,"));
    let svg = decode(&url);
    assert!(svg.contains("height=\"32px\""));
    assert!(svg.contains("width=\"64px\""));
    assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
    assert!(svg.contains("<path/>"));
}

#[tokio::test]
async fn concurrent_lookups_share_one_download() {
    let f = fixture(ResolverSettings::default()).await;

    let lookups = (0..16).map(|_| f.service.get_icon_info("demo:square-mirrored", true));
    let results = futures::future::join_all(lookups).await;

    assert!(results.iter().all(IconLookup::is_found));
    assert_eq!(f.fetcher.calls(), 1);
}

#[tokio::test]
async fn alias_chain_composes_transforms() {
    let f = fixture(ResolverSettings::default()).await;

    let info = f.service.get_icon_info("demo:square-mirrored", true).await.found().unwrap();
    assert_eq!(info.icon.rotate, 1);
    assert!(info.icon.h_flip);
    assert!(!info.icon.v_flip);
    assert_eq!(info.icon.width, 24.0);

    let svg = decode(&f.service.get_data_url_sized((&info).into(), 24).await);
    assert!(svg.contains("rotate(90 12 12) translate(24 0) scale(-1 1)"));
    assert!(svg.contains("fill=\"#eee\""));
}

#[tokio::test]
async fn unavailable_collection_notifies_once() {
    let f = fixture(ResolverSettings::default()).await;

    assert_eq!(f.service.get_icon_info("missing:x", true).await, IconLookup::Unavailable);
    assert_eq!(f.service.get_icon_info("missing:y", true).await, IconLookup::Unavailable);
    assert_eq!(&*f.service.get_data_url("missing:x".into()).await, "");

    assert_eq!(f.fetcher.calls(), 1);
    assert_eq!(f.notifier.messages().len(), 1);
}

#[tokio::test]
async fn clear_cache_refetches() {
    let f = fixture(ResolverSettings::default()).await;

    f.service.get_data_url("demo:a".into()).await;
    wait_for_file(&f.service.cache().collection_path("demo")).await;
    f.service.clear_cache().await.unwrap();
    assert!(f.service.data_urls().is_empty());

    assert!(f.service.get_icon_info("demo:a", true).await.is_found());
    assert_eq!(f.fetcher.calls(), 2);
    assert_eq!(f.fetcher.requested(), vec![format!("{CDN}/demo.json"); 2]);
}

#[tokio::test]
async fn custom_aliases_only_mode() {
    let f = fixture(ResolverSettings {
        aliases: BTreeMap::from([("logo".to_string(), "demo:square".to_string())]),
        custom_aliases_only: true,
    })
    .await;

    assert_eq!(f.service.get_icon_info("demo:a", true).await, IconLookup::NotFound);
    let info = f.service.get_icon_info("logo", true).await.found().unwrap();
    assert_eq!(info.key, "demo:square");
}

#[tokio::test]
async fn persisted_collection_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("collections");
    let fetcher = Arc::new(
        MockFetcher::new().with_body(&format!("{CDN}/demo.json"), &demo_icon_set_json()),
    );

    let first = IconSetCache::builder(dir.clone())
        .base_url(CDN)
        .fetcher(fetcher.clone())
        .build()
        .await
        .unwrap();
    first.load("demo").await.unwrap();

    wait_for_file(&first.collection_path("demo")).await;

    let second = IconSetCache::builder(dir)
        .base_url(CDN)
        .fetcher(fetcher.clone())
        .build()
        .await
        .unwrap();
    assert!(second.load("demo").await.is_some());
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn legacy_entries_migrate_at_startup() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    store.insert("icons-demo", demo_icon_set_json());
    let fetcher = Arc::new(MockFetcher::new());

    let cache = IconSetCache::builder(temp_dir.path().join("collections"))
        .base_url(CDN)
        .fetcher(fetcher.clone())
        .legacy_store(store.clone())
        .build()
        .await
        .unwrap();
    let service = IconService::new(IconResolver::new(cache, ResolverSettings::default()), "#eee");

    assert!(service.get_icon_info("demo:a", true).await.is_found());
    assert_eq!(fetcher.calls(), 0);
    assert!(service.cache().collection_path("demo").exists());
    assert_eq!(service.cache().migrate_legacy().await.unwrap(), 0);
}
