//! Test utilities for iconlens
//!
//! Shared by unit tests and, through the `test-utils` feature, by the
//! integration test suite:
//!
//! - [`demo_icon_set`] / [`demo_icon_set_json`] - the `demo` collection
//! - [`MockFetcher`] - table-driven fetcher counting its calls
//! - [`RecordingNotifier`] - keeps user notifications for assertions
//! - [`init_test_logging`] - one-time tracing setup
//!
//! # Example
//!
//! ```rust,no_run
//! use iconlens_cli::cache::IconSetCache;
//! use iconlens_cli::test_utils::{MockFetcher, demo_icon_set_json};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let fetcher = Arc::new(
//!     MockFetcher::new().with_body("https://cdn.test/demo.json", &demo_icon_set_json()),
//! );
//! let cache = IconSetCache::builder(std::env::temp_dir().join("iconlens-test"))
//!     .base_url("https://cdn.test")
//!     .fetcher(fetcher.clone())
//!     .build()
//!     .await?;
//! assert!(cache.load("demo").await.is_some());
//! assert_eq!(fetcher.calls(), 1);
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::{MockFetcher, RecordingNotifier, demo_icon_set, demo_icon_set_json};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=cache=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
