//! Sample icon-sets and test doubles for the cache's collaborators.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::cache::IconSetFetcher;
use crate::core::{IconlensError, Notifier};
use crate::models::{AliasDefinition, IconDefinition, IconSet};

/// The `demo` collection.
///
/// - `a`: 20x10 icon with body `<path/>`
/// - `square`: collection-default 24x24 icon using `currentColor`
/// - `square-turned`: alias of `square`, one quarter turn
/// - `square-mirrored`: alias of `square-turned`, flipped horizontally
pub fn demo_icon_set() -> IconSet {
    IconSet::new("demo")
        .with_size(24.0, 24.0)
        .with_icon("a", IconDefinition {
            width: Some(20.0),
            height: Some(10.0),
            ..IconDefinition::new("<path/>")
        })
        .with_icon(
            "square",
            IconDefinition::new("<path fill=\"currentColor\" d=\"M4 4h16v16H4z\"/>"),
        )
        .with_alias("square-turned", AliasDefinition {
            rotate: Some(1),
            ..AliasDefinition::new("square")
        })
        .with_alias("square-mirrored", AliasDefinition {
            h_flip: Some(true),
            ..AliasDefinition::new("square-turned")
        })
}

/// [`demo_icon_set`] as the JSON document a CDN would serve.
pub fn demo_icon_set_json() -> String {
    serde_json::to_string(&demo_icon_set()).unwrap_or_else(|err| {
        panic!("demo icon set must serialize: {err}");
    })
}

/// Fetcher answering from a fixed URL-to-body table.
///
/// Unknown URLs fail like an HTTP 404. Every call is counted, including
/// failing ones.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    #[must_use]
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }

    /// Delays every response, to widen the window for concurrent callers.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requested URLs in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl IconSetFetcher for MockFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap_or_else(PoisonError::into_inner).push(url.to_string());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.responses.get(url).cloned().ok_or_else(|| {
                IconlensError::NetworkError {
                    url: url.to_string(),
                    reason: "HTTP 404 Not Found".to_string(),
                }
                .into()
            })
        }
        .boxed()
    }
}

/// Notifier keeping every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).push(message.to_string());
    }
}
