//! Memoized data URLs.
//!
//! Rendering an icon is cheap, but the same icons are requested over and over
//! while a view is displayed. [`DataUrlCache`] keeps one encoded data URL per
//! `(color, pixel size, key)` for the lifetime of the owning service.

use dashmap::DashMap;
use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::constants::CURRENT_COLOR_TOKEN;
use crate::models::ResolvedIconInfo;
use crate::render::{path_to_svg, to_data_url};
use crate::resolver::IconResolver;

/// What to render: a key still to be resolved, or an already resolved icon.
#[derive(Debug, Clone, Copy)]
pub enum IconSource<'a> {
    Key(&'a str),
    Info(&'a ResolvedIconInfo),
}

impl IconSource<'_> {
    /// The key the cache entry is filed under.
    pub fn key(&self) -> &str {
        match self {
            Self::Key(key) => key,
            Self::Info(info) => &info.key,
        }
    }
}

impl<'a> From<&'a str> for IconSource<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a ResolvedIconInfo> for IconSource<'a> {
    fn from(info: &'a ResolvedIconInfo) -> Self {
        Self::Info(info)
    }
}

/// Cache key for a rendered data URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct DataUrlKey {
    color: String,
    pixel_size: u32,
    key: String,
}

/// Data URLs by color, pixel size and icon key.
#[derive(Debug, Default)]
pub struct DataUrlCache {
    entries: DashMap<DataUrlKey, Arc<str>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl DataUrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the data URL for `source`, rendering it on a miss.
    ///
    /// A hit returns the stored allocation. An icon that does not resolve
    /// yields an empty string, which is not stored.
    pub async fn get(
        &self,
        source: IconSource<'_>,
        pixel_size: u32,
        color: &str,
        resolver: &IconResolver,
    ) -> Arc<str> {
        let cache_key = DataUrlKey {
            color: color.to_string(),
            pixel_size,
            key: source.key().to_string(),
        };

        if let Some(url) = self.entries.get(&cache_key).map(|entry| Arc::clone(entry.value())) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return url;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let info: Cow<'_, ResolvedIconInfo> = match source {
            IconSource::Info(info) => Cow::Borrowed(info),
            IconSource::Key(key) => match resolver.get_icon_info(key, true).await.found() {
                Some(info) => Cow::Owned(info),
                None => {
                    tracing::debug!(target: "render", "Nothing to render for '{}'", key);
                    return Arc::from("");
                }
            },
        };

        let svg = path_to_svg(&info, pixel_size).replace(CURRENT_COLOR_TOKEN, color);
        let url: Arc<str> = Arc::from(to_data_url(&svg));
        tracing::trace!(target: "render", "Rendered '{}' at {}px in {}", cache_key.key, pixel_size, color);

        self.entries.insert(cache_key, Arc::clone(&url));
        url
    }

    /// Drops every entry and resets the statistics.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation or the last clear.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.stats();
        let total = hits + misses;
        if total == 0 { 0.0 } else { (hits as f64 / total as f64) * 100.0 }
    }
}
