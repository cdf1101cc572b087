//! Two-tier icon collection cache with deduplicated loading
//!
//! This module owns every icon-set the process has seen. Collections live in
//! an in-memory map for the lifetime of an [`IconSetCache`] and in one JSON
//! file per collection on disk, so a restart does not need the network.
//!
//! # Architecture Overview
//!
//! - [`IconSetCache`]: memory map, disk layout, custom collections, network
//! - [`TaskDeduplicator`]: one load per collection id, shared by all callers
//! - [`KeyValueStore`]: the legacy state store migrated at construction
//! - [`IconSetFetcher`]: the network seam, [`HttpFetcher`] in production
//!
//! # Cache Directory Structure
//!
//! ```text
//! ~/.iconlens/cache/collections/
//! ├── mdi.json           # Body exactly as downloaded from {cdn_url}/mdi.json
//! ├── carbon.json
//! └── fluent-emoji.json
//! ```
//!
//! # Load Order
//!
//! [`IconSetCache::load`] resolves a collection id by trying, in order:
//!
//! 1. the in-memory map
//! 2. custom collections registered through the builder (exact prefix match)
//! 3. `{cache_dir}/{id}.json`; a file that fails to parse counts as a miss
//! 4. `{base_url}/{id}.json`; the body is kept in memory and written to disk
//!    in the background
//!
//! A failed download is logged, reported through the [`Notifier`], and yields
//! `None`. Because load tasks are deduplicated and sticky, that `None` is also
//! what later callers get until [`IconSetCache::clear_all`] runs.
//!
//! # Ordering
//!
//! [`IconSetCache::clear_all`] does not cancel loads already in flight. A load
//! that finishes after the clear still inserts its collection into memory, and
//! the next [`IconSetCache::load`] of that id returns it without going back to
//! disk or network. Likewise a background write started before the clear can
//! recreate its file afterwards.
//!
//! # Legacy Migration
//!
//! Earlier releases stored whole collections in a flat key-value state under
//! `icons-{id}`. [`IconSetCacheBuilder::build`] moves those entries into the
//! per-collection layout once; [`IconSetCache::migrate_legacy`] can be called
//! again and is a no-op when nothing is left.
//!
//! # Examples
//!
//! ```rust,no_run
//! use iconlens_cli::cache::IconSetCache;
//! use std::path::PathBuf;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cache = IconSetCache::builder(PathBuf::from("/tmp/iconlens-cache"))
//!     .base_url("https://icones.js.org/collections")
//!     .build()
//!     .await?;
//!
//! if let Some(set) = cache.load("mdi").await {
//!     println!("mdi has {} icons", set.icons.len());
//! }
//!
//! cache.clear_all().await?;
//! # Ok(())
//! # }
//! ```

pub mod dedup;
pub mod fetch;
pub mod legacy;

pub use dedup::TaskDeduplicator;
pub use fetch::{HttpFetcher, IconSetFetcher, collection_url};
pub use legacy::{JsonFileStore, KeyValueStore, MemoryStore};

use anyhow::{Context, Result};
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::{COLLECTION_FILE_EXTENSION, DEFAULT_CDN_URL, LEGACY_KEY_PREFIX};
use crate::core::{FileOperation, FileResultExt, IconlensError, Notifier, SilentNotifier};
use crate::models::IconSet;
use crate::resolver::key::is_valid_collection_id;
use crate::utils::fs::{atomic_write_async, dir_size, remove_dir_all};

/// Loaded collection shared between the cache and its callers.
pub type SharedIconSet = Arc<IconSet>;

/// Icon collection cache backed by memory, disk and the network.
///
/// Cloning is cheap and clones share all state, the same way tasks spawned
/// from one command share a single cache.
#[derive(Clone)]
pub struct IconSetCache {
    /// Directory holding one `{id}.json` per collection
    dir: PathBuf,

    /// CDN base URL; collections are fetched from `{base_url}/{id}.json`
    base_url: String,

    fetcher: Arc<dyn IconSetFetcher>,

    /// Caller-supplied collections, searched before disk and network
    custom: Arc<Vec<SharedIconSet>>,

    legacy: Arc<dyn KeyValueStore>,

    notifier: Arc<dyn Notifier>,

    /// Collections loaded during this process, keyed by prefix
    loaded: Arc<DashMap<String, SharedIconSet>>,

    /// One load task per collection id. Entries outlive their task and act as
    /// a memo until [`IconSetCache::clear_all`].
    tasks: TaskDeduplicator<Option<SharedIconSet>>,
}

/// Builder for [`IconSetCache`].
pub struct IconSetCacheBuilder {
    dir: PathBuf,
    base_url: String,
    fetcher: Option<Arc<dyn IconSetFetcher>>,
    custom: Vec<SharedIconSet>,
    legacy: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    migrate_on_build: bool,
}

impl IconSetCacheBuilder {
    /// Sets the CDN base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the default [`HttpFetcher`].
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn IconSetFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Registers custom collections; the first with a matching prefix wins.
    #[must_use]
    pub fn custom_collections<I>(mut self, sets: I) -> Self
    where
        I: IntoIterator<Item = IconSet>,
    {
        self.custom.extend(sets.into_iter().map(Arc::new));
        self
    }

    /// Sets the legacy state store to migrate from.
    #[must_use]
    pub fn legacy_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.legacy = Some(store);
        self
    }

    /// Sets where user-visible errors go (silent by default).
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Whether [`build`](Self::build) migrates legacy entries (default true).
    #[must_use]
    pub fn migrate_on_build(mut self, migrate: bool) -> Self {
        self.migrate_on_build = migrate;
        self
    }

    /// Builds the cache and migrates legacy entries.
    ///
    /// Migration failures are logged; they do not prevent construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP client cannot be created.
    pub async fn build(self) -> Result<IconSetCache> {
        let fetcher: Arc<dyn IconSetFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new()?),
        };

        let cache = IconSetCache {
            dir: self.dir,
            base_url: self.base_url,
            fetcher,
            custom: Arc::new(self.custom),
            legacy: self.legacy.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(SilentNotifier)),
            loaded: Arc::new(DashMap::new()),
            tasks: TaskDeduplicator::new(),
        };

        if self.migrate_on_build {
            if let Err(err) = cache.migrate_legacy().await {
                tracing::warn!(target: "cache", "Legacy cache migration failed: {:#}", err);
            }
        }

        Ok(cache)
    }
}

impl IconSetCache {
    /// Starts building a cache rooted at `dir`.
    pub fn builder(dir: PathBuf) -> IconSetCacheBuilder {
        IconSetCacheBuilder {
            dir,
            base_url: DEFAULT_CDN_URL.to_string(),
            fetcher: None,
            custom: Vec::new(),
            legacy: None,
            notifier: None,
            migrate_on_build: true,
        }
    }

    /// Returns the collection `id`, loading it on first use.
    ///
    /// Concurrent and later calls for the same id share one load. `None` means
    /// the collection is unavailable: the id is not a valid prefix, or no
    /// source had it.
    pub async fn load(&self, id: &str) -> Option<SharedIconSet> {
        if !is_valid_collection_id(id) {
            tracing::debug!(target: "cache", "Ignoring invalid collection id '{}'", id);
            return None;
        }

        let this = self.clone();
        let owned_id = id.to_string();
        self.tasks.run(id, move || async move { this.load_uncached(&owned_id).await }).await
    }

    async fn load_uncached(&self, id: &str) -> Option<SharedIconSet> {
        if let Some(set) = self.loaded.get(id).map(|entry| Arc::clone(entry.value())) {
            return Some(set);
        }

        if let Some(set) = self.custom.iter().find(|set| set.prefix == id) {
            tracing::debug!(target: "cache", "Using custom collection '{}'", id);
            return Some(Arc::clone(set));
        }

        if let Some(set) = self.read_persisted(id).await {
            tracing::debug!(target: "cache", "Loaded collection '{}' from disk cache", id);
            let set = Arc::new(set);
            self.loaded.insert(id.to_string(), Arc::clone(&set));
            return Some(set);
        }

        self.fetch_remote(id).await
    }

    async fn read_persisted(&self, id: &str) -> Option<IconSet> {
        let path = self.collection_path(id);

        let read = tokio::fs::read_to_string(&path).await.with_file_context(
            FileOperation::Read,
            &path,
            "loading cached collection",
            "cache::read_persisted",
        );
        let data = match read {
            Ok(data) => data,
            Err(err) if err.source.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(target: "cache", "{}", err.user_message());
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(set) => Some(set),
            Err(err) => {
                tracing::warn!(
                    target: "cache",
                    "Ignoring corrupt cached collection {}: {}",
                    path.display(),
                    err
                );
                None
            }
        }
    }

    async fn fetch_remote(&self, id: &str) -> Option<SharedIconSet> {
        let url = collection_url(&self.base_url, id);
        tracing::info!(target: "cache", "Downloading icon collection '{}' from {}", id, url);

        let fetched = self.fetcher.fetch(&url).await.and_then(|body| {
            let set: IconSet = serde_json::from_str(&body)
                .with_context(|| format!("Invalid icon collection JSON at {url}"))?;
            Ok((body, set))
        });

        match fetched {
            Ok((body, set)) => {
                let set = Arc::new(set);
                self.loaded.insert(id.to_string(), Arc::clone(&set));
                self.persist_in_background(id, body);
                Some(set)
            }
            Err(err) => {
                tracing::error!(
                    target: "cache",
                    "Failed to download icon collection '{}': {:#}",
                    id,
                    err
                );
                self.notifier.error(&format!("Failed to load icon collection '{id}': {err:#}"));
                None
            }
        }
    }

    fn persist_in_background(&self, id: &str, body: String) {
        let path = self.collection_path(id);
        tokio::spawn(async move {
            match atomic_write_async(path.clone(), body.into_bytes()).await {
                Ok(()) => {
                    tracing::debug!(target: "cache", "Persisted {}", path.display());
                }
                Err(err) => {
                    tracing::warn!(
                        target: "cache",
                        "Failed to persist {}: {:#}",
                        path.display(),
                        err
                    );
                }
            }
        });
    }

    /// Moves `icons-{id}` entries of the legacy store into the disk layout.
    ///
    /// Each entry is adopted into memory, written to `{id}.json`, and removed
    /// from the store. An entry whose file could not be written stays in the
    /// store for the next attempt; entries that do not parse, or whose id is
    /// not a valid prefix, are dropped. Returns the number of migrated
    /// collections, 0 when nothing was left to migrate.
    ///
    /// # Errors
    ///
    /// Returns an error if the legacy store cannot be updated.
    pub async fn migrate_legacy(&self) -> Result<usize> {
        let keys: Vec<String> = self
            .legacy
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(LEGACY_KEY_PREFIX))
            .collect();

        if keys.is_empty() {
            return Ok(0);
        }

        let mut migrated = 0;
        for key in keys {
            let id = &key[LEGACY_KEY_PREFIX.len()..];
            let Some(value) = self.legacy.get(&key) else {
                continue;
            };

            if !is_valid_collection_id(id) {
                tracing::warn!(target: "cache", "Dropping legacy entry with invalid id '{}'", key);
                self.legacy.remove(&key).await?;
                continue;
            }

            let set: IconSet = match serde_json::from_str(&value) {
                Ok(set) => set,
                Err(err) => {
                    tracing::warn!(target: "cache", "Dropping unreadable legacy entry '{}': {}", key, err);
                    self.legacy.remove(&key).await?;
                    continue;
                }
            };
            self.loaded.insert(id.to_string(), Arc::new(set));

            let path = self.collection_path(id);
            if let Err(err) = atomic_write_async(path.clone(), value.into_bytes()).await {
                tracing::warn!(
                    target: "cache",
                    "Failed to migrate '{}' to {}: {:#}",
                    key,
                    path.display(),
                    err
                );
                continue;
            }

            self.legacy.remove(&key).await?;
            migrated += 1;
        }

        tracing::info!(target: "cache", "Migrated {} legacy icon collection(s)", migrated);
        Ok(migrated)
    }

    /// Forgets everything: load tasks, memory, disk files and legacy entries.
    ///
    /// The next [`load`](Self::load) of any collection goes back to disk or
    /// network. A missing cache directory is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory or a legacy entry cannot be removed.
    pub async fn clear_all(&self) -> Result<()> {
        self.tasks.clear();
        self.loaded.clear();

        remove_dir_all(&self.dir).await.map_err(|err| IconlensError::CacheError {
            operation: format!("clearing {}", self.dir.display()),
            reason: format!("{err:#}"),
        })?;

        for key in self.legacy.keys() {
            if key.starts_with(LEGACY_KEY_PREFIX) {
                self.legacy.remove(&key).await?;
            }
        }

        tracing::info!(target: "cache", "Cleared icon collection cache at {}", self.dir.display());
        Ok(())
    }

    /// Path of the persisted file for collection `id`.
    #[must_use]
    pub fn collection_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{COLLECTION_FILE_EXTENSION}"))
    }

    /// Directory holding persisted collections.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.dir
    }

    /// CDN base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prefixes of collections currently in memory, sorted.
    #[must_use]
    pub fn loaded_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.loaded.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Prefixes usable for `collection-name` keys: custom collections first,
    /// then loaded ones.
    #[must_use]
    pub fn known_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = self.custom.iter().map(|set| set.prefix.clone()).collect();
        for id in self.loaded_ids() {
            if !prefixes.contains(&id) {
                prefixes.push(id);
            }
        }
        prefixes
    }

    /// Prefixes with a persisted file in the cache directory, sorted.
    pub async fn cached_collections(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => Err(err).with_file_context(
                FileOperation::ReadDir,
                &self.dir,
                "listing cached collections",
                "cache::cached_collections",
            )?,
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(COLLECTION_FILE_EXTENSION) {
                continue;
            }
            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) if is_valid_collection_id(stem) => ids.push(stem.to_string()),
                _ => {}
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Total size in bytes of persisted collections.
    pub async fn cache_size(&self) -> Result<u64> {
        dir_size(&self.dir).await
    }
}
