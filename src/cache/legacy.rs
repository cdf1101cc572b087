//! Legacy key-value state holding whole icon-sets.
//!
//! Older releases kept every downloaded collection as one entry of a flat
//! key-value state, keyed `icons-{prefix}`. The cache now stores one file per
//! collection; [`crate::cache::IconSetCache`] migrates the old entries once and
//! removes them. This module defines the store seam and its two
//! implementations.

use anyhow::{Context, Result};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::utils::fs::atomic_write_async;

/// A flat string-to-string state store.
pub trait KeyValueStore: Send + Sync {
    /// All keys currently stored.
    fn keys(&self) -> Vec<String>;

    /// The value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Removes `key`; removing a missing key is not an error.
    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;
}

/// In-memory store, used by tests and when no state file is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entry.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        self.lock().remove(key);
        futures::future::ready(Ok(())).boxed()
    }
}

/// Store backed by a JSON object file, e.g. `~/.iconlens/state.json`.
///
/// Non-string values in the file are kept on disk but not exposed; a missing
/// or unreadable file behaves like an empty store. Rewrites of the file are
/// serialized so the last removal always wins on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<serde_json::Map<String, serde_json::Value>>,
    writes: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read(&path).await;
        Self {
            path,
            entries: Mutex::new(entries),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(path: &Path) -> serde_json::Map<String, serde_json::Value> {
        match tokio::fs::read(path).await {
            Ok(data) => serde_json::from_slice(&data).unwrap_or_else(|err| {
                tracing::warn!(
                    target: "cache::legacy",
                    "Ignoring unreadable state file {}: {}",
                    path.display(),
                    err
                );
                serde_json::Map::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => serde_json::Map::new(),
            Err(err) => {
                tracing::warn!(
                    target: "cache::legacy",
                    "Failed to read state file {}: {}",
                    path.display(),
                    err
                );
                serde_json::Map::new()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, serde_json::Map<String, serde_json::Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for JsonFileStore {
    fn keys(&self) -> Vec<String> {
        self.lock().iter().filter(|(_, value)| value.is_string()).map(|(k, _)| k.clone()).collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).and_then(|value| value.as_str().map(str::to_string))
    }

    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        async move {
            let _write = self.writes.lock().await;

            // The entries guard is released before the write is awaited
            let data = {
                let mut entries = self.lock();
                if entries.remove(key).is_none() {
                    return Ok(());
                }
                serde_json::to_vec_pretty(&*entries)?
            };

            atomic_write_async(self.path.clone(), data)
                .await
                .with_context(|| format!("Failed to update state file {}", self.path.display()))
        }
        .boxed()
    }
}
