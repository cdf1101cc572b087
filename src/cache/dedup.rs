//! Keyed deduplication of asynchronous work.
//!
//! [`TaskDeduplicator`] guarantees that at most one future runs per key. The
//! first caller for a key creates the future; every caller for the same key,
//! concurrent or later, awaits a clone of the same [`Shared`] future and
//! receives the same output.
//!
//! # Sticky Entries
//!
//! Entries are not removed when their future completes, whether it produced a
//! value or a failure outcome. A completed entry keeps answering with its
//! stored output until [`TaskDeduplicator::forget`] or
//! [`TaskDeduplicator::clear`] drops it. The icon-set cache relies on this:
//! a collection is fetched once per process and a cache clear is the point
//! where fresh work becomes possible again.
//!
//! ```text
//! caller A: run("mdi") ──> Vacant ──> insert Shared(fut) ──> await ─┐
//! caller B: run("mdi") ──> Occupied ──> clone Shared ──> await ─────┼──> same output
//! caller C (later): run("mdi") ──> Occupied (completed) ────────────┘
//! ```

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::Arc;

type SharedTask<T> = Shared<BoxFuture<'static, T>>;

/// Runs at most one future per key and shares its output.
pub struct TaskDeduplicator<T: Clone> {
    tasks: Arc<DashMap<String, SharedTask<T>>>,
}

impl<T: Clone> Clone for TaskDeduplicator<T> {
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<T: Clone> Default for TaskDeduplicator<T> {
    fn default() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
        }
    }
}

impl<T> TaskDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Awaits the task for `key`, creating it with `factory` if none exists.
    ///
    /// `factory` is called at most once per key between clears, and only by
    /// the caller that finds the key vacant.
    pub async fn run<F, Fut>(&self, key: &str, factory: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        // The shard guard must be released before awaiting.
        let task = match self.tasks.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                tracing::trace!(target: "cache::dedup", "Joining existing task for '{}'", key);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                tracing::trace!(target: "cache::dedup", "Starting task for '{}'", key);
                let task = factory().boxed().shared();
                entry.insert(task.clone());
                task
            }
        };

        task.await
    }

    /// Drops the entry for `key` so the next [`run`](Self::run) starts fresh.
    ///
    /// Callers already awaiting the old task still receive its output.
    pub fn forget(&self, key: &str) -> bool {
        self.tasks.remove(key).is_some()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.tasks.clear();
    }

    /// Whether an entry (pending or completed) exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.tasks.contains_key(key)
    }

    /// Number of tracked entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no entries are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
