//! The public entry point: resolve icons and hand out data URLs.
//!
//! [`IconService`] ties the collection cache, the resolver and the data-URL
//! cache together with the current display color. A host creates one service
//! and clones it freely; clones share every cache.
//!
//! ```rust,no_run
//! use iconlens_cli::config::GlobalConfig;
//! use iconlens_cli::service::IconService;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::load().await?;
//! let service = IconService::from_config(&config).await?;
//!
//! let url = service.get_data_url("mdi:home".into()).await;
//! if url.is_empty() {
//!     println!("no icon");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::{IconSetCache, IconSetCacheBuilder, JsonFileStore};
use crate::config::{GlobalConfig, get_cache_dir, get_state_path};
use crate::constants::DEFAULT_PIXEL_SIZE;
use crate::core::{Notifier, TerminalNotifier};
use crate::render::{DataUrlCache, IconSource};
use crate::resolver::{IconLookup, IconResolver};

/// Icon lookup and rendering with shared caches.
#[derive(Clone)]
pub struct IconService {
    resolver: IconResolver,
    data_urls: Arc<DataUrlCache>,
    color: Arc<RwLock<String>>,
}

impl IconService {
    pub fn new(resolver: IconResolver, color: impl Into<String>) -> Self {
        Self {
            resolver,
            data_urls: Arc::new(DataUrlCache::new()),
            color: Arc::new(RwLock::new(color.into())),
        }
    }

    /// Builds a service with the production collaborators: HTTP fetching
    /// from `cdn_url`, the default cache directory, the legacy state file and
    /// terminal notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom collection cannot be loaded, a default
    /// location cannot be determined, or the HTTP client cannot be created.
    pub async fn from_config(config: &GlobalConfig) -> Result<Self> {
        Self::from_config_with_notifier(config, Arc::new(TerminalNotifier)).await
    }

    /// Like [`from_config`](Self::from_config) with a caller-chosen notifier.
    pub async fn from_config_with_notifier(
        config: &GlobalConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let cache = Self::cache_builder(config, notifier).await?.build().await?;
        let resolver = IconResolver::new(cache, config.resolver_settings());
        Ok(Self::new(resolver, config.color.clone()))
    }

    /// The production [`IconSetCache`] configuration, before `build`.
    pub async fn cache_builder(
        config: &GlobalConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<IconSetCacheBuilder> {
        let custom = config.load_custom_collections().await?;

        Ok(IconSetCache::builder(get_cache_dir()?)
            .base_url(config.cdn_url.clone())
            .custom_collections(custom)
            .legacy_store(Arc::new(JsonFileStore::open(get_state_path()?).await))
            .notifier(notifier))
    }

    pub fn resolver(&self) -> &IconResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &IconSetCache {
        self.resolver.cache()
    }

    pub fn data_urls(&self) -> &DataUrlCache {
        &self.data_urls
    }

    /// See [`IconResolver::get_icon_info`].
    pub async fn get_icon_info(&self, key: &str, allow_aliases: bool) -> IconLookup {
        self.resolver.get_icon_info(key, allow_aliases).await
    }

    /// Data URL at the default size; empty when the icon does not resolve.
    pub async fn get_data_url(&self, source: IconSource<'_>) -> Arc<str> {
        self.get_data_url_sized(source, DEFAULT_PIXEL_SIZE).await
    }

    /// Data URL `pixel_size` pixels tall in the current color.
    pub async fn get_data_url_sized(&self, source: IconSource<'_>, pixel_size: u32) -> Arc<str> {
        let color = self.color();
        self.data_urls.get(source, pixel_size, &color, &self.resolver).await
    }

    /// Current display color.
    pub fn color(&self) -> String {
        self.color.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Changes the display color. Existing entries stay cached under their
    /// own color.
    pub fn set_color(&self, color: impl Into<String>) {
        *self.color.write().unwrap_or_else(PoisonError::into_inner) = color.into();
    }

    /// Clears the collection cache (memory, disk, legacy entries) and every
    /// data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be removed.
    pub async fn clear_cache(&self) -> Result<()> {
        self.data_urls.clear();
        self.resolver.cache().clear_all().await
    }

    /// Icon and alias names of collection `id`, sorted, or `None` when the
    /// collection is unavailable.
    pub async fn list_collection(&self, id: &str) -> Option<Vec<String>> {
        let set = self.resolver.cache().load(id).await?;
        let mut names: Vec<String> = set.icons.keys().chain(set.aliases.keys()).cloned().collect();
        names.sort();
        names.dedup();
        Some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverSettings;
    use crate::test_utils::{MockFetcher, demo_icon_set};
    use tempfile::TempDir;

    async fn service(temp_dir: &TempDir) -> IconService {
        let cache = IconSetCache::builder(temp_dir.path().to_path_buf())
            .fetcher(Arc::new(MockFetcher::new()))
            .custom_collections([demo_icon_set()])
            .build()
            .await
            .unwrap();
        IconService::new(IconResolver::new(cache, ResolverSettings::default()), "#eee")
    }

    #[tokio::test]
    async fn test_color_changes_data_url() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        let before = service.get_data_url("demo:square".into()).await;
        service.set_color("#000");
        assert_eq!(service.color(), "#000");
        let after = service.get_data_url("demo:square".into()).await;

        assert!(!before.is_empty());
        assert_eq!(service.data_urls().len(), 2);
        // Clones share the color
        assert_eq!(service.clone().color(), "#000");
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_clear_cache_empties_data_urls() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        service.get_data_url("demo:a".into()).await;
        service.clear_cache().await.unwrap();
        assert!(service.data_urls().is_empty());
        assert!(service.cache().loaded_ids().is_empty());
    }

    #[tokio::test]
    async fn test_list_collection() {
        let temp_dir = TempDir::new().unwrap();
        let service = service(&temp_dir).await;

        let names = service.list_collection("demo").await.unwrap();
        assert!(names.contains(&"a".to_string()));
        assert!(names.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(service.list_collection("absent").await.is_none());
    }
}
