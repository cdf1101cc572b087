//! Icon lookup: from a user-facing key to concrete geometry.
//!
//! A lookup goes through four steps:
//!
//! 1. **Alias substitution**: the key may be replaced through the configured
//!    alias table (`"home" -> "mdi:home"`). In "custom aliases only" mode a key
//!    without a substitution is rejected here.
//! 2. **Key parsing** ([`key`]): `collection:name`, or `collection-name` for
//!    known prefixes.
//! 3. **Collection loading** through [`IconSetCache`]; a collection that could
//!    not be obtained makes the result [`IconLookup::Unavailable`].
//! 4. **Definition resolution** ([`definition`]): alias chains inside the
//!    collection are walked with a cycle guard and composed into one
//!    [`ResolvedIcon`](crate::models::ResolvedIcon).
//!
//! Not-found and unavailable are ordinary outcomes, not errors; the distinction
//! tells a caller whether retrying later (after a cache clear, or once the
//! network is back) can help.

pub mod definition;
pub mod key;

pub use definition::resolve_icon_definition;
pub use key::{IconKey, is_valid_collection_id, parse_icon_key};

use std::collections::BTreeMap;

use crate::cache::IconSetCache;
use crate::models::ResolvedIconInfo;

/// User-configured lookup behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Key substitutions applied before parsing
    pub aliases: BTreeMap<String, String>,

    /// Only keys present in `aliases` resolve
    pub custom_aliases_only: bool,
}

/// Outcome of [`IconResolver::get_icon_info`].
#[derive(Debug, Clone, PartialEq)]
pub enum IconLookup {
    /// The icon resolved
    Found(ResolvedIconInfo),
    /// The key is unusable, or the collection has no such icon
    NotFound,
    /// The collection could not be loaded
    Unavailable,
}

impl IconLookup {
    /// The resolved info, if any.
    pub fn found(self) -> Option<ResolvedIconInfo> {
        match self {
            Self::Found(info) => Some(info),
            Self::NotFound | Self::Unavailable => None,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Resolves icon keys against an [`IconSetCache`].
#[derive(Clone)]
pub struct IconResolver {
    cache: IconSetCache,
    settings: ResolverSettings,
}

impl IconResolver {
    pub fn new(cache: IconSetCache, settings: ResolverSettings) -> Self {
        Self {
            cache,
            settings,
        }
    }

    /// The underlying collection cache.
    pub fn cache(&self) -> &IconSetCache {
        &self.cache
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Looks up `key`, substituting configured aliases when `allow_aliases`.
    ///
    /// The returned info carries the key actually resolved, i.e. the
    /// substitution target when an alias applied.
    pub async fn get_icon_info(&self, key: &str, allow_aliases: bool) -> IconLookup {
        let effective = if allow_aliases {
            match self.settings.aliases.get(key) {
                Some(target) => {
                    tracing::debug!(target: "resolver", "Alias '{}' -> '{}'", key, target);
                    target.as_str()
                }
                None if self.settings.custom_aliases_only => {
                    tracing::debug!(target: "resolver", "'{}' has no custom alias", key);
                    return IconLookup::NotFound;
                }
                None => key,
            }
        } else {
            key
        };

        let Some(parsed) = parse_icon_key(effective, &self.cache.known_prefixes()) else {
            tracing::debug!(target: "resolver", "Unparseable icon key '{}'", effective);
            return IconLookup::NotFound;
        };

        let Some(set) = self.cache.load(&parsed.collection).await else {
            return IconLookup::Unavailable;
        };

        match resolve_icon_definition(&set, &parsed.icon) {
            Some(icon) => IconLookup::Found(ResolvedIconInfo::new(
                effective,
                parsed.collection,
                parsed.icon,
                icon,
            )),
            None => {
                tracing::debug!(target: "resolver", "No icon '{}' in '{}'", parsed.icon, parsed.collection);
                IconLookup::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AliasDefinition, IconDefinition, IconSet};
    use crate::test_utils::{MockFetcher, demo_icon_set, demo_icon_set_json};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn resolver(temp_dir: &TempDir, settings: ResolverSettings) -> (IconResolver, Arc<MockFetcher>) {
        let fetcher = Arc::new(
            MockFetcher::new()
                .with_body("https://cdn.test/demo.json", &demo_icon_set_json()),
        );
        let cache = IconSetCache::builder(temp_dir.path().to_path_buf())
            .base_url("https://cdn.test")
            .fetcher(fetcher.clone())
            .build()
            .await
            .unwrap();
        (IconResolver::new(cache, settings), fetcher)
    }

    #[tokio::test]
    async fn test_demo_icon_info() {
        let temp_dir = TempDir::new().unwrap();
        let (resolver, _) = resolver(&temp_dir, ResolverSettings::default()).await;

        let info = resolver.get_icon_info("demo:a", true).await.found().unwrap();
        assert_eq!(info.key, "demo:a");
        assert_eq!(info.collection, "demo");
        assert_eq!(info.id, "a");
        assert_eq!(info.icon.width, 20.0);
        assert_eq!(info.icon.height, 10.0);
        assert_eq!(info.ratio, 2.0);
    }

    #[tokio::test]
    async fn test_missing_icon_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let (resolver, _) = resolver(&temp_dir, ResolverSettings::default()).await;
        assert_eq!(resolver.get_icon_info("demo:nope", true).await, IconLookup::NotFound);
    }

    #[tokio::test]
    async fn test_unloadable_collection_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let (resolver, fetcher) = resolver(&temp_dir, ResolverSettings::default()).await;
        assert_eq!(resolver.get_icon_info("other:a", true).await, IconLookup::Unavailable);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_key_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let (resolver, fetcher) = resolver(&temp_dir, ResolverSettings::default()).await;
        assert_eq!(resolver.get_icon_info("no-separator", true).await, IconLookup::NotFound);
        assert_eq!(resolver.get_icon_info("Demo:a", true).await, IconLookup::NotFound);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_alias_substitution_reports_effective_key() {
        let temp_dir = TempDir::new().unwrap();
        let settings = ResolverSettings {
            aliases: BTreeMap::from([("wide".to_string(), "demo:a".to_string())]),
            custom_aliases_only: false,
        };
        let (resolver, _) = resolver(&temp_dir, settings).await;

        let info = resolver.get_icon_info("wide", true).await.found().unwrap();
        assert_eq!(info.key, "demo:a");

        // Substitution disabled: "wide" is not a key on its own
        assert_eq!(resolver.get_icon_info("wide", false).await, IconLookup::NotFound);
    }

    #[tokio::test]
    async fn test_custom_aliases_only() {
        let temp_dir = TempDir::new().unwrap();
        let settings = ResolverSettings {
            aliases: BTreeMap::from([("wide".to_string(), "demo:a".to_string())]),
            custom_aliases_only: true,
        };
        let (resolver, fetcher) = resolver(&temp_dir, settings).await;

        assert_eq!(resolver.get_icon_info("demo:a", true).await, IconLookup::NotFound);
        assert_eq!(fetcher.calls(), 0);
        assert!(resolver.get_icon_info("wide", true).await.is_found());
        // Without substitution the policy does not apply
        assert!(resolver.get_icon_info("demo:a", false).await.is_found());
    }

    #[tokio::test]
    async fn test_dashed_key_needs_loaded_collection() {
        let temp_dir = TempDir::new().unwrap();
        let (resolver, fetcher) = resolver(&temp_dir, ResolverSettings::default()).await;

        // "demo" is not known yet, so the dashed form does not parse
        assert_eq!(resolver.get_icon_info("demo-a", true).await, IconLookup::NotFound);
        assert_eq!(fetcher.calls(), 0);

        assert!(resolver.get_icon_info("demo:a", true).await.is_found());
        let info = resolver.get_icon_info("demo-a", true).await.found().unwrap();
        assert_eq!(info.collection, "demo");
        assert_eq!(info.id, "a");
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_dashed_key_for_custom_collection() {
        let temp_dir = TempDir::new().unwrap();
        let custom = IconSet::new("my-icons")
            .with_icon("star", IconDefinition::new("<path d=\"M0 0\"/>"))
            .with_alias("star-flipped", AliasDefinition {
                h_flip: Some(true),
                ..AliasDefinition::new("star")
            });
        let cache = IconSetCache::builder(temp_dir.path().to_path_buf())
            .fetcher(Arc::new(MockFetcher::new()))
            .custom_collections([custom, demo_icon_set()])
            .build()
            .await
            .unwrap();
        let resolver = IconResolver::new(cache, ResolverSettings::default());

        let info = resolver.get_icon_info("my-icons-star-flipped", true).await.found().unwrap();
        assert_eq!(info.collection, "my-icons");
        assert_eq!(info.id, "star-flipped");
        assert!(info.icon.h_flip);
        assert_eq!(info.icon.width, 16.0);
        assert_eq!(info.ratio, 1.0);
    }
}
