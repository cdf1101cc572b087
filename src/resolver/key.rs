//! Parsing of qualified icon keys.
//!
//! Two forms are accepted:
//!
//! - `collection:name` (always), e.g. `mdi:home`
//! - `collection-name` when `collection` is a known prefix, e.g. `mdi-home`;
//!   the longest known prefix wins, so `mdi-light-home` with both `mdi` and
//!   `mdi-light` known parses as `mdi-light` / `home`
//!
//! Known prefixes are the custom collections plus those already loaded, so
//! `mdi-home` only parses once `mdi` has been loaded through some other key
//! (or is a custom collection). Until then it resolves to nothing.
//!
//! Collection ids must look like CDN prefixes (lowercase ASCII letters and
//! digits in `-`-separated segments); they are used as file names in the
//! disk cache.

use std::fmt;

/// A parsed `collection:name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconKey {
    pub collection: String,
    pub icon: String,
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.icon)
    }
}

/// Parses `key` using `known_prefixes` for the dashed form.
pub fn parse_icon_key<S: AsRef<str>>(key: &str, known_prefixes: &[S]) -> Option<IconKey> {
    let key = key.trim();

    if let Some((collection, icon)) = key.split_once(':') {
        return build(collection, icon);
    }

    known_prefixes
        .iter()
        .map(AsRef::as_ref)
        .filter(|prefix| {
            key.len() > prefix.len() + 1
                && key.starts_with(prefix)
                && key.as_bytes()[prefix.len()] == b'-'
        })
        .max_by_key(|prefix| prefix.len())
        .and_then(|prefix| build(prefix, &key[prefix.len() + 1..]))
}

fn build(collection: &str, icon: &str) -> Option<IconKey> {
    if !is_valid_collection_id(collection) || !is_valid_icon_name(icon) {
        return None;
    }
    Some(IconKey {
        collection: collection.to_string(),
        icon: icon.to_string(),
    })
}

/// Whether `id` is usable as a collection prefix and cache file stem.
#[must_use]
pub fn is_valid_collection_id(id: &str) -> bool {
    !id.is_empty()
        && id.split('-').all(|segment| {
            !segment.is_empty()
                && segment.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

fn is_valid_icon_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_whitespace() || c == ':')
}
