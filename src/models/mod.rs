//! Shared data models for icon collections
//!
//! These types mirror the JSON documents served by the icon CDN: one
//! [`IconSet`] per collection, holding [`IconDefinition`]s and
//! [`AliasDefinition`]s. Resolution turns them into a [`ResolvedIcon`], and
//! the resolver wraps that in a [`ResolvedIconInfo`] for callers.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "prefix": "demo",
//!   "width": 24,
//!   "height": 24,
//!   "icons": {
//!     "arrow-left": { "body": "<path d=\"M20 11H7.83l5.59-5.59L12 4l-8 8 8 8 1.41-1.41L7.83 13H20v-2z\"/>" }
//!   },
//!   "aliases": {
//!     "arrow-right": { "parent": "arrow-left", "hFlip": true }
//!   }
//! }
//! ```
//!
//! Fields this crate does not interpret (`info`, `lastModified`, ...) are kept
//! in [`IconSet::extra`] so a set survives a serialize round trip unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A collection of icons sharing a prefix and default geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSet {
    /// Collection id, e.g. `mdi`
    pub prefix: String,

    /// Concrete icons by local name
    #[serde(default)]
    pub icons: BTreeMap<String, IconDefinition>,

    /// Aliases by local name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, AliasDefinition>,

    /// Default icon width for this collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Default icon height for this collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Default view box left offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,

    /// Default view box top offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,

    /// Uninterpreted fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl IconSet {
    /// Creates an empty set with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            icons: BTreeMap::new(),
            aliases: BTreeMap::new(),
            width: None,
            height: None,
            left: None,
            top: None,
            extra: BTreeMap::new(),
        }
    }

    /// Adds an icon, replacing any icon with the same name.
    #[must_use]
    pub fn with_icon(mut self, name: impl Into<String>, icon: IconDefinition) -> Self {
        self.icons.insert(name.into(), icon);
        self
    }

    /// Adds an alias, replacing any alias with the same name.
    #[must_use]
    pub fn with_alias(mut self, name: impl Into<String>, alias: AliasDefinition) -> Self {
        self.aliases.insert(name.into(), alias);
        self
    }

    /// Sets the collection-wide default size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// A concrete icon: path markup plus optional geometry and transforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDefinition {
    /// SVG markup placed inside the `<svg>` element
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Quarter turns clockwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_flip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_flip: Option<bool>,
}

impl IconDefinition {
    /// Icon with only a body; geometry comes from the collection defaults.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}

/// An icon defined as a transform of another icon or alias.
///
/// Geometry fields replace the parent's values; `rotate` adds to the parent's
/// rotation and the flip flags toggle the parent's flips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasDefinition {
    /// Name of the icon or alias this one is derived from
    pub parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_flip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_flip: Option<bool>,
}

impl AliasDefinition {
    /// Plain alias with no transform.
    pub fn new(parent: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            ..Self::default()
        }
    }
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Fully normalized icon geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIcon {
    pub body: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Quarter turns clockwise, always in `0..4`
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotate: u8,
    #[serde(default, skip_serializing_if = "is_false")]
    pub h_flip: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub v_flip: bool,
}

/// A resolved icon together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIconInfo {
    /// Key used for the lookup (after alias substitution)
    pub key: String,
    /// Collection prefix
    pub collection: String,
    /// Local icon name within the collection
    pub id: String,
    /// `width / height`, or 1 when that is not a positive finite number
    pub ratio: f64,
    #[serde(flatten)]
    pub icon: ResolvedIcon,
}

impl ResolvedIconInfo {
    /// Builds the info for `icon`, computing the aspect ratio.
    pub fn new(
        key: impl Into<String>,
        collection: impl Into<String>,
        id: impl Into<String>,
        icon: ResolvedIcon,
    ) -> Self {
        let ratio = aspect_ratio(icon.width, icon.height);
        Self {
            key: key.into(),
            collection: collection.into(),
            id: id.into(),
            ratio,
            icon,
        }
    }
}

/// `width / height`, falling back to 1 for zero, negative or non-finite results.
#[must_use]
pub fn aspect_ratio(width: f64, height: f64) -> f64 {
    let ratio = width / height;
    if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 }
}
