//! Global constants used throughout the iconlens codebase.
//!
//! This module contains timeout durations, default geometry, and the fixed
//! strings of the on-disk and wire formats. Defining them centrally keeps
//! the cache layout and the renderer output in one discoverable place.

use std::time::Duration;

/// Default CDN serving one `{prefix}.json` file per icon collection.
pub const DEFAULT_CDN_URL: &str = "https://icones.js.org/collections";

/// Default display color substituted for [`CURRENT_COLOR_TOKEN`].
pub const DEFAULT_COLOR: &str = "#eee";

/// Placeholder used by icon bodies for "current text color".
pub const CURRENT_COLOR_TOKEN: &str = "currentColor";

/// Key prefix of icon-sets stored in the legacy key-value state.
pub const LEGACY_KEY_PREFIX: &str = "icons-";

/// Scheme prepended to base64-encoded SVG markup.
pub const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Width and height used when neither the icon nor its collection sets one.
pub const DEFAULT_ICON_SIZE: f64 = 16.0;

/// Pixel height used by [`crate::service::IconService::get_data_url`].
pub const DEFAULT_PIXEL_SIZE: u32 = 32;

/// Timeout for a single collection download (30 seconds).
///
/// Collections on the default CDN are a few megabytes at most; a request
/// still pending after this long is treated as a failed fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Extension of every persisted collection file.
pub const COLLECTION_FILE_EXTENSION: &str = "json";
