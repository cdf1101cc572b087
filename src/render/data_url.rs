//! Base64 data URLs for SVG markup.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::constants::SVG_DATA_URL_PREFIX;

/// Wraps SVG markup as `data:image/svg+xml;base64,...`.
#[must_use]
pub fn to_data_url(markup: &str) -> String {
    let encoded = STANDARD.encode(markup.as_bytes());
    format!("{SVG_DATA_URL_PREFIX}{encoded}")
}
