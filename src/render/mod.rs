//! Rendering resolved icons to embeddable images.
//!
//! - [`svg`] - SVG document assembly with flip and rotation transforms
//! - [`data_url`] - base64 `data:image/svg+xml` wrapping
//! - [`cache`] - memoized data URLs keyed by color, size and icon key

pub mod cache;
pub mod data_url;
pub mod svg;

pub use cache::{DataUrlCache, IconSource};
pub use data_url::to_data_url;
pub use svg::path_to_svg;
