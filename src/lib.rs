//! iconlens - icon resolution, caching and rendering
//!
//! Turns icon keys such as `mdi:home` into embeddable images. Icon collections
//! in the Iconify JSON format are downloaded from a CDN once, kept on disk and
//! in memory, and rendered as SVG documents or base64 data URLs.
//!
//! # Architecture Overview
//!
//! ```text
//! key ──> IconResolver ──> IconSetCache ──> memory / custom / disk / network
//!              │                 (one deduplicated load per collection)
//!              │ alias chain walk
//!              v
//!      ResolvedIconInfo ──> path_to_svg ──> to_data_url ──> DataUrlCache
//! ```
//!
//! # Core Modules
//!
//! - [`cache`] - Two-tier collection cache, request deduplication, legacy migration
//! - [`resolver`] - Key parsing, alias substitution, alias chain resolution
//! - [`render`] - SVG assembly, data URLs, memoized data URLs
//! - [`service`] - [`service::IconService`], the entry point for hosts
//!
//! ## Supporting Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - `~/.iconlens/config.toml` and default locations
//! - [`constants`] - Defaults shared across modules
//! - [`core`] - Errors and user notifications
//! - [`models`] - Icon-set JSON model and resolved icon types
//! - [`utils`] - File system and platform helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use iconlens_cli::config::GlobalConfig;
//! use iconlens_cli::resolver::IconLookup;
//! use iconlens_cli::service::IconService;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = IconService::from_config(&GlobalConfig::load().await?).await?;
//!
//! match service.get_icon_info("mdi:home", true).await {
//!     IconLookup::Found(info) => println!("{} is {}x{}", info.key, info.icon.width, info.icon.height),
//!     IconLookup::NotFound => println!("no such icon"),
//!     IconLookup::Unavailable => println!("collection could not be loaded"),
//! }
//!
//! let url = service.get_data_url("mdi:home".into()).await;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

// Core functionality
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod render;
pub mod resolver;
pub mod service;

// Supporting modules
pub mod models;
pub mod utils;

// Test utilities (available in tests and with the test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
