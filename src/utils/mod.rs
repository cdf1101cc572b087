//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Atomic writes and directory helpers for the collection cache
//! - [`platform`] - Home directory lookup and user path expansion

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir};
pub use platform::{get_home_dir, is_windows, resolve_path};
