//! Configuration and on-disk locations for iconlens
//!
//! # Files
//!
//! | What | Default | Override |
//! |------|---------|----------|
//! | Config ([`GlobalConfig`]) | `~/.iconlens/config.toml` | `ICONLENS_CONFIG_PATH`, `--config` |
//! | Collection cache | `~/.iconlens/cache/collections/` | `ICONLENS_CACHE_DIR` |
//! | Legacy state | `~/.iconlens/state.json` | `ICONLENS_STATE_PATH` |
//!
//! The legacy state file is only read to migrate collections stored by older
//! releases; nothing writes new entries to it.
//!
//! # Configuration Priority
//!
//! 1. Command line (`--config`)
//! 2. Environment variables
//! 3. Defaults

mod global;

pub use global::GlobalConfig;

use anyhow::Result;
use std::path::PathBuf;

use crate::utils::platform::get_home_dir;

fn iconlens_home() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(".iconlens"))
}

/// Directory holding persisted collections.
///
/// `ICONLENS_CACHE_DIR` if set, else `~/.iconlens/cache/collections`. The
/// directory is not created here; the cache creates it on first write.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn get_cache_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ICONLENS_CACHE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(iconlens_home()?.join("cache").join("collections"))
}

/// Legacy key-value state file, `ICONLENS_STATE_PATH` or `~/.iconlens/state.json`.
pub fn get_state_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("ICONLENS_STATE_PATH") {
        return Ok(PathBuf::from(path));
    }
    Ok(iconlens_home()?.join("state.json"))
}
