//! Common test utilities for iconlens integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use iconlens_cli::test_utils::demo_icon_set_json;

/// Isolated home for CLI runs: config file, cache directory and legacy state
/// inside one temporary directory.
pub struct TestHome {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
}

impl TestHome {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache").join("collections")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Writes the demo collection as a custom collection file and a config
    /// pointing at it and at `cdn_url`.
    pub fn write_config(&self, cdn_url: &str, extra: &str) -> Result<()> {
        let collection = self.root.join("demo.json");
        fs::write(&collection, demo_icon_set_json())?;

        let config = format!(
            "cdn_url = {cdn_url:?}\ncustom_collections = [{:?}]\n{extra}\n",
            collection.to_string_lossy()
        );
        fs::write(self.config_path(), config)?;
        Ok(())
    }

    /// `iconlens` with every location pointed into this home.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("iconlens").unwrap();
        cmd.env("ICONLENS_CONFIG_PATH", self.config_path())
            .env("ICONLENS_CACHE_DIR", self.cache_dir())
            .env("ICONLENS_STATE_PATH", self.state_path())
            .env("HOME", &self.root)
            .env_remove("RUST_LOG");
        cmd
    }
}
