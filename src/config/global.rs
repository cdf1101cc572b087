//! User configuration stored in `~/.iconlens/config.toml`.
//!
//! # Format
//!
//! ```toml
//! cdn_url = "https://icones.js.org/collections"
//! color = "#eee"
//! custom_aliases_only = false
//! custom_collections = ["~/icons/brand.json"]
//!
//! [aliases]
//! home = "mdi:home"
//! logo = "brand:logo"
//! ```
//!
//! Every field is optional; a missing file is the same as an empty one.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{DEFAULT_CDN_URL, DEFAULT_COLOR};
use crate::core::IconlensError;
use crate::models::IconSet;
use crate::resolver::{ResolverSettings, is_valid_collection_id};
use crate::utils::platform::{get_home_dir, resolve_path};

/// Global iconlens configuration.
///
/// # Examples
///
/// ```rust,no_run
/// use iconlens_cli::config::GlobalConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let mut config = GlobalConfig::load().await?;
/// config.aliases.insert("home".to_string(), "mdi:home".to_string());
/// config.save().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL collections are downloaded from, `{cdn_url}/{id}.json`
    #[serde(default = "default_cdn_url")]
    pub cdn_url: String,

    /// Color substituted for `currentColor` in rendered icons
    #[serde(default = "default_color")]
    pub color: String,

    /// Key substitutions, e.g. `home = "mdi:home"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,

    /// Resolve only keys listed in `aliases`
    #[serde(default, skip_serializing_if = "is_false")]
    pub custom_aliases_only: bool,

    /// JSON icon-set files searched before the disk cache and the network.
    /// `~` and environment variables are expanded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_collections: Vec<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            cdn_url: default_cdn_url(),
            color: default_color(),
            aliases: BTreeMap::new(),
            custom_aliases_only: false,
            custom_collections: Vec::new(),
        }
    }
}

fn default_cdn_url() -> String {
    DEFAULT_CDN_URL.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl GlobalConfig {
    /// Loads the configuration from [`default_path`](Self::default_path), or
    /// the defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Loads from `path` when given, otherwise from the default location.
    /// A missing file yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Saves to the default location.
    pub async fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path).await
    }

    /// Writes the configuration as pretty TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// `ICONLENS_CONFIG_PATH` if set, else `~/.iconlens/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("ICONLENS_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }
        Ok(get_home_dir()?.join(".iconlens").join("config.toml"))
    }

    /// Resolver settings derived from `aliases` and `custom_aliases_only`.
    #[must_use]
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            aliases: self.aliases.clone(),
            custom_aliases_only: self.custom_aliases_only,
        }
    }

    /// Reads every file listed in `custom_collections`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error naming the file if a path cannot be expanded, read or
    /// parsed, or if its prefix is not a valid collection id.
    pub async fn load_custom_collections(&self) -> Result<Vec<IconSet>> {
        let mut sets = Vec::with_capacity(self.custom_collections.len());
        for entry in &self.custom_collections {
            let path = resolve_path(entry)?;
            let content = fs::read_to_string(&path).await.with_context(|| {
                format!("Failed to read custom collection {}", path.display())
            })?;
            let set: IconSet = serde_json::from_str(&content).with_context(|| {
                format!("Failed to parse custom collection {}", path.display())
            })?;

            if !is_valid_collection_id(&set.prefix) {
                return Err(IconlensError::ConfigError {
                    message: format!(
                        "Custom collection {} has invalid prefix '{}'",
                        path.display(),
                        set.prefix
                    ),
                }
                .into());
            }

            tracing::debug!("Loaded custom collection '{}' from {}", set.prefix, path.display());
            sets.push(set);
        }
        Ok(sets)
    }
}
