//! Command-line interface for iconlens
//!
//! # Commands
//!
//! - `info <key>` - Resolve an icon and print its geometry
//! - `svg <key>` - Print the SVG document for an icon
//! - `data-url <key>` - Print the base64 data URL for an icon
//! - `list <collection>` - List icon and alias names of a collection
//! - `cache clear|migrate|info` - Manage the collection cache
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Disable logging
//! - `--config <PATH>` - Use a specific configuration file
//!
//! # Examples
//!
//! ```bash
//! iconlens info mdi:home
//! iconlens --verbose data-url mdi-home --size 48 --color "#333"
//! iconlens cache info
//! ```
//!
//! # Exit Codes
//!
//! `0` on success, `2` when the icon or its collection cannot be found, `1`
//! for every other failure.

mod cache;
mod icon;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;
use crate::core::TerminalNotifier;
use crate::service::IconService;

/// Settings derived from global flags, applied before a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set; `None` disables logging
    pub log_level: Option<String>,

    /// Configuration file to load instead of the default location
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the tracing subscriber. `RUST_LOG` wins over the flags.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("off"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    }

    /// Loads the configuration this run uses.
    pub async fn load_global_config(&self) -> Result<GlobalConfig> {
        GlobalConfig::load_with_optional(self.config_path.clone()).await
    }

    /// Builds the production service for this run.
    pub async fn service(&self) -> Result<IconService> {
        let config = self.load_global_config().await?;
        IconService::from_config_with_notifier(&config, Arc::new(TerminalNotifier)).await
    }
}

/// Resolve, cache and render icon collections.
#[derive(Parser)]
#[command(
    name = "iconlens",
    about = "Resolve, cache and render Iconify-style icons",
    version,
    author,
    long_about = "iconlens resolves icon keys like 'mdi:home' against collections downloaded from an \
                  icon CDN, caches them on disk, and renders icons as SVG or base64 data URLs."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging; only results and errors are printed.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file (default: ~/.iconlens/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an icon and print its geometry.
    Info(icon::InfoCommand),

    /// Print the SVG document for an icon.
    Svg(icon::SvgCommand),

    /// Print the base64 data URL for an icon.
    DataUrl(icon::DataUrlCommand),

    /// List the icon and alias names of a collection.
    List(icon::ListCommand),

    /// Manage the collection cache.
    Cache(cache::CacheCommand),
}

impl Cli {
    /// Runs the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates global flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` disables logging, and the
    /// default is `warn`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Runs the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Info(cmd) => cmd.execute(&config).await,
            Commands::Svg(cmd) => cmd.execute(&config).await,
            Commands::DataUrl(cmd) => cmd.execute(&config).await,
            Commands::List(cmd) => cmd.execute(&config).await,
            Commands::Cache(cmd) => cmd.execute(&config).await,
        }
    }
}
