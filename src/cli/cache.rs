//! `cache` command: inspect, migrate and clear the collection cache.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::sync::Arc;

use super::CliConfig;
use crate::core::TerminalNotifier;
use crate::service::IconService;

#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: Option<CacheSubcommands>,
}

#[derive(Subcommand)]
enum CacheSubcommands {
    /// Show the cache location, cached collections and size (default)
    Info,

    /// Delete every cached collection, including legacy state entries
    Clear,

    /// Move collections from the legacy state file into the cache directory
    Migrate,
}

impl CacheCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Some(CacheSubcommands::Info) | None => Self::info(config).await,
            Some(CacheSubcommands::Clear) => Self::clear(config).await,
            Some(CacheSubcommands::Migrate) => Self::migrate(config).await,
        }
    }

    async fn info(config: &CliConfig) -> Result<()> {
        let service = config.service().await?;
        let cache = service.cache();
        let collections = cache.cached_collections().await?;
        let size = cache.cache_size().await?;

        println!("{}", "Icon Collection Cache".bold());
        println!("  Location:    {}", cache.cache_dir().display());
        println!("  CDN:         {}", cache.base_url());
        println!("  Collections: {}", collections.len());
        println!("  Size:        {}", format_size(size));
        for id in collections {
            println!("    - {id}");
        }
        Ok(())
    }

    async fn clear(config: &CliConfig) -> Result<()> {
        let service = config.service().await?;
        service.clear_cache().await?;
        println!("{} Cleared {}", "✓".green(), service.cache().cache_dir().display());
        Ok(())
    }

    async fn migrate(config: &CliConfig) -> Result<()> {
        let global = config.load_global_config().await?;
        let cache = IconService::cache_builder(&global, Arc::new(TerminalNotifier))
            .await?
            .migrate_on_build(false)
            .build()
            .await?;

        let migrated = cache.migrate_legacy().await?;
        if migrated == 0 {
            println!("Nothing to migrate");
        } else {
            println!(
                "{} Migrated {} collection(s) to {}",
                "✓".green(),
                migrated,
                cache.cache_dir().display()
            );
        }
        Ok(())
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 { format!("{bytes} B") } else { format!("{size:.1} {}", UNITS[unit]) }
}
