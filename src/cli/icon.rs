//! Icon commands: `info`, `svg`, `data-url` and `list`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::CliConfig;
use crate::constants::DEFAULT_PIXEL_SIZE;
use crate::core::IconlensError;
use crate::models::ResolvedIconInfo;
use crate::render::path_to_svg;
use crate::resolver::{IconLookup, parse_icon_key};
use crate::service::IconService;

#[derive(Args)]
pub struct InfoCommand {
    /// Icon key, e.g. `mdi:home` or a configured alias
    key: String,

    /// Look the key up as given, without configured aliases
    #[arg(long)]
    no_aliases: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

impl InfoCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let service = config.service().await?;
        let info = lookup(&service, &self.key, !self.no_aliases).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }

        let icon = &info.icon;
        println!("{}", info.key.bold());
        println!("  collection: {}", info.collection);
        println!("  id:         {}", info.id);
        println!("  size:       {}x{} (ratio {})", icon.width, icon.height, info.ratio);
        println!("  view box:   {} {} {} {}", icon.left, icon.top, icon.width, icon.height);
        if icon.rotate != 0 {
            println!("  rotate:     {}", u16::from(icon.rotate) * 90);
        }
        if icon.h_flip || icon.v_flip {
            let flips: Vec<&str> = [(icon.h_flip, "horizontal"), (icon.v_flip, "vertical")]
                .into_iter()
                .filter_map(|(set, name)| set.then_some(name))
                .collect();
            println!("  flip:       {}", flips.join(", "));
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct SvgCommand {
    /// Icon key
    key: String,

    /// Height in pixels
    #[arg(long, default_value_t = DEFAULT_PIXEL_SIZE)]
    size: u32,
}

impl SvgCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let service = config.service().await?;
        let info = lookup(&service, &self.key, true).await?;
        println!("{}", path_to_svg(&info, self.size));
        Ok(())
    }
}

#[derive(Args)]
pub struct DataUrlCommand {
    /// Icon key
    key: String,

    /// Height in pixels
    #[arg(long, default_value_t = DEFAULT_PIXEL_SIZE)]
    size: u32,

    /// Color replacing `currentColor` (default: `color` from the config)
    #[arg(long)]
    color: Option<String>,
}

impl DataUrlCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let service = config.service().await?;
        if let Some(color) = self.color {
            service.set_color(color);
        }

        // Resolve first so a failure can say why
        let info = lookup(&service, &self.key, true).await?;
        let url = service.get_data_url_sized((&info).into(), self.size).await;
        println!("{url}");
        Ok(())
    }
}

#[derive(Args)]
pub struct ListCommand {
    /// Collection prefix, e.g. `mdi`
    collection: String,
}

impl ListCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let service = config.service().await?;
        let names = service.list_collection(&self.collection).await.ok_or_else(|| {
            IconlensError::CollectionUnavailable {
                collection: self.collection.clone(),
            }
        })?;

        for name in names {
            println!("{}:{}", self.collection, name);
        }
        Ok(())
    }
}

/// Resolves `key`, turning not-found and unavailable into errors.
async fn lookup(service: &IconService, key: &str, allow_aliases: bool) -> Result<ResolvedIconInfo> {
    let lookup = service.get_icon_info(key, allow_aliases).await;
    if let IconLookup::Found(info) = lookup {
        return Ok(info);
    }

    let settings = service.resolver().settings();
    let substituted = if allow_aliases { settings.aliases.get(key) } else { None };
    let effective = substituted.map_or(key, String::as_str);
    let parsed = parse_icon_key(effective, &service.cache().known_prefixes());

    match (lookup, parsed) {
        (IconLookup::Unavailable, parsed) => Err(IconlensError::CollectionUnavailable {
            collection: parsed.map_or_else(|| effective.to_string(), |parsed| parsed.collection),
        }
        .into()),
        // Rejected by the custom-aliases-only policy before parsing
        (_, _) if allow_aliases && settings.custom_aliases_only && substituted.is_none() => {
            Err(IconlensError::IconNotFound {
                key: key.to_string(),
            }
            .into())
        }
        (_, None) => Err(IconlensError::InvalidIconKey {
            key: effective.to_string(),
        }
        .into()),
        (_, Some(_)) => Err(IconlensError::IconNotFound {
            key: key.to_string(),
        }
        .into()),
    }
}
