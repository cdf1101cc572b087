//! iconlens CLI entry point
//!
//! Parses arguments, runs the command, and renders failures through
//! [`user_friendly_error`]. Exit code 2 means the key did not name a usable
//! icon (malformed key, missing icon or unavailable collection); every other
//! failure exits with 1.

use anyhow::Result;
use clap::Parser;
use iconlens_cli::cli;
use iconlens_cli::core::IconlensError;
use iconlens_cli::core::error::user_friendly_error;

const EXIT_FAILURE: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let code = if is_lookup_miss(&e) { EXIT_NOT_FOUND } else { EXIT_FAILURE };
            user_friendly_error(e).display();
            std::process::exit(code);
        }
    }
}

fn is_lookup_miss(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<IconlensError>(),
            Some(
                IconlensError::InvalidIconKey { .. }
                    | IconlensError::IconNotFound { .. }
                    | IconlensError::CollectionUnavailable { .. }
            )
        )
    })
}
