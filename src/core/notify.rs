//! User-visible notifications.
//!
//! Most failures are only logged through `tracing`. A failed collection
//! download is different: it usually means the network or the `cdn_url`
//! setting is broken, so it is also reported to the user through a
//! [`Notifier`].

use colored::Colorize;

/// Sink for errors the end user should see.
pub trait Notifier: Send + Sync {
    /// Reports an error message to the user.
    fn error(&self, message: &str);
}

/// Prints notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn error(&self, message: &str) {
        eprintln!("{}: {}", "error".red().bold(), message);
    }
}

/// Drops every notification; logging still happens at the call site.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn error(&self, _message: &str) {}
}
