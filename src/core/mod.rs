//! Core types and error handling for iconlens
//!
//! This module holds the pieces every other module depends on:
//!
//! - [`error`] - [`IconlensError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`file_error`] - file operation errors carrying path, purpose and caller
//! - [`notify`] - the [`Notifier`] seam for errors the user should see
//!
//! # Examples
//!
//! ```rust,no_run
//! use iconlens_cli::core::{IconlensError, user_friendly_error};
//!
//! let error = anyhow::Error::new(IconlensError::CollectionUnavailable {
//!     collection: "mdi".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

pub mod error;
pub mod file_error;
pub mod notify;

pub use error::{ErrorContext, IconlensError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
pub use notify::{Notifier, SilentNotifier, TerminalNotifier};
