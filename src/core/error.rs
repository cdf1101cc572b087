//! Error handling for iconlens
//!
//! This module provides the error types and user-facing error reporting for the
//! icon resolver. Resolution outcomes such as "icon not found" or "collection
//! unavailable" are ordinary values in the library API (see
//! [`crate::resolver::IconLookup`]); the types here cover the failures that do
//! propagate: configuration, filesystem, network and serialization problems, plus
//! the CLI turning a lookup miss into an exit status.
//!
//! # Architecture
//!
//! - [`IconlensError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Use [`user_friendly_error`] to convert any error into a user-friendly format with
//! contextual suggestions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use iconlens_cli::core::{IconlensError, ErrorContext};
//!
//! let context = ErrorContext::new(IconlensError::InvalidIconKey {
//!     key: "not a key".to_string(),
//! })
//! .with_suggestion("Use the form collection:name, e.g. mdi:home");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use super::file_error::FileOperationError;

/// The main error type for iconlens operations
#[derive(Error, Debug)]
pub enum IconlensError {
    /// Configuration file could not be read or is invalid
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// The key is not of the form `collection:name`
    #[error("Invalid icon key: {key}")]
    InvalidIconKey {
        /// The key as given by the caller
        key: String,
    },

    /// The collection was loaded but holds no icon or alias with that name
    #[error("Icon '{key}' not found")]
    IconNotFound {
        /// The key that was looked up
        key: String,
    },

    /// The collection could not be loaded from any source
    #[error("Icon collection '{collection}' is unavailable")]
    CollectionUnavailable {
        /// Collection prefix
        collection: String,
    },

    /// HTTP request failed or returned a non-success status
    #[error("Network error fetching {url}: {reason}")]
    NetworkError {
        /// Requested URL
        url: String,
        /// Status line or transport error
        reason: String,
    },

    /// The persisted cache could not be removed
    #[error("Cache error: {operation}")]
    CacheError {
        /// What was being done to the cache
        operation: String,
        /// Underlying failure
        reason: String,
    },

    /// File operation with full context
    #[error(transparent)]
    FileOperation(#[from] FileOperationError),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error wrapper carrying a suggestion and details for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: IconlensError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Additional explanation
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps `error` without suggestion or details.
    #[must_use]
    pub const fn new(error: IconlensError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attaches a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attaches details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

fn create_error_context(error: IconlensError) -> ErrorContext {
    match &error {
        IconlensError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check ~/.iconlens/config.toml or the file passed with --config")
            .with_details("Set ICONLENS_CONFIG_PATH to use a different configuration file"),
        IconlensError::InvalidIconKey {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use the form collection:name, for example mdi:home"),
        IconlensError::IconNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'iconlens list <collection>' to see the available names"),
        IconlensError::CollectionUnavailable {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check your network connection and the cdn_url setting")
            .with_details("Collections are downloaded once and then served from the local cache"),
        IconlensError::NetworkError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check your network connection and the cdn_url setting"),
        IconlensError::CacheError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check that the cache directory is writable, or set ICONLENS_CACHE_DIR")
                .with_details(details)
        }
        IconlensError::FileOperation(file_error) => {
            let details = file_error.user_message();
            ErrorContext::new(error).with_details(details)
        }
        IconlensError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`IconlensError`], [`FileOperationError`], [`std::io::Error`] and
/// [`toml::de::Error`] anywhere in the error chain; everything else is reported
/// with its full context chain as the message.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(iconlens_error) = cause.downcast_ref::<IconlensError>() {
            return create_error_context(clone_for_display(iconlens_error));
        }
        if let Some(file_error) = cause.downcast_ref::<FileOperationError>() {
            return ErrorContext::new(IconlensError::Other {
                message: file_error.to_string(),
            })
            .with_details(file_error.user_message());
        }
        if let Some(toml_error) = cause.downcast_ref::<toml::de::Error>() {
            return ErrorContext::new(IconlensError::ConfigError {
                message: toml_error.to_string(),
            })
            .with_suggestion("Check the TOML syntax of your configuration file");
        }
    }

    let permission_denied = error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|io_error| io_error.kind() == std::io::ErrorKind::PermissionDenied);
    if permission_denied {
        return ErrorContext::new(IconlensError::Other {
            message: format!("{error:#}"),
        })
        .with_suggestion("Check the permissions of the iconlens cache and config directories");
    }

    ErrorContext::new(IconlensError::Other {
        message: format!("{error:#}"),
    })
}

// Variants wrapping foreign error types cannot be cloned; they are flattened
// into `Other` so the original chain stays intact for logging.
fn clone_for_display(error: &IconlensError) -> IconlensError {
    match error {
        IconlensError::ConfigError {
            message,
        } => IconlensError::ConfigError {
            message: message.clone(),
        },
        IconlensError::InvalidIconKey {
            key,
        } => IconlensError::InvalidIconKey {
            key: key.clone(),
        },
        IconlensError::IconNotFound {
            key,
        } => IconlensError::IconNotFound {
            key: key.clone(),
        },
        IconlensError::CollectionUnavailable {
            collection,
        } => IconlensError::CollectionUnavailable {
            collection: collection.clone(),
        },
        IconlensError::NetworkError {
            url,
            reason,
        } => IconlensError::NetworkError {
            url: url.clone(),
            reason: reason.clone(),
        },
        IconlensError::CacheError {
            operation,
            reason,
        } => IconlensError::CacheError {
            operation: operation.clone(),
            reason: reason.clone(),
        },
        other => IconlensError::Other {
            message: other.to_string(),
        },
    }
}
