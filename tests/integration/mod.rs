//! Integration test suite for iconlens
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **service**: end-to-end lookups through `IconService` with a mock fetcher
//! - **http_fetch**: the reqwest fetcher and cache against a local HTTP server
//! - **cli**: the `iconlens` binary

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod http_fetch;
mod service;
