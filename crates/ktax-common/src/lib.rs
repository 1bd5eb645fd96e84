//! ktax Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the ktax workspace.
//!
//! # Overview
//!
//! This crate provides the functionality used across all ktax workspace
//! members:
//!
//! - **Error Handling**: the [`KtaxError`] type and [`Result`] alias
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use ktax_common::{KtaxError, Result};
//!
//! fn parse_count(field: &str, line: usize) -> Result<u64> {
//!     field.parse().map_err(|_| KtaxError::malformed_row(
//!         line,
//!         format!("count field '{}' is not a non-negative integer", field),
//!     ))
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{KtaxError, Result};
