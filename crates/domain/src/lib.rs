//! # AdSync Domain
//!
//! Business domain types and models for AdSync.
//!
//! This crate contains:
//! - Wire types for the upstream Google Ads API (accounts, campaigns, sync
//!   jobs, ...)
//! - Typed request parameter records and their validation
//! - Selection and date range types
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other AdSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
/// Wire and request types
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::dates::{format_ymd, parse_ymd, DateRange};
