//! # blogdesk-core
//!
//! Core crate for BlogDesk. Contains the configuration schema and loader,
//! the unified error system and the workspace-wide result alias.
//!
//! This crate has **no** internal dependencies on other BlogDesk crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
