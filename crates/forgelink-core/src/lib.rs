//! Error handling and configuration for forgelink.
//!
//! This crate provides the shared error type and credential loading used
//! by the Bitbucket and JIRA adapter crates.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
