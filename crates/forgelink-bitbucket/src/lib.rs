//! Bitbucket Cloud REST client for forgelink.
//!
//! One method per exposed tool; each method performs exactly one HTTP
//! call against the v2.0 API and returns the parsed JSON body verbatim.

mod client;

pub use client::BitbucketClient;

/// Default Bitbucket Cloud API URL.
pub const DEFAULT_BITBUCKET_URL: &str = "https://api.bitbucket.org/2.0";
