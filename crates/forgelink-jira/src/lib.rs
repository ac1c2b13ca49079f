//! JIRA Cloud REST client for forgelink.
//!
//! One method per exposed tool against the v3 and agile 1.0 APIs, plus
//! the Atlassian Document Format helpers in [`adf`].

pub mod adf;
mod client;

pub use client::JiraClient;
