//! Copper CRM integration.
//!
//! Copper holds the practice's contact records; everything here is read-only
//! reshaping of its REST API. Raw payloads stay private to `client` — the
//! rest of the crate only sees `types::Contact` and friends.

mod client;

pub use client::{CopperClient, TagCount};

/// Synthetic tag matching contacts that carry no tags at all.
pub const NO_TAG: &str = "No Tag";
