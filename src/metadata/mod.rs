//! Metadata provider access.
//!
//! # Module layout
//!
//! - [`query`] -- Listing and lookup queries and their URL serialization.
//! - [`client`] -- Read-through client backed by the expiring cache.

pub mod client;
pub mod query;

pub use client::MetadataClient;
pub use query::MovieQuery;
