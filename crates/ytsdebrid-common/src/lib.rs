//! ytsdebrid-common: Shared types, addon payloads, and errors.
//!
//! This crate provides the data model shared by the resolution pipeline and
//! the HTTP layer:
//!
//! - **Metadata types**: The movie listing returned by the metadata provider
//!   and the raw torrent sources attached to each movie
//! - **Quality tiers**: Parsing and ordering of source quality labels
//! - **Addon payloads**: Stream, catalog, and cache-hint shapes consumed by
//!   addon clients
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use ytsdebrid_common::{FallbackSource, Quality, Torrent};
//!
//! let torrent = Torrent {
//!     hash: "ABCDEF".into(),
//!     quality: Quality::Fhd1080,
//!     kind: "bluray".into(),
//!     seeds: 10,
//!     peers: 2,
//!     size: "1.9 GB".into(),
//! };
//!
//! let fallback = FallbackSource::from_torrent(&torrent);
//! assert_eq!(fallback.info_hash, "abcdef");
//! assert_eq!(fallback.sources[0], "dht:abcdef");
//! ```

pub mod addon;
pub mod error;
pub mod quality;
pub mod types;

pub use addon::*;
pub use error::{Error, Result};
pub use quality::Quality;
pub use types::*;
