//! Debrid conversion of raw sources into direct playback URLs.
//!
//! The [`Converter`] trait is the seam the resolver depends on;
//! [`RealDebridClient`] is the production implementation.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::RealDebridClient;
pub use types::{DebridError, JobStatus};

/// Converts an info hash into a playback URL.
///
/// Implementations must not fail: any problem is reported as `None` so one
/// source cannot fail a whole resolution.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Short tag shown in front of converted stream titles (e.g. `"RD"`).
    fn label(&self) -> &'static str;

    /// Playback URL for `info_hash`, or `None` if conversion is unavailable.
    async fn convert(&self, info_hash: &str) -> Option<String>;
}
