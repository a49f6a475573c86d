//! Addon protocol payloads.
//!
//! Shapes returned to addon clients: catalog metas, streams, and the cache
//! lifetime hints that every response carries.

use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

use crate::types::{Movie, Torrent};

/// Trackers announced for every fallback source, after the DHT entry.
pub const TRACKERS: &[&str] = &[
    "udp://tracker.coppersurfer.tk:6969",
    "udp://tracker.openbittorrent.com:80",
    "udp://p4p.arenabg.com:1337",
    "udp://tracker.internetwarriors.net:1337",
    "udp://tracker.opentrackr.org:1337/announce",
    "udp://open.demonii.com:1337/announce",
    "udp://glotorrents.pw:6969/announce",
    "udp://torrent.gresille.org:80/announce",
    "udp://tracker.leechers-paradise.org:6969",
];

// ---------------------------------------------------------------------------
// Cache hints
// ---------------------------------------------------------------------------

/// Cache lifetime hints attached to every addon response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheHints {
    /// How long clients may cache the response.
    #[serde(rename = "cacheMaxAge", serialize_with = "as_secs")]
    pub max_age: Duration,
    /// How long clients may keep serving a stale response on error.
    #[serde(rename = "staleError", serialize_with = "as_secs")]
    pub stale_error: Duration,
}

const ONE_DAY_SECS: u64 = 24 * 60 * 60;

impl Default for CacheHints {
    fn default() -> Self {
        Self {
            // 1.5 days
            max_age: Duration::from_secs(ONE_DAY_SECS * 3 / 2),
            // ~6 months
            stale_error: Duration::from_secs(ONE_DAY_SECS * 6 * 30),
        }
    }
}

fn as_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// A raw source converted into a direct playback URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedSource {
    pub title: String,
    pub url: String,
}

/// A raw source exposed as-is for clients with their own torrent engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackSource {
    pub title: String,
    #[serde(rename = "infoHash")]
    pub info_hash: String,
    /// Announce list: `dht:<hash>` first, then `tracker:<url>` entries.
    pub sources: Vec<String>,
}

impl FallbackSource {
    pub fn from_torrent(torrent: &Torrent) -> Self {
        let hash = torrent.info_hash();
        let mut sources = Vec::with_capacity(TRACKERS.len() + 1);
        sources.push(format!("dht:{hash}"));
        sources.extend(TRACKERS.iter().map(|t| format!("tracker:{t}")));

        Self {
            title: torrent.display_title(),
            info_hash: hash,
            sources,
        }
    }
}

/// One entry of a stream response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stream {
    Converted(ConvertedSource),
    Fallback(FallbackSource),
}

impl Stream {
    pub fn is_converted(&self) -> bool {
        matches!(self, Stream::Converted(_))
    }
}

/// Result of resolving one item into playable streams.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionResult {
    pub streams: Vec<Stream>,
    #[serde(flatten)]
    pub hints: CacheHints,
}

impl ResolutionResult {
    pub fn converted(&self) -> impl Iterator<Item = &ConvertedSource> {
        self.streams.iter().filter_map(|s| match s {
            Stream::Converted(c) => Some(c),
            Stream::Fallback(_) => None,
        })
    }

    pub fn fallbacks(&self) -> impl Iterator<Item = &FallbackSource> {
        self.streams.iter().filter_map(|s| match s {
            Stream::Fallback(f) => Some(f),
            Stream::Converted(_) => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Catalog entry shown when browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub poster: Option<String>,
    pub background: Option<String>,
    pub year: Option<u16>,
    pub release_info: Option<String>,
    pub language: Option<String>,
    pub imdb_rating: Option<f64>,
    pub runtime: Option<String>,
    pub genres: Vec<String>,
}

impl From<&Movie> for MetaPreview {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.imdb_code.clone(),
            kind: "movie".to_string(),
            name: movie.title.clone(),
            poster: movie.large_cover_image.clone(),
            background: movie.background_image_original.clone(),
            year: movie.year,
            release_info: movie.year.map(|y| y.to_string()),
            language: movie.language.clone(),
            imdb_rating: movie.rating,
            runtime: movie.runtime.map(|r| format!("{r}m")),
            genres: movie.genres.clone(),
        }
    }
}

/// A page of catalog entries.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
    #[serde(flatten)]
    pub hints: CacheHints,
}
