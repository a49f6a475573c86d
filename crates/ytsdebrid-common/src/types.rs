//! Metadata provider types.
//!
//! These mirror the subset of the provider's `list_movies` payload that the
//! catalog and stream resolution need. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::quality::Quality;

/// Top-level `list_movies` response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieListResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    pub data: MovieListData,
}

/// The `data` object of a listing response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MovieListData {
    #[serde(default)]
    pub movie_count: Option<u64>,
    #[serde(default)]
    pub page_number: Option<u32>,
    /// Absent when the query matched nothing.
    #[serde(default)]
    pub movies: Option<Vec<Movie>>,
}

impl MovieListResponse {
    /// Movies in the response, empty when the provider omitted the array.
    pub fn movies(&self) -> &[Movie] {
        self.data.movies.as_deref().unwrap_or_default()
    }

    /// Find the movie with the given external id.
    pub fn find_by_imdb(&self, imdb_code: &str) -> Option<&Movie> {
        self.movies().iter().find(|m| m.imdb_code == imdb_code)
    }
}

/// A single catalog item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Movie {
    pub imdb_code: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub large_cover_image: Option<String>,
    #[serde(default)]
    pub background_image_original: Option<String>,
    #[serde(default)]
    pub torrents: Vec<Torrent>,
}

/// A raw peer-to-peer source attached to a movie.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Torrent {
    pub hash: String,
    pub quality: Quality,
    /// Release kind, e.g. `bluray` or `web`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub seeds: u32,
    #[serde(default)]
    pub peers: u32,
    #[serde(default)]
    pub size: String,
}

impl Torrent {
    /// The info hash, lower-cased for use as a provider key.
    pub fn info_hash(&self) -> String {
        self.hash.to_ascii_lowercase()
    }

    /// Human-readable description, e.g. `Bluray / 1080p, S: 10 L: 2, Size: 1.9 GB`.
    pub fn display_title(&self) -> String {
        format!(
            "{} / {}, S: {} L: {}, Size: {}",
            capitalize(&self.kind),
            self.quality,
            self.seeds,
            self.peers,
            self.size
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
