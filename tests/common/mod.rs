//! Shared fixtures for integration tests.
//!
//! Provides canned metadata responses, configs pointing at [`wiremock`]
//! servers, and [`FakeConverter`] for exercising resolution without a real
//! debrid provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ytsdebrid::cache::ExpiringCache;
use ytsdebrid::config::{Config, DebridConfig, MetadataConfig};
use ytsdebrid::debrid::Converter;
use ytsdebrid::metadata::{MetadataClient, MovieQuery};
use ytsdebrid::resolver::Resolver;

pub const LIST_MOVIES: &str = "/api/v2/list_movies.json";

/// One torrent entry as served by the metadata provider.
pub fn torrent(hash: &str, quality: &str) -> Value {
    json!({
        "hash": hash,
        "quality": quality,
        "type": "bluray",
        "seeds": 100,
        "peers": 10,
        "size": "1.5 GB",
    })
}

pub fn movie(imdb_code: &str, title: &str, torrents: Vec<Value>) -> Value {
    json!({
        "imdb_code": imdb_code,
        "title": title,
        "year": 1994,
        "rating": 9.3,
        "runtime": 142,
        "genres": ["Drama"],
        "language": "en",
        "large_cover_image": "https://img.example/cover.jpg",
        "background_image_original": "https://img.example/bg.jpg",
        "torrents": torrents,
    })
}

pub fn listing(movies: Vec<Value>) -> Value {
    json!({
        "status": "ok",
        "status_message": "Query was successful",
        "data": {
            "movie_count": movies.len(),
            "movies": movies,
        }
    })
}

/// Serve `body` for lookups of `id`.
pub async fn mount_lookup(server: &MockServer, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(LIST_MOVIES))
        .and(query_param("query_term", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn metadata_config(server: &MockServer) -> MetadataConfig {
    MetadataConfig {
        base_url: server.uri(),
        request_timeout_secs: 5,
        ..MetadataConfig::default()
    }
}

/// Debrid config with a short poll interval so tests do not sleep for long.
pub fn debrid_config(server: &MockServer) -> DebridConfig {
    DebridConfig {
        base_url: server.uri(),
        api_key: Some("test-token".into()),
        poll_interval_ms: 10,
        max_poll_attempts: 3,
        request_timeout_secs: 5,
        ..DebridConfig::default()
    }
}

pub fn config(metadata: &MockServer) -> Config {
    Config {
        metadata: metadata_config(metadata),
        ..Config::default()
    }
}

pub fn resolver(server: &MockServer, converter: Option<Arc<dyn Converter>>) -> Resolver {
    let metadata = Arc::new(MetadataClient::new(
        &metadata_config(server),
        ExpiringCache::new(),
    ));
    Resolver::new(metadata, converter, Config::default().cache_hints.hints())
}

/// Resolver whose lookup of `id` is answered from a pre-filled cache.
///
/// No network is involved, so it is safe under paused tokio time.
pub fn cached_resolver(id: &str, body: Value, converter: Option<Arc<dyn Converter>>) -> Resolver {
    let config = MetadataConfig {
        base_url: "http://127.0.0.1:9".into(),
        ..MetadataConfig::default()
    };
    let cache = ExpiringCache::new();
    let key = MovieQuery::lookup(id).url(&config.base_url).unwrap();
    cache.set(
        key.to_string(),
        Bytes::from(body.to_string()),
        Duration::from_secs(3600),
    );
    let metadata = Arc::new(MetadataClient::new(&config, cache));
    Resolver::new(metadata, converter, Config::default().cache_hints.hints())
}

/// Scripted converter: succeeds for known hashes after an optional delay.
#[derive(Default)]
pub struct FakeConverter {
    outcomes: HashMap<String, (Duration, Option<String>)>,
    panics: Vec<String>,
    calls: AtomicUsize,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(mut self, hash: &str, url: &str, delay: Duration) -> Self {
        self.outcomes
            .insert(hash.to_lowercase(), (delay, Some(url.to_string())));
        self
    }

    pub fn fail(mut self, hash: &str, delay: Duration) -> Self {
        self.outcomes.insert(hash.to_lowercase(), (delay, None));
        self
    }

    pub fn panic_on(mut self, hash: &str) -> Self {
        self.panics.push(hash.to_lowercase());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Converter for FakeConverter {
    fn label(&self) -> &'static str {
        "RD"
    }

    async fn convert(&self, info_hash: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panics.iter().any(|h| h == info_hash) {
            panic!("converter exploded for {info_hash}");
        }
        let (delay, outcome) = self.outcomes.get(info_hash)?.clone();
        tokio::time::sleep(delay).await;
        outcome
    }
}
