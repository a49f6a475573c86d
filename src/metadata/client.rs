//! Cached client for the metadata provider.

use bytes::Bytes;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};
use ytsdebrid_common::{Error, MovieListResponse, Result};

use crate::cache::ExpiringCache;
use crate::config::MetadataConfig;

use super::query::MovieQuery;

/// Read-through client for `list_movies` queries.
///
/// Raw response bodies are cached under the full request URL for a fixed
/// TTL, independent of the cache hints sent to addon clients.
pub struct MetadataClient {
    client: reqwest::Client,
    base_url: String,
    cache: ExpiringCache<Bytes>,
    cache_ttl: Duration,
}

impl MetadataClient {
    pub fn new(config: &MetadataConfig, cache: ExpiringCache<Bytes>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl: config.cache_ttl(),
        }
    }

    pub fn cache(&self) -> &ExpiringCache<Bytes> {
        &self.cache
    }

    /// Fetch and parse a listing, serving from cache when possible.
    pub async fn fetch(&self, query: &MovieQuery) -> Result<MovieListResponse> {
        let url = query.url(&self.base_url)?;
        let key = url.to_string();

        if let Some(body) = self.cache.get(&key) {
            debug!(query = %query, "Metadata cache hit");
            return parse(&key, &body);
        }

        debug!(query = %query, "Metadata cache miss, fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch_failed(&key, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::fetch_failed(
                &key,
                format!("unexpected status {status}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch_failed(&key, e))?;
        if body.is_empty() {
            return Err(Error::fetch_failed(&key, "empty response body"));
        }

        let parsed = parse(&key, &body)?;
        self.cache.set(key, body, self.cache_ttl);
        Ok(parsed)
    }
}

fn parse(key: &str, body: &[u8]) -> Result<MovieListResponse> {
    serde_json::from_slice(body).map_err(|e| Error::parse_failed(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reports_missing_fields() {
        let err = parse("q", br#"{"data":{"movies":[{"title":"x"}]}}"#).unwrap_err();
        assert!(matches!(err, Error::ParseFailed { .. }));
    }

    #[test]
    fn parse_accepts_empty_listing() {
        let resp = parse("q", br#"{"status":"ok","data":{"movie_count":0}}"#).unwrap();
        assert!(resp.movies().is_empty());
    }

    #[tokio::test]
    async fn cached_body_is_served_without_network() {
        let config = MetadataConfig {
            // Nothing listens here; a network call would fail.
            base_url: "http://127.0.0.1:9".into(),
            ..MetadataConfig::default()
        };
        let cache = ExpiringCache::new();
        let client = MetadataClient::new(&config, cache.clone());

        let query = MovieQuery::lookup("tt1");
        let key = query.url(&config.base_url).unwrap().to_string();
        cache.set(
            key,
            Bytes::from_static(br#"{"data":{"movies":[{"imdb_code":"tt1","title":"One"}]}}"#),
            Duration::from_secs(60),
        );

        let resp = client.fetch(&query).await.unwrap();
        assert_eq!(resp.movies()[0].title, "One");
    }
}
