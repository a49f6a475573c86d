//! Stream resolution and catalog listing.
//!
//! [`Resolver::resolve`] turns an external id into playable streams: fetch the
//! item's metadata, rank its sources, convert every ranked source through the
//! debrid provider concurrently, then return converted entries followed by a
//! raw fallback for every source.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use ytsdebrid_common::{
    CacheHints, CatalogResponse, ConvertedSource, Error, FallbackSource, MetaPreview,
    ResolutionResult, Result, Stream, Torrent,
};

use crate::debrid::Converter;
use crate::metadata::{MetadataClient, MovieQuery};
use crate::ranker;

/// Composes metadata fetching, ranking, and conversion.
///
/// Cheap to construct; the server builds one per request from shared parts so
/// credential changes take effect immediately.
#[derive(Clone)]
pub struct Resolver {
    metadata: Arc<MetadataClient>,
    converter: Option<Arc<dyn Converter>>,
    hints: CacheHints,
    page_size: u32,
}

impl Resolver {
    pub fn new(
        metadata: Arc<MetadataClient>,
        converter: Option<Arc<dyn Converter>>,
        hints: CacheHints,
    ) -> Self {
        Self {
            metadata,
            converter,
            hints,
            page_size: 50,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resolve `id` into converted and fallback streams.
    ///
    /// Only metadata failures are returned as errors; conversion failures just
    /// leave the affected source with its fallback entry.
    pub async fn resolve(&self, id: &str) -> Result<ResolutionResult> {
        let query = MovieQuery::lookup(id);
        debug!(query = %query, "Resolving streams");

        let listing = self.metadata.fetch(&query).await?;
        let movie = listing.find_by_imdb(id).ok_or_else(|| {
            warn!(id, "No metadata found");
            Error::not_found(id)
        })?;

        let ranked = ranker::rank(&movie.torrents);

        let mut streams: Vec<Stream> = match &self.converter {
            Some(converter) => convert_all(converter, &ranked)
                .await
                .into_iter()
                .map(Stream::Converted)
                .collect(),
            None => Vec::with_capacity(ranked.len()),
        };
        let converted = streams.len();

        streams.extend(
            ranked
                .iter()
                .map(|t| Stream::Fallback(FallbackSource::from_torrent(t))),
        );

        info!(
            id,
            title = %movie.title,
            sources = ranked.len(),
            converted,
            "Resolved streams"
        );

        Ok(ResolutionResult {
            streams,
            hints: self.hints,
        })
    }

    /// One catalog page. `skip` is the number of items already shown.
    pub async fn catalog(&self, genre: Option<&str>, skip: Option<u32>) -> Result<CatalogResponse> {
        let page = page_for_skip(skip, self.page_size);
        let query = MovieQuery::listing(genre.map(str::to_string), self.page_size, page);
        debug!(query = %query, "Fetching catalog page");

        let listing = self.metadata.fetch(&query).await?;
        let metas = listing.movies().iter().map(MetaPreview::from).collect();

        Ok(CatalogResponse {
            metas,
            hints: self.hints,
        })
    }
}

/// Convert every source concurrently and keep successes in ranked order.
///
/// Each attempt runs in its own task; a panicking attempt counts as
/// unavailable and does not affect the others.
async fn convert_all(converter: &Arc<dyn Converter>, ranked: &[Torrent]) -> Vec<ConvertedSource> {
    let attempts = ranked.iter().map(|torrent| {
        let converter = Arc::clone(converter);
        let hash = torrent.info_hash();
        tokio::spawn(async move { converter.convert(&hash).await })
    });

    // join_all yields results in input order, not completion order.
    let outcomes = join_all(attempts).await;

    ranked
        .iter()
        .zip(outcomes)
        .filter_map(|(torrent, outcome)| {
            let url = match outcome {
                Ok(url) => url?,
                Err(e) => {
                    warn!(hash = %torrent.info_hash(), error = %e, "Conversion task failed");
                    return None;
                }
            };
            Some(ConvertedSource {
                title: format!("[{}] {}", converter.label(), torrent.display_title()),
                url,
            })
        })
        .collect()
}

/// Catalog page number for a `skip` offset (1-based).
fn page_for_skip(skip: Option<u32>, page_size: u32) -> u32 {
    match skip {
        Some(skip) if skip > 0 => {
            ((f64::from(skip) / f64::from(page_size)).round() as u32).saturating_add(1)
        }
        _ => 1,
    }
}
