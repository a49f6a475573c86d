//! Addon protocol routes: manifest, catalog pages, and streams.
//!
//! Path segments carry a `.json` suffix and catalog extras are encoded as a
//! query string inside the last segment (`genre=Action&skip=50.json`).

use crate::manifest::{self, CATALOG_ID, CONTENT_TYPE};
use crate::server::{ApiError, AppContext};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use ytsdebrid_common::{CatalogResponse, ResolutionResult};

pub fn addon_routes() -> Router<AppContext> {
    Router::new()
        .route("/manifest.json", get(get_manifest))
        .route("/catalog/:type/:id", get(get_catalog))
        .route("/catalog/:type/:id/:extra", get(get_catalog_with_extra))
        .route("/stream/:type/:id", get(get_stream))
}

async fn get_manifest() -> impl IntoResponse {
    Json(manifest::manifest())
}

async fn get_catalog(
    State(ctx): State<AppContext>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<CatalogResponse>, ApiError> {
    catalog_page(&ctx, &kind, &id, CatalogExtra::default()).await
}

async fn get_catalog_with_extra(
    State(ctx): State<AppContext>,
    Path((kind, id, extra)): Path<(String, String, String)>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let extra = CatalogExtra::parse(strip_json(&extra));
    catalog_page(&ctx, &kind, &id, extra).await
}

async fn catalog_page(
    ctx: &AppContext,
    kind: &str,
    id: &str,
    extra: CatalogExtra,
) -> Result<Json<CatalogResponse>, ApiError> {
    let hints = ctx.config.cache_hints.hints();
    if kind != CONTENT_TYPE || strip_json(id) != CATALOG_ID {
        tracing::debug!(kind = %kind, id = %id, "Unknown catalog requested");
        return Ok(Json(CatalogResponse {
            metas: Vec::new(),
            hints,
        }));
    }

    let page = ctx
        .resolver()
        .catalog(extra.genre.as_deref(), extra.skip)
        .await?;
    Ok(Json(page))
}

async fn get_stream(
    State(ctx): State<AppContext>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<ResolutionResult>, ApiError> {
    let id = strip_json(&id);
    if kind != CONTENT_TYPE || !id.starts_with("tt") {
        tracing::debug!(kind = %kind, id = %id, "Unsupported stream request");
        return Ok(Json(ResolutionResult {
            streams: Vec::new(),
            hints: ctx.config.cache_hints.hints(),
        }));
    }

    let result = ctx.resolver().resolve(id).await?;
    Ok(Json(result))
}

fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// Catalog extras decoded from a path segment.
#[derive(Debug, Default, PartialEq)]
struct CatalogExtra {
    genre: Option<String>,
    skip: Option<u32>,
}

impl CatalogExtra {
    fn parse(raw: &str) -> Self {
        let mut extra = Self::default();
        for (key, value) in form_pairs(raw) {
            match key.as_str() {
                "genre" if !value.is_empty() => extra.genre = Some(value),
                "skip" => extra.skip = value.parse().ok(),
                _ => {}
            }
        }
        extra
    }
}

fn form_pairs(raw: &str) -> Vec<(String, String)> {
    // Reuse the URL parser's form decoding for `%20` and `+` handling.
    match reqwest::Url::parse(&format!("http://extra.invalid/?{}", raw)) {
        Ok(url) => url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(_) => Vec::new(),
    }
}
