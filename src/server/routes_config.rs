//! Configuration API routes.

use crate::config::Environment;
use crate::server::AppContext;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn config_routes() -> Router<AppContext> {
    Router::new()
        .route("/config", get(get_config).post(update_config))
        .route("/config/verify", post(verify_credential))
        .route("/cache/clear", post(clear_cache))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigView {
    /// Masked token, e.g. `****abcd`.
    rd_api_key: Option<String>,
    configured: bool,
    environment: Environment,
}

async fn get_config(State(ctx): State<AppContext>) -> impl IntoResponse {
    let key = ctx.credentials.get();
    Json(ConfigView {
        configured: key.is_some(),
        rd_api_key: key.as_deref().map(mask),
        environment: ctx.credentials.environment(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateConfigRequest {
    #[serde(default)]
    rd_api_key: Option<String>,
}

async fn update_config(
    State(ctx): State<AppContext>,
    Json(req): Json<UpdateConfigRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    ctx.set_credential(req.rd_api_key).map_err(|e| {
        tracing::error!("Failed to save configuration: {:#}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Failed to save configuration" })),
        )
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "converter": ctx.converter_enabled(),
    })))
}

async fn verify_credential(
    State(ctx): State<AppContext>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let Some(client) = ctx.debrid_client() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "valid": false, "error": "No API key configured" })),
        ));
    };

    match client.verify().await {
        Ok(()) => Ok(Json(serde_json::json!({ "valid": true }))),
        Err(e) => {
            tracing::warn!(error = %e, "Credential verification failed");
            Ok(Json(serde_json::json!({ "valid": false, "error": e.to_string() })))
        }
    }
}

async fn clear_cache(State(ctx): State<AppContext>) -> impl IntoResponse {
    let cleared = ctx.metadata.cache().len();
    ctx.metadata.cache().clear();
    tracing::info!(cleared, "Metadata cache cleared");
    Json(serde_json::json!({ "cleared": cleared }))
}

fn mask(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}
