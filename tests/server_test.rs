//! HTTP router tests.
//!
//! Requests are driven through the router with `oneshot`; the metadata
//! provider is a [`wiremock`] server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{listing, mount_lookup, movie, torrent, FakeConverter, LIST_MOVIES};
use ytsdebrid::config::Config;
use ytsdebrid::server::{create_router, AppContext};

struct Harness {
    ctx: AppContext,
    dir: TempDir,
}

impl Harness {
    fn new(config: Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(config, dir.path().join("config.toml"));
        Self { ctx, dir }
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(self.ctx.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

#[tokio::test]
async fn health_check_returns_ok() {
    let server = MockServer::start().await;
    let h = Harness::new(common::config(&server));

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = create_router(h.ctx.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn manifest_is_served() {
    let server = MockServer::start().await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/manifest.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "community.yts");
    assert_eq!(body["catalogs"][0]["id"], "yts");
    assert_eq!(body["types"], json!(["movie"]));
}

#[tokio::test]
async fn stream_route_returns_fallbacks_without_credential() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        "tt0111161",
        listing(vec![movie(
            "tt0111161",
            "The Shawshank Redemption",
            vec![torrent("A", "720p"), torrent("B", "1080p")],
        )]),
    )
    .await;
    let h = Harness::new(common::config(&server));
    assert!(!h.ctx.converter_enabled());

    let (status, body) = h.get("/stream/movie/tt0111161.json").await;
    assert_eq!(status, StatusCode::OK);

    let streams = body["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["infoHash"], "b");
    assert_eq!(streams[1]["infoHash"], "a");
    assert_eq!(body["cacheMaxAge"], 129600);
}

#[tokio::test]
async fn stream_route_places_converted_streams_first() {
    let server = MockServer::start().await;
    mount_lookup(
        &server,
        "tt1",
        listing(vec![movie("tt1", "One", vec![torrent("A", "720p")])]),
    )
    .await;
    let h = Harness::new(common::config(&server));
    h.ctx.set_converter(Some(Arc::new(
        FakeConverter::new().succeed("a", "https://dl/a", Duration::ZERO),
    )));

    let (status, body) = h.get("/stream/movie/tt1.json").await;
    assert_eq!(status, StatusCode::OK);
    let streams = body["streams"].as_array().unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0]["url"], "https://dl/a");
    assert!(streams[0]["title"].as_str().unwrap().starts_with("[RD] "));
    assert_eq!(streams[1]["infoHash"], "a");
}

#[tokio::test]
async fn unknown_title_is_404() {
    let server = MockServer::start().await;
    mount_lookup(&server, "tt404", listing(vec![])).await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/stream/movie/tt404.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn provider_outage_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_MOVIES))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/stream/movie/tt1.json").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "fetch_failed");
}

#[tokio::test]
async fn unsupported_stream_type_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_MOVIES))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(0)
        .mount(&server)
        .await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/stream/series/tt1:1:1.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["streams"], json!([]));
}

#[tokio::test]
async fn catalog_route_decodes_extras() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_MOVIES))
        .and(query_param("genre", "Sci-Fi"))
        .and(query_param("page", "3"))
        .and(query_param("sort_by", "seeds"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(vec![movie("tt7", "Seven", vec![])])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/catalog/movie/yts/genre=Sci-Fi&skip=100.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metas"][0]["id"], "tt7");
    assert_eq!(body["metas"][0]["type"], "movie");
}

#[tokio::test]
async fn catalog_route_without_extras_requests_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_MOVIES))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(1)
        .mount(&server)
        .await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/catalog/movie/yts.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metas"], json!([]));
}

#[tokio::test]
async fn unknown_catalog_is_empty() {
    let server = MockServer::start().await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/catalog/movie/other.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metas"], json!([]));
}

#[tokio::test]
async fn config_update_persists_and_enables_converter() {
    let server = MockServer::start().await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.get("/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], false);

    let (status, body) = h.post("/config", json!({ "rdApiKey": "secret-token" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(h.ctx.converter_enabled());

    let (_, body) = h.get("/config").await;
    assert_eq!(body["configured"], true);
    assert_eq!(body["rdApiKey"], "****oken");

    let saved = std::fs::read_to_string(h.dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("secret-token"));

    let (_, body) = h.post("/config", json!({ "rdApiKey": "" })).await;
    assert_eq!(body["success"], true);
    assert!(!h.ctx.converter_enabled());
}

#[tokio::test]
async fn verify_without_credential_is_bad_request() {
    let server = MockServer::start().await;
    let h = Harness::new(common::config(&server));

    let (status, body) = h.post("/config/verify", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn verify_checks_credential_with_provider() {
    let metadata = MockServer::start().await;
    let debrid = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&debrid)
        .await;

    let mut config = common::config(&metadata);
    config.debrid = common::debrid_config(&debrid);
    let h = Harness::new(config);

    let (status, body) = h.post("/config/verify", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn configured_credential_is_trimmed() {
    let metadata = MockServer::start().await;
    let debrid = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "username": "u" })))
        .expect(1)
        .mount(&debrid)
        .await;

    let mut config = common::config(&metadata);
    config.debrid = common::debrid_config(&debrid);
    config.debrid.api_key = Some("  test-token\n".into());
    let h = Harness::new(config);

    let (_, body) = h.get("/config").await;
    assert_eq!(body["rdApiKey"], "****oken");

    let (status, body) = h.post("/config/verify", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn cache_clear_forces_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LIST_MOVIES))
        .and(query_param("query_term", "tt1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(vec![movie("tt1", "One", vec![])])),
        )
        .expect(2)
        .mount(&server)
        .await;
    let h = Harness::new(common::config(&server));

    h.get("/stream/movie/tt1.json").await;
    h.get("/stream/movie/tt1.json").await;

    let (status, body) = h.post("/cache/clear", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], 1);

    h.get("/stream/movie/tt1.json").await;
}
