//! HTTP API for the bhasa relay.
//!
//! Serves the gateway contract on port 3000 by default. CORS-permissive so
//! the phrase-site frontend can call it from any origin.

use axum::body::Body;
use axum::extract::{Query as UrlQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{error, warn};

use bhasa_core::query::Query;
use bhasa_core::types::{ErrorResponse, ResultResponse, TextRequest};

use crate::relay::{Relay, RelayError};

/// Build the axum router with a shared [`Relay`].
pub fn router(relay: Relay) -> Router {
    Router::new()
        .route("/api/transliterate", post(transliterate))
        .route("/api/unicode", post(unicode))
        .route("/api/tts", get(tts))
        .layer(CorsLayer::permissive())
        .with_state(relay)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ─── Handlers ──────────────────────────────────────────────────────────────

async fn transliterate(
    State(relay): State<Relay>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    let Some(query) = Query::parse(&req.text) else {
        // An empty query is never forwarded upstream.
        return Ok(Json(ResultResponse {
            result: String::new(),
        }));
    };
    let result = relay
        .transliterate(query.as_str())
        .await
        .map_err(|e| api_error(e, "Failed to fetch from translation upstream"))?;
    Ok(Json(ResultResponse { result }))
}

async fn unicode(
    State(relay): State<Relay>,
    Json(req): Json<TextRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    let Some(query) = Query::parse(&req.text) else {
        return Ok(Json(ResultResponse {
            result: String::new(),
        }));
    };
    let result = relay
        .to_unicode(query.as_str())
        .await
        .map_err(|e| api_error(e, "Failed to fetch from input tools upstream"))?;
    Ok(Json(ResultResponse { result }))
}

#[derive(Deserialize)]
struct TtsParams {
    #[serde(default)]
    text: String,
}

async fn tts(State(relay): State<Relay>, UrlQuery(params): UrlQuery<TtsParams>) -> Response {
    let Some(query) = Query::parse(&params.text) else {
        return (StatusCode::BAD_REQUEST, "Missing text parameter").into_response();
    };

    match relay.tts(query.as_str()).await {
        Ok(upstream) => (
            [(header::CONTENT_TYPE, "audio/mpeg")],
            Body::from_stream(upstream.bytes_stream()),
        )
            .into_response(),
        Err(e) => {
            error!("tts relay failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching audio").into_response()
        }
    }
}

/// Map a relay failure onto the gateway's HTTP 500 contract. A malformed
/// upstream payload carries no details; a transport failure does.
fn api_error(err: RelayError, malformed_message: &str) -> ApiError {
    match err {
        RelayError::Malformed => {
            warn!("{malformed_message}: unexpected payload shape");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: malformed_message.to_string(),
                    details: None,
                }),
            )
        }
        RelayError::Upstream(e) => {
            error!("relay error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Server Error".to_string(),
                    details: Some(e.to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhasa_core::types::UpstreamConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Bind the relay router on an ephemeral port, pointed at `upstream`.
    async fn serve_with(upstream: &MockServer) -> String {
        let config = UpstreamConfig {
            translate_url: format!("{}/translate_a/single", upstream.uri()),
            input_tools_url: format!("{}/request", upstream.uri()),
            tts_url: format!("{}/translate_tts", upstream.uri()),
        };
        let app = router(Relay::new(config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn post_text(base: &str, endpoint: &str, text: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{base}{endpoint}"))
            .json(&json!({ "text": text }))
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn transliterate_normalizes_segmented_payload() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("q", "hello world"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [["नमस्ते ", "hello ", null], ["संसार", "world", null]],
                null,
                "ne"
            ])))
            .mount(&upstream)
            .await;

        let base = serve_with(&upstream).await;
        let resp = post_text(&base, "/api/transliterate", "hello world").await;
        assert_eq!(resp.status(), 200);
        let body: ResultResponse = resp.json().await.unwrap();
        assert_eq!(body.result, "नमस्ते संसार");
    }

    #[tokio::test]
    async fn unicode_returns_first_suggestion() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request"))
            .and(query_param("text", "namaste"))
            .and(query_param("itc", "ne-t-i0-und"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                "SUCCESS",
                [["namaste", ["नमस्ते", "नमस्ते!"], [], { "candidate_type": [0, 0] }]]
            ])))
            .mount(&upstream)
            .await;

        let base = serve_with(&upstream).await;
        let resp = post_text(&base, "/api/unicode", "namaste").await;
        assert_eq!(resp.status(), 200);
        let body: ResultResponse = resp.json().await.unwrap();
        assert_eq!(body.result, "नमस्ते");
    }

    #[tokio::test]
    async fn empty_text_short_circuits_without_upstream_contact() {
        // No mocks mounted: any upstream contact would 404 and surface
        // as a 500 from the relay.
        let upstream = MockServer::start().await;
        let base = serve_with(&upstream).await;

        for endpoint in ["/api/transliterate", "/api/unicode"] {
            let resp = post_text(&base, endpoint, "   ").await;
            assert_eq!(resp.status(), 200);
            let body: ResultResponse = resp.json().await.unwrap();
            assert_eq!(body.result, "");
        }
        assert!(upstream.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_500_with_details() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&upstream)
            .await;

        let base = serve_with(&upstream).await;
        let resp = post_text(&base, "/api/transliterate", "hello").await;
        assert_eq!(resp.status(), 500);
        let body: ErrorResponse = resp.json().await.unwrap();
        assert_eq!(body.error, "Server Error");
        assert!(body.details.is_some());
    }

    #[tokio::test]
    async fn malformed_upstream_payload_maps_to_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "weird": true })))
            .mount(&upstream)
            .await;

        let base = serve_with(&upstream).await;
        let resp = post_text(&base, "/api/transliterate", "hello").await;
        assert_eq!(resp.status(), 500);
        let body: ErrorResponse = resp.json().await.unwrap();
        assert_eq!(body.error, "Failed to fetch from translation upstream");
        assert_eq!(body.details, None);
    }

    #[tokio::test]
    async fn tts_requires_text() {
        let upstream = MockServer::start().await;
        let base = serve_with(&upstream).await;

        let resp = reqwest::get(format!("{base}/api/tts")).await.unwrap();
        assert_eq!(resp.status(), 400);
        assert_eq!(resp.text().await.unwrap(), "Missing text parameter");
    }

    #[tokio::test]
    async fn tts_streams_audio_bytes() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("q", "namaste"))
            .and(query_param("tl", "ne"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3fake-mpeg".to_vec()))
            .mount(&upstream)
            .await;

        let base = serve_with(&upstream).await;
        let resp = reqwest::get(format!("{base}/api/tts?text=namaste"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/mpeg"
        );
        assert_eq!(resp.bytes().await.unwrap().as_ref(), b"ID3fake-mpeg");
    }

    #[tokio::test]
    async fn tts_upstream_failure_maps_to_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&upstream)
            .await;

        let base = serve_with(&upstream).await;
        let resp = reqwest::get(format!("{base}/api/tts?text=namaste"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.text().await.unwrap(), "Error fetching audio");
    }
}
