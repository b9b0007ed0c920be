//! HTTP front end for the order-key engine.
//!
//! The bot backend calls these routes when it creates bookmarks, so key
//! generation lives in one place regardless of which worker handles the
//! event. The service is stateless; persisting keys (and the atomic rewrite
//! a prepend requires) stays with the caller.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::signal;

use crate::config::ServiceConfig;
use handlers::{
    AppState, handle_append, handle_healthy, handle_midpoint, handle_prepend, handle_sort,
};

/// Build the router with every route.
pub fn router(config: ServiceConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/v1/midpoint", post(handle_midpoint))
        .route("/v1/append", post(handle_append))
        .route("/v1/prepend", post(handle_prepend))
        .route("/v1/sort", post(handle_sort))
        .route("/-/healthy", get(handle_healthy))
        .with_state(state)
}

/// Bind and serve until SIGINT or SIGTERM.
pub async fn serve(config: ServiceConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    let app = router(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn post_json(path: &str, body: Value) -> (StatusCode, Value) {
        let config = ServiceConfig {
            max_batch_size: 10,
            ..ServiceConfig::default()
        };
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router(config).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_midpoint_open_range() {
        let (status, body) = post_json("/v1/midpoint", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "n");
    }

    #[tokio::test]
    async fn test_midpoint_empty_string_is_absent() {
        let (status, body) = post_json("/v1/midpoint", json!({"prev": "m", "next": ""})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "t");
    }

    #[tokio::test]
    async fn test_midpoint_invalid_bounds() {
        let (status, body) = post_json("/v1/midpoint", json!({"prev": "f", "next": "d"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid bounds"));
    }

    #[tokio::test]
    async fn test_midpoint_invalid_key() {
        let (status, _) = post_json("/v1/midpoint", json!({"prev": "F"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_midpoint_exhausted_key_space() {
        let (status, body) = post_json("/v1/midpoint", json!({"next": "a"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "no order key fits between start and 'a'");
    }

    #[tokio::test]
    async fn test_append() {
        let (status, body) =
            post_json("/v1/append", json!({"count": 3, "existing": []})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keys"], json!(["n", "u", "x"]));
    }

    #[tokio::test]
    async fn test_prepend_reports_rewrite() {
        let (status, body) = post_json(
            "/v1/prepend",
            json!({"count": 2, "existing": ["d", "f", "m"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rewritten"], json!({"from": "d", "to": "e"}));
        assert_eq!(body["keys"], json!(["d", "dn"]));
    }

    #[tokio::test]
    async fn test_prepend_without_rewrite_omits_field() {
        let (status, body) = post_json("/v1/prepend", json!({"count": 1})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("rewritten").is_none());
        assert_eq!(body["keys"], json!(["n"]));
    }

    #[tokio::test]
    async fn test_prepend_duplicate_is_conflict() {
        let (status, _) =
            post_json("/v1/prepend", json!({"count": 1, "existing": ["d", "d"]})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_append_rejects_unordered_existing() {
        let (status, body) =
            post_json("/v1/append", json!({"count": 1, "existing": ["z", "a"]})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid bounds"));

        let (status, _) =
            post_json("/v1/append", json!({"count": 1, "existing": ["d", "d"]})).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_prepend_rejects_unordered_tail() {
        let (status, body) = post_json(
            "/v1/prepend",
            json!({"count": 1, "existing": ["d", "f", "c"]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid bounds: 'f' does not sort before 'c'");
    }

    #[tokio::test]
    async fn test_batch_too_large() {
        let (status, body) = post_json("/v1/append", json!({"count": 11})).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "requested 11 keys, at most 10 allowed");
    }

    #[tokio::test]
    async fn test_sort_by_priority() {
        let records = json!([
            {"id": "1", "partition": "p", "order": "b", "urgency": 300},
            {"id": "2", "partition": "p", "order": "z", "urgency": 500},
            {"id": "3", "partition": "p", "order": "a", "urgency": 300},
        ]);
        let (status, body) =
            post_json("/v1/sort", json!({"records": records, "byPriority": true})).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["records"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[tokio::test]
    async fn test_sort_missing_priority() {
        let records = json!([
            {"id": "1", "partition": "p", "order": "b"},
            {"id": "2", "partition": "p", "order": "c", "urgency": 300},
        ]);
        let (status, body) =
            post_json("/v1/sort", json!({"records": records, "byPriority": true})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "record is missing the urgency field");
    }

    #[tokio::test]
    async fn test_healthy() {
        let request = Request::builder()
            .uri("/-/healthy")
            .body(Body::empty())
            .unwrap();
        let response = router(ServiceConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
