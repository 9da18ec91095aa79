use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::{ident, upstream, workload, RecordStore, ServiceError};

#[derive(Debug, Serialize)]
struct TestResponse {
    status: &'static str,
    request_id: String,
    fib_result: u64,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    details: String,
}

/// State shared by every handler invocation, built once at startup.
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub fib_n: u64,
    pub upstream_delay: Duration,
}

type ApiState = Arc<AppState>;

/// Handler failure, rendered as a 500 with a JSON error body. No partial
/// success is ever reported.
struct ApiError(ServiceError);

impl<E> From<E> for ApiError
where
    E: Into<ServiceError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        error!("Request failed: {}", self.0);
        let body = ErrorResponse {
            status: "error",
            details: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// The full request lifecycle: generate an id, digest it, run the CPU-bound
/// stub, persist the record, then wait out the simulated upstream call.
/// Steps are strictly sequential within a request; concurrent requests
/// interleave freely.
async fn test_handler(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let request_id = ident::new_request_id();
    let digest = workload::sha256_hex(&request_id);
    let fib_result = workload::fibonacci(state.fib_n);

    debug!(%request_id, "Persisting request record");
    state.store.insert(request_id.clone(), digest).await?;

    upstream::simulate_call(state.upstream_delay).await;

    let response = TestResponse {
        status: "success",
        request_id,
        fib_result,
    };

    Ok((StatusCode::OK, Json(response)))
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/test", get(test_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_http_server(
    address: String,
    port: u16,
    state: ApiState,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ServiceError> {
    let app = router(state);

    let addr = format!("{}:{}", address, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServiceError::io(format!("Failed to bind to address {}", addr), e))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("HTTP server shutting down");
        })
        .await
        .map_err(|e| ServiceError::io("HTTP server error", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::time::Instant;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_state(delay: Duration) -> ApiState {
        let store = RecordStore::open(None).unwrap();
        Arc::new(AppState {
            store: Arc::new(store),
            fib_n: 20,
            upstream_delay: delay,
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(test_state(Duration::ZERO));
        let (status, body) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_endpoint_response_shape() {
        let state = test_state(Duration::from_millis(1));
        let app = router(Arc::clone(&state));

        let (status, body) = get_json(app, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["fib_result"], 6765);

        let request_id = body["request_id"].as_str().unwrap();
        assert!(Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn test_digest_written_matches_id() {
        let state = test_state(Duration::from_millis(1));
        let app = router(Arc::clone(&state));

        let (_, body) = get_json(app, "/test").await;
        let request_id = body["request_id"].as_str().unwrap().to_string();

        let stored = state
            .store
            .digest_for(request_id.clone())
            .await
            .unwrap()
            .expect("record should be written before the response is sent");
        assert_eq!(stored, workload::sha256_hex(&request_id));
    }

    #[tokio::test]
    async fn test_write_failure_returns_server_error() {
        let state = test_state(Duration::from_millis(1));
        state.store.drop_table();
        let app = router(state);

        let (status, body) = get_json(app, "/test").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["details"].as_str().unwrap().contains("Store error"));
    }

    #[tokio::test]
    async fn test_latency_floor() {
        let state = test_state(Duration::from_millis(50));
        let app = router(state);

        let start = Instant::now();
        let (status, _) = get_json(app, "/test").await;

        assert_eq!(status, StatusCode::OK);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_requests_interleave() {
        const M: usize = 100;

        let state = test_state(Duration::from_millis(50));
        let app = router(Arc::clone(&state));

        let start = Instant::now();
        let responses = futures::future::join_all(
            (0..M).map(|_| get_json(app.clone(), "/test")),
        )
        .await;
        let elapsed = start.elapsed();

        let mut ids = HashSet::new();
        for (status, body) in responses {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["fib_result"], 6765);
            ids.insert(body["request_id"].as_str().unwrap().to_string());
        }

        // No duplicate ids, no lost writes
        assert_eq!(ids.len(), M);
        assert_eq!(state.store.count().await.unwrap(), M as u64);

        // The 50ms suspensions must overlap rather than serialize the
        // scheduler; M sequential requests would take at least M * 50ms.
        assert!(
            elapsed < Duration::from_millis((M as u64 * 50) / 2),
            "requests serialized: {:?} elapsed",
            elapsed
        );
    }
}
