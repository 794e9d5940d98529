//! Test utilities for smartbudget-core
//!
//! This module provides a mock Gemini server that speaks just enough of the
//! `generateContent` API for development and integration tests.

use axum::{
    extract::{Json, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock Gemini server for testing and development
pub struct MockGeminiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Requests carrying this key are answered with 403
    pub const REJECTED_KEY: &'static str = "rejected-key";

    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::serve(Router::new().route("/v1beta/models/:call", post(handle_generate))).await
    }

    /// Start a server that answers every request with a 500
    pub async fn start_failing() -> Self {
        Self::serve(Router::new().route("/v1beta/models/:call", post(handle_failure))).await
    }

    async fn serve(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `generateContent` endpoint
async fn handle_generate(
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    if !call.ends_with(":generateContent") {
        return (StatusCode::NOT_FOUND, "unknown method").into_response();
    }

    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if key.is_empty() || key == MockGeminiServer::REJECTED_KEY {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "API key not valid"}})),
        )
            .into_response();
    }

    let prompt = request["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    let rate = prompt
        .lines()
        .find(|l| l.starts_with("Savings Rate:"))
        .unwrap_or("Savings Rate: unknown");

    let text = format!(
        "* {} leaves room to grow; automate a transfer to savings.\n\
         * Trim your largest category by ten percent next month.\n\
         * Keep tracking every expense so the trend stays visible.",
        rate
    );

    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

async fn handle_failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}
