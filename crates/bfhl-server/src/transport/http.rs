//! HTTP transport: axum server with /health and /bfhl.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::protocol::{Dispatcher, Reply};
use crate::types::{ServerError, ServerResult};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP transport for the BFHL API.
pub struct HttpTransport {
    state: Arc<ServerState>,
    body_limit: usize,
}

impl HttpTransport {
    pub fn new(dispatcher: Dispatcher, body_limit: usize) -> Self {
        Self {
            state: Arc::new(ServerState {
                dispatcher: Arc::new(dispatcher),
            }),
            body_limit,
        }
    }

    /// Build the axum Router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(handle_health))
            .route("/bfhl", post(handle_bfhl))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors)
                    .layer(DefaultBodyLimit::max(self.body_limit)),
            )
            .with_state(self.state.clone())
    }

    /// Run the HTTP server on the given address until ctrl-c.
    pub async fn run(&self, addr: &str) -> ServerResult<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        tracing::info!("HTTP transport stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, AxumJson(self.envelope)).into_response()
    }
}

/// Handle `POST /bfhl`.
///
/// The body is parsed only when the `Content-Type` names JSON. The request
/// runs on its own task so that a panic becomes a 500 instead of a dropped
/// connection.
async fn handle_bfhl(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Reply {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to read request body: {e}");
            return state.dispatcher.internal_error();
        }
    };

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let dispatcher = state.dispatcher.clone();
    let task = async move { dispatcher.handle_body(content_type.as_deref(), &body).await };
    match tokio::spawn(task).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Request task failed: {e}");
            state.dispatcher.internal_error()
        }
    }
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<ServerState>>) -> Reply {
    Reply {
        status: 200,
        envelope: state.dispatcher.health(),
    }
}
