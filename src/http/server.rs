//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all echo handler
//! - Wire up middleware (tracing, request timeout)
//! - Attach the peer address to every request
//! - Serve until the shutdown signal, then drain

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::handler::RequestHandler;
use crate::http::render::Render;
use crate::http::request::RequestMeta;
use crate::http::response;
use crate::observability::metrics;
use crate::security::access_control;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub renderer: Arc<dyn Render>,
}

/// HTTP server for the echo service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server around the given state.
    pub fn new(state: AppState, request_timeout: Duration) -> Self {
        Self {
            router: build_router(state, request_timeout),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Starting server on http://{}", addr);

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Every method and path reaches the same handler.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", any(echo_handler))
        .route("/{*path}", any(echo_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// Echo the caller's address, and for trusted callers their headers and whois.
async fn echo_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let meta = RequestMeta::from_parts(&parts, peer);

    let record = state.handler.handle(&meta.peer, &parts.headers).await;

    tracing::info!(
        client_ip = %record.client_ip,
        remote_user = %access_control::remote_user(&parts.headers).unwrap_or(Cow::Borrowed("-")),
        request = %format!("{} {} {}", meta.method, meta.uri, meta.version),
        referer = %meta.referer,
        user_agent = %meta.user_agent,
        authenticated = record.authenticated,
        "Request received"
    );

    let response = response::render_page(state.renderer.as_ref(), &record);
    metrics::record_request(&meta.method, response.status().as_u16(), start_time);

    if response.status().is_success() {
        tracing::debug!(client_ip = %record.client_ip, "Request handled successfully");
    }
    response
}
