//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Run every request through the engine
//! - Forward image requests and metadata lookups upstream
//! - Swap in a new engine when the config file changes
//! - Observability (metrics, correlation IDs)
//!
//! # Design Decisions
//! - Engine and upstream client live together in one `ArcSwap` snapshot
//! - In-flight requests finish on the snapshot they started with
//! - Listener address and request timeout are fixed at startup

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{EdgeConfig, ValidationError};
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::http::response;
use crate::iiif::info::InfoDocument;
use crate::iiif::{Decision, EdgeRequest, Engine, ImageRewrite, InfoRequest};
use crate::observability::metrics;
use crate::upstream::{MetadataLookup, UpstreamClient};

/// Everything a request needs, replaced as a unit on reload.
pub struct Runtime {
    pub engine: Engine,
    pub upstream: UpstreamClient,
}

impl Runtime {
    pub fn from_config(config: &EdgeConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            engine: Engine::from_config(config)?,
            upstream: UpstreamClient::from_config(&config.upstream, &config.timeouts),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ArcSwap<Runtime>>,
}

/// HTTP server for the IIIF edge.
pub struct HttpServer {
    router: Router,
    runtime: Arc<ArcSwap<Runtime>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, ValidationError> {
        let runtime = Arc::new(ArcSwap::from_pointee(Runtime::from_config(&config)?));

        tracing::info!(
            prefixes = runtime.load().engine.routes().len(),
            upstream = %config.upstream.address,
            "Engine compiled"
        );

        let state = AppState {
            runtime: runtime.clone(),
        };
        let router = Self::build_router(&config, state);

        Ok(Self { router, runtime })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(edge_handler))
            .route("/{*path}", any(edge_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(RequestIdLayer)
    }

    /// Run the server until `shutdown` fires, applying config updates as
    /// they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<EdgeConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let runtime = self.runtime.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Runtime::from_config(&config) {
                    Ok(next) => {
                        runtime.store(Arc::new(next));
                        tracing::info!("Configuration reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected reloaded configuration");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every request goes through the engine.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let runtime = state.runtime.load_full();

    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let decision = runtime.engine.evaluate(&EdgeRequest {
        method: &method,
        path: &path,
        headers: request.headers(),
    });
    let outcome = decision.outcome();

    let response = match decision {
        Decision::Reject(error) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = error.status().as_u16(),
                class = error.class().as_str(),
                detail = %error.detail(),
                "Request rejected"
            );
            metrics::record_rejection(&error);
            response::rejection(&error)
        }
        Decision::Image(rewrite) => serve_image(&runtime, &method, &rewrite, &request_id).await,
        Decision::Info(info) => serve_info(&runtime, &info, &request_id).await,
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        outcome,
        "Request completed"
    );
    metrics::record_request(&method, response.status().as_u16(), outcome, start);

    response
}

async fn serve_image(
    runtime: &Runtime,
    method: &Method,
    rewrite: &ImageRewrite,
    request_id: &str,
) -> Response {
    let backend_uri = rewrite.backend_uri();
    match runtime.upstream.fetch_image(method, &backend_uri, request_id).await {
        Ok(upstream) => response::pass_through(upstream, rewrite.cache_tier),
        Err(e) => {
            tracing::error!(request_id = %request_id, backend = %backend_uri, error = %e, "Upstream error");
            metrics::record_upstream_failure("image");
            response::upstream_failure()
        }
    }
}

async fn serve_info(runtime: &Runtime, info: &InfoRequest, request_id: &str) -> Response {
    match runtime.upstream.fetch_metadata(&info.backend_path, request_id).await {
        Ok(MetadataLookup::Found(dimensions)) => {
            let document = InfoDocument::new(info.version, info.id.clone(), dimensions);
            response::info_document(&document, info.negotiation)
        }
        Ok(MetadataLookup::PassThrough(upstream)) => {
            tracing::info!(
                request_id = %request_id,
                backend = %info.backend_path,
                status = upstream.status().as_u16(),
                "Metadata lookup passed through"
            );
            response::pass_through(upstream, info.negotiation.cache_tier)
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, backend = %info.backend_path, error = %e, "Metadata lookup failed");
            metrics::record_upstream_failure("metadata");
            response::upstream_failure()
        }
    }
}
