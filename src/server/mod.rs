//! Application bootstrap and transport integration
//!
//! Runs the four startup stages in strict sequence — scan, registry build,
//! wiring, route table — then hands the immutable snapshot to the
//! per-request dispatcher behind an axum fallback route. The host HTTP
//! server owns connections and byte-level I/O; this layer only converts
//! between axum's types and the dispatcher's transport surface.

use crate::component::Manifest;
use crate::config::{self, ConfigService};
use crate::dispatch::{DispatchOutcome, Dispatcher, ParamBinding, WebRequest, WebResponse};
use crate::error::{Result, WirefrontError};
use crate::registry::{Registry, RegistryBuilder};
use crate::route::RouteTable;
use crate::scan::{FsListing, Scanner};
use crate::wire::Wirer;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tokio::signal;

/// A bootstrapped application: the startup snapshot plus its dispatcher.
pub struct Application {
    registry: Arc<Registry>,
    table: Arc<RouteTable>,
    dispatcher: Arc<Dispatcher>,
    context_path: String,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("context_path", &self.context_path)
            .finish_non_exhaustive()
    }
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn route_table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// An axum router whose fallback feeds every request — any method, any
    /// path — through the dispatcher and renders the written body with the
    /// default success status. A pass-through (empty route table) renders
    /// the transport default: an empty success response.
    pub fn router(&self) -> Router {
        let dispatcher = Arc::clone(&self.dispatcher);
        let context_path = self.context_path.clone();
        Router::new().fallback(move |req: Request<Body>| {
            let dispatcher = Arc::clone(&dispatcher);
            let context_path = context_path.clone();
            async move {
                let mut request =
                    WebRequest::new(req.method().clone(), req.uri().path(), &context_path);
                if let Some(query) = req.uri().query() {
                    request = request.with_query(query);
                }
                let response = WebResponse::new();
                let outcome = dispatcher.dispatch(&request, &response);
                tracing::debug!(path = req.uri().path(), ?outcome, "request dispatched");
                match outcome {
                    DispatchOutcome::PassThrough => Response::new(Body::empty()),
                    _ => response.body().into_response(),
                }
            }
        })
    }

    /// Bind and serve until a shutdown signal (Ctrl+C / SIGTERM) arrives.
    pub async fn serve(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(addr = %addr, "server running");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

/// Fluent bootstrap: configuration, manifest, binding strategy, then
/// [`build`](ApplicationBuilder::build) to run the startup pipeline.
pub struct ApplicationBuilder {
    config: ConfigService,
    manifest: Manifest,
    binding: ParamBinding,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigService::new(),
            manifest: Manifest::default(),
            binding: ParamBinding::default(),
        }
    }

    pub fn config(mut self, config: ConfigService) -> Self {
        self.config = config;
        self
    }

    pub fn manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn binding(mut self, binding: ParamBinding) -> Self {
        self.binding = binding;
        self
    }

    /// Run the startup pipeline: scan → registry → wiring → route table.
    ///
    /// Only an unresolvable scan target (or missing `scanPackage`) aborts
    /// startup; individual type-load and wiring failures are isolated and
    /// logged by their stages.
    pub fn build(self) -> Result<Application> {
        let scan_package = self
            .config
            .get(config::SCAN_PACKAGE)
            .ok_or_else(|| WirefrontError::MissingProperty {
                key: config::SCAN_PACKAGE.to_string(),
            })?;
        let scan_root = self
            .config
            .get(config::SCAN_ROOT)
            .unwrap_or_else(|| ".".to_string());
        let context_path = self.config.get(config::CONTEXT_PATH).unwrap_or_default();

        tracing::info!(package = %scan_package, root = %scan_root, "scanning components");
        let scanner = Scanner::new(FsListing::new(scan_root));
        let names = scanner.scan(&scan_package)?;
        tracing::info!(count = names.len(), "scan complete");

        let registry = Arc::new(RegistryBuilder::new(&self.manifest).ingest(&names));

        let report = Wirer::wire(&registry);
        match serde_json::to_string(&report) {
            Ok(json) => tracing::debug!(report = %json, "wiring complete"),
            Err(_) => tracing::debug!("wiring complete"),
        }

        let table = Arc::new(RouteTable::build(&registry));
        tracing::info!(routes = ?table.paths(), "dispatch ready");

        let dispatcher = Arc::new(
            Dispatcher::new(Arc::clone(&registry), Arc::clone(&table)).with_binding(self.binding),
        );
        Ok(Application {
            registry,
            table,
            dispatcher,
            context_path,
        })
    }
}

/// Resolves when a shutdown signal (Ctrl+C or SIGTERM) is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
