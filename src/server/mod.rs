//! Project service: the remote store the board reconciles against.
//!
//! A small axum service exposing CRUD over projects as camelCase JSON.
//! State is an explicitly owned [`ProjectRepository`] injected through
//! [`AppState`]; nothing is global.
//!
//! | Route                    | Handler          | Success | Failure   |
//! |--------------------------|------------------|---------|-----------|
//! | `GET /projects`          | `list_projects`  | 200     |           |
//! | `POST /projects`         | `create_project` | 201     | 400       |
//! | `GET /projects/{id}`     | `get_project`    | 200     | 404       |
//! | `PATCH /projects/{id}`   | `update_project` | 200     | 400, 404  |
//! | `DELETE /projects/{id}`  | `delete_project` | 204     | 404       |
//! | `GET /health`            | `health_check`   | 200     |           |

pub mod api;
pub mod repository;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerSection;
pub use api::{AppState, SharedState};
pub use repository::ProjectRepository;

/// Configuration for the project service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed to call the service.
    pub cors_origin: Option<String>,
    /// Start without the sample projects.
    pub empty: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSection::default())
    }
}

impl From<&ServerSection> for ServerConfig {
    fn from(section: &ServerSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port,
            cors_origin: Some(section.cors_origin.clone()).filter(|o| !o.trim().is_empty()),
            empty: false,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn repository(&self) -> ProjectRepository {
        if self.empty {
            ProjectRepository::empty()
        } else {
            ProjectRepository::seeded()
        }
    }
}

/// Build the full application router: API routes, CORS, request tracing.
pub fn build_router(state: SharedState, cors_origin: Option<&str>) -> Result<Router> {
    let mut app = api::api_router().with_state(state);

    if let Some(origin) = cors_origin {
        let origin: HeaderValue = origin
            .parse()
            .with_context(|| format!("Invalid CORS origin '{}'", origin))?;
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

/// Router for `config` with a fresh repository.
pub fn app(config: &ServerConfig) -> Result<Router> {
    let state = Arc::new(AppState {
        repo: config.repository(),
    });
    build_router(state, config.cors_origin.as_deref())
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

/// Start the project service and run until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let app = app(&config)?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, seeded = !config.empty, "Project service listening");
    println!("Nightwing project service running at http://{}", local_addr);

    serve(listener, app, shutdown_signal()).await?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}
