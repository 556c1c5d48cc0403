//! # TF Contract Registry API Server
//!
//! REST API over a contract registry. Mutations take the caller from the
//! `x-caller-address` header, which the hosting authentication layer sets.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/contracts` - Register a contract address
//! - `GET /api/v1/contracts?uri=` - All entries of a resource
//! - `GET /api/v1/contracts/:network_id?uri=` - One entry of a resource
//! - `GET /api/v1/hashes/:hash/contracts[/:network_id]` - Same, by hash
//! - `POST /api/v1/roles/grant`, `POST /api/v1/roles/revoke` - Role changes
//! - `GET /api/v1/roles/:role/:account` - Role membership
//! - `GET /api/v1/events?from=` - Event log
//! - `GET /api/v1/stats` - Registry statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use tfreg_api::{ApiConfig, ApiServer};
//!
//! let config = ApiConfig::from_env()?;
//! let bind = config.bind;
//! let server = ApiServer::from_config(config).await?;
//! server.run(bind).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod extract;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::CALLER_HEADER;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for the contract registry.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server over prepared state.
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Opens the configured registry and creates a server over it.
    pub async fn from_config(config: ApiConfig) -> tfreg_core::Result<Self> {
        Ok(Self::new(AppState::open(config).await?))
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Contract registry API listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}
