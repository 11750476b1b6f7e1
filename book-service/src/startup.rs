//! Application startup and lifecycle management.

use crate::config::{BookConfig, ErrorContract};
use crate::handlers;
use crate::services::{BookStore, MongoBookStore, UnavailableBookStore};
use axum::{
    body::Body, extract::FromRef, http::Request, middleware::from_fn, routing::get, Router,
};
use mongodb::error::ErrorKind;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BookConfig,
    pub store: Arc<dyn BookStore>,
}

impl AppState {
    pub fn contract(&self) -> ErrorContract {
        self.config.error_contract
    }
}

impl FromRef<AppState> for ErrorContract {
    fn from_ref(state: &AppState) -> Self {
        state.contract()
    }
}

/// Build the HTTP router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route(
            "/api/books",
            get(handlers::list_books)
                .post(handlers::create_book)
                .delete(handlers::delete_all_books),
        )
        .route(
            "/api/books/:id",
            get(handlers::get_book)
                .post(handlers::add_comment)
                .delete(handlers::delete_book),
        )
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            make_request_span(request)
        }))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application against MongoDB.
    ///
    /// Only an unparsable connection string is fatal. An unreachable
    /// database, or an SRV lookup that fails while the client is built, is
    /// logged and the service starts anyway: every storage call then fails
    /// until the database comes back (or, for the SRV case, until restart).
    pub async fn build(config: BookConfig) -> Result<Self, AppError> {
        let store: Arc<dyn BookStore> = match MongoBookStore::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
        )
        .await
        {
            Ok(store) => {
                match store.health_check().await {
                    Ok(()) => tracing::info!(
                        database = %config.mongodb.database,
                        "Successfully connected to MongoDB"
                    ),
                    Err(e) => tracing::error!("Failed to connect to MongoDB: {}", e),
                }
                Arc::new(store)
            }
            Err(e) if is_invalid_uri(&e) => return Err(AppError::from(e)),
            Err(e) => {
                tracing::error!(
                    "MongoDB client unavailable, serving storage errors: {}",
                    e
                );
                Arc::new(UnavailableBookStore::new(e.to_string()))
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application over an already constructed store.
    pub async fn build_with_store(
        config: BookConfig,
        store: Arc<dyn BookStore>,
    ) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            error_contract = ?config.error_contract,
            "Book service listening"
        );

        Ok(Self {
            port,
            listener,
            state: AppState { config, store },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn BookStore> {
        self.state.store.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Serve until `shutdown` resolves, letting in-flight requests finish.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}

fn is_invalid_uri(err: &mongodb::error::Error) -> bool {
    matches!(*err.kind, ErrorKind::InvalidArgument { .. })
}
