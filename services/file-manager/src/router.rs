//! Route table and middleware stack.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::handlers;
use crate::state::AppState;

/// Build the service router.
pub fn build_router(state: Arc<AppState>, config: &ServiceConfig) -> Result<Router> {
    let cors = config.cors_layer()?;

    let router = Router::new()
        // File manager API
        .route(
            "/fileManager/upload",
            post(handlers::upload::upload_directory_handler),
        )
        .route(
            "/fileManager/upload-zip",
            post(handlers::upload::upload_zip_handler),
        )
        .route(
            "/fileManager/files",
            get(handlers::files::list_files_handler),
        )
        .route("/fileManager/file", get(handlers::files::get_file_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(router)
}
