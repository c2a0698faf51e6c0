//! Service configuration: CORS allow-list, upload limits, extraction root.

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::http::{
    header::{
        ACCEPT, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION,
        CONTENT_TYPE, ORIGIN,
    },
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::CorsLayer;

/// Origins accepted when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:8081"];

/// Default request body limit for uploads, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Headers both accepted on and exposed from cross-origin requests.
const CORS_HEADERS: [HeaderName; 9] = [
    ORIGIN,
    ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
    ACCEPT,
    AUTHORIZATION,
    X_REQUESTED_WITH,
    ACCESS_CONTROL_REQUEST_METHOD,
    ACCESS_CONTROL_REQUEST_HEADERS,
    ACCESS_CONTROL_ALLOW_CREDENTIALS,
];

/// Runtime settings for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Exact origins allowed to call the API with credentials.
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes.
    pub max_upload_bytes: usize,
    /// Parent directory for extraction roots; `None` uses the system temp dir.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            temp_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Build the CORS layer for the configured origins.
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(CORS_HEADERS)
            .expose_headers(CORS_HEADERS))
    }
}
