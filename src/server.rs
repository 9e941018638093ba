//! Local preview server for the static site.
//!
//! Serves the site directory as-is, plus the behavior settings the browser
//! binding reads at startup and a health check.

use axum::routing::get;
use axum::{Json, Router};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{PreviewConfig, SITE_CONFIG_PATH, SiteConfig};

/// Router serving `preview.site_dir` with `site` published as JSON.
pub fn app(preview: &PreviewConfig, site: SiteConfig) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            SITE_CONFIG_PATH,
            get(move || {
                let site = site.clone();
                async move { Json(site) }
            }),
        )
        .fallback_service(ServeDir::new(&preview.site_dir).append_index_html_on_directories(true))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Bind `0.0.0.0:{port}` and serve until the process exits.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot be bound or the server fails.
pub async fn serve(preview: PreviewConfig, site: SiteConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", preview.port)).await?;
    tracing::info!(port = preview.port, site_dir = %preview.site_dir.display(), "portfolio preview listening");
    axum::serve(listener, app(&preview, site)).await
}
