use std::process::ExitCode;

use portfolio::config::{PreviewConfig, SiteConfig};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let (preview, site) = match (PreviewConfig::from_env(), SiteConfig::from_env()) {
        (Ok(preview), Ok(site)) => (preview, site),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if !preview.site_dir.is_dir() {
        tracing::warn!(site_dir = %preview.site_dir.display(), "site directory missing, static files will 404");
    }

    match portfolio::server::serve(preview, site).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "preview server failed");
            ExitCode::FAILURE
        }
    }
}
