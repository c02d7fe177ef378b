mod api;
mod middleware;

use std::sync::Arc;

use misima_storefront::StorefrontClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, CatalogSettings};
use crate::middleware::RateLimitState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(misima_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = StorefrontClient::from_config(&config)?;
    tracing::info!(
        env = %config.env,
        endpoint = client.endpoint(),
        bind_addr = %config.bind_addr,
        "starting storefront service"
    );

    let app = build_app(
        AppState {
            client,
            catalog: CatalogSettings::from_config(&config),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
