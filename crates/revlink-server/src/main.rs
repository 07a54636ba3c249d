mod api;
mod middleware;

use std::{net::SocketAddr, sync::Arc};

use revlink_places::PlaceResolver;
use revlink_reviews::MemoryReviewStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = revlink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let resolver = PlaceResolver::from_config(&config)?;
    if resolver.has_places_credential() {
        tracing::info!("places credential configured; search URLs can be resolved");
    } else {
        tracing::warn!(
            "GOOGLE_API_KEY not set; only URLs carrying a place identifier will resolve"
        );
    }

    let app = build_app(
        AppState {
            resolver: Arc::new(resolver),
            reviews: Arc::new(MemoryReviewStore::new()),
            public_base_url: Arc::from(config.public_base_url.as_str()),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    tracing::info!(
        bind_addr = %config.bind_addr,
        public_base_url = %config.public_base_url,
        "starting revlink-server"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
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
