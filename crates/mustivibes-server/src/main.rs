mod cleanup;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use chrono::{Duration, FixedOffset};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use mustivibes_api::auth::{AppState, AppStateInner};
use mustivibes_backend::BackendClient;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mustivibes=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let config = ServerConfig::from_env()?;
    if config.has_placeholder_secret() {
        eprintln!("FATAL: MUSTIVIBES_JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Console tokens would be forgeable.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    let utc_offset = FixedOffset::east_opt(config.utc_offset_minutes * 60)
        .ok_or_else(|| anyhow::anyhow!("invalid UTC offset"))?;

    // Init database and backend client
    let db = mustivibes_db::Database::open(&config.db_path)?;
    let backend = BackendClient::new(&config.backend)?;
    info!("Core API: {}", config.backend.core_url);
    info!("Social API: {}", config.backend.social_url);

    let state: AppState = Arc::new(AppStateInner {
        db,
        backend,
        jwt_secret: config.jwt_secret.clone(),
        session_ttl: Duration::hours(config.session_ttl_hours),
        utc_offset,
    });

    // Background session purge (runs every hour)
    tokio::spawn(cleanup::run_session_purge_loop(state.clone(), 3600));

    let allow_origin = match &config.allowed_origin {
        Some(origin) => AllowOrigin::exact(HeaderValue::from_str(origin)?),
        None => {
            warn!("MUSTIVIBES_ALLOWED_ORIGIN unset; accepting requests from any origin");
            AllowOrigin::any()
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(false);

    let app = mustivibes_api::build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Mustivibes admin console listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Could not install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
