//! Film API - serves films behind bearer-token authentication.
//!
//! This binary opens the database, prepares the schema, and starts the HTTP
//! server.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use film_api::{
    config::Config,
    films::{FilmRepository, NewFilm},
    server::{create_router, AppState, RouterConfig, SharedVerifier},
    storage::Storage,
    JwtVerifier,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Issuer: {}", config.issuer);
    info!("  Audience: {}", config.audience);
    info!("  Redirect URI: {}", config.redirect_uri);
    info!("  DB pool size: {}", config.db_max_connections);

    // Open the database
    let storage = match Storage::open(&config.storage()).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("{}", e);
            error!("  Check that the database at DATABASE_URL is reachable");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = storage.migrate().await {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let films = FilmRepository::new(storage.clone());
    if config.no_seed {
        info!("Skipping seed film");
    } else if let Err(e) = films.seed(NewFilm::default()).await {
        error!("Failed to seed film: {}", e);
        return ExitCode::FAILURE;
    }

    // Build the router
    let verifier: SharedVerifier = Arc::new(JwtVerifier::new(config.claim_expectations()));
    let state = AppState::new(films, config.login());
    let router = create_router(state, verifier, build_router_config(&config));

    // Bind and serve
    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  curl http://{}/health", addr);
    info!("  curl -H 'Authorization: Bearer <token>' http://{}/api/films/", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = storage.close().await {
        warn!("{}", e);
    }

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "film_api=debug,tower_http=debug,sqlx=info"
    } else {
        "film_api=info,tower_http=info,sqlx=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
