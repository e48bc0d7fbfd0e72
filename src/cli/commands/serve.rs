use anyhow::Result;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace, warn};

use crate::auth::session::SessionStore;
use crate::config::{AppConfig, initialize_app_state};
use crate::router::create_router;

/// How often expired sessions are removed from the database.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub async fn serve(config: AppConfig) -> Result<()> {
    trace!("Entering serve function");
    info!("PairHub starting up");
    debug!("Configuration: {:?}", config);

    let state = match initialize_app_state(&config).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => trace!("No expired sessions to purge"),
                Ok(purged) => info!("Purged {} expired sessions", purged),
                Err(e) => warn!("Failed to purge expired sessions: {}", e),
            }
        }
    });

    let app = create_router(state);
    debug!("Router created successfully");

    info!("Starting server on {}", config.bind_address);
    let listener = match TcpListener::bind(&config.bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", config.bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", config.bind_address, e);
            return Err(e.into());
        }
    };

    info!("PairHub running on http://{}", config.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
