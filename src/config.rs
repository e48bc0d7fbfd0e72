use anyhow::Result;
use sea_orm::Database;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{
    self,
    session::{CookieSettings, DbSessionStore, cookie_key},
};
use crate::schemas::AppState;

/// Deployment environment, read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_node_env(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Resolved runtime configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Built frontend to serve; `None` serves the API only.
    pub static_dir: Option<PathBuf>,
    pub environment: Environment,
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,
    pub session_secret: Option<String>,
    pub session_ttl: chrono::Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://pairhub.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            static_dir: None,
            environment: Environment::Development,
            github_client_id: None,
            github_client_secret: None,
            session_secret: None,
            session_ttl: chrono::Duration::days(14),
        }
    }
}

// Secrets never reach the logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redacted(value: &Option<String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }

        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("static_dir", &self.static_dir)
            .field("environment", &self.environment)
            .field("github_client_id", &self.github_client_id)
            .field("github_client_secret", &redacted(&self.github_client_secret))
            .field("session_secret", &redacted(&self.session_secret))
            .field("session_ttl_hours", &self.session_ttl.num_hours())
            .finish()
    }
}

/// Initialize application state: database pool, session store, cookie key
/// and, when configured, the GitHub login provider.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    let sessions = Arc::new(DbSessionStore::new(db.clone(), config.session_ttl));
    let identity = auth::setup_github_login(config);

    Ok(AppState {
        db,
        sessions,
        identity,
        cookie_key: cookie_key(config.session_secret.as_deref()),
        cookies: CookieSettings {
            secure: config.environment.is_production(),
            session_ttl: config.session_ttl,
        },
        static_dir: config.static_dir.clone().filter(|dir| {
            let exists = dir.is_dir();
            if !exists {
                tracing::warn!("Static directory {} not found; serving the API only", dir.display());
            }
            exists
        }),
    })
}
