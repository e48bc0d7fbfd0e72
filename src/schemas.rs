use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use common::{MeResponse, PostDto, UserDto};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::auth::provider::IdentityProvider;
use crate::auth::session::{CookieSettings, SessionStore};

pub use common::{ApiResponse, ErrorResponse};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Server-side session persistence
    pub sessions: Arc<dyn SessionStore>,
    /// Login provider, `None` when no GitHub client id is configured
    pub identity: Option<Arc<dyn IdentityProvider>>,
    /// Key signing the session and OAuth state cookies
    pub cookie_key: Key,
    pub cookies: CookieSettings,
    /// Built frontend served for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn login_enabled(&self) -> bool {
        self.identity.is_some()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::get_me,
        crate::handlers::users::get_user_by_username,
        crate::handlers::posts::get_posts,
        crate::handlers::posts::create_post,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            MeResponse,
            UserDto,
            PostDto,
            crate::handlers::posts::NewPostRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Current user and public profiles"),
        (name = "posts", description = "Pairing request feed"),
    ),
    info(
        title = "PairHub API",
        description = "Find remote pair programming partners",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
