use crate::handlers::{
    auth::{github_callback, login_github, logout},
    health::health_check,
    posts::{create_post, get_posts},
    users::{get_me, get_user_by_username},
};
use crate::schemas::{ApiDoc, AppState, ErrorResponse};
use axum::{
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::debug;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Login routes. Without a GitHub client id the login handlers answer 404
/// themselves, so these paths never reach the frontend fallback.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/github", get(login_github))
        .route("/login/github/callback", get(github_callback))
        .route("/logout", get(logout))
}

async fn api_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Unknown API endpoint", "NOT_FOUND")),
    )
}

/// JSON API under `/api`; unknown API paths answer with a JSON 404.
fn api_routes() -> Router<AppState> {
    Router::new()
        // Users
        .route("/v1/me", get(get_me))
        .route("/v1/users/:username", get(get_user_by_username))
        // Posts
        .route("/v1/posts", get(get_posts).post(create_post))
        .fallback(api_not_found)
}

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(auth_routes());

    if !state.login_enabled() {
        debug!("Login disabled; login routes answer 404");
    }

    // Client-side routes resolve to index.html
    if let Some(dir) = &state.static_dir {
        debug!("Serving frontend from {}", dir.display());
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
