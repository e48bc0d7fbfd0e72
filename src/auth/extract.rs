//! Request extractors that turn the session cookie into a user.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::Json,
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use model::entities::user;
use sea_orm::EntityTrait;
use tracing::{error, trace, warn};

use super::session::{SESSION_COOKIE, SessionError};
use crate::schemas::{AppState, ErrorResponse};

/// The logged-in user, or `None` for anonymous visitors.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<user::Model>);

/// The logged-in user; rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

/// Resolves the session cookie in `jar` to a user.
pub async fn resolve_user(
    state: &AppState,
    jar: &SignedCookieJar<Key>,
) -> Result<Option<user::Model>, SessionError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        trace!("No session cookie");
        return Ok(None);
    };

    let Some(session) = state.sessions.load(cookie.value()).await? else {
        return Ok(None);
    };

    let Some(user_id) = session.user_id else {
        return Ok(None);
    };

    let found = user::Entity::find_by_id(user_id).one(&state.db).await?;
    if found.is_none() {
        warn!("Session points at missing user {}", user_id);
    }
    Ok(found)
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        match resolve_user(state, &jar).await {
            Ok(found) => Ok(MaybeUser(found)),
            Err(e) => {
                error!("Failed to resolve session: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to load session", "DATABASE_ERROR")),
                ))
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(CurrentUser(user)),
            MaybeUser(None) => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Login required", "UNAUTHORIZED")),
            )),
        }
    }
}
