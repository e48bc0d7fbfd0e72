use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use chrono::Utc;
use model::entities::user;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::auth::{
    AuthError,
    provider::ExternalProfile,
    session::{CookieSettings, SESSION_COOKIE, STATE_COOKIE, generate_token},
};
use crate::schemas::{AppState, ErrorResponse};

/// Where a failed login lands.
const FAILURE_REDIRECT: &str = "/";
const WELCOME_REDIRECT: &str = "/?welcome";

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Query string GitHub appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when the user declined the authorization
    pub error: Option<String>,
}

/// Looks up a user by external identity id, creating one from `profile` when
/// none exists. Existing records are returned unchanged.
///
/// Returns the user and whether it was created by this call.
pub async fn find_or_create_user(
    db: &DatabaseConnection,
    profile: &ExternalProfile,
) -> Result<(user::Model, bool), DbErr> {
    trace!("Looking up user by external id {}", profile.id);
    if let Some(existing) = find_by_external_id(db, &profile.id).await? {
        debug!("Found existing user {} (ID: {})", existing.username, existing.id);
        return Ok((existing, false));
    }

    let new_user = user::ActiveModel {
        user_id: Set(profile.id.clone()),
        username: Set(profile.username.clone()),
        name: Set(profile.display_name.clone()),
        bio: Set(profile.bio.clone()),
        avatar_url: Set(profile.avatar_url.clone()),
        github_url: Set(profile.profile_url.clone()),
        email: Set(profile.primary_email().map(str::to_string)),
        seen_welcome_modal: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(created) => {
            info!("Created user {} (ID: {})", created.username, created.id);
            Ok((created, true))
        }
        Err(insert_error) => {
            // A concurrent callback for the same identity may have won the race
            match find_by_external_id(db, &profile.id).await? {
                Some(existing) => {
                    debug!("User {} was created concurrently", existing.username);
                    Ok((existing, false))
                }
                None => Err(insert_error),
            }
        }
    }
}

async fn find_by_external_id(
    db: &DatabaseConnection,
    external_id: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::UserId.eq(external_id))
        .one(db)
        .await
}

/// Checks the callback against the state issued at login and returns the code.
fn verify_callback(query: &CallbackQuery, expected_state: Option<&str>) -> Result<String, AuthError> {
    if let Some(reason) = &query.error {
        return Err(AuthError::Provider(format!("authorization denied: {}", reason)));
    }

    match (query.state.as_deref(), expected_state) {
        (Some(received), Some(expected)) if received == expected => {}
        _ => return Err(AuthError::StateMismatch),
    }

    query.code.clone().filter(|c| !c.is_empty()).ok_or(AuthError::MissingCode)
}

fn database_error(context: &str, e: impl std::fmt::Display) -> HandlerError {
    error!("{}: {}", context, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(context, "DATABASE_ERROR")),
    )
}

fn login_disabled() -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Login is not configured", "LOGIN_DISABLED")),
    )
}

/// `GET /login/github`: redirects the browser to GitHub.
#[instrument(skip_all)]
pub async fn login_github(
    State(state): State<AppState>,
    jar: SignedCookieJar<Key>,
) -> Result<(SignedCookieJar<Key>, Redirect), HandlerError> {
    let Some(identity) = state.identity.as_ref() else {
        return Err(login_disabled());
    };

    let oauth_state = generate_token();
    let url = identity.authorize_url(&oauth_state);
    debug!("Redirecting to {} authorization", identity.name());

    let jar = jar.add(state.cookies.state_cookie(oauth_state));
    Ok((jar, Redirect::to(&url)))
}

/// `GET /login/github/callback`: completes the login.
///
/// Any OAuth failure sends the visitor back to `/` without a session. A new
/// user, or one who has not seen the welcome modal yet, lands on `/?welcome`.
#[instrument(skip_all)]
pub async fn github_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar<Key>,
    Query(query): Query<CallbackQuery>,
) -> Result<(SignedCookieJar<Key>, Redirect), HandlerError> {
    let Some(identity) = state.identity.clone() else {
        return Err(login_disabled());
    };

    let expected_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.remove(CookieSettings::removal(STATE_COOKIE));

    let code = match verify_callback(&query, expected_state.as_deref()) {
        Ok(code) => code,
        Err(e) => {
            warn!("Rejected login callback: {}", e);
            return Ok((jar, Redirect::to(FAILURE_REDIRECT)));
        }
    };

    let profile = match identity.fetch_profile(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("Login via {} failed: {}", identity.name(), e);
            return Ok((jar, Redirect::to(FAILURE_REDIRECT)));
        }
    };

    let (user, created) = find_or_create_user(&state.db, &profile)
        .await
        .map_err(|e| database_error("Failed to look up or create user", e))?;

    // Never reuse a session id that existed before login
    if let Some(previous) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.sessions.destroy(previous.value()).await {
            warn!("Failed to destroy previous session: {}", e);
        }
    }

    let session_id = state
        .sessions
        .create(user.id)
        .await
        .map_err(|e| database_error("Failed to create session", e))?;
    let jar = jar.add(state.cookies.session_cookie(session_id));

    info!("User {} logged in (new: {})", user.username, created);

    if user.seen_welcome_modal {
        return Ok((jar, Redirect::to("/")));
    }

    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    active.seen_welcome_modal = Set(true);
    if let Err(e) = active.update(&state.db).await {
        // The welcome redirect still goes out; worst case the modal shows twice
        error!("Failed to mark welcome modal as seen for user {}: {}", user_id, e);
    }

    Ok((jar, Redirect::to(WELCOME_REDIRECT)))
}

/// `GET /logout`: ends the session and returns to the landing page.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar<Key>,
) -> (SignedCookieJar<Key>, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.sessions.destroy(cookie.value()).await {
            Ok(()) => info!("User logged out"),
            Err(e) => error!("Failed to destroy session on logout: {}", e),
        }
    }

    let jar = jar.remove(CookieSettings::removal(SESSION_COOKIE));
    (jar, Redirect::to("/"))
}
