//! Database-backed session store and the signed cookies that point at it.

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use base64::prelude::*;
use chrono::{Duration, Utc};
use model::entities::session;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "pairhub.sid";
/// Cookie holding the OAuth `state` between redirect and callback.
pub const STATE_COOKIE: &str = "pairhub.oauth_state";

const STATE_COOKIE_MAX_AGE_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Maps a session id to server-side session state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session for `user_id` and returns its id.
    async fn create(&self, user_id: i32) -> Result<String, SessionError>;

    /// Returns the live session with this id. Expired sessions read as `None`.
    async fn load(&self, session_id: &str) -> Result<Option<session::Model>, SessionError>;

    async fn destroy(&self, session_id: &str) -> Result<(), SessionError>;

    /// Deletes every expired session and returns how many were removed.
    async fn purge_expired(&self) -> Result<u64, SessionError>;
}

pub struct DbSessionStore {
    db: DatabaseConnection,
    ttl: Duration,
}

impl DbSessionStore {
    pub fn new(db: DatabaseConnection, ttl: Duration) -> Self {
        Self { db, ttl }
    }
}

#[async_trait]
impl SessionStore for DbSessionStore {
    #[instrument(skip(self))]
    async fn create(&self, user_id: i32) -> Result<String, SessionError> {
        let now = Utc::now();
        let id = generate_token();

        session::ActiveModel {
            id: Set(id.clone()),
            user_id: Set(Some(user_id)),
            expires_at: Set(now + self.ttl),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        debug!("Created session for user {}", user_id);
        Ok(id)
    }

    #[instrument(skip_all)]
    async fn load(&self, session_id: &str) -> Result<Option<session::Model>, SessionError> {
        let Some(found) = session::Entity::find_by_id(session_id.to_string())
            .one(&self.db)
            .await?
        else {
            trace!("Session not found");
            return Ok(None);
        };

        if found.is_expired(Utc::now()) {
            debug!("Session expired at {}, removing it", found.expires_at);
            session::Entity::delete_by_id(found.id).exec(&self.db).await?;
            return Ok(None);
        }

        Ok(Some(found))
    }

    #[instrument(skip_all)]
    async fn destroy(&self, session_id: &str) -> Result<(), SessionError> {
        let result = session::Entity::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await?;
        debug!("Destroyed session, rows affected: {}", result.rows_affected);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self) -> Result<u64, SessionError> {
        let result = session::Entity::delete_many()
            .filter(session::Column::ExpiresAt.lte(Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Cookie attributes that depend on configuration.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Adds the `Secure` attribute (production only)
    pub secure: bool,
    pub session_ttl: Duration,
}

impl CookieSettings {
    pub fn session_cookie(&self, session_id: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.session_ttl.num_seconds()))
            .build()
    }

    pub fn state_cookie(&self, state: String) -> Cookie<'static> {
        Cookie::build((STATE_COOKIE, state))
            .path("/login")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::minutes(STATE_COOKIE_MAX_AGE_MINUTES))
            .build()
    }

    /// Removal cookie for `name`; the path must match the one it was set with.
    pub fn removal(name: &'static str) -> Cookie<'static> {
        let path = if name == STATE_COOKIE { "/login" } else { "/" };
        Cookie::build(name).path(path).build()
    }
}

/// Random 256-bit token, url-safe base64 without padding.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Derives the cookie signing key from `SESSION_SECRET`.
///
/// Without a secret a random key is generated, so sessions do not survive a
/// restart.
pub fn cookie_key(secret: Option<&str>) -> Key {
    match secret {
        Some(secret) => {
            let digest = Sha256::digest(secret.as_bytes());
            Key::derive_from(digest.as_slice())
        }
        None => {
            warn!("SESSION_SECRET not set; using a random key, sessions will not survive restarts");
            Key::generate()
        }
    }
}
