//! GitHub login and database-backed sessions.
//!
//! [`setup_github_login`] decides at startup whether login is available. The
//! handlers in `crate::handlers::auth` drive the OAuth redirect/callback, and
//! the extractors in [`extract`] resolve the session cookie back into a user.

pub mod extract;
pub mod github;
pub mod provider;
pub mod session;

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{AppConfig, Environment};
use github::GithubOAuth;
use provider::IdentityProvider;

const DEV_CALLBACK_URL: &str = "http://localhost:3000/login/github/callback";
const PROD_CALLBACK_URL: &str = "https://pairhub.io/login/github/callback";

/// Errors raised while authenticating a visitor.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider rejected the request or returned garbage
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("HTTP error talking to identity provider: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OAuth state does not match the one issued at login")]
    StateMismatch,

    #[error("Callback is missing the authorization code")]
    MissingCode,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// OAuth callback URL registered with GitHub for `environment`.
pub fn callback_url(environment: Environment) -> &'static str {
    if environment.is_production() {
        PROD_CALLBACK_URL
    } else {
        DEV_CALLBACK_URL
    }
}

/// Builds the GitHub login provider, or returns `None` (and warns) when no
/// client id is configured. A missing id never fails startup.
pub fn setup_github_login(config: &AppConfig) -> Option<Arc<dyn IdentityProvider>> {
    let Some(client_id) = config.github_client_id.clone() else {
        warn!("GitHub client ID not passed; login won't work.");
        return None;
    };

    if config.github_client_secret.is_none() {
        warn!("GitHub client secret not passed; token exchange will be rejected by GitHub");
    }

    let callback = callback_url(config.environment);
    info!("GitHub login enabled, callback URL: {}", callback);

    Some(Arc::new(GithubOAuth::new(
        client_id,
        config.github_client_secret.clone().unwrap_or_default(),
        callback.to_string(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_client_id_disables_login() {
        let config = AppConfig::default();
        assert!(setup_github_login(&config).is_none());
    }

    #[test]
    fn client_id_enables_login() {
        let config = AppConfig {
            github_client_id: Some("client-123".to_string()),
            github_client_secret: Some("secret".to_string()),
            ..Default::default()
        };
        let provider = setup_github_login(&config).expect("login should be enabled");
        let url = provider.authorize_url("xyz");

        assert!(url.contains("client_id=client-123"));
        assert!(url.contains(&urlencoding::encode(DEV_CALLBACK_URL).into_owned()));
    }

    #[test]
    fn production_uses_public_callback() {
        assert_eq!(callback_url(Environment::Production), PROD_CALLBACK_URL);
        assert_eq!(callback_url(Environment::Development), DEV_CALLBACK_URL);
    }
}
