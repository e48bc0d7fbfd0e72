use async_trait::async_trait;

use super::AuthError;

/// Identity details returned by a login provider after a successful callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    /// Stable provider-assigned id (GitHub `node_id`)
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub profile_url: String,
    /// Known addresses, best candidate first
    pub emails: Vec<String>,
}

impl ExternalProfile {
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// A third-party login strategy.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Short name used in routes and logs, e.g. `github`.
    fn name(&self) -> &'static str;

    /// URL to send the browser to, carrying the anti-CSRF `state`.
    fn authorize_url(&self, state: &str) -> String;

    /// Exchanges the callback `code` for the visitor's profile.
    async fn fetch_profile(&self, code: &str) -> Result<ExternalProfile, AuthError>;
}
