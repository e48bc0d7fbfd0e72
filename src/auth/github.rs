//! GitHub OAuth web application flow.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::AuthError;
use super::provider::{ExternalProfile, IdentityProvider};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE_URL: &str = "https://api.github.com";
const SCOPES: &str = "user:email";
const CLIENT_USER_AGENT: &str = concat!("pairhub/", env!("CARGO_PKG_VERSION"));

pub struct GithubOAuth {
    client_id: String,
    client_secret: String,
    callback_url: String,
    authorize_url: String,
    token_url: String,
    api_base_url: String,
    http: reqwest::Client,
}

impl GithubOAuth {
    pub fn new(client_id: String, client_secret: String, callback_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            callback_url,
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Points the client at a GitHub Enterprise (or mock) host.
    pub fn with_endpoints(mut self, authorize_url: &str, token_url: &str, api_base_url: &str) -> Self {
        self.authorize_url = authorize_url.to_string();
        self.token_url = token_url.to_string();
        self.api_base_url = api_base_url.trim_end_matches('/').to_string();
        self
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .json(&serde_json::json!({
                "client_id": self.client_id,
                "client_secret": self.client_secret,
                "code": code,
                "redirect_uri": self.callback_url,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "Token exchange failed (HTTP {})",
                response.status()
            )));
        }

        // GitHub reports a bad code with 200 and an `error` field
        let token: TokenResponse = response.json().await?;
        match token {
            TokenResponse { access_token: Some(access_token), .. } => Ok(access_token),
            TokenResponse { error, error_description, .. } => Err(AuthError::Provider(format!(
                "Token exchange rejected: {} ({})",
                error.unwrap_or_else(|| "unknown_error".to_string()),
                error_description.unwrap_or_default()
            ))),
        }
    }

    async fn get_json<T>(&self, path: &str, access_token: &str) -> Result<T, AuthError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.api_base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Provider(format!(
                "GET {} failed (HTTP {})",
                path,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl IdentityProvider for GithubOAuth {
    fn name(&self) -> &'static str {
        "github"
    }

    fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.callback_url.as_str()),
            ("scope", SCOPES),
            ("state", state),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.authorize_url, query)
    }

    #[instrument(skip(self, code))]
    async fn fetch_profile(&self, code: &str) -> Result<ExternalProfile, AuthError> {
        let access_token = self.exchange_code(code).await?;
        debug!("Exchanged authorization code for an access token");

        let user: GithubUser = self.get_json("/user", &access_token).await?;

        let mut emails: Vec<String> = user.email.clone().into_iter().collect();
        if emails.is_empty() {
            // Private addresses are only visible through the emails endpoint
            match self.get_json::<Vec<GithubEmail>>("/user/emails", &access_token).await {
                Ok(listed) => emails = rank_emails(listed),
                Err(e) => warn!("Could not list emails for {}: {}", user.login, e),
            }
        }

        Ok(user.into_profile(emails))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    node_id: String,
    login: String,
    name: Option<String>,
    bio: Option<String>,
    avatar_url: String,
    html_url: String,
    email: Option<String>,
}

impl GithubUser {
    fn into_profile(self, emails: Vec<String>) -> ExternalProfile {
        ExternalProfile {
            id: self.node_id,
            username: self.login,
            display_name: self.name,
            bio: self.bio,
            avatar_url: self.avatar_url,
            profile_url: self.html_url,
            emails,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

/// Verified addresses only, primary first.
fn rank_emails(mut listed: Vec<GithubEmail>) -> Vec<String> {
    listed.retain(|e| e.verified);
    listed.sort_by_key(|e| !e.primary);
    listed.into_iter().map(|e| e.email).collect()
}
