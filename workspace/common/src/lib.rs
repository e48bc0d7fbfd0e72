//! Common transport-layer types shared between backend and frontend.
//! These structs mirror the backend handlers' request/response payloads
//! so the frontend can deserialize API responses without duplicating shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
        }
    }
}

// ===================== Users =====================

/// Public view of a PairHub member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub github_url: String,
}

impl UserDto {
    /// Name to show in the UI, falling back to the GitHub login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Response of `GET /api/v1/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Default)]
pub struct MeResponse {
    /// The logged-in user, `None` for anonymous visitors.
    pub user: Option<UserDto>,
    /// False when the server runs without a GitHub client id.
    pub login_enabled: bool,
}

// ===================== Posts =====================

/// A pairing request as listed in the feed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: UserDto,
}

/// Request body for creating a post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}
