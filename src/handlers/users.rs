use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use common::{MeResponse, UserDto};
use model::entities::user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, error, instrument, warn};

use crate::auth::extract::MaybeUser;
use crate::helpers::converters::user_to_dto;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Get the logged-in user
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user (null when anonymous)", body = ApiResponse<MeResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn get_me(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
) -> Json<ApiResponse<MeResponse>> {
    debug!("Current user: {:?}", current.as_ref().map(|u| &u.username));

    let response = MeResponse {
        user: current.map(user_to_dto),
        login_enabled: state.login_enabled(),
    };
    Json(ApiResponse::ok(response, "Current user retrieved successfully"))
}

/// Get a public profile by GitHub username
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "users",
    params(
        ("username" = String, Path, description = "GitHub username"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_by_username(
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ErrorResponse>)> {
    match user::Entity::find()
        .filter(user::Column::Username.eq(username.as_str()))
        // A renamed login can leave a stale row holding the name; the newest account wins
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
        .one(&state.db)
        .await
    {
        Ok(Some(found)) => {
            debug!("Found user {} (ID: {})", found.username, found.id);
            Ok(Json(ApiResponse::ok(user_to_dto(found), "User retrieved successfully")))
        }
        Ok(None) => {
            warn!("User '{}' not found", username);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(format!("User '{}' not found", username), "USER_NOT_FOUND")),
            ))
        }
        Err(db_error) => {
            error!("Failed to retrieve user '{}': {}", username, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve user", "DATABASE_ERROR")),
            ))
        }
    }
}
