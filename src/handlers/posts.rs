use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::WithRejection;
use axum_valid::Valid;
use chrono::Utc;
use common::PostDto;
use model::entities::{post, user};
use sea_orm::{
    ActiveModelTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, Func, LikeExpr},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::extract::CurrentUser;
use crate::handlers::ApiRejection;
use crate::helpers::converters::post_to_dto;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Query parameters for the post feed
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PostsQuery {
    /// Search phrase matched against title and body
    pub s: Option<String>,
    /// Page number (1-based)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Posts per page
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

/// Request body for creating a post
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct NewPostRequest {
    /// Short headline, e.g. "Looking for someone to pair on a Rust CLI"
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    /// What you want to work on and when you are available
    #[validate(length(max = 5000))]
    pub body: String,
}

const LIKE_ESCAPE: char = '\\';

/// Escapes LIKE wildcards so the phrase matches literally.
fn escape_like(phrase: &str) -> String {
    let mut escaped = String::with_capacity(phrase.len());
    for c in phrase.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring match on title or body.
fn search_condition(phrase: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&phrase.to_lowercase()));
    let like = || LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE);
    Condition::any()
        .add(Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Title)))).like(like()))
        .add(Expr::expr(Func::lower(Expr::col((post::Entity, post::Column::Body)))).like(like()))
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    params(PostsQuery),
    responses(
        (status = 200, description = "Posts retrieved successfully", body = ApiResponse<Vec<PostDto>>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_posts(
    WithRejection(Valid(Query(query)), _): WithRejection<Valid<Query<PostsQuery>>, ApiRejection>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PostDto>>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_posts function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    let mut select = post::Entity::find().find_also_related(user::Entity);
    if let Some(phrase) = query.s.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        debug!("Filtering posts by phrase: {}", phrase);
        select = select.filter(search_condition(phrase));
    }

    match select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await
    {
        Ok(rows) => {
            let posts: Vec<PostDto> = rows
                .into_iter()
                .filter_map(|(post, author)| match author {
                    Some(author) => Some(post_to_dto(post, author)),
                    None => {
                        warn!("Post {} has no author, skipping", post.id);
                        None
                    }
                })
                .collect();

            info!("Successfully retrieved {} posts", posts.len());
            Ok(Json(ApiResponse::ok(posts, "Posts retrieved successfully")))
        }
        Err(e) => {
            error!("Failed to retrieve posts: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to retrieve posts", "DATABASE_ERROR")),
            ))
        }
    }
}

/// Create a post as the logged-in user
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = NewPostRequest,
    responses(
        (status = 201, description = "Post created successfully", body = ApiResponse<PostDto>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Login required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    WithRejection(Valid(Json(request)), _): WithRejection<Valid<Json<NewPostRequest>>, ApiRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PostDto>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Creating post for user {}", author.username);
    let title = request.title.trim();
    if title.is_empty() {
        warn!("Rejected post with blank title");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Title must not be blank", "VALIDATION_ERROR")),
        ));
    }

    let new_post = post::ActiveModel {
        author_id: Set(author.id),
        title: Set(title.to_string()),
        body: Set(request.body.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_post.insert(&state.db).await {
        Ok(created) => {
            info!("Post created with ID: {}", created.id);
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(post_to_dto(created, author), "Post created successfully")),
            ))
        }
        Err(e) => {
            error!("Failed to create post: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to create post", "DATABASE_ERROR")),
            ))
        }
    }
}
