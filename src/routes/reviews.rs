use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{
        CastVoteRequest, CreateReviewRequest, ResponseData, ReviewDetail, ReviewImageList,
        ReviewImageRequest, ReviewList, ReviewResponseRequest, VoteData,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ReviewImage,
    response::ApiResponse,
    routes::params::ReviewListQuery,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews))
        .route("/", post(create_review))
        .route("/{id}", get(get_review))
        .route("/{id}/votes", post(cast_vote))
        .route("/{id}/response", post(record_response))
        .route("/{id}/helpful", post(increment_helpful))
        .route("/{id}/view", post(increment_views))
        .route("/{id}/images", post(attach_image))
        .route("/{id}/images", get(list_images))
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("category_id" = Option<Uuid>, Query, description = "Filter by category"),
        ("rating" = Option<i32>, Query, description = "Filter by rating"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "List approved reviews", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Create review", body = ApiResponse<ReviewDetail>),
        (status = 400, description = "Validation error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewDetail>>> {
    let resp = review_service::create_review(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Get review", body = ApiResponse<ReviewDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewDetail>>> {
    let resp = review_service::get_review(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/votes",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = ApiResponse<VoteData>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "User already voted on this review"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CastVoteRequest>,
) -> AppResult<Json<ApiResponse<VoteData>>> {
    let resp = review_service::cast_vote(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/response",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = ReviewResponseRequest,
    responses(
        (status = 201, description = "Response recorded (admin only)", body = ApiResponse<ResponseData>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Review already has a response"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn record_response(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewResponseRequest>,
) -> AppResult<Json<ApiResponse<ResponseData>>> {
    let resp = review_service::record_response(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/helpful",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Increment helpful counter", body = ApiResponse<ReviewDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Reviews"
)]
pub async fn increment_helpful(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewDetail>>> {
    let resp = review_service::increment_helpful(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/view",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Increment view counter", body = ApiResponse<ReviewDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Reviews"
)]
pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewDetail>>> {
    let resp = review_service::increment_views(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = ReviewImageRequest,
    responses(
        (status = 201, description = "Attach image (author only)", body = ApiResponse<ReviewImage>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn attach_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewImageRequest>,
) -> AppResult<Json<ApiResponse<ReviewImage>>> {
    let resp = review_service::attach_image(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reviews/{id}/images",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "List images for review", body = ApiResponse<ReviewImageList>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Reviews"
)]
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewImageList>>> {
    let resp = review_service::list_images(&state, id).await?;
    Ok(Json(resp))
}
