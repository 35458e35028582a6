use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reviews::{
        CastVoteRequest, CreateReviewRequest, ResponseData, ReviewDetail, ReviewImageList,
        ReviewImageRequest, ReviewList, ReviewResponseRequest, VoteData,
    },
    entity::{
        categories::Entity as Categories,
        review_images::{
            ActiveModel as ImageActive, Column as ImageCol, Entity as ReviewImages,
            Model as ImageModel,
        },
        review_responses::{ActiveModel as ResponseActive, Model as ResponseModel},
        review_votes::{ActiveModel as VoteActive, Model as VoteModel},
        reviews::{
            ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews,
            Model as ReviewModel,
        },
    },
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::{AuthUser, ensure_admin},
    models::{
        Review, ReviewImage, ReviewResponse, ReviewStatus, ReviewVote, VoteType, star_display,
    },
    response::{ApiResponse, Meta},
    routes::params::{ReviewListQuery, SortOrder},
    state::AppState,
};

pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<ReviewDetail>> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".into()));
    }
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".into(),
        ));
    }
    if let Some(category_id) = payload.category_id {
        let category = Categories::find_by_id(category_id).one(&state.orm).await?;
        if category.is_none() {
            return Err(AppError::BadRequest("Category does not exist".into()));
        }
    }

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        author_id: Set(user.user_id),
        category_id: Set(payload.category_id),
        title: Set(payload.title),
        content: Set(payload.content),
        rating: Set(payload.rating),
        product_name: Set(payload.product_name),
        pros: Set(payload.pros),
        cons: Set(payload.cons),
        would_recommend: Set(payload.would_recommend),
        status: Set(ReviewStatus::Pending.as_str().into()),
        is_featured: Set(false),
        helpful_count: Set(0),
        views_count: Set(0),
        reviewed_at: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_created",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review created",
        detail_from_entity(review),
        Some(Meta::empty()),
    ))
}

/// Public listing shows approved reviews only.
pub async fn list_reviews(
    state: &AppState,
    query: ReviewListQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition =
        Condition::all().add(ReviewCol::Status.eq(ReviewStatus::Approved.as_str()));

    if let Some(category_id) = query.category_id {
        condition = condition.add(ReviewCol::CategoryId.eq(category_id));
    }
    if let Some(rating) = query.rating {
        condition = condition.add(ReviewCol::Rating.eq(rating));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Reviews::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(ReviewCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(ReviewCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(detail_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(meta),
    ))
}

pub async fn get_review(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ReviewDetail>> {
    let review = Reviews::find_by_id(id).one(&state.orm).await?;
    let review = match review {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Review",
        detail_from_entity(review),
        None,
    ))
}

pub async fn cast_vote(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: CastVoteRequest,
) -> AppResult<ApiResponse<VoteData>> {
    let vote_type = VoteType::parse(&payload.vote_type)
        .ok_or_else(|| AppError::BadRequest("Invalid vote type".into()))?;

    let review = Reviews::find_by_id(review_id).one(&state.orm).await?;
    if review.is_none() {
        return Err(AppError::NotFound);
    }

    let insert = VoteActive {
        id: Set(Uuid::new_v4()),
        review_id: Set(review_id),
        user_id: Set(user.user_id),
        vote_type: Set(vote_type.as_str().into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;
    let vote = match insert {
        Ok(v) => v,
        Err(err) => return Err(conflict_on_unique(err, "User already voted on this review")),
    };

    Ok(ApiResponse::success(
        "Vote recorded",
        VoteData {
            vote: vote_from_entity(vote),
        },
        Some(Meta::empty()),
    ))
}

/// At most one response per review; the unique constraint backs this.
pub async fn record_response(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: ReviewResponseRequest,
) -> AppResult<ApiResponse<ResponseData>> {
    ensure_admin(user)?;
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".into()));
    }

    let review = Reviews::find_by_id(review_id).one(&state.orm).await?;
    if review.is_none() {
        return Err(AppError::NotFound);
    }

    let insert = ResponseActive {
        id: Set(Uuid::new_v4()),
        review_id: Set(review_id),
        responder_id: Set(user.user_id),
        content: Set(payload.content),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await;
    let response = match insert {
        Ok(r) => r,
        Err(err) => return Err(conflict_on_unique(err, "Review already has a response")),
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_response_recorded",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Response recorded",
        ResponseData {
            response: response_from_entity(response),
        },
        Some(Meta::empty()),
    ))
}

pub async fn increment_helpful(state: &AppState, review_id: Uuid) -> AppResult<ApiResponse<ReviewDetail>> {
    increment_counter(state, review_id, ReviewCol::HelpfulCount).await
}

pub async fn increment_views(state: &AppState, review_id: Uuid) -> AppResult<ApiResponse<ReviewDetail>> {
    increment_counter(state, review_id, ReviewCol::ViewsCount).await
}

/// Single atomic column update; no read-modify-write on the counter.
async fn increment_counter(
    state: &AppState,
    review_id: Uuid,
    column: ReviewCol,
) -> AppResult<ApiResponse<ReviewDetail>> {
    let result = Reviews::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .filter(ReviewCol::Id.eq(review_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    let review = Reviews::find_by_id(review_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Counter updated",
        detail_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn attach_image(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: ReviewImageRequest,
) -> AppResult<ApiResponse<ReviewImage>> {
    if payload.image.trim().is_empty() {
        return Err(AppError::BadRequest("Image reference is required".into()));
    }

    let review = Reviews::find_by_id(review_id).one(&state.orm).await?;
    let review = match review {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    if review.author_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let image = ImageActive {
        id: Set(Uuid::new_v4()),
        review_id: Set(review_id),
        image: Set(payload.image),
        caption: Set(payload.caption),
        uploaded_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Image attached",
        image_from_entity(image),
        Some(Meta::empty()),
    ))
}

pub async fn list_images(
    state: &AppState,
    review_id: Uuid,
) -> AppResult<ApiResponse<ReviewImageList>> {
    let review = Reviews::find_by_id(review_id).one(&state.orm).await?;
    if review.is_none() {
        return Err(AppError::NotFound);
    }

    let items = ReviewImages::find()
        .filter(ImageCol::ReviewId.eq(review_id))
        .order_by_asc(ImageCol::UploadedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(image_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Images",
        ReviewImageList { items },
        Some(Meta::empty()),
    ))
}

fn detail_from_entity(model: ReviewModel) -> ReviewDetail {
    let stars = star_display(model.rating);
    ReviewDetail {
        review: review_from_entity(model),
        stars,
    }
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        author_id: model.author_id,
        category_id: model.category_id,
        title: model.title,
        content: model.content,
        rating: model.rating,
        product_name: model.product_name,
        pros: model.pros,
        cons: model.cons,
        would_recommend: model.would_recommend,
        status: model.status,
        is_featured: model.is_featured,
        helpful_count: model.helpful_count,
        views_count: model.views_count,
        reviewed_at: model.reviewed_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn vote_from_entity(model: VoteModel) -> ReviewVote {
    ReviewVote {
        id: model.id,
        review_id: model.review_id,
        user_id: model.user_id,
        vote_type: model.vote_type,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn response_from_entity(model: ResponseModel) -> ReviewResponse {
    ReviewResponse {
        id: model.id,
        review_id: model.review_id,
        responder_id: model.responder_id,
        content: model.content,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn image_from_entity(model: ImageModel) -> ReviewImage {
    ReviewImage {
        id: model.id,
        review_id: model.review_id,
        image: model.image,
        caption: model.caption,
        uploaded_at: model.uploaded_at.with_timezone(&Utc),
    }
}
