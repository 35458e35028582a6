use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    dto::products::BulkActiveRequest,
    dto::reviews::{ModerateReviewRequest, ReviewDetail},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::{Column as ProdCol, Entity as Products},
        reviews::{ActiveModel as ReviewActive, Entity as Reviews, Model as ReviewModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult, conflict_on_fk},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, OrderStatus, Review, ReviewStatus, star_display},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(order_from_entity);
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let data = OrderWithItems { order, items };
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

/// Direct status assignment. Membership of the enumeration is the only
/// check; the cancel guard applies solely to the cancel operation.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    if OrderStatus::parse(&payload.status).is_none() {
        return Err(AppError::BadRequest("Invalid order status".into()));
    }

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn moderate_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ModerateReviewRequest,
) -> AppResult<ApiResponse<ReviewDetail>> {
    ensure_admin(user)?;
    let status = ReviewStatus::parse(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid review status".into()))?;

    let existing = Reviews::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: ReviewActive = existing.into();
    active.status = Set(status.as_str().into());
    active.reviewed_at = Set(Some(Utc::now().into()));
    active.updated_at = Set(Utc::now().into());
    let review = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_moderated",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id, "status": review.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review moderated",
        detail_from_entity(review),
        Some(Meta::empty()),
    ))
}

/// Bulk activate/deactivate over the given product ids.
pub async fn set_products_active(
    state: &AppState,
    user: &AuthUser,
    payload: BulkActiveRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    if payload.product_ids.is_empty() {
        return Err(AppError::BadRequest("No product ids given".into()));
    }

    let result = Products::update_many()
        .col_expr(ProdCol::IsActive, Expr::value(payload.is_active))
        .col_expr(ProdCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(ProdCol::Id.is_in(payload.product_ids.clone()))
        .exec(&state.orm)
        .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "products_bulk_active",
        Some("products"),
        Some(serde_json::json!({
            "product_ids": payload.product_ids,
            "is_active": payload.is_active,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Products updated",
        serde_json::json!({ "updated": result.rows_affected }),
        Some(Meta::empty()),
    ))
}

/// Delete a user. The RESTRICT rule on orders refuses the delete while
/// any order references the user; that surfaces as a 409.
pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Users::delete_by_id(id).exec(&state.orm).await;
    let result = match result {
        Ok(r) => r,
        Err(err) => {
            return Err(conflict_on_fk(
                err,
                "User still owns orders and cannot be deleted",
            ));
        }
    };
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "user_deleted",
        Some("users"),
        Some(serde_json::json!({ "user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        order_date: model.order_date,
        status: model.status,
        payment_method: model.payment_method,
        total: model.total,
        shipping_address: model.shipping_address,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn detail_from_entity(model: ReviewModel) -> ReviewDetail {
    let stars = star_display(model.rating);
    ReviewDetail {
        review: Review {
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
        },
        stars,
    }
}
