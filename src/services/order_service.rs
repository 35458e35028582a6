use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        CreateOrderRequest, OrderItemRequest, OrderList, OrderWithItems, UpdateOrderItemRequest,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
        products::Entity as Products,
    },
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus, PaymentMethod},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.shipping_address.trim().is_empty() {
        return Err(AppError::BadRequest("Shipping address is required".into()));
    }
    let method = PaymentMethod::parse(&payload.payment_method)
        .ok_or_else(|| AppError::BadRequest("Invalid payment method".into()))?;
    let status = match payload.status.as_deref() {
        Some(s) => {
            OrderStatus::parse(s).ok_or_else(|| AppError::BadRequest("Invalid order status".into()))?
        }
        None => OrderStatus::Pending,
    };
    if payload.total <= 0 {
        return Err(AppError::BadRequest("Total must be greater than 0".into()));
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        order_date: NotSet,
        status: Set(status.as_str().into()),
        payment_method: Set(method.as_str().into()),
        total: Set(payload.total),
        shipping_address: Set(payload.shipping_address),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_created",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: OrderItemRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    validate_item(payload.quantity, payload.unit_price)?;

    let txn = state.orm.begin().await?;
    let order = lock_owned_order(&txn, user, order_id).await?;

    let product = Products::find_by_id(payload.product_id).one(&txn).await?;
    if product.is_none() {
        return Err(AppError::BadRequest("Product does not exist".into()));
    }

    let insert = OrderItemActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        product_id: Set(payload.product_id),
        quantity: Set(payload.quantity),
        unit_price: Set(payload.unit_price),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await;
    if let Err(err) = insert {
        return Err(conflict_on_unique(
            err,
            "Order already has a line item for this product",
        ));
    }

    let (order, items) = recompute_total(&txn, order).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_item_added",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "product_id": payload.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item added",
        OrderWithItems { order, items },
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    item_id: Uuid,
    payload: UpdateOrderItemRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    validate_item(payload.quantity, payload.unit_price)?;

    let txn = state.orm.begin().await?;
    let order = lock_owned_order(&txn, user, order_id).await?;

    let item = OrderItems::find()
        .filter(
            Condition::all()
                .add(OrderItemCol::Id.eq(item_id))
                .add(OrderItemCol::OrderId.eq(order.id)),
        )
        .one(&txn)
        .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderItemActive = item.into();
    active.quantity = Set(payload.quantity);
    active.unit_price = Set(payload.unit_price);
    active.updated_at = Set(Utc::now().into());
    active.update(&txn).await?;

    let (order, items) = recompute_total(&txn, order).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_item_updated",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "item_id": item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item updated",
        OrderWithItems { order, items },
        Some(Meta::empty()),
    ))
}

/// Cancel the order when it is still pending or processing. Any other
/// current status leaves the order untouched; the operation silently
/// declines rather than raising.
pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = lock_owned_order(&txn, user, order_id).await?;

    let status = OrderStatus::parse(&order.status)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Unknown stored order status")))?;
    if !status.can_cancel() {
        txn.commit().await?;
        return Ok(ApiResponse::success(
            "Order not cancelable",
            order_from_entity(order),
            Some(Meta::empty()),
        ));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Canceled.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_canceled",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order canceled",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
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
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
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

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// 10 significant digits, in cents. Keeps every subtotal and any
/// realistic order total far below `i64::MAX`.
const MAX_UNIT_PRICE: i64 = 9_999_999_999;
const MAX_QUANTITY: i32 = 1_000_000;

fn validate_item(quantity: i32, unit_price: i64) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::BadRequest("Quantity must be at least 1".into()));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::BadRequest("Quantity is too large".into()));
    }
    if unit_price <= 0 {
        return Err(AppError::BadRequest(
            "Unit price must be greater than 0".into(),
        ));
    }
    if unit_price > MAX_UNIT_PRICE {
        return Err(AppError::BadRequest("Unit price is too large".into()));
    }
    Ok(())
}

/// Lock the caller's order row for update so the recompute that follows
/// reads a line-item set no concurrent writer can change mid-transaction.
async fn lock_owned_order(
    txn: &DatabaseTransaction,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<OrderModel> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(order_id))
                .add(OrderCol::UserId.eq(user.user_id)),
        )
        .lock(LockType::Update)
        .one(txn)
        .await?;
    order.ok_or(AppError::NotFound)
}

/// Re-derive the order total from the full current line-item set and
/// persist it. Runs on every item write, inside the caller's transaction.
async fn recompute_total(
    txn: &DatabaseTransaction,
    order: OrderModel,
) -> AppResult<(Order, Vec<OrderItem>)> {
    let items: Vec<OrderItemModel> = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(txn)
        .await?;

    let mut total: i64 = 0;
    for item in &items {
        total = item
            .unit_price
            .checked_mul(item.quantity as i64)
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or_else(|| AppError::BadRequest("Order total is too large".into()))?;
    }

    let mut active: OrderActive = order.into();
    active.total = Set(total);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(txn).await?;

    Ok((
        order_from_entity(order),
        items.into_iter().map(order_item_from_entity).collect(),
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
