use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::payments::{CreateInvoiceRequest, CreatePaymentRequest, InvoiceList, PaymentList},
    entity::{
        invoices::{
            ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices,
            Model as InvoiceModel,
        },
        orders::{Column as OrderCol, Entity as Orders},
        payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments,
            Model as PaymentModel,
        },
    },
    error::{AppError, AppResult, conflict_on_unique},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Invoice, InvoiceStatus, Payment, PaymentRecordMethod, PaymentStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Record a payment against one of the caller's orders. Descriptive only;
/// no gateway interaction happens here.
pub async fn create_payment(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: CreatePaymentRequest,
) -> AppResult<ApiResponse<Payment>> {
    find_owned_order(state, user, order_id).await?;

    let method = PaymentRecordMethod::parse(&payload.method)
        .ok_or_else(|| AppError::BadRequest("Invalid payment method".into()))?;
    let status = match payload.status.as_deref() {
        Some(s) => PaymentStatus::parse(s)
            .ok_or_else(|| AppError::BadRequest("Invalid payment status".into()))?,
        None => PaymentStatus::Pending,
    };
    if payload.amount <= 0 {
        return Err(AppError::BadRequest("Amount must be greater than 0".into()));
    }
    if payload.transaction_id.trim().is_empty() {
        return Err(AppError::BadRequest("Transaction id is required".into()));
    }

    let insert = PaymentActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        method: Set(method.as_str().into()),
        status: Set(status.as_str().into()),
        amount: Set(payload.amount),
        transaction_id: Set(payload.transaction_id),
        paid_at: Set(payload.paid_at.map(Into::into)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;
    let payment = match insert {
        Ok(p) => p,
        Err(err) => return Err(conflict_on_unique(err, "Transaction id already recorded")),
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_recorded",
        Some("payments"),
        Some(serde_json::json!({ "order_id": order_id, "payment_id": payment.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment recorded",
        payment_from_entity(payment),
        Some(Meta::empty()),
    ))
}

pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<PaymentList>> {
    find_owned_order(state, user, order_id).await?;

    let items = Payments::find()
        .filter(PaymentCol::OrderId.eq(order_id))
        .order_by_asc(PaymentCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Payments",
        PaymentList { items },
        Some(Meta::empty()),
    ))
}

/// Fiscal documents are back-office emitted, so creation is admin-only.
pub async fn create_invoice(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: CreateInvoiceRequest,
) -> AppResult<ApiResponse<Invoice>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(order_id).one(&state.orm).await?;
    if order.is_none() {
        return Err(AppError::NotFound);
    }

    let status = match payload.status.as_deref() {
        Some(s) => InvoiceStatus::parse(s)
            .ok_or_else(|| AppError::BadRequest("Invalid invoice status".into()))?,
        None => InvoiceStatus::Authorized,
    };
    if payload.access_key.len() != 44 {
        return Err(AppError::BadRequest(
            "Access key must be 44 characters".into(),
        ));
    }
    if payload.number <= 0 {
        return Err(AppError::BadRequest(
            "Invoice number must be greater than 0".into(),
        ));
    }

    let insert = InvoiceActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        access_key: Set(payload.access_key),
        number: Set(payload.number),
        status: Set(status.as_str().into()),
        xml_file: Set(payload.xml_file),
        issued_at: Set(payload.issued_at.into()),
        authorized_at: Set(payload.authorized_at.map(Into::into)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;
    let invoice = match insert {
        Ok(i) => i,
        Err(err) => return Err(conflict_on_unique(err, "Access key already registered")),
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "invoice_recorded",
        Some("invoices"),
        Some(serde_json::json!({ "order_id": order_id, "invoice_id": invoice.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Invoice recorded",
        invoice_from_entity(invoice),
        Some(Meta::empty()),
    ))
}

pub async fn list_invoices(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<InvoiceList>> {
    find_owned_order(state, user, order_id).await?;

    let items = Invoices::find()
        .filter(InvoiceCol::OrderId.eq(order_id))
        .order_by_asc(InvoiceCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(invoice_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Invoices",
        InvoiceList { items },
        Some(Meta::empty()),
    ))
}

async fn find_owned_order(state: &AppState, user: &AuthUser, order_id: Uuid) -> AppResult<()> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(order_id))
                .add(OrderCol::UserId.eq(user.user_id)),
        )
        .one(&state.orm)
        .await?;
    if order.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        order_id: model.order_id,
        method: model.method,
        status: model.status,
        amount: model.amount,
        transaction_id: model.transaction_id,
        paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn invoice_from_entity(model: InvoiceModel) -> Invoice {
    Invoice {
        id: model.id,
        order_id: model.order_id,
        access_key: model.access_key,
        number: model.number,
        status: model.status,
        xml_file: model.xml_file,
        issued_at: model.issued_at.with_timezone(&Utc),
        authorized_at: model.authorized_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
