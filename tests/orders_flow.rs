mod support;

use petstore_api::{
    dto::orders::{
        CreateOrderRequest, OrderItemRequest, UpdateOrderItemRequest, UpdateOrderStatusRequest,
    },
    dto::payments::{CreateInvoiceRequest, CreatePaymentRequest},
    error::AppError,
    services::{admin_service, order_service, payment_service},
};

use support::{admin_auth, create_product, create_user, setup_state, user_auth};

// Integration flow: the order total must equal the sum of its line items'
// subtotals after every item write; cancel is guarded, everything else is
// direct assignment.
#[tokio::test]
async fn order_total_stays_consistent_across_item_writes() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "buyer@example.com", false).await?;
    let auth_user = user_auth(user_id);

    let product_a = create_product(&state, "Ração Premium 15kg", 18990).await?;
    let product_b = create_product(&state, "Bolinha de Borracha", 1990).await?;

    // Placeholder total; the first item write replaces it.
    let order = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Rua das Flores 123".into(),
            payment_method: "pix".into(),
            status: None,
            total: 1,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.status, "pending");

    let resp = order_service::add_item(
        &state,
        &auth_user,
        order.id,
        OrderItemRequest {
            product_id: product_a,
            quantity: 2,
            unit_price: 9999,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resp.order.total, 19998);

    let resp = order_service::add_item(
        &state,
        &auth_user,
        order.id,
        OrderItemRequest {
            product_id: product_b,
            quantity: 3,
            unit_price: 2500,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resp.order.total, 27498);
    let item_a = resp
        .items
        .iter()
        .find(|i| i.product_id == product_a)
        .unwrap()
        .id;

    // Second line item for the same (order, product) pair must fail, not merge.
    let dup = order_service::add_item(
        &state,
        &auth_user,
        order.id,
        OrderItemRequest {
            product_id: product_a,
            quantity: 1,
            unit_price: 9999,
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    // Updating a line item recomputes as well: 1 * 9999 + 3 * 2500.
    let resp = order_service::update_item(
        &state,
        &auth_user,
        order.id,
        item_a,
        UpdateOrderItemRequest {
            quantity: 1,
            unit_price: 9999,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resp.order.total, 17499);

    let detail = order_service::get_order(&state, &auth_user, order.id)
        .await?
        .data
        .unwrap();
    let sum: i64 = detail.items.iter().map(|i| i.subtotal()).sum();
    assert_eq!(detail.order.total, sum);

    // Detail listings come back in insertion order.
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[0].product_id, product_a);
    assert_eq!(detail.items[1].product_id, product_b);

    Ok(())
}

#[tokio::test]
async fn cancel_is_guarded_and_idempotent_safe() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "canceler@example.com", false).await?;
    let admin_id = create_user(&state, "ops@example.com", true).await?;
    let auth_user = user_auth(user_id);
    let auth_admin = admin_auth(admin_id);

    let order = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Av. Central 1".into(),
            payment_method: "credit_card".into(),
            status: None,
            total: 5000,
        },
    )
    .await?
    .data
    .unwrap();

    // pending -> canceled succeeds.
    let canceled = order_service::cancel_order(&state, &auth_user, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(canceled.status, "canceled");

    // Canceling again is a silent no-op, not an error.
    let again = order_service::cancel_order(&state, &auth_user, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(again.status, "canceled");

    // A shipped order declines cancellation and keeps its status.
    let shipped = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Av. Central 1".into(),
            payment_method: "boleto".into(),
            status: None,
            total: 3000,
        },
    )
    .await?
    .data
    .unwrap();

    admin_service::update_order_status(
        &state,
        &auth_admin,
        shipped.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await?;

    let declined = order_service::cancel_order(&state, &auth_user, shipped.id)
        .await?
        .data
        .unwrap();
    assert_eq!(declined.status, "shipped");

    // The order's owner cannot be removed while the order exists.
    let blocked = admin_service::delete_user(&state, &auth_admin, user_id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn order_creation_validates_fields() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "strict@example.com", false).await?;
    let auth_user = user_auth(user_id);

    let zero_total = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Rua A".into(),
            payment_method: "pix".into(),
            status: None,
            total: 0,
        },
    )
    .await;
    assert!(matches!(zero_total, Err(AppError::BadRequest(_))));

    let bad_method = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Rua A".into(),
            payment_method: "barter".into(),
            status: None,
            total: 100,
        },
    )
    .await;
    assert!(matches!(bad_method, Err(AppError::BadRequest(_))));

    let empty_address = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "  ".into(),
            payment_method: "pix".into(),
            status: None,
            total: 100,
        },
    )
    .await;
    assert!(matches!(empty_address, Err(AppError::BadRequest(_))));

    let order = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Rua A".into(),
            payment_method: "pix".into(),
            status: None,
            total: 100,
        },
    )
    .await?
    .data
    .unwrap();

    let product = create_product(&state, "Coleira Ajustável", 3490).await?;
    let zero_qty = order_service::add_item(
        &state,
        &auth_user,
        order.id,
        OrderItemRequest {
            product_id: product,
            quantity: 0,
            unit_price: 3490,
        },
    )
    .await;
    assert!(matches!(zero_qty, Err(AppError::BadRequest(_))));

    // Amounts past the 10-digit cents cap are rejected up front, so the
    // total recompute never gets near i64 overflow.
    let huge_price = order_service::add_item(
        &state,
        &auth_user,
        order.id,
        OrderItemRequest {
            product_id: product,
            quantity: 1,
            unit_price: 10_000_000_000,
        },
    )
    .await;
    assert!(matches!(huge_price, Err(AppError::BadRequest(_))));

    let huge_qty = order_service::add_item(
        &state,
        &auth_user,
        order.id,
        OrderItemRequest {
            product_id: product,
            quantity: i32::MAX,
            unit_price: 3490,
        },
    )
    .await;
    assert!(matches!(huge_qty, Err(AppError::BadRequest(_))));

    Ok(())
}

#[tokio::test]
async fn payment_transaction_ids_are_unique() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "payer@example.com", false).await?;
    let auth_user = user_auth(user_id);

    let order = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Rua B".into(),
            payment_method: "pix".into(),
            status: None,
            total: 2000,
        },
    )
    .await?
    .data
    .unwrap();

    let tx_id = format!("TX-{}", uuid::Uuid::new_v4());
    let payment = payment_service::create_payment(
        &state,
        &auth_user,
        order.id,
        CreatePaymentRequest {
            method: "pix".into(),
            status: None,
            amount: 2000,
            transaction_id: tx_id.clone(),
            paid_at: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(payment.status, "pending");

    let dup = payment_service::create_payment(
        &state,
        &auth_user,
        order.id,
        CreatePaymentRequest {
            method: "boleto".into(),
            status: Some("approved".into()),
            amount: 2000,
            transaction_id: tx_id,
            paid_at: None,
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    let listed = payment_service::list_payments(&state, &auth_user, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn invoice_access_keys_are_unique_and_sized() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "invoiced@example.com", false).await?;
    let admin_id = create_user(&state, "fiscal@example.com", true).await?;
    let auth_user = user_auth(user_id);
    let auth_admin = admin_auth(admin_id);

    let order = order_service::create_order(
        &state,
        &auth_user,
        CreateOrderRequest {
            shipping_address: "Rua C".into(),
            payment_method: "boleto".into(),
            status: None,
            total: 4500,
        },
    )
    .await?
    .data
    .unwrap();

    // Fiscal access keys are exactly 44 characters.
    let access_key = format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )[..44]
        .to_string();

    let short_key = payment_service::create_invoice(
        &state,
        &auth_admin,
        order.id,
        CreateInvoiceRequest {
            access_key: "1234".into(),
            number: 1,
            status: None,
            xml_file: None,
            issued_at: chrono::Utc::now(),
            authorized_at: None,
        },
    )
    .await;
    assert!(matches!(short_key, Err(AppError::BadRequest(_))));

    let invoice = payment_service::create_invoice(
        &state,
        &auth_admin,
        order.id,
        CreateInvoiceRequest {
            access_key: access_key.clone(),
            number: 1,
            status: None,
            xml_file: None,
            issued_at: chrono::Utc::now(),
            authorized_at: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(invoice.status, "authorized");

    let dup = payment_service::create_invoice(
        &state,
        &auth_admin,
        order.id,
        CreateInvoiceRequest {
            access_key,
            number: 2,
            status: None,
            xml_file: None,
            issued_at: chrono::Utc::now(),
            authorized_at: None,
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    // Non-admins cannot emit fiscal documents.
    let refused = payment_service::create_invoice(
        &state,
        &auth_user,
        order.id,
        CreateInvoiceRequest {
            access_key: format!(
                "{}{}",
                uuid::Uuid::new_v4().simple(),
                uuid::Uuid::new_v4().simple()
            )[..44]
                .to_string(),
            number: 3,
            status: None,
            xml_file: None,
            issued_at: chrono::Utc::now(),
            authorized_at: None,
        },
    )
    .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    let listed = payment_service::list_invoices(&state, &auth_user, order.id)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items.len(), 1);

    Ok(())
}
