mod support;

use petstore_api::{
    dto::categories::CreateCategoryRequest,
    dto::products::{BulkActiveRequest, CreateProductRequest},
    error::AppError,
    routes::params::{Pagination, ProductQuery},
    services::{admin_service, catalog_service},
};

use support::{admin_auth, create_user, setup_state, user_auth};

/// Clear out the fixed-name rows the slug test creates, so reruns do
/// not trip the unique constraints it is asserting on.
async fn clear_fixed_names(state: &petstore_api::state::AppState) -> anyhow::Result<()> {
    sqlx::query(
        "DELETE FROM categories WHERE name IN ($1, $2) OR slug IN ('racoes', 'roupas-acessorios', 'promocoes')",
    )
    .bind("Rações")
    .bind("Roupas & Acessórios")
    .execute(&state.pool)
    .await?;
    Ok(())
}

#[tokio::test]
async fn category_slugs_are_derived_and_unique() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    clear_fixed_names(&state).await?;

    let admin_id = create_user(&state, "catalog-admin@example.com", true).await?;
    let auth_admin = admin_auth(admin_id);

    let category = catalog_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: "Rações".into(),
            slug: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(category.slug, "racoes");

    let category = catalog_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: "Roupas & Acessórios".into(),
            slug: Some("promocoes".into()),
        },
    )
    .await?
    .data
    .unwrap();
    // An explicit slug wins over derivation.
    assert_eq!(category.slug, "promocoes");

    let dup = catalog_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: "Rações".into(),
            slug: None,
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    let found = catalog_service::get_category_by_slug(&state, "racoes")
        .await?
        .data
        .unwrap();
    assert_eq!(found.name, "Rações");

    let missing = catalog_service::get_category_by_slug(&state, "no-such-slug").await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    Ok(())
}

#[tokio::test]
async fn non_admins_cannot_create_catalog_entries() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let user_id = create_user(&state, "shopper@example.com", false).await?;
    let auth_user = user_auth(user_id);

    let refused = catalog_service::create_category(
        &state,
        &auth_user,
        CreateCategoryRequest {
            name: "Clandestina".into(),
            slug: None,
        },
    )
    .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    Ok(())
}

#[tokio::test]
async fn product_constraints_and_active_listing() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let admin_id = create_user(&state, "stock-admin@example.com", true).await?;
    let auth_admin = admin_auth(admin_id);

    // Unique names so repeated runs never collide outside the assertions below.
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let product_name = format!("Ração Premium 15kg {}", tag);

    let category = catalog_service::create_category(
        &state,
        &auth_admin,
        CreateCategoryRequest {
            name: format!("Rações Especiais {}", tag),
            slug: None,
        },
    )
    .await?
    .data
    .unwrap();

    let negative_price = catalog_service::create_product(
        &state,
        &auth_admin,
        CreateProductRequest {
            category_id: category.id,
            name: product_name.clone(),
            description: String::new(),
            price: -1,
            stock: 10,
            image: None,
        },
    )
    .await;
    assert!(matches!(negative_price, Err(AppError::BadRequest(_))));

    let product = catalog_service::create_product(
        &state,
        &auth_admin,
        CreateProductRequest {
            category_id: category.id,
            name: product_name.clone(),
            description: "Ração seca para cães adultos".into(),
            price: 18990,
            stock: 40,
            image: None,
        },
    )
    .await?
    .data
    .unwrap();

    let dup = catalog_service::create_product(
        &state,
        &auth_admin,
        CreateProductRequest {
            category_id: category.id,
            name: product_name.clone(),
            description: String::new(),
            price: 18990,
            stock: 40,
            image: None,
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::Conflict(_))));

    let query = ProductQuery {
        pagination: Pagination {
            page: Some(1),
            per_page: Some(100),
        },
        q: Some(product_name.clone()),
        min_price: None,
        max_price: None,
        sort_by: None,
        sort_order: None,
    };
    let listed = catalog_service::list_active_products(&state, query)
        .await?
        .data
        .unwrap();
    assert!(listed.items.iter().any(|p| p.id == product.id));

    // Deactivated products drop out of the public listing.
    admin_service::set_products_active(
        &state,
        &auth_admin,
        BulkActiveRequest {
            product_ids: vec![product.id],
            is_active: false,
        },
    )
    .await?;

    let query = ProductQuery {
        pagination: Pagination {
            page: Some(1),
            per_page: Some(100),
        },
        q: Some(product_name.clone()),
        min_price: None,
        max_price: None,
        sort_by: None,
        sort_order: None,
    };
    let listed = catalog_service::list_active_products(&state, query)
        .await?
        .data
        .unwrap();
    assert!(listed.items.iter().all(|p| p.id != product.id));

    // Still reachable by direct id lookup.
    let fetched = catalog_service::get_product(&state, product.id)
        .await?
        .data
        .unwrap();
    assert!(!fetched.is_active);

    Ok(())
}
