use petstore_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        categories::ActiveModel as CategoryActive, products::ActiveModel as ProductActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    slug::slugify,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

/// Connect and migrate, or skip the test politely when no database is
/// configured in the environment.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url =
        match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
            Ok(url) => url,
            Err(_) => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(None);
            }
        };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    Ok(Some(AppState { pool, orm }))
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Insert a user; the email is prefixed with a random tag so repeated
/// runs never collide on the unique constraint.
pub async fn create_user(state: &AppState, email: &str, is_admin: bool) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        full_name: Set("Test User".into()),
        email: Set(format!("{}-{}", short_id(), email)),
        password_hash: Set("dummy".into()),
        address: Set(String::new()),
        phone: Set(String::new()),
        is_admin: Set(is_admin),
        is_active: Set(true),
        is_staff: Set(false),
        date_joined: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

pub fn user_auth(user_id: Uuid) -> AuthUser {
    AuthUser {
        user_id,
        role: "user".into(),
    }
}

pub fn admin_auth(user_id: Uuid) -> AuthUser {
    AuthUser {
        user_id,
        role: "admin".into(),
    }
}

/// Insert a category under a uniquified name; returns its id.
pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let unique_name = format!("{} {}", name, short_id());
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        slug: Set(slugify(&unique_name)),
        name: Set(unique_name),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(category.id)
}

/// Insert a product (with its own fixture category); the name is
/// uniquified for the same reason the emails are.
pub async fn create_product(state: &AppState, name: &str, price: i64) -> anyhow::Result<Uuid> {
    let category_id = create_category(state, "Fixtures").await?;
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(format!("{} {}", name, short_id())),
        description: Set(String::new()),
        price: Set(price),
        stock: Set(100),
        is_active: Set(true),
        image: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(product.id)
}
