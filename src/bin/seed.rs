use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use petstore_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    slug::slugify,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&pool, "Loja Admin", "admin@example.com", "admin123", true).await?;
    let user_id = ensure_user(&pool, "Cliente Teste", "user@example.com", "user123", false).await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    full_name: &str,
    email: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, full_name, email, password_hash, is_admin)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (admin={is_admin})");
    Ok(row.0)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = ["Rações", "Brinquedos", "Roupas & Acessórios", "Higiene"];

    for name in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slugify(name))
        .execute(pool)
        .await?;
    }

    // (name, category, description, price cents, stock)
    let products = [
        ("Ração Premium 15kg", "Rações", "Ração seca para cães adultos", 18990, 40),
        ("Ração Filhotes 3kg", "Rações", "Ração para filhotes", 5490, 60),
        ("Bolinha de Borracha", "Brinquedos", "Brinquedo resistente", 1990, 200),
        ("Coleira Ajustável", "Roupas & Acessórios", "Coleira de nylon", 3490, 80),
        ("Shampoo Neutro 500ml", "Higiene", "Shampoo para todos os pelos", 2790, 120),
    ];

    for (name, category, desc, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, category_id, name, description, price, stock)
            SELECT $1, c.id, $2, $3, $4, $5 FROM categories c WHERE c.name = $6
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
