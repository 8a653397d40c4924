use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use racket_lab_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&pool, &config.admin_email, "admin123").await?;
    let user_id = ensure_user(&pool, "cliente@example.com", "cliente123").await?;
    seed_productos(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    Ok(user_id)
}

async fn seed_productos(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let productos = vec![
        (
            "Camiseta Tecnica Pro",
            "Camiseta transpirable de competicion",
            "29.99",
            "camisetas",
            (20, 30, 25, 10),
        ),
        (
            "Pantalon Corto Match",
            "Pantalon corto con bolsillo portapelotas",
            "24.95",
            "pantalones",
            (15, 25, 20, 10),
        ),
        (
            "Sudadera Club",
            "Sudadera de entrenamiento con capucha",
            "44.90",
            "sudaderas",
            (10, 15, 15, 8),
        ),
        (
            "Falda Open",
            "Falda deportiva con malla interior",
            "27.50",
            "faldas",
            (18, 22, 12, 6),
        ),
    ];

    for (name, desc, price, category, (s, m, l, xl)) in productos {
        sqlx::query(
            r#"
            INSERT INTO productos
                (id, name, description, price, category, images, available,
                 size_s, size_m, size_l, size_xl)
            VALUES ($1, $2, $3, $4, $5, '{}', TRUE, $6, $7, $8, $9)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(Decimal::from_str_exact(price)?)
        .bind(category)
        .bind(s)
        .bind(m)
        .bind(l)
        .bind(xl)
        .execute(pool)
        .await?;
    }

    println!("Seeded productos");
    Ok(())
}
