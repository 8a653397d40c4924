use uuid::Uuid;

use crate::dto::perfil::{PedidoList, UpdatePerfilRequest};
use crate::{
    db::DbPool,
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Pedido, Perfil},
    response::ApiResponse,
};

pub async fn find_perfil(pool: &DbPool, user_id: Uuid) -> AppResult<Option<Perfil>> {
    let perfil: Option<Perfil> = sqlx::query_as("SELECT * FROM perfiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(perfil)
}

pub async fn get_perfil(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<Perfil>> {
    // Profiles are created lazily; a user without one gets an empty row back
    // without persisting anything.
    let perfil = match find_perfil(pool, user.user_id).await? {
        Some(p) => p,
        None => Perfil {
            id: user.user_id,
            nombre: None,
            direccion: None,
            ciudad: None,
            codigo_postal: None,
            pais: None,
            stripe_customer_id: None,
            updated_at: chrono::Utc::now(),
        },
    };
    Ok(ApiResponse::success("Perfil", perfil))
}

pub async fn update_perfil(
    pool: &DbPool,
    user: &AuthUser,
    payload: UpdatePerfilRequest,
) -> AppResult<ApiResponse<Perfil>> {
    let perfil: Perfil = sqlx::query_as(
        r#"
        INSERT INTO perfiles (id, nombre, direccion, ciudad, codigo_postal, pais)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            nombre = COALESCE(EXCLUDED.nombre, perfiles.nombre),
            direccion = COALESCE(EXCLUDED.direccion, perfiles.direccion),
            ciudad = COALESCE(EXCLUDED.ciudad, perfiles.ciudad),
            codigo_postal = COALESCE(EXCLUDED.codigo_postal, perfiles.codigo_postal),
            pais = COALESCE(EXCLUDED.pais, perfiles.pais),
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(payload.nombre)
    .bind(payload.direccion)
    .bind(payload.ciudad)
    .bind(payload.codigo_postal)
    .bind(payload.pais)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Perfil updated", perfil))
}

/// Cache the gateway customer id on the profile, creating the row if the
/// user never saved one.
pub async fn set_stripe_customer(
    pool: &DbPool,
    user_id: Uuid,
    customer_id: &str,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO perfiles (id, stripe_customer_id)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET
            stripe_customer_id = EXCLUDED.stripe_customer_id,
            updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(customer_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Purchase history for the profile page, matched by the email captured at
/// checkout.
pub async fn list_pedidos_for_user(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<PedidoList>> {
    let items: Vec<Pedido> = sqlx::query_as(
        "SELECT * FROM pedidos WHERE email_cliente = $1 ORDER BY created_at DESC",
    )
    .bind(user.email.as_str())
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success("Pedidos", PedidoList { items }))
}
