use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::dto::productos::{CreateProductoRequest, ProductoList, ProductoQuery, UpdateProductoRequest};
use crate::{
    audit,
    entity::productos::{ActiveModel, Column, Entity as Productos, Model as ProductoModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Producto,
    response::ApiResponse,
    state::AppState,
};

/// Storefront list. Unavailable products only show up with `all=true`, which
/// the admin dashboard passes.
pub async fn list_productos(
    state: &AppState,
    query: ProductoQuery,
) -> AppResult<ApiResponse<ProductoList>> {
    let mut finder = Productos::find().order_by_desc(Column::CreatedAt);
    if !query.all.unwrap_or(false) {
        finder = finder.filter(Column::Available.eq(true));
    }

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(producto_from_entity)
        .collect();

    Ok(ApiResponse::success("Productos", ProductoList { items }))
}

pub async fn get_producto(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Producto>> {
    let result = Productos::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(producto_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Producto", result))
}

pub async fn create_producto(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductoRequest,
) -> AppResult<ApiResponse<Producto>> {
    ensure_admin(user, &state.config.admin_email)?;
    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        images: Set(payload.images.unwrap_or_default()),
        available: Set(payload.available.unwrap_or(true)),
        size_s: Set(payload.size_s.unwrap_or(0)),
        size_m: Set(payload.size_m.unwrap_or(0)),
        size_l: Set(payload.size_l.unwrap_or(0)),
        size_xl: Set(payload.size_xl.unwrap_or(0)),
        created_at: NotSet,
    };
    let producto = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "producto_create",
        "productos",
        serde_json::json!({ "product_id": producto.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Producto created",
        producto_from_entity(producto),
    ))
}

/// Partial update. Only whitelisted columns can change; unknown fields are
/// dropped at deserialization.
pub async fn update_producto(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductoRequest,
) -> AppResult<ApiResponse<Producto>> {
    ensure_admin(user, &state.config.admin_email)?;
    let existing = Productos::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(Some(category));
    }
    if let Some(images) = payload.images {
        active.images = Set(images);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }
    if let Some(size_s) = payload.size_s {
        active.size_s = Set(size_s);
    }
    if let Some(size_m) = payload.size_m {
        active.size_m = Set(size_m);
    }
    if let Some(size_l) = payload.size_l {
        active.size_l = Set(size_l);
    }
    if let Some(size_xl) = payload.size_xl {
        active.size_xl = Set(size_xl);
    }

    let producto = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "producto_update",
        "productos",
        serde_json::json!({ "product_id": producto.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        producto_from_entity(producto),
    ))
}

pub async fn delete_producto(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user, &state.config.admin_email)?;
    let result = Productos::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "producto_delete",
        "productos",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Deleted", serde_json::json!({})))
}

pub fn producto_from_entity(model: ProductoModel) -> Producto {
    Producto {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        images: model.images,
        available: model.available,
        size_s: model.size_s,
        size_m: model.size_m,
        size_l: model.size_l,
        size_xl: model.size_xl,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
