use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::dto::admin::{CreateCuponRequest, CuponList, UpdateCuponRequest};
use crate::{
    audit,
    entity::cupones::{ActiveModel, Column, Entity as Cupones, Model as CuponModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Cupon,
    response::ApiResponse,
    state::AppState,
};

pub async fn list_cupones(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CuponList>> {
    ensure_admin(user, &state.config.admin_email)?;
    let items = Cupones::find()
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(cupon_from_entity)
        .collect();

    Ok(ApiResponse::success("Cupones", CuponList { items }))
}

pub async fn create_cupon(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCuponRequest,
) -> AppResult<ApiResponse<Cupon>> {
    ensure_admin(user, &state.config.admin_email)?;
    if !(1..=100).contains(&payload.descuento) {
        return Err(AppError::BadRequest(
            "Discount must be between 1 and 100".into(),
        ));
    }

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        code: Set(payload.code.trim().to_uppercase()),
        descuento: Set(payload.descuento),
        activo: Set(true),
        usos: Set(0),
        max_usos: Set(payload.max_usos),
        created_at: NotSet,
    };
    let cupon = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cupon_create",
        "cupones",
        serde_json::json!({ "cupon_id": cupon.id, "code": cupon.code }),
    )
    .await;

    Ok(ApiResponse::success(
        "Cupon created",
        cupon_from_entity(cupon),
    ))
}

/// Flip or set the active flag.
pub async fn update_cupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCuponRequest,
) -> AppResult<ApiResponse<Cupon>> {
    ensure_admin(user, &state.config.admin_email)?;
    let existing = Cupones::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let next_activo = payload.activo.unwrap_or(!existing.activo);
    let mut active: ActiveModel = existing.into();
    active.activo = Set(next_activo);
    let cupon = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cupon_update",
        "cupones",
        serde_json::json!({ "cupon_id": cupon.id, "activo": cupon.activo }),
    )
    .await;

    Ok(ApiResponse::success("Updated", cupon_from_entity(cupon)))
}

pub async fn delete_cupon(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user, &state.config.admin_email)?;
    let result = Cupones::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        "cupon_delete",
        "cupones",
        serde_json::json!({ "cupon_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Deleted", serde_json::json!({})))
}

fn cupon_from_entity(model: CuponModel) -> Cupon {
    Cupon {
        id: model.id,
        code: model.code,
        descuento: model.descuento,
        activo: model.activo,
        usos: model.usos,
        max_usos: model.max_usos,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
