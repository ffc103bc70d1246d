//! Category registry endpoints.

use api_types::category::{
    CategoriesResponse, CategoryCreated, CategoryNew, CategoryUpdate, CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Actor;
use uuid::Uuid;

use crate::{ServerError, require_administrator, server::ServerState};

/// Any authenticated actor may list categories (the intake and
/// distribution forms both need them).
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(|c| CategoryView {
            id: c.id,
            name: c.name,
        })
        .collect();

    Ok(Json(CategoriesResponse { categories }))
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    require_administrator(&actor)?;

    let id = state.engine.create_category(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(CategoryCreated { id })))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state.engine.rename_category(id, &payload.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state.engine.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
