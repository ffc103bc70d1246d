//! Delivery-location registry endpoints.

use api_types::location::{
    LocationCreated, LocationNew, LocationUpdate, LocationView, LocationsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::Actor;
use uuid::Uuid;

use crate::{ServerError, require_administrator, server::ServerState};

pub async fn list(State(state): State<ServerState>) -> Result<Json<LocationsResponse>, ServerError> {
    let locations = state
        .engine
        .list_locations()
        .await?
        .into_iter()
        .map(|l| LocationView {
            id: l.id,
            name: l.name,
        })
        .collect();

    Ok(Json(LocationsResponse { locations }))
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<LocationNew>,
) -> Result<(StatusCode, Json<LocationCreated>), ServerError> {
    require_administrator(&actor)?;

    let id = state.engine.create_location(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(LocationCreated { id })))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LocationUpdate>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state.engine.rename_location(id, &payload.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state.engine.delete_location(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
