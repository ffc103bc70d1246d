//! Recipient registry endpoints.
//!
//! Volunteers register recipients during their work; edits and removals
//! stay with administrators.

use api_types::recipient::{
    RecipientCreated, RecipientNew, RecipientUpdate, RecipientView, RecipientsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Actor, RecipientInput};
use uuid::Uuid;

use crate::{ServerError, require_administrator, require_volunteer, server::ServerState};

pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<RecipientsResponse>, ServerError> {
    require_volunteer(&actor)?;

    let recipients = state
        .engine
        .list_recipients()
        .await?
        .into_iter()
        .map(|r| RecipientView {
            id: r.id,
            name: r.name,
            tax_id: r.tax_id,
            address: r.address,
            phone: r.phone,
        })
        .collect();

    Ok(Json(RecipientsResponse { recipients }))
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<RecipientNew>,
) -> Result<(StatusCode, Json<RecipientCreated>), ServerError> {
    require_volunteer(&actor)?;

    let id = state
        .engine
        .create_recipient(RecipientInput {
            name: payload.name,
            tax_id: payload.tax_id,
            address: payload.address,
            phone: payload.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RecipientCreated { id })))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipientUpdate>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state
        .engine
        .update_recipient(
            id,
            RecipientInput {
                name: payload.name,
                tax_id: payload.tax_id,
                address: payload.address,
                phone: payload.phone,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state.engine.delete_recipient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
