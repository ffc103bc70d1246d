//! Donation intake and stock endpoints.

use api_types::donation::{
    DonationBatchNew, DonationView, DonationsCreated, DonationsResponse, PendingStockResponse,
    PendingStockView, StockLevelView, StockResponse,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{Actor, DonationItem};

use crate::{ServerError, map_status, require_donor, require_volunteer, server::ServerState};

/// Multi-category intake: one batch, one delivery location.
pub async fn create_batch(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<DonationBatchNew>,
) -> Result<(StatusCode, Json<DonationsCreated>), ServerError> {
    require_donor(&actor)?;

    let items: Vec<DonationItem> = payload
        .items
        .into_iter()
        .map(|item| DonationItem {
            category_id: item.category_id,
            quantity: item.quantity,
            description: item.description,
        })
        .collect();

    let ids = state
        .engine
        .record_donations(
            actor.username(),
            payload.location_id,
            payload.description.as_deref(),
            &items,
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DonationsCreated { ids })))
}

pub async fn mine(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<DonationsResponse>, ServerError> {
    require_donor(&actor)?;

    let donations = state
        .engine
        .donations_by_donor(actor.username())
        .await?
        .into_iter()
        .map(|d| DonationView {
            id: d.id,
            category_id: d.category_id,
            description: d.description,
            quantity: d.quantity,
            initial_quantity: d.initial_quantity,
            location_id: d.location_id,
            created_at: d.created_at,
            status: map_status(d.status),
        })
        .collect();

    Ok(Json(DonationsResponse { donations }))
}

/// Open stock grouped by category and delivery location.
pub async fn pending(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<PendingStockResponse>, ServerError> {
    require_volunteer(&actor)?;

    let rows = state
        .engine
        .pending_stock()
        .await?
        .into_iter()
        .map(|row| PendingStockView {
            category: row.category,
            location: row.location,
            total: row.total,
        })
        .collect();

    Ok(Json(PendingStockResponse { rows }))
}

/// Per-category availability, the basis of the distribution form.
pub async fn stock(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<StockResponse>, ServerError> {
    require_volunteer(&actor)?;

    let levels = state
        .engine
        .stock_levels()
        .await?
        .into_iter()
        .map(|level| StockLevelView {
            category_id: level.category_id,
            category: level.category,
            available: level.available,
        })
        .collect();

    Ok(Json(StockResponse { levels }))
}
