//! The distribution endpoint: the allocation call.

use api_types::distribution::{DistributionNew, DistributionView, DistributionsCreated};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{Actor, AllocationPolicy, AllocationRequest};

use crate::{ServerError, require_volunteer, server::ServerState};

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<DistributionNew>,
) -> Result<(StatusCode, Json<DistributionsCreated>), ServerError> {
    require_volunteer(&actor)?;

    if payload.items.is_empty() {
        return Err(ServerError::Generic(
            "at least one category is required".to_string(),
        ));
    }

    let requests: Vec<AllocationRequest> = payload
        .items
        .iter()
        .map(|item| AllocationRequest {
            category_id: item.category_id,
            quantity: item.quantity,
        })
        .collect();

    let policy = if payload.best_effort.unwrap_or(false) {
        AllocationPolicy::BestEffort
    } else {
        AllocationPolicy::Strict
    };

    let distributions = state
        .engine
        .allocate(payload.recipient_id, &requests, policy, Utc::now())
        .await?
        .into_iter()
        .map(|dist| DistributionView {
            id: dist.id,
            donation_id: dist.donation_id,
            recipient_id: dist.recipient_id,
            quantity: dist.quantity,
            distributed_at: dist.distributed_at,
        })
        .collect();

    Ok((StatusCode::CREATED, Json(DistributionsCreated { distributions })))
}
