//! Administrative reports and dashboard counters.

use api_types::report::{ReportQuery, ReportResponse, ReportRowView};
use api_types::stats::Statistic;
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{Actor, DonationStatus, ReportFilter};

use crate::{ServerError, map_status, require_administrator, server::ServerState};

pub async fn donations(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ServerError> {
    require_administrator(&actor)?;

    let status = query.status.map(|status| match status {
        api_types::DonationStatus::Open => DonationStatus::Open,
        api_types::DonationStatus::Closed => DonationStatus::Closed,
    });

    let report = state
        .engine
        .donation_report(&ReportFilter {
            category_id: query.category_id,
            location_id: query.location_id,
            status,
        })
        .await?;

    let rows = report
        .rows
        .into_iter()
        .map(|row| ReportRowView {
            category: row.category,
            location: row.location,
            donor: row.donor,
            quantity: row.quantity,
            status: map_status(row.status),
        })
        .collect();

    Ok(Json(ReportResponse {
        rows,
        total: report.total,
    }))
}

pub async fn stats(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<Statistic>, ServerError> {
    require_administrator(&actor)?;

    let counts = state.engine.dashboard_counts().await?;
    Ok(Json(Statistic {
        users: counts.users,
        categories: counts.categories,
        recipients: counts.recipients,
        locations: counts.locations,
    }))
}
