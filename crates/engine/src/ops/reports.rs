//! Administrative reporting queries (read-only consumers of the ledger).

use sea_orm::{JoinType, PaginatorTrait, QueryFilter, QuerySelect, prelude::*};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    DonationStatus, EngineError, ResultEngine, categories, delivery_locations, distributions,
    donations, recipients, users,
};

use super::Engine;

/// Filter for [`Engine::donation_report`]. `None` means "no filter".
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportFilter {
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub status: Option<DonationStatus>,
}

/// One report line: either the remaining quantity of an open donation or
/// the distributed quantity of a ledger entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub category: String,
    pub location: String,
    pub donor: String,
    pub quantity: i64,
    pub status: DonationStatus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DonationReport {
    pub rows: Vec<ReportRow>,
    pub total: i64,
}

/// Dashboard counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardCounts {
    pub users: u64,
    pub categories: u64,
    pub recipients: u64,
    pub locations: u64,
}

impl Engine {
    /// Builds the donation report: open rows carry the donation's remaining
    /// quantity, distributed rows carry each ledger entry's quantity. The
    /// status filter selects which of the two sets is included.
    pub async fn donation_report(&self, filter: &ReportFilter) -> ResultEngine<DonationReport> {
        let category_names: HashMap<Uuid, String> = categories::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let location_names: HashMap<Uuid, String> = delivery_locations::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect();

        let mut rows = Vec::new();

        if filter.status != Some(DonationStatus::Closed) {
            let mut query = donations::Entity::find()
                .filter(donations::Column::Status.eq(DonationStatus::Open.as_str()));
            if let Some(category_id) = filter.category_id {
                query = query.filter(donations::Column::CategoryId.eq(category_id));
            }
            if let Some(location_id) = filter.location_id {
                query = query.filter(donations::Column::LocationId.eq(location_id));
            }

            for model in query.all(&self.database).await? {
                rows.push(Self::report_row(
                    &category_names,
                    &location_names,
                    model.category_id,
                    model.location_id,
                    model.donor_id,
                    model.quantity,
                    DonationStatus::Open,
                )?);
            }
        }

        if filter.status != Some(DonationStatus::Open) {
            let mut query = distributions::Entity::find()
                .join(JoinType::InnerJoin, distributions::Relation::Donation.def());
            if let Some(category_id) = filter.category_id {
                query = query.filter(donations::Column::CategoryId.eq(category_id));
            }
            if let Some(location_id) = filter.location_id {
                query = query.filter(donations::Column::LocationId.eq(location_id));
            }

            let entries: Vec<(distributions::Model, Option<donations::Model>)> = query
                .select_also(donations::Entity)
                .all(&self.database)
                .await?;

            for (dist, donation) in entries {
                let donation = donation.ok_or_else(|| {
                    EngineError::KeyNotFound(dist.donation_id.to_string())
                })?;
                rows.push(Self::report_row(
                    &category_names,
                    &location_names,
                    donation.category_id,
                    donation.location_id,
                    donation.donor_id,
                    dist.quantity,
                    DonationStatus::Closed,
                )?);
            }
        }

        let total = rows.iter().map(|row| row.quantity).sum();
        Ok(DonationReport { rows, total })
    }

    pub async fn dashboard_counts(&self) -> ResultEngine<DashboardCounts> {
        Ok(DashboardCounts {
            users: users::Entity::find().count(&self.database).await?,
            categories: categories::Entity::find().count(&self.database).await?,
            recipients: recipients::Entity::find().count(&self.database).await?,
            locations: delivery_locations::Entity::find().count(&self.database).await?,
        })
    }

    fn report_row(
        category_names: &HashMap<Uuid, String>,
        location_names: &HashMap<Uuid, String>,
        category_id: Uuid,
        location_id: Uuid,
        donor: String,
        quantity: i64,
        status: DonationStatus,
    ) -> ResultEngine<ReportRow> {
        let category = category_names
            .get(&category_id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(category_id.to_string()))?;
        let location = location_names
            .get(&location_id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(location_id.to_string()))?;
        Ok(ReportRow {
            category,
            location,
            donor,
            quantity,
            status,
        })
    }
}
