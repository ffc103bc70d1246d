//! Donation intake and donor-facing queries.

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    Donation, DonationStatus, EngineError, ResultEngine, categories, delivery_locations, donations,
};

use super::{Engine, normalize_optional_text, with_tx};

/// One line of a multi-category donation batch.
#[derive(Clone, Debug)]
pub struct DonationItem {
    pub category_id: Uuid,
    pub quantity: i64,
    pub description: Option<String>,
}

/// Open stock grouped by category and delivery location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingStockRow {
    pub category: String,
    pub location: String,
    pub total: i64,
}

impl Engine {
    /// Records a single donation with `initial_quantity = quantity`.
    pub async fn record_donation(
        &self,
        donor: &str,
        category_id: Uuid,
        description: Option<&str>,
        quantity: i64,
        location_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let ids = self
            .record_donations(
                donor,
                location_id,
                description,
                &[DonationItem {
                    category_id,
                    quantity,
                    description: None,
                }],
                created_at,
            )
            .await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| EngineError::InvalidQuantity("quantity must be > 0".to_string()))
    }

    /// Records a batch of donations across categories in one transaction.
    ///
    /// Zero-quantity lines are skipped (the intake form submits every
    /// category); negative quantities fail the whole batch. A line without
    /// its own description falls back to the batch description or a
    /// generated one.
    pub async fn record_donations(
        &self,
        donor: &str,
        location_id: Uuid,
        description: Option<&str>,
        items: &[DonationItem],
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Vec<Uuid>> {
        for item in items {
            if item.quantity < 0 {
                return Err(EngineError::InvalidQuantity(
                    "quantity must not be negative".to_string(),
                ));
            }
        }
        let batch_description = normalize_optional_text(description);

        with_tx!(self, |tx| {
            delivery_locations::Entity::find_by_id(location_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(location_id.to_string()))?;

            let mut ids = Vec::new();
            for item in items {
                if item.quantity == 0 {
                    continue;
                }

                let category = categories::Entity::find_by_id(item.category_id)
                    .one(&tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound(item.category_id.to_string()))?;

                let description = normalize_optional_text(item.description.as_deref())
                    .or_else(|| batch_description.clone())
                    .unwrap_or_else(|| {
                        format!(
                            "Donation of {} {}",
                            item.quantity,
                            category.name.to_lowercase()
                        )
                    });

                let donation = Donation::new(
                    item.category_id,
                    description,
                    item.quantity,
                    location_id,
                    donor.to_string(),
                    created_at,
                )?;
                donations::ActiveModel::from(&donation).insert(&tx).await?;
                ids.push(donation.id);
            }

            Ok(ids)
        })
    }

    /// The donor's own donations, oldest first.
    pub async fn donations_by_donor(&self, donor: &str) -> ResultEngine<Vec<Donation>> {
        let models = donations::Entity::find()
            .filter(donations::Column::DonorId.eq(donor))
            .order_by_asc(donations::Column::CreatedAt)
            .order_by_asc(donations::Column::Id)
            .all(&self.database)
            .await?;

        models.into_iter().map(Donation::try_from).collect()
    }

    /// Open stock grouped by category and delivery location (the volunteer
    /// listing), ordered by category name.
    pub async fn pending_stock(&self) -> ResultEngine<Vec<PendingStockRow>> {
        let open = donations::Entity::find()
            .filter(donations::Column::Status.eq(DonationStatus::Open.as_str()))
            .all(&self.database)
            .await?;

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

        let mut totals: HashMap<(Uuid, Uuid), i64> = HashMap::new();
        for model in open {
            *totals
                .entry((model.category_id, model.location_id))
                .or_insert(0) += model.quantity;
        }

        let mut rows = Vec::with_capacity(totals.len());
        for ((category_id, location_id), total) in totals {
            let category = category_names
                .get(&category_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound(category_id.to_string()))?;
            let location = location_names
                .get(&location_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound(location_id.to_string()))?;
            rows.push(PendingStockRow {
                category,
                location,
                total,
            });
        }
        rows.sort_by(|a, b| (&a.category, &a.location).cmp(&(&b.category, &b.location)));
        Ok(rows)
    }
}
