//! Stock aggregation over open donation records.

use sea_orm::{QueryFilter, prelude::*};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{DonationStatus, ResultEngine, categories, donations};

use super::Engine;

/// Available stock of one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockLevel {
    pub category_id: Uuid,
    pub category: String,
    pub available: i64,
}

impl Engine {
    /// Sum of remaining quantities across open donations of the category.
    ///
    /// Reads committed state only. An unknown category has no stock, which
    /// is a valid result, not an error.
    pub async fn available(&self, category_id: Uuid) -> ResultEngine<i64> {
        let open = donations::Entity::find()
            .filter(donations::Column::CategoryId.eq(category_id))
            .filter(donations::Column::Status.eq(DonationStatus::Open.as_str()))
            .all(&self.database)
            .await?;

        Ok(open.iter().map(|model| model.quantity).sum())
    }

    /// Per-category availability for every category with open stock,
    /// ordered by name. Categories without stock are omitted, matching the
    /// distribution form of the original system.
    pub async fn stock_levels(&self) -> ResultEngine<Vec<StockLevel>> {
        let open = donations::Entity::find()
            .filter(donations::Column::Status.eq(DonationStatus::Open.as_str()))
            .all(&self.database)
            .await?;

        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for model in open {
            *totals.entry(model.category_id).or_insert(0) += model.quantity;
        }

        let mut levels = Vec::with_capacity(totals.len());
        for model in categories::Entity::find().all(&self.database).await? {
            if let Some(available) = totals.get(&model.id).copied()
                && available > 0
            {
                levels.push(StockLevel {
                    category_id: model.id,
                    category: model.name,
                    available,
                });
            }
        }
        levels.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(levels)
    }
}
