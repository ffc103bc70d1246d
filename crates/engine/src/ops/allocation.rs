//! The allocation engine: draws requested quantities out of open donation
//! records, oldest first, emitting distribution records.
//!
//! Each call runs inside one database transaction: the FIFO read, the
//! quantity decrements and the distribution inserts commit together or not
//! at all. SQLite serializes writing transactions, so two concurrent
//! allocations against the same category cannot interleave between the
//! read and the decrement.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Distribution, Donation, DonationStatus, EngineError, ResultEngine, distributions, donations,
    recipients,
};

use super::{Engine, with_tx};

/// Requested quantity for one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationRequest {
    pub category_id: Uuid,
    pub quantity: i64,
}

/// What to do when a category cannot be fully satisfied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AllocationPolicy {
    /// Allocate what is there and drop the remainder silently (the
    /// historical behavior).
    BestEffort,
    /// Fail the whole call with [`EngineError::InsufficientStock`] and roll
    /// everything back, including other categories of the same call.
    #[default]
    Strict,
}

impl Engine {
    /// Distributes the requested quantities to a recipient.
    ///
    /// Per category, open donations are consumed in `created_at` order
    /// (ties broken by id): each record is drawn down by
    /// `min(remaining, record.quantity)`, a distribution record is emitted,
    /// and records reaching zero are closed. The summed distributions per
    /// category never exceed the requested quantity.
    pub async fn allocate(
        &self,
        recipient_id: Uuid,
        requests: &[AllocationRequest],
        policy: AllocationPolicy,
        distributed_at: DateTime<Utc>,
    ) -> ResultEngine<Vec<Distribution>> {
        for request in requests {
            if request.quantity <= 0 {
                return Err(EngineError::InvalidQuantity(
                    "requested quantity must be > 0".to_string(),
                ));
            }
        }

        with_tx!(self, |tx| {
            recipients::Entity::find_by_id(recipient_id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("recipient not exists".to_string()))?;

            let mut emitted = Vec::new();
            for request in requests {
                let open = donations::Entity::find()
                    .filter(donations::Column::CategoryId.eq(request.category_id))
                    .filter(donations::Column::Status.eq(DonationStatus::Open.as_str()))
                    .order_by_asc(donations::Column::CreatedAt)
                    .order_by_asc(donations::Column::Id)
                    .all(&tx)
                    .await?;

                let mut remaining = request.quantity;
                for model in open {
                    if remaining == 0 {
                        break;
                    }

                    let mut donation = Donation::try_from(model)?;
                    let used = donation.draw(remaining);
                    if used == 0 {
                        continue;
                    }

                    let dist =
                        Distribution::new(donation.id, recipient_id, used, distributed_at)?;
                    distributions::ActiveModel::from(&dist).insert(&tx).await?;

                    let update = donations::ActiveModel {
                        id: ActiveValue::Set(donation.id),
                        quantity: ActiveValue::Set(donation.quantity),
                        status: ActiveValue::Set(donation.status.as_str().to_string()),
                        ..Default::default()
                    };
                    update.update(&tx).await?;

                    remaining -= used;
                    emitted.push(dist);
                }

                if remaining > 0 && policy == AllocationPolicy::Strict {
                    return Err(EngineError::InsufficientStock(format!(
                        "category {} is short by {remaining}",
                        request.category_id
                    )));
                }
            }

            Ok(emitted)
        })
    }
}
