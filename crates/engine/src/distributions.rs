//! Distribution records: the append-only ledger of what was handed out.
//!
//! Many distributions may reference one donation (partial fulfillments).
//! For every donation, `quantity + SUM(distributions.quantity)` equals its
//! `initial_quantity`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: Uuid,
    pub donation_id: Uuid,
    pub recipient_id: Uuid,
    pub quantity: i64,
    pub distributed_at: DateTime<Utc>,
}

impl Distribution {
    pub fn new(
        donation_id: Uuid,
        recipient_id: Uuid,
        quantity: i64,
        distributed_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "distributed quantity must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            donation_id,
            recipient_id,
            quantity,
            distributed_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donation_id: Uuid,
    pub recipient_id: Uuid,
    pub quantity: i64,
    pub distributed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donations::Entity",
        from = "Column::DonationId",
        to = "super::donations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Donation,
    #[sea_orm(
        belongs_to = "super::recipients::Entity",
        from = "Column::RecipientId",
        to = "super::recipients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl Related<super::donations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donation.def()
    }
}

impl Related<super::recipients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Distribution> for ActiveModel {
    fn from(dist: &Distribution) -> Self {
        Self {
            id: ActiveValue::Set(dist.id),
            donation_id: ActiveValue::Set(dist.donation_id),
            recipient_id: ActiveValue::Set(dist.recipient_id),
            quantity: ActiveValue::Set(dist.quantity),
            distributed_at: ActiveValue::Set(dist.distributed_at),
        }
    }
}

impl From<Model> for Distribution {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            donation_id: model.donation_id,
            recipient_id: model.recipient_id,
            quantity: model.quantity,
            distributed_at: model.distributed_at,
        }
    }
}
