//! Donation records: the rows the stock ledger is made of.
//!
//! A donation is created with `quantity == initial_quantity` and stays open
//! until the allocation path has drawn it down to zero. `initial_quantity`
//! is fixed at creation; only [`Donation::draw`] mutates `quantity` and
//! `status`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Open,
    Closed,
}

impl DonationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for DonationStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(EngineError::InvalidName(format!(
                "invalid donation status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub quantity: i64,
    pub initial_quantity: i64,
    pub location_id: Uuid,
    pub donor_id: String,
    pub created_at: DateTime<Utc>,
    pub status: DonationStatus,
}

impl Donation {
    pub fn new(
        category_id: Uuid,
        description: String,
        quantity: i64,
        location_id: Uuid,
        donor_id: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if quantity <= 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            category_id,
            description,
            quantity,
            initial_quantity: quantity,
            location_id,
            donor_id,
            created_at,
            status: DonationStatus::Open,
        })
    }

    /// Draws up to `want` units from the record, closing it when the
    /// remaining quantity reaches zero. Returns the amount actually taken;
    /// closed or empty records yield zero.
    pub fn draw(&mut self, want: i64) -> i64 {
        if self.status == DonationStatus::Closed || self.quantity <= 0 || want <= 0 {
            return 0;
        }
        let used = want.min(self.quantity);
        self.quantity -= used;
        if self.quantity == 0 {
            self.status = DonationStatus::Closed;
        }
        used
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub description: String,
    pub quantity: i64,
    pub initial_quantity: i64,
    pub location_id: Uuid,
    pub donor_id: String,
    pub created_at: DateTimeUtc,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::delivery_locations::Entity",
        from = "Column::LocationId",
        to = "super::delivery_locations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DonorId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Donor,
    #[sea_orm(has_many = "super::distributions::Entity")]
    Distributions,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::delivery_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donor.def()
    }
}

impl Related<super::distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Distributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Donation> for ActiveModel {
    fn from(donation: &Donation) -> Self {
        Self {
            id: ActiveValue::Set(donation.id),
            category_id: ActiveValue::Set(donation.category_id),
            description: ActiveValue::Set(donation.description.clone()),
            quantity: ActiveValue::Set(donation.quantity),
            initial_quantity: ActiveValue::Set(donation.initial_quantity),
            location_id: ActiveValue::Set(donation.location_id),
            donor_id: ActiveValue::Set(donation.donor_id.clone()),
            created_at: ActiveValue::Set(donation.created_at),
            status: ActiveValue::Set(donation.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Donation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            category_id: model.category_id,
            description: model.description,
            quantity: model.quantity,
            initial_quantity: model.initial_quantity,
            location_id: model.location_id,
            donor_id: model.donor_id,
            created_at: model.created_at,
            status: DonationStatus::try_from(model.status.as_str())?,
        })
    }
}
