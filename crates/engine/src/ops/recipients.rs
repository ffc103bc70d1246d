//! Recipient registry operations.

use sea_orm::{ActiveValue, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, recipients};

use super::{Engine, normalize_optional_text, normalize_required_name};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientView {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
}

impl From<recipients::Model> for RecipientView {
    fn from(model: recipients::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            tax_id: model.tax_id,
            address: model.address,
            phone: model.phone,
        }
    }
}

/// Input for creating or updating a recipient.
#[derive(Clone, Debug)]
pub struct RecipientInput {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
}

impl Engine {
    pub async fn create_recipient(&self, input: RecipientInput) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&input.name, "recipient")?;
        let tax_id = normalize_required_name(&input.tax_id, "recipient tax id")?;

        let id = Uuid::new_v4();
        let model = recipients::ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(name),
            tax_id: ActiveValue::Set(tax_id),
            address: ActiveValue::Set(input.address),
            phone: ActiveValue::Set(normalize_optional_text(input.phone.as_deref())),
        };
        model.insert(&self.database).await?;
        Ok(id)
    }

    pub async fn update_recipient(&self, id: Uuid, input: RecipientInput) -> ResultEngine<()> {
        let name = normalize_required_name(&input.name, "recipient")?;
        let tax_id = normalize_required_name(&input.tax_id, "recipient tax id")?;

        let current = recipients::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

        let mut model: recipients::ActiveModel = current.into();
        model.name = ActiveValue::Set(name);
        model.tax_id = ActiveValue::Set(tax_id);
        model.address = ActiveValue::Set(input.address);
        model.phone = ActiveValue::Set(normalize_optional_text(input.phone.as_deref()));
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_recipient(&self, id: Uuid) -> ResultEngine<()> {
        let model = recipients::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        model.delete(&self.database).await?;
        Ok(())
    }

    pub async fn recipient(&self, id: Uuid) -> ResultEngine<RecipientView> {
        recipients::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(RecipientView::from)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub async fn list_recipients(&self) -> ResultEngine<Vec<RecipientView>> {
        let models = recipients::Entity::find()
            .order_by_asc(recipients::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(RecipientView::from).collect())
    }
}
