//! Delivery-location registry operations.

use sea_orm::{ActiveValue, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, delivery_locations};

use super::{Engine, normalize_required_name};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationView {
    pub id: Uuid,
    pub name: String,
}

impl From<delivery_locations::Model> for LocationView {
    fn from(model: delivery_locations::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl Engine {
    pub async fn create_location(&self, name: &str) -> ResultEngine<Uuid> {
        let display = normalize_required_name(name, "delivery location")?;

        let id = Uuid::new_v4();
        let model = delivery_locations::ActiveModel {
            id: ActiveValue::Set(id),
            name: ActiveValue::Set(display),
        };
        model.insert(&self.database).await?;
        Ok(id)
    }

    pub async fn rename_location(&self, id: Uuid, name: &str) -> ResultEngine<()> {
        let display = normalize_required_name(name, "delivery location")?;

        let current = delivery_locations::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

        let mut model: delivery_locations::ActiveModel = current.into();
        model.name = ActiveValue::Set(display);
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn delete_location(&self, id: Uuid) -> ResultEngine<()> {
        let model = delivery_locations::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        model.delete(&self.database).await?;
        Ok(())
    }

    pub async fn location(&self, id: Uuid) -> ResultEngine<LocationView> {
        delivery_locations::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(LocationView::from)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub async fn list_locations(&self) -> ResultEngine<Vec<LocationView>> {
        let models = delivery_locations::Entity::find()
            .order_by_asc(delivery_locations::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(LocationView::from).collect())
    }
}
