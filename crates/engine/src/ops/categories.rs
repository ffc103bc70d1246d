//! Category registry operations.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, categories};

use super::{Engine, normalize_name_key, normalize_required_name, with_tx};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
}

impl From<categories::Model> for CategoryView {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl Engine {
    /// Creates a category; names are unique under unicode/case folding.
    pub async fn create_category(&self, name: &str) -> ResultEngine<Uuid> {
        let display = normalize_required_name(name, "category")?;
        let norm = normalize_name_key(&display);

        with_tx!(self, |tx| {
            if categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(norm.clone()))
                .one(&tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(display.clone()));
            }

            let id = Uuid::new_v4();
            let model = categories::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(display.clone()),
                name_norm: ActiveValue::Set(norm.clone()),
            };
            model.insert(&tx).await?;
            Ok(id)
        })
    }

    pub async fn rename_category(&self, id: Uuid, name: &str) -> ResultEngine<()> {
        let display = normalize_required_name(name, "category")?;
        let norm = normalize_name_key(&display);

        with_tx!(self, |tx| {
            let current = categories::Entity::find_by_id(id)
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;

            if let Some(clash) = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(norm.clone()))
                .one(&tx)
                .await?
                && clash.id != current.id
            {
                return Err(EngineError::ExistingKey(display.clone()));
            }

            let mut model: categories::ActiveModel = current.into();
            model.name = ActiveValue::Set(display.clone());
            model.name_norm = ActiveValue::Set(norm.clone());
            model.update(&tx).await?;
            Ok(())
        })
    }

    /// Administrative delete. Donations of the category go with it (FK
    /// cascade), matching the original system.
    pub async fn delete_category(&self, id: Uuid) -> ResultEngine<()> {
        let model = categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        model.delete(&self.database).await?;
        Ok(())
    }

    pub async fn category(&self, id: Uuid) -> ResultEngine<CategoryView> {
        categories::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(CategoryView::from)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub async fn list_categories(&self) -> ResultEngine<Vec<CategoryView>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(CategoryView::from).collect())
    }
}
