//! User and profile operations.
//!
//! The original system created profiles from a save hook on the user; here
//! the profile row is constructed explicitly, inside the same transaction
//! as the user row.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Actor, EngineError, ResultEngine, Role, profiles, users};

use super::{Engine, normalize_required_name, with_tx};

/// Input for creating a user together with its profile.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Admin-facing listing row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserView {
    pub username: String,
    pub role: Option<Role>,
    pub active: bool,
}

/// A user's own profile, as returned to the authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub role: Role,
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Engine {
    /// Self-service registration.
    ///
    /// Donors start active; volunteers start inactive and wait for an
    /// administrator to activate them. Administrators cannot be created
    /// through this path.
    pub async fn register_user(&self, new: NewUser) -> ResultEngine<()> {
        match new.role {
            Role::Administrator => Err(EngineError::Forbidden(
                "registration cannot create administrators".to_string(),
            )),
            Role::Donor => self.create_user(new, true).await,
            Role::Volunteer => self.create_user(new, false).await,
        }
    }

    /// Creates a user and its profile in one transaction.
    pub async fn create_user(&self, new: NewUser, active: bool) -> ResultEngine<()> {
        let username = normalize_required_name(&new.username, "user")?;
        if new.password.is_empty() {
            return Err(EngineError::InvalidName(
                "password must not be empty".to_string(),
            ));
        }

        with_tx!(self, |tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username.clone()));
            }

            let user = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(new.password.clone()),
                active: ActiveValue::Set(active),
            };
            user.insert(&tx).await?;

            let profile = profiles::ActiveModel {
                user_id: ActiveValue::Set(username.clone()),
                role: ActiveValue::Set(new.role.as_str().to_string()),
                tax_id: ActiveValue::Set(new.tax_id.clone()),
                birth_date: ActiveValue::Set(new.birth_date),
                address: ActiveValue::Set(new.address.clone()),
                phone: ActiveValue::Set(new.phone.clone()),
            };
            profile.insert(&tx).await?;

            Ok(())
        })
    }

    /// Resolves a username to its [`Actor`]. Missing profiles resolve to
    /// `Actor::Unassigned`, not an error.
    pub async fn actor(&self, username: &str) -> ResultEngine<Actor> {
        let profile = profiles::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?;
        let role = match profile {
            Some(model) => Some(Role::try_from(model.role.as_str())?),
            None => None,
        };
        Ok(Actor::from_role(username.to_string(), role))
    }

    /// Verifies credentials and resolves the actor. Inactive accounts are
    /// rejected even with correct credentials.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Actor> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Password.eq(password))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        if !user.active {
            return Err(EngineError::InactiveUser(user.username));
        }

        self.actor(&user.username).await
    }

    /// Activation toggle. Administrators cannot be deactivated.
    pub async fn set_user_active(&self, username: &str, active: bool) -> ResultEngine<()> {
        let actor = self.actor(username).await?;
        if actor.is_administrator() {
            return Err(EngineError::Forbidden(
                "cannot change the status of administrators".to_string(),
            ));
        }

        let user = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))?;

        let mut model: users::ActiveModel = user.into();
        model.active = ActiveValue::Set(active);
        model.update(&self.database).await?;
        Ok(())
    }

    /// Self-service profile edit (address and phone only).
    pub async fn update_profile(
        &self,
        username: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> ResultEngine<()> {
        let profile = profiles::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))?;

        let mut model: profiles::ActiveModel = profile.into();
        if let Some(address) = address {
            model.address = ActiveValue::Set(Some(address.to_string()));
        }
        if let Some(phone) = phone {
            model.phone = ActiveValue::Set(Some(phone.to_string()));
        }
        model.update(&self.database).await?;
        Ok(())
    }

    /// Admin edit: reassign the role of an existing user.
    pub async fn set_user_role(&self, username: &str, role: Role) -> ResultEngine<()> {
        let profile = profiles::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))?;

        let mut model: profiles::ActiveModel = profile.into();
        model.role = ActiveValue::Set(role.as_str().to_string());
        model.update(&self.database).await?;
        Ok(())
    }

    pub async fn profile(&self, username: &str) -> ResultEngine<ProfileView> {
        let model = profiles::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))?;

        Ok(ProfileView {
            username: model.user_id,
            role: Role::try_from(model.role.as_str())?,
            tax_id: model.tax_id,
            birth_date: model.birth_date,
            address: model.address,
            phone: model.phone,
        })
    }

    pub async fn list_users(&self) -> ResultEngine<Vec<UserView>> {
        let rows: Vec<(users::Model, Option<profiles::Model>)> = users::Entity::find()
            .find_also_related(profiles::Entity)
            .order_by_asc(users::Column::Username)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (user, profile) in rows {
            let role = match profile {
                Some(model) => Some(Role::try_from(model.role.as_str())?),
                None => None,
            };
            out.push(UserView {
                username: user.username,
                role,
                active: user.active,
            });
        }
        Ok(out)
    }

    /// Removes a user and its profile. The caller guard ("not yourself")
    /// lives at the server layer.
    pub async fn delete_user(&self, username: &str) -> ResultEngine<()> {
        with_tx!(self, |tx| {
            let user = users::Entity::find_by_id(username.to_string())
                .one(&tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(username.to_string()))?;

            if let Some(profile) = profiles::Entity::find_by_id(username.to_string())
                .one(&tx)
                .await?
            {
                profile.delete(&tx).await?;
            }
            user.delete(&tx).await?;
            Ok(())
        })
    }
}
