//! Registration, profile and user-administration endpoints.

use api_types::user::{
    ProfileUpdate, ProfileView, RegisterRequest, RoleUpdate, StatusUpdate, UserCreate, UserView,
    UsersResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Actor, EngineError, NewUser};

use crate::{ServerError, map_role, map_role_back, require_administrator, server::ServerState};

/// Public self-registration. Administrators cannot be created here; the
/// engine also rejects them.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .register_user(NewUser {
            username: payload.username,
            password: payload.password,
            role: map_role(payload.role),
            tax_id: payload.tax_id,
            birth_date: payload.birth_date,
            address: payload.address,
            phone: payload.phone,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn get_profile(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<ProfileView>, ServerError> {
    let profile = state.engine.profile(actor.username()).await?;

    Ok(Json(ProfileView {
        username: profile.username,
        role: map_role_back(profile.role),
        tax_id: profile.tax_id,
        birth_date: profile.birth_date,
        address: profile.address,
        phone: profile.phone,
    }))
}

pub async fn update_profile(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_profile(
            actor.username(),
            payload.address.as_deref(),
            payload.phone.as_deref(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<UsersResponse>, ServerError> {
    require_administrator(&actor)?;

    let users = state
        .engine
        .list_users()
        .await?
        .into_iter()
        .map(|user| UserView {
            username: user.username,
            role: user.role.map(map_role_back),
            active: user.active,
        })
        .collect();

    Ok(Json(UsersResponse { users }))
}

/// Admin user creation: any role, active from the start.
pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state
        .engine
        .create_user(
            NewUser {
                username: payload.username,
                password: payload.password,
                role: map_role(payload.role),
                tax_id: payload.tax_id,
                birth_date: payload.birth_date,
                address: payload.address,
                phone: payload.phone,
            },
            true,
        )
        .await?;

    Ok(StatusCode::CREATED)
}

pub async fn set_status(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state
        .engine
        .set_user_active(&username, payload.active)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_role(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    state
        .engine
        .set_user_role(&username, map_role(payload.role))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ServerError> {
    require_administrator(&actor)?;

    if actor.username() == username {
        return Err(ServerError::Engine(EngineError::Forbidden(
            "cannot delete yourself".to_string(),
        )));
    }

    state.engine.delete_user(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
