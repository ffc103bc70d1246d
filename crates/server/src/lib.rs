use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{Actor, EngineError};

use serde::Serialize;
pub use server::{app, run, run_with_listener, spawn_with_listener};

mod categories;
mod distributions;
mod donations;
mod locations;
mod recipients;
mod reports;
mod server;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{
            ProfileUpdate, ProfileView, RegisterRequest, RoleUpdate, StatusUpdate, UserCreate,
            UserView, UsersResponse,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoriesResponse, CategoryCreated, CategoryNew, CategoryUpdate, CategoryView,
        };
    }

    pub mod location {
        pub use api_types::location::{
            LocationCreated, LocationNew, LocationUpdate, LocationView, LocationsResponse,
        };
    }

    pub mod recipient {
        pub use api_types::recipient::{
            RecipientCreated, RecipientNew, RecipientUpdate, RecipientView, RecipientsResponse,
        };
    }

    pub mod donation {
        pub use api_types::donation::{
            DonationBatchNew, DonationItemNew, DonationView, DonationsCreated, DonationsResponse,
            PendingStockResponse, PendingStockView, StockLevelView, StockResponse,
        };
    }

    pub mod distribution {
        pub use api_types::distribution::{
            DistributionItem, DistributionNew, DistributionView, DistributionsCreated,
        };
    }

    pub mod report {
        pub use api_types::report::{ReportQuery, ReportResponse, ReportRowView};
    }

    pub mod stats {
        pub use api_types::stats::Statistic;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidQuantity(_)
        | EngineError::InvalidName(_)
        | EngineError::InsufficientStock(_)
        | EngineError::InactiveUser(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Administrator-only guard.
fn require_administrator(actor: &Actor) -> Result<(), ServerError> {
    match actor {
        Actor::Administrator { .. } => Ok(()),
        Actor::Donor { .. } | Actor::Volunteer { .. } | Actor::Unassigned { .. } => {
            Err(ServerError::Engine(EngineError::Forbidden(
                "administrator access required".to_string(),
            )))
        }
    }
}

/// Distribution-side guard: volunteers do the work, administrators may too.
fn require_volunteer(actor: &Actor) -> Result<(), ServerError> {
    match actor {
        Actor::Volunteer { .. } | Actor::Administrator { .. } => Ok(()),
        Actor::Donor { .. } | Actor::Unassigned { .. } => {
            Err(ServerError::Engine(EngineError::Forbidden(
                "volunteer access required".to_string(),
            )))
        }
    }
}

/// Intake-side guard: only donors register donations.
fn require_donor(actor: &Actor) -> Result<(), ServerError> {
    match actor {
        Actor::Donor { .. } => Ok(()),
        Actor::Volunteer { .. } | Actor::Administrator { .. } | Actor::Unassigned { .. } => {
            Err(ServerError::Engine(EngineError::Forbidden(
                "donor access required".to_string(),
            )))
        }
    }
}

fn map_status(status: engine::DonationStatus) -> api_types::DonationStatus {
    match status {
        engine::DonationStatus::Open => api_types::DonationStatus::Open,
        engine::DonationStatus::Closed => api_types::DonationStatus::Closed,
    }
}

fn map_role(role: api_types::Role) -> engine::Role {
    match role {
        api_types::Role::Donor => engine::Role::Donor,
        api_types::Role::Volunteer => engine::Role::Volunteer,
        api_types::Role::Administrator => engine::Role::Administrator,
    }
}

fn map_role_back(role: engine::Role) -> api_types::Role {
    match role {
        engine::Role::Donor => api_types::Role::Donor,
        engine::Role::Volunteer => api_types::Role::Volunteer,
        engine::Role::Administrator => api_types::Role::Administrator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res =
            ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidQuantity("x".to_string()),
            EngineError::InvalidName("x".to_string()),
            EngineError::InsufficientStock("x".to_string()),
            EngineError::InactiveUser("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn guards_dispatch_on_actor_kind() {
        let admin = Actor::Administrator {
            username: "root".to_string(),
        };
        let donor = Actor::Donor {
            username: "alice".to_string(),
        };
        let volunteer = Actor::Volunteer {
            username: "vera".to_string(),
        };
        let unassigned = Actor::Unassigned {
            username: "ghost".to_string(),
        };

        assert!(require_administrator(&admin).is_ok());
        assert!(require_administrator(&volunteer).is_err());

        assert!(require_volunteer(&volunteer).is_ok());
        assert!(require_volunteer(&admin).is_ok());
        assert!(require_volunteer(&donor).is_err());

        assert!(require_donor(&donor).is_ok());
        assert!(require_donor(&admin).is_err());
        assert!(require_donor(&unassigned).is_err());
    }
}
