//! Request/response types of the HTTP API.

use serde::{Deserialize, Serialize};

/// Role carried by a user profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    Volunteer,
    Administrator,
}

/// Donation record status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Open,
    Closed,
}

pub mod user {
    use super::*;
    use chrono::NaiveDate;

    /// Self-registration payload. The server rejects `administrator`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub username: String,
        pub password: String,
        pub role: Role,
        pub tax_id: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub address: Option<String>,
        pub phone: Option<String>,
    }

    /// Admin user creation (any role, starts active).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserCreate {
        pub username: String,
        pub password: String,
        pub role: Role,
        pub tax_id: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub address: Option<String>,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
        pub role: Option<Role>,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<UserView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusUpdate {
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RoleUpdate {
        pub role: Role,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub address: Option<String>,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileView {
        pub username: String,
        pub role: Role,
        pub tax_id: Option<String>,
        pub birth_date: Option<NaiveDate>,
        pub address: Option<String>,
        pub phone: Option<String>,
    }
}

pub mod category {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod location {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationView {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LocationsResponse {
        pub locations: Vec<LocationView>,
    }
}

pub mod recipient {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientNew {
        pub name: String,
        pub tax_id: String,
        pub address: String,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientUpdate {
        pub name: String,
        pub tax_id: String,
        pub address: String,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientView {
        pub id: Uuid,
        pub name: String,
        pub tax_id: String,
        pub address: String,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientsResponse {
        pub recipients: Vec<RecipientView>,
    }
}

pub mod donation {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// One line of the multi-category intake form.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationItemNew {
        pub category_id: Uuid,
        pub quantity: i64,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationBatchNew {
        pub location_id: Uuid,
        pub description: Option<String>,
        pub items: Vec<DonationItemNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationsCreated {
        pub ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub description: String,
        pub quantity: i64,
        pub initial_quantity: i64,
        pub location_id: Uuid,
        pub created_at: DateTime<Utc>,
        pub status: DonationStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationsResponse {
        pub donations: Vec<DonationView>,
    }

    /// Open stock grouped by category and delivery location.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingStockView {
        pub category: String,
        pub location: String,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingStockResponse {
        pub rows: Vec<PendingStockView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockLevelView {
        pub category_id: Uuid,
        pub category: String,
        pub available: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StockResponse {
        pub levels: Vec<StockLevelView>,
    }
}

pub mod distribution {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributionItem {
        pub category_id: Uuid,
        pub quantity: i64,
    }

    /// Allocation call: strict by default, `best_effort: true` restores the
    /// silent-truncation behavior.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributionNew {
        pub recipient_id: Uuid,
        pub items: Vec<DistributionItem>,
        pub best_effort: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributionView {
        pub id: Uuid,
        pub donation_id: Uuid,
        pub recipient_id: Uuid,
        pub quantity: i64,
        pub distributed_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DistributionsCreated {
        pub distributions: Vec<DistributionView>,
    }
}

pub mod report {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub category_id: Option<Uuid>,
        pub location_id: Option<Uuid>,
        pub status: Option<DonationStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportRowView {
        pub category: String,
        pub location: String,
        pub donor: String,
        pub quantity: i64,
        pub status: DonationStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportResponse {
        pub rows: Vec<ReportRowView>,
        pub total: i64,
    }
}

pub mod stats {
    use super::*;

    /// Dashboard counters.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Statistic {
        pub users: u64,
        pub categories: u64,
        pub recipients: u64,
        pub locations: u64,
    }
}
