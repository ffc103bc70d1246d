//! Stock ledger and allocation engine for donated goods.
//!
//! Donors feed the ledger with donation records, volunteers draw it down
//! through FIFO allocation, administrators manage the registries around it.
//! All state lives in the database; the engine holds no long-lived state
//! and operates transactionally per call.

pub use actors::{Actor, Role};
pub use distributions::Distribution;
pub use donations::{Donation, DonationStatus};
pub use error::EngineError;
pub use ops::{
    AllocationPolicy, AllocationRequest, CategoryView, DashboardCounts, DonationItem,
    DonationReport, Engine, EngineBuilder, LocationView, NewUser, PendingStockRow, ProfileView,
    RecipientInput, RecipientView, ReportFilter, ReportRow, StockLevel, UserView,
};

mod actors;
mod categories;
mod delivery_locations;
mod distributions;
mod donations;
mod error;
mod ops;
mod profiles;
mod recipients;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
