use sea_orm::DatabaseConnection;
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

mod allocation;
mod categories;
mod donations;
mod locations;
mod recipients;
mod reports;
mod stock;
mod users;

pub use allocation::{AllocationPolicy, AllocationRequest};
pub use categories::CategoryView;
pub use donations::{DonationItem, PendingStockRow};
pub use locations::LocationView;
pub use recipients::{RecipientInput, RecipientView};
pub use reports::{DashboardCounts, DonationReport, ReportFilter, ReportRow};
pub use stock::StockLevel;
pub use users::{NewUser, ProfileView, UserView};

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:block) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Canonical lookup key for registry names (case and unicode-form
/// insensitive).
fn normalize_name_key(value: &str) -> String {
    value.nfkc().collect::<String>().to_lowercase()
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_folds_case_and_unicode_form() {
        assert_eq!(normalize_name_key("Arroz"), "arroz");
        // NFKC folds the ﬁ ligature.
        assert_eq!(normalize_name_key("ﬁltros"), "filtros");
    }

    #[test]
    fn required_name_trims_and_rejects_empty() {
        assert_eq!(
            normalize_required_name("  Rice ", "category").unwrap(),
            "Rice"
        );
        assert!(normalize_required_name("   ", "category").is_err());
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" note ")),
            Some("note".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }
}
