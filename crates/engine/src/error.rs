//! The module contains the error the engine can throw.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Inactive user: {0}")]
    InactiveUser(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InactiveUser(a), Self::InactiveUser(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
