// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] tiberius::error::Error),

    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("Result set is missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("Column '{column}' has unexpected type {found}")]
    UnexpectedType { column: &'static str, found: &'static str },

    #[error("Column '{column}' value {value} is out of range")]
    OutOfRange { column: &'static str, value: i64 },

    #[error("Column '{0}' is NULL")]
    UnexpectedNull(&'static str),
}

impl DashboardError {
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::Config { key: key.into(), reason: reason.into() }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
