use thiserror::Error;

/// Errors surfaced by the remote table client.
///
/// Unique violations and missing rows get their own variants so
/// callers can map them to 409/404 without string matching.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert hit the table's uniqueness constraint.
    #[error("Duplicate key in {table}: {id}")]
    UniqueViolation { table: &'static str, id: String },

    /// An identifier-keyed update or select found no row.
    #[error("No row in {table} for {id}")]
    RowNotFound { table: &'static str, id: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// True for uniqueness-constraint conflicts.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }

    /// True when an identifier-keyed operation found no row.
    pub fn is_row_not_found(&self) -> bool {
        matches!(self, StoreError::RowNotFound { .. })
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
