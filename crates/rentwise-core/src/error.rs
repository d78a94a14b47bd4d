//! Error types for the Rentwise data layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    /// The backing collection has not been provisioned yet.
    ///
    /// Readers turn this into an empty result and the profile resolver
    /// into "absent"; nothing else is smoothed over.
    #[error("Collection not provisioned: {collection}")]
    SchemaNotReady { collection: String },

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Illegal {entity} status transition: {from} -> {to}")]
    InvalidTransition {
        entity: String,
        from: String,
        to: String,
    },

    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Owner identity missing or blank")]
    OwnerContext,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RentalError {
    /// Re-labels a generic store error raised while reading.
    pub fn into_fetch_failure(self) -> Self {
        match self {
            RentalError::Database(msg) => RentalError::FetchFailed(msg),
            other => other,
        }
    }

    /// Re-labels a generic store error raised while writing.
    pub fn into_write_failure(self) -> Self {
        match self {
            RentalError::Database(msg) => RentalError::WriteFailed(msg),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RentalError::NotFound { .. })
    }
}

pub type RentalResult<T> = Result<T, RentalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_relabelled_by_direction() {
        let read = RentalError::Database("socket closed".into()).into_fetch_failure();
        assert!(matches!(read, RentalError::FetchFailed(ref m) if m == "socket closed"));

        let write = RentalError::Database("socket closed".into()).into_write_failure();
        assert!(matches!(write, RentalError::WriteFailed(_)));
    }

    #[test]
    fn narrow_errors_survive_relabelling() {
        let err = RentalError::SchemaNotReady {
            collection: "property".into(),
        }
        .into_fetch_failure();
        assert!(matches!(err, RentalError::SchemaNotReady { .. }));

        let err = RentalError::NotFound {
            entity: "property".into(),
            id: "x".into(),
        }
        .into_write_failure();
        assert!(err.is_not_found());
    }
}
