//! Database-specific error types and conversions.

use rentwise_core::error::RentalError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity} with id {id}")]
    AlreadyExists { entity: String, id: String },

    /// The table has not been defined in this database yet.
    #[error("Table not provisioned: {table}")]
    SchemaNotReady { table: String },

    /// The store refused to order or limit the filtered query.
    #[error("Ordered query not supported: {0}")]
    OrderingUnsupported(String),

    #[error("Invalid stored value: {0}")]
    Decode(String),
}

impl DbError {
    /// Map a store error onto the narrow variants callers branch on.
    pub fn classify(err: surrealdb::Error) -> Self {
        classify_message(&err.to_string()).unwrap_or(DbError::Surreal(err))
    }

    pub(crate) fn decode(what: &str, err: impl std::fmt::Display) -> Self {
        DbError::Decode(format!("{what}: {err}"))
    }
}

impl From<surrealdb::Error> for DbError {
    fn from(err: surrealdb::Error) -> Self {
        DbError::classify(err)
    }
}

/// Message-based classification; `None` leaves the error generic.
pub(crate) fn classify_message(message: &str) -> Option<DbError> {
    let lower = message.to_ascii_lowercase();

    if lower.contains("already exists") {
        return Some(DbError::AlreadyExists {
            entity: "record".into(),
            id: quoted_name(message).unwrap_or_else(|| message.to_string()),
        });
    }
    // Only a missing table counts; a missing namespace, database or
    // index is a real configuration fault.
    if lower.contains("table") && lower.contains("does not exist") {
        return Some(DbError::SchemaNotReady {
            table: quoted_name(message).unwrap_or_else(|| "unknown".into()),
        });
    }
    if lower.contains("order idiom") || lower.contains("cannot order") {
        return Some(DbError::OrderingUnsupported(message.to_string()));
    }
    None
}

/// First name wrapped in backticks or single quotes.
fn quoted_name(message: &str) -> Option<String> {
    for quote in ['`', '\''] {
        let mut parts = message.split(quote);
        if let (Some(_), Some(name), Some(_)) = (parts.next(), parts.next(), parts.next()) {
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

impl From<DbError> for RentalError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RentalError::NotFound { entity, id },
            DbError::AlreadyExists { entity, id } => RentalError::AlreadyExists { entity, id },
            DbError::SchemaNotReady { table } => RentalError::SchemaNotReady { collection: table },
            other => RentalError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_record_is_already_exists() {
        let err = classify_message("Database record `landlord_profile:owner-1` already exists");
        match err {
            Some(DbError::AlreadyExists { id, .. }) => assert_eq!(id, "landlord_profile:owner-1"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_table_is_schema_not_ready() {
        let err = classify_message("The table 'payment' does not exist");
        match err {
            Some(DbError::SchemaNotReady { table }) => assert_eq!(table, "payment"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn missing_namespace_stays_generic() {
        assert!(classify_message("The namespace 'prod' does not exist").is_none());
        assert!(classify_message("The index 'idx_x' does not exist").is_none());
        assert!(classify_message("connection reset by peer").is_none());
    }

    #[test]
    fn ordering_rejections_are_recognised() {
        assert!(matches!(
            classify_message("Missing order idiom `payment_date` in statement selection"),
            Some(DbError::OrderingUnsupported(_))
        ));
    }

    #[test]
    fn conversion_keeps_narrow_variants() {
        let err: RentalError = DbError::SchemaNotReady {
            table: "property".into(),
        }
        .into();
        assert!(matches!(err, RentalError::SchemaNotReady { collection } if collection == "property"));

        let err: RentalError = DbError::Decode("bad uuid".into()).into();
        assert!(matches!(err, RentalError::Database(_)));
    }
}
