//! Shared behaviour of the stored status enums.

use crate::error::RentalError;

/// A status enum that is persisted as a fixed snake_case label.
pub trait StatusLabel: Copy {
    /// Entity name used in transition errors.
    const ENTITY: &'static str;

    fn as_str(&self) -> &'static str;

    fn transition_error(self, next: Self) -> RentalError {
        RentalError::InvalidTransition {
            entity: Self::ENTITY.into(),
            from: self.as_str().into(),
            to: next.as_str().into(),
        }
    }
}

/// Error for a stored label that matches no known status.
pub(crate) fn unknown_status(entity: &str, value: &str) -> RentalError {
    RentalError::Validation {
        message: format!("unknown {entity} status: {value}"),
    }
}
