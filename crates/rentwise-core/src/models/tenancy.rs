//! Tenancy domain model.
//!
//! A tenancy links an occupant to one of the landlord's properties. The
//! nested info blocks are stored as free-form objects; absent blocks and
//! absent fields inside them normalize to their defaults.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::OwnerId;
use crate::timestamp::lenient_option;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "lenient_option")]
    pub date_of_birth: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseInfo {
    #[serde(with = "lenient_option")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(with = "lenient_option")]
    pub end_date: Option<DateTime<Utc>>,
    pub monthly_rent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInfo {
    #[serde(with = "lenient_option")]
    pub next_due_date: Option<DateTime<Utc>>,
    #[serde(with = "lenient_option")]
    pub last_payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenancy {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub personal_info: PersonalInfo,
    pub lease_info: LeaseInfo,
    pub payment_info: PaymentInfo,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenancy {
    pub owner_id: OwnerId,
    pub property_id: Uuid,
    pub personal_info: PersonalInfo,
    pub lease_info: LeaseInfo,
    pub payment_info: PaymentInfo,
}

/// Decode a stored nested block, falling back to defaults when the block
/// is absent or unreadable.
pub fn normalize_block<T: Default + serde::de::DeserializeOwned>(
    block: Option<serde_json::Value>,
) -> T {
    match block {
        None | Some(serde_json::Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "malformed nested block replaced with defaults");
            T::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn absent_block_defaults() {
        let info: PaymentInfo = normalize_block(None);
        assert_eq!(info, PaymentInfo::default());

        let info: LeaseInfo = normalize_block(Some(serde_json::Value::Null));
        assert_eq!(info.monthly_rent, Decimal::ZERO);
    }

    #[test]
    fn partial_block_keeps_known_fields() {
        let info: LeaseInfo = normalize_block(Some(json!({
            "start_date": 1_704_067_200_000_i64,
            "monthly_rent": "1450.00"
        })));
        assert_eq!(
            info.start_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(info.end_date.is_none());
        assert_eq!(info.monthly_rent, dec!(1450.00));
    }

    #[test]
    fn malformed_block_defaults() {
        let info: PersonalInfo = normalize_block(Some(json!("not an object")));
        assert_eq!(info, PersonalInfo::default());
    }
}
