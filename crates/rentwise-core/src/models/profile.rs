//! Landlord profile domain model.
//!
//! One profile per owner, keyed by the owner id itself. The counters are
//! denormalized copies of dashboard figures, not sources of truth.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::owner::OwnerId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankDetails {
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub routing_number: Option<String>,
    pub sort_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub notifications_enabled: bool,
    pub auto_approve_applications: bool,
    pub maintenance_notifications: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            auto_approve_applications: false,
            maintenance_notifications: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandlordProfile {
    pub owner_id: OwnerId,
    pub display_name: Option<String>,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub bank: BankDetails,
    pub settings: ProfileSettings,
    /// Data URL or http(s) URL; anything else is stripped on write.
    pub profile_image: Option<String>,
    pub verified: bool,
    pub total_properties: u32,
    pub active_tenants: u32,
    pub monthly_revenue: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session-derived values used only when a profile is first created.
#[derive(Debug, Clone, Default)]
pub struct ProfileSeed {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub owner_id: OwnerId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub settings: ProfileSettings,
}

impl CreateProfile {
    /// A fresh, unverified profile with zeroed counters.
    pub fn with_defaults(owner_id: OwnerId, seed: ProfileSeed) -> Self {
        Self {
            owner_id,
            display_name: seed.display_name,
            email: seed.email,
            settings: ProfileSettings::default(),
        }
    }
}

/// Denormalized dashboard figures copied onto the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCounters {
    pub total_properties: u32,
    pub active_tenants: u32,
    pub monthly_revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_notifications_on() {
        let settings = ProfileSettings::default();
        assert!(settings.notifications_enabled);
        assert!(!settings.auto_approve_applications);
        assert!(settings.maintenance_notifications);
    }

    #[test]
    fn partial_settings_fill_from_defaults() {
        let settings: ProfileSettings =
            serde_json::from_value(serde_json::json!({"auto_approve_applications": true})).unwrap();
        assert!(settings.auto_approve_applications);
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn seed_only_touches_contact_fields() {
        let owner = OwnerId::parse("owner-1").unwrap();
        let input = CreateProfile::with_defaults(
            owner.clone(),
            ProfileSeed {
                email: Some("pat@example.com".into()),
                display_name: None,
            },
        );
        assert_eq!(input.owner_id, owner);
        assert_eq!(input.email.as_deref(), Some("pat@example.com"));
        assert_eq!(input.settings, ProfileSettings::default());
    }
}
