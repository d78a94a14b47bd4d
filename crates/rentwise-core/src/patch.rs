//! Partial-update payloads with explicit field whitelists.
//!
//! Each entity kind has its own patch type listing exactly the fields an
//! owner may change. Loosely-typed payloads go through `from_json`, which
//! strips keys outside the whitelist instead of failing the write.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RentalError, RentalResult};
use crate::models::application::ApplicationStatus;
use crate::models::profile::{BankDetails, ProfileSettings};
use crate::models::property::PropertyStatus;

/// A patch together with the keys that were dropped while building it.
#[derive(Debug, Clone)]
pub struct Sanitized<P> {
    pub patch: P,
    pub stripped: Vec<String>,
}

fn split_whitelisted<P: DeserializeOwned>(
    payload: serde_json::Value,
    allowed: &[&str],
) -> RentalResult<Sanitized<P>> {
    let serde_json::Value::Object(map) = payload else {
        return Err(RentalError::Validation {
            message: "update payload must be an object".into(),
        });
    };

    let mut kept = serde_json::Map::new();
    let mut stripped = Vec::new();
    for (key, value) in map {
        if allowed.contains(&key.as_str()) {
            kept.insert(key, value);
        } else {
            stripped.push(key);
        }
    }
    stripped.sort();

    let patch = serde_json::from_value(serde_json::Value::Object(kept)).map_err(|e| {
        RentalError::Validation {
            message: format!("invalid update payload: {e}"),
        }
    })?;

    Ok(Sanitized { patch, stripped })
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub bank: Option<BankDetails>,
    pub settings: Option<ProfileSettings>,
    pub profile_image: Option<String>,
}

impl ProfilePatch {
    /// Keys an owner may set. Verification and counters are not among them.
    pub const FIELDS: &'static [&'static str] = &[
        "display_name",
        "business_name",
        "phone",
        "email",
        "address",
        "bank",
        "settings",
        "profile_image",
    ];

    pub fn from_json(payload: serde_json::Value) -> RentalResult<Sanitized<Self>> {
        let mut sanitized: Sanitized<Self> = split_whitelisted(payload, Self::FIELDS)?;
        sanitized.stripped.extend(sanitized.patch.sanitize());
        Ok(sanitized)
    }

    /// Drop field values that fail their shape checks; returns the names
    /// of the dropped fields.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        if let Some(image) = self.profile_image.as_deref() {
            if !is_acceptable_image(image) {
                tracing::warn!(
                    field = "profile_image",
                    "dropping profile image that is neither a base64 image data URL nor an http(s) URL"
                );
                self.profile_image = None;
                dropped.push("profile_image".to_string());
            }
        }
        dropped
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// `data:image/<subtype>;base64,<payload>` or an `http(s)://` URL.
pub fn is_acceptable_image(value: &str) -> bool {
    if let Some(rest) = value.strip_prefix("data:image/") {
        let Some((subtype, payload)) = rest.split_once(";base64,") else {
            return false;
        };
        return !subtype.is_empty()
            && subtype
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
            && !payload.is_empty();
    }

    ["https://", "http://"]
        .iter()
        .filter_map(|scheme| value.strip_prefix(scheme))
        .any(|host| !host.is_empty())
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub price: Option<Decimal>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    /// `Some(None)` clears the stored value; JSON `null` maps to it.
    #[serde(
        default,
        with = "::serde_with::rust::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub square_feet: Option<Option<u32>>,
    pub property_type: Option<String>,
    pub status: Option<PropertyStatus>,
    pub images: Option<Vec<String>>,
}

impl PropertyPatch {
    pub const FIELDS: &'static [&'static str] = &[
        "title",
        "description",
        "address",
        "city",
        "state",
        "postal_code",
        "price",
        "bedrooms",
        "bathrooms",
        "square_feet",
        "property_type",
        "status",
        "images",
    ];

    pub fn from_json(payload: serde_json::Value) -> RentalResult<Sanitized<Self>> {
        split_whitelisted(payload, Self::FIELDS)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub review_notes: Option<String>,
}

impl ApplicationPatch {
    pub const FIELDS: &'static [&'static str] = &["status", "review_notes"];

    pub fn from_json(payload: serde_json::Value) -> RentalResult<Sanitized<Self>> {
        split_whitelisted(payload, Self::FIELDS)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ---------------------------------------------------------------------------
// Tagged entity patch
// ---------------------------------------------------------------------------

/// A partial update addressed to one entity.
///
/// The profile is addressed by the owner id of the caller, so it carries
/// no id of its own.
#[derive(Debug, Clone)]
pub enum EntityPatch {
    Profile(ProfilePatch),
    Property { id: Uuid, patch: PropertyPatch },
    Application { id: Uuid, patch: ApplicationPatch },
}

/// The entity a loosely-typed payload is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTarget {
    Profile,
    Property(Uuid),
    Application(Uuid),
}

impl EntityPatch {
    /// Build the whitelisted patch for `target` from a raw payload.
    pub fn from_json(
        target: PatchTarget,
        payload: serde_json::Value,
    ) -> RentalResult<Sanitized<Self>> {
        Ok(match target {
            PatchTarget::Profile => {
                let Sanitized { patch, stripped } = ProfilePatch::from_json(payload)?;
                Sanitized {
                    patch: EntityPatch::Profile(patch),
                    stripped,
                }
            }
            PatchTarget::Property(id) => {
                let Sanitized { patch, stripped } = PropertyPatch::from_json(payload)?;
                Sanitized {
                    patch: EntityPatch::Property { id, patch },
                    stripped,
                }
            }
            PatchTarget::Application(id) => {
                let Sanitized { patch, stripped } = ApplicationPatch::from_json(payload)?;
                Sanitized {
                    patch: EntityPatch::Application { id, patch },
                    stripped,
                }
            }
        })
    }

    pub fn entity(&self) -> &'static str {
        match self {
            EntityPatch::Profile(_) => "landlord_profile",
            EntityPatch::Property { .. } => "property",
            EntityPatch::Application { .. } => "application",
        }
    }
}

/// What a mutation actually did with its payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Fields removed from the payload before writing.
    pub stripped: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn square_feet_distinguishes_absent_null_and_value() {
        let absent = PropertyPatch::from_json(json!({"title": "Loft"})).unwrap().patch;
        assert_eq!(absent.square_feet, None);

        let cleared = PropertyPatch::from_json(json!({"square_feet": null})).unwrap().patch;
        assert_eq!(cleared.square_feet, Some(None));
        assert!(!cleared.is_empty());

        let set = PropertyPatch::from_json(json!({"square_feet": 820})).unwrap().patch;
        assert_eq!(set.square_feet, Some(Some(820)));
    }

    #[test]
    fn accepts_data_urls_and_web_urls() {
        assert!(is_acceptable_image("data:image/png;base64,iVBORw0KGgo="));
        assert!(is_acceptable_image("data:image/svg+xml;base64,PHN2Zz4="));
        assert!(is_acceptable_image("https://cdn.example.com/a.jpg"));
        assert!(is_acceptable_image("http://example.com/a.jpg"));
    }

    #[test]
    fn rejects_other_image_shapes() {
        assert!(!is_acceptable_image("ftp://example.com/a.jpg"));
        assert!(!is_acceptable_image("data:text/plain;base64,aGk="));
        assert!(!is_acceptable_image("data:image/png,raw"));
        assert!(!is_acceptable_image("data:image/png;base64,"));
        assert!(!is_acceptable_image("https://"));
        assert!(!is_acceptable_image("C:\\photos\\me.png"));
        assert!(!is_acceptable_image(""));
    }

    #[test]
    fn profile_payload_strips_unknown_and_protected_keys() {
        let sanitized = ProfilePatch::from_json(json!({
            "display_name": "Pat",
            "verified": true,
            "monthly_revenue": 100000,
            "favourite_colour": "teal"
        }))
        .unwrap();

        assert_eq!(sanitized.patch.display_name.as_deref(), Some("Pat"));
        assert_eq!(
            sanitized.stripped,
            vec!["favourite_colour", "monthly_revenue", "verified"]
        );
    }

    #[test]
    fn bad_profile_image_is_dropped_but_rest_survives() {
        let sanitized = ProfilePatch::from_json(json!({
            "phone": "+44 113 000 0000",
            "profile_image": "not-a-url"
        }))
        .unwrap();

        assert!(sanitized.patch.profile_image.is_none());
        assert_eq!(sanitized.patch.phone.as_deref(), Some("+44 113 000 0000"));
        assert_eq!(sanitized.stripped, vec!["profile_image"]);
    }

    #[test]
    fn wrongly_typed_known_field_is_a_validation_error() {
        let err = PropertyPatch::from_json(json!({"bedrooms": "three"})).unwrap_err();
        assert!(matches!(err, RentalError::Validation { .. }));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = ApplicationPatch::from_json(json!(["approved"])).unwrap_err();
        assert!(matches!(err, RentalError::Validation { .. }));
    }

    #[test]
    fn application_payload_parses_status_label() {
        let sanitized = ApplicationPatch::from_json(json!({
            "status": "under_review",
            "reviewed_by": "someone"
        }))
        .unwrap();
        assert_eq!(sanitized.patch.status, Some(ApplicationStatus::UnderReview));
        assert_eq!(sanitized.stripped, vec!["reviewed_by"]);
    }

    #[test]
    fn targeted_payload_builds_matching_variant() {
        let id = Uuid::new_v4();
        let sanitized = EntityPatch::from_json(
            PatchTarget::Property(id),
            json!({"title": "Loft", "owner_id": "someone-else"}),
        )
        .unwrap();

        match sanitized.patch {
            EntityPatch::Property { id: target, patch } => {
                assert_eq!(target, id);
                assert_eq!(patch.title.as_deref(), Some("Loft"));
            }
            other => panic!("unexpected patch: {other:?}"),
        }
        assert_eq!(sanitized.stripped, vec!["owner_id"]);
    }

    #[test]
    fn empty_profile_patch_is_detected() {
        assert!(ProfilePatch::default().is_empty());
        let patch = ProfilePatch {
            phone: Some("1".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
