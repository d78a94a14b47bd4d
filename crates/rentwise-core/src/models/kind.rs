//! Owner-scoped collection kinds.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::application::Application;
use super::maintenance::MaintenanceRequest;
use super::payment::PaymentRecord;
use super::property::Property;
use super::tenancy::Tenancy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Properties,
    Tenancies,
    Applications,
    MaintenanceRequests,
    Payments,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Properties,
        EntityKind::Tenancies,
        EntityKind::Applications,
        EntityKind::MaintenanceRequests,
        EntityKind::Payments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Properties => "properties",
            EntityKind::Tenancies => "tenancies",
            EntityKind::Applications => "applications",
            EntityKind::MaintenanceRequests => "maintenance_requests",
            EntityKind::Payments => "payments",
        }
    }

    /// Field that orders the collection newest-first.
    pub fn order_field(self) -> &'static str {
        match self {
            EntityKind::Applications => "submitted_at",
            EntityKind::Payments => "payment_date",
            EntityKind::Properties | EntityKind::Tenancies | EntityKind::MaintenanceRequests => {
                "created_at"
            }
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that can be ordered newest-first by their kind's timestamp.
pub trait Timestamped {
    fn order_timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for Property {
    fn order_timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Tenancy {
    fn order_timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for Application {
    fn order_timestamp(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

impl Timestamped for MaintenanceRequest {
    fn order_timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for PaymentRecord {
    fn order_timestamp(&self) -> DateTime<Utc> {
        self.payment_date
    }
}

/// Entity types that make up an owner-scoped collection.
pub trait CollectionItem: Timestamped + Sized {
    const KIND: EntityKind;

    fn collect(items: Vec<Self>) -> OwnerCollection;

    /// The items, if `collection` holds this kind.
    fn extract(collection: OwnerCollection) -> Option<Vec<Self>>;
}

impl CollectionItem for Property {
    const KIND: EntityKind = EntityKind::Properties;

    fn collect(items: Vec<Self>) -> OwnerCollection {
        OwnerCollection::Properties(items)
    }

    fn extract(collection: OwnerCollection) -> Option<Vec<Self>> {
        match collection {
            OwnerCollection::Properties(items) => Some(items),
            _ => None,
        }
    }
}

impl CollectionItem for Tenancy {
    const KIND: EntityKind = EntityKind::Tenancies;

    fn collect(items: Vec<Self>) -> OwnerCollection {
        OwnerCollection::Tenancies(items)
    }

    fn extract(collection: OwnerCollection) -> Option<Vec<Self>> {
        match collection {
            OwnerCollection::Tenancies(items) => Some(items),
            _ => None,
        }
    }
}

impl CollectionItem for Application {
    const KIND: EntityKind = EntityKind::Applications;

    fn collect(items: Vec<Self>) -> OwnerCollection {
        OwnerCollection::Applications(items)
    }

    fn extract(collection: OwnerCollection) -> Option<Vec<Self>> {
        match collection {
            OwnerCollection::Applications(items) => Some(items),
            _ => None,
        }
    }
}

impl CollectionItem for MaintenanceRequest {
    const KIND: EntityKind = EntityKind::MaintenanceRequests;

    fn collect(items: Vec<Self>) -> OwnerCollection {
        OwnerCollection::MaintenanceRequests(items)
    }

    fn extract(collection: OwnerCollection) -> Option<Vec<Self>> {
        match collection {
            OwnerCollection::MaintenanceRequests(items) => Some(items),
            _ => None,
        }
    }
}

impl CollectionItem for PaymentRecord {
    const KIND: EntityKind = EntityKind::Payments;

    fn collect(items: Vec<Self>) -> OwnerCollection {
        OwnerCollection::Payments(items)
    }

    fn extract(collection: OwnerCollection) -> Option<Vec<Self>> {
        match collection {
            OwnerCollection::Payments(items) => Some(items),
            _ => None,
        }
    }
}

/// One owner's collection of a single kind, as returned by the generic reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum OwnerCollection {
    Properties(Vec<Property>),
    Tenancies(Vec<Tenancy>),
    Applications(Vec<Application>),
    MaintenanceRequests(Vec<MaintenanceRequest>),
    Payments(Vec<PaymentRecord>),
}

impl OwnerCollection {
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Properties => OwnerCollection::Properties(Vec::new()),
            EntityKind::Tenancies => OwnerCollection::Tenancies(Vec::new()),
            EntityKind::Applications => OwnerCollection::Applications(Vec::new()),
            EntityKind::MaintenanceRequests => OwnerCollection::MaintenanceRequests(Vec::new()),
            EntityKind::Payments => OwnerCollection::Payments(Vec::new()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            OwnerCollection::Properties(_) => EntityKind::Properties,
            OwnerCollection::Tenancies(_) => EntityKind::Tenancies,
            OwnerCollection::Applications(_) => EntityKind::Applications,
            OwnerCollection::MaintenanceRequests(_) => EntityKind::MaintenanceRequests,
            OwnerCollection::Payments(_) => EntityKind::Payments,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OwnerCollection::Properties(items) => items.len(),
            OwnerCollection::Tenancies(items) => items.len(),
            OwnerCollection::Applications(items) => items.len(),
            OwnerCollection::MaintenanceRequests(items) => items.len(),
            OwnerCollection::Payments(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owner ids of every record, in order.
    pub fn owner_ids(&self) -> Vec<&str> {
        match self {
            OwnerCollection::Properties(items) => items.iter().map(|i| i.owner_id.as_str()).collect(),
            OwnerCollection::Tenancies(items) => items.iter().map(|i| i.owner_id.as_str()).collect(),
            OwnerCollection::Applications(items) => {
                items.iter().map(|i| i.owner_id.as_str()).collect()
            }
            OwnerCollection::MaintenanceRequests(items) => {
                items.iter().map(|i| i.owner_id.as_str()).collect()
            }
            OwnerCollection::Payments(items) => items.iter().map(|i| i.owner_id.as_str()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_keeps_its_kind() {
        for kind in EntityKind::ALL {
            let empty = OwnerCollection::empty(kind);
            assert_eq!(empty.kind(), kind);
            assert!(empty.is_empty());
        }
    }

    #[test]
    fn extract_rejects_other_kinds() {
        assert!(Property::extract(OwnerCollection::Payments(Vec::new())).is_none());
        assert_eq!(
            PaymentRecord::extract(OwnerCollection::Payments(Vec::new())).map(|v| v.len()),
            Some(0)
        );
    }

    #[test]
    fn collection_serializes_with_kind_tag() {
        let json = serde_json::to_value(OwnerCollection::empty(EntityKind::MaintenanceRequests)).unwrap();
        assert_eq!(json["kind"], "maintenance_requests");
        assert_eq!(json["items"], serde_json::json!([]));
    }
}
