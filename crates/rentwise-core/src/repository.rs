//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Every owner-scoped operation
//! takes the `owner_id` and must include it in the store predicate; that
//! predicate is the only thing keeping one landlord's data away from
//! another's.

use uuid::Uuid;

use crate::error::RentalResult;
use crate::models::{
    application::{Application, CreateApplication},
    kind::Timestamped,
    maintenance::{CreateMaintenanceRequest, MaintenanceRequest, MaintenanceStatusChange},
    owner::OwnerId,
    payment::{CreatePayment, PaymentRecord},
    profile::{CreateProfile, LandlordProfile, ProfileCounters},
    property::{CreateProperty, Property},
    status::StatusLabel,
    tenancy::{CreateTenancy, Tenancy},
};
use crate::patch::{ApplicationPatch, ProfilePatch, PropertyPatch};

/// Optional narrowing of a scoped list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Stored status labels to include; empty means every status.
    pub statuses: Vec<String>,
    pub limit: Option<u32>,
}

impl ListFilter {
    pub fn with_statuses<S: StatusLabel>(statuses: impl IntoIterator<Item = S>) -> Self {
        let mut labels: Vec<String> = statuses.into_iter().map(|s| s.as_str().to_string()).collect();
        labels.sort();
        labels.dedup();
        Self {
            statuses: labels,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Canonical text form, used as part of cache keys.
    pub fn signature(&self) -> String {
        let mut statuses = self.statuses.clone();
        statuses.sort();
        statuses.dedup();
        let limit = self
            .limit
            .map(|l| l.to_string())
            .unwrap_or_else(|| "*".to_string());
        format!("status={};limit={limit}", statuses.join(","))
    }
}

/// Stable newest-first sort; records with equal timestamps keep fetch order.
pub fn sort_newest_first<T: Timestamped>(items: &mut [T]) {
    items.sort_by(|a, b| b.order_timestamp().cmp(&a.order_timestamp()));
}

// ---------------------------------------------------------------------------
// Profile (keyed by owner)
// ---------------------------------------------------------------------------

pub trait ProfileRepository: Send + Sync {
    fn get(&self, owner_id: &OwnerId) -> impl Future<Output = RentalResult<LandlordProfile>> + Send;
    /// Atomic create-if-absent on the owner's key.
    ///
    /// Fails with `AlreadyExists` when the profile is already there.
    fn create(
        &self,
        input: CreateProfile,
    ) -> impl Future<Output = RentalResult<LandlordProfile>> + Send;
    fn update(
        &self,
        owner_id: &OwnerId,
        patch: ProfilePatch,
    ) -> impl Future<Output = RentalResult<LandlordProfile>> + Send;
    fn update_counters(
        &self,
        owner_id: &OwnerId,
        counters: ProfileCounters,
    ) -> impl Future<Output = RentalResult<LandlordProfile>> + Send;
}

// ---------------------------------------------------------------------------
// Owner-scoped collections
// ---------------------------------------------------------------------------

pub trait PropertyRepository: Send + Sync {
    fn create(&self, input: CreateProperty) -> impl Future<Output = RentalResult<Property>> + Send;
    fn get_by_id(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
    ) -> impl Future<Output = RentalResult<Property>> + Send;
    /// Newest first by `created_at`.
    fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> impl Future<Output = RentalResult<Vec<Property>>> + Send;
    fn update(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
        patch: PropertyPatch,
    ) -> impl Future<Output = RentalResult<Property>> + Send;
}

pub trait TenancyRepository: Send + Sync {
    fn create(&self, input: CreateTenancy) -> impl Future<Output = RentalResult<Tenancy>> + Send;
    /// Newest first by `created_at`. Status filters do not apply.
    fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> impl Future<Output = RentalResult<Vec<Tenancy>>> + Send;
}

pub trait ApplicationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateApplication,
    ) -> impl Future<Output = RentalResult<Application>> + Send;
    fn get_by_id(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
    ) -> impl Future<Output = RentalResult<Application>> + Send;
    /// Newest first by `submitted_at`.
    fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> impl Future<Output = RentalResult<Vec<Application>>> + Send;
    /// Applies the patch; a decided status also stamps `reviewed_at`.
    fn update(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> impl Future<Output = RentalResult<Application>> + Send;
}

pub trait MaintenanceRepository: Send + Sync {
    fn create(
        &self,
        input: CreateMaintenanceRequest,
    ) -> impl Future<Output = RentalResult<MaintenanceRequest>> + Send;
    fn get_by_id(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
    ) -> impl Future<Output = RentalResult<MaintenanceRequest>> + Send;
    /// Newest first by `created_at`.
    fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> impl Future<Output = RentalResult<Vec<MaintenanceRequest>>> + Send;
    fn update_status(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
        change: MaintenanceStatusChange,
    ) -> impl Future<Output = RentalResult<MaintenanceRequest>> + Send;
}

pub trait PaymentRepository: Send + Sync {
    fn create(&self, input: CreatePayment) -> impl Future<Output = RentalResult<PaymentRecord>> + Send;
    /// Newest first by `payment_date`.
    fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> impl Future<Output = RentalResult<Vec<PaymentRecord>>> + Send;
}

// ---------------------------------------------------------------------------
// Store bundle
// ---------------------------------------------------------------------------

/// Every repository the query layer needs, from a single backend.
pub trait RentalStore: Send + Sync {
    type Profiles: ProfileRepository;
    type Properties: PropertyRepository;
    type Tenancies: TenancyRepository;
    type Applications: ApplicationRepository;
    type Maintenance: MaintenanceRepository;
    type Payments: PaymentRepository;

    fn profiles(&self) -> &Self::Profiles;
    fn properties(&self) -> &Self::Properties;
    fn tenancies(&self) -> &Self::Tenancies;
    fn applications(&self) -> &Self::Applications;
    fn maintenance(&self) -> &Self::Maintenance;
    fn payments(&self) -> &Self::Payments;
}
