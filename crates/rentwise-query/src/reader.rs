//! Scoped collection readers.

use rentwise_core::error::{RentalError, RentalResult};
use rentwise_core::models::application::Application;
use rentwise_core::models::kind::{CollectionItem, EntityKind, OwnerCollection};
use rentwise_core::models::maintenance::MaintenanceRequest;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::payment::PaymentRecord;
use rentwise_core::models::property::Property;
use rentwise_core::models::tenancy::Tenancy;
use rentwise_core::repository::{
    ApplicationRepository, ListFilter, MaintenanceRepository, PaymentRepository,
    PropertyRepository, RentalStore, TenancyRepository,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::CacheKey;
use crate::service::{OwnerQueryService, reader_owner};

impl<S: RentalStore> OwnerQueryService<S> {
    /// One owner's collection of `kind`, newest first.
    ///
    /// `Ok(None)` when `owner_id` is blank; an empty collection when the
    /// backing table has not been provisioned.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        kind: EntityKind,
        filter: ListFilter,
    ) -> RentalResult<Option<OwnerCollection>> {
        let Some(owner) = reader_owner(owner_id) else {
            return Ok(None);
        };
        let key = CacheKey::collection(&owner, kind, filter.signature());
        let collection = self
            .cached(key, || self.fetch_collection(&owner, kind, &filter))
            .await?;
        Ok(Some(collection))
    }

    /// Typed form of [`list_by_owner`](Self::list_by_owner).
    pub async fn list<T: CollectionItem>(
        &self,
        owner_id: &str,
        filter: ListFilter,
    ) -> RentalResult<Option<Vec<T>>> {
        match self.list_by_owner(owner_id, T::KIND, filter).await? {
            Some(collection) => Ok(Some(extract::<T>(collection)?)),
            None => Ok(None),
        }
    }

    pub async fn list_properties(
        &self,
        owner_id: &str,
        filter: ListFilter,
    ) -> RentalResult<Option<Vec<Property>>> {
        self.list(owner_id, filter).await
    }

    pub async fn list_tenancies(
        &self,
        owner_id: &str,
        filter: ListFilter,
    ) -> RentalResult<Option<Vec<Tenancy>>> {
        self.list(owner_id, filter).await
    }

    pub async fn list_applications(
        &self,
        owner_id: &str,
        filter: ListFilter,
    ) -> RentalResult<Option<Vec<Application>>> {
        self.list(owner_id, filter).await
    }

    pub async fn list_maintenance_requests(
        &self,
        owner_id: &str,
        filter: ListFilter,
    ) -> RentalResult<Option<Vec<MaintenanceRequest>>> {
        self.list(owner_id, filter).await
    }

    pub async fn list_payments(
        &self,
        owner_id: &str,
        filter: ListFilter,
    ) -> RentalResult<Option<Vec<PaymentRecord>>> {
        self.list(owner_id, filter).await
    }

    /// A single property of the owner; `None` if it does not exist or
    /// belongs to someone else.
    pub async fn get_property(&self, owner_id: &str, id: Uuid) -> RentalResult<Option<Property>> {
        let Some(owner) = reader_owner(owner_id) else {
            return Ok(None);
        };
        found(
            self.guarded("property.get", self.store.properties().get_by_id(&owner, id))
                .await,
        )
    }

    /// A single application of the owner; `None` if it does not exist or
    /// belongs to someone else.
    pub async fn get_application(
        &self,
        owner_id: &str,
        id: Uuid,
    ) -> RentalResult<Option<Application>> {
        let Some(owner) = reader_owner(owner_id) else {
            return Ok(None);
        };
        found(
            self.guarded(
                "application.get",
                self.store.applications().get_by_id(&owner, id),
            )
            .await,
        )
    }

    /// Uncached fetch of one collection, with the not-provisioned case
    /// smoothed to an empty result.
    pub(crate) async fn fetch_collection(
        &self,
        owner: &OwnerId,
        kind: EntityKind,
        filter: &ListFilter,
    ) -> RentalResult<OwnerCollection> {
        debug!(owner_id = %owner, %kind, filter = %filter.signature(), "Reading owner collection");

        let result = match kind {
            EntityKind::Properties => self
                .guarded(
                    "properties.list",
                    self.store.properties().list_by_owner(owner, filter),
                )
                .await
                .map(OwnerCollection::Properties),
            EntityKind::Tenancies => self
                .guarded(
                    "tenancies.list",
                    self.store.tenancies().list_by_owner(owner, filter),
                )
                .await
                .map(OwnerCollection::Tenancies),
            EntityKind::Applications => self
                .guarded(
                    "applications.list",
                    self.store.applications().list_by_owner(owner, filter),
                )
                .await
                .map(OwnerCollection::Applications),
            EntityKind::MaintenanceRequests => self
                .guarded(
                    "maintenance_requests.list",
                    self.store.maintenance().list_by_owner(owner, filter),
                )
                .await
                .map(OwnerCollection::MaintenanceRequests),
            EntityKind::Payments => self
                .guarded(
                    "payments.list",
                    self.store.payments().list_by_owner(owner, filter),
                )
                .await
                .map(OwnerCollection::Payments),
        };

        match result {
            Ok(collection) => Ok(collection),
            Err(RentalError::SchemaNotReady { collection }) => {
                warn!(
                    owner_id = %owner,
                    %kind,
                    %collection,
                    "Collection not provisioned; returning empty"
                );
                Ok(OwnerCollection::empty(kind))
            }
            Err(e) => Err(e.into_fetch_failure()),
        }
    }

    /// Uncached typed fetch.
    pub(crate) async fn fetch_items<T: CollectionItem>(
        &self,
        owner: &OwnerId,
        filter: &ListFilter,
    ) -> RentalResult<Vec<T>> {
        extract(self.fetch_collection(owner, T::KIND, filter).await?)
    }
}

fn extract<T: CollectionItem>(collection: OwnerCollection) -> RentalResult<Vec<T>> {
    let actual = collection.kind();
    T::extract(collection).ok_or_else(|| {
        RentalError::Internal(format!(
            "expected {} collection, got {actual}",
            T::KIND
        ))
    })
}

/// Map "no such record" and "not provisioned" to `None`.
fn found<T>(result: RentalResult<T>) -> RentalResult<Option<T>> {
    match result {
        Ok(item) => Ok(Some(item)),
        Err(RentalError::NotFound { .. }) | Err(RentalError::SchemaNotReady { .. }) => Ok(None),
        Err(e) => Err(e.into_fetch_failure()),
    }
}
