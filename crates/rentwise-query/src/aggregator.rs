//! Dashboard snapshot and profile counter sync.

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::payment::{PaymentRecord, PaymentStatus};
use rentwise_core::models::profile::{LandlordProfile, ProfileCounters, ProfileSeed};
use rentwise_core::models::property::Property;
use rentwise_core::models::snapshot::AggregateSnapshot;
use rentwise_core::models::tenancy::Tenancy;
use rentwise_core::repository::{ListFilter, ProfileRepository, RentalStore};
use tracing::{debug, info};

use crate::cache::{CacheKey, CacheScope};
use crate::service::{OwnerQueryService, reader_owner, writer_owner};

impl<S: RentalStore> OwnerQueryService<S> {
    /// The owner's dashboard snapshot as of now, served from the cache
    /// while fresh.
    pub async fn compute_snapshot(&self, owner_id: &str) -> RentalResult<Option<AggregateSnapshot>> {
        let Some(owner) = reader_owner(owner_id) else {
            return Ok(None);
        };
        let snapshot = self
            .cached(CacheKey::snapshot(&owner), || {
                self.load_snapshot(&owner, Utc::now())
            })
            .await?;
        Ok(Some(snapshot))
    }

    /// Snapshot against an explicit clock. Always reads the store.
    pub async fn compute_snapshot_at(
        &self,
        owner_id: &str,
        now: DateTime<Utc>,
    ) -> RentalResult<Option<AggregateSnapshot>> {
        let Some(owner) = reader_owner(owner_id) else {
            return Ok(None);
        };
        Ok(Some(self.load_snapshot(&owner, now).await?))
    }

    async fn load_snapshot(
        &self,
        owner: &OwnerId,
        now: DateTime<Utc>,
    ) -> RentalResult<AggregateSnapshot> {
        let everything = ListFilter::default();
        let completed = ListFilter::with_statuses([PaymentStatus::Completed]);

        let (properties, tenancies, payments) = tokio::try_join!(
            self.fetch_items::<Property>(owner, &everything),
            self.fetch_items::<Tenancy>(owner, &everything),
            self.fetch_items::<PaymentRecord>(owner, &completed),
        )?;

        let snapshot = AggregateSnapshot::compute(
            &properties,
            &tenancies,
            &payments,
            now,
            self.config.recent_payments_limit,
        );
        debug!(
            owner_id = %owner,
            total_properties = snapshot.total_properties,
            occupancy_rate = snapshot.occupancy_rate,
            "Computed snapshot"
        );
        Ok(snapshot)
    }

    /// Copy fresh dashboard figures onto the owner's profile counters.
    pub async fn sync_profile_counters(&self, owner_id: &str) -> RentalResult<LandlordProfile> {
        let owner = writer_owner(owner_id)?;
        let snapshot = self.load_snapshot(&owner, Utc::now()).await?;

        // Make sure there is a profile to write to.
        self.find_or_create_profile(&owner, ProfileSeed::default())
            .await?;

        let counters = ProfileCounters {
            total_properties: saturating_u32(snapshot.total_properties),
            active_tenants: saturating_u32(snapshot.active_rentals),
            monthly_revenue: snapshot.monthly_revenue,
        };
        let profile = self
            .guarded(
                "profile.update_counters",
                self.store.profiles().update_counters(&owner, counters),
            )
            .await
            .map_err(|e| e.into_write_failure())?;

        self.cache
            .invalidate_scope(CacheScope::Profile, &owner)
            .await;
        info!(
            owner_id = %owner,
            total_properties = profile.total_properties,
            active_tenants = profile.active_tenants,
            "Synced profile counters"
        );
        Ok(profile)
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
