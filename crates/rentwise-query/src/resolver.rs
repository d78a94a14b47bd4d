//! Landlord profile resolution.
//!
//! A profile is created lazily the first time an owner is resolved. The
//! record key is the owner id, so a concurrent resolution that loses the
//! create simply re-reads the winner's record.

use rentwise_core::error::{RentalError, RentalResult};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::profile::{CreateProfile, LandlordProfile, ProfileSeed};
use rentwise_core::repository::{ProfileRepository, RentalStore};
use tracing::{debug, info, warn};

use crate::cache::CacheKey;
use crate::service::{OwnerQueryService, reader_owner};

impl<S: RentalStore> OwnerQueryService<S> {
    /// The owner's profile, creating it with defaults if absent.
    ///
    /// `Ok(None)` when `owner_id` is blank.
    pub async fn resolve_profile(&self, owner_id: &str) -> RentalResult<Option<LandlordProfile>> {
        self.resolve_profile_with(owner_id, ProfileSeed::default())
            .await
    }

    /// As [`resolve_profile`](Self::resolve_profile), seeding a newly
    /// created profile from session data. An existing profile is returned
    /// unchanged.
    pub async fn resolve_profile_with(
        &self,
        owner_id: &str,
        seed: ProfileSeed,
    ) -> RentalResult<Option<LandlordProfile>> {
        let Some(owner) = reader_owner(owner_id) else {
            return Ok(None);
        };
        let profile = self
            .cached(CacheKey::profile(&owner), || {
                self.find_or_create_profile(&owner, seed)
            })
            .await?;
        Ok(Some(profile))
    }

    pub(crate) async fn find_or_create_profile(
        &self,
        owner: &OwnerId,
        seed: ProfileSeed,
    ) -> RentalResult<LandlordProfile> {
        match self
            .guarded("profile.get", self.store.profiles().get(owner))
            .await
        {
            Ok(profile) => return Ok(profile),
            Err(RentalError::NotFound { .. }) => {
                debug!(owner_id = %owner, "No profile yet");
            }
            Err(RentalError::SchemaNotReady { collection }) => {
                warn!(
                    owner_id = %owner,
                    %collection,
                    "Profile collection not provisioned; treating profile as absent"
                );
            }
            Err(e) => return Err(e.into_fetch_failure()),
        }

        let input = CreateProfile::with_defaults(owner.clone(), seed);
        match self
            .guarded("profile.create", self.store.profiles().create(input))
            .await
        {
            Ok(profile) => {
                info!(owner_id = %owner, "Created landlord profile");
                Ok(profile)
            }
            Err(RentalError::AlreadyExists { .. }) => {
                debug!(owner_id = %owner, "Profile created concurrently; re-reading");
                self.guarded("profile.get", self.store.profiles().get(owner))
                    .await
                    .map_err(RentalError::into_fetch_failure)
            }
            // A concurrent create can also surface as a transaction conflict.
            Err(e) => match self
                .guarded("profile.get", self.store.profiles().get(owner))
                .await
            {
                Ok(profile) => {
                    debug!(owner_id = %owner, error = %e, "Profile create failed but record exists");
                    Ok(profile)
                }
                Err(_) => Err(e.into_write_failure()),
            },
        }
    }
}
