//! Whitelisted partial updates and status transitions.
//!
//! Status changes are checked against the stored status before writing.
//! The read and the write are separate statements, so two concurrent
//! writers resolve as last-write-wins.

use chrono::{DateTime, Utc};
use rentwise_core::error::{RentalError, RentalResult};
use rentwise_core::models::application::{Application, ApplicationDecision};
use rentwise_core::models::kind::EntityKind;
use rentwise_core::models::maintenance::{
    MaintenanceRequest, MaintenanceStatus, MaintenanceStatusChange,
};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::status::StatusLabel;
use rentwise_core::patch::{
    ApplicationPatch, EntityPatch, PatchOutcome, PatchTarget, ProfilePatch, PropertyPatch,
    Sanitized,
};
use rentwise_core::repository::{
    ApplicationRepository, MaintenanceRepository, ProfileRepository, PropertyRepository,
    RentalStore,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::CacheScope;
use crate::service::{OwnerQueryService, writer_owner};

impl<S: RentalStore> OwnerQueryService<S> {
    /// Apply a typed partial update.
    pub async fn update_entity(
        &self,
        owner_id: &str,
        patch: EntityPatch,
    ) -> RentalResult<PatchOutcome> {
        let owner = writer_owner(owner_id)?;
        self.apply_patch(&owner, patch, Vec::new()).await
    }

    /// Apply a loosely-typed payload; keys outside the target's whitelist
    /// are dropped and reported in the outcome.
    pub async fn update_entity_json(
        &self,
        owner_id: &str,
        target: PatchTarget,
        payload: serde_json::Value,
    ) -> RentalResult<PatchOutcome> {
        let owner = writer_owner(owner_id)?;
        let Sanitized { patch, stripped } = EntityPatch::from_json(target, payload)?;
        self.apply_patch(&owner, patch, stripped).await
    }

    /// Record the landlord's decision on an application.
    pub async fn update_application_status(
        &self,
        owner_id: &str,
        application_id: Uuid,
        decision: ApplicationDecision,
        review_notes: Option<String>,
    ) -> RentalResult<Application> {
        let owner = writer_owner(owner_id)?;
        let patch = ApplicationPatch {
            status: Some(decision.into()),
            review_notes,
        };
        let application = self.write_application(&owner, application_id, patch).await?;
        info!(
            owner_id = %owner,
            application_id = %application_id,
            status = %application.status,
            "Application decided"
        );
        Ok(application)
    }

    /// Move a maintenance request along its workflow.
    ///
    /// `scheduled_at` is only recorded when acknowledging.
    pub async fn update_maintenance_status(
        &self,
        owner_id: &str,
        request_id: Uuid,
        status: MaintenanceStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> RentalResult<MaintenanceRequest> {
        let owner = writer_owner(owner_id)?;

        let current = self
            .guarded(
                "maintenance_request.get",
                self.store.maintenance().get_by_id(&owner, request_id),
            )
            .await
            .map_err(RentalError::into_fetch_failure)?;
        if current.status != status && !current.status.can_transition_to(status) {
            return Err(current.status.transition_error(status));
        }

        let scheduled_at = if status == MaintenanceStatus::Acknowledged {
            scheduled_at
        } else {
            if scheduled_at.is_some() {
                debug!(%status, "Ignoring visit date outside acknowledgement");
            }
            None
        };

        let updated = self
            .guarded(
                "maintenance_request.update_status",
                self.store.maintenance().update_status(
                    &owner,
                    request_id,
                    MaintenanceStatusChange {
                        status,
                        scheduled_at,
                    },
                ),
            )
            .await
            .map_err(RentalError::into_write_failure)?;

        self.invalidate_after_write(&owner, CacheScope::Collection(EntityKind::MaintenanceRequests))
            .await;
        Ok(updated)
    }

    async fn apply_patch(
        &self,
        owner: &OwnerId,
        patch: EntityPatch,
        mut stripped: Vec<String>,
    ) -> RentalResult<PatchOutcome> {
        let entity = patch.entity();
        match patch {
            EntityPatch::Profile(mut profile) => {
                stripped.extend(profile.sanitize());
                log_stripped(owner, entity, &stripped);
                if profile.is_empty() {
                    // A whitelisted field dropped by its shape check counts
                    // as a handled update; whitelist stripping alone does not.
                    let shape_rejected = stripped
                        .iter()
                        .any(|key| ProfilePatch::FIELDS.contains(&key.as_str()));
                    return if !shape_rejected {
                        Err(nothing_to_update(entity))
                    } else {
                        Ok(PatchOutcome { stripped })
                    };
                }
                self.write_profile(owner, profile).await?;
            }
            EntityPatch::Property { id, patch } => {
                log_stripped(owner, entity, &stripped);
                if patch.is_empty() {
                    return Err(nothing_to_update(entity));
                }
                self.write_property(owner, id, patch).await?;
            }
            EntityPatch::Application { id, patch } => {
                log_stripped(owner, entity, &stripped);
                if patch.is_empty() {
                    return Err(nothing_to_update(entity));
                }
                self.write_application(owner, id, patch).await?;
            }
        }
        Ok(PatchOutcome { stripped })
    }

    async fn write_profile(&self, owner: &OwnerId, patch: ProfilePatch) -> RentalResult<()> {
        self.guarded("profile.update", self.store.profiles().update(owner, patch))
            .await
            .map_err(RentalError::into_write_failure)?;
        self.invalidate_after_write(owner, CacheScope::Profile).await;
        Ok(())
    }

    async fn write_property(
        &self,
        owner: &OwnerId,
        id: Uuid,
        patch: PropertyPatch,
    ) -> RentalResult<()> {
        if let Some(next) = patch.status {
            let current = self
                .guarded("property.get", self.store.properties().get_by_id(owner, id))
                .await
                .map_err(RentalError::into_fetch_failure)?;
            if current.status != next && !current.status.can_transition_to(next) {
                return Err(current.status.transition_error(next));
            }
        }

        self.guarded(
            "property.update",
            self.store.properties().update(owner, id, patch),
        )
        .await
        .map_err(RentalError::into_write_failure)?;
        self.invalidate_after_write(owner, CacheScope::Collection(EntityKind::Properties))
            .await;
        Ok(())
    }

    async fn write_application(
        &self,
        owner: &OwnerId,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> RentalResult<Application> {
        if let Some(next) = patch.status {
            let current = self
                .guarded(
                    "application.get",
                    self.store.applications().get_by_id(owner, id),
                )
                .await
                .map_err(RentalError::into_fetch_failure)?;
            let allow_reversal = self.config.allow_decision_reversal;
            if current.status != next && !current.status.can_transition_to(next, allow_reversal) {
                return Err(current.status.transition_error(next));
            }
        }

        let updated = self
            .guarded(
                "application.update",
                self.store.applications().update(owner, id, patch),
            )
            .await
            .map_err(RentalError::into_write_failure)?;
        self.invalidate_after_write(owner, CacheScope::Collection(EntityKind::Applications))
            .await;
        Ok(updated)
    }

    /// Drop the written scope and the snapshot derived from it.
    async fn invalidate_after_write(&self, owner: &OwnerId, scope: CacheScope) {
        self.cache.invalidate_scope(scope, owner).await;
        self.cache
            .invalidate_scope(CacheScope::Snapshot, owner)
            .await;
    }
}

fn log_stripped(owner: &OwnerId, entity: &str, stripped: &[String]) {
    if !stripped.is_empty() {
        warn!(
            owner_id = %owner,
            entity,
            stripped = ?stripped,
            "Dropped fields outside the update whitelist"
        );
    }
}

fn nothing_to_update(entity: &str) -> RentalError {
    RentalError::Validation {
        message: format!("{entity} update contains no changes"),
    }
}
