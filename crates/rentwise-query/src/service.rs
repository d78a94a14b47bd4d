//! Owner query service — the entry point the UI layer talks to.
//!
//! Reads are owner-scoped, cached per owner and filter, and bounded by
//! the request deadline. The resolver, readers, aggregator and mutator
//! are split across sibling modules as further `impl` blocks.

use std::future::Future;

use rentwise_core::error::{RentalError, RentalResult};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::repository::RentalStore;
use rentwise_db::{DbManager, SurrealRentalStore};
use surrealdb::engine::remote::ws::Client;
use tracing::{debug, warn};

use crate::cache::{CacheKey, Cacheable, QueryCache};
use crate::config::{QueryConfig, RentwiseConfig};

/// Owner-scoped reads and writes over a [`RentalStore`].
///
/// Generic over the store so that the query layer can run against any
/// backend implementing the `rentwise-core` traits.
pub struct OwnerQueryService<S: RentalStore> {
    pub(crate) store: S,
    pub(crate) cache: QueryCache,
    pub(crate) config: QueryConfig,
}

impl<S: RentalStore> OwnerQueryService<S> {
    pub fn new(store: S, config: QueryConfig) -> Self {
        let cache = QueryCache::new(config.stale_after(), config.cache_capacity);
        Self {
            store,
            cache,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run one store call under the request deadline.
    pub(crate) async fn guarded<T, F>(&self, operation: &str, call: F) -> RentalResult<T>
    where
        F: Future<Output = RentalResult<T>>,
    {
        match tokio::time::timeout(self.config.request_timeout(), call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, "Store call exceeded request timeout");
                Err(RentalError::Timeout {
                    operation: operation.to_string(),
                })
            }
        }
    }

    /// Serve `key` from the cache, or load and remember it.
    pub(crate) async fn cached<T, F, Fut>(&self, key: CacheKey, load: F) -> RentalResult<T>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = RentalResult<T>>,
    {
        let epoch = self.cache.epoch();
        if let Some(hit) = self.cache.get::<T>(&key).await {
            debug!(owner_id = %key.owner_id, scope = ?key.scope, "Cache hit");
            return Ok(hit);
        }
        let value = load().await?;
        if !self.cache.insert_if_current(key.clone(), value.clone(), epoch).await {
            debug!(
                owner_id = %key.owner_id,
                scope = ?key.scope,
                "Cache invalidated during load; result not cached"
            );
        }
        Ok(value)
    }
}

/// Reads treat a blank identity as "not signed in yet".
pub(crate) fn reader_owner(raw: &str) -> Option<OwnerId> {
    let owner = OwnerId::parse(raw);
    if owner.is_none() {
        debug!("No owner identity; read disabled");
    }
    owner
}

/// Writes refuse a blank identity outright.
pub(crate) fn writer_owner(raw: &str) -> RentalResult<OwnerId> {
    OwnerId::parse(raw).ok_or(RentalError::OwnerContext)
}

impl OwnerQueryService<SurrealRentalStore<Client>> {
    /// Connect to the configured SurrealDB instance.
    ///
    /// Does not migrate; provisioning is the `rentwise-provision` binary's
    /// job, and readers tolerate a database that has not been provisioned.
    pub async fn connect(config: &RentwiseConfig) -> RentalResult<Self> {
        let manager = DbManager::connect(&config.db)
            .await
            .map_err(|e| RentalError::from(e).into_fetch_failure())?;
        Ok(Self::new(manager.store(), config.query.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheScope;
    use rentwise_core::models::kind::{EntityKind, OwnerCollection};
    use rentwise_core::repository::ListFilter;

    #[test]
    fn blank_identities_disable_reads_and_fail_writes() {
        assert!(reader_owner("").is_none());
        assert!(reader_owner(" \t").is_none());
        assert!(matches!(writer_owner(""), Err(RentalError::OwnerContext)));
        assert_eq!(writer_owner("owner-1").unwrap().as_str(), "owner-1");
    }

    #[tokio::test]
    async fn read_finishing_after_invalidation_is_not_cached() {
        let db = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        let service = OwnerQueryService::new(SurrealRentalStore::new(db), QueryConfig::default());
        let owner = OwnerId::parse("L1").unwrap();
        let key = CacheKey::collection(
            &owner,
            EntityKind::Applications,
            ListFilter::default().signature(),
        );
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let read = service.cached(key.clone(), || async move {
            let _ = gate.await;
            Ok(OwnerCollection::Applications(Vec::new()))
        });
        let write = async {
            service
                .cache()
                .invalidate_scope(CacheScope::Collection(EntityKind::Applications), &owner)
                .await;
            let _ = release.send(());
        };
        let (loaded, ()) = tokio::join!(read, write);

        assert!(loaded.unwrap().is_empty());
        assert!(service.cache().get::<OwnerCollection>(&key).await.is_none());

        // With no write in between, the next read is cached as usual.
        service
            .cached(key.clone(), || async { Ok(OwnerCollection::Applications(Vec::new())) })
            .await
            .unwrap();
        assert!(service.cache().get::<OwnerCollection>(&key).await.is_some());
    }

    #[tokio::test]
    async fn store_calls_past_the_deadline_time_out() {
        let db = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        let service = OwnerQueryService::new(
            SurrealRentalStore::new(db),
            QueryConfig {
                request_timeout_secs: 0,
                ..QueryConfig::default()
            },
        );

        let err = service
            .guarded("payments.list", std::future::pending::<RentalResult<()>>())
            .await
            .unwrap_err();
        assert!(matches!(err, RentalError::Timeout { operation } if operation == "payments.list"));
    }
}
