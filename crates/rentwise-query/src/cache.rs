//! Owner-keyed query cache.
//!
//! Entries expire after the configured staleness window. Writes never
//! patch entries; they drop every entry of the affected scope for the
//! owner so the next read goes back to the store.
//!
//! Every invalidation bumps an epoch. A read records the epoch before
//! loading and only keeps its result if no invalidation ran meanwhile,
//! so a load that started before a write cannot repopulate the cache
//! with pre-write data.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use rentwise_core::models::kind::{EntityKind, OwnerCollection};
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::profile::LandlordProfile;
use rentwise_core::models::snapshot::AggregateSnapshot;
use tracing::debug;

/// What a cache entry holds, without its owner or filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Profile,
    Collection(EntityKind),
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub scope: CacheScope,
    pub owner_id: OwnerId,
    /// Filter signature for collections; empty otherwise.
    pub signature: String,
}

impl CacheKey {
    pub fn profile(owner_id: &OwnerId) -> Self {
        Self {
            scope: CacheScope::Profile,
            owner_id: owner_id.clone(),
            signature: String::new(),
        }
    }

    pub fn collection(owner_id: &OwnerId, kind: EntityKind, signature: String) -> Self {
        Self {
            scope: CacheScope::Collection(kind),
            owner_id: owner_id.clone(),
            signature,
        }
    }

    pub fn snapshot(owner_id: &OwnerId) -> Self {
        Self {
            scope: CacheScope::Snapshot,
            owner_id: owner_id.clone(),
            signature: String::new(),
        }
    }

    /// Whether this key falls under `(scope, owner_id, *)`.
    pub fn is_under(&self, scope: CacheScope, owner_id: &OwnerId) -> bool {
        self.scope == scope && &self.owner_id == owner_id
    }
}

#[derive(Debug, Clone)]
pub enum CachedValue {
    Profile(LandlordProfile),
    Collection(OwnerCollection),
    Snapshot(AggregateSnapshot),
}

/// Values the service knows how to store in the cache.
pub trait Cacheable: Clone + Sized {
    fn into_cached(self) -> CachedValue;
    fn from_cached(value: CachedValue) -> Option<Self>;
}

impl Cacheable for LandlordProfile {
    fn into_cached(self) -> CachedValue {
        CachedValue::Profile(self)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Profile(p) => Some(p),
            _ => None,
        }
    }
}

impl Cacheable for OwnerCollection {
    fn into_cached(self) -> CachedValue {
        CachedValue::Collection(self)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Collection(c) => Some(c),
            _ => None,
        }
    }
}

impl Cacheable for AggregateSnapshot {
    fn into_cached(self) -> CachedValue {
        CachedValue::Snapshot(self)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Snapshot(s) => Some(s),
            _ => None,
        }
    }
}

/// TTL cache shared by all reads of one service instance.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<CacheKey, CachedValue>,
    epoch: Arc<AtomicU64>,
}

impl QueryCache {
    pub fn new(stale_after: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(stale_after)
            .build();
        Self {
            entries,
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invalidation counter; pass it to [`insert_if_current`](Self::insert_if_current).
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub async fn get<T: Cacheable>(&self, key: &CacheKey) -> Option<T> {
        self.entries.get(key).await.and_then(T::from_cached)
    }

    pub async fn insert<T: Cacheable>(&self, key: CacheKey, value: T) {
        self.entries.insert(key, value.into_cached()).await;
    }

    /// Insert a value loaded at `epoch`, unless an invalidation ran since.
    ///
    /// The epoch is checked again after inserting; an invalidation that
    /// bumped it in between may have scanned before the entry landed.
    pub async fn insert_if_current<T: Cacheable>(&self, key: CacheKey, value: T, epoch: u64) -> bool {
        if self.epoch() != epoch {
            return false;
        }
        self.entries.insert(key.clone(), value.into_cached()).await;
        if self.epoch() != epoch {
            self.entries.invalidate(&key).await;
            return false;
        }
        true
    }

    /// Drop every entry under `(scope, owner_id, *)`.
    pub async fn invalidate_scope(&self, scope: CacheScope, owner_id: &OwnerId) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let doomed: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.is_under(scope, owner_id))
            .map(|(key, _)| (*key).clone())
            .collect();

        debug!(
            owner_id = %owner_id,
            ?scope,
            entries = doomed.len(),
            "Invalidating cached reads"
        );
        for key in doomed {
            self.entries.invalidate(&key).await;
        }
    }

    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.entries.invalidate_all();
    }
}
