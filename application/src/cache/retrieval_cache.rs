//! Retrieval cache
//!
//! [`RetrievalCache`] is shared by every session in the process and holds
//! one entry per (role, topic hash). Each entry sits behind its own async
//! lock, so concurrent lookups for the same key wait for a single in-flight
//! fetch instead of issuing their own.
//!
//! A session talks to the cache through a [`SessionRetrievalCache`] view,
//! which remembers which roles have already been fetched for that session.
//! The lookup rules are:
//!
//! 1. A live entry fetched with the same `max_results` is returned.
//! 2. An expired entry, or one fetched with another `max_results`, is
//!    dropped and fetched again, in any round.
//! 3. With no entry, a role that has not been fetched this session is
//!    fetched during round 1 only.
//! 4. Anything else gets the fallback context.
//!
//! A failed fetch still marks the role as fetched, so the role argues from
//! its own expertise for the rest of the session.
//!
//! With a [`RetrievalStore`] attached, fetched references are also written
//! to the store and a missing in-memory entry is restored from it, so a
//! later process keeps using them until the TTL runs out.

use crate::ports::retrieval_provider::{RetrievalError, RetrievalProvider};
use crate::ports::retrieval_store::{RetrievalStore, StoredRetrieval};
use roundtable_domain::{
    CacheKey, Reference, RetrievalContext, RetrievalPayload, Role, SessionId, Topic,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default lifetime of a cache entry
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug)]
struct CacheEntry {
    payload: Arc<RetrievalPayload>,
    expires_at: Instant,
    max_results: usize,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    fn serves(&self, now: Instant, max_results: usize) -> bool {
        !self.is_expired(now) && self.max_results == max_results
    }
}

type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

/// Why a lookup produced no material
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The role was already fetched this session and nothing is cached
    AlreadyFetched,
    /// First lookup after round 1
    NotFirstRound,
    /// The provider answered with no references
    NoResults,
    /// The provider failed
    FetchFailed(RetrievalError),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::AlreadyFetched => write!(f, "already fetched this session"),
            FallbackReason::NotFirstRound => write!(f, "not fetched during round 1"),
            FallbackReason::NoResults => write!(f, "no references found"),
            FallbackReason::FetchFailed(e) => write!(f, "{}", e),
        }
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Served from an existing entry
    Hit(Arc<RetrievalPayload>),
    /// Fetched from the provider during this lookup
    Fetched(Arc<RetrievalPayload>),
    /// No material for this turn
    Fallback(FallbackReason),
}

impl CacheLookup {
    pub fn payload(&self) -> Option<&Arc<RetrievalPayload>> {
        match self {
            CacheLookup::Hit(p) | CacheLookup::Fetched(p) => Some(p),
            CacheLookup::Fallback(_) => None,
        }
    }

    /// Fetch failure behind this lookup, if any
    pub fn failure(&self) -> Option<&RetrievalError> {
        match self {
            CacheLookup::Fallback(FallbackReason::FetchFailed(e)) => Some(e),
            _ => None,
        }
    }

    pub fn into_context(self) -> RetrievalContext {
        match self {
            CacheLookup::Hit(p) | CacheLookup::Fetched(p) => RetrievalContext::Material(p),
            CacheLookup::Fallback(_) => RetrievalContext::Unavailable,
        }
    }
}

/// Process-wide retrieval cache
pub struct RetrievalCache {
    provider: Arc<dyn RetrievalProvider>,
    ttl: Duration,
    fetch_timeout: Option<Duration>,
    store: Option<Arc<dyn RetrievalStore>>,
    slots: Mutex<HashMap<CacheKey, Slot>>,
    external_fetches: AtomicU64,
}

impl RetrievalCache {
    pub fn new(provider: Arc<dyn RetrievalProvider>) -> Self {
        Self {
            provider,
            ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: None,
            store: None,
            slots: Mutex::new(HashMap::new()),
            external_fetches: AtomicU64::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Persist fetched references in `store` and restore from it
    pub fn with_store(mut self, store: Arc<dyn RetrievalStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a view of this cache for one session
    pub fn session(self: &Arc<Self>, session: SessionId) -> SessionRetrievalCache {
        SessionRetrievalCache {
            cache: Arc::clone(self),
            session,
            fetched: Mutex::new(HashSet::new()),
        }
    }

    /// Number of provider calls made so far
    pub fn external_fetches(&self) -> u64 {
        self.external_fetches.load(Ordering::Relaxed)
    }

    /// Live payload for `role` on `topic`, if any. Never fetches.
    pub async fn peek(&self, role: &Role, topic: &Topic) -> Option<Arc<RetrievalPayload>> {
        let slot = self.existing_slot(&CacheKey::new(role.id.clone(), topic))?;
        let guard = slot.lock().await;
        guard
            .as_ref()
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Drop the entry for `role` on `topic`, in memory and in the store
    pub fn invalidate(&self, role: &Role, topic: &Topic) {
        let key = CacheKey::new(role.id.clone(), topic);
        if let Ok(mut slots) = self.slots.lock()
            && slots.remove(&key).is_some()
        {
            debug!(key = %key, "Invalidated retrieval cache entry");
        }
        if let Some(store) = &self.store
            && let Err(e) = store.remove(&role.id, topic)
        {
            warn!(key = %key, error = %e, "Could not remove stored retrieval entry");
        }
    }

    /// Drop every entry, in memory and in the store
    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            let count = slots.len();
            slots.clear();
            debug!(entries = count, "Cleared retrieval cache");
        }
        if let Some(store) = &self.store {
            match store.clear() {
                Ok(removed) => debug!(removed, "Cleared retrieval store"),
                Err(e) => warn!(error = %e, "Could not clear retrieval store"),
            }
        }
    }

    /// Keys currently holding a slot
    pub fn len(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        match self.slots.lock() {
            Ok(mut slots) => Arc::clone(slots.entry(key.clone()).or_default()),
            // A poisoned map only loses sharing for this call
            Err(_) => Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    fn existing_slot(&self, key: &CacheKey) -> Option<Slot> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    /// Forget `slot` if it is still the one registered for `key`
    fn release_slot(&self, key: &CacheKey, slot: &Slot) {
        if let Ok(mut slots) = self.slots.lock()
            && slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(key);
        }
    }

    /// Entry that expires `ttl - age` from now, or `None` if already past it
    fn entry(
        &self,
        payload: Arc<RetrievalPayload>,
        max_results: usize,
        age: Duration,
    ) -> Option<CacheEntry> {
        let remaining = self.ttl.checked_sub(age).filter(|d| !d.is_zero())?;
        Some(CacheEntry {
            payload,
            expires_at: Instant::now() + remaining,
            max_results,
        })
    }

    /// Live entry for `role` on `topic` from the store, if any
    fn restore(&self, role: &Role, topic: &Topic, key: &CacheKey) -> Option<CacheEntry> {
        let store = self.store.as_ref()?;
        let stored = match store.load(&role.id, topic) {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read stored retrieval entry");
                return None;
            }
        };
        let age = stored.age();
        let payload = Arc::new(RetrievalPayload::new(stored.references, stored.max_results));
        match self.entry(payload, stored.max_results, age) {
            Some(entry) => {
                debug!(
                    key = %key,
                    age_secs = age.as_secs(),
                    "Restored retrieval entry from store"
                );
                Some(entry)
            }
            None => {
                debug!(key = %key, age_secs = age.as_secs(), "Stored retrieval entry expired");
                if let Err(e) = store.remove(&role.id, topic) {
                    warn!(key = %key, error = %e, "Could not remove stored retrieval entry");
                }
                None
            }
        }
    }

    fn persist(
        &self,
        role: &Role,
        topic: &Topic,
        key: &CacheKey,
        max_results: usize,
        references: &[Reference],
    ) {
        let Some(store) = &self.store else {
            return;
        };
        let entry = StoredRetrieval::new(&role.id, topic, max_results, references.to_vec());
        if let Err(e) = store.save(&entry) {
            warn!(key = %key, error = %e, "Could not persist retrieval entry");
        }
    }

    async fn fetch(
        &self,
        role: &Role,
        topic: &Topic,
        max_results: usize,
    ) -> Result<Vec<Reference>, RetrievalError> {
        self.external_fetches.fetch_add(1, Ordering::Relaxed);
        let request = self.provider.fetch(role, topic, max_results);
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| RetrievalError::Timeout)?,
            None => request.await,
        }
    }
}

/// One session's view of the [`RetrievalCache`]
pub struct SessionRetrievalCache {
    cache: Arc<RetrievalCache>,
    session: SessionId,
    fetched: Mutex<HashSet<CacheKey>>,
}

impl SessionRetrievalCache {
    pub fn shared(&self) -> &Arc<RetrievalCache> {
        &self.cache
    }

    /// Look up material for `role` speaking in `round`.
    pub async fn get(
        &self,
        role: &Role,
        topic: &Topic,
        round: u32,
        max_results: usize,
    ) -> CacheLookup {
        let key = CacheKey::new(role.id.clone(), topic);
        let slot = self.cache.slot(&key);
        let mut guard = slot.lock().await;
        let lookup = self
            .lookup(&mut guard, &key, role, topic, round, max_results)
            .await;
        if guard.is_none() {
            self.cache.release_slot(&key, &slot);
        }
        lookup
    }

    async fn lookup(
        &self,
        entry: &mut Option<CacheEntry>,
        key: &CacheKey,
        role: &Role,
        topic: &Topic,
        round: u32,
        max_results: usize,
    ) -> CacheLookup {
        if entry.is_none() {
            *entry = self.cache.restore(role, topic, key);
        }

        let now = Instant::now();
        let stale = match entry.as_ref() {
            Some(live) if live.serves(now, max_results) => {
                self.mark_fetched(key);
                debug!(session = %self.session, key = %key, round, "Retrieval cache hit");
                return CacheLookup::Hit(Arc::clone(&live.payload));
            }
            Some(stale) => {
                debug!(
                    session = %self.session,
                    key = %key,
                    expired = stale.is_expired(now),
                    "Dropping stale retrieval cache entry"
                );
                true
            }
            None => false,
        };
        if stale {
            *entry = None;
        } else if self.was_fetched(key) {
            return CacheLookup::Fallback(FallbackReason::AlreadyFetched);
        } else if round != 1 {
            return CacheLookup::Fallback(FallbackReason::NotFirstRound);
        }

        self.mark_fetched(key);
        info!(session = %self.session, key = %key, round, "Fetching references");
        match self.cache.fetch(role, topic, max_results).await {
            Ok(references) if references.is_empty() => {
                debug!(session = %self.session, key = %key, "No references found");
                CacheLookup::Fallback(FallbackReason::NoResults)
            }
            Ok(references) => {
                self.cache.persist(role, topic, key, max_results, &references);
                let payload = Arc::new(RetrievalPayload::new(references, max_results));
                *entry = self
                    .cache
                    .entry(Arc::clone(&payload), max_results, Duration::ZERO);
                CacheLookup::Fetched(payload)
            }
            Err(e) => {
                warn!(session = %self.session, key = %key, error = %e, "Reference fetch failed");
                CacheLookup::Fallback(FallbackReason::FetchFailed(e))
            }
        }
    }

    /// Prefetch material for every role before round 1.
    ///
    /// Returns the number of roles that ended up with material.
    pub async fn warm_up(&self, roles: &[Role], topic: &Topic, max_results: usize) -> usize {
        let lookups = roles
            .iter()
            .map(|role| self.get(role, topic, 1, max_results));
        let results = futures::future::join_all(lookups).await;
        let ready = results.iter().filter(|r| r.payload().is_some()).count();
        info!(
            session = %self.session,
            ready,
            roles = roles.len(),
            "Retrieval warm-up finished"
        );
        ready
    }

    /// Forget the session's fetched flag and the shared entry for `role`
    pub fn invalidate(&self, role: &Role, topic: &Topic) {
        let key = CacheKey::new(role.id.clone(), topic);
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.remove(&key);
        }
        self.cache.invalidate(role, topic);
    }

    /// Forget every fetched flag of this session
    pub fn clear(&self) {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.clear();
        }
    }

    fn was_fetched(&self, key: &CacheKey) -> bool {
        self.fetched
            .lock()
            .map(|fetched| fetched.contains(key))
            .unwrap_or(false)
    }

    fn mark_fetched(&self, key: &CacheKey) {
        if let Ok(mut fetched) = self.fetched.lock() {
            fetched.insert(key.clone());
        }
    }
}
