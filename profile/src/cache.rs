//! Caching decorator over a profile resolver.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::ResolveResult;
use crate::model::{Profile, ResolvedProfile};
use crate::resolver::ProfileResolver;

/// How long a resolved profile stays valid in the cache.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3 * 60 * 60);

struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

/// Two maps so both key halves answer synchronously: name resolves to id,
/// id resolves to the full profile.
#[derive(Default)]
struct CacheInner {
    by_name: Mutex<HashMap<String, Expiring<Uuid>>>,
    by_id: Mutex<HashMap<Uuid, Expiring<ResolvedProfile>>>,
}

impl CacheInner {
    /// Re-puts both maps with a fresh expiry. Runs on every successful
    /// resolution, whether or not the entry already existed.
    fn store(&self, resolved: &ResolvedProfile, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.by_name.lock().insert(
            resolved.name().to_owned(),
            Expiring {
                value: resolved.unique_id(),
                expires_at,
            },
        );
        self.by_id.lock().insert(
            resolved.unique_id(),
            Expiring {
                value: resolved.clone(),
                expires_at,
            },
        );
    }

    fn id_for_name(&self, name: &str) -> Option<Uuid> {
        let mut map = self.by_name.lock();
        let entry = map.get(name)?;
        if Instant::now() >= entry.expires_at {
            map.remove(name);
            return None;
        }
        Some(entry.value)
    }

    fn profile_for_id(&self, id: Uuid) -> Option<ResolvedProfile> {
        let mut map = self.by_id.lock();
        let entry = map.get(&id)?;
        if Instant::now() >= entry.expires_at {
            map.remove(&id);
            return None;
        }
        Some(entry.value.clone())
    }
}

/// Wraps a [`ProfileResolver`] with a TTL cache.
///
/// `resolve` serves from the cache when it can and falls through to the
/// delegate otherwise. The `from_cache_*` accessors are synchronous and never
/// touch the delegate, so the tick thread may call them freely. Expired
/// entries are dropped on read.
pub struct CachedResolver<R> {
    delegate: R,
    ttl: Duration,
    inner: Arc<CacheInner>,
}

impl<R> CachedResolver<R> {
    pub fn new(delegate: R) -> Self {
        Self::with_ttl(delegate, DEFAULT_TTL)
    }

    pub fn with_ttl(delegate: R, ttl: Duration) -> Self {
        Self {
            delegate,
            ttl,
            inner: Arc::new(CacheInner::default()),
        }
    }

    #[must_use]
    pub fn from_cache_by_name(&self, name: &str) -> Option<ResolvedProfile> {
        let id = self.inner.id_for_name(name)?;
        self.inner.profile_for_id(id)
    }

    #[must_use]
    pub fn from_cache_by_id(&self, id: Uuid) -> Option<ResolvedProfile> {
        self.inner.profile_for_id(id)
    }

    #[must_use]
    pub fn from_cache(&self, profile: &Profile) -> Option<ResolvedProfile> {
        if let Some(name) = profile.name() {
            return self.from_cache_by_name(name);
        }
        let id = profile.unique_id()?;
        self.from_cache_by_id(id)
    }
}

impl<R: ProfileResolver> ProfileResolver for CachedResolver<R> {
    fn resolve(&self, profile: &Profile) -> BoxFuture<'static, ResolveResult<ResolvedProfile>> {
        if let Some(hit) = self.from_cache(profile) {
            log::trace!("profile cache hit for {profile}");
            return future::ready(Ok(hit)).boxed();
        }
        let upstream = self.delegate.resolve(profile);
        let inner = Arc::clone(&self.inner);
        let ttl = self.ttl;
        async move {
            let resolved = upstream.await?;
            log::debug!("cached profile {} for {ttl:?}", resolved.name());
            inner.store(&resolved, ttl);
            Ok(resolved)
        }
        .boxed()
    }
}
