//! One strike, one user
//!
//! Strikes sit behind their own mutex inside a count-limited LRU. A lookup
//! finds (or builds) the strike while holding the map lock, then locks the
//! strike itself after the map lock is gone, so a long-held strike never
//! blocks lookups of other strikes.

use std::num::NonZeroUsize;
use std::sync::Arc;

use glyphstrike_core::{Descriptor, Effects, ExclusiveStrikeCache, Typeface};
use lru::LruCache;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex, RwLock};

use crate::cache_config::{self, CacheConfig};
use crate::materializer::StrikeMaterializer;
use crate::metrics::CacheMetrics;

/// Exclusive access to a strike, released when dropped
pub type ExclusiveStrike<S> = ArcMutexGuard<RawMutex, S>;

/// LRU strike cache handing out exclusive handles
pub struct ExclusiveCache<M: StrikeMaterializer> {
    materializer: M,
    strikes: Mutex<LruCache<Descriptor, Arc<Mutex<M::Strike>>>>,
    stats: RwLock<CacheMetrics>,
}

impl<M: StrikeMaterializer> ExclusiveCache<M> {
    /// Sized from the current process configuration
    pub fn new(materializer: M) -> Self {
        Self::with_config(materializer, &cache_config::current())
    }

    pub fn with_config(materializer: M, config: &CacheConfig) -> Self {
        Self::with_limit(materializer, config.strike_limit())
    }

    pub fn with_limit(materializer: M, limit: NonZeroUsize) -> Self {
        Self {
            materializer,
            strikes: Mutex::new(LruCache::new(limit)),
            stats: RwLock::new(CacheMetrics::default()),
        }
    }

    /// Strikes currently cached
    pub fn len(&self) -> usize {
        self.strikes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, descriptor: &Descriptor) -> bool {
        self.strikes.lock().contains(descriptor)
    }

    /// Forget one strike; outstanding handles keep it alive until dropped
    pub fn remove(&self, descriptor: &Descriptor) -> bool {
        self.strikes.lock().pop(descriptor).is_some()
    }

    /// Forget every strike
    pub fn purge(&self) {
        let mut strikes = self.strikes.lock();
        let count = strikes.len();
        strikes.clear();
        log::debug!("Purged {} exclusive strikes", count);
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.stats.read().clone()
    }

    fn find_or_create(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<Arc<Mutex<M::Strike>>, M::Error> {
        let mut strikes = self.strikes.lock();
        let mut stats = self.stats.write();
        stats.total_requests += 1;

        if let Some(strike) = strikes.get(descriptor) {
            stats.hits += 1;
            return Ok(Arc::clone(strike));
        }
        stats.misses += 1;

        let strike = match self.materializer.materialize(descriptor, effects, typeface) {
            Ok(strike) => Arc::new(Mutex::new(strike)),
            Err(err) => {
                stats.failures += 1;
                return Err(err);
            }
        };
        stats.materializations += 1;
        log::debug!("Materialized exclusive strike {:?}", descriptor);

        if let Some((evicted, _)) = strikes.push(descriptor.clone(), Arc::clone(&strike)) {
            if &evicted != descriptor {
                stats.evictions += 1;
                log::debug!("Evicted exclusive strike {:?}", evicted);
            }
        }

        Ok(strike)
    }
}

impl<M: StrikeMaterializer> ExclusiveStrikeCache for ExclusiveCache<M> {
    type Strike = M::Strike;
    type Handle = ExclusiveStrike<M::Strike>;
    type Error = M::Error;

    fn find_or_create_strike_exclusive(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<Self::Handle, Self::Error> {
        let strike = self.find_or_create(descriptor, effects, typeface)?;
        Ok(strike.lock_arc())
    }
}
