//! Strikes shared between many readers
//!
//! Backed by `moka`, which builds each missing strike once even when many
//! threads ask for it at the same time; the others wait and share the
//! result. A failed build is reported to every waiter and nothing is
//! cached, so a later lookup retries.

use std::ops::Deref;
use std::sync::Arc;

use glyphstrike_core::{Descriptor, Effects, ScopedStrikeCache, Typeface};
use moka::sync::Cache;
use parking_lot::RwLock;

use crate::cache_config::{self, CacheConfig};
use crate::materializer::StrikeMaterializer;
use crate::metrics::CacheMetrics;

/// Read access to a shared strike for as long as the handle lives
#[derive(Debug)]
pub struct ScopedStrike<S> {
    strike: Arc<S>,
}

impl<S> ScopedStrike<S> {
    /// Keep the strike beyond this scope
    pub fn into_shared(self) -> Arc<S> {
        self.strike
    }
}

impl<S> Clone for ScopedStrike<S> {
    fn clone(&self) -> Self {
        Self {
            strike: Arc::clone(&self.strike),
        }
    }
}

impl<S> Deref for ScopedStrike<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.strike
    }
}

/// Concurrent strike cache handing out scoped shared handles
pub struct SharedCache<M>
where
    M: StrikeMaterializer,
    M::Strike: Send + Sync + 'static,
{
    materializer: M,
    strikes: Cache<Descriptor, Arc<M::Strike>>,
    stats: Arc<RwLock<CacheMetrics>>,
}

impl<M> SharedCache<M>
where
    M: StrikeMaterializer,
    M::Strike: Send + Sync + 'static,
{
    /// Sized from the current process configuration
    pub fn new(materializer: M) -> Self {
        Self::with_config(materializer, &cache_config::current())
    }

    pub fn with_config(materializer: M, config: &CacheConfig) -> Self {
        let stats = Arc::new(RwLock::new(CacheMetrics::default()));
        let eviction_stats = Arc::clone(&stats);

        let strikes = Cache::builder()
            .max_capacity(config.shared_capacity().get() as u64)
            .eviction_listener(move |key: Arc<Descriptor>, _, cause| {
                if cause.was_evicted() {
                    eviction_stats.write().evictions += 1;
                    log::debug!("Evicted shared strike {:?}", key);
                }
            })
            .build();

        Self {
            materializer,
            strikes,
            stats,
        }
    }

    /// Strikes currently cached, after pending maintenance has run
    pub fn len(&self) -> u64 {
        self.strikes.run_pending_tasks();
        self.strikes.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, descriptor: &Descriptor) -> bool {
        self.strikes.contains_key(descriptor)
    }

    /// Forget every strike; outstanding handles keep theirs alive
    pub fn purge(&self) {
        self.strikes.invalidate_all();
        self.strikes.run_pending_tasks();
        log::debug!("Purged shared strikes");
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.stats.read().clone()
    }
}

impl<M> ScopedStrikeCache for SharedCache<M>
where
    M: StrikeMaterializer,
    M::Strike: Send + Sync + 'static,
    M::Error: Send + Sync + 'static,
{
    type Strike = M::Strike;
    type Handle = ScopedStrike<M::Strike>;
    type Error = Arc<M::Error>;

    fn find_or_create_scoped_strike(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<Self::Handle, Self::Error> {
        let mut built = false;
        let result = self.strikes.try_get_with(descriptor.clone(), || {
            built = true;
            self.materializer
                .materialize(descriptor, effects, typeface)
                .map(Arc::new)
        });

        let mut stats = self.stats.write();
        stats.total_requests += 1;
        match (&result, built) {
            (Ok(_), false) => stats.hits += 1,
            (Ok(_), true) => {
                stats.misses += 1;
                stats.materializations += 1;
                log::debug!("Materialized shared strike {:?}", descriptor);
            }
            (Err(_), true) => {
                stats.misses += 1;
                stats.failures += 1;
            }
            // Another thread's build failed while we waited
            (Err(_), false) => stats.misses += 1,
        }

        result.map(|strike| ScopedStrike { strike })
    }
}
