//! GPU-side strike registry
//!
//! GPU strikes are atlas bookkeeping, not glyph images, so they are keyed
//! by descriptor alone and identified by a small integer the renderer can
//! put into its own tables.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glyphstrike_core::{Descriptor, GpuStrikeCache};
use parking_lot::RwLock;

use crate::metrics::CacheMetrics;

/// Shared reference to one GPU-resident strike
#[derive(Debug, Clone)]
pub struct GpuStrikeHandle {
    inner: Arc<GpuStrike>,
}

#[derive(Debug)]
struct GpuStrike {
    id: u64,
    descriptor: Descriptor,
}

impl GpuStrikeHandle {
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.inner.descriptor
    }
}

impl PartialEq for GpuStrikeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for GpuStrikeHandle {}

/// Descriptor to GPU strike map; never evicts on its own
#[derive(Debug, Default)]
pub struct GpuStrikeRegistry {
    strikes: RwLock<HashMap<Descriptor, GpuStrikeHandle>>,
    next_id: AtomicU64,
    stats: RwLock<CacheMetrics>,
}

impl GpuStrikeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.strikes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, descriptor: &Descriptor) -> Option<GpuStrikeHandle> {
        self.strikes.read().get(descriptor).cloned()
    }

    /// Forget every strike, e.g. after the atlas is rebuilt
    pub fn purge(&self) {
        let mut strikes = self.strikes.write();
        log::debug!("Purged {} GPU strikes", strikes.len());
        strikes.clear();
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.stats.read().clone()
    }
}

impl GpuStrikeCache for GpuStrikeRegistry {
    type Handle = GpuStrikeHandle;
    type Error = Infallible;

    fn find_or_create_gpu_strike(
        &self,
        descriptor: &Descriptor,
    ) -> Result<GpuStrikeHandle, Infallible> {
        if let Some(handle) = self.strikes.read().get(descriptor) {
            let mut stats = self.stats.write();
            stats.total_requests += 1;
            stats.hits += 1;
            return Ok(handle.clone());
        }

        let mut strikes = self.strikes.write();
        let mut stats = self.stats.write();
        stats.total_requests += 1;

        // Someone may have registered it between the two locks
        if let Some(handle) = strikes.get(descriptor) {
            stats.hits += 1;
            return Ok(handle.clone());
        }

        let handle = GpuStrikeHandle {
            inner: Arc::new(GpuStrike {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                descriptor: descriptor.clone(),
            }),
        };
        stats.misses += 1;
        stats.materializations += 1;
        log::debug!("Registered GPU strike {} for {:?}", handle.id(), descriptor);

        strikes.insert(descriptor.clone(), handle.clone());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use glyphstrike_core::EntryTag;

    use super::*;

    fn key(byte: u8) -> Descriptor {
        Descriptor::builder()
            .entry(EntryTag::ScalerRec, vec![byte, byte])
            .build()
    }

    fn strike(registry: &GpuStrikeRegistry, descriptor: &Descriptor) -> GpuStrikeHandle {
        match registry.find_or_create_gpu_strike(descriptor) {
            Ok(handle) => handle,
            Err(never) => match never {},
        }
    }

    #[test]
    fn one_handle_per_descriptor() {
        let registry = GpuStrikeRegistry::new();
        let a = strike(&registry, &key(1));
        let b = strike(&registry, &key(1));
        let c = strike(&registry, &key(2));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a.id(), c.id());
        assert_eq!(a.descriptor(), &key(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.metrics().hits, 1);
    }

    #[test]
    fn purge_forgets_handles() {
        let registry = GpuStrikeRegistry::new();
        let before = strike(&registry, &key(5));
        registry.purge();
        assert!(registry.get(&key(5)).is_none());

        let after = strike(&registry, &key(5));
        assert_ne!(before, after);
    }
}
