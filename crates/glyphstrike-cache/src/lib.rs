//! Glyphstrike Cache: places for strikes to live
//!
//! Three caches, one per handle shape a [`StrikeSpec`](glyphstrike_core::StrikeSpec)
//! can ask for:
//!
//! - [`ExclusiveCache`] - LRU of mutex-guarded strikes, one user at a time
//! - [`SharedCache`] - concurrent `moka` cache handing out scoped read handles
//! - [`GpuStrikeRegistry`] - descriptor to GPU strike id (feature `gpu`)
//!
//! Strikes are built by a [`StrikeMaterializer`] on first use.
//!
//! ```
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use glyphstrike_cache::ExclusiveCache;
//! use glyphstrike_core::{Descriptor, Effects, NeverAsPaths, StrikeSpec, Typeface};
//!
//! let cache = ExclusiveCache::new(
//!     |d: &Descriptor, _: &Effects, _: &Arc<dyn Typeface>| -> Result<Vec<u32>, Infallible> {
//!         Ok(Vec::with_capacity(d.byte_len()))
//!     },
//! );
//!
//! let spec = StrikeSpec::make_default(&NeverAsPaths);
//! let mut strike = spec.find_or_create_exclusive_strike(&cache).unwrap();
//! strike.push(42);
//! ```

pub mod cache_config;
pub mod error;
pub mod exclusive;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod materializer;
pub mod metrics;
pub mod shared;

pub use cache_config::CacheConfig;
pub use error::{CacheConfigError, Result};
pub use exclusive::{ExclusiveCache, ExclusiveStrike};
#[cfg(feature = "gpu")]
pub use gpu::{GpuStrikeHandle, GpuStrikeRegistry};
pub use materializer::StrikeMaterializer;
pub use metrics::CacheMetrics;
pub use shared::{ScopedStrike, SharedCache};
