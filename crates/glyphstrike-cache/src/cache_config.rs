//! Strike cache sizing
//!
//! Limits come from three places, later ones winning:
//!
//! 1. Built-in defaults (2048 exclusive strikes, 4096 shared strikes)
//! 2. The `GLYPHSTRIKE_STRIKE_LIMIT` and `GLYPHSTRIKE_SHARED_CAPACITY`
//!    environment variables, read once on first use
//! 3. Runtime overrides via [`set_strike_limit`] and [`set_shared_capacity`]
//!
//! # Example
//!
//! ```
//! use glyphstrike_cache::cache_config;
//!
//! cache_config::set_strike_limit(512).unwrap();
//! assert_eq!(cache_config::current().strike_limit().get(), 512);
//!
//! // Zero would make every lookup an eviction
//! assert!(cache_config::set_strike_limit(0).is_err());
//!
//! cache_config::reset_overrides();
//! ```
//!
//! # Environment Variables
//!
//! ```bash
//! GLYPHSTRIKE_STRIKE_LIMIT=256 GLYPHSTRIKE_SHARED_CAPACITY=1024 ./my_app
//! ```

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use crate::error::{CacheConfigError, Result};

pub const STRIKE_LIMIT_VAR: &str = "GLYPHSTRIKE_STRIKE_LIMIT";
pub const SHARED_CAPACITY_VAR: &str = "GLYPHSTRIKE_SHARED_CAPACITY";

const DEFAULT_STRIKE_LIMIT: NonZeroUsize = match NonZeroUsize::new(2048) {
    Some(v) => v,
    None => unreachable!(),
};

const DEFAULT_SHARED_CAPACITY: NonZeroUsize = match NonZeroUsize::new(4096) {
    Some(v) => v,
    None => unreachable!(),
};

/// Runtime overrides; zero means "not set"
static STRIKE_LIMIT_OVERRIDE: AtomicUsize = AtomicUsize::new(0);
static SHARED_CAPACITY_OVERRIDE: AtomicUsize = AtomicUsize::new(0);

/// Environment snapshot, taken once
static ENV_CONFIG: OnceLock<CacheConfig> = OnceLock::new();

/// How many strikes each cache may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    strike_limit: NonZeroUsize,
    shared_capacity: NonZeroUsize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            strike_limit: DEFAULT_STRIKE_LIMIT,
            shared_capacity: DEFAULT_SHARED_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit for [`ExclusiveCache`](crate::ExclusiveCache)
    pub fn with_strike_limit(mut self, limit: usize) -> Result<Self> {
        self.strike_limit = non_zero(limit, "strike limit")?;
        Ok(self)
    }

    /// Capacity for [`SharedCache`](crate::SharedCache)
    pub fn with_shared_capacity(mut self, capacity: usize) -> Result<Self> {
        self.shared_capacity = non_zero(capacity, "shared capacity")?;
        Ok(self)
    }

    pub fn strike_limit(&self) -> NonZeroUsize {
        self.strike_limit
    }

    pub fn shared_capacity(&self) -> NonZeroUsize {
        self.shared_capacity
    }

    /// Defaults overlaid with the process environment
    ///
    /// Bad values are logged and ignored, never fatal.
    pub fn from_env() -> Self {
        *ENV_CONFIG.get_or_init(|| {
            let mut config = Self::default();
            let read = |var: &'static str| std::env::var(var).ok().map(|raw| parse_limit(var, &raw));

            match read(STRIKE_LIMIT_VAR) {
                Some(Ok(limit)) => {
                    config.strike_limit = limit;
                    log::info!("Strike limit {} set via {}", limit, STRIKE_LIMIT_VAR);
                }
                Some(Err(err)) => log::warn!("Ignoring {}", err),
                None => {}
            }

            match read(SHARED_CAPACITY_VAR) {
                Some(Ok(capacity)) => {
                    config.shared_capacity = capacity;
                    log::info!("Shared capacity {} set via {}", capacity, SHARED_CAPACITY_VAR);
                }
                Some(Err(err)) => log::warn!("Ignoring {}", err),
                None => {}
            }

            config
        })
    }
}

/// Parse a positive integer limit from an environment value
pub fn parse_limit(var: &'static str, raw: &str) -> Result<NonZeroUsize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| CacheConfigError::InvalidEnvValue {
            var,
            value: raw.to_string(),
        })
}

fn non_zero(value: usize, what: &'static str) -> Result<NonZeroUsize> {
    NonZeroUsize::new(value).ok_or(CacheConfigError::ZeroLimit(what))
}

/// The configuration new caches pick up
pub fn current() -> CacheConfig {
    let mut config = CacheConfig::from_env();
    if let Some(limit) = NonZeroUsize::new(STRIKE_LIMIT_OVERRIDE.load(Ordering::SeqCst)) {
        config.strike_limit = limit;
    }
    if let Some(capacity) = NonZeroUsize::new(SHARED_CAPACITY_OVERRIDE.load(Ordering::SeqCst)) {
        config.shared_capacity = capacity;
    }
    config
}

/// Override the exclusive strike limit for caches built from now on
pub fn set_strike_limit(limit: usize) -> Result<()> {
    let limit = non_zero(limit, "strike limit")?;
    STRIKE_LIMIT_OVERRIDE.store(limit.get(), Ordering::SeqCst);
    log::debug!("Strike limit set to {} via runtime call", limit);
    Ok(())
}

/// Override the shared capacity for caches built from now on
pub fn set_shared_capacity(capacity: usize) -> Result<()> {
    let capacity = non_zero(capacity, "shared capacity")?;
    SHARED_CAPACITY_OVERRIDE.store(capacity.get(), Ordering::SeqCst);
    log::debug!("Shared capacity set to {} via runtime call", capacity);
    Ok(())
}

/// Drop runtime overrides, falling back to environment and defaults
pub fn reset_overrides() {
    STRIKE_LIMIT_OVERRIDE.store(0, Ordering::SeqCst);
    SHARED_CAPACITY_OVERRIDE.store(0, Ordering::SeqCst);
}
