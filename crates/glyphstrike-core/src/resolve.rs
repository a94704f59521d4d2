//! Handing strike specs to strike caches
//!
//! The caches live elsewhere; this module only fixes the shape of the three
//! lookups. Each call passes the descriptor, effects and typeface exactly
//! once and returns whatever the cache returns, errors included.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::effects::Effects;
use crate::strike_spec::StrikeSpec;
use crate::typeface::Typeface;

/// A cache that hands out one strike to one user at a time
///
/// The handle gives mutable access and releases the strike when dropped.
pub trait ExclusiveStrikeCache {
    type Strike;
    type Handle: DerefMut<Target = Self::Strike>;
    type Error;

    fn find_or_create_strike_exclusive(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<Self::Handle, Self::Error>;
}

/// A cache that shares strikes for the lifetime of a scoped handle
pub trait ScopedStrikeCache {
    type Strike;
    type Handle: Deref<Target = Self::Strike>;
    type Error;

    fn find_or_create_scoped_strike(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<Self::Handle, Self::Error>;
}

/// A GPU-side strike registry, keyed by descriptor alone
#[cfg(feature = "gpu")]
pub trait GpuStrikeCache {
    type Handle;
    type Error;

    fn find_or_create_gpu_strike(
        &self,
        descriptor: &Descriptor,
    ) -> Result<Self::Handle, Self::Error>;
}

impl StrikeSpec {
    pub fn find_or_create_exclusive_strike<C>(&self, cache: &C) -> Result<C::Handle, C::Error>
    where
        C: ExclusiveStrikeCache + ?Sized,
    {
        cache.find_or_create_strike_exclusive(self.descriptor(), self.effects(), self.typeface())
    }

    pub fn find_or_create_scoped_strike<C>(&self, cache: &C) -> Result<C::Handle, C::Error>
    where
        C: ScopedStrikeCache + ?Sized,
    {
        cache.find_or_create_scoped_strike(self.descriptor(), self.effects(), self.typeface())
    }

    #[cfg(feature = "gpu")]
    pub fn find_or_create_gpu_strike<C>(&self, cache: &C) -> Result<C::Handle, C::Error>
    where
        C: GpuStrikeCache + ?Sized,
    {
        cache.find_or_create_gpu_strike(self.descriptor())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use kurbo::Affine;

    use super::*;
    use crate::font::Font;
    use crate::paint::Paint;
    use crate::scaler::ScalerContextFlags;
    use crate::surface::SurfaceProps;

    /// Records every lookup and returns a boxed copy of the key length
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(Descriptor, u64)>>,
        fail: bool,
    }

    impl ExclusiveStrikeCache for Recorder {
        type Strike = usize;
        type Handle = Box<usize>;
        type Error = &'static str;

        fn find_or_create_strike_exclusive(
            &self,
            descriptor: &Descriptor,
            _effects: &Effects,
            typeface: &Arc<dyn Typeface>,
        ) -> Result<Box<usize>, &'static str> {
            self.calls
                .borrow_mut()
                .push((descriptor.clone(), typeface.unique_id()));
            if self.fail {
                Err("cache full")
            } else {
                Ok(Box::new(descriptor.byte_len()))
            }
        }
    }

    fn spec() -> StrikeSpec {
        StrikeSpec::mask(
            &Font::default(),
            &Paint::default(),
            &SurfaceProps::default(),
            ScalerContextFlags::FakeGammaAndBoostContrast,
            &Affine::IDENTITY,
        )
    }

    #[test]
    fn passes_the_key_once() {
        let cache = Recorder::default();
        let spec = spec();
        let handle = spec.find_or_create_exclusive_strike(&cache);

        assert_eq!(handle.as_deref(), Ok(&spec.descriptor().byte_len()));
        let calls = cache.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(&calls[0].0, spec.descriptor());
        assert_eq!(calls[0].1, spec.typeface().unique_id());
    }

    #[test]
    fn cache_errors_pass_through() {
        let cache = Recorder {
            fail: true,
            ..Recorder::default()
        };
        assert_eq!(
            spec().find_or_create_exclusive_strike(&cache).err(),
            Some("cache full")
        );
    }
}
