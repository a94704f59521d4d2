use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use glyphstrike_cache::{ExclusiveCache, SharedCache, StrikeMaterializer};
use glyphstrike_core::{
    Descriptor, Effects, ExclusiveStrikeCache, Font, NeverAsPaths, Paint, ScalerContextFlags,
    StrikeSpec, SurfaceProps, Typeface,
};
use kurbo::Affine;

/// A strike that remembers which face built it and what was drawn
#[derive(Debug, Default)]
struct TestStrike {
    typeface_id: u64,
    glyphs: Vec<u16>,
}

/// Counts builds; fails while `failures_left` is positive
#[derive(Default)]
struct CountingMaterializer {
    builds: AtomicUsize,
    failures_left: AtomicUsize,
    delay: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OutOfMemory;

impl StrikeMaterializer for CountingMaterializer {
    type Strike = TestStrike;
    type Error = OutOfMemory;

    fn materialize(
        &self,
        _descriptor: &Descriptor,
        _effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<TestStrike, OutOfMemory> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(OutOfMemory);
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(TestStrike {
            typeface_id: typeface.unique_id(),
            glyphs: Vec::new(),
        })
    }
}

fn spec(size: f32) -> StrikeSpec {
    StrikeSpec::mask(
        &Font::default().with_size(size),
        &Paint::default(),
        &SurfaceProps::legacy_font_host(),
        ScalerContextFlags::FakeGammaAndBoostContrast,
        &Affine::IDENTITY,
    )
}

#[test]
fn exclusive_handle_is_released_on_drop() {
    let _ = env_logger::builder().is_test(true).try_init();

    let cache = Arc::new(ExclusiveCache::new(CountingMaterializer::default()));
    let spec = spec(12.0);

    let mut first = spec.find_or_create_exclusive_strike(&*cache).unwrap();
    first.glyphs.push(3);

    // Another thread blocks until the first handle goes away
    let waiter = {
        let cache = Arc::clone(&cache);
        let spec = spec.clone();
        thread::spawn(move || {
            let strike = spec.find_or_create_exclusive_strike(&*cache).unwrap();
            strike.glyphs.clone()
        })
    };

    thread::sleep(Duration::from_millis(20));
    first.glyphs.push(4);
    drop(first);

    assert_eq!(waiter.join().unwrap(), vec![3, 4]);
    assert_eq!(cache.metrics().materializations, 1);
}

#[test]
fn exclusive_handle_is_released_on_early_return() {
    fn draw(cache: &ExclusiveCache<CountingMaterializer>, spec: &StrikeSpec) -> Option<()> {
        let mut strike = spec.find_or_create_exclusive_strike(cache).ok()?;
        strike.glyphs.push(1);
        let missing: Option<u16> = None;
        strike.glyphs.push(missing?);
        Some(())
    }

    let cache = ExclusiveCache::new(CountingMaterializer::default());
    let spec = spec(20.0);
    assert!(draw(&cache, &spec).is_none());

    // Would deadlock if the guard had leaked
    let strike = cache
        .find_or_create_strike_exclusive(spec.descriptor(), spec.effects(), spec.typeface())
        .unwrap();
    assert_eq!(strike.glyphs, vec![1]);
    assert_eq!(strike.typeface_id, spec.typeface().unique_id());
}

#[test]
fn exclusive_builds_once_under_contention() {
    let cache = ExclusiveCache::new(CountingMaterializer {
        delay: Some(Duration::from_millis(5)),
        ..CountingMaterializer::default()
    });
    let spec = StrikeSpec::make_default(&NeverAsPaths);
    let barrier = Barrier::new(8);

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                barrier.wait();
                let mut strike = spec.find_or_create_exclusive_strike(&cache).unwrap();
                strike.glyphs.push(0);
            });
        }
    });

    let metrics = cache.metrics();
    assert_eq!(metrics.materializations, 1);
    assert_eq!(metrics.total_requests, 8);
    let strike = spec.find_or_create_exclusive_strike(&cache).unwrap();
    assert_eq!(strike.glyphs.len(), 8);
}

#[test]
fn shared_builds_once_under_contention() {
    let materializer = CountingMaterializer {
        delay: Some(Duration::from_millis(20)),
        ..CountingMaterializer::default()
    };
    let cache = SharedCache::new(materializer);
    let spec = spec(48.0);
    let barrier = Barrier::new(8);

    let strikes: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    spec.find_or_create_scoped_strike(&cache)
                        .unwrap()
                        .into_shared()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(strikes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(cache.metrics().materializations, 1);
}

#[test]
fn exclusive_errors_pass_through_and_retry() {
    let cache = ExclusiveCache::new(CountingMaterializer {
        failures_left: AtomicUsize::new(1),
        ..CountingMaterializer::default()
    });
    let spec = spec(30.0);

    assert_eq!(
        spec.find_or_create_exclusive_strike(&cache).err(),
        Some(OutOfMemory)
    );
    assert!(cache.is_empty());

    assert!(spec.find_or_create_exclusive_strike(&cache).is_ok());
    let metrics = cache.metrics();
    assert_eq!(metrics.failures, 1);
    assert_eq!(metrics.materializations, 1);
}

#[test]
fn shared_errors_pass_through_and_retry() {
    let cache = SharedCache::new(CountingMaterializer {
        failures_left: AtomicUsize::new(1),
        ..CountingMaterializer::default()
    });
    let spec = spec(30.0);

    let err = spec.find_or_create_scoped_strike(&cache).err();
    assert_eq!(err.as_deref(), Some(&OutOfMemory));
    assert!(!cache.contains(spec.descriptor()));

    let strike = spec.find_or_create_scoped_strike(&cache).unwrap();
    assert!(strike.glyphs.is_empty());
    assert_eq!(cache.metrics().failures, 1);
}

#[cfg(feature = "gpu")]
#[test]
fn gpu_strikes_follow_descriptors() {
    use glyphstrike_cache::GpuStrikeRegistry;

    let registry = GpuStrikeRegistry::new();
    let small = spec(10.0);
    let moved = StrikeSpec::mask(
        &Font::default().with_size(10.0),
        &Paint::default(),
        &SurfaceProps::legacy_font_host(),
        ScalerContextFlags::FakeGammaAndBoostContrast,
        &Affine::translate((100.0, 3.0)),
    );

    let a = small.find_or_create_gpu_strike(&registry).ok();
    let b = moved.find_or_create_gpu_strike(&registry).ok();
    let c = spec(11.0).find_or_create_gpu_strike(&registry).ok();

    assert!(a.is_some());
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(registry.len(), 2);
}
