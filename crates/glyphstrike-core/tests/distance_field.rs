#![cfg(feature = "gpu")]

use glyphstrike_core::{
    BucketedDistanceField, DistanceFieldOptions, DistanceFieldPolicy, EntryTag, Font, Paint,
    StrikeError, StrikeSpec, StrikeVariant, SurfaceProps,
};
use kurbo::Affine;

#[test]
fn distance_field_spec_carries_its_scale_band() {
    let font = Font::default().with_size(24.0);
    let (spec, range) = StrikeSpec::distance_field(
        &font,
        &Paint::default(),
        &SurfaceProps::legacy_font_host(),
        &Affine::IDENTITY,
        &DistanceFieldOptions::default(),
        &BucketedDistanceField,
    )
    .expect("usable range");

    assert_eq!(spec.variant(), StrikeVariant::DistanceField);
    assert_eq!(spec.strike_to_source_ratio(), 24.0 / 32.0);
    assert_eq!(range.min, 18.0 / 24.0);
    assert_eq!(range.max, 32.0 / 24.0);
    assert!(range.contains(1.0));
    assert!(spec.descriptor().entry(EntryTag::MaskFilter).is_some());
    assert!(spec.effects().mask_filter.is_some());
}

#[test]
fn sizes_in_one_bucket_share_a_strike() {
    let options = DistanceFieldOptions::default();
    let spec_at = |size: f32| {
        StrikeSpec::distance_field(
            &Font::default().with_size(size),
            &Paint::default(),
            &SurfaceProps::legacy_font_host(),
            &Affine::IDENTITY,
            &options,
            &BucketedDistanceField,
        )
        .map(|(spec, _)| spec)
    };

    let a = spec_at(40.0).expect("usable range");
    let b = spec_at(60.0).expect("usable range");
    assert_eq!(a.descriptor(), b.descriptor());
}

#[test]
fn auto_hinting_does_not_split_distance_fields() {
    let options = DistanceFieldOptions::default();
    let spec_for = |font: &Font| {
        StrikeSpec::distance_field(
            font,
            &Paint::default(),
            &SurfaceProps::legacy_font_host(),
            &Affine::IDENTITY,
            &options,
            &BucketedDistanceField,
        )
        .map(|(spec, _)| spec)
    };

    let font = Font::default().with_size(24.0);
    let plain = spec_for(&font).expect("usable range");
    let forced = spec_for(&font.clone().with_force_auto_hinting(true)).expect("usable range");
    assert_eq!(plain.descriptor(), forced.descriptor());
}

struct Broken;

impl DistanceFieldPolicy for Broken {
    fn init_paint(&self, paint: &Paint) -> Paint {
        paint.clone()
    }

    fn init_font(
        &self,
        font: &Font,
        _matrix: &Affine,
        _options: &DistanceFieldOptions,
    ) -> (Font, f32) {
        (font.clone(), 1.0)
    }

    fn min_max_scale(
        &self,
        _text_size: f32,
        _matrix: &Affine,
        _options: &DistanceFieldOptions,
    ) -> (f32, f32) {
        (4.0, 2.0)
    }
}

#[test]
fn inverted_range_is_an_error() {
    let result = StrikeSpec::distance_field(
        &Font::default(),
        &Paint::default(),
        &SurfaceProps::legacy_font_host(),
        &Affine::IDENTITY,
        &DistanceFieldOptions::default(),
        &Broken,
    );
    assert!(matches!(
        result,
        Err(StrikeError::UnusableScaleRange { min, max }) if min == 4.0 && max == 2.0
    ));
}
