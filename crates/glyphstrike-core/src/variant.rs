//! Per-variant request normalization
//!
//! Each strike variant rewrites the caller's request into the exact inputs
//! the canonicalizer sees. The rewrites are kept apart from key building so
//! every variant can be inspected (and tested) before it is hashed.

use std::fmt;
use std::sync::Arc;

use kurbo::Affine;

use crate::font::{Edging, Font, Hinting};
use crate::paint::Paint;
use crate::policy::AsPathsPolicy;
use crate::ratio::SourceFallback;
use crate::scaler::ScalerContextFlags;
use crate::surface::SurfaceProps;
use crate::typeface::Typeface;

/// Units-per-em assumed for typefaces that report none
pub const DEFAULT_UNITS_PER_EM: i32 = 1024;

/// Which constructor produced a strike spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrikeVariant {
    /// Device-space bitmaps
    Mask,
    /// Outlines at the canonical path size
    Path,
    /// Source-space bitmaps shrunk to fit the atlas
    SourceFallback,
    /// Device-independent key for text blobs and caches
    Canonicalized,
    /// Unhinted outlines at units-per-em for vector output
    PdfVector,
    /// Signed distance fields
    DistanceField,
}

impl fmt::Display for StrikeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrikeVariant::Mask => "mask",
            StrikeVariant::Path => "path",
            StrikeVariant::SourceFallback => "source-fallback",
            StrikeVariant::Canonicalized => "canonicalized",
            StrikeVariant::PdfVector => "pdf-vector",
            StrikeVariant::DistanceField => "distance-field",
        };
        f.write_str(name)
    }
}

/// Inputs to canonicalization after a variant has rewritten them
#[derive(Debug, Clone)]
pub struct Normalized {
    pub font: Font,
    pub paint: Paint,
    pub surface_props: SurfaceProps,
    pub scaler_flags: ScalerContextFlags,
    pub device_matrix: Affine,
    pub strike_to_source_ratio: f32,
}

pub fn mask(
    font: &Font,
    paint: &Paint,
    surface_props: &SurfaceProps,
    scaler_flags: ScalerContextFlags,
    device_matrix: &Affine,
) -> Normalized {
    Normalized {
        font: font.clone(),
        paint: paint.clone(),
        surface_props: *surface_props,
        scaler_flags,
        device_matrix: *device_matrix,
        strike_to_source_ratio: 1.0,
    }
}

pub fn path(
    font: &Font,
    paint: &Paint,
    surface_props: &SurfaceProps,
    scaler_flags: ScalerContextFlags,
) -> Normalized {
    let mut path_font = font.clone();
    let mut path_paint = paint.clone();
    let ratio = path_font.setup_for_as_paths(Some(&mut path_paint));

    // Outlines are positioned by the caller, not baked at subpixel offsets.
    path_font.set_subpixel(false);

    Normalized {
        font: path_font,
        paint: path_paint,
        surface_props: *surface_props,
        scaler_flags,
        device_matrix: Affine::IDENTITY,
        strike_to_source_ratio: ratio,
    }
}

pub fn source_fallback(
    font: &Font,
    paint: &Paint,
    surface_props: &SurfaceProps,
    scaler_flags: ScalerContextFlags,
    max_source_glyph_dimension: f32,
) -> Normalized {
    let fallback = SourceFallback::new(font.size(), max_source_glyph_dimension);

    let mut fallback_font = font.clone();
    fallback_font.set_size(fallback.text_size);
    fallback_font.set_subpixel(false);

    Normalized {
        font: fallback_font,
        paint: paint.clone(),
        surface_props: *surface_props,
        scaler_flags,
        device_matrix: Affine::IDENTITY,
        strike_to_source_ratio: fallback.strike_to_source_ratio,
    }
}

pub fn canonicalized<P>(font: &Font, paint: Option<&Paint>, policy: &P) -> Normalized
where
    P: AsPathsPolicy + ?Sized,
{
    let mut canonical_font = font.clone();
    let mut canonical_paint = paint.cloned().unwrap_or_default();
    let mut ratio = 1.0;

    if policy.should_draw_as_paths(font, &canonical_paint, &Affine::IDENTITY) {
        ratio = canonical_font.setup_for_as_paths(None);
        canonical_paint.reset();
    }

    Normalized {
        font: canonical_font,
        paint: canonical_paint,
        surface_props: SurfaceProps::legacy_font_host(),
        scaler_flags: ScalerContextFlags::FakeGammaAndBoostContrast,
        device_matrix: Affine::IDENTITY,
        strike_to_source_ratio: ratio,
    }
}

/// Also returns the size the vector strike is built at
pub fn pdf_vector(typeface: &Arc<dyn Typeface>) -> (Normalized, i32) {
    let mut units_per_em = typeface.units_per_em();
    if units_per_em <= 0 {
        units_per_em = DEFAULT_UNITS_PER_EM;
    }

    let font = Font::new(Arc::clone(typeface), units_per_em as f32)
        .with_hinting(Hinting::None)
        .with_edging(Edging::Alias);

    let normalized = Normalized {
        font,
        paint: Paint::default(),
        surface_props: SurfaceProps::unknown_geometry(),
        scaler_flags: ScalerContextFlags::FakeGammaAndBoostContrast,
        device_matrix: Affine::IDENTITY,
        strike_to_source_ratio: 1.0,
    };
    (normalized, units_per_em)
}

#[cfg(feature = "gpu")]
pub fn distance_field<P>(
    font: &Font,
    paint: &Paint,
    surface_props: &SurfaceProps,
    device_matrix: &Affine,
    options: &crate::distance_field::DistanceFieldOptions,
    policy: &P,
) -> (Normalized, (f32, f32))
where
    P: crate::distance_field::DistanceFieldPolicy + ?Sized,
{
    let df_paint = policy.init_paint(paint);
    let (df_font, ratio) = policy.init_font(font, device_matrix, options);
    let scales = policy.min_max_scale(font.size(), device_matrix, options);

    // Gamma and LCD are applied in the shader.
    let normalized = Normalized {
        font: df_font,
        paint: df_paint,
        surface_props: *surface_props,
        scaler_flags: ScalerContextFlags::None,
        device_matrix: Affine::IDENTITY,
        strike_to_source_ratio: ratio,
    };
    (normalized, scales)
}
