//! Signed-distance-field strike policy
//!
//! Distance fields are generated at a few bucket sizes and scaled in a
//! shader, so one strike covers a whole band of device scales. The policy
//! picks the bucket, and reports the band so callers can tell when a new
//! transform has left it.

use std::sync::Arc;

use kurbo::Affine;

use crate::error::{Result, StrikeError};
use crate::font::{Edging, Font, Hinting};
use crate::paint::{MaskFilter, Paint};
use crate::ratio::strike_to_source_ratio;

pub const SMALL_DF_FONT_SIZE: f32 = 32.0;
pub const SMALL_DF_FONT_LIMIT: f32 = 32.0;
pub const MEDIUM_DF_FONT_SIZE: f32 = 72.0;
pub const MEDIUM_DF_FONT_LIMIT: f32 = 72.0;
pub const LARGE_DF_FONT_SIZE: f32 = 162.0;

/// Size limits for distance-field text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceFieldOptions {
    /// Below this device size, bitmaps look better than distance fields
    pub min_font_size: f32,
    /// Above this device size, outlines look better than distance fields
    pub max_font_size: f32,
}

impl Default for DistanceFieldOptions {
    fn default() -> Self {
        Self {
            min_font_size: 18.0,
            max_font_size: 324.0,
        }
    }
}

/// Range of relative device scales a distance-field strike stays valid for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    /// Reject empty, inverted or non-finite ranges
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min > max || max <= 0.0 {
            return Err(StrikeError::UnusableScaleRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, scale: f32) -> bool {
        self.min <= scale && scale <= self.max
    }
}

/// Marker filter telling the rasterizer to emit distance fields
#[derive(Debug, Clone, Copy, Default)]
pub struct SdfMaskFilter;

impl MaskFilter for SdfMaskFilter {
    fn type_name(&self) -> &'static str {
        "sdf"
    }

    fn flatten(&self, _out: &mut Vec<u8>) {}
}

/// Rewrites font and paint for distance-field storage
pub trait DistanceFieldPolicy {
    /// Paint used to build the strike
    fn init_paint(&self, paint: &Paint) -> Paint;

    /// Font used to build the strike, plus its strike-to-source ratio
    fn init_font(
        &self,
        font: &Font,
        matrix: &Affine,
        options: &DistanceFieldOptions,
    ) -> (Font, f32);

    /// Raw `(min, max)` relative scale band for `text_size` under `matrix`
    fn min_max_scale(
        &self,
        text_size: f32,
        matrix: &Affine,
        options: &DistanceFieldOptions,
    ) -> (f32, f32);
}

/// Three fixed buckets: small (32), medium (72) and large (162)
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketedDistanceField;

impl BucketedDistanceField {
    fn bucket(scaled_text_size: f32, options: &DistanceFieldOptions) -> (f32, f32, f32) {
        if scaled_text_size <= SMALL_DF_FONT_LIMIT {
            (SMALL_DF_FONT_SIZE, options.min_font_size, SMALL_DF_FONT_LIMIT)
        } else if scaled_text_size <= MEDIUM_DF_FONT_LIMIT {
            (MEDIUM_DF_FONT_SIZE, SMALL_DF_FONT_LIMIT, MEDIUM_DF_FONT_LIMIT)
        } else {
            (LARGE_DF_FONT_SIZE, MEDIUM_DF_FONT_LIMIT, options.max_font_size)
        }
    }
}

impl DistanceFieldPolicy for BucketedDistanceField {
    fn init_paint(&self, paint: &Paint) -> Paint {
        paint.clone().with_mask_filter(Arc::new(SdfMaskFilter))
    }

    fn init_font(
        &self,
        font: &Font,
        matrix: &Affine,
        options: &DistanceFieldOptions,
    ) -> (Font, f32) {
        let text_size = font.size();
        let (df_size, _, _) = Self::bucket(text_size * max_scale(matrix), options);

        let mut df_font = font.clone().with_size(df_size);
        df_font.set_edging(Edging::AntiAlias);
        df_font.set_hinting(Hinting::None);
        df_font.set_subpixel(true);
        df_font.set_linear_metrics(true);
        df_font.set_force_auto_hinting(false);

        let ratio = strike_to_source_ratio(text_size, df_size).unwrap_or(1.0);
        (df_font, ratio)
    }

    fn min_max_scale(
        &self,
        text_size: f32,
        matrix: &Affine,
        options: &DistanceFieldOptions,
    ) -> (f32, f32) {
        let scaled = text_size * max_scale(matrix);
        let (_, floor, ceil) = Self::bucket(scaled, options);
        (floor / scaled, ceil / scaled)
    }
}

/// Largest singular value of the matrix's linear part
pub fn max_scale(matrix: &Affine) -> f32 {
    let [a, b, c, d, _, _] = matrix.as_coeffs();
    let col0 = a * a + b * b;
    let col1 = c * c + d * d;
    let cross = a * c + b * d;
    let mean = (col0 + col1) / 2.0;
    let spread = (((col0 - col1) / 2.0).powi(2) + cross * cross).sqrt();
    (mean + spread).sqrt() as f32
}
