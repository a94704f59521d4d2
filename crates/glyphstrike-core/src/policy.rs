//! The "draw as outlines?" decision, supplied from outside
//!
//! Whether a configuration is drawn from outlines or from bitmaps depends
//! on the rendering pipeline (matrix limits, hinting support, text size
//! caps). This crate never guesses those thresholds; callers pass a policy.

use kurbo::Affine;

use crate::font::Font;
use crate::paint::Paint;

/// Decides whether text should be drawn from outlines
pub trait AsPathsPolicy {
    fn should_draw_as_paths(&self, font: &Font, paint: &Paint, matrix: &Affine) -> bool;
}

impl<F> AsPathsPolicy for F
where
    F: Fn(&Font, &Paint, &Affine) -> bool,
{
    fn should_draw_as_paths(&self, font: &Font, paint: &Paint, matrix: &Affine) -> bool {
        self(font, paint, matrix)
    }
}

/// Always rasterize masks
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAsPaths;

impl AsPathsPolicy for NeverAsPaths {
    fn should_draw_as_paths(&self, _font: &Font, _paint: &Paint, _matrix: &Affine) -> bool {
        false
    }
}

/// Always use outlines
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAsPaths;

impl AsPathsPolicy for AlwaysAsPaths {
    fn should_draw_as_paths(&self, _font: &Font, _paint: &Paint, _matrix: &Affine) -> bool {
        true
    }
}
