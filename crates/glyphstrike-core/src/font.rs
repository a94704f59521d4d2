//! The text-size half of a strike request

use std::sync::Arc;

use crate::paint::{Paint, Style};
use crate::ratio::strike_to_source_ratio;
use crate::typeface::{default_typeface, Typeface};

/// Size used for strikes that store outlines instead of pixels
///
/// Outlines are scaled at draw time, so one size serves every request.
pub const CANONICAL_TEXT_SIZE_FOR_PATHS: f32 = 64.0;

/// How hard outlines get snapped to the pixel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hinting {
    None,
    Slight,
    #[default]
    Normal,
    Full,
}

/// How glyph edges are antialiased
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Edging {
    /// One bit per pixel
    Alias,
    /// Eight bit coverage
    #[default]
    AntiAlias,
    /// Per-channel coverage (needs a known pixel geometry)
    SubpixelAntiAlias,
}

/// Typeface plus everything that sizes and styles its glyphs
#[derive(Debug, Clone)]
pub struct Font {
    typeface: Option<Arc<dyn Typeface>>,
    size: f32,
    scale_x: f32,
    skew_x: f32,
    hinting: Hinting,
    edging: Edging,
    subpixel: bool,
    embolden: bool,
    linear_metrics: bool,
    embedded_bitmaps: bool,
    force_auto_hinting: bool,
    baseline_snap: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            typeface: None,
            size: 12.0,
            scale_x: 1.0,
            skew_x: 0.0,
            hinting: Hinting::Normal,
            edging: Edging::AntiAlias,
            subpixel: false,
            embolden: false,
            linear_metrics: false,
            embedded_bitmaps: false,
            force_auto_hinting: false,
            baseline_snap: true,
        }
    }
}

impl Font {
    /// A default font using the given typeface and size
    pub fn new(typeface: Arc<dyn Typeface>, size: f32) -> Self {
        Self::default().with_typeface(typeface).with_size(size)
    }

    pub fn with_typeface(mut self, typeface: Arc<dyn Typeface>) -> Self {
        self.typeface = Some(typeface);
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.set_size(size);
        self
    }

    pub fn with_scale_x(mut self, scale_x: f32) -> Self {
        self.scale_x = scale_x;
        self
    }

    pub fn with_skew_x(mut self, skew_x: f32) -> Self {
        self.skew_x = skew_x;
        self
    }

    pub fn with_hinting(mut self, hinting: Hinting) -> Self {
        self.hinting = hinting;
        self
    }

    pub fn with_edging(mut self, edging: Edging) -> Self {
        self.edging = edging;
        self
    }

    pub fn with_subpixel(mut self, subpixel: bool) -> Self {
        self.subpixel = subpixel;
        self
    }

    pub fn with_embolden(mut self, embolden: bool) -> Self {
        self.embolden = embolden;
        self
    }

    pub fn with_linear_metrics(mut self, linear_metrics: bool) -> Self {
        self.linear_metrics = linear_metrics;
        self
    }

    pub fn with_embedded_bitmaps(mut self, embedded_bitmaps: bool) -> Self {
        self.embedded_bitmaps = embedded_bitmaps;
        self
    }

    pub fn with_force_auto_hinting(mut self, force_auto_hinting: bool) -> Self {
        self.force_auto_hinting = force_auto_hinting;
        self
    }

    pub fn with_baseline_snap(mut self, baseline_snap: bool) -> Self {
        self.baseline_snap = baseline_snap;
        self
    }

    /// Negative or non-finite sizes become 0
    pub fn set_size(&mut self, size: f32) {
        self.size = if size.is_finite() && size > 0.0 {
            size
        } else {
            0.0
        };
    }

    pub fn set_typeface(&mut self, typeface: Option<Arc<dyn Typeface>>) {
        self.typeface = typeface;
    }

    pub fn set_hinting(&mut self, hinting: Hinting) {
        self.hinting = hinting;
    }

    pub fn set_edging(&mut self, edging: Edging) {
        self.edging = edging;
    }

    pub fn set_subpixel(&mut self, subpixel: bool) {
        self.subpixel = subpixel;
    }

    pub fn set_force_auto_hinting(&mut self, force_auto_hinting: bool) {
        self.force_auto_hinting = force_auto_hinting;
    }

    pub fn set_linear_metrics(&mut self, linear_metrics: bool) {
        self.linear_metrics = linear_metrics;
    }

    pub fn typeface(&self) -> Option<&Arc<dyn Typeface>> {
        self.typeface.as_ref()
    }

    /// The font's typeface, or the shared default when it has none
    pub fn ref_typeface_or_default(&self) -> Arc<dyn Typeface> {
        self.typeface.clone().unwrap_or_else(default_typeface)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x
    }

    pub fn skew_x(&self) -> f32 {
        self.skew_x
    }

    pub fn hinting(&self) -> Hinting {
        self.hinting
    }

    pub fn edging(&self) -> Edging {
        self.edging
    }

    pub fn is_subpixel(&self) -> bool {
        self.subpixel
    }

    pub fn is_embolden(&self) -> bool {
        self.embolden
    }

    pub fn is_linear_metrics(&self) -> bool {
        self.linear_metrics
    }

    pub fn is_embedded_bitmaps(&self) -> bool {
        self.embedded_bitmaps
    }

    pub fn is_force_auto_hinting(&self) -> bool {
        self.force_auto_hinting
    }

    pub fn is_baseline_snap(&self) -> bool {
        self.baseline_snap
    }

    /// Rewrite this font (and optionally its paint) into outline form
    ///
    /// Bitmap-only and hinting-related settings are dropped, subpixel
    /// positioning turns on, and the size becomes
    /// [`CANONICAL_TEXT_SIZE_FOR_PATHS`]. Returns the factor that takes the
    /// canonical size back to the size this font had before.
    pub fn setup_for_as_paths(&mut self, paint: Option<&mut Paint>) -> f32 {
        self.embedded_bitmaps = false;
        self.force_auto_hinting = false;
        self.subpixel = true;
        self.hinting = Hinting::None;

        if self.edging == Edging::SubpixelAntiAlias {
            self.edging = Edging::AntiAlias;
        }

        if let Some(paint) = paint {
            paint.set_style(Style::Fill);
            paint.set_path_effect(None);
        }

        let text_size = self.size;
        self.size = CANONICAL_TEXT_SIZE_FOR_PATHS;
        strike_to_source_ratio(text_size, CANONICAL_TEXT_SIZE_FOR_PATHS).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_size_clamps_to_zero() {
        assert_eq!(Font::default().with_size(-3.0).size(), 0.0);
        assert_eq!(Font::default().with_size(f32::NAN).size(), 0.0);
    }

    #[test]
    fn as_paths_normalizes_font_and_paint() {
        let mut font = Font::default()
            .with_size(32.0)
            .with_hinting(Hinting::Full)
            .with_edging(Edging::SubpixelAntiAlias)
            .with_embedded_bitmaps(true)
            .with_force_auto_hinting(true);
        let mut paint = Paint::default().with_style(Style::Stroke);

        let ratio = font.setup_for_as_paths(Some(&mut paint));

        assert_eq!(ratio, 0.5);
        assert_eq!(font.size(), CANONICAL_TEXT_SIZE_FOR_PATHS);
        assert_eq!(font.hinting(), Hinting::None);
        assert_eq!(font.edging(), Edging::AntiAlias);
        assert!(font.is_subpixel());
        assert!(!font.is_embedded_bitmaps());
        assert!(!font.is_force_auto_hinting());
        assert_eq!(paint.style(), Style::Fill);
    }
}
