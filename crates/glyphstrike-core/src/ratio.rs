//! Strike size versus requested size
//!
//! Some strikes store glyphs at a size other than the one the caller asked
//! for: outline strikes use one canonical size, and oversized glyphs are
//! shrunk until they fit the atlas. The strike-to-source ratio is the factor
//! that scales stored glyphs back up at draw time.

use crate::error::{Result, StrikeError};

/// Glyphs with a side this long never go into a raster atlas
pub const SIDE_TOO_BIG_FOR_ATLAS: f32 = 4096.0;

/// Bilinear filtering pad around each atlas glyph
pub const BILERP_PAD: f32 = 2.0;

/// The longest glyph side a fallback strike may produce
pub const MAX_ATLAS_DIMENSION: f32 = SIDE_TOO_BIG_FOR_ATLAS - BILERP_PAD;

/// `source_size / strike_size`, refusing non-positive strike sizes
pub fn strike_to_source_ratio(source_size: f32, strike_size: f32) -> Result<f32> {
    if !(strike_size.is_finite() && strike_size > 0.0) {
        return Err(StrikeError::NonPositiveStrikeSize(strike_size));
    }
    Ok(source_size / strike_size)
}

/// Reduced text size for a source-space fallback strike
///
/// Scales `requested_size` so the longest glyph side fits in
/// [`MAX_ATLAS_DIMENSION`]. Floors to whole sizes and never goes below 1.
/// `max_source_glyph_dimension` must be positive; callers validate it.
pub fn fallback_text_size(requested_size: f32, max_source_glyph_dimension: f32) -> f32 {
    let size = (MAX_ATLAS_DIMENSION / max_source_glyph_dimension * requested_size).floor();
    if size.is_finite() {
        size.max(1.0)
    } else {
        1.0
    }
}

/// Text size and ratio for a source-space fallback strike
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceFallback {
    pub text_size: f32,
    pub strike_to_source_ratio: f32,
}

impl SourceFallback {
    pub fn new(requested_size: f32, max_source_glyph_dimension: f32) -> Self {
        let text_size = fallback_text_size(requested_size, max_source_glyph_dimension);
        Self {
            text_size,
            // text_size is at least 1
            strike_to_source_ratio: strike_to_source_ratio(requested_size, text_size)
                .unwrap_or(requested_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_divides_source_by_strike() {
        assert_eq!(strike_to_source_ratio(32.0, 64.0), Ok(0.5));
    }

    #[test]
    fn ratio_rejects_degenerate_strike_sizes() {
        assert_eq!(
            strike_to_source_ratio(12.0, 0.0),
            Err(StrikeError::NonPositiveStrikeSize(0.0))
        );
        assert!(strike_to_source_ratio(12.0, -1.0).is_err());
        assert!(strike_to_source_ratio(12.0, f32::INFINITY).is_err());
    }

    #[test]
    fn fallback_fits_the_atlas() {
        let fallback = SourceFallback::new(100.0, 500.0);
        assert_eq!(MAX_ATLAS_DIMENSION, 4094.0);
        assert_eq!(fallback.text_size, 818.0);
        assert_eq!(fallback.strike_to_source_ratio, 100.0 / 818.0);
    }

    #[test]
    fn fallback_never_reaches_zero() {
        assert_eq!(fallback_text_size(0.001, 100_000.0), 1.0);
        assert_eq!(fallback_text_size(12.0, 0.0), 1.0);
    }

    #[test]
    fn degenerate_glyph_dimensions_still_give_a_ratio() {
        let fallback = SourceFallback::new(12.0, 0.0);
        assert_eq!(fallback.text_size, 1.0);
        assert_eq!(fallback.strike_to_source_ratio, 12.0);

        let negative = SourceFallback::new(12.0, -5.0);
        assert_eq!(negative.text_size, 1.0);
        assert!(negative.strike_to_source_ratio.is_finite());
    }
}
