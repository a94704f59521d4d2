//! Strike specifications
//!
//! A [`StrikeSpec`] is everything a strike cache needs to find or build one
//! strike: the descriptor, the effect objects that go with it, the typeface
//! and the factor from strike space back to the caller's text size.

use std::sync::Arc;

use kurbo::Affine;
use log::trace;

use crate::canonical::canonicalize;
use crate::descriptor::Descriptor;
use crate::effects::Effects;
use crate::font::Font;
use crate::paint::Paint;
use crate::policy::AsPathsPolicy;
use crate::scaler::ScalerContextFlags;
use crate::surface::SurfaceProps;
use crate::typeface::Typeface;
use crate::variant::{self, Normalized, StrikeVariant};

#[cfg(feature = "gpu")]
use crate::distance_field::{DistanceFieldOptions, DistanceFieldPolicy, ScaleRange};
#[cfg(feature = "gpu")]
use crate::error::Result;

/// Immutable key and context for one strike
#[derive(Debug, Clone)]
pub struct StrikeSpec {
    descriptor: Descriptor,
    effects: Effects,
    typeface: Arc<dyn Typeface>,
    strike_to_source_ratio: f32,
    variant: StrikeVariant,
}

impl StrikeSpec {
    fn from_normalized(normalized: Normalized, variant: StrikeVariant) -> Self {
        let canonical = canonicalize(
            &normalized.font,
            &normalized.paint,
            &normalized.surface_props,
            normalized.scaler_flags,
            &normalized.device_matrix,
        );

        trace!(
            "{} strike: size {}, ratio {}, {:?}",
            variant,
            normalized.font.size(),
            normalized.strike_to_source_ratio,
            canonical.descriptor
        );

        Self {
            descriptor: canonical.descriptor,
            effects: canonical.effects,
            typeface: canonical.typeface,
            strike_to_source_ratio: normalized.strike_to_source_ratio,
            variant,
        }
    }

    /// Device-space mask strike; the request is keyed as given
    pub fn mask(
        font: &Font,
        paint: &Paint,
        surface_props: &SurfaceProps,
        scaler_flags: ScalerContextFlags,
        device_matrix: &Affine,
    ) -> Self {
        Self::from_normalized(
            variant::mask(font, paint, surface_props, scaler_flags, device_matrix),
            StrikeVariant::Mask,
        )
    }

    /// Outline strike at the canonical path size, with an identity matrix
    pub fn path(
        font: &Font,
        paint: &Paint,
        surface_props: &SurfaceProps,
        scaler_flags: ScalerContextFlags,
    ) -> Self {
        Self::from_normalized(
            variant::path(font, paint, surface_props, scaler_flags),
            StrikeVariant::Path,
        )
    }

    /// Source-space strike for glyphs too large for the atlas at full size
    ///
    /// `max_source_glyph_dimension` is the longest glyph side at the
    /// requested size and must be positive.
    pub fn source_fallback(
        font: &Font,
        paint: &Paint,
        surface_props: &SurfaceProps,
        scaler_flags: ScalerContextFlags,
        max_source_glyph_dimension: f32,
    ) -> Self {
        Self::from_normalized(
            variant::source_fallback(
                font,
                paint,
                surface_props,
                scaler_flags,
                max_source_glyph_dimension,
            ),
            StrikeVariant::SourceFallback,
        )
    }

    /// Device-independent key, used to group runs before a device is known
    pub fn canonicalized<P>(font: &Font, paint: Option<&Paint>, policy: &P) -> Self
    where
        P: AsPathsPolicy + ?Sized,
    {
        Self::from_normalized(
            variant::canonicalized(font, paint, policy),
            StrikeVariant::Canonicalized,
        )
    }

    /// Canonicalized spec for a default font with no paint
    pub fn make_default<P>(policy: &P) -> Self
    where
        P: AsPathsPolicy + ?Sized,
    {
        Self::canonicalized(&Font::default(), None, policy)
    }

    /// Unhinted outlines at units-per-em, plus that size
    pub fn pdf_vector(typeface: &Arc<dyn Typeface>) -> (Self, i32) {
        let (normalized, size) = variant::pdf_vector(typeface);
        (
            Self::from_normalized(normalized, StrikeVariant::PdfVector),
            size,
        )
    }

    /// Distance-field strike, plus the band of device scales it serves
    #[cfg(feature = "gpu")]
    pub fn distance_field<P>(
        font: &Font,
        paint: &Paint,
        surface_props: &SurfaceProps,
        device_matrix: &Affine,
        options: &DistanceFieldOptions,
        policy: &P,
    ) -> Result<(Self, ScaleRange)>
    where
        P: DistanceFieldPolicy + ?Sized,
    {
        let (normalized, (min, max)) = variant::distance_field(
            font,
            paint,
            surface_props,
            device_matrix,
            options,
            policy,
        );
        let range = ScaleRange::new(min, max)?;
        Ok((
            Self::from_normalized(normalized, StrikeVariant::DistanceField),
            range,
        ))
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn typeface(&self) -> &Arc<dyn Typeface> {
        &self.typeface
    }

    /// Multiply strike-space glyph geometry by this to get source space
    pub fn strike_to_source_ratio(&self) -> f32 {
        self.strike_to_source_ratio
    }

    pub fn variant(&self) -> StrikeVariant {
        self.variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::NeverAsPaths;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn specs_are_shareable() {
        assert_send_sync::<StrikeSpec>();
    }

    #[test]
    fn mask_ratio_is_one() {
        let spec = StrikeSpec::mask(
            &Font::default(),
            &Paint::default(),
            &SurfaceProps::default(),
            ScalerContextFlags::None,
            &Affine::scale(3.0),
        );
        assert_eq!(spec.strike_to_source_ratio(), 1.0);
        assert_eq!(spec.variant(), StrikeVariant::Mask);
        assert_eq!(spec.typeface().unique_id(), 0);
    }

    #[test]
    fn default_matches_canonicalized_default_font() {
        let a = StrikeSpec::make_default(&NeverAsPaths);
        let b = StrikeSpec::canonicalized(&Font::default(), None, &NeverAsPaths);
        assert_eq!(a.descriptor(), b.descriptor());
        assert_eq!(a.strike_to_source_ratio(), b.strike_to_source_ratio());
    }
}
