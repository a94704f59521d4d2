//! The shared canonicalization core behind every strike variant

use std::sync::Arc;

use kurbo::Affine;

use crate::descriptor::{Descriptor, EntryTag, PayloadWriter};
use crate::effects::Effects;
use crate::font::Font;
use crate::paint::Paint;
use crate::scaler::{ScalerContextFlags, ScalerRec};
use crate::surface::SurfaceProps;
use crate::typeface::Typeface;

/// What canonicalization hands back: the key plus what must travel with it
#[derive(Debug, Clone)]
pub struct Canonical {
    pub descriptor: Descriptor,
    pub effects: Effects,
    pub typeface: Arc<dyn Typeface>,
}

/// Turn an already-normalized request into a descriptor
///
/// Deterministic: identical inputs give byte-identical descriptors. Only
/// identities and parameters are encoded, never addresses.
pub fn canonicalize(
    font: &Font,
    paint: &Paint,
    surface_props: &SurfaceProps,
    scaler_flags: ScalerContextFlags,
    device_matrix: &Affine,
) -> Canonical {
    let typeface = font.ref_typeface_or_default();
    let effects = Effects::from_paint(paint);
    let rec = ScalerRec::new(font, paint, surface_props, scaler_flags, device_matrix);

    let mut builder = Descriptor::builder()
        .entry(EntryTag::ScalerRec, rec.to_payload())
        .entry(EntryTag::Typeface, typeface_payload(typeface.as_ref()));

    if let Some(effect) = &effects.path_effect {
        let mut params = Vec::new();
        effect.flatten(&mut params);
        builder = builder.entry(
            EntryTag::PathEffect,
            effect_payload(effect.type_name(), &params),
        );
    }

    if let Some(filter) = &effects.mask_filter {
        let mut params = Vec::new();
        filter.flatten(&mut params);
        builder = builder.entry(
            EntryTag::MaskFilter,
            effect_payload(filter.type_name(), &params),
        );
    }

    Canonical {
        descriptor: builder.build(),
        effects,
        typeface,
    }
}

fn typeface_payload(typeface: &dyn Typeface) -> Vec<u8> {
    let coords = typeface.variation_coords();
    let mut w = PayloadWriter::new();
    w.u64(typeface.unique_id()).u32(coords.len() as u32);
    for coord in coords {
        w.f32(*coord);
    }
    w.finish()
}

fn effect_payload(type_name: &str, params: &[u8]) -> Vec<u8> {
    let mut w = PayloadWriter::new();
    w.bytes(type_name.as_bytes()).bytes(params);
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{MaskFilter, PathEffect};

    #[derive(Debug)]
    struct Dash(f32, f32);

    impl PathEffect for Dash {
        fn type_name(&self) -> &'static str {
            "dash"
        }

        fn flatten(&self, out: &mut Vec<u8>) {
            out.extend_from_slice(&self.0.to_le_bytes());
            out.extend_from_slice(&self.1.to_le_bytes());
        }
    }

    #[derive(Debug)]
    struct Blur(f32);

    impl MaskFilter for Blur {
        fn type_name(&self) -> &'static str {
            "blur"
        }

        fn flatten(&self, out: &mut Vec<u8>) {
            out.extend_from_slice(&self.0.to_le_bytes());
        }
    }

    fn run(paint: &Paint) -> Canonical {
        canonicalize(
            &Font::default(),
            paint,
            &SurfaceProps::default(),
            ScalerContextFlags::FakeGammaAndBoostContrast,
            &Affine::IDENTITY,
        )
    }

    #[test]
    fn effects_are_keyed_by_parameters_not_identity() {
        let a = run(&Paint::default().with_path_effect(Arc::new(Dash(4.0, 2.0))));
        let b = run(&Paint::default().with_path_effect(Arc::new(Dash(4.0, 2.0))));
        let c = run(&Paint::default().with_path_effect(Arc::new(Dash(4.0, 3.0))));

        assert_eq!(a.descriptor, b.descriptor);
        assert_ne!(a.descriptor, c.descriptor);
        assert!(a.descriptor.entry(EntryTag::PathEffect).is_some());
        assert!(a.effects.path_effect.is_some());
    }

    #[test]
    fn mask_filter_gets_its_own_entry() {
        let plain = run(&Paint::default());
        let blurred = run(&Paint::default().with_mask_filter(Arc::new(Blur(1.5))));

        assert_ne!(plain.descriptor, blurred.descriptor);
        assert_eq!(plain.descriptor.entry_count(), 2);
        assert_eq!(blurred.descriptor.entry_count(), 3);
        assert!(blurred.descriptor.entry(EntryTag::MaskFilter).is_some());
    }

    #[test]
    fn missing_typeface_resolves_to_default() {
        let canonical = run(&Paint::default());
        assert_eq!(canonical.typeface.unique_id(), 0);
    }
}
