//! Effects that travel next to a descriptor, not inside it

use std::sync::Arc;

use crate::paint::{MaskFilter, Paint, PathEffect};

/// Mask filter and path effect pulled off a paint
///
/// The descriptor only records their kind and parameters. The strike still
/// needs the live objects to run them, so they ride along as shared
/// references.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub mask_filter: Option<Arc<dyn MaskFilter>>,
    pub path_effect: Option<Arc<dyn PathEffect>>,
}

impl Effects {
    /// Share the paint's effects; absent ones stay absent
    pub fn from_paint(paint: &Paint) -> Self {
        Self {
            mask_filter: paint.mask_filter().cloned(),
            path_effect: paint.path_effect().cloned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mask_filter.is_none() && self.path_effect.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn plain_paint_has_no_effects() {
        assert!(Effects::from_paint(&Paint::default()).is_empty());
    }

    #[test]
    fn effects_share_the_paint_objects() {
        let blur: Arc<dyn MaskFilter> = Arc::new(Blur(2.0));
        let paint = Paint::default().with_mask_filter(blur.clone());

        let effects = Effects::from_paint(&paint);

        let extracted = effects.mask_filter.as_ref().map(Arc::as_ptr);
        assert_eq!(extracted, Some(Arc::as_ptr(&blur)));
        assert!(effects.path_effect.is_none());
        assert_eq!(Arc::strong_count(&blur), 3);
    }
}
