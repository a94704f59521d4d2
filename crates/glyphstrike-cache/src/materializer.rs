//! Building a strike the first time its descriptor is seen

use std::sync::Arc;

use glyphstrike_core::{Descriptor, Effects, Typeface};

/// Creates strikes on cache misses
///
/// Called at most once per descriptor while that descriptor stays cached.
/// A failure leaves nothing behind, so the next lookup tries again.
pub trait StrikeMaterializer: Send + Sync {
    type Strike;
    type Error;

    fn materialize(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<Self::Strike, Self::Error>;
}

impl<F, S, E> StrikeMaterializer for F
where
    F: Fn(&Descriptor, &Effects, &Arc<dyn Typeface>) -> Result<S, E> + Send + Sync,
{
    type Strike = S;
    type Error = E;

    fn materialize(
        &self,
        descriptor: &Descriptor,
        effects: &Effects,
        typeface: &Arc<dyn Typeface>,
    ) -> Result<S, E> {
        self(descriptor, effects, typeface)
    }
}
