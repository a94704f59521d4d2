//! Glyphstrike Core: from a text request to a strike key
//!
//! A strike is a cache of glyph images or outlines for one exact way of
//! drawing text. This crate turns a drawing request into the key that
//! names that strike, and hands the key to whatever cache holds it.
//!
//! ## The Journey
//!
//! 1. **Normalization** - A strike variant rewrites font, paint and matrix
//!    into the inputs that actually matter for it
//! 2. **Canonicalization** - Those inputs become a byte-exact [`Descriptor`]
//!    plus the [`Effects`] that travel beside it
//! 3. **Resolution** - The resulting [`StrikeSpec`] asks a cache for a
//!    strike, exclusively, scoped, or GPU-side
//!
//! ## Build a Key
//!
//! ```rust
//! use glyphstrike_core::{Font, Paint, ScalerContextFlags, StrikeSpec, SurfaceProps};
//! use kurbo::Affine;
//!
//! let font = Font::default().with_size(18.0);
//! let spec = StrikeSpec::mask(
//!     &font,
//!     &Paint::default(),
//!     &SurfaceProps::legacy_font_host(),
//!     ScalerContextFlags::FakeGammaAndBoostContrast,
//!     &Affine::scale(2.0),
//! );
//!
//! assert_eq!(spec.strike_to_source_ratio(), 1.0);
//!
//! // Outline strikes always live at the canonical size
//! let path = StrikeSpec::path(
//!     &font,
//!     &Paint::default(),
//!     &SurfaceProps::legacy_font_host(),
//!     ScalerContextFlags::None,
//! );
//! assert_eq!(path.strike_to_source_ratio(), 18.0 / 64.0);
//! ```
//!
//! Nothing here locks or keeps global state beyond the shared default
//! typeface. Caches live in `glyphstrike-cache`.

pub mod canonical;
pub mod descriptor;
#[cfg(feature = "gpu")]
pub mod distance_field;
pub mod effects;
pub mod error;
pub mod font;
pub mod paint;
pub mod policy;
pub mod ratio;
pub mod resolve;
pub mod scaler;
pub mod strike_spec;
pub mod surface;
pub mod typeface;
pub mod variant;

pub use canonical::{canonicalize, Canonical};
pub use descriptor::{Descriptor, DescriptorBuilder, EntryTag};
#[cfg(feature = "gpu")]
pub use distance_field::{
    BucketedDistanceField, DistanceFieldOptions, DistanceFieldPolicy, ScaleRange,
};
pub use effects::Effects;
pub use error::{Result, StrikeError};
pub use font::{Edging, Font, Hinting, CANONICAL_TEXT_SIZE_FOR_PATHS};
pub use paint::{Cap, Color, Join, MaskFilter, Paint, PathEffect, Shader, Style};
pub use policy::{AlwaysAsPaths, AsPathsPolicy, NeverAsPaths};
pub use ratio::{SourceFallback, MAX_ATLAS_DIMENSION};
#[cfg(feature = "gpu")]
pub use resolve::GpuStrikeCache;
pub use resolve::{ExclusiveStrikeCache, ScopedStrikeCache};
pub use scaler::{MaskFormat, ScalerContextFlags};
pub use strike_spec::StrikeSpec;
pub use surface::{PixelGeometry, SurfaceProps};
pub use typeface::{default_typeface, FontDataTypeface, Typeface};
pub use variant::StrikeVariant;
