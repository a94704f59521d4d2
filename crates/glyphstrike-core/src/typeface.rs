//! Typeface identity as seen by strike descriptors
//!
//! A strike only needs two things from a typeface: a stable identity to put
//! into the descriptor, and the design grid size (`units_per_em`) for vector
//! export. Everything else about font files lives outside this crate.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use read_fonts::{FontRef as ReadFontRef, TableProvider};

use crate::error::{Result, StrikeError};

/// Your window into a typeface's identity
///
/// ```ignore
/// #[derive(Debug)]
/// struct MyFace;
///
/// impl Typeface for MyFace {
///     fn unique_id(&self) -> u64 {
///         7
///     }
///
///     fn units_per_em(&self) -> i32 {
///         2048
///     }
/// }
/// ```
pub trait Typeface: fmt::Debug + Send + Sync {
    /// Stable identifier, equal for typefaces that rasterize identically
    fn unique_id(&self) -> u64;

    /// Size of the design grid. Zero or negative means "unknown".
    fn units_per_em(&self) -> i32;

    /// Normalized variation coordinates applied to this instance
    ///
    /// Part of the descriptor's typeface entry, so two instances of one
    /// variable font never share a strike.
    fn variation_coords(&self) -> &[f32] {
        &[]
    }
}

/// Placeholder typeface used whenever a font carries none
///
/// Identity 0, unknown grid size, no variations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyTypeface;

impl Typeface for EmptyTypeface {
    fn unique_id(&self) -> u64 {
        0
    }

    fn units_per_em(&self) -> i32 {
        0
    }
}

static DEFAULT_TYPEFACE: OnceLock<Arc<dyn Typeface>> = OnceLock::new();

/// The shared library default typeface
///
/// Always the same `Arc`, so default-typeface strikes from different call
/// sites compare equal.
pub fn default_typeface() -> Arc<dyn Typeface> {
    DEFAULT_TYPEFACE
        .get_or_init(|| Arc::new(EmptyTypeface))
        .clone()
}

/// A typeface backed by raw font bytes
///
/// Identity is a hash over the font bytes, face index and variation
/// coordinates. `units_per_em` comes from the `head` table; a missing or
/// unreadable `head` reports 0 and is left for callers to default.
#[derive(Clone)]
pub struct FontDataTypeface {
    data: Arc<Vec<u8>>,
    face_index: u32,
    unique_id: u64,
    units_per_em: i32,
    coords: Vec<f32>,
}

impl FontDataTypeface {
    /// Turns raw font bytes into a typeface (face 0)
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font_ref = ReadFontRef::from_index(&data, face_index)
            .map_err(|err| StrikeError::InvalidFontData(err.to_string()))?;

        let units_per_em = font_ref
            .head()
            .map(|head| i32::from(head.units_per_em()))
            .unwrap_or(0);

        let unique_id = identity_hash(&data, face_index, &[]);

        Ok(Self {
            data: Arc::new(data),
            face_index,
            unique_id,
            units_per_em,
            coords: Vec::new(),
        })
    }

    /// Same face with normalized variation coordinates applied
    pub fn with_variation_coords(&self, coords: &[f32]) -> Self {
        Self {
            data: self.data.clone(),
            face_index: self.face_index,
            unique_id: identity_hash(&self.data, self.face_index, coords),
            units_per_em: self.units_per_em,
            coords: coords.to_vec(),
        }
    }

    /// Raw font bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Face index for TTC collections (0 for single fonts)
    pub fn face_index(&self) -> u32 {
        self.face_index
    }
}

impl fmt::Debug for FontDataTypeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontDataTypeface")
            .field("bytes", &self.data.len())
            .field("face_index", &self.face_index)
            .field("unique_id", &self.unique_id)
            .field("units_per_em", &self.units_per_em)
            .field("coords", &self.coords)
            .finish()
    }
}

impl Typeface for FontDataTypeface {
    fn unique_id(&self) -> u64 {
        self.unique_id
    }

    fn units_per_em(&self) -> i32 {
        self.units_per_em
    }

    fn variation_coords(&self) -> &[f32] {
        &self.coords
    }
}

fn identity_hash(data: &[u8], face_index: u32, coords: &[f32]) -> u64 {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    face_index.hash(&mut hasher);
    for coord in coords {
        coord.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}
