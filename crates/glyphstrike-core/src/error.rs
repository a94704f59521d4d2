//! Error types for glyphstrike

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StrikeError>;

/// Main error type for strike canonicalization
///
/// Canonicalization resolves almost every degenerate input by substitution,
/// so this stays small. Cache failures never pass through here: resolvers
/// hand back the cache's own error type untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrikeError {
    #[error("Strike size must be positive and finite, got {0}")]
    NonPositiveStrikeSize(f32),

    #[error("Distance-field scale range is unusable: min={min}, max={max}")]
    UnusableScaleRange { min: f32, max: f32 },

    #[error("Invalid font data: {0}")]
    InvalidFontData(String),
}
