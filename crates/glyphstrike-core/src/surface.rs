//! Properties of the surface glyphs end up on

/// Physical layout of a pixel's color elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelGeometry {
    #[default]
    Unknown,
    RgbH,
    BgrH,
    RgbV,
    BgrV,
}

impl PixelGeometry {
    /// Whether per-channel (LCD) coverage is meaningful
    pub fn is_known(self) -> bool {
        self != PixelGeometry::Unknown
    }

    pub fn is_bgr(self) -> bool {
        matches!(self, PixelGeometry::BgrH | PixelGeometry::BgrV)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, PixelGeometry::RgbV | PixelGeometry::BgrV)
    }
}

/// Surface-level switches that change glyph rasterization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceProps {
    pub pixel_geometry: PixelGeometry,
    /// Ask for metrics that don't depend on the device (no hinted advances)
    pub use_device_independent_fonts: bool,
}

impl SurfaceProps {
    pub const fn new(pixel_geometry: PixelGeometry, use_device_independent_fonts: bool) -> Self {
        Self {
            pixel_geometry,
            use_device_independent_fonts,
        }
    }

    /// What surfaces looked like before surface properties existed
    pub const fn legacy_font_host() -> Self {
        Self::new(PixelGeometry::RgbH, false)
    }

    /// No flags and no idea about subpixel layout
    pub const fn unknown_geometry() -> Self {
        Self::new(PixelGeometry::Unknown, false)
    }
}
