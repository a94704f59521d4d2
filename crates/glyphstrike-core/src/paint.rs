//! Paint: color, stroke and the effects that reach the rasterizer

use std::fmt;
use std::sync::Arc;

/// Simple RGBA color that works everywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::rgba(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::rgba(255, 255, 255, 255)
    }

    pub const fn gray() -> Self {
        Self::rgba(0x7f, 0x7f, 0x7f, 255)
    }
}

/// Fill, stroke, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    Fill,
    Stroke,
    StrokeAndFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Join {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Alters glyph coverage after rasterization (blur, emboss, ...)
///
/// Strikes only need to know what kind of filter this is and with which
/// parameters; running it is someone else's job.
pub trait MaskFilter: fmt::Debug + Send + Sync {
    /// Stable name identifying the filter kind
    fn type_name(&self) -> &'static str;

    /// Append every parameter that changes the filter's output
    fn flatten(&self, out: &mut Vec<u8>);
}

/// Alters glyph outlines before rasterization (dashing, corner rounding, ...)
pub trait PathEffect: fmt::Debug + Send + Sync {
    /// Stable name identifying the effect kind
    fn type_name(&self) -> &'static str;

    /// Append every parameter that changes the effect's output
    fn flatten(&self, out: &mut Vec<u8>);
}

/// Anything painting glyph interiors with more than a flat color
pub trait Shader: fmt::Debug + Send + Sync {
    /// A single color standing in for this shader when picking gamma tables
    fn luminance_color(&self) -> Option<Color> {
        None
    }
}

/// How glyphs get colored, stroked and post-processed
#[derive(Debug, Clone)]
pub struct Paint {
    color: Color,
    style: Style,
    stroke_width: f32,
    miter_limit: f32,
    join: Join,
    cap: Cap,
    mask_filter: Option<Arc<dyn MaskFilter>>,
    path_effect: Option<Arc<dyn PathEffect>>,
    shader: Option<Arc<dyn Shader>>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::black(),
            style: Style::Fill,
            stroke_width: 0.0,
            miter_limit: 4.0,
            join: Join::Miter,
            cap: Cap::Butt,
            mask_filter: None,
            path_effect: None,
            shader: None,
        }
    }
}

impl Paint {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width.max(0.0);
        self
    }

    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit.max(0.0);
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_mask_filter(mut self, filter: Arc<dyn MaskFilter>) -> Self {
        self.mask_filter = Some(filter);
        self
    }

    pub fn with_path_effect(mut self, effect: Arc<dyn PathEffect>) -> Self {
        self.path_effect = Some(effect);
        self
    }

    pub fn with_shader(mut self, shader: Arc<dyn Shader>) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_path_effect(&mut self, effect: Option<Arc<dyn PathEffect>>) {
        self.path_effect = effect;
    }

    /// Back to a plain black fill with no effects
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }

    pub fn join(&self) -> Join {
        self.join
    }

    pub fn cap(&self) -> Cap {
        self.cap
    }

    pub fn mask_filter(&self) -> Option<&Arc<dyn MaskFilter>> {
        self.mask_filter.as_ref()
    }

    pub fn path_effect(&self) -> Option<&Arc<dyn PathEffect>> {
        self.path_effect.as_ref()
    }

    pub fn shader(&self) -> Option<&Arc<dyn Shader>> {
        self.shader.as_ref()
    }

    /// The color that decides which gamma/contrast tables a glyph uses
    ///
    /// Alpha never matters here. Shaders without a representative color
    /// fall back to neutral gray.
    pub fn luminance_color(&self) -> Color {
        let color = match &self.shader {
            Some(shader) => shader.luminance_color().unwrap_or_else(Color::gray),
            None => self.color,
        };
        Color::rgba(color.r, color.g, color.b, 255)
    }
}
