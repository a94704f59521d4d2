//! The scaler record: every number a rasterizer needs, nothing else

use kurbo::Affine;

use crate::descriptor::{canonical_f32, PayloadWriter};
use crate::font::{Edging, Font, Hinting};
use crate::paint::{Cap, Color, Join, Paint, Style};
use crate::surface::SurfaceProps;

/// Contrast boost applied when [`ScalerContextFlags`] asks for it
pub const GAMMA_CONTRAST: f32 = 0.2;

/// Gamma exponent applied when [`ScalerContextFlags`] asks for fake gamma
pub const GAMMA_EXPONENT: f32 = 1.2;

/// Bits kept per luminance channel; nearby colors share gamma tables
pub const LUMINANCE_BITS: u32 = 3;

/// Which pre-blend corrections rasterization applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScalerContextFlags {
    /// Corrections happen later (e.g. in a shader)
    None,
    FakeGamma,
    BoostContrast,
    #[default]
    FakeGammaAndBoostContrast,
}

impl ScalerContextFlags {
    pub fn fake_gamma(self) -> bool {
        matches!(
            self,
            ScalerContextFlags::FakeGamma | ScalerContextFlags::FakeGammaAndBoostContrast
        )
    }

    pub fn boost_contrast(self) -> bool {
        matches!(
            self,
            ScalerContextFlags::BoostContrast | ScalerContextFlags::FakeGammaAndBoostContrast
        )
    }
}

/// Pixel format of rasterized glyph masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MaskFormat {
    /// One bit per pixel
    Bw = 0,
    /// Eight bit coverage
    A8 = 1,
    /// 565 per-channel coverage
    Lcd16 = 2,
}

/// Bit flags stored in [`ScalerRec::flags`]
pub mod rec_flags {
    pub const SUBPIXEL_POSITIONING: u16 = 1 << 0;
    pub const EMBOLDEN: u16 = 1 << 1;
    pub const LINEAR_METRICS: u16 = 1 << 2;
    pub const EMBEDDED_BITMAPS: u16 = 1 << 3;
    pub const FORCE_AUTO_HINTING: u16 = 1 << 4;
    pub const BASELINE_SNAP: u16 = 1 << 5;
    pub const LCD_VERTICAL: u16 = 1 << 6;
    pub const LCD_BGR: u16 = 1 << 7;
    pub const FRAME_AND_FILL: u16 = 1 << 8;
}

/// Canonical numeric view of one rendering configuration
///
/// Everything that can change a glyph's pixels is here, already reduced to
/// the fewest distinct values: device translation is dropped, fill paints
/// carry no stroke parameters, and colors survive only as quantized
/// luminance when the mask format can use it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalerRec {
    pub text_size: f32,
    pub pre_scale_x: f32,
    pub pre_skew_x: f32,
    /// Device 2x2 as `[xx, xy, yx, yy]`
    pub post_2x2: [f32; 4],
    pub frame_width: f32,
    pub miter_limit: f32,
    pub stroke_join: u8,
    pub stroke_cap: u8,
    pub mask_format: MaskFormat,
    pub hinting: Hinting,
    pub flags: u16,
    /// Quantized RGB, alpha always zero
    pub luminance: u32,
    pub contrast: f32,
    pub gamma: f32,
}

impl ScalerRec {
    pub fn new(
        font: &Font,
        paint: &Paint,
        surface_props: &SurfaceProps,
        scaler_flags: ScalerContextFlags,
        device_matrix: &Affine,
    ) -> Self {
        let [xx, yx, xy, yy, _, _] = device_matrix.as_coeffs();
        let geometry = surface_props.pixel_geometry;

        let mask_format = match font.edging() {
            Edging::Alias => MaskFormat::Bw,
            Edging::AntiAlias => MaskFormat::A8,
            Edging::SubpixelAntiAlias if geometry.is_known() => MaskFormat::Lcd16,
            Edging::SubpixelAntiAlias => MaskFormat::A8,
        };

        let mut flags = 0u16;
        let mut set = |on: bool, bit: u16| {
            if on {
                flags |= bit;
            }
        };
        set(font.is_subpixel(), rec_flags::SUBPIXEL_POSITIONING);
        set(font.is_embolden(), rec_flags::EMBOLDEN);
        set(
            font.is_linear_metrics() || surface_props.use_device_independent_fonts,
            rec_flags::LINEAR_METRICS,
        );
        set(font.is_embedded_bitmaps(), rec_flags::EMBEDDED_BITMAPS);
        set(font.is_force_auto_hinting(), rec_flags::FORCE_AUTO_HINTING);
        set(font.is_baseline_snap(), rec_flags::BASELINE_SNAP);
        if mask_format == MaskFormat::Lcd16 {
            set(geometry.is_vertical(), rec_flags::LCD_VERTICAL);
            set(geometry.is_bgr(), rec_flags::LCD_BGR);
        }

        let (frame_width, miter_limit, stroke_join, stroke_cap) = match paint.style() {
            Style::Fill => (0.0, 0.0, 0, 0),
            style => {
                set(style == Style::StrokeAndFill, rec_flags::FRAME_AND_FILL);
                let miter = if paint.join() == Join::Miter {
                    paint.miter_limit()
                } else {
                    0.0
                };
                (
                    paint.stroke_width(),
                    miter,
                    join_code(paint.join()),
                    cap_code(paint.cap()),
                )
            }
        };

        let corrects = scaler_flags.fake_gamma() || scaler_flags.boost_contrast();
        let (luminance, contrast, gamma) = match mask_format {
            // No blending to correct when every pixel is on or off
            MaskFormat::Bw => (0, 0.0, 1.0),
            // Identity tables: color can't change the result
            _ if !corrects => (0, 0.0, 1.0),
            format => (
                luminance_for(format, paint.luminance_color()),
                if scaler_flags.boost_contrast() {
                    GAMMA_CONTRAST
                } else {
                    0.0
                },
                if scaler_flags.fake_gamma() {
                    GAMMA_EXPONENT
                } else {
                    1.0
                },
            ),
        };

        Self {
            text_size: canonical_f32(font.size()),
            pre_scale_x: canonical_f32(font.scale_x()),
            pre_skew_x: canonical_f32(font.skew_x()),
            post_2x2: [xx, xy, yx, yy].map(|v| canonical_f32(v as f32)),
            frame_width: canonical_f32(frame_width),
            miter_limit: canonical_f32(miter_limit),
            stroke_join,
            stroke_cap,
            mask_format,
            hinting: font.hinting(),
            flags,
            luminance,
            contrast,
            gamma,
        }
    }

    pub fn has_flag(&self, bit: u16) -> bool {
        self.flags & bit != 0
    }

    /// Fixed-layout little-endian encoding
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.f32(self.text_size)
            .f32(self.pre_scale_x)
            .f32(self.pre_skew_x);
        for v in self.post_2x2 {
            w.f32(v);
        }
        w.f32(self.frame_width)
            .f32(self.miter_limit)
            .u8(self.stroke_join)
            .u8(self.stroke_cap)
            .u8(self.mask_format as u8)
            .u8(hinting_code(self.hinting))
            .u16(self.flags)
            .u32(self.luminance)
            .f32(self.contrast)
            .f32(self.gamma);
        w.finish()
    }
}

fn luminance_for(format: MaskFormat, color: Color) -> u32 {
    let max = (1u32 << LUMINANCE_BITS) - 1;
    // Spread the kept bits back over 0..=255 so white stays 0xff
    let quantize = |c: u8| (u32::from(c) >> (8 - LUMINANCE_BITS)) * 255 / max;
    let (r, g, b) = match format {
        MaskFormat::Lcd16 => (quantize(color.r), quantize(color.g), quantize(color.b)),
        _ => {
            let lum = quantize(compute_luminance(color));
            (lum, lum, lum)
        }
    };
    (r << 16) | (g << 8) | b
}

/// Rec. 709 luma of an sRGB color
fn compute_luminance(color: Color) -> u8 {
    let l = 0.2126 * f32::from(color.r) + 0.7152 * f32::from(color.g) + 0.0722 * f32::from(color.b);
    l.round().clamp(0.0, 255.0) as u8
}

fn hinting_code(hinting: Hinting) -> u8 {
    match hinting {
        Hinting::None => 0,
        Hinting::Slight => 1,
        Hinting::Normal => 2,
        Hinting::Full => 3,
    }
}

fn join_code(join: Join) -> u8 {
    match join {
        Join::Miter => 0,
        Join::Round => 1,
        Join::Bevel => 2,
    }
}

fn cap_code(cap: Cap) -> u8 {
    match cap {
        Cap::Butt => 0,
        Cap::Round => 1,
        Cap::Square => 2,
    }
}
