// font-collection/src/rendering.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Glyph runs and the modes they are measured and rendered in.

use pathfinder_geometry::transform2d::Transform2F;

use crate::font_face::FontFace;

/// How glyphs are rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderingMode {
    /// Chosen from the em size and measuring mode. Not accepted for analysis.
    Default,
    Aliased,
    GdiClassic,
    GdiNatural,
    Natural,
    NaturalSymmetric,
    /// Vector output. Not accepted for analysis.
    Outline,
    NaturalSymmetricDownsampled,
}

impl RenderingMode {
    /// Unhinted modes.
    pub fn is_natural(self) -> bool {
        match self {
            RenderingMode::Natural
            | RenderingMode::NaturalSymmetric
            | RenderingMode::NaturalSymmetricDownsampled => true,
            _ => false,
        }
    }
}

/// How advances are measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasuringMode {
    Natural,
    GdiClassic,
    GdiNatural,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridFitMode {
    Default,
    Disabled,
    Enabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAntialiasMode {
    ClearType,
    Grayscale,
}

/// The layout of an alpha texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureType {
    /// One byte per pixel.
    Aliased1x1,
    /// Three bytes per pixel, one per subpixel.
    ClearType3x1,
}

impl TextureType {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureType::Aliased1x1 => 1,
            TextureType::ClearType3x1 => 3,
        }
    }
}

/// A 2D affine transform: `x' = x*m11 + y*m21 + dx`, `y' = x*m12 + y*m22 + dy`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for Matrix {
    #[inline]
    fn default() -> Matrix {
        Matrix::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    #[inline]
    pub fn scale(x: f32, y: f32) -> Matrix {
        Matrix {
            m11: x,
            m22: y,
            ..Matrix::IDENTITY
        }
    }

    #[inline]
    pub fn translation(dx: f32, dy: f32) -> Matrix {
        Matrix {
            dx,
            dy,
            ..Matrix::IDENTITY
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Matrix::IDENTITY
    }

    #[inline]
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.m11 + y * self.m21 + self.dx,
            x * self.m12 + y * self.m22 + self.dy,
        )
    }

    /// The transform that applies `self` and then `next`.
    pub fn then(&self, next: &Matrix) -> Matrix {
        Matrix {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    pub fn to_transform(&self) -> Transform2F {
        Transform2F::row_major(self.m11, self.m21, self.m12, self.m22, self.dx, self.dy)
    }
}

/// Per-glyph displacement from the pen position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphOffset {
    /// Along the advance direction.
    pub advance_offset: f32,
    /// Perpendicular to it, positive towards the ascender.
    pub ascender_offset: f32,
}

/// A sequence of glyphs of one face at one size.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    pub face: FontFace,
    pub em_size: f32,
    pub glyph_indices: Vec<u16>,
    /// Per-glyph advances; the face's design advances are used when absent.
    pub glyph_advances: Option<Vec<f32>>,
    pub glyph_offsets: Option<Vec<GlyphOffset>>,
    pub is_sideways: bool,
    /// Odd levels are right-to-left.
    pub bidi_level: u32,
}

impl GlyphRun {
    pub fn new(face: FontFace, em_size: f32, glyph_indices: Vec<u16>) -> GlyphRun {
        GlyphRun {
            face,
            em_size,
            glyph_indices,
            glyph_advances: None,
            glyph_offsets: None,
            is_sideways: false,
            bidi_level: 0,
        }
    }

    #[inline]
    pub fn is_rtl(&self) -> bool {
        self.bidi_level & 1 != 0
    }

    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyph_indices.len()
    }
}

/// Rendering parameters that alpha blending is tuned with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderingParams {
    pub gamma: f32,
    pub enhanced_contrast: f32,
    pub cleartype_level: f32,
    /// Font smoothing contrast used by the GDI modes, 1000 to 2200.
    pub gdi_smoothing_contrast: u32,
}

impl Default for RenderingParams {
    fn default() -> RenderingParams {
        RenderingParams {
            gamma: 1.8,
            enhanced_contrast: 0.5,
            cleartype_level: 1.0,
            gdi_smoothing_contrast: 1400,
        }
    }
}

/// Gamma, enhanced contrast, and ClearType level to blend an alpha texture with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlphaBlendParams {
    pub gamma: f32,
    pub enhanced_contrast: f32,
    pub cleartype_level: f32,
}
