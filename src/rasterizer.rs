// font-collection/src/rasterizer.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Glyph rasterization: pixel bounds and coverage bitmaps for single glyphs.

use pathfinder_geometry::rect::{RectF, RectI};
use pathfinder_geometry::vector::Vector2F;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::FontLoadingError;
use crate::font_face::FontFace;
use crate::rendering::Matrix;
use crate::simulation::Simulations;

/// Horizontal shear of the oblique simulation, per unit of height.
pub const OBLIQUE_SKEW: f32 = 0.3333;

/// How a glyph is placed on the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    pub em_size: f32,
    /// Applied after scaling to the em size; `None` means identity.
    pub transform: Option<Matrix>,
    /// Bilevel output instead of 8-bit coverage.
    pub aliased: bool,
}

/// Coverage of one glyph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphBitmap {
    /// Pixel bounds relative to the glyph origin, y down.
    pub bounds: RectI,
    /// Bytes between successive rows.
    pub pitch: usize,
    /// One bit per pixel, most significant bit first. Otherwise one byte per pixel.
    pub is_1bpp: bool,
    pub pixels: Vec<u8>,
}

/// Row pitch of a glyph bitmap `width` pixels wide.
pub fn glyph_bitmap_pitch(aliased: bool, width: i32) -> usize {
    let width = width.max(0) as usize;
    if aliased {
        ((width + 31) >> 5) << 2
    } else {
        (width + 3) / 4 * 4
    }
}

/// Turns glyph outlines into pixels.
pub trait Rasterizer: Send + Sync {
    /// Returns the pixel boundaries that the glyph will take up. Empty for blank glyphs.
    fn glyph_bounds(
        &self,
        face: &FontFace,
        glyph: u16,
        options: &RasterOptions,
    ) -> Result<RectI, FontLoadingError>;

    /// Rasterizes a glyph into a bitmap covering [`Rasterizer::glyph_bounds`].
    fn rasterize_glyph(
        &self,
        face: &FontFace,
        glyph: u16,
        options: &RasterOptions,
    ) -> Result<GlyphBitmap, FontLoadingError>;
}

/// Fills `ttf-parser` outlines with `tiny-skia`.
///
/// Oblique simulation shears by [`OBLIQUE_SKEW`]; bold simulation strokes the outline with a
/// pen of 1/50 em.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutlineRasterizer;

impl OutlineRasterizer {
    /// Design units to pixels, y down.
    fn glyph_transform(face: &FontFace, options: &RasterOptions) -> Result<Matrix, FontLoadingError> {
        let units_per_em = face.metrics().design_units_per_em;
        if units_per_em == 0 {
            return Err(FontLoadingError::Parse);
        }
        let scale = options.em_size / units_per_em as f32;

        let mut transform = Matrix::IDENTITY;
        if face.simulations().contains(Simulations::OBLIQUE) {
            transform.m21 = OBLIQUE_SKEW;
        }
        transform = transform.then(&Matrix::scale(scale, -scale));
        if let Some(ref user) = options.transform {
            transform = transform.then(user);
        }
        Ok(transform)
    }

    fn bold_stroke_width(face: &FontFace) -> Option<f32> {
        if face.simulations().contains(Simulations::BOLD) {
            Some(face.metrics().design_units_per_em as f32 / 50.0)
        } else {
            None
        }
    }

    fn parse(face: &FontFace) -> Result<Face, FontLoadingError> {
        Face::parse(face.stream().bytes(), face.index()).map_err(|_| FontLoadingError::Parse)
    }

    fn design_bounds(face: &FontFace, parsed: &Face, glyph: u16) -> Option<RectF> {
        let bbox = parsed.glyph_bounding_box(GlyphId(glyph))?;
        let outset = OutlineRasterizer::bold_stroke_width(face).unwrap_or(0.0) * 0.5;
        Some(RectF::from_points(
            Vector2F::new(bbox.x_min as f32 - outset, bbox.y_min as f32 - outset),
            Vector2F::new(bbox.x_max as f32 + outset, bbox.y_max as f32 + outset),
        ))
    }
}

impl Rasterizer for OutlineRasterizer {
    fn glyph_bounds(
        &self,
        face: &FontFace,
        glyph: u16,
        options: &RasterOptions,
    ) -> Result<RectI, FontLoadingError> {
        let parsed = OutlineRasterizer::parse(face)?;
        let transform = OutlineRasterizer::glyph_transform(face, options)?;
        Ok(match OutlineRasterizer::design_bounds(face, &parsed, glyph) {
            Some(bounds) => (transform.to_transform() * bounds).round_out().to_i32(),
            None => RectI::default(),
        })
    }

    fn rasterize_glyph(
        &self,
        face: &FontFace,
        glyph: u16,
        options: &RasterOptions,
    ) -> Result<GlyphBitmap, FontLoadingError> {
        let bounds = self.glyph_bounds(face, glyph, options)?;
        let (width, height) = (bounds.width(), bounds.height());
        let pitch = glyph_bitmap_pitch(options.aliased, width);
        let mut bitmap = GlyphBitmap {
            bounds,
            pitch,
            is_1bpp: options.aliased,
            pixels: vec![0; pitch * height.max(0) as usize],
        };
        if width <= 0 || height <= 0 {
            return Ok(bitmap);
        }

        let parsed = OutlineRasterizer::parse(face)?;
        let mut sink = PathSink {
            builder: tiny_skia::PathBuilder::new(),
        };
        if parsed.outline_glyph(GlyphId(glyph), &mut sink).is_none() {
            return Ok(bitmap);
        }
        let path = match sink.builder.finish() {
            Some(path) => path,
            None => return Ok(bitmap),
        };

        let mut pixmap =
            tiny_skia::Pixmap::new(width as u32, height as u32).ok_or(FontLoadingError::Parse)?;
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = !options.aliased;

        let matrix = OutlineRasterizer::glyph_transform(face, options)?;
        let transform = tiny_skia::Transform::from_row(
            matrix.m11,
            matrix.m12,
            matrix.m21,
            matrix.m22,
            matrix.dx - bounds.min_x() as f32,
            matrix.dy - bounds.min_y() as f32,
        );
        pixmap.fill_path(&path, &paint, tiny_skia::FillRule::Winding, transform, None);
        if let Some(width) = OutlineRasterizer::bold_stroke_width(face) {
            let stroke = tiny_skia::Stroke {
                width,
                ..tiny_skia::Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }

        let row_width = width as usize;
        for (y, row) in pixmap.pixels().chunks(row_width).enumerate() {
            let dest = &mut bitmap.pixels[y * pitch..(y + 1) * pitch];
            for (x, pixel) in row.iter().enumerate() {
                let alpha = pixel.alpha();
                if options.aliased {
                    if alpha >= 0x80 {
                        dest[x / 8] |= 0x80 >> (x % 8);
                    }
                } else {
                    dest[x] = alpha;
                }
            }
        }
        Ok(bitmap)
    }
}

struct PathSink {
    builder: tiny_skia::PathBuilder,
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bitmap_pitch() {
        assert_eq!(glyph_bitmap_pitch(true, 1), 4);
        assert_eq!(glyph_bitmap_pitch(true, 33), 8);
        assert_eq!(glyph_bitmap_pitch(false, 5), 8);
        assert_eq!(glyph_bitmap_pitch(false, 8), 8);
        assert_eq!(glyph_bitmap_pitch(false, 0), 0);
    }
}
