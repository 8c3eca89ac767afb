// font-collection/src/analysis.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Glyph run analysis: positions the glyphs of a run and renders them into an alpha texture.

use pathfinder_geometry::rect::RectI;
use pathfinder_geometry::vector::{Vector2F, Vector2I};
use std::cmp;
use std::sync::OnceLock;

use crate::canvas::{Canvas, Format};
use crate::error::AnalysisError;
use crate::font_face::FontFace;
use crate::rasterizer::{glyph_bitmap_pitch, RasterOptions};
use crate::rendering::{
    AlphaBlendParams, GlyphRun, GridFitMode, Matrix, MeasuringMode, RenderingMode,
    RenderingParams, TextAntialiasMode, TextureType,
};

/// How a run is to be analyzed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphRunAnalysisOptions {
    /// Applied to glyph origins and outlines. `None` and the identity are equivalent.
    pub transform: Option<Matrix>,
    pub rendering_mode: RenderingMode,
    pub measuring_mode: MeasuringMode,
    pub grid_fit_mode: GridFitMode,
    pub antialias_mode: TextAntialiasMode,
    pub baseline_origin_x: f32,
    pub baseline_origin_y: f32,
    /// Scales the transform when not 1.0.
    pub pixels_per_dip: f32,
}

impl Default for GlyphRunAnalysisOptions {
    fn default() -> GlyphRunAnalysisOptions {
        GlyphRunAnalysisOptions {
            transform: None,
            rendering_mode: RenderingMode::Natural,
            measuring_mode: MeasuringMode::Natural,
            grid_fit_mode: GridFitMode::Default,
            antialias_mode: TextAntialiasMode::ClearType,
            baseline_origin_x: 0.0,
            baseline_origin_y: 0.0,
            pixels_per_dip: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RunBounds {
    bounds: RectI,
    max_glyph_bitmap_size: usize,
}

/// The positioned glyphs of a run and, once requested, their bounds and rendered bitmap.
#[derive(Debug)]
pub struct GlyphRunAnalysis {
    face: FontFace,
    em_size: f32,
    is_sideways: bool,
    glyphs: Vec<u16>,
    origins: Vec<Vector2F>,
    rendering_mode: RenderingMode,
    texture_type: TextureType,
    transform: Option<Matrix>,
    bounds: OnceLock<RunBounds>,
    bitmap: OnceLock<Canvas>,
}

impl GlyphRunAnalysis {
    pub fn new(
        run: &GlyphRun,
        options: &GlyphRunAnalysisOptions,
    ) -> Result<GlyphRunAnalysis, AnalysisError> {
        match options.rendering_mode {
            RenderingMode::Default => {
                return Err(AnalysisError::InvalidArgument("default rendering mode"))
            }
            RenderingMode::Outline => {
                return Err(AnalysisError::InvalidArgument("outline rendering mode"))
            }
            RenderingMode::NaturalSymmetricDownsampled => {
                return Err(AnalysisError::InvalidArgument("downsampled rendering mode"))
            }
            _ => {}
        }

        let texture_type = if options.rendering_mode == RenderingMode::Aliased
            || options.antialias_mode == TextAntialiasMode::Grayscale
        {
            TextureType::Aliased1x1
        } else {
            TextureType::ClearType3x1
        };

        let mut transform = options.transform.filter(|transform| !transform.is_identity());
        if options.pixels_per_dip != 1.0 {
            let scale = Matrix::scale(options.pixels_per_dip, options.pixels_per_dip);
            transform = Some(transform.unwrap_or(Matrix::IDENTITY).then(&scale));
        }

        let rtl_factor = if run.is_rtl() { -1.0 } else { 1.0 };
        let mut pen = Vector2F::new(options.baseline_origin_x, options.baseline_origin_y);
        let mut origins = Vec::with_capacity(run.glyph_count());
        for (index, &glyph) in run.glyph_indices.iter().enumerate() {
            let advance = rtl_factor
                * match run.glyph_advances {
                    Some(ref advances) => advances.get(index).cloned().unwrap_or(0.0),
                    None => run.face.scaled_design_advance(
                        options.measuring_mode,
                        run.em_size,
                        1.0,
                        options.transform.as_ref(),
                        glyph,
                        run.is_sideways,
                    )?,
                };

            let mut origin = pen;
            if run.is_rtl() {
                origin = if run.is_sideways {
                    origin + Vector2F::new(0.0, advance)
                } else {
                    origin + Vector2F::new(advance, 0.0)
                };
            }

            // Offsets apply before the transform.
            if let Some(offset) = run
                .glyph_offsets
                .as_ref()
                .and_then(|offsets| offsets.get(index))
            {
                let advance_offset = rtl_factor * offset.advance_offset;
                let ascender_offset = -offset.ascender_offset;
                origin = if run.is_sideways {
                    origin + Vector2F::new(ascender_offset, advance_offset)
                } else {
                    origin + Vector2F::new(advance_offset, ascender_offset)
                };
            }

            if let Some(ref transform) = transform {
                let (x, y) = transform.transform_point(origin.x(), origin.y());
                origin = Vector2F::new(x, y);
            }
            origins.push(origin);

            pen = if run.is_sideways {
                pen + Vector2F::new(0.0, advance)
            } else {
                pen + Vector2F::new(advance, 0.0)
            };
        }

        Ok(GlyphRunAnalysis {
            face: run.face.clone(),
            em_size: run.em_size,
            is_sideways: run.is_sideways,
            glyphs: run.glyph_indices.clone(),
            origins,
            rendering_mode: options.rendering_mode,
            texture_type,
            transform,
            bounds: OnceLock::new(),
            bitmap: OnceLock::new(),
        })
    }

    #[inline]
    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    /// Pen positions of the glyphs, transformed.
    #[inline]
    pub fn glyph_origins(&self) -> &[Vector2F] {
        &self.origins
    }

    fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            em_size: self.em_size,
            transform: self.transform,
            aliased: self.rendering_mode == RenderingMode::Aliased,
        }
    }

    fn run_bounds(&self) -> Result<RunBounds, AnalysisError> {
        if let Some(bounds) = self.bounds.get() {
            return Ok(*bounds);
        }
        if self.is_sideways {
            debug!("sideways runs are measured upright");
        }

        let options = self.raster_options();
        let rasterizer = self.face.rasterizer();
        let mut bounds = RectI::default();
        let mut max_glyph_bitmap_size = 0;
        for (&glyph, origin) in self.glyphs.iter().zip(&self.origins) {
            let bbox = rasterizer.glyph_bounds(&self.face, glyph, &options)?;
            let size = glyph_bitmap_pitch(options.aliased, bbox.width()) * cmp::max(bbox.height(), 0) as usize;
            max_glyph_bitmap_size = cmp::max(max_glyph_bitmap_size, size);
            bounds = union_rect(bounds, offset_rect(bbox, *origin));
        }

        Ok(*self.bounds.get_or_init(|| RunBounds {
            bounds,
            max_glyph_bitmap_size,
        }))
    }

    /// The largest glyph bitmap in bytes, at the rasterizer's row pitch.
    pub fn max_glyph_bitmap_size(&self) -> Result<usize, AnalysisError> {
        Ok(self.run_bounds()?.max_glyph_bitmap_size)
    }

    /// Pixel bounds of the rendered run. Empty when `texture_type` is not the analysis type.
    pub fn alpha_texture_bounds(&self, texture_type: TextureType) -> Result<RectI, AnalysisError> {
        if texture_type != self.texture_type {
            return Ok(RectI::default());
        }
        Ok(self.run_bounds()?.bounds)
    }

    fn render(&self, bounds: RectI) -> Result<&Canvas, AnalysisError> {
        if let Some(canvas) = self.bitmap.get() {
            return Ok(canvas);
        }

        let format = match self.texture_type {
            TextureType::Aliased1x1 => Format::A8,
            TextureType::ClearType3x1 => Format::Rgb24,
        };
        let mut canvas = Canvas::new(bounds.size(), format);
        let options = self.raster_options();
        let rasterizer = self.face.rasterizer();
        for (&glyph, origin) in self.glyphs.iter().zip(&self.origins) {
            let bbox = rasterizer.glyph_bounds(&self.face, glyph, &options)?;
            if is_empty_rect(bbox) {
                continue;
            }
            let bitmap = rasterizer.rasterize_glyph(&self.face, glyph, &options)?;
            let position = offset_rect(bbox, *origin).origin() - bounds.origin();
            if bitmap.is_1bpp {
                canvas.blit_from_bitmap_1bpp(&bitmap.pixels, bbox.size(), bitmap.pitch, position);
            } else {
                canvas.blit_from_a8(&bitmap.pixels, bbox.size(), bitmap.pitch, position);
            }
        }
        trace!(
            "rendered {} glyphs into a {}x{} run bitmap",
            self.glyphs.len(),
            bounds.width(),
            bounds.height()
        );
        Ok(self.bitmap.get_or_init(|| canvas))
    }

    /// Copies the part of the run bitmap inside `bounds` into `buffer`, which is laid out with
    /// `bounds.width()` pixels per row. Pixels outside the run are zero.
    pub fn create_alpha_texture(
        &self,
        texture_type: TextureType,
        bounds: RectI,
        buffer: &mut [u8],
    ) -> Result<(), AnalysisError> {
        let pixel_size = self.texture_type.bytes_per_pixel();
        let required = cmp::max(bounds.width(), 0) as usize
            * cmp::max(bounds.height(), 0) as usize
            * pixel_size;
        if buffer.len() < required {
            return Err(AnalysisError::NotSufficientBuffer {
                required,
                provided: buffer.len(),
            });
        }
        if texture_type != self.texture_type {
            return Err(AnalysisError::UnsupportedOperation);
        }

        for byte in buffer.iter_mut() {
            *byte = 0;
        }

        let run_bounds = self.run_bounds()?.bounds;
        let draw = match intersect_rect(run_bounds, bounds) {
            Some(draw) => draw,
            None => return Ok(()),
        };
        let canvas = self.render(run_bounds)?;

        let draw_width = draw.width() as usize * pixel_size;
        let dest_stride = bounds.width() as usize * pixel_size;
        for y in 0..draw.height() as usize {
            let src_start = (draw.min_y() - run_bounds.min_y()) as usize * canvas.stride
                + y * canvas.stride
                + (draw.min_x() - run_bounds.min_x()) as usize * pixel_size;
            let dest_start = (draw.min_y() - bounds.min_y()) as usize * dest_stride
                + y * dest_stride
                + (draw.min_x() - bounds.min_x()) as usize * pixel_size;
            buffer[dest_start..dest_start + draw_width]
                .copy_from_slice(&canvas.pixels[src_start..src_start + draw_width]);
        }
        Ok(())
    }

    /// Blending parameters for compositing the texture with `params`.
    pub fn alpha_blend_params(&self, params: &RenderingParams) -> AlphaBlendParams {
        let mut blend = match self.rendering_mode {
            RenderingMode::GdiClassic | RenderingMode::GdiNatural => AlphaBlendParams {
                gamma: params.gdi_smoothing_contrast as f32 / 1000.0,
                enhanced_contrast: 0.0,
                cleartype_level: 1.0,
            },
            _ => AlphaBlendParams {
                gamma: params.gamma,
                enhanced_contrast: params.enhanced_contrast,
                cleartype_level: params.cleartype_level,
            },
        };
        if self.texture_type == TextureType::Aliased1x1 {
            blend.cleartype_level = 0.0;
        }
        blend
    }
}

#[inline]
fn is_empty_rect(rect: RectI) -> bool {
    rect.width() <= 0 || rect.height() <= 0
}

/// Moves `rect` by `offset`, truncated to whole pixels.
#[inline]
fn offset_rect(rect: RectI, offset: Vector2F) -> RectI {
    let offset = Vector2I::new(offset.x() as i32, offset.y() as i32);
    RectI::from_points(rect.origin() + offset, rect.lower_right() + offset)
}

/// The smallest rectangle containing both. Empty rectangles are ignored.
fn union_rect(a: RectI, b: RectI) -> RectI {
    if is_empty_rect(b) {
        return a;
    }
    if is_empty_rect(a) {
        return b;
    }
    RectI::from_points(
        Vector2I::new(cmp::min(a.min_x(), b.min_x()), cmp::min(a.min_y(), b.min_y())),
        Vector2I::new(cmp::max(a.max_x(), b.max_x()), cmp::max(a.max_y(), b.max_y())),
    )
}

fn intersect_rect(a: RectI, b: RectI) -> Option<RectI> {
    let rect = RectI::from_points(
        Vector2I::new(cmp::max(a.min_x(), b.min_x()), cmp::max(a.min_y(), b.min_y())),
        Vector2I::new(cmp::min(a.max_x(), b.max_x()), cmp::min(a.max_y(), b.max_y())),
    );
    if is_empty_rect(rect) {
        None
    } else {
        Some(rect)
    }
}
