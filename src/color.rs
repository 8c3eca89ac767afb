// font-collection/src/color.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Layered color glyphs: `COLR`/`CPAL` version 0 parsing and the run enumerator.

use crate::error::{AnalysisError, FontLoadingError};
use crate::font_face::FontFace;
use crate::rendering::{GlyphOffset, GlyphRun, Matrix, MeasuringMode};
use crate::table::{read_u16, read_u32, FontTable};

/// Palette index meaning "use the text foreground color".
pub const FOREGROUND_PALETTE_INDEX: u16 = 0xffff;

/// Glyph index written in place of glyphs that belong to another run.
const PLACEHOLDER_GLYPH: u16 = 1;

const COLR_HEADER_SIZE: usize = 14;
const COLR_BASE_RECORD_SIZE: usize = 6;
const COLR_LAYER_RECORD_SIZE: usize = 4;
const CPAL_HEADER_SIZE: usize = 12;
const CPAL_COLOR_RECORD_SIZE: usize = 4;

/// A color with components in 0.0 to 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorF {
    /// From an 8-bit BGRA palette record.
    fn from_bgra(record: &[u8]) -> ColorF {
        ColorF {
            b: record[0] as f32 / 255.0,
            g: record[1] as f32 / 255.0,
            r: record[2] as f32 / 255.0,
            a: record[3] as f32 / 255.0,
        }
    }
}

/// A parsed `COLR` table.
#[derive(Clone, Debug)]
pub struct ColrTable {
    table: FontTable,
    base_glyph_count: usize,
    base_glyphs_offset: usize,
    layers_offset: usize,
    layer_count: usize,
}

/// Layer iteration state of one glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorGlyph {
    /// The glyph of the current layer, or the glyph itself when it has no layers.
    pub glyph: u16,
    pub palette_index: u16,
    pub first_layer: usize,
    /// The current layer, up to `num_layers`.
    pub layer: usize,
    pub num_layers: usize,
}

impl ColrTable {
    pub fn parse(table: FontTable) -> Result<ColrTable, FontLoadingError> {
        let bytes = table.bytes();
        if bytes.len() < COLR_HEADER_SIZE {
            return Err(FontLoadingError::Parse);
        }
        let base_glyph_count = read_u16(bytes, 2)? as usize;
        let base_glyphs_offset = read_u32(bytes, 4)? as usize;
        let layers_offset = read_u32(bytes, 8)? as usize;
        let layer_count = read_u16(bytes, 12)? as usize;
        if base_glyphs_offset + base_glyph_count * COLR_BASE_RECORD_SIZE > bytes.len()
            || layers_offset + layer_count * COLR_LAYER_RECORD_SIZE > bytes.len()
        {
            return Err(FontLoadingError::Parse);
        }
        Ok(ColrTable {
            table,
            base_glyph_count,
            base_glyphs_offset,
            layers_offset,
            layer_count,
        })
    }

    /// Looks up `glyph`. Returns `None` when it has no base glyph record.
    pub fn glyph(&self, glyph: u16) -> Option<ColorGlyph> {
        let bytes = self.table.bytes();
        let (mut low, mut high) = (0, self.base_glyph_count);
        while low < high {
            let middle = (low + high) / 2;
            let record = self.base_glyphs_offset + middle * COLR_BASE_RECORD_SIZE;
            let base_glyph = read_u16(bytes, record).ok()?;
            if base_glyph < glyph {
                low = middle + 1;
            } else if base_glyph > glyph {
                high = middle;
            } else {
                let first_layer = read_u16(bytes, record + 2).ok()? as usize;
                let num_layers = read_u16(bytes, record + 4).ok()? as usize;
                let mut color_glyph = ColorGlyph {
                    glyph,
                    palette_index: FOREGROUND_PALETTE_INDEX,
                    first_layer,
                    layer: 0,
                    num_layers,
                };
                self.load_layer(&mut color_glyph);
                return Some(color_glyph);
            }
        }
        None
    }

    /// Moves `glyph` to its next layer.
    pub fn next_layer(&self, glyph: &mut ColorGlyph) {
        if glyph.layer < glyph.num_layers {
            glyph.layer += 1;
            self.load_layer(glyph);
        }
    }

    fn load_layer(&self, glyph: &mut ColorGlyph) {
        if glyph.layer >= glyph.num_layers {
            return;
        }
        let index = glyph.first_layer + glyph.layer;
        if index >= self.layer_count {
            return;
        }
        let bytes = self.table.bytes();
        let record = self.layers_offset + index * COLR_LAYER_RECORD_SIZE;
        if let (Ok(layer_glyph), Ok(palette_index)) =
            (read_u16(bytes, record), read_u16(bytes, record + 2))
        {
            glyph.glyph = layer_glyph;
            glyph.palette_index = palette_index;
        }
    }
}

/// Parsed `CPAL` palettes.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalettes {
    entries_per_palette: usize,
    /// `palette_count * entries_per_palette` colors, palette by palette.
    colors: Vec<ColorF>,
}

impl ColorPalettes {
    pub fn parse(bytes: &[u8]) -> Result<ColorPalettes, FontLoadingError> {
        if bytes.len() < CPAL_HEADER_SIZE {
            return Err(FontLoadingError::Parse);
        }
        let entries_per_palette = read_u16(bytes, 2)? as usize;
        let palette_count = read_u16(bytes, 4)? as usize;
        let color_record_count = read_u16(bytes, 6)? as usize;
        let records_offset = read_u32(bytes, 8)? as usize;

        let mut colors = Vec::with_capacity(palette_count * entries_per_palette);
        for palette in 0..palette_count {
            let first_record = read_u16(bytes, CPAL_HEADER_SIZE + palette * 2)? as usize;
            if first_record + entries_per_palette > color_record_count {
                return Err(FontLoadingError::Parse);
            }
            for entry in 0..entries_per_palette {
                let offset = records_offset + (first_record + entry) * CPAL_COLOR_RECORD_SIZE;
                let record = bytes
                    .get(offset..offset + CPAL_COLOR_RECORD_SIZE)
                    .ok_or(FontLoadingError::Parse)?;
                colors.push(ColorF::from_bgra(record));
            }
        }
        Ok(ColorPalettes {
            entries_per_palette,
            colors,
        })
    }

    #[inline]
    pub fn palette_count(&self) -> usize {
        if self.entries_per_palette == 0 {
            0
        } else {
            self.colors.len() / self.entries_per_palette
        }
    }

    #[inline]
    pub fn entries_per_palette(&self) -> usize {
        self.entries_per_palette
    }

    pub fn entries(
        &self,
        palette: usize,
        first_entry: usize,
        count: usize,
    ) -> Result<&[ColorF], AnalysisError> {
        if palette >= self.palette_count() {
            return Err(AnalysisError::InvalidArgument("palette index out of range"));
        }
        if first_entry + count > self.entries_per_palette {
            return Err(AnalysisError::InvalidArgument("palette entry out of range"));
        }
        let start = palette * self.entries_per_palette + first_entry;
        Ok(&self.colors[start..start + count])
    }
}

/// One single-color run produced by [`ColorGlyphEnumerator`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGlyphRun {
    pub glyph_indices: Vec<u16>,
    pub glyph_advances: Vec<f32>,
    pub glyph_offsets: Option<Vec<GlyphOffset>>,
    pub baseline_origin_x: f32,
    pub baseline_origin_y: f32,
    /// Zero for the foreground run.
    pub run_color: ColorF,
    /// [`FOREGROUND_PALETTE_INDEX`] for the run of uncolored glyphs.
    pub palette_index: u16,
    pub em_size: f32,
    pub measuring_mode: MeasuringMode,
}

impl ColorGlyphRun {
    #[inline]
    pub fn glyph_count(&self) -> usize {
        self.glyph_indices.len()
    }
}

/// Splits a glyph run into single-color runs, one per layer depth and palette index.
///
/// The first run, when present, holds the glyphs that have no color layers. Each later run draws
/// one layer of some of the glyphs; advances of skipped glyphs are folded into the preceding
/// glyph of the run.
#[derive(Debug)]
pub struct ColorGlyphEnumerator {
    face: FontFace,
    origin_x: f32,
    origin_y: f32,
    em_size: f32,
    is_rtl: bool,
    measuring_mode: MeasuringMode,
    palette: usize,
    colr: ColrTable,
    glyphs: Vec<ColorGlyph>,
    advances: Vec<f32>,
    offsets: Option<Vec<GlyphOffset>>,
    current_layer: usize,
    max_layer_count: usize,
    has_regular_glyphs: bool,
    current: Option<ColorGlyphRun>,
}

impl ColorGlyphEnumerator {
    pub fn new(
        origin_x: f32,
        origin_y: f32,
        run: &GlyphRun,
        measuring_mode: MeasuringMode,
        transform: Option<&Matrix>,
        palette: u32,
    ) -> Result<ColorGlyphEnumerator, AnalysisError> {
        let face = run.face.clone();
        if !face.is_color_font() || face.color_palette_count() <= palette as usize {
            return Err(AnalysisError::NoColor);
        }
        let colr = match face.colr() {
            Some(table) => ColrTable::parse(table)?,
            None => return Err(AnalysisError::NoColor),
        };

        let mut glyphs = Vec::with_capacity(run.glyph_count());
        let mut max_layer_count = 0;
        let mut has_colored_glyph = false;
        let mut has_regular_glyphs = false;
        for &glyph in &run.glyph_indices {
            let color_glyph = match colr.glyph(glyph) {
                Some(color_glyph) => {
                    has_colored_glyph = true;
                    max_layer_count = max_layer_count.max(color_glyph.num_layers);
                    color_glyph
                }
                None => ColorGlyph {
                    glyph,
                    palette_index: FOREGROUND_PALETTE_INDEX,
                    ..ColorGlyph::default()
                },
            };
            if color_glyph.num_layers == 0 {
                has_regular_glyphs = true;
            }
            glyphs.push(color_glyph);
        }

        // Runs with only some colored glyphs are fine; runs with none are plain text.
        if !has_colored_glyph {
            return Err(AnalysisError::NoColor);
        }

        if run
            .glyph_advances
            .as_ref()
            .map_or(false, |advances| advances.len() != run.glyph_count())
        {
            return Err(AnalysisError::InvalidArgument("glyph advance count"));
        }
        if run
            .glyph_offsets
            .as_ref()
            .map_or(false, |offsets| offsets.len() != run.glyph_count())
        {
            return Err(AnalysisError::InvalidArgument("glyph offset count"));
        }

        let advances = match run.glyph_advances {
            Some(ref advances) => advances.clone(),
            None => {
                let mut advances = Vec::with_capacity(run.glyph_count());
                for &glyph in &run.glyph_indices {
                    advances.push(face.scaled_design_advance(
                        measuring_mode,
                        run.em_size,
                        1.0,
                        transform,
                        glyph,
                        run.is_sideways,
                    )?);
                }
                advances
            }
        };

        Ok(ColorGlyphEnumerator {
            face,
            origin_x,
            origin_y,
            em_size: run.em_size,
            is_rtl: run.is_rtl(),
            measuring_mode,
            palette: palette as usize,
            colr,
            glyphs,
            advances,
            offsets: run.glyph_offsets.clone(),
            current_layer: 0,
            max_layer_count,
            has_regular_glyphs,
            current: None,
        })
    }

    /// Advances to the next run. Returns false when there are no more.
    pub fn move_next(&mut self) -> Result<bool, AnalysisError> {
        self.current = None;
        // Layer zero is visited even when every colored glyph has an empty layer list.
        let layer_count = self.max_layer_count.max(1);
        while self.current_layer < layer_count {
            if let Some(run) = self.build_run() {
                self.current = Some(run);
                break;
            }
            self.current_layer += 1;
        }
        Ok(self.current.is_some())
    }

    pub fn current_run(&self) -> Result<&ColorGlyphRun, AnalysisError> {
        self.current.as_ref().ok_or(AnalysisError::NotValidState)
    }

    /// Pen distance from the run origin to glyph `index`.
    fn glyph_origin(&self, index: usize) -> f32 {
        self.advances[..index]
            .iter()
            .map(|&advance| if self.is_rtl { -advance } else { advance })
            .sum()
    }

    fn build_run(&mut self) -> Option<ColorGlyphRun> {
        if self.current_layer == 0 && self.has_regular_glyphs {
            self.has_regular_glyphs = false;
            let glyph_indices = self
                .glyphs
                .iter()
                .map(|glyph| {
                    if glyph.num_layers == 0 {
                        glyph.glyph
                    } else {
                        PLACEHOLDER_GLYPH
                    }
                })
                .collect();
            return Some(ColorGlyphRun {
                glyph_indices,
                glyph_advances: self.advances.clone(),
                glyph_offsets: self.offsets.clone(),
                baseline_origin_x: self.origin_x,
                baseline_origin_y: self.origin_y,
                run_color: ColorF::default(),
                palette_index: FOREGROUND_PALETTE_INDEX,
                em_size: self.em_size,
                measuring_mode: self.measuring_mode,
            });
        }

        let mut glyph_indices = vec![];
        let mut glyph_advances: Vec<f32> = vec![];
        let mut glyph_offsets = self.offsets.as_ref().map(|_| vec![]);
        let mut palette_index = None;
        let mut baseline_origin_x = self.origin_x;
        let mut advance_adjustment = 0.0;

        for index in 0..self.glyphs.len() {
            let glyph = self.glyphs[index];
            let advance = self.advances[index];

            // All layers of this glyph were returned.
            if glyph.layer == glyph.num_layers {
                advance_adjustment += advance;
                continue;
            }

            let accepts = glyph.layer == self.current_layer
                && palette_index.map_or(true, |palette_index| palette_index == glyph.palette_index);
            if !accepts {
                advance_adjustment += advance;
                continue;
            }

            if palette_index.is_none() {
                palette_index = Some(glyph.palette_index);
                baseline_origin_x = self.origin_x + self.glyph_origin(index);
            }
            if let Some(previous) = glyph_advances.last_mut() {
                *previous += advance_adjustment;
            }
            advance_adjustment = 0.0;

            glyph_indices.push(glyph.glyph);
            glyph_advances.push(advance);
            if let (Some(glyph_offsets), Some(offsets)) = (glyph_offsets.as_mut(), &self.offsets) {
                glyph_offsets.push(offsets[index]);
            }
            self.colr.next_layer(&mut self.glyphs[index]);
        }

        let palette_index = palette_index?;
        if let Some(last) = glyph_advances.last_mut() {
            *last = 0.0;
        }

        Some(ColorGlyphRun {
            glyph_indices,
            glyph_advances,
            glyph_offsets,
            baseline_origin_x,
            baseline_origin_y: self.origin_y,
            run_color: self.run_color(palette_index),
            palette_index,
            em_size: self.em_size,
            measuring_mode: self.measuring_mode,
        })
    }

    fn run_color(&self, palette_index: u16) -> ColorF {
        if palette_index == FOREGROUND_PALETTE_INDEX {
            return ColorF::default();
        }
        match self
            .face
            .palette_entries(self.palette, palette_index as usize, 1)
        {
            Ok(entries) => entries.first().cloned().unwrap_or_default(),
            Err(error) => {
                warn!(
                    "failed to get palette entry {} of palette {}: {}",
                    palette_index, self.palette, error
                );
                ColorF::default()
            }
        }
    }
}
