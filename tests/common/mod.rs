// font-collection/tests/common/mod.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Fake collaborators shared by the integration tests.
//
// A fake font is an sfnt whose `FAKE` table holds one line per face:
// `family|face|weight|stretch|style`, with stretch 1 to 9 and style one of `n`, `o`, `i`.

#![allow(dead_code)]

use font_collection::analyzer::{
    CharacterMap, FaceDescription, FontAnalyzer, InformationalStringId,
};
use font_collection::error::FontLoadingError;
use font_collection::factory::Factory;
use font_collection::file::FontFile;
use font_collection::file_type::{FaceType, FileAnalysis, FileType};
use font_collection::font_face::FontFace;
use font_collection::localized_strings::{LocalizedStrings, EN_US};
use font_collection::metrics::{FontMetrics, GlyphMetrics};
use font_collection::properties::{Properties, Stretch, Style, Weight};
use font_collection::rasterizer::{glyph_bitmap_pitch, GlyphBitmap, RasterOptions, Rasterizer};
use font_collection::simulation::Simulations;
use font_collection::sources::FileListEnumerator;
use font_collection::table::{SfntTableReader, Tag, COLR, CPAL};
use font_collection::FontCollection;
use pathfinder_geometry::rect::RectI;
use pathfinder_geometry::vector::Vector2I;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const FAKE: Tag = u32::from_be_bytes(*b"FAKE");

pub const UNITS_PER_EM: u16 = 1000;

/// Glyph with no ink.
pub const SPACE_GLYPH: u16 = 32;
pub const SPACE_ADVANCE: u32 = 250;
pub const GLYPH_ADVANCE: u32 = 600;

/// Size of every inked glyph produced by [`FakeRasterizer`].
pub const GLYPH_WIDTH: i32 = 4;
pub const GLYPH_HEIGHT: i32 = 6;
pub const GRAY_COVERAGE: u8 = 0x80;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Lays out `tables` after a single-font sfnt table directory.
pub fn build_sfnt(tables: &[(Tag, &[u8])]) -> Vec<u8> {
    let mut data = vec![];
    data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    data.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    data.extend_from_slice(&[0; 6]);
    let mut offset = 12 + tables.len() * 16;
    for &(tag, bytes) in tables {
        data.extend_from_slice(&tag.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&(offset as u32).to_be_bytes());
        data.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        offset += bytes.len();
    }
    for &(_, bytes) in tables {
        data.extend_from_slice(bytes);
    }
    data
}

pub fn fake_font(faces: &[&str]) -> Vec<u8> {
    let description = faces.join("\n");
    build_sfnt(&[(FAKE, description.as_bytes())])
}

pub fn fake_color_font(face: &str, colr: &[u8], cpal: &[u8]) -> Vec<u8> {
    build_sfnt(&[(FAKE, face.as_bytes()), (COLR, colr), (CPAL, cpal)])
}

/// A version 0 `COLR` table. `glyphs` must be sorted by glyph id.
pub fn build_colr(glyphs: &[(u16, &[(u16, u16)])]) -> Vec<u8> {
    let base_offset = 14u32;
    let layers_offset = base_offset + glyphs.len() as u32 * 6;
    let layer_count: usize = glyphs.iter().map(|&(_, layers)| layers.len()).sum();

    let mut data = vec![];
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&(glyphs.len() as u16).to_be_bytes());
    data.extend_from_slice(&base_offset.to_be_bytes());
    data.extend_from_slice(&layers_offset.to_be_bytes());
    data.extend_from_slice(&(layer_count as u16).to_be_bytes());

    let mut first_layer = 0u16;
    for &(glyph, layers) in glyphs {
        data.extend_from_slice(&glyph.to_be_bytes());
        data.extend_from_slice(&first_layer.to_be_bytes());
        data.extend_from_slice(&(layers.len() as u16).to_be_bytes());
        first_layer += layers.len() as u16;
    }
    for &(_, layers) in glyphs {
        for &(glyph, palette_index) in layers {
            data.extend_from_slice(&glyph.to_be_bytes());
            data.extend_from_slice(&palette_index.to_be_bytes());
        }
    }
    data
}

/// A version 0 `CPAL` table. Each palette lists BGRA colors; all palettes must be the same size.
pub fn build_cpal(palettes: &[&[[u8; 4]]]) -> Vec<u8> {
    let entries = palettes.first().map_or(0, |palette| palette.len());
    let records_offset = 12 + palettes.len() as u32 * 2;

    let mut data = vec![];
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&(entries as u16).to_be_bytes());
    data.extend_from_slice(&(palettes.len() as u16).to_be_bytes());
    data.extend_from_slice(&((entries * palettes.len()) as u16).to_be_bytes());
    data.extend_from_slice(&records_offset.to_be_bytes());
    for index in 0..palettes.len() {
        data.extend_from_slice(&((index * entries) as u16).to_be_bytes());
    }
    for palette in palettes {
        for color in palette.iter() {
            data.extend_from_slice(color);
        }
    }
    data
}

fn fake_lines(data: &[u8]) -> Option<Vec<String>> {
    let range = SfntTableReader::table_range(data, 0, FAKE).ok()??;
    let text = std::str::from_utf8(&data[range]).ok()?;
    Some(text.lines().map(str::to_owned).collect())
}

fn parse_style(style: &str) -> Style {
    match style {
        "o" => Style::Oblique,
        "i" => Style::Italic,
        _ => Style::Normal,
    }
}

/// Reads faces from the `FAKE` table.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeAnalyzer;

impl FontAnalyzer for FakeAnalyzer {
    fn analyze(&self, data: &[u8]) -> FileAnalysis {
        let lines = match fake_lines(data) {
            Some(lines) if !lines.is_empty() => lines,
            _ => return FileAnalysis::unsupported(),
        };
        let count = lines.len() as u32;
        FileAnalysis {
            is_supported: true,
            file_type: if count == 1 {
                FileType::Single
            } else {
                FileType::Collection(count)
            },
            face_type: FaceType::TrueType,
            face_count: count,
        }
    }

    fn face_description(
        &self,
        data: &[u8],
        index: u32,
    ) -> Result<FaceDescription, FontLoadingError> {
        let lines = fake_lines(data).ok_or(FontLoadingError::Parse)?;
        let line = lines
            .get(index as usize)
            .ok_or(FontLoadingError::NoSuchFontInCollection)?;
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() != 5 {
            return Err(FontLoadingError::Parse);
        }
        if fields[0].is_empty() {
            return Err(FontLoadingError::MissingFamilyName);
        }

        let weight = fields[2].parse().map_err(|_| FontLoadingError::Parse)?;
        let stretch = fields[3].parse().map_err(|_| FontLoadingError::Parse)?;
        let has_color_tables = SfntTableReader::table_range(data, 0, COLR)?.is_some()
            && SfntTableReader::table_range(data, 0, CPAL)?.is_some();
        Ok(FaceDescription {
            family_names: LocalizedStrings::with_string(EN_US, fields[0]),
            face_names: LocalizedStrings::with_string(EN_US, fields[1]),
            properties: Properties {
                weight: Weight(weight),
                stretch: Stretch::from_width_class(stretch),
                style: parse_style(fields[4]),
            },
            metrics: FontMetrics {
                design_units_per_em: UNITS_PER_EM,
                ascent: 800,
                descent: 200,
                ..FontMetrics::default()
            },
            glyph_count: 128,
            has_color_tables,
            ..FaceDescription::default()
        })
    }

    fn informational_strings(
        &self,
        data: &[u8],
        index: u32,
        id: InformationalStringId,
    ) -> Result<LocalizedStrings, FontLoadingError> {
        match id {
            InformationalStringId::FullName => {
                let description = self.face_description(data, index)?;
                let full_name = format!(
                    "{} {}",
                    description.family_names.en_string(),
                    description.face_names.en_string()
                );
                Ok(LocalizedStrings::with_string(EN_US, &full_name))
            }
            _ => Ok(LocalizedStrings::new()),
        }
    }

    /// Printable ASCII maps to the glyph with the same number.
    fn character_map(&self, _: &[u8], _: u32) -> Result<CharacterMap, FontLoadingError> {
        Ok(CharacterMap((0x20..0x7f).map(|c| (c, c as u16)).collect()))
    }

    fn design_glyph_metrics(
        &self,
        _: &[u8],
        _: u32,
        glyph: u16,
    ) -> Result<GlyphMetrics, FontLoadingError> {
        Ok(if glyph == SPACE_GLYPH {
            GlyphMetrics {
                advance_width: SPACE_ADVANCE,
                right_side_bearing: SPACE_ADVANCE as i32,
                advance_height: 1000,
                ..GlyphMetrics::default()
            }
        } else {
            GlyphMetrics {
                left_side_bearing: 50,
                advance_width: GLYPH_ADVANCE,
                right_side_bearing: 50,
                top_side_bearing: 200,
                advance_height: 1000,
                bottom_side_bearing: 100,
                vertical_origin_y: 800,
            }
        })
    }
}

/// Every inked glyph is a `GLYPH_WIDTH` by `GLYPH_HEIGHT` block sitting on the baseline.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeRasterizer;

impl Rasterizer for FakeRasterizer {
    fn glyph_bounds(
        &self,
        _: &FontFace,
        glyph: u16,
        _: &RasterOptions,
    ) -> Result<RectI, FontLoadingError> {
        if glyph == SPACE_GLYPH {
            return Ok(RectI::default());
        }
        Ok(RectI::new(
            Vector2I::new(0, -GLYPH_HEIGHT),
            Vector2I::new(GLYPH_WIDTH, GLYPH_HEIGHT),
        ))
    }

    fn rasterize_glyph(
        &self,
        face: &FontFace,
        glyph: u16,
        options: &RasterOptions,
    ) -> Result<GlyphBitmap, FontLoadingError> {
        let bounds = self.glyph_bounds(face, glyph, options)?;
        let pitch = glyph_bitmap_pitch(options.aliased, bounds.width());
        let mut pixels = vec![0; pitch * bounds.height() as usize];
        for row in pixels.chunks_mut(pitch) {
            if options.aliased {
                row[0] = 0xf0;
            } else {
                for pixel in &mut row[..bounds.width() as usize] {
                    *pixel = GRAY_COVERAGE;
                }
            }
        }
        Ok(GlyphBitmap {
            bounds,
            pitch,
            is_1bpp: options.aliased,
            pixels,
        })
    }
}

pub fn fake_factory() -> Factory {
    init_logging();
    Factory::builder()
        .analyzer(Arc::new(FakeAnalyzer))
        .rasterizer(Arc::new(FakeRasterizer))
        .build()
}

pub fn memory_files(factory: &Factory, fonts: Vec<Vec<u8>>) -> Vec<FontFile> {
    fonts
        .into_iter()
        .map(|font| factory.create_in_memory_font_file_reference(font))
        .collect()
}

pub fn collection_of(factory: &Factory, fonts: Vec<Vec<u8>>) -> FontCollection {
    let mut enumerator = FileListEnumerator::new(memory_files(factory, fonts));
    factory
        .create_custom_font_collection(&mut enumerator)
        .expect("collection build failed")
}

pub fn face_of(factory: &Factory, font: Vec<u8>, simulations: Simulations) -> FontFace {
    let file = factory.create_in_memory_font_file_reference(font);
    factory
        .create_font_face(file, 0, simulations)
        .expect("face creation failed")
}

/// A fresh directory under the system temporary directory.
pub fn scratch_dir(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "font-collection-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&path);
    fs::create_dir_all(&path).expect("cannot create scratch directory");
    path
}
