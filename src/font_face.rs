// font-collection/src/font_face.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A face instantiated for measuring and rendering, and the weak registry that keeps one
//! instance per (files, index, simulations) tuple.

use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, OnceLock, Weak};

use crate::analyzer::{CharacterMap, FontAnalyzer};
use crate::color::{ColorF, ColorPalettes};
use crate::error::{AnalysisError, FontLoadingError};
use crate::file::{FontFile, FontFileStream};
use crate::file_type::FaceType;
use crate::metrics::{CaretMetrics, FontMetrics, GlyphMetrics};
use crate::rasterizer::Rasterizer;
use crate::rendering::{Matrix, MeasuringMode};
use crate::simulation::Simulations;
use crate::table::{self, FontTable, Tag, TableReader};

const GLYPH_BLOCK_SHIFT: usize = 8;
const GLYPH_BLOCK_SIZE: usize = 1 << GLYPH_BLOCK_SHIFT;
const GLYPH_BLOCK_MASK: usize = GLYPH_BLOCK_SIZE - 1;
const GLYPH_BLOCK_COUNT: usize = 0x10000 >> GLYPH_BLOCK_SHIFT;

type GlyphMetricsBlock = Box<[GlyphMetrics; GLYPH_BLOCK_SIZE]>;

/// Collaborators a face is created with.
#[derive(Clone)]
pub struct FaceServices {
    pub analyzer: Arc<dyn FontAnalyzer>,
    pub table_reader: Arc<dyn TableReader>,
    pub rasterizer: Arc<dyn Rasterizer>,
}

/// A registry of live faces. Entries hold weak references and are dropped when their face is.
#[derive(Default)]
pub struct FaceCache {
    entries: Mutex<Vec<FaceCacheEntry>>,
}

struct FaceCacheEntry {
    files: Vec<FontFile>,
    index: u32,
    simulations: Simulations,
    face: Weak<FontFaceInner>,
}

impl FaceCacheEntry {
    fn matches(&self, files: &[FontFile], index: u32, simulations: Simulations) -> bool {
        self.index == index
            && self.simulations == simulations
            && self.files.len() == files.len()
            && self.files.iter().zip(files).all(|(a, b)| a.is_same(b))
    }
}

impl FaceCache {
    #[inline]
    pub fn new() -> FaceCache {
        FaceCache::default()
    }

    /// Returns the live face for `files`, `index`, and `simulations`, creating it if there is none.
    ///
    /// The registry lock is held while the face is created, so concurrent callers asking for the
    /// same tuple get the same face.
    pub fn get_or_create(
        self: &Arc<Self>,
        files: &[FontFile],
        index: u32,
        simulations: Simulations,
        services: &FaceServices,
    ) -> Result<FontFace, FontLoadingError> {
        let mut entries = self.entries.lock();
        if let Some(face) = entries
            .iter()
            .filter(|entry| entry.matches(files, index, simulations))
            .find_map(|entry| entry.face.upgrade())
        {
            return Ok(FontFace(face));
        }

        let face = FontFace::new(self.clone(), files, index, simulations, services)?;
        entries.push(FaceCacheEntry {
            files: files.to_vec(),
            index,
            simulations,
            face: Arc::downgrade(&face.0),
        });
        trace!(
            "created font face {} with simulations {:?}, {} cached",
            index,
            simulations,
            entries.len()
        );
        Ok(face)
    }

    /// The number of faces still alive.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.face.strong_count() > 0)
            .count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&self) {
        self.entries
            .lock()
            .retain(|entry| entry.face.strong_count() > 0);
    }
}

impl Debug for FaceCache {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FaceCache").field("len", &self.len()).finish()
    }
}

/// Glyph lookup state for shaping.
#[derive(Clone, Debug)]
pub struct ShapingCache {
    character_map: Arc<CharacterMap>,
    design_units_per_em: u16,
}

impl ShapingCache {
    /// The nominal glyph for `codepoint`, 0 when it is not mapped.
    #[inline]
    pub fn glyph(&self, codepoint: u32) -> u16 {
        self.character_map.glyph_index(codepoint).unwrap_or(0)
    }

    #[inline]
    pub fn design_units_per_em(&self) -> u16 {
        self.design_units_per_em
    }
}

/// A face of a font file with a set of simulations applied.
///
/// Clones share one instance. Faces are obtained from a [`Factory`](crate::factory::Factory).
#[derive(Clone)]
pub struct FontFace(Arc<FontFaceInner>);

struct FontFaceInner {
    cache: Arc<FaceCache>,
    files: Vec<FontFile>,
    stream: Arc<dyn FontFileStream>,
    index: u32,
    face_type: FaceType,
    simulations: Simulations,
    metrics: FontMetrics,
    caret: CaretMetrics,
    glyph_count: u16,
    is_symbol_font: bool,
    is_monospaced: bool,
    services: FaceServices,
    glyph_metrics: Mutex<Vec<Option<GlyphMetricsBlock>>>,
    character_map: OnceLock<Arc<CharacterMap>>,
    vdmx: OnceLock<Option<FontTable>>,
    gasp: OnceLock<Option<FontTable>>,
    cpal: OnceLock<Option<FontTable>>,
    colr: OnceLock<Option<FontTable>>,
    palettes: OnceLock<Option<Arc<ColorPalettes>>>,
    shaping_cache: OnceLock<Arc<ShapingCache>>,
}

impl Drop for FontFaceInner {
    fn drop(&mut self) {
        self.cache.sweep();
    }
}

impl FontFace {
    fn new(
        cache: Arc<FaceCache>,
        files: &[FontFile],
        index: u32,
        simulations: Simulations,
        services: &FaceServices,
    ) -> Result<FontFace, FontLoadingError> {
        let file = files.first().ok_or(FontLoadingError::FileNotFound)?;
        let stream = file.stream()?;
        let analysis = services.analyzer.analyze(stream.bytes());
        if !analysis.is_supported {
            return Err(FontLoadingError::UnknownFormat);
        }
        if index >= analysis.face_count {
            return Err(FontLoadingError::NoSuchFontInCollection);
        }
        let description = services.analyzer.face_description(stream.bytes(), index)?;

        let mut caret = description.caret;
        if simulations.contains(Simulations::OBLIQUE) && caret.slope_rise == 1 {
            caret.slope_rise = description.metrics.design_units_per_em as i16;
            caret.slope_run = caret.slope_rise / 3;
        }

        Ok(FontFace(Arc::new(FontFaceInner {
            cache,
            files: files.to_vec(),
            stream,
            index,
            face_type: analysis.face_type,
            simulations,
            metrics: description.metrics,
            caret,
            glyph_count: description.glyph_count,
            is_symbol_font: description.is_symbol_font,
            is_monospaced: description.is_monospaced,
            services: services.clone(),
            glyph_metrics: Mutex::new(vec![None; GLYPH_BLOCK_COUNT]),
            character_map: OnceLock::new(),
            vdmx: OnceLock::new(),
            gasp: OnceLock::new(),
            cpal: OnceLock::new(),
            colr: OnceLock::new(),
            palettes: OnceLock::new(),
            shaping_cache: OnceLock::new(),
        })))
    }

    /// Whether both values are the same face instance.
    #[inline]
    pub fn ptr_eq(&self, other: &FontFace) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn files(&self) -> &[FontFile] {
        &self.0.files
    }

    #[inline]
    pub fn stream(&self) -> &Arc<dyn FontFileStream> {
        &self.0.stream
    }

    /// The face index within its file.
    #[inline]
    pub fn index(&self) -> u32 {
        self.0.index
    }

    #[inline]
    pub fn face_type(&self) -> FaceType {
        self.0.face_type
    }

    #[inline]
    pub fn simulations(&self) -> Simulations {
        self.0.simulations
    }

    #[inline]
    pub fn metrics(&self) -> &FontMetrics {
        &self.0.metrics
    }

    #[inline]
    pub fn glyph_count(&self) -> u16 {
        self.0.glyph_count
    }

    #[inline]
    pub fn is_symbol_font(&self) -> bool {
        self.0.is_symbol_font
    }

    #[inline]
    pub fn is_monospaced(&self) -> bool {
        self.0.is_monospaced
    }

    /// Caret slope and offset. Oblique simulation slants an upright caret.
    #[inline]
    pub fn caret_metrics(&self) -> CaretMetrics {
        self.0.caret
    }

    #[inline]
    pub fn rasterizer(&self) -> &Arc<dyn Rasterizer> {
        &self.0.services.rasterizer
    }

    /// Extra advance given to inked glyphs by bold simulation, in design units.
    fn horizontal_metric_adjustment(&self) -> u32 {
        if self.0.simulations.contains(Simulations::BOLD) {
            (self.0.metrics.design_units_per_em as u32 + 49) / 50
        } else {
            0
        }
    }

    fn cached_glyph_metrics(&self, glyph: u16) -> Option<GlyphMetrics> {
        let blocks = self.0.glyph_metrics.lock();
        let block = blocks[glyph as usize >> GLYPH_BLOCK_SHIFT].as_ref()?;
        let metrics = block[glyph as usize & GLYPH_BLOCK_MASK];
        if metrics.is_zero() {
            None
        } else {
            Some(metrics)
        }
    }

    fn set_cached_glyph_metrics(&self, glyph: u16, metrics: GlyphMetrics) {
        let mut blocks = self.0.glyph_metrics.lock();
        let block = blocks[glyph as usize >> GLYPH_BLOCK_SHIFT]
            .get_or_insert_with(|| Box::new([GlyphMetrics::default(); GLYPH_BLOCK_SIZE]));
        block[glyph as usize & GLYPH_BLOCK_MASK] = metrics;
    }

    /// Design-unit metrics of `glyphs`, simulations included.
    ///
    /// Sideways metrics are the same as upright ones.
    pub fn design_glyph_metrics(
        &self,
        glyphs: &[u16],
        is_sideways: bool,
    ) -> Result<Vec<GlyphMetrics>, FontLoadingError> {
        if is_sideways {
            debug!("sideways glyph metrics are reported upright");
        }
        let mut result = Vec::with_capacity(glyphs.len());
        for &glyph in glyphs {
            if let Some(metrics) = self.cached_glyph_metrics(glyph) {
                result.push(metrics);
                continue;
            }
            let mut metrics = self.0.services.analyzer.design_glyph_metrics(
                self.0.stream.bytes(),
                self.0.index,
                glyph,
            )?;
            if metrics.has_contours() {
                metrics.advance_width += self.horizontal_metric_adjustment();
            }
            self.set_cached_glyph_metrics(glyph, metrics);
            result.push(metrics);
        }
        Ok(result)
    }

    /// Glyph metrics in design units, rounded the way they come out at `em_size * ppdip` pixels.
    pub fn gdi_compatible_glyph_metrics(
        &self,
        em_size: f32,
        ppdip: f32,
        transform: Option<&Matrix>,
        use_gdi_natural: bool,
        glyphs: &[u16],
        is_sideways: bool,
    ) -> Result<Vec<GlyphMetrics>, FontLoadingError> {
        let measuring_mode = if use_gdi_natural {
            MeasuringMode::GdiNatural
        } else {
            MeasuringMode::GdiClassic
        };
        let size = em_size * ppdip;
        let units_per_em = self.0.metrics.design_units_per_em as f32;
        let scale = size / units_per_em;

        let design = self.design_glyph_metrics(glyphs, is_sideways)?;
        let mut result = Vec::with_capacity(glyphs.len());
        for (&glyph, design) in glyphs.iter().zip(design) {
            if size <= 0.0 {
                result.push(GlyphMetrics::default());
                continue;
            }
            let scale_metric = |value: f32| round_metric(round_metric(value * scale) as f32 / scale);
            result.push(GlyphMetrics {
                left_side_bearing: scale_metric(design.left_side_bearing as f32),
                advance_width: self.design_advance(
                    measuring_mode,
                    em_size,
                    ppdip,
                    transform,
                    glyph,
                    is_sideways,
                )?
                .max(0) as u32,
                right_side_bearing: scale_metric(design.right_side_bearing as f32),
                top_side_bearing: scale_metric(design.top_side_bearing as f32),
                advance_height: scale_metric(design.advance_height as f32).max(0) as u32,
                bottom_side_bearing: scale_metric(design.bottom_side_bearing as f32),
                vertical_origin_y: scale_metric(design.vertical_origin_y as f32),
            });
        }
        Ok(result)
    }

    /// Design advances of `glyphs` in natural mode.
    pub fn design_glyph_advances(
        &self,
        glyphs: &[u16],
        is_sideways: bool,
    ) -> Result<Vec<i32>, FontLoadingError> {
        let units_per_em = self.0.metrics.design_units_per_em as f32;
        glyphs
            .iter()
            .map(|&glyph| {
                self.design_advance(
                    MeasuringMode::Natural,
                    units_per_em,
                    1.0,
                    None,
                    glyph,
                    is_sideways,
                )
            })
            .collect()
    }

    /// Advance of `glyph` in design units as measured in `measuring_mode`.
    ///
    /// The GDI modes round the advance to whole pixels at `em_size * ppdip` before converting
    /// it back.
    pub fn design_advance(
        &self,
        measuring_mode: MeasuringMode,
        em_size: f32,
        ppdip: f32,
        transform: Option<&Matrix>,
        glyph: u16,
        is_sideways: bool,
    ) -> Result<i32, FontLoadingError> {
        let mut metrics = self.design_glyph_metrics(&[glyph], is_sideways)?;
        let metrics = match metrics.pop() {
            Some(metrics) => metrics,
            None => return Ok(0),
        };
        // Cached advances already carry the bold adjustment.
        let adjustment = if metrics.has_contours() {
            self.horizontal_metric_adjustment()
        } else {
            0
        };
        let advance = (metrics.advance_width - adjustment) as f32;
        let adjustment = adjustment as f32;

        match measuring_mode {
            MeasuringMode::Natural => Ok((advance + adjustment) as i32),
            MeasuringMode::GdiClassic | MeasuringMode::GdiNatural => {
                let size = em_size * ppdip;
                if size == 0.0 {
                    return Ok(0);
                }
                if transform.map_or(false, |transform| !transform.is_identity()) {
                    debug!("transform ignored for GDI-compatible advances");
                }
                let units_per_em = self.0.metrics.design_units_per_em as f32;
                let pixels = round_metric(advance * size / units_per_em) as f32;
                Ok(round_metric(pixels * units_per_em / size + adjustment))
            }
        }
    }

    /// Advance of `glyph` in DIPs at `em_size`.
    pub fn scaled_design_advance(
        &self,
        measuring_mode: MeasuringMode,
        em_size: f32,
        ppdip: f32,
        transform: Option<&Matrix>,
        glyph: u16,
        is_sideways: bool,
    ) -> Result<f32, FontLoadingError> {
        let units_per_em = self.0.metrics.design_units_per_em as f32;
        let advance = self.design_advance(
            measuring_mode,
            em_size,
            ppdip,
            transform,
            glyph,
            is_sideways,
        )? as f32;
        Ok(match measuring_mode {
            MeasuringMode::Natural => advance * em_size / units_per_em,
            MeasuringMode::GdiClassic | MeasuringMode::GdiNatural => {
                if ppdip > 0.0 {
                    (advance * em_size * ppdip / units_per_em + 0.5).floor() / ppdip
                } else {
                    0.0
                }
            }
        })
    }

    fn character_map(&self) -> Result<&Arc<CharacterMap>, FontLoadingError> {
        if let Some(map) = self.0.character_map.get() {
            return Ok(map);
        }
        let map = Arc::new(
            self.0
                .services
                .analyzer
                .character_map(self.0.stream.bytes(), self.0.index)?,
        );
        Ok(self.0.character_map.get_or_init(|| map))
    }

    /// Nominal glyphs for `codepoints`. Unmapped codepoints get glyph 0.
    pub fn glyph_indices(&self, codepoints: &[u32]) -> Result<Vec<u16>, FontLoadingError> {
        let map = self.character_map()?;
        Ok(codepoints
            .iter()
            .map(|&codepoint| map.glyph_index(codepoint).unwrap_or(0))
            .collect())
    }

    pub fn try_get_font_table(&self, tag: Tag) -> Result<Option<FontTable>, FontLoadingError> {
        self.0
            .services
            .table_reader
            .try_get_table(&self.0.stream, self.0.index, tag)
    }

    fn cached_table(&self, slot: &OnceLock<Option<FontTable>>, tag: Tag) -> Option<FontTable> {
        slot.get_or_init(|| match self.try_get_font_table(tag) {
            Ok(table) => table,
            Err(error) => {
                warn!("failed to read table {:08x}: {}", tag, error);
                None
            }
        })
        .clone()
    }

    pub fn vdmx(&self) -> Option<FontTable> {
        self.cached_table(&self.0.vdmx, table::VDMX)
    }

    pub fn gasp(&self) -> Option<FontTable> {
        self.cached_table(&self.0.gasp, table::GASP)
    }

    pub fn cpal(&self) -> Option<FontTable> {
        self.cached_table(&self.0.cpal, table::CPAL)
    }

    pub fn colr(&self) -> Option<FontTable> {
        self.cached_table(&self.0.colr, table::COLR)
    }

    /// Whether the face has both `COLR` and `CPAL` tables.
    pub fn is_color_font(&self) -> bool {
        self.colr().is_some() && self.cpal().is_some()
    }

    fn palettes(&self) -> Option<&Arc<ColorPalettes>> {
        self.0
            .palettes
            .get_or_init(|| {
                let table = self.cpal()?;
                match ColorPalettes::parse(table.bytes()) {
                    Ok(palettes) => Some(Arc::new(palettes)),
                    Err(error) => {
                        warn!("failed to parse CPAL table: {}", error);
                        None
                    }
                }
            })
            .as_ref()
    }

    pub fn color_palette_count(&self) -> usize {
        self.palettes().map_or(0, |palettes| palettes.palette_count())
    }

    pub fn palette_entry_count(&self) -> usize {
        self.palettes()
            .map_or(0, |palettes| palettes.entries_per_palette())
    }

    pub fn palette_entries(
        &self,
        palette: usize,
        first_entry: usize,
        count: usize,
    ) -> Result<Vec<ColorF>, AnalysisError> {
        let palettes = self.palettes().ok_or(AnalysisError::NoColor)?;
        Ok(palettes.entries(palette, first_entry, count)?.to_vec())
    }

    pub fn shaping_cache(&self) -> Result<Arc<ShapingCache>, FontLoadingError> {
        if let Some(cache) = self.0.shaping_cache.get() {
            return Ok(cache.clone());
        }
        let cache = Arc::new(ShapingCache {
            character_map: self.character_map()?.clone(),
            design_units_per_em: self.0.metrics.design_units_per_em,
        });
        Ok(self.0.shaping_cache.get_or_init(|| cache).clone())
    }
}

impl Debug for FontFace {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("files", &self.0.files)
            .field("index", &self.0.index)
            .field("simulations", &self.0.simulations)
            .finish()
    }
}

#[inline]
fn round_metric(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod test {
    use super::round_metric;

    #[test]
    fn metrics_round_half_up() {
        assert_eq!(round_metric(1.5), 2);
        assert_eq!(round_metric(-1.5), -1);
        assert_eq!(round_metric(2.49), 2);
    }
}
