// font-collection/src/factory.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The entry point: owns the collaborators, loaders, and caches that collections and faces share.

use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::path::Path;
use std::sync::Arc;

use crate::analysis::{GlyphRunAnalysis, GlyphRunAnalysisOptions};
use crate::analyzer::{FontAnalyzer, OpenTypeAnalyzer};
use crate::collection::{CollectionBuilder, FontCollection};
use crate::color::ColorGlyphEnumerator;
use crate::config::{FactoryConfig, SYSTEM_DEFAULT_EUDC_FONT};
use crate::error::{AnalysisError, FontLoadingError};
use crate::file::FontFile;
use crate::font_face::{FaceCache, FaceServices, FontFace};
use crate::loaders::{InMemoryFileLoader, LocalFileLoader};
use crate::localized_strings::eq_ignore_case;
use crate::rasterizer::{OutlineRasterizer, Rasterizer};
use crate::rendering::{GlyphRun, Matrix, MeasuringMode};
use crate::simulation::Simulations;
#[cfg(all(feature = "source", not(target_arch = "wasm32")))]
use crate::sources::DirectoryEnumerator;
use crate::sources::FontFileEnumerator;
use crate::table::{SfntTableReader, TableReader};

/// Creates collections, files, faces, and glyph run analyses.
///
/// Faces created by one factory are shared: asking twice for the same file, index, and
/// simulations returns the same face while it is alive.
pub struct Factory {
    config: FactoryConfig,
    services: FaceServices,
    local_loader: Arc<LocalFileLoader>,
    memory_loader: Arc<InMemoryFileLoader>,
    face_cache: Arc<FaceCache>,
    system_collection: Mutex<Option<Arc<FontCollection>>>,
    eudc_collection: Mutex<Option<Arc<FontCollection>>>,
}

impl Factory {
    /// A factory with the default configuration and collaborators.
    #[inline]
    pub fn new() -> Factory {
        Factory::builder().build()
    }

    #[inline]
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    #[inline]
    pub fn analyzer(&self) -> &Arc<dyn FontAnalyzer> {
        &self.services.analyzer
    }

    #[inline]
    pub fn local_loader(&self) -> &Arc<LocalFileLoader> {
        &self.local_loader
    }

    #[inline]
    pub fn in_memory_loader(&self) -> &Arc<InMemoryFileLoader> {
        &self.memory_loader
    }

    /// The collection of installed fonts, with replacements applied.
    ///
    /// Built on first use from the configured font directories, or the platform defaults when none
    /// are configured, and shared afterwards.
    #[cfg(all(feature = "source", not(target_arch = "wasm32")))]
    pub fn system_font_collection(&self) -> Result<Arc<FontCollection>, FontLoadingError> {
        let mut system_collection = self.system_collection.lock();
        if let Some(ref collection) = *system_collection {
            return Ok(collection.clone());
        }

        let mut enumerator = if self.config.font_directories.is_empty() {
            DirectoryEnumerator::with_default_directories(self.local_loader.clone())
        } else {
            DirectoryEnumerator::new(
                self.local_loader.clone(),
                self.config.font_directories.clone(),
            )
        };
        let collection = Arc::new(FontCollection::system_from_enumerator(
            &mut enumerator,
            &self.services.analyzer,
            &self.config.replacements,
        )?);
        debug!(
            "system font collection has {} families",
            collection.family_count()
        );
        *system_collection = Some(collection.clone());
        Ok(collection)
    }

    /// The collection of end-user-defined character fonts. Built on first use and shared
    /// afterwards.
    pub fn eudc_font_collection(&self) -> Arc<FontCollection> {
        let mut eudc_collection = self.eudc_collection.lock();
        if let Some(ref collection) = *eudc_collection {
            return collection.clone();
        }
        let collection = Arc::new(self.build_eudc_collection());
        *eudc_collection = Some(collection.clone());
        collection
    }

    fn build_eudc_collection(&self) -> FontCollection {
        let mut builder = CollectionBuilder::new();
        for (key, path) in &self.config.eudc_fonts {
            let name = if eq_ignore_case(key, SYSTEM_DEFAULT_EUDC_FONT) {
                ""
            } else {
                key.as_str()
            };
            if !self.add_eudc_family(&mut builder, name, path) {
                warn!("failed to add EUDC font {:?} for {}", path, key);
            }
        }

        if !builder.has_family("") {
            if let Some(ref path) = self.config.eudc_default {
                if !self.add_eudc_family(&mut builder, "", path) {
                    warn!("failed to add default EUDC font {:?}", path);
                }
            }
        }

        builder.add_simulations();
        builder.build(false)
    }

    fn add_eudc_family(&self, builder: &mut CollectionBuilder, name: &str, path: &Path) -> bool {
        match self.create_font_file_reference(path) {
            Ok(file) => builder.add_file_as_family(name, &file, &self.services.analyzer),
            Err(error) => {
                debug!("cannot reference {:?}: {}", path, error);
                false
            }
        }
    }

    /// Builds a collection from the files of `enumerator`.
    pub fn create_custom_font_collection(
        &self,
        enumerator: &mut dyn FontFileEnumerator,
    ) -> Result<FontCollection, FontLoadingError> {
        FontCollection::from_enumerator(enumerator, &self.services.analyzer)
    }

    /// Returns a file handle for the font at `path`.
    pub fn create_font_file_reference<P>(&self, path: P) -> Result<FontFile, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        LocalFileLoader::create_font_file(&self.local_loader, path.as_ref())
    }

    /// Registers `data` with the in-memory loader of this factory.
    pub fn create_in_memory_font_file_reference(&self, data: Vec<u8>) -> FontFile {
        InMemoryFileLoader::create_in_memory_font_file_reference(&self.memory_loader, data)
    }

    /// Returns the face for `file`, `index`, and `simulations`, shared with any live face created
    /// for the same arguments.
    pub fn create_font_face(
        &self,
        file: FontFile,
        index: u32,
        simulations: Simulations,
    ) -> Result<FontFace, FontLoadingError> {
        self.face_cache
            .get_or_create(&[file], index, simulations, &self.services)
    }

    pub fn create_glyph_run_analysis(
        &self,
        run: &GlyphRun,
        options: &GlyphRunAnalysisOptions,
    ) -> Result<GlyphRunAnalysis, AnalysisError> {
        GlyphRunAnalysis::new(run, options)
    }

    /// Splits `run` into one run of its uncolored glyphs followed by one run per color layer.
    ///
    /// Fails with `NoColor` when the face has no palette `palette` or no glyph of the run has
    /// color layers.
    pub fn translate_color_glyph_run(
        &self,
        origin_x: f32,
        origin_y: f32,
        run: &GlyphRun,
        measuring_mode: MeasuringMode,
        transform: Option<&Matrix>,
        palette: u32,
    ) -> Result<ColorGlyphEnumerator, AnalysisError> {
        ColorGlyphEnumerator::new(origin_x, origin_y, run, measuring_mode, transform, palette)
    }

    /// The number of faces of this factory that are still alive.
    #[inline]
    pub fn face_cache_len(&self) -> usize {
        self.face_cache.len()
    }
}

impl Default for Factory {
    #[inline]
    fn default() -> Factory {
        Factory::new()
    }
}

impl Debug for Factory {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Factory")
            .field("config", &self.config)
            .field("face_cache", &self.face_cache)
            .finish()
    }
}

/// Configures a [`Factory`].
pub struct FactoryBuilder {
    config: FactoryConfig,
    analyzer: Arc<dyn FontAnalyzer>,
    table_reader: Arc<dyn TableReader>,
    rasterizer: Arc<dyn Rasterizer>,
}

impl FactoryBuilder {
    pub fn new() -> FactoryBuilder {
        FactoryBuilder {
            config: FactoryConfig::default(),
            analyzer: Arc::new(OpenTypeAnalyzer),
            table_reader: Arc::new(SfntTableReader),
            rasterizer: Arc::new(OutlineRasterizer),
        }
    }

    pub fn config(mut self, config: FactoryConfig) -> FactoryBuilder {
        self.config = config;
        self
    }

    pub fn analyzer(mut self, analyzer: Arc<dyn FontAnalyzer>) -> FactoryBuilder {
        self.analyzer = analyzer;
        self
    }

    pub fn table_reader(mut self, table_reader: Arc<dyn TableReader>) -> FactoryBuilder {
        self.table_reader = table_reader;
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> FactoryBuilder {
        self.rasterizer = rasterizer;
        self
    }

    pub fn build(self) -> Factory {
        Factory {
            config: self.config,
            services: FaceServices {
                analyzer: self.analyzer,
                table_reader: self.table_reader,
                rasterizer: self.rasterizer,
            },
            local_loader: Arc::new(LocalFileLoader::new()),
            memory_loader: Arc::new(InMemoryFileLoader::new()),
            face_cache: Arc::new(FaceCache::new()),
            system_collection: Mutex::new(None),
            eudc_collection: Mutex::new(None),
        }
    }
}

impl Default for FactoryBuilder {
    #[inline]
    fn default() -> FactoryBuilder {
        FactoryBuilder::new()
    }
}
