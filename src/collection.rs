// font-collection/src/collection.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A set of font families built from an enumeration of font files.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analyzer::FontAnalyzer;
use crate::config::Replacement;
use crate::error::{FontLoadingError, SelectionError};
use crate::family::{FontFamily, FontFamilyData};
use crate::file::{FontFile, FontFileStream};
use crate::file_type::FileAnalysis;
use crate::font::Font;
use crate::font_data::FontData;
use crate::font_face::FontFace;
use crate::localized_strings::{LocalizedStrings, EN_US};
use crate::simulation;
use crate::sources::FontFileEnumerator;

/// An immutable set of families.
#[derive(Clone, Debug)]
pub struct FontCollection {
    families: Vec<Arc<FontFamilyData>>,
    is_system: bool,
}

impl FontCollection {
    /// Scans every file of `enumerator` and adds synthesized faces.
    ///
    /// Files and faces that cannot be read are skipped. An error from the enumerator itself
    /// aborts the build.
    pub fn from_enumerator(
        enumerator: &mut dyn FontFileEnumerator,
        analyzer: &Arc<dyn FontAnalyzer>,
    ) -> Result<FontCollection, FontLoadingError> {
        let mut builder = CollectionBuilder::new();
        builder.scan(enumerator, analyzer)?;
        builder.add_simulations();
        Ok(builder.build(false))
    }

    /// Like [`FontCollection::from_enumerator`], then registers `replacements` for families the
    /// scan did not find.
    pub fn system_from_enumerator(
        enumerator: &mut dyn FontFileEnumerator,
        analyzer: &Arc<dyn FontAnalyzer>,
        replacements: &BTreeMap<String, Replacement>,
    ) -> Result<FontCollection, FontLoadingError> {
        debug!("building system font collection");
        let mut builder = CollectionBuilder::new();
        builder.scan(enumerator, analyzer)?;
        builder.add_simulations();
        builder.add_replacements(replacements);
        Ok(builder.build(true))
    }

    /// A collection with no families.
    pub fn empty() -> FontCollection {
        CollectionBuilder::new().build(false)
    }

    #[inline]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    pub fn family(&self, index: usize) -> Result<FontFamily, SelectionError> {
        match self.families.get(index) {
            Some(family) => Ok(FontFamily::new(family.clone())),
            None => Err(SelectionError::OutOfRange {
                index,
                count: self.families.len(),
            }),
        }
    }

    /// Index of the family with a name equal to `name` in any locale, ignoring case.
    pub fn find_family_name(&self, name: &str) -> Option<usize> {
        find_family(self.families.iter().map(|family| &**family), name)
    }

    /// Looks up a family by name. Returns `NotFound` when there is none.
    pub fn family_by_name(&self, name: &str) -> Result<FontFamily, SelectionError> {
        match self.find_family_name(name) {
            Some(index) => self.family(index),
            None => Err(SelectionError::NotFound),
        }
    }

    /// The font whose file, index, and simulations are those of `face`.
    pub fn font_from_font_face(&self, face: &FontFace) -> Result<Font, SelectionError> {
        let file = face.files().first().ok_or(SelectionError::NotFound)?;
        for family in &self.families {
            for font in family.fonts() {
                if font.is_same_face(file, face.index(), face.simulations()) {
                    return Ok(Font::new(font.clone(), family.clone()));
                }
            }
        }
        Err(SelectionError::NotFound)
    }

    pub fn families(&self) -> impl Iterator<Item = FontFamily> + '_ {
        self.families
            .iter()
            .map(|family| FontFamily::new(family.clone()))
    }
}

fn find_family<'a, I>(families: I, name: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a FontFamilyData>,
{
    families
        .into_iter()
        .position(|family| family.family_names().contains_string_ignore_case(name))
}

/// Collection construction: scanning, then simulation, then, for system collections, family
/// replacement.
pub(crate) struct CollectionBuilder {
    families: Vec<FontFamilyData>,
}

impl CollectionBuilder {
    pub(crate) fn new() -> CollectionBuilder {
        CollectionBuilder { families: vec![] }
    }

    pub(crate) fn scan(
        &mut self,
        enumerator: &mut dyn FontFileEnumerator,
        analyzer: &Arc<dyn FontAnalyzer>,
    ) -> Result<(), FontLoadingError> {
        let mut scanned: Vec<FontFile> = vec![];
        while let Some(file) = enumerator.move_next()? {
            if scanned.iter().any(|scanned| scanned.is_same(&file)) {
                continue;
            }
            let (stream, analysis) = match open_supported_file(&file, analyzer) {
                Some(opened) => opened,
                None => continue,
            };
            scanned.push(file.clone());

            for index in 0..analysis.face_count {
                let data = match FontData::new(
                    file.clone(),
                    &stream,
                    index,
                    analysis.face_type,
                    analyzer.clone(),
                ) {
                    Ok(data) => data,
                    Err(FontLoadingError::MissingFamilyName) if index == 0 => {
                        warn!("{:?} has no family name, skipping file", file);
                        break;
                    }
                    Err(error) => {
                        debug!("skipping face {} of {:?}: {}", index, file, error);
                        continue;
                    }
                };

                let family_name = data.family_names().en_string().to_owned();
                if family_name.starts_with('.') {
                    warn!("ignoring face {}", family_name);
                    continue;
                }

                match find_family(&self.families, &family_name) {
                    Some(family_index) => self.families[family_index].add_font(Arc::new(data)),
                    None => {
                        let mut family = FontFamilyData::new(data.family_names().clone());
                        family.add_font(Arc::new(data));
                        self.families.push(family);
                    }
                }
            }
        }
        Ok(())
    }

    /// Adds a family named `name`, under the empty locale, holding every face of `file`.
    ///
    /// Returns false and adds nothing if the file cannot be read.
    pub(crate) fn add_file_as_family(
        &mut self,
        name: &str,
        file: &FontFile,
        analyzer: &Arc<dyn FontAnalyzer>,
    ) -> bool {
        let (stream, analysis) = match open_supported_file(file, analyzer) {
            Some(opened) => opened,
            None => return false,
        };

        let names = Arc::new(LocalizedStrings::with_string("", name));
        let mut family = FontFamilyData::new(names);
        for index in 0..analysis.face_count {
            match FontData::new(
                file.clone(),
                &stream,
                index,
                analysis.face_type,
                analyzer.clone(),
            ) {
                Ok(data) => family.add_font(Arc::new(data)),
                Err(error) => debug!("skipping face {} of {:?}: {}", index, file, error),
            }
        }
        self.families.push(family);
        true
    }

    pub(crate) fn has_family(&self, name: &str) -> bool {
        find_family(&self.families, name).is_some()
    }

    pub(crate) fn add_simulations(&mut self) {
        for family in &mut self.families {
            simulation::add_bold_simulations(family);
            simulation::add_oblique_simulations(family);
        }
    }

    /// For each target family that is missing, adds a family under the target name sharing the
    /// faces of the first candidate that exists.
    pub(crate) fn add_replacements(&mut self, replacements: &BTreeMap<String, Replacement>) {
        for (target, replacement) in replacements {
            if self.has_family(target) {
                trace!("{} is available, won't be replaced", target);
                continue;
            }
            for candidate in replacement.names() {
                if self.add_replacement(target, candidate) {
                    break;
                }
            }
        }
    }

    fn add_replacement(&mut self, target: &str, candidate: &str) -> bool {
        let index = match find_family(&self.families, candidate) {
            Some(index) => index,
            None => return false,
        };

        let mut family =
            FontFamilyData::new(Arc::new(LocalizedStrings::with_string(EN_US, target)));
        for font in self.families[index].fonts() {
            family.add_font(font.clone());
        }
        trace!(
            "replacement {} -> {}",
            target,
            self.families[index].family_names().en_string()
        );
        self.families.push(family);
        true
    }

    pub(crate) fn build(self, is_system: bool) -> FontCollection {
        FontCollection {
            families: self.families.into_iter().map(Arc::new).collect(),
            is_system,
        }
    }
}

fn open_supported_file(
    file: &FontFile,
    analyzer: &Arc<dyn FontAnalyzer>,
) -> Option<(Arc<dyn FontFileStream>, FileAnalysis)> {
    let stream = match file.stream() {
        Ok(stream) => stream,
        Err(error) => {
            debug!("failed to open {:?}: {}", file, error);
            return None;
        }
    };
    let analysis = analyzer.analyze(stream.bytes());
    if !analysis.is_supported || analysis.face_count == 0 {
        trace!(
            "unsupported font {:?} ({:?}, {} faces)",
            file,
            analysis.file_type,
            analysis.face_count
        );
        return None;
    }
    Some((stream, analysis))
}
