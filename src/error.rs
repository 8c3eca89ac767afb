// font-collection/src/error.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various types of errors that `font-collection` can return.

use std::convert::From;
use std::io;
use thiserror::Error;

/// Reasons why a file, stream, or face might fail to load.
#[derive(Debug, Error)]
pub enum FontLoadingError {
    /// The data was of a format the analyzer didn't recognize.
    #[error("unknown format")]
    UnknownFormat,

    /// Attempted to load an invalid index in a TrueType or OpenType font collection.
    ///
    /// For example, if a `.ttc` file has 2 fonts in it, and you ask for the 5th one, you'll get
    /// this error.
    #[error("no such font in the collection")]
    NoSuchFontInCollection,

    /// Attempted to load a malformed or corrupted font.
    #[error("parse error")]
    Parse,

    /// The face carries no usable family name.
    #[error("face has no family name")]
    MissingFamilyName,

    /// The reference key does not name a file that exists.
    #[error("font file not found")]
    FileNotFound,

    /// The reference key was not produced by this loader.
    #[error("invalid reference key")]
    InvalidReferenceKey,

    /// A disk or similar I/O error occurred while attempting to load the font.
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for FontLoadingError {
    fn from(error: io::Error) -> FontLoadingError {
        if error.kind() == io::ErrorKind::NotFound {
            FontLoadingError::FileNotFound
        } else {
            FontLoadingError::Io(error)
        }
    }
}

/// Reasons why a collection, family, or font list might fail a lookup.
#[derive(PartialEq, Debug, Error)]
pub enum SelectionError {
    /// No font matching the given query was found.
    #[error("no font found")]
    NotFound,
    /// The family has no faces to match against.
    #[error("family has no fonts")]
    NoFont,
    /// The index is past the end of the collection, family, or list.
    #[error("index {index} out of range (count {count})")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The number of available items.
        count: usize,
    },
    /// The source was inaccessible because of an I/O or similar error.
    #[error("failed to access source")]
    CannotAccessSource,
}

/// Reasons why glyph run analysis or color glyph translation might fail.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A mode, index, or argument is outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The caller's buffer cannot hold the requested texture.
    #[error("buffer too small: {required} bytes required, {provided} provided")]
    NotSufficientBuffer {
        /// Bytes needed for the requested bounds.
        required: usize,
        /// Bytes supplied by the caller.
        provided: usize,
    },
    /// The texture type differs from the one this analysis produces.
    #[error("unsupported operation")]
    UnsupportedOperation,
    /// The enumerator has no current run.
    #[error("no current run")]
    NotValidState,
    /// The face has no color information for this run or palette.
    #[error("no color information")]
    NoColor,
    /// The query is part of the interface but has no implementation.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    /// The face could not be read.
    #[error("face loading failed: {0}")]
    Loading(#[from] FontLoadingError),
}

/// Reasons why a factory configuration might fail to load.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
