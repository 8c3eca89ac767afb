// font-collection/src/file.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Font files as opaque (loader, reference key) pairs.
//!
//! A reference key is a byte string that identifies the backing storage of a file to the loader
//! that produced it. Two files are the same file when their keys are byte-equal.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::FontLoadingError;

/// Read access to the bytes of a font file.
pub trait FontFileStream: Send + Sync {
    /// The whole file.
    fn bytes(&self) -> &[u8];

    /// When the backing storage was last modified, if known.
    fn last_write_time(&self) -> Option<SystemTime> {
        None
    }
}

impl FontFileStream for Vec<u8> {
    #[inline]
    fn bytes(&self) -> &[u8] {
        self
    }
}

/// Turns reference keys into streams.
pub trait FontFileLoader: Send + Sync {
    fn create_stream_from_key(
        &self,
        reference_key: &[u8],
    ) -> Result<Arc<dyn FontFileStream>, FontLoadingError>;
}

/// A shared handle to one font file.
#[derive(Clone)]
pub struct FontFile(Arc<FontFileInner>);

struct FontFileInner {
    loader: Arc<dyn FontFileLoader>,
    reference_key: Vec<u8>,
}

impl FontFile {
    /// Creates a handle for `reference_key` as understood by `loader`.
    pub fn new(loader: Arc<dyn FontFileLoader>, reference_key: Vec<u8>) -> FontFile {
        FontFile(Arc::new(FontFileInner {
            loader,
            reference_key,
        }))
    }

    #[inline]
    pub fn reference_key(&self) -> &[u8] {
        &self.0.reference_key
    }

    #[inline]
    pub fn loader(&self) -> &Arc<dyn FontFileLoader> {
        &self.0.loader
    }

    /// Opens a stream over the file's bytes.
    pub fn stream(&self) -> Result<Arc<dyn FontFileStream>, FontLoadingError> {
        self.0.loader.create_stream_from_key(&self.0.reference_key)
    }

    /// Whether both handles refer to the same storage: the same handle, or byte-equal keys.
    pub fn is_same(&self, other: &FontFile) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.reference_key == other.0.reference_key
    }

    /// Whether both values are clones of one handle.
    #[inline]
    pub fn ptr_eq(&self, other: &FontFile) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for FontFile {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FontFile")
            .field("reference_key", &self.0.reference_key)
            .finish()
    }
}
