// font-collection/src/loaders/memory.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A loader for font data held in memory. Keys are 4-byte little-endian indices.

use byteorder::{ByteOrder, LittleEndian};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::FontLoadingError;
use crate::file::{FontFile, FontFileLoader, FontFileStream};

#[derive(Default)]
pub struct InMemoryFileLoader {
    files: Mutex<Vec<Arc<Vec<u8>>>>,
}

impl InMemoryFileLoader {
    pub fn new() -> InMemoryFileLoader {
        InMemoryFileLoader::default()
    }

    /// Registers `data` and returns a file handle for it.
    pub fn create_in_memory_font_file_reference(
        loader: &Arc<InMemoryFileLoader>,
        data: Vec<u8>,
    ) -> FontFile {
        let mut files = loader.files.lock();
        let mut key = vec![0; 4];
        LittleEndian::write_u32(&mut key, files.len() as u32);
        files.push(Arc::new(data));
        FontFile::new(loader.clone(), key)
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().len()
    }
}

impl FontFileLoader for InMemoryFileLoader {
    fn create_stream_from_key(
        &self,
        reference_key: &[u8],
    ) -> Result<Arc<dyn FontFileStream>, FontLoadingError> {
        if reference_key.len() != 4 {
            return Err(FontLoadingError::InvalidReferenceKey);
        }
        let index = LittleEndian::read_u32(reference_key) as usize;
        let data = self
            .files
            .lock()
            .get(index)
            .cloned()
            .ok_or(FontLoadingError::InvalidReferenceKey)?;
        Ok(Arc::new(InMemoryStream(data)))
    }
}

struct InMemoryStream(Arc<Vec<u8>>);

impl FontFileStream for InMemoryStream {
    #[inline]
    fn bytes(&self) -> &[u8] {
        &self.0
    }
}
