// font-collection/src/loaders/local.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A loader for font files on the local file system.
//!
//! A reference key is the file's last write time, as little-endian nanoseconds since the UNIX
//! epoch in 8 bytes, followed by its path in UTF-8.

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::FontLoadingError;
use crate::file::{FontFile, FontFileLoader, FontFileStream};

const WRITE_TIME_SIZE: usize = 8;

/// Maps local files and shares the mapping among all streams for one key.
#[derive(Debug, Default)]
pub struct LocalFileLoader {
    streams: Mutex<HashMap<Vec<u8>, Weak<LocalFileStream>>>,
}

impl LocalFileLoader {
    pub fn new() -> LocalFileLoader {
        LocalFileLoader::default()
    }

    /// Builds the reference key for `path` from its current modification time.
    pub fn reference_key(path: &Path) -> Result<Vec<u8>, FontLoadingError> {
        let modified = fs::metadata(path)?.modified()?;
        let path = path.to_str().ok_or(FontLoadingError::InvalidReferenceKey)?;
        let nanos = modified
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos() as u64)
            .unwrap_or(0);

        let mut key = vec![0; WRITE_TIME_SIZE];
        LittleEndian::write_u64(&mut key, nanos);
        key.extend_from_slice(path.as_bytes());
        Ok(key)
    }

    /// Returns a file handle for `path`, loaded through `loader`.
    pub fn create_font_file(
        loader: &Arc<LocalFileLoader>,
        path: &Path,
    ) -> Result<FontFile, FontLoadingError> {
        let key = LocalFileLoader::reference_key(path)?;
        Ok(FontFile::new(loader.clone(), key))
    }

    pub fn file_path_from_key(key: &[u8]) -> Result<PathBuf, FontLoadingError> {
        let path = key
            .get(WRITE_TIME_SIZE..)
            .ok_or(FontLoadingError::InvalidReferenceKey)?;
        let path = std::str::from_utf8(path).map_err(|_| FontLoadingError::InvalidReferenceKey)?;
        Ok(PathBuf::from(path))
    }

    pub fn last_write_time_from_key(key: &[u8]) -> Result<SystemTime, FontLoadingError> {
        let nanos = key
            .get(..WRITE_TIME_SIZE)
            .map(LittleEndian::read_u64)
            .ok_or(FontLoadingError::InvalidReferenceKey)?;
        Ok(UNIX_EPOCH + Duration::from_nanos(nanos))
    }
}

impl FontFileLoader for LocalFileLoader {
    fn create_stream_from_key(
        &self,
        reference_key: &[u8],
    ) -> Result<Arc<dyn FontFileStream>, FontLoadingError> {
        let mut streams = self.streams.lock();
        if let Some(stream) = streams.get(reference_key).and_then(Weak::upgrade) {
            return Ok(stream);
        }
        streams.retain(|_, stream| stream.strong_count() > 0);

        let path = LocalFileLoader::file_path_from_key(reference_key)?;
        let last_write_time = LocalFileLoader::last_write_time_from_key(reference_key)?;
        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let stream = Arc::new(LocalFileStream {
            mmap,
            last_write_time,
        });
        streams.insert(reference_key.to_vec(), Arc::downgrade(&stream));
        debug!("mapped font file {}", path.display());
        Ok(stream)
    }
}

/// A memory-mapped local file.
#[derive(Debug)]
pub struct LocalFileStream {
    mmap: Mmap,
    last_write_time: SystemTime,
}

impl FontFileStream for LocalFileStream {
    #[inline]
    fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    #[inline]
    fn last_write_time(&self) -> Option<SystemTime> {
        Some(self.last_write_time)
    }
}
