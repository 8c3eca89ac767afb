// font-collection/src/sources/mem.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An enumerator over a fixed list of files.

use std::vec;

use crate::error::FontLoadingError;
use crate::file::FontFile;
use crate::sources::FontFileEnumerator;

#[derive(Debug)]
pub struct FileListEnumerator {
    files: vec::IntoIter<FontFile>,
}

impl FileListEnumerator {
    /// Creates an enumerator that yields `files` in order.
    pub fn new(files: Vec<FontFile>) -> FileListEnumerator {
        FileListEnumerator {
            files: files.into_iter(),
        }
    }
}

impl FontFileEnumerator for FileListEnumerator {
    #[inline]
    fn move_next(&mut self) -> Result<Option<FontFile>, FontLoadingError> {
        Ok(self.files.next())
    }
}
