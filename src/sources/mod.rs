// font-collection/src/sources/mod.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Enumerators that feed font files to collection building.

use crate::error::FontLoadingError;
use crate::file::FontFile;

#[cfg(all(feature = "source", not(target_arch = "wasm32")))]
mod fs;
#[cfg(all(feature = "source", not(target_arch = "wasm32")))]
pub use self::fs::{default_font_directories, DirectoryEnumerator};

mod mem;
mod multi;

pub use self::mem::FileListEnumerator;
pub use self::multi::MultiEnumerator;

/// A lazy, finite sequence of font files.
///
/// `Ok(None)` ends the sequence. An error aborts whatever is consuming it.
pub trait FontFileEnumerator {
    fn move_next(&mut self) -> Result<Option<FontFile>, FontLoadingError>;
}
