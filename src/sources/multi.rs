// font-collection/src/sources/multi.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An enumerator that concatenates other enumerators.

use crate::error::FontLoadingError;
use crate::file::FontFile;
use crate::sources::FontFileEnumerator;

#[allow(missing_debug_implementations)]
pub struct MultiEnumerator {
    subenumerators: Vec<Box<dyn FontFileEnumerator>>,
    current: usize,
}

impl MultiEnumerator {
    /// Creates an enumerator that yields all the files of the supplied enumerators, in order.
    pub fn from_enumerators(subenumerators: Vec<Box<dyn FontFileEnumerator>>) -> MultiEnumerator {
        MultiEnumerator {
            subenumerators,
            current: 0,
        }
    }
}

impl FontFileEnumerator for MultiEnumerator {
    fn move_next(&mut self) -> Result<Option<FontFile>, FontLoadingError> {
        while let Some(subenumerator) = self.subenumerators.get_mut(self.current) {
            if let Some(file) = subenumerator.move_next()? {
                return Ok(Some(file));
            }
            self.current += 1;
        }
        Ok(None)
    }
}
