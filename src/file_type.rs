// font-collection/src/file_type.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The type of a font file and of the faces inside it.

/// The type of a font file: either a single font or a TrueType/OpenType collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FileType {
    /// The font file represents a single font (`.ttf`, `.otf`, etc.)
    Single,
    /// The font file represents a collection of fonts (`.ttc`, `.otc`, etc.)
    Collection(u32),
}

/// The outline format of the faces in a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceType {
    /// OpenType with CFF outlines.
    Cff,
    /// TrueType or OpenType with `glyf` outlines.
    TrueType,
    /// A face inside a TrueType/OpenType collection.
    OpenTypeCollection,
    /// Anything the analyzer does not recognize.
    Unknown,
}

/// What an analyzer learned about a file without parsing any face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FileAnalysis {
    /// Whether faces in this file can be loaded at all.
    pub is_supported: bool,
    pub file_type: FileType,
    pub face_type: FaceType,
    pub face_count: u32,
}

impl FileAnalysis {
    /// The result for data the analyzer rejects.
    pub fn unsupported() -> FileAnalysis {
        FileAnalysis {
            is_supported: false,
            file_type: FileType::Single,
            face_type: FaceType::Unknown,
            face_count: 0,
        }
    }
}
