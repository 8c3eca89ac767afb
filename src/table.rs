// font-collection/src/table.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Raw access to OpenType tables through the sfnt table directory.

use byteorder::{BigEndian, ByteOrder};
use std::fmt::{self, Debug, Formatter};
use std::ops::Range;
use std::sync::Arc;

use crate::error::FontLoadingError;
use crate::file::FontFileStream;

/// A four-byte OpenType table tag, big-endian.
pub type Tag = u32;

pub const COLR: Tag = u32::from_be_bytes(*b"COLR");
pub const CPAL: Tag = u32::from_be_bytes(*b"CPAL");
pub const GASP: Tag = u32::from_be_bytes(*b"gasp");
pub const HHEA: Tag = u32::from_be_bytes(*b"hhea");
pub const OS_2: Tag = u32::from_be_bytes(*b"OS/2");
pub const VDMX: Tag = u32::from_be_bytes(*b"VDMX");

const COLLECTION_TAG: Tag = u32::from_be_bytes(*b"ttcf");
const TABLE_RECORD_SIZE: usize = 16;

/// A table inside a stream. Keeps the stream alive.
#[derive(Clone)]
pub struct FontTable {
    stream: Arc<dyn FontFileStream>,
    range: Range<usize>,
}

impl FontTable {
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.stream.bytes()[self.range.clone()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

impl Debug for FontTable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FontTable").field("range", &self.range).finish()
    }
}

/// Finds tables in font data.
pub trait TableReader: Send + Sync {
    /// Returns the table `tag` of face `face_index`, or `None` if the face lacks it.
    fn try_get_table(
        &self,
        stream: &Arc<dyn FontFileStream>,
        face_index: u32,
        tag: Tag,
    ) -> Result<Option<FontTable>, FontLoadingError>;
}

/// Reads the sfnt table directory of single fonts and `ttcf` collections.
#[derive(Clone, Copy, Debug, Default)]
pub struct SfntTableReader;

impl SfntTableReader {
    /// Byte range of `tag` within `data`.
    pub fn table_range(
        data: &[u8],
        face_index: u32,
        tag: Tag,
    ) -> Result<Option<Range<usize>>, FontLoadingError> {
        let directory = directory_offset(data, face_index)?;
        let table_count = read_u16(data, directory + 4)? as usize;
        for table_index in 0..table_count {
            let record = directory + 12 + table_index * TABLE_RECORD_SIZE;
            if read_u32(data, record)? != tag {
                continue;
            }
            let offset = read_u32(data, record + 8)? as usize;
            let length = read_u32(data, record + 12)? as usize;
            let end = offset.checked_add(length).ok_or(FontLoadingError::Parse)?;
            if end > data.len() {
                return Err(FontLoadingError::Parse);
            }
            return Ok(Some(offset..end));
        }
        Ok(None)
    }
}

impl TableReader for SfntTableReader {
    fn try_get_table(
        &self,
        stream: &Arc<dyn FontFileStream>,
        face_index: u32,
        tag: Tag,
    ) -> Result<Option<FontTable>, FontLoadingError> {
        let range = SfntTableReader::table_range(stream.bytes(), face_index, tag)?;
        Ok(range.map(|range| FontTable {
            stream: stream.clone(),
            range,
        }))
    }
}

fn directory_offset(data: &[u8], face_index: u32) -> Result<usize, FontLoadingError> {
    if read_u32(data, 0)? != COLLECTION_TAG {
        return if face_index == 0 {
            Ok(0)
        } else {
            Err(FontLoadingError::NoSuchFontInCollection)
        };
    }

    let font_count = read_u32(data, 8)?;
    if face_index >= font_count {
        return Err(FontLoadingError::NoSuchFontInCollection);
    }
    Ok(read_u32(data, 12 + face_index as usize * 4)? as usize)
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16, FontLoadingError> {
    data.get(offset..offset + 2)
        .map(BigEndian::read_u16)
        .ok_or(FontLoadingError::Parse)
}

pub(crate) fn read_i16(data: &[u8], offset: usize) -> Result<i16, FontLoadingError> {
    data.get(offset..offset + 2)
        .map(BigEndian::read_i16)
        .ok_or(FontLoadingError::Parse)
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Result<u32, FontLoadingError> {
    data.get(offset..offset + 4)
        .map(BigEndian::read_u32)
        .ok_or(FontLoadingError::Parse)
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use byteorder::WriteBytesExt;

    /// Builds a minimal sfnt with the given tables, data laid out after the directory.
    pub(crate) fn build_sfnt(tables: &[(Tag, &[u8])]) -> Vec<u8> {
        let mut data = vec![];
        data.write_u32::<BigEndian>(0x0001_0000).unwrap();
        data.write_u16::<BigEndian>(tables.len() as u16).unwrap();
        data.extend_from_slice(&[0; 6]);
        let mut offset = 12 + tables.len() * TABLE_RECORD_SIZE;
        for &(tag, bytes) in tables {
            data.write_u32::<BigEndian>(tag).unwrap();
            data.write_u32::<BigEndian>(0).unwrap();
            data.write_u32::<BigEndian>(offset as u32).unwrap();
            data.write_u32::<BigEndian>(bytes.len() as u32).unwrap();
            offset += bytes.len();
        }
        for &(_, bytes) in tables {
            data.extend_from_slice(bytes);
        }
        data
    }

    #[test]
    fn finds_table_in_single_font() {
        let data = build_sfnt(&[(GASP, &b"gasp-data"[..]), (COLR, &b"colr"[..])]);
        let range = SfntTableReader::table_range(&data, 0, COLR).unwrap().unwrap();
        assert_eq!(&data[range], b"colr");
        assert_eq!(SfntTableReader::table_range(&data, 0, CPAL).unwrap(), None);
        assert!(SfntTableReader::table_range(&data, 1, COLR).is_err());
    }

    #[test]
    fn finds_table_in_collection() {
        let font = build_sfnt(&[(VDMX, &b"vdmx"[..])]);
        let mut data = vec![];
        data.write_u32::<BigEndian>(COLLECTION_TAG).unwrap();
        data.write_u32::<BigEndian>(0x0001_0000).unwrap();
        data.write_u32::<BigEndian>(1).unwrap();
        data.write_u32::<BigEndian>(16).unwrap();
        // Table offsets are relative to the start of the file.
        let mut relocated = font.clone();
        let table_offset = BigEndian::read_u32(&font[20..24]) + 16;
        BigEndian::write_u32(&mut relocated[20..24], table_offset);
        data.extend_from_slice(&relocated);

        let range = SfntTableReader::table_range(&data, 0, VDMX).unwrap().unwrap();
        assert_eq!(&data[range], b"vdmx");
        match SfntTableReader::table_range(&data, 1, VDMX) {
            Err(FontLoadingError::NoSuchFontInCollection) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_directory_is_a_parse_error() {
        let data = build_sfnt(&[(GASP, &b"gasp"[..])]);
        match SfntTableReader::table_range(&data[..14], 0, GASP) {
            Err(FontLoadingError::Parse) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
