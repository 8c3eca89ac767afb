// font-collection/src/canvas.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An in-memory alpha surface that glyph bitmaps are composited into.

use pathfinder_geometry::vector::Vector2I;
use std::cmp;

/// Alpha value of a fully covered pixel.
pub const ALPHA_MAX: u8 = 0xff;

lazy_static! {
    static ref BITMAP_1BPP_TO_8BPP_LUT: [[u8; 8]; 256] = {
        let mut lut = [[0; 8]; 256];
        for byte in 0..0x100 {
            let mut value = [0; 8];
            for bit in 0..8 {
                if (byte & (0x80 >> bit)) != 0 {
                    value[bit] = ALPHA_MAX;
                }
            }
            lut[byte] = value
        }
        lut
    };
}

/// An in-memory alpha surface.
///
/// Blits combine with what is already there by bitwise OR, so overlapping glyphs never erase
/// each other.
#[derive(Clone, Debug)]
pub struct Canvas {
    /// The raw pixel data.
    pub pixels: Vec<u8>,
    /// The size of the buffer, in pixels.
    pub size: Vector2I,
    /// The number of *bytes* between successive rows.
    pub stride: usize,
    /// The image format of the canvas.
    pub format: Format,
}

impl Canvas {
    /// Creates a new blank canvas with the given pixel size and format.
    ///
    /// Stride is automatically calculated from width. The canvas is initialized to zero alpha.
    #[inline]
    pub fn new(size: Vector2I, format: Format) -> Canvas {
        let width = cmp::max(size.x(), 0) as usize;
        let height = cmp::max(size.y(), 0) as usize;
        let stride = width * format.bytes_per_pixel() as usize;
        Canvas {
            pixels: vec![0; stride * height],
            size,
            stride,
            format,
        }
    }

    /// ORs an 8-bit alpha bitmap of `src_size` into this canvas with its top left corner at
    /// `origin`. Pixels outside the canvas are dropped.
    pub fn blit_from_a8(
        &mut self,
        src_bytes: &[u8],
        src_size: Vector2I,
        src_stride: usize,
        origin: Vector2I,
    ) {
        match self.format {
            Format::A8 => self.blit_from_with::<BlitA8OrA8>(src_bytes, src_size, src_stride, origin),
            Format::Rgb24 => {
                self.blit_from_with::<BlitA8OrRgb24>(src_bytes, src_size, src_stride, origin)
            }
        }
    }

    /// ORs a 1-bit bitmap (most significant bit first) into this canvas. Set bits become
    /// `ALPHA_MAX` in every channel.
    pub fn blit_from_bitmap_1bpp(
        &mut self,
        src_bytes: &[u8],
        src_size: Vector2I,
        src_stride: usize,
        origin: Vector2I,
    ) {
        let width = cmp::max(src_size.x(), 0) as usize;
        let expanded_stride = width;
        let mut expanded = vec![0; expanded_stride * cmp::max(src_size.y(), 0) as usize];
        for (y, dest_row) in expanded.chunks_mut(cmp::max(expanded_stride, 1)).enumerate() {
            let src_row_start = y * src_stride;
            let src_row_stride = (width + 7) / 8;
            let src_row = match src_bytes.get(src_row_start..src_row_start + src_row_stride) {
                Some(src_row) => src_row,
                None => break,
            };
            for (x, &byte) in src_row.iter().enumerate() {
                let pattern = &BITMAP_1BPP_TO_8BPP_LUT[byte as usize];
                let dest_start = x * 8;
                let dest_end = cmp::min(dest_start + 8, width);
                dest_row[dest_start..dest_end].copy_from_slice(&pattern[0..dest_end - dest_start]);
            }
        }
        self.blit_from_a8(&expanded, src_size, expanded_stride, origin)
    }

    fn blit_from_with<B>(
        &mut self,
        src_bytes: &[u8],
        src_size: Vector2I,
        src_stride: usize,
        origin: Vector2I,
    ) where
        B: Blit,
    {
        let dest_bytes_per_pixel = self.format.bytes_per_pixel() as usize;

        // Clip the source rectangle against the canvas.
        let left = cmp::max(0, -origin.x());
        let top = cmp::max(0, -origin.y());
        let right = cmp::min(src_size.x(), self.size.x() - origin.x());
        let bottom = cmp::min(src_size.y(), self.size.y() - origin.y());
        if left >= right || top >= bottom {
            return;
        }
        let width = (right - left) as usize;

        for y in top..bottom {
            let src_row_start = y as usize * src_stride + left as usize;
            let dest_y = (origin.y() + y) as usize;
            let dest_x = (origin.x() + left) as usize;
            let dest_row_start = dest_y * self.stride + dest_x * dest_bytes_per_pixel;
            let dest_row_end = dest_row_start + width * dest_bytes_per_pixel;
            let src_row = match src_bytes.get(src_row_start..src_row_start + width) {
                Some(src_row) => src_row,
                None => return,
            };
            B::blit(&mut self.pixels[dest_row_start..dest_row_end], src_row)
        }
    }
}

/// The image format for the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    /// R8G8B8, one alpha value per subpixel.
    Rgb24,
    /// A8.
    A8,
}

impl Format {
    /// Returns the number of bits per pixel that this image format corresponds to.
    #[inline]
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            Format::Rgb24 => 24,
            Format::A8 => 8,
        }
    }

    /// Returns the number of bytes per pixel that this image format corresponds to.
    #[inline]
    pub fn bytes_per_pixel(self) -> u8 {
        self.bits_per_pixel() / 8
    }
}

trait Blit {
    fn blit(dest: &mut [u8], src: &[u8]);
}

struct BlitA8OrA8;

impl Blit for BlitA8OrA8 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.iter_mut().zip(src.iter()) {
            *dest |= *src;
        }
    }
}

struct BlitA8OrRgb24;

impl Blit for BlitA8OrRgb24 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.chunks_mut(3).zip(src.iter()) {
            let value = dest[0] | *src;
            dest[0] = value;
            dest[1] = value;
            dest[2] = value;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_bit_rows_expand_and_or() {
        let mut canvas = Canvas::new(Vector2I::new(4, 2), Format::A8);
        canvas.pixels[3] = 0x10;
        // Row 0: pixels 0 and 2 set. Row 1: pixel 3 set.
        canvas.blit_from_bitmap_1bpp(
            &[0b1010_0000, 0b0001_0000],
            Vector2I::new(4, 2),
            1,
            Vector2I::new(0, 0),
        );
        assert_eq!(canvas.pixels, vec![0xff, 0, 0xff, 0x10, 0, 0, 0, 0xff]);
    }

    #[test]
    fn blit_is_clipped_to_canvas() {
        let mut canvas = Canvas::new(Vector2I::new(2, 2), Format::Rgb24);
        let src = [0x40, 0x80, 0xc0, 0xff];
        canvas.blit_from_a8(&src, Vector2I::new(2, 2), 2, Vector2I::new(1, -1));
        assert_eq!(canvas.pixels, vec![0, 0, 0, 0xc0, 0xc0, 0xc0, 0, 0, 0, 0, 0, 0]);
    }
}
