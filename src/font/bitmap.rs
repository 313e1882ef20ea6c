//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use super::{BitmapFormat, RasterizedGlyph};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq)]
/// 8-bit coverage bitmap positioned relative to the pen.
pub(crate) struct CoverageBitmap {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub rows: u32,
    pub data: Vec<u8>,
}

impl CoverageBitmap {
    /// Normalizes a rasterizer bitmap (gray or mono) to one byte per pixel.
    pub fn from_raster(glyph: &RasterizedGlyph) -> Self {
        let (width, rows) = (glyph.width as usize, glyph.rows as usize);
        let mut data = vec![0u8; width * rows];
        for y in 0..rows {
            for x in 0..width {
                let value = match glyph.format {
                    BitmapFormat::Gray8 => glyph.buffer.get(y * glyph.pitch + x).copied().unwrap_or(0),
                    BitmapFormat::Mono => {
                        let byte = glyph.buffer.get(y * glyph.pitch + x / 8).copied().unwrap_or(0);
                        if byte & (1 << (7 - (x % 8))) != 0 { 255 } else { 0 }
                    }
                };
                data[x + y * width] = value;
            }
        }
        Self {
            left: glyph.left,
            top: glyph.top,
            width: glyph.width,
            rows: glyph.rows,
            data,
        }
    }

    pub fn is_empty(&self) -> bool { self.width == 0 || self.rows == 0 }

    fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.rows as i32 {
            return 0;
        }
        self.data[x as usize + y as usize * self.width as usize]
    }

    /// Widens every stroke by one pixel to the right and upwards.
    pub fn embolden(&self) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        let (width, rows) = (self.width + 1, self.rows + 1);
        let mut data = vec![0u8; (width * rows) as usize];
        for y in 0..rows as i32 {
            for x in 0..width as i32 {
                // every source pixel covers a 2x2 block
                let value = self
                    .get(x, y - 1)
                    .max(self.get(x - 1, y - 1))
                    .max(self.get(x, y))
                    .max(self.get(x - 1, y));
                data[(x + y * width as i32) as usize] = value;
            }
        }
        Self {
            left: self.left,
            top: self.top + 1,
            width,
            rows,
            data,
        }
    }
}

/// Dilates coverage bitmaps to produce glyph outlines.
///
/// Disk kernels are cached per thickness, the stroker is created the first time an outlined
/// glyph is requested and then lives as long as the font.
#[derive(Default)]
pub(crate) struct BitmapStroker {
    kernels: HashMap<u32, (i32, Vec<(i32, i32, f32)>)>,
}

impl BitmapStroker {
    pub fn new() -> Self { Self::default() }

    fn kernel(&mut self, thickness: f32) -> &(i32, Vec<(i32, i32, f32)>) {
        self.kernels.entry(thickness.to_bits()).or_insert_with(|| {
            let radius = thickness.ceil().max(1.0) as i32;
            let mut taps = Vec::new();
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let distance = ((dx * dx + dy * dy) as f32).sqrt();
                    let weight = (thickness + 1.0 - distance).clamp(0.0, 1.0);
                    if weight > 0.0 {
                        taps.push((dx, dy, weight));
                    }
                }
            }
            (radius, taps)
        })
    }

    /// Returns the outline of `bitmap` with the given thickness in pixels.
    pub fn stroke(&mut self, bitmap: &CoverageBitmap, thickness: f32) -> CoverageBitmap {
        if bitmap.is_empty() || thickness <= 0.0 {
            return bitmap.clone();
        }
        let (radius, taps) = self.kernel(thickness);
        let radius = *radius;
        let width = bitmap.width + 2 * radius as u32;
        let rows = bitmap.rows + 2 * radius as u32;
        let mut data = vec![0u8; (width * rows) as usize];
        for y in 0..rows as i32 {
            for x in 0..width as i32 {
                let (sx, sy) = (x - radius, y - radius);
                let mut value = 0.0f32;
                for (dx, dy, weight) in taps {
                    let coverage = bitmap.get(sx + dx, sy + dy) as f32 * weight;
                    if coverage > value {
                        value = coverage;
                    }
                }
                data[(x + y * width as i32) as usize] = value.round() as u8;
            }
        }
        CoverageBitmap {
            left: bitmap.left - radius,
            top: bitmap.top + radius,
            width,
            rows,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> CoverageBitmap {
        CoverageBitmap {
            left: 1,
            top: 5,
            width: 1,
            rows: 1,
            data: vec![255],
        }
    }

    #[test]
    fn mono_bitmaps_unpack_to_full_coverage() {
        let glyph = RasterizedGlyph {
            advance: 64 * 4,
            lsb_delta: 0,
            rsb_delta: 0,
            left: 0,
            top: 2,
            width: 10,
            rows: 2,
            pitch: 2,
            format: BitmapFormat::Mono,
            buffer: vec![0b1000_0001, 0b0100_0000, 0, 0b1000_0000],
            stroked: false,
            emboldened: false,
        };
        let bitmap = CoverageBitmap::from_raster(&glyph);
        assert_eq!(bitmap.data[0], 255);
        assert_eq!(bitmap.data[1], 0);
        assert_eq!(bitmap.data[7], 255);
        assert_eq!(bitmap.data[9], 255);
        assert_eq!(bitmap.data[10 + 8], 255);
        assert_eq!(bitmap.data.iter().filter(|v| **v == 255).count(), 4);
    }

    #[test]
    fn embolden_grows_by_one_pixel() {
        let bold = dot().embolden();
        assert_eq!((bold.width, bold.rows), (2, 2));
        assert_eq!(bold.top, 6);
        assert_eq!(bold.data, vec![255, 255, 255, 255]);
    }

    #[test]
    fn stroke_dilates_around_glyph() {
        let mut stroker = BitmapStroker::new();
        let outline = stroker.stroke(&dot(), 1.0);
        assert_eq!((outline.width, outline.rows), (3, 3));
        assert_eq!((outline.left, outline.top), (0, 6));
        assert_eq!(outline.data[4], 255);
        assert_eq!(outline.data[1], 255);
        // corner at distance sqrt(2) gets partial coverage
        assert!(outline.data[0] > 0 && outline.data[0] < 255);
    }
}
