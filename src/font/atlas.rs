//
// Copyright 2023-Present (c) Raja Lehtihet & Wael El Oraiby
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
use super::TextureRect;
use log::debug;

/// Edge length of a freshly created atlas.
pub const INITIAL_ATLAS_SIZE: u32 = 128;

/// Edge length of the opaque block reserved at the atlas origin for line drawing.
pub const RESERVED_BLOCK_SIZE: u32 = 2;

const WHITE_TRANSPARENT: [u8; 4] = [0xFF, 0xFF, 0xFF, 0x00];
const WHITE_OPAQUE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Row {
    top: u32,
    height: u32,
    width: u32,
}

#[derive(Clone, Debug)]
/// Square RGBA texture that glyph bitmaps are packed into, shelf by shelf.
///
/// RGB stays white everywhere; alpha stores coverage so text can be tinted at draw time.
pub struct GlyphAtlas {
    size: u32,
    pixels: Vec<u8>,
    rows: Vec<Row>,
    next_row: u32,
    last_update_id: usize,
}

impl Default for GlyphAtlas {
    fn default() -> Self { Self::new() }
}

impl GlyphAtlas {
    /// Creates an empty atlas with the reserved white block in place.
    pub fn new() -> Self {
        let size = INITIAL_ATLAS_SIZE;
        let mut pixels = WHITE_TRANSPARENT.repeat((size * size) as usize);
        for y in 0..RESERVED_BLOCK_SIZE {
            for x in 0..RESERVED_BLOCK_SIZE {
                let index = ((x + y * size) * 4) as usize;
                pixels[index..index + 4].copy_from_slice(&WHITE_OPAQUE);
            }
        }
        Self {
            size,
            pixels,
            rows: Vec::new(),
            next_row: RESERVED_BLOCK_SIZE + 1,
            last_update_id: 0,
        }
    }

    /// Width and height of the atlas in texels.
    pub fn size(&self) -> u32 { self.size }

    /// RGBA8 pixels, row major.
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Returns the alpha (coverage) value of one texel, or 0 outside the atlas.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.size || y >= self.size {
            return 0;
        }
        self.pixels[((x + y * self.size) * 4 + 3) as usize]
    }

    /// Returns a value that changes whenever pixels are modified.
    pub fn last_update_id(&self) -> usize { self.last_update_id }

    /// Allocates a `width` x `height` rectangle, growing the atlas if needed.
    ///
    /// Existing shelves are reused when the requested height is between 70% and 100% of the
    /// shelf height; among those the closest fit wins (later shelves win ties). Otherwise a new
    /// shelf 10% taller than the request is opened below the last one.
    pub fn find_available_glyph_rect(&mut self, width: u32, height: u32) -> TextureRect {
        let mut best: Option<usize> = None;
        let mut best_ratio = 0.0f32;
        for (index, row) in self.rows.iter().enumerate() {
            let ratio = height as f32 / row.height as f32;
            if !(0.7..=1.0).contains(&ratio) {
                continue;
            }
            if width > self.size - row.width {
                continue;
            }
            if ratio < best_ratio {
                continue;
            }
            best = Some(index);
            best_ratio = ratio;
        }

        let index = match best {
            Some(index) => index,
            None => {
                let row_height = height + height / 10;
                while self.next_row + row_height >= self.size || width >= self.size {
                    self.grow();
                }
                self.rows.push(Row {
                    top: self.next_row,
                    height: row_height,
                    width: 0,
                });
                self.next_row += row_height;
                self.rows.len() - 1
            }
        };

        let row = &mut self.rows[index];
        let rect = TextureRect::new(row.width, row.top, width, height);
        row.width += width;
        rect
    }

    /// Copies 8-bit coverage into the alpha channel of `rect`.
    pub fn write_coverage(&mut self, rect: TextureRect, coverage: &[u8], pitch: usize) {
        for y in 0..rect.height {
            for x in 0..rect.width {
                let src = y as usize * pitch + x as usize;
                let dst = ((rect.left + x) + (rect.top + y) * self.size) as usize * 4 + 3;
                if let (Some(value), true) = (coverage.get(src), dst < self.pixels.len()) {
                    self.pixels[dst] = *value;
                }
            }
        }
        self.last_update_id = self.last_update_id.wrapping_add(1);
    }

    fn grow(&mut self) {
        let old_size = self.size;
        let new_size = old_size * 2;
        let mut pixels = WHITE_TRANSPARENT.repeat((new_size * new_size) as usize);
        let old_stride = (old_size * 4) as usize;
        let new_stride = (new_size * 4) as usize;
        for y in 0..old_size as usize {
            pixels[y * new_stride..y * new_stride + old_stride].copy_from_slice(&self.pixels[y * old_stride..(y + 1) * old_stride]);
        }
        self.pixels = pixels;
        self.size = new_size;
        self.last_update_id = self.last_update_id.wrapping_add(1);
        debug!("glyph atlas grown from {0}x{0} to {1}x{1}", old_size, new_size);
    }
}
