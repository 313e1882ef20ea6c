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
//! Deterministic rasterizer used by the unit tests.
//!
//! Every glyph is `size / 2` pixels wide (advance) with a `size / 2 - 1` wide bitmap that is
//! `0.7 * size` tall and sits on the baseline; `g` additionally descends by `0.2 * size`.
//! Whitespace has no bitmap. `A` and `V` carry hinting deltas and kern against each other.

use super::*;
use crate::{Error, Result};

pub(crate) struct FakeRasterizer {
    calls: usize,
    scalable: bool,
}

impl FakeRasterizer {
    pub fn calls(&self) -> usize { self.calls }

    pub fn set_scalable(&mut self, scalable: bool) { self.scalable = scalable }

    pub fn coverage_for(c: char) -> u8 { (c as u32 % 200 + 50) as u8 }
}

/// Returns a font handle backed by the fake rasterizer.
pub(crate) fn fake_font() -> FontHandle {
    let mut font = RasterFont::<FakeRasterizer>::new();
    // the fake accepts any non-empty source
    let _ = font.load_from_memory(b"fake-face".to_vec());
    FontHandle::new(font)
}

impl GlyphRasterizer for FakeRasterizer {
    fn load(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::FontLoad("Failed to load font face".to_string()));
        }
        if data == b"nocmap" {
            return Err(Error::FontLoad("Failed to select font character map".to_string()));
        }
        Ok(Self { calls: 0, scalable: true })
    }

    fn glyph_index(&self, codepoint: char) -> u32 {
        if codepoint == '\u{7f}' { 0 } else { codepoint as u32 }
    }

    fn is_scalable(&self) -> bool { self.scalable }

    fn size_metrics(&self, pixel_size: u32) -> Option<SizeMetrics> {
        if pixel_size == 0 {
            return None;
        }
        let px = pixel_size as f32;
        Some(SizeMetrics {
            ascender: (px * 0.8).round(),
            descender: -(px * 0.2).round(),
            height: (px * 1.2).round(),
            y_scale: px / 1024.0,
        })
    }

    fn rasterize(&mut self, codepoint: char, pixel_size: u32, _request: RasterRequest) -> Option<RasterizedGlyph> {
        self.calls += 1;
        let px = pixel_size as f32;
        let (width, rows, top) = if crate::is_whitespace(codepoint) {
            (0, 0, 0)
        } else if codepoint == 'g' {
            let top = (px * 0.7).round() as u32;
            ((pixel_size / 2).saturating_sub(1).max(1), top + (px * 0.2).round() as u32, top)
        } else {
            let top = (px * 0.7).round() as u32;
            ((pixel_size / 2).saturating_sub(1).max(1), top, top)
        };
        let (lsb_delta, rsb_delta) = match codepoint {
            'A' => (0, 10),
            'V' => (-20, 0),
            _ => (0, 0),
        };
        Some(RasterizedGlyph {
            advance: ((pixel_size / 2) as i32) << 6,
            lsb_delta,
            rsb_delta,
            left: 0,
            top: top as i32,
            width,
            rows,
            pitch: width as usize,
            format: BitmapFormat::Gray8,
            buffer: vec![Self::coverage_for(codepoint); (width * rows) as usize],
            stroked: false,
            emboldened: false,
        })
    }

    fn kerning(&self, first: char, second: char, _pixel_size: u32) -> i32 {
        match (first, second) {
            ('A', 'V') => -144,
            _ => 0,
        }
    }

    fn underline_metrics(&self) -> Option<UnderlineMetrics> {
        Some(UnderlineMetrics { position: -256.0, thickness: 128.0 })
    }
}
