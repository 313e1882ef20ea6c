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
use crate::Result;
#[cfg(feature = "fontdue-backend")]
use crate::Error;

#[derive(Copy, Clone, Debug, PartialEq)]
/// Vertical metrics of a face at one pixel size.
pub struct SizeMetrics {
    /// Distance from the baseline to the top of the line, in pixels.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the line, in pixels (negative).
    pub descender: f32,
    /// Distance between consecutive baselines, in pixels.
    pub height: f32,
    /// Pixels per font unit.
    pub y_scale: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Underline placement in font units, as stored in the face.
pub struct UnderlineMetrics {
    /// Offset of the underline center from the baseline (negative below).
    pub position: f32,
    /// Thickness of the underline.
    pub thickness: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Pixel layout of a rasterized bitmap.
pub enum BitmapFormat {
    /// One coverage byte per pixel.
    Gray8,
    /// One bit per pixel, most significant bit first.
    Mono,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Effects requested when rasterizing a glyph.
pub struct RasterRequest {
    /// Embolden the glyph.
    pub bold: bool,
    /// Stroke the glyph with an outline of this thickness (0 disables stroking).
    pub outline_thickness: f32,
}

#[derive(Clone, Debug)]
/// Bitmap and hinted metrics produced by a rasterizer.
pub struct RasterizedGlyph {
    /// Horizontal advance in 26.6 fixed point.
    pub advance: i32,
    /// Left side-bearing delta produced by hinting, in 26.6 units.
    pub lsb_delta: i32,
    /// Right side-bearing delta produced by hinting, in 26.6 units.
    pub rsb_delta: i32,
    /// Offset from the pen position to the left edge of the bitmap.
    pub left: i32,
    /// Offset from the baseline up to the top edge of the bitmap.
    pub top: i32,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub rows: u32,
    /// Bytes per bitmap row.
    pub pitch: usize,
    /// Layout of `buffer`.
    pub format: BitmapFormat,
    /// Raw bitmap data.
    pub buffer: Vec<u8>,
    /// `true` if the requested outline was applied at outline level.
    pub stroked: bool,
    /// `true` if the requested bold was applied at outline level.
    pub emboldened: bool,
}

/// Font-shaping library seam used by [`RasterFont`](super::RasterFont).
///
/// Implementations rasterize with hinting so advances are whole pixels. Outline-level effects
/// are optional: when a rasterizer cannot stroke or embolden it leaves the corresponding flag
/// unset in [`RasterizedGlyph`] and the backend falls back to bitmap processing.
pub trait GlyphRasterizer {
    /// Parses a face from memory.
    fn load(data: &[u8]) -> Result<Self>
    where
        Self: Sized;
    /// Returns the glyph index for a codepoint (0 when unmapped).
    fn glyph_index(&self, codepoint: char) -> u32;
    /// Returns `true` for outline fonts, `false` for fixed-size bitmap fonts.
    fn is_scalable(&self) -> bool;
    /// Returns the line metrics for a pixel size, or `None` if the size cannot be selected.
    fn size_metrics(&self, pixel_size: u32) -> Option<SizeMetrics>;
    /// Rasterizes one glyph.
    fn rasterize(&mut self, codepoint: char, pixel_size: u32, request: RasterRequest) -> Option<RasterizedGlyph>;
    /// Returns the unfitted kerning between two codepoints in 26.6 units (pixels for bitmap fonts).
    fn kerning(&self, first: char, second: char, pixel_size: u32) -> i32;
    /// Returns the underline metrics stored in the face, if any.
    fn underline_metrics(&self) -> Option<UnderlineMetrics>;
}

#[cfg(feature = "fontdue-backend")]
/// [`GlyphRasterizer`] backed by `fontdue`.
///
/// fontdue rasterizes without outline access, so bold and outline requests are reported as not
/// applied and handled by the bitmap fallbacks.
pub struct FontdueRasterizer {
    font: fontdue::Font,
}

#[cfg(feature = "fontdue-backend")]
impl FontdueRasterizer {
    /// Number of characters the face maps.
    pub fn char_count(&self) -> usize { self.font.chars().len() }
}

#[cfg(feature = "fontdue-backend")]
impl GlyphRasterizer for FontdueRasterizer {
    fn load(data: &[u8]) -> Result<Self> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| Error::FontLoad(format!("Failed to load font face: {}", e)))?;
        if font.chars().is_empty() {
            return Err(Error::FontLoad("Failed to select font character map".to_string()));
        }
        Ok(Self { font })
    }

    fn glyph_index(&self, codepoint: char) -> u32 { self.font.lookup_glyph_index(codepoint) as u32 }

    fn is_scalable(&self) -> bool { true }

    fn size_metrics(&self, pixel_size: u32) -> Option<SizeMetrics> {
        if pixel_size == 0 {
            return None;
        }
        let px = pixel_size as f32;
        self.font.horizontal_line_metrics(px).map(|m| SizeMetrics {
            ascender: m.ascent.round(),
            descender: m.descent.round(),
            height: m.new_line_size.round(),
            y_scale: px / self.font.units_per_em(),
        })
    }

    fn rasterize(&mut self, codepoint: char, pixel_size: u32, _request: RasterRequest) -> Option<RasterizedGlyph> {
        if pixel_size == 0 {
            return None;
        }
        let (metrics, bitmap) = self.font.rasterize(codepoint, pixel_size as f32);
        Some(RasterizedGlyph {
            // hinted advances land on whole pixels
            advance: (metrics.advance_width.round() as i32) << 6,
            lsb_delta: 0,
            rsb_delta: 0,
            left: metrics.xmin,
            top: metrics.ymin + metrics.height as i32,
            width: metrics.width as u32,
            rows: metrics.height as u32,
            pitch: metrics.width,
            format: BitmapFormat::Gray8,
            buffer: bitmap,
            stroked: false,
            emboldened: false,
        })
    }

    fn kerning(&self, first: char, second: char, pixel_size: u32) -> i32 {
        self.font
            .horizontal_kern(first, second, pixel_size as f32)
            .map(|k| (k * 64.0).round() as i32)
            .unwrap_or(0)
    }

    fn underline_metrics(&self) -> Option<UnderlineMetrics> { None }
}
