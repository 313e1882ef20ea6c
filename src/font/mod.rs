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
//! Font backends and the glyph atlas they rasterize into.
//!
//! A backend turns `(codepoint, size, bold, outline)` requests into [`Glyph`] metrics and keeps
//! the coverage bitmaps in a single growable texture. [`RasterFont`] is the stock backend: it
//! drives any [`GlyphRasterizer`] and packs the results with a shelf allocator.

mod atlas;
mod bitmap;
mod raster_font;
mod rasterizer;

pub use atlas::*;
pub use raster_font::*;
pub use rasterizer::*;

use crate::Result;
use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

#[derive(Default, Copy, Clone, Debug, PartialEq)]
/// Glyph bounding box relative to the pen position on the baseline.
pub struct GlyphBounds {
    /// Horizontal offset of the left edge.
    pub left: f32,
    /// Vertical offset of the top edge (negative above the baseline).
    pub top: f32,
    /// Bounding box width.
    pub width: f32,
    /// Bounding box height.
    pub height: f32,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Rectangle inside the atlas texture, in texels.
pub struct TextureRect {
    /// Left texel column.
    pub left: u32,
    /// Top texel row.
    pub top: u32,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl TextureRect {
    /// Creates a rectangle from its components.
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self { Self { left, top, width, height } }

    /// Returns `true` if the rectangle covers no texel.
    pub fn is_empty(&self) -> bool { self.width == 0 || self.height == 0 }

    /// Returns `true` if both rectangles share at least one texel.
    pub fn intersects(&self, other: &TextureRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.left + other.width
            && other.left < self.left + self.width
            && self.top < other.top + other.height
            && other.top < self.top + self.height
    }
}

#[derive(Default, Copy, Clone, Debug, PartialEq)]
/// Metrics and atlas coordinates of one rasterized glyph.
pub struct Glyph {
    /// Horizontal pen advance after drawing this glyph.
    pub advance: f32,
    /// Left side-bearing shift introduced by hinting, in 26.6 units.
    pub lsb_delta: f32,
    /// Right side-bearing shift introduced by hinting, in 26.6 units.
    pub rsb_delta: f32,
    /// Bounding box relative to the pen position.
    pub bounds: GlyphBounds,
    /// Location inside the font texture (empty for blank glyphs).
    pub texture_rect: TextureRect,
}

/// Snapshot of a font atlas, ready to be uploaded by a render backend.
pub struct FontTexture {
    size: u32,
    pixels: Vec<u8>,
    smooth: Cell<bool>,
}

impl FontTexture {
    pub(crate) fn new(size: u32, pixels: Vec<u8>, smooth: bool) -> Self { Self { size, pixels, smooth: Cell::new(smooth) } }

    /// Width and height of the square texture.
    pub fn size(&self) -> u32 { self.size }

    /// RGBA8 pixel data, row major.
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Returns `true` if the texture should be sampled with linear filtering.
    pub fn is_smooth(&self) -> bool { self.smooth.get() }

    pub(crate) fn set_smooth(&self, smooth: bool) { self.smooth.set(smooth) }
}

impl Debug for FontTexture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("FontTexture {{ size: {}, smooth: {} }}", self.size, self.smooth.get()))
    }
}

/// Interface every font backend implements.
///
/// Character sizes are in unscaled pixels; backends apply their font scale internally and
/// report metrics back in unscaled units. All queries return zero or empty values when no font
/// has been loaded.
pub trait FontBackend {
    /// Replaces the current face with one parsed from `data`, resetting every cache.
    fn load_from_memory(&mut self, data: Vec<u8>) -> Result<()>;
    /// Returns `true` if the face maps `codepoint` to a glyph.
    fn has_glyph(&self, codepoint: char) -> bool;
    /// Returns the glyph, rasterizing and packing it on first use.
    fn glyph(&mut self, codepoint: char, character_size: u32, bold: bool, outline_thickness: f32) -> Glyph;
    /// Returns the kerning offset between two characters, in whole pixels.
    fn kerning(&mut self, first: char, second: char, character_size: u32, bold: bool) -> f32;
    /// Returns the distance between two consecutive baselines.
    fn line_spacing(&mut self, character_size: u32) -> f32;
    /// Returns the height from the highest ascender to the lowest descender.
    fn font_height(&mut self, character_size: u32) -> f32;
    /// Returns the distance from the top of a line to its baseline.
    fn ascent(&mut self, character_size: u32) -> f32;
    /// Returns the distance from the baseline to the bottom of a line (positive).
    fn descent(&mut self, character_size: u32) -> f32;
    /// Returns the underline offset below the baseline.
    fn underline_position(&mut self, character_size: u32) -> f32;
    /// Returns the underline thickness.
    fn underline_thickness(&mut self, character_size: u32) -> f32;
    /// Returns the texture holding the glyphs together with its version.
    ///
    /// The version increments every time the texture had to be rebuilt because new glyphs
    /// were written, so callers can detect stale texture coordinates cheaply.
    fn texture(&mut self, character_size: u32) -> Option<(Rc<FontTexture>, u64)>;
    /// Returns the size of the glyph texture in texels.
    fn texture_size(&mut self, character_size: u32) -> (u32, u32);
    /// Enables or disables linear filtering of the glyph texture.
    fn set_smooth(&mut self, smooth: bool);
    /// Returns `true` if linear filtering is enabled.
    fn is_smooth(&self) -> bool;
    /// Sets the ratio between rasterized and reported pixel sizes (e.g. for high-DPI output).
    fn set_font_scale(&mut self, scale: f32);
    /// Returns the current font scale.
    fn font_scale(&self) -> f32;
}

#[derive(Clone)]
/// Shared handle to a font backend.
///
/// Widgets clone the handle; every clone refers to the same glyph cache and texture.
pub struct FontHandle(Rc<RefCell<dyn FontBackend>>);

impl FontHandle {
    /// Wraps a backend into a shareable handle.
    pub fn new<B: FontBackend + 'static>(backend: B) -> Self { Self(Rc::new(RefCell::new(backend))) }

    /// Loads a font from memory using the fontdue rasterizer.
    #[cfg(feature = "fontdue-backend")]
    pub fn from_memory(data: Vec<u8>) -> Result<Self> {
        let mut font = RasterFont::<FontdueRasterizer>::new();
        font.load_from_memory(data)?;
        Ok(Self::new(font))
    }

    /// Returns `true` if both handles refer to the same backend.
    pub fn ptr_eq(&self, other: &FontHandle) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    /// Replaces the face (see [`FontBackend::load_from_memory`]).
    pub fn load_from_memory(&self, data: Vec<u8>) -> Result<()> { self.0.borrow_mut().load_from_memory(data) }

    /// See [`FontBackend::has_glyph`].
    pub fn has_glyph(&self, codepoint: char) -> bool { self.0.borrow().has_glyph(codepoint) }

    /// See [`FontBackend::glyph`].
    pub fn glyph(&self, codepoint: char, character_size: u32, bold: bool, outline_thickness: f32) -> Glyph {
        self.0.borrow_mut().glyph(codepoint, character_size, bold, outline_thickness)
    }

    /// See [`FontBackend::kerning`].
    pub fn kerning(&self, first: char, second: char, character_size: u32, bold: bool) -> f32 {
        self.0.borrow_mut().kerning(first, second, character_size, bold)
    }

    /// See [`FontBackend::line_spacing`].
    pub fn line_spacing(&self, character_size: u32) -> f32 { self.0.borrow_mut().line_spacing(character_size) }

    /// See [`FontBackend::font_height`].
    pub fn font_height(&self, character_size: u32) -> f32 { self.0.borrow_mut().font_height(character_size) }

    /// See [`FontBackend::ascent`].
    pub fn ascent(&self, character_size: u32) -> f32 { self.0.borrow_mut().ascent(character_size) }

    /// See [`FontBackend::descent`].
    pub fn descent(&self, character_size: u32) -> f32 { self.0.borrow_mut().descent(character_size) }

    /// See [`FontBackend::underline_position`].
    pub fn underline_position(&self, character_size: u32) -> f32 { self.0.borrow_mut().underline_position(character_size) }

    /// See [`FontBackend::underline_thickness`].
    pub fn underline_thickness(&self, character_size: u32) -> f32 { self.0.borrow_mut().underline_thickness(character_size) }

    /// See [`FontBackend::texture`].
    pub fn texture(&self, character_size: u32) -> Option<(Rc<FontTexture>, u64)> { self.0.borrow_mut().texture(character_size) }

    /// See [`FontBackend::texture_size`].
    pub fn texture_size(&self, character_size: u32) -> (u32, u32) { self.0.borrow_mut().texture_size(character_size) }

    /// See [`FontBackend::set_smooth`].
    pub fn set_smooth(&self, smooth: bool) { self.0.borrow_mut().set_smooth(smooth) }

    /// See [`FontBackend::is_smooth`].
    pub fn is_smooth(&self) -> bool { self.0.borrow().is_smooth() }

    /// See [`FontBackend::set_font_scale`].
    pub fn set_font_scale(&self, scale: f32) { self.0.borrow_mut().set_font_scale(scale) }

    /// See [`FontBackend::font_scale`].
    pub fn font_scale(&self) -> f32 { self.0.borrow().font_scale() }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl Debug for FontHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_fmt(format_args!("FontHandle({:p})", Rc::as_ptr(&self.0))) }
}

#[cfg(test)]
pub(crate) mod testing;
