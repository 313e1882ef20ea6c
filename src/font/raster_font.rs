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
use super::bitmap::{BitmapStroker, CoverageBitmap};
use super::*;
use log::{debug, trace, warn};
use std::collections::HashMap;

/// Advance added to emboldened glyphs, in 26.6 units.
const BOLD_WEIGHT: i32 = 1 << 6;

/// Texels left empty around every packed glyph so filtering never bleeds neighbors in.
const GLYPH_PADDING: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct GlyphKey {
    codepoint: char,
    size: u32,
    bold: bool,
    outline_bits: u32,
}

#[derive(Copy, Clone, Debug, Default)]
struct LineMetrics {
    line_spacing: f32,
    ascent: f32,
    descent: f32,
    underline_position: f32,
    underline_thickness: f32,
}

/// Font backend that rasterizes through a [`GlyphRasterizer`] into a shared [`GlyphAtlas`].
///
/// Glyphs and line metrics are cached per scaled character size. Both caches and the atlas are
/// thrown away when a new face is loaded or the font scale changes.
pub struct RasterFont<R: GlyphRasterizer> {
    rasterizer: Option<R>,
    source: Vec<u8>,
    atlas: GlyphAtlas,
    glyphs: HashMap<GlyphKey, Glyph>,
    metrics: HashMap<u32, LineMetrics>,
    stroker: Option<BitmapStroker>,
    texture: Option<Rc<FontTexture>>,
    texture_version: u64,
    smooth: bool,
    font_scale: f32,
}

impl<R: GlyphRasterizer> Default for RasterFont<R> {
    fn default() -> Self { Self::new() }
}

impl<R: GlyphRasterizer> RasterFont<R> {
    /// Creates a backend without a face; every query returns empty values until a face is loaded.
    pub fn new() -> Self {
        Self {
            rasterizer: None,
            source: Vec::new(),
            atlas: GlyphAtlas::new(),
            glyphs: HashMap::new(),
            metrics: HashMap::new(),
            stroker: None,
            texture: None,
            texture_version: 0,
            smooth: true,
            font_scale: 1.0,
        }
    }

    /// Returns the loaded rasterizer, if any.
    pub fn rasterizer(&self) -> Option<&R> { self.rasterizer.as_ref() }

    /// Returns the bytes the current face was parsed from.
    pub fn source(&self) -> &[u8] { &self.source }

    /// Returns the atlas the glyphs are packed into.
    pub fn atlas(&self) -> &GlyphAtlas { &self.atlas }

    fn reset_caches(&mut self) {
        self.glyphs.clear();
        self.metrics.clear();
        self.atlas = GlyphAtlas::new();
        self.texture = None;
    }

    fn scaled_size(&self, character_size: u32) -> u32 { (character_size as f32 * self.font_scale) as u32 }

    fn internal_glyph(&mut self, codepoint: char, size: u32, bold: bool, outline_thickness: f32) -> Glyph {
        let key = GlyphKey {
            codepoint,
            size,
            bold,
            outline_bits: outline_thickness.to_bits(),
        };
        if let Some(glyph) = self.glyphs.get(&key) {
            return *glyph;
        }
        let glyph = self.load_glyph(codepoint, size, bold, outline_thickness);
        self.glyphs.insert(key, glyph);
        glyph
    }

    fn load_glyph(&mut self, codepoint: char, size: u32, bold: bool, outline_thickness: f32) -> Glyph {
        let mut glyph = Glyph::default();
        let rasterizer = match self.rasterizer.as_mut() {
            Some(r) => r,
            None => return glyph,
        };
        if rasterizer.size_metrics(size).is_none() {
            return glyph;
        }
        let request = RasterRequest { bold, outline_thickness };
        let raster = match rasterizer.rasterize(codepoint, size, request) {
            Some(raster) => raster,
            None => {
                warn!("no glyph for {:?} at {}px", codepoint, size);
                return glyph;
            }
        };
        trace!("rasterized {:?} at {}px (bold: {}, outline: {})", codepoint, size, bold, outline_thickness);

        let mut bitmap = CoverageBitmap::from_raster(&raster);
        if outline_thickness != 0.0 && !raster.stroked {
            bitmap = self.stroker.get_or_insert_with(BitmapStroker::new).stroke(&bitmap, outline_thickness);
        }
        if bold && !raster.emboldened {
            bitmap = bitmap.embolden();
        }

        glyph.advance = (raster.advance >> 6) as f32;
        if bold {
            glyph.advance += BOLD_WEIGHT as f32 / 64.0;
        }
        glyph.lsb_delta = raster.lsb_delta as f32;
        glyph.rsb_delta = raster.rsb_delta as f32;
        glyph.bounds = GlyphBounds {
            left: bitmap.left as f32,
            top: -bitmap.top as f32,
            width: bitmap.width as f32,
            height: bitmap.rows as f32,
        };

        // blank glyphs such as the space keep their advance but occupy no texels
        if bitmap.is_empty() {
            return glyph;
        }

        let rect = self
            .atlas
            .find_available_glyph_rect(bitmap.width + 2 * GLYPH_PADDING, bitmap.rows + 2 * GLYPH_PADDING);
        glyph.texture_rect = TextureRect::new(rect.left + GLYPH_PADDING, rect.top + GLYPH_PADDING, bitmap.width, bitmap.rows);
        self.atlas.write_coverage(glyph.texture_rect, &bitmap.data, bitmap.width as usize);
        self.texture = None;
        glyph
    }

    fn line_metrics(&mut self, size: u32) -> LineMetrics {
        if let Some(metrics) = self.metrics.get(&size) {
            return *metrics;
        }
        let rasterizer = match self.rasterizer.as_ref() {
            Some(r) => r,
            None => return LineMetrics::default(),
        };
        let size_metrics = match rasterizer.size_metrics(size) {
            Some(m) => m,
            None => return LineMetrics::default(),
        };
        let (underline_position, underline_thickness) = match (rasterizer.is_scalable(), rasterizer.underline_metrics()) {
            (true, Some(u)) => (-u.position * size_metrics.y_scale, u.thickness * size_metrics.y_scale),
            _ => (size as f32 / 10.0, size as f32 / 14.0),
        };
        let metrics = LineMetrics {
            line_spacing: size_metrics.height,
            ascent: size_metrics.ascender,
            descent: -size_metrics.descender,
            underline_position,
            underline_thickness,
        };
        self.metrics.insert(size, metrics);
        metrics
    }
}

impl<R: GlyphRasterizer> FontBackend for RasterFont<R> {
    fn load_from_memory(&mut self, data: Vec<u8>) -> Result<()> {
        self.rasterizer = None;
        self.reset_caches();
        self.source.clear();

        let rasterizer = R::load(&data)?;
        debug!("loaded font face from {} bytes", data.len());
        self.rasterizer = Some(rasterizer);
        self.source = data;
        Ok(())
    }

    fn has_glyph(&self, codepoint: char) -> bool {
        match self.rasterizer.as_ref() {
            Some(r) => r.glyph_index(codepoint) != 0,
            None => false,
        }
    }

    fn glyph(&mut self, codepoint: char, character_size: u32, bold: bool, outline_thickness: f32) -> Glyph {
        let scale = self.font_scale;
        let size = self.scaled_size(character_size);
        let glyph = self.internal_glyph(codepoint, size, bold, outline_thickness * scale);
        if scale == 1.0 {
            return glyph;
        }
        Glyph {
            advance: glyph.advance / scale,
            lsb_delta: glyph.lsb_delta / scale,
            rsb_delta: glyph.rsb_delta / scale,
            bounds: GlyphBounds {
                left: glyph.bounds.left / scale,
                top: glyph.bounds.top / scale,
                width: glyph.bounds.width / scale,
                height: glyph.bounds.height / scale,
            },
            texture_rect: glyph.texture_rect,
        }
    }

    fn kerning(&mut self, first: char, second: char, character_size: u32, bold: bool) -> f32 {
        if first == '\0' || second == '\0' {
            return 0.0;
        }
        let size = self.scaled_size(character_size);
        let (kerning, scalable) = match self.rasterizer.as_ref() {
            Some(r) if r.size_metrics(size).is_some() => (r.kerning(first, second, size), r.is_scalable()),
            _ => return 0.0,
        };
        if !scalable {
            return kerning as f32 / self.font_scale;
        }

        // hinting shifts glyphs, the deltas compensate for it
        let first_rsb_delta = self.internal_glyph(first, size, bold, 0.0).rsb_delta;
        let second_lsb_delta = self.internal_glyph(second, size, bold, 0.0).lsb_delta;
        ((second_lsb_delta - first_rsb_delta + kerning as f32 + 32.0) / 64.0).floor() / self.font_scale
    }

    fn line_spacing(&mut self, character_size: u32) -> f32 {
        let size = self.scaled_size(character_size);
        self.line_metrics(size).line_spacing / self.font_scale
    }

    fn font_height(&mut self, character_size: u32) -> f32 {
        let size = self.scaled_size(character_size);
        let metrics = self.line_metrics(size);
        (metrics.ascent + metrics.descent) / self.font_scale
    }

    fn ascent(&mut self, character_size: u32) -> f32 {
        let size = self.scaled_size(character_size);
        self.line_metrics(size).ascent / self.font_scale
    }

    fn descent(&mut self, character_size: u32) -> f32 {
        let size = self.scaled_size(character_size);
        self.line_metrics(size).descent / self.font_scale
    }

    fn underline_position(&mut self, character_size: u32) -> f32 {
        let size = self.scaled_size(character_size);
        self.line_metrics(size).underline_position / self.font_scale
    }

    fn underline_thickness(&mut self, character_size: u32) -> f32 {
        let size = self.scaled_size(character_size);
        self.line_metrics(size).underline_thickness / self.font_scale
    }

    fn texture(&mut self, _character_size: u32) -> Option<(Rc<FontTexture>, u64)> {
        self.rasterizer.as_ref()?;
        if let Some(texture) = &self.texture {
            return Some((texture.clone(), self.texture_version));
        }
        let texture = Rc::new(FontTexture::new(self.atlas.size(), self.atlas.pixels().to_vec(), self.smooth));
        self.texture_version += 1;
        self.texture = Some(texture.clone());
        Some((texture, self.texture_version))
    }

    fn texture_size(&mut self, _character_size: u32) -> (u32, u32) {
        if self.rasterizer.is_none() {
            return (0, 0);
        }
        (self.atlas.size(), self.atlas.size())
    }

    fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
        if let Some(texture) = &self.texture {
            texture.set_smooth(smooth);
        }
    }

    fn is_smooth(&self) -> bool { self.smooth }

    fn set_font_scale(&mut self, scale: f32) {
        if scale <= 0.0 || scale == self.font_scale {
            return;
        }
        debug!("font scale changed from {} to {}", self.font_scale, scale);
        self.font_scale = scale;
        self.reset_caches();
    }

    fn font_scale(&self) -> f32 { self.font_scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::FakeRasterizer;
    use crate::Error;

    fn loaded_font() -> RasterFont<FakeRasterizer> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut font = RasterFont::<FakeRasterizer>::new();
        font.load_from_memory(b"fake-face".to_vec()).unwrap();
        font
    }

    #[test]
    fn load_errors_are_reported() {
        let mut font = RasterFont::<FakeRasterizer>::new();
        match font.load_from_memory(Vec::new()) {
            Err(Error::FontLoad(msg)) => assert_eq!(msg, "Failed to load font face"),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
        match font.load_from_memory(b"nocmap".to_vec()) {
            Err(Error::FontLoad(msg)) => assert_eq!(msg, "Failed to select font character map"),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
        assert!(!font.has_glyph('a'));
    }

    #[test]
    fn queries_without_face_degrade_to_zero() {
        let mut font = RasterFont::<FakeRasterizer>::new();
        assert_eq!(font.glyph('a', 20, false, 0.0), Glyph::default());
        assert_eq!(font.kerning('A', 'V', 20, false), 0.0);
        assert_eq!(font.line_spacing(20), 0.0);
        assert_eq!(font.underline_thickness(20), 0.0);
        assert!(font.texture(20).is_none());
        assert_eq!(font.texture_size(20), (0, 0));
    }

    #[test]
    fn cached_glyph_does_not_bump_texture_version() {
        let mut font = loaded_font();
        let first = font.glyph('a', 20, false, 0.0);
        let (_, v1) = font.texture(20).unwrap();
        let second = font.glyph('a', 20, false, 0.0);
        let (_, v2) = font.texture(20).unwrap();
        assert_eq!(first, second);
        assert_eq!(v1, v2);
        assert_eq!(font.rasterizer().unwrap().calls(), 1);

        font.glyph('b', 20, false, 0.0);
        let (_, v3) = font.texture(20).unwrap();
        assert_eq!(v3, v2 + 1);
    }

    #[test]
    fn glyph_metrics_follow_bitmap() {
        let mut font = loaded_font();
        let glyph = font.glyph('a', 20, false, 0.0);
        assert_eq!(glyph.advance, 10.0);
        assert_eq!(glyph.bounds, GlyphBounds { left: 0.0, top: -14.0, width: 9.0, height: 14.0 });
        // padding of two texels around the first shelf allocation
        assert_eq!(glyph.texture_rect, TextureRect::new(2, 5, 9, 14));
        assert_eq!(font.atlas().alpha_at(2, 5), FakeRasterizer::coverage_for('a'));

        let bold = font.glyph('a', 20, true, 0.0);
        assert_eq!(bold.advance, 11.0);
        assert_eq!((bold.bounds.width, bold.bounds.height), (10.0, 15.0));

        let outlined = font.glyph('a', 20, false, 2.0);
        assert_eq!((outlined.bounds.width, outlined.bounds.height), (13.0, 18.0));
        assert_eq!(outlined.bounds.left, -2.0);
        assert!(!outlined.texture_rect.intersects(&glyph.texture_rect));
    }

    #[test]
    fn space_has_advance_but_no_texels() {
        let mut font = loaded_font();
        let (_, v1) = font.texture(20).unwrap();
        let space = font.glyph(' ', 20, false, 0.0);
        assert_eq!(space.advance, 10.0);
        assert!(space.texture_rect.is_empty());
        let (_, v2) = font.texture(20).unwrap();
        assert_eq!(v1, v2);
    }

    #[test]
    fn kerning_floors_deltas_and_is_deterministic() {
        let mut font = loaded_font();
        // floor((-20 - 10 - 144 + 32) / 64) = floor(-2.22)
        assert_eq!(font.kerning('A', 'V', 20, false), -3.0);
        for _ in 0..5 {
            assert_eq!(font.kerning('A', 'V', 20, false), -3.0);
        }
        assert_eq!(font.kerning('a', 'b', 20, false), 0.0);
        assert_eq!(font.kerning('\0', 'V', 20, false), 0.0);
    }

    #[test]
    fn metrics_are_derived_per_size() {
        let mut font = loaded_font();
        assert_eq!(font.line_spacing(20), 24.0);
        assert_eq!(font.ascent(20), 16.0);
        assert_eq!(font.descent(20), 4.0);
        assert_eq!(font.font_height(20), 20.0);
        // 1024 units per em, position -256 and thickness 128
        assert_eq!(font.underline_position(20), 5.0);
        assert_eq!(font.underline_thickness(20), 2.5);
        assert_eq!(font.line_spacing(10), 12.0);
    }

    #[test]
    fn bitmap_fonts_use_fixed_underline_fractions() {
        let mut font = loaded_font();
        font.rasterizer.as_mut().unwrap().set_scalable(false);
        assert_eq!(font.underline_position(28), 2.8);
        assert_eq!(font.underline_thickness(28), 2.0);
    }

    #[test]
    fn atlas_growth_keeps_previous_glyph_pixels() {
        let mut font = loaded_font();
        let first = font.glyph('a', 20, false, 0.0);
        let before: Vec<u8> = (0..first.texture_rect.height)
            .flat_map(|y| (0..first.texture_rect.width).map(move |x| (x, y)))
            .map(|(x, y)| font.atlas().alpha_at(first.texture_rect.left + x, first.texture_rect.top + y))
            .collect();

        let mut sizes = vec![font.texture_size(20).0];
        for c in 'b'..='z' {
            font.glyph(c, 48, false, 0.0);
            let size = font.texture_size(20).0;
            if *sizes.last().unwrap() != size {
                sizes.push(size);
            }
        }
        assert_eq!(&sizes[..2], &[128, 256]);
        for pair in sizes.windows(2) {
            assert_eq!(pair[1], pair[0] * 2);
        }

        let after: Vec<u8> = (0..first.texture_rect.height)
            .flat_map(|y| (0..first.texture_rect.width).map(move |x| (x, y)))
            .map(|(x, y)| font.atlas().alpha_at(first.texture_rect.left + x, first.texture_rect.top + y))
            .collect();
        assert_eq!(before, after);
        assert_eq!(font.glyph('a', 20, false, 0.0), first);
    }

    #[test]
    fn font_scale_resets_and_rescales() {
        let mut font = loaded_font();
        font.glyph('a', 20, false, 0.0);
        let (_, v1) = font.texture(20).unwrap();
        font.set_font_scale(2.0);
        let (_, v2) = font.texture(20).unwrap();
        assert!(v2 > v1);
        let glyph = font.glyph('a', 20, false, 0.0);
        assert_eq!(glyph.advance, 10.0);
        // rasterized at 40px: 19x28 texels, reported at half size
        assert_eq!(glyph.texture_rect.width, 19);
        assert_eq!(glyph.bounds.width, 9.5);
        assert_eq!(font.line_spacing(20), 24.0);
    }

    #[test]
    fn smooth_flag_updates_existing_texture() {
        let mut font = loaded_font();
        let (texture, _) = font.texture(20).unwrap();
        assert!(texture.is_smooth());
        font.set_smooth(false);
        assert!(!texture.is_smooth());
    }
}
