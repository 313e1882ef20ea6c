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
use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::font::FontTexture;
use crate::{is_whitespace, Color, Color4b, FontHandle, Glyph, TextStyle, Vec2f, Vertex};

/// Horizontal shear of italic glyphs (12 degrees).
pub const ITALIC_SHEAR: f32 = 0.20944;

const QUAD_PADDING: f32 = 1.0;

// texel inside the opaque block reserved at the atlas origin
const SOLID_TEXEL: f32 = 1.0;

#[derive(Clone, Default)]
struct Geometry {
    valid: bool,
    size: Vec2f,
    // texture coordinates are in texels until handed out
    vertices: Vec<Vertex>,
    outline_vertices: Vec<Vertex>,
}

#[derive(Clone)]
/// A positioned run of text sharing one font, size, style and color.
///
/// Vertices are generated lazily and cached until an attribute changes.
pub struct TextPiece {
    text: String,
    font: Option<FontHandle>,
    character_size: u32,
    style: TextStyle,
    color: Color,
    outline_color: Color,
    outline_thickness: f32,
    opacity: f32,
    position: Vec2f,
    geometry: RefCell<Geometry>,
}

impl Default for TextPiece {
    fn default() -> Self { Self::new() }
}

fn push_quad(vertices: &mut Vec<Vertex>, corners: [(f32, f32); 4], tex: [(f32, f32); 4], color: Color4b) {
    // two triangles: 0 1 2, 2 1 3
    for i in [0, 1, 2, 2, 1, 3] {
        vertices.push(Vertex::new(
            Vec2f::new(corners[i].0, corners[i].1),
            Vec2f::new(tex[i].0, tex[i].1),
            color,
        ));
    }
}

fn add_glyph_quad(vertices: &mut Vec<Vertex>, x: f32, y: f32, color: Color4b, glyph: &Glyph, shear: f32) {
    let (b, r) = (glyph.bounds, glyph.texture_rect);
    if r.is_empty() {
        return;
    }
    let p = QUAD_PADDING;
    let (left, top) = (b.left - p, b.top - p);
    let (right, bottom) = (b.left + b.width + p, b.top + b.height + p);
    let (u1, v1) = (r.left as f32 - p, r.top as f32 - p);
    let (u2, v2) = ((r.left + r.width) as f32 + p, (r.top + r.height) as f32 + p);
    push_quad(
        vertices,
        [
            (x + left - shear * top, y + top),
            (x + right - shear * top, y + top),
            (x + left - shear * bottom, y + bottom),
            (x + right - shear * bottom, y + bottom),
        ],
        [(u1, v1), (u2, v1), (u1, v2), (u2, v2)],
        color,
    );
}

struct LineStyle {
    offset: f32,
    thickness: f32,
    outline: f32,
    scale: f32,
}

fn add_line(vertices: &mut Vec<Vertex>, length: f32, line_top: f32, color: Color4b, line: &LineStyle) {
    let top = ((line_top + line.offset - line.thickness / 2.0) * line.scale).round() / line.scale;
    let bottom = top + (line.thickness * line.scale).round() / line.scale;
    let o = line.outline;
    let t = (SOLID_TEXEL, SOLID_TEXEL);
    push_quad(
        vertices,
        [(-o, top - o), (length + o, top - o), (-o, bottom + o), (length + o, bottom + o)],
        [t, t, t, t],
        color,
    );
}

impl TextPiece {
    /// Empty piece without a font.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            font: None,
            character_size: 18,
            style: TextStyle::REGULAR,
            color: Color::BLACK,
            outline_color: Color::BLACK,
            outline_thickness: 0.0,
            opacity: 1.0,
            position: Vec2f::new(0.0, 0.0),
            geometry: RefCell::new(Geometry::default()),
        }
    }

    fn invalidate(&mut self) { self.geometry.get_mut().valid = false }

    /// Replaces the text.
    pub fn set_string(&mut self, text: &str) {
        self.text = text.to_string();
        self.invalidate();
    }

    /// The text.
    pub fn string(&self) -> &str { &self.text }

    /// Font used for glyphs. Without a font nothing is generated.
    pub fn set_font(&mut self, font: Option<FontHandle>) {
        self.font = font;
        self.invalidate();
    }

    /// Current font.
    pub fn font(&self) -> Option<&FontHandle> { self.font.as_ref() }

    /// Character size in pixels.
    pub fn set_character_size(&mut self, size: u32) {
        self.character_size = size;
        self.invalidate();
    }

    /// Character size in pixels.
    pub fn character_size(&self) -> u32 { self.character_size }

    /// Style bits.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        self.invalidate();
    }

    /// Style bits.
    pub fn style(&self) -> TextStyle { self.style }

    /// Fill color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.invalidate();
    }

    /// Fill color.
    pub fn color(&self) -> Color { self.color }

    /// Outline color.
    pub fn set_outline_color(&mut self, color: Color) {
        self.outline_color = color;
        self.invalidate();
    }

    /// Outline color.
    pub fn outline_color(&self) -> Color { self.outline_color }

    /// Outline thickness, zero disables the outline.
    pub fn set_outline_thickness(&mut self, thickness: f32) {
        self.outline_thickness = thickness;
        self.invalidate();
    }

    /// Outline thickness.
    pub fn outline_thickness(&self) -> f32 { self.outline_thickness }

    /// Opacity multiplied into both colors.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.invalidate();
    }

    /// Opacity.
    pub fn opacity(&self) -> f32 { self.opacity }

    /// Top-left corner relative to the owning widget.
    pub fn set_position(&mut self, position: Vec2f) { self.position = position }

    /// Top-left corner relative to the owning widget.
    pub fn position(&self) -> Vec2f { self.position }

    fn geometry(&self) -> Ref<'_, Geometry> {
        if !self.geometry.borrow().valid {
            let geometry = self.build();
            *self.geometry.borrow_mut() = geometry;
        }
        self.geometry.borrow()
    }

    /// Bounding size including the outline on both sides.
    pub fn size(&self) -> Vec2f { self.geometry().size }

    /// Atlas snapshot plus `(outline, fill)` vertices with normalized texture coordinates.
    ///
    /// Returns `None` without a font or when the font has no texture yet.
    pub fn vertex_data(&self) -> Option<(Rc<FontTexture>, Vec<Vertex>, Vec<Vertex>)> {
        let font = self.font.as_ref()?;
        let geometry = self.geometry();
        let (texture, _version) = font.texture(self.character_size)?;
        let scale = 1.0 / texture.size().max(1) as f32;
        let normalize = |vertices: &[Vertex]| {
            vertices
                .iter()
                .map(|v| {
                    let mut v = *v;
                    v.scale_tex(scale, scale);
                    v
                })
                .collect::<Vec<_>>()
        };
        let outline = normalize(&geometry.outline_vertices);
        let fill = normalize(&geometry.vertices);
        Some((texture, outline, fill))
    }

    /// Local position of the character at `index`, in the frame of the generated vertices.
    ///
    /// An index past the end gives the position after the last character.
    pub fn find_character_pos(&self, index: usize) -> Vec2f {
        let outline = self.outline_thickness;
        let font = match &self.font {
            Some(font) => font,
            None => return Vec2f::new(outline, outline),
        };
        let size = self.character_size;
        let bold = self.style.is_bold();
        let whitespace = font.glyph(' ', size, bold, 0.0).advance;
        let line_spacing = font.line_spacing(size);

        let (mut x, mut y) = (0.0, 0.0);
        let mut prev = '\0';
        for c in self.text.chars().filter(|c| *c != '\r').take(index) {
            x += font.kerning(prev, c, size, bold);
            prev = c;
            match c {
                ' ' => x += whitespace,
                '\t' => x += whitespace * 4.0,
                '\n' => {
                    y += line_spacing;
                    x = 0.0;
                }
                _ => x += font.glyph(c, size, bold, 0.0).advance,
            }
        }
        Vec2f::new(x + outline, y + outline)
    }

    fn build(&self) -> Geometry {
        let mut geometry = Geometry {
            valid: true,
            ..Geometry::default()
        };
        let font = match &self.font {
            Some(font) => font,
            None => return geometry,
        };

        let size = self.character_size;
        let bold = self.style.is_bold();
        let shear = if self.style.is_italic() { ITALIC_SHEAR } else { 0.0 };
        let outline = self.outline_thickness;
        let fill_color = self.color.with_opacity(self.opacity).to_color4b();
        let outline_color = self.outline_color.with_opacity(self.opacity).to_color4b();

        let whitespace = font.glyph(' ', size, bold, 0.0).advance;
        let line_spacing = font.line_spacing(size);
        let underline = LineStyle {
            offset: font.underline_position(size),
            thickness: font.underline_thickness(size),
            outline: 0.0,
            scale: font.font_scale(),
        };
        let x_bounds = font.glyph('x', size, bold, 0.0).bounds;
        let strike = LineStyle {
            offset: x_bounds.top + x_bounds.height / 2.0,
            ..underline
        };

        let decorate = |geometry: &mut Geometry, length: f32, line_top: f32| {
            let lines = [
                (self.style.is_underlined(), &underline),
                (self.style.is_strike_through(), &strike),
            ];
            for (_, line) in lines.into_iter().filter(|(on, _)| *on) {
                add_line(&mut geometry.vertices, length, line_top, fill_color, line);
                if outline != 0.0 {
                    let outlined = LineStyle { outline, ..*line };
                    add_line(&mut geometry.outline_vertices, length, line_top, outline_color, &outlined);
                }
            }
        };

        let (mut x, mut y) = (0.0f32, font.ascent(size));
        let mut max_x = 0.0f32;
        let mut lines = 1;
        let mut prev = '\0';
        for c in self.text.chars() {
            if c == '\r' {
                continue;
            }
            x += font.kerning(prev, c, size, bold);
            if c == '\n' && prev != '\n' {
                decorate(&mut geometry, x, y);
            }
            prev = c;

            if is_whitespace(c) {
                match c {
                    ' ' => x += whitespace,
                    '\t' => x += whitespace * 4.0,
                    '\n' => {
                        y += line_spacing;
                        x = 0.0;
                        lines += 1;
                    }
                    _ => (),
                }
                max_x = max_x.max(x);
                continue;
            }

            if outline != 0.0 {
                let glyph = font.glyph(c, size, bold, outline);
                add_glyph_quad(&mut geometry.outline_vertices, x, y, outline_color, &glyph, shear);
            }
            let glyph = font.glyph(c, size, bold, 0.0);
            add_glyph_quad(&mut geometry.vertices, x, y, fill_color, &glyph, shear);

            max_x = max_x.max(x + glyph.bounds.left + glyph.bounds.width - shear * glyph.bounds.top);
            x += glyph.advance;
        }
        if x > 0.0 {
            decorate(&mut geometry, x, y);
        }

        for v in geometry.vertices.iter_mut().chain(geometry.outline_vertices.iter_mut()) {
            v.translate(outline, outline);
        }
        let height = font.font_height(size).max(line_spacing) + (lines - 1) as f32 * line_spacing;
        geometry.size = Vec2f::new(max_x + 2.0 * outline, height + 2.0 * outline);
        geometry
    }
}
