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
use std::rc::Rc;

use crate::font::FontTexture;
use crate::{Color, Color4b, Outline, TextPiece, Texture, Vec2f};

#[derive(Default, Copy, Clone)]
#[repr(C)]
/// Vertex of a text or sprite mesh.
pub struct Vertex {
    pos: Vec2f,
    tex: Vec2f,
    color: Color4b,
}

impl Vertex {
    /// Creates a vertex with the provided position, texture coordinate, and color.
    pub fn new(pos: Vec2f, tex: Vec2f, color: Color4b) -> Self { Self { pos, tex, color } }

    /// Position of the vertex.
    pub fn position(&self) -> Vec2f { self.pos }

    /// Texture coordinates, normalized to the texture size.
    pub fn tex_coord(&self) -> Vec2f { self.tex }

    /// Vertex color.
    pub fn color(&self) -> Color4b { self.color }

    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx;
        self.pos.y += dy;
    }

    pub(crate) fn scale_tex(&mut self, sx: f32, sy: f32) {
        self.tex.x *= sx;
        self.tex.y *= sy;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Axis aligned rectangle in floating point coordinates.
pub struct FloatRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

/// Rectangle used when nothing clips.
pub const UNCLIPPED_RECT: FloatRect = FloatRect::new(0.0, 0.0, 0x1000000 as f32, 0x1000000 as f32);

impl FloatRect {
    /// Creates a rectangle.
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self { Self { left, top, width, height } }

    /// Right edge.
    pub fn right(&self) -> f32 { self.left + self.width }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 { self.top + self.height }

    /// Returns `true` if the point lies inside, right and bottom edges excluded.
    pub fn contains(&self, x: f32, y: f32) -> bool { x >= self.left && x < self.right() && y >= self.top && y < self.bottom() }

    /// Overlapping area, or `None` when the rectangles are disjoint.
    pub fn intersect(&self, other: &FloatRect) -> Option<FloatRect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(FloatRect::new(left, top, right - left, bottom - top))
    }
}

#[derive(Copy, Clone, Default)]
/// Transform applied to a draw call. Only translation is supported.
pub struct RenderStates {
    /// Translation added to every coordinate.
    pub offset: Vec2f,
}

impl RenderStates {
    /// States moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            offset: Vec2f::new(self.offset.x + dx, self.offset.y + dy),
        }
    }
}

/// Sink of the draw calls made by widgets.
pub trait RenderTarget {
    /// Draws `texture` stretched over `size`, anchored at the states offset.
    fn draw_sprite(&mut self, states: &RenderStates, texture: &Texture, size: Vec2f, opacity: f32);
    /// Draws a laid out text piece at its own position.
    fn draw_text(&mut self, states: &RenderStates, text: &TextPiece);
    /// Fills a `size` rectangle.
    fn draw_filled_rect(&mut self, states: &RenderStates, size: Vec2f, color: Color);
    /// Draws the four sides of `borders` inside a `size` rectangle.
    fn draw_borders(&mut self, states: &RenderStates, borders: &Outline, size: Vec2f, color: Color);
    /// Fills a circle whose bounding box starts at the states offset.
    fn draw_circle(&mut self, states: &RenderStates, radius: f32, color: Color);
    /// Restricts later draws to `rect` intersected with the current clipping area.
    fn add_clipping_layer(&mut self, states: &RenderStates, rect: FloatRect);
    /// Pops the last clipping layer.
    fn remove_clipping_layer(&mut self);
}

#[derive(Clone)]
/// Recorded draw call in absolute coordinates.
pub enum DrawCommand {
    /// New clipping rectangle for the commands that follow.
    Clip {
        /// Clipping area.
        rect: FloatRect,
    },
    /// Solid rectangle.
    Rect {
        /// Area to fill.
        rect: FloatRect,
        /// Fill color.
        color: Color,
    },
    /// Textured rectangle.
    Sprite {
        /// Destination area.
        rect: FloatRect,
        /// Image to draw.
        texture: Texture,
        /// Tint, with opacity in alpha.
        color: Color,
    },
    /// Triangle list sampling the font atlas.
    Text {
        /// Atlas texture snapshot.
        texture: Rc<FontTexture>,
        /// Six vertices per glyph or line quad, outline quads first.
        vertices: Vec<Vertex>,
    },
    /// Filled circle.
    Circle {
        /// Center of the circle.
        center: Vec2f,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
}

#[derive(PartialEq, Eq)]
enum Clip {
    None,
    Part,
    All,
}

/// [`RenderTarget`] recording commands for a backend to replay.
#[derive(Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    clip_stack: Vec<FloatRect>,
}

impl DrawList {
    /// Empty list.
    pub fn new() -> Self { Self::default() }

    /// Recorded commands.
    pub fn commands(&self) -> &[DrawCommand] { &self.commands }

    /// Drops all commands and clipping layers.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
    }

    /// Current clipping rectangle.
    pub fn current_clip_rect(&self) -> FloatRect { self.clip_stack.last().copied().unwrap_or(UNCLIPPED_RECT) }

    fn check_clip(&self, r: &FloatRect) -> Clip {
        let cr = self.current_clip_rect();
        if r.left >= cr.right() || r.right() <= cr.left || r.top >= cr.bottom() || r.bottom() <= cr.top {
            return Clip::All;
        }
        if r.left >= cr.left && r.right() <= cr.right() && r.top >= cr.top && r.bottom() <= cr.bottom() {
            return Clip::None;
        }
        Clip::Part
    }

    fn push_clipped(&mut self, bounds: FloatRect, command: DrawCommand) {
        let clipped = self.check_clip(&bounds);
        match clipped {
            Clip::All => return,
            Clip::Part => {
                let rect = self.current_clip_rect();
                self.commands.push(DrawCommand::Clip { rect })
            }
            Clip::None => (),
        }
        self.commands.push(command);
        if clipped != Clip::None {
            self.commands.push(DrawCommand::Clip { rect: UNCLIPPED_RECT });
        }
    }

    fn push_rect(&mut self, rect: FloatRect, color: Color) {
        if let Some(rect) = rect.intersect(&self.current_clip_rect()) {
            self.commands.push(DrawCommand::Rect { rect, color });
        }
    }
}

impl RenderTarget for DrawList {
    fn draw_sprite(&mut self, states: &RenderStates, texture: &Texture, size: Vec2f, opacity: f32) {
        if texture.is_empty() {
            return;
        }
        let rect = FloatRect::new(states.offset.x, states.offset.y, size.x, size.y);
        let command = DrawCommand::Sprite {
            rect,
            texture: texture.clone(),
            color: Color::WHITE.with_opacity(opacity),
        };
        self.push_clipped(rect, command);
    }

    fn draw_text(&mut self, states: &RenderStates, text: &TextPiece) {
        let (texture, outline, fill) = match text.vertex_data() {
            Some(data) => data,
            None => return,
        };
        let dx = states.offset.x + text.position().x;
        let dy = states.offset.y + text.position().y;
        let size = text.size();
        let mut vertices = outline;
        vertices.extend(fill);
        for v in vertices.iter_mut() {
            v.translate(dx, dy);
        }
        self.push_clipped(FloatRect::new(dx, dy, size.x, size.y), DrawCommand::Text { texture, vertices });
    }

    fn draw_filled_rect(&mut self, states: &RenderStates, size: Vec2f, color: Color) {
        self.push_rect(FloatRect::new(states.offset.x, states.offset.y, size.x, size.y), color);
    }

    fn draw_borders(&mut self, states: &RenderStates, borders: &Outline, size: Vec2f, color: Color) {
        if borders.is_zero() {
            return;
        }
        let (x, y) = (states.offset.x, states.offset.y);
        let inner_height = (size.y - borders.vertical()).max(0.0);
        self.push_rect(FloatRect::new(x, y, size.x, borders.top), color);
        self.push_rect(FloatRect::new(x, y + size.y - borders.bottom, size.x, borders.bottom), color);
        self.push_rect(FloatRect::new(x, y + borders.top, borders.left, inner_height), color);
        self.push_rect(FloatRect::new(x + size.x - borders.right, y + borders.top, borders.right, inner_height), color);
    }

    fn draw_circle(&mut self, states: &RenderStates, radius: f32, color: Color) {
        let bounds = FloatRect::new(states.offset.x, states.offset.y, radius * 2.0, radius * 2.0);
        let center = Vec2f::new(states.offset.x + radius, states.offset.y + radius);
        self.push_clipped(bounds, DrawCommand::Circle { center, radius, color });
    }

    fn add_clipping_layer(&mut self, states: &RenderStates, rect: FloatRect) {
        let rect = FloatRect::new(rect.left + states.offset.x, rect.top + states.offset.y, rect.width, rect.height);
        let last = self.current_clip_rect();
        self.clip_stack.push(rect.intersect(&last).unwrap_or_default());
    }

    fn remove_clipping_layer(&mut self) { self.clip_stack.pop(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_are_clipped() {
        let mut list = DrawList::new();
        let states = RenderStates::default();
        list.add_clipping_layer(&states, FloatRect::new(0.0, 0.0, 10.0, 10.0));
        list.draw_filled_rect(&states.translated(5.0, 5.0), Vec2f::new(10.0, 10.0), Color::RED);
        list.draw_filled_rect(&states.translated(20.0, 0.0), Vec2f::new(5.0, 5.0), Color::RED);
        list.remove_clipping_layer();
        assert_eq!(list.commands().len(), 1);
        match &list.commands()[0] {
            DrawCommand::Rect { rect, .. } => assert_eq!(*rect, FloatRect::new(5.0, 5.0, 5.0, 5.0)),
            _ => panic!("expected a rect"),
        }
        assert_eq!(list.current_clip_rect(), UNCLIPPED_RECT);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        let states = RenderStates::default();
        list.add_clipping_layer(&states, FloatRect::new(0.0, 0.0, 10.0, 10.0));
        list.add_clipping_layer(&states.translated(5.0, 0.0), FloatRect::new(0.0, 0.0, 10.0, 4.0));
        assert_eq!(list.current_clip_rect(), FloatRect::new(5.0, 0.0, 5.0, 4.0));
    }

    #[test]
    fn partially_clipped_circle_sets_and_resets_clip() {
        let mut list = DrawList::new();
        let states = RenderStates::default();
        list.add_clipping_layer(&states, FloatRect::new(0.0, 0.0, 10.0, 10.0));
        list.draw_circle(&states.translated(5.0, 5.0), 5.0, Color::BLUE);
        assert_eq!(list.commands().len(), 3);
        assert!(matches!(list.commands()[0], DrawCommand::Clip { .. }));
        assert!(matches!(list.commands()[1], DrawCommand::Circle { .. }));
        match &list.commands()[2] {
            DrawCommand::Clip { rect } => assert_eq!(*rect, UNCLIPPED_RECT),
            _ => panic!("expected the clip to be reset"),
        }
    }

    #[test]
    fn borders_emit_four_sides() {
        let mut list = DrawList::new();
        list.draw_borders(&RenderStates::default(), &Outline::uniform(1.0), Vec2f::new(10.0, 5.0), Color::BLACK);
        assert_eq!(list.commands().len(), 4);
        list.clear();
        list.draw_borders(&RenderStates::default(), &Outline::default(), Vec2f::new(10.0, 5.0), Color::BLACK);
        assert!(list.commands().is_empty());
    }
}
