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
#![deny(missing_docs)]
//! `tgui-redux` is the core of a retained-mode widget toolkit: a growable glyph atlas behind a
//! pluggable font backend, a reactive style model that resolves per-state properties, and a
//! rich-text layout engine that turns lightweight markup into positioned, drawable text pieces.
//!
//! Rendering is left to the host: widgets record [`DrawCommand`]s into a [`DrawList`] (or any
//! other [`RenderTarget`]) which a backend replays with its own GPU plumbing.

mod draw;
mod error;
pub mod font;
mod signal;
pub mod style;
pub mod text;
mod texture;
pub mod widgets;

pub use draw::*;
pub use error::*;
pub use font::{FontBackend, FontHandle, Glyph, GlyphBounds, RasterFont, TextureRect};
#[cfg(feature = "fontdue-backend")]
pub use font::FontdueRasterizer;
pub use rs_math3d::*;
pub use signal::*;
pub use style::{ComponentState, Outline, PropertyKind, PropertyValue, SharedRenderer, StyleProperty};
pub use text::{Blueprint, TextDefaults, TextPiece};
pub use texture::*;
pub use widgets::{
    Button, Container, HorizontalAlignment, ImagePiece, LabelSettings, Resources, RichTextLabel, ScrollbarPolicy, VerticalAlignment, Widget, WidgetBase,
};

use bitflags::*;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Opaque yellow.
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// Opaque magenta.
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    /// Opaque cyan.
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 255 } }

    /// Creates a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self { Self { r, g, b, a } }

    /// Returns the color with its alpha multiplied by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let alpha = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    /// Converts into the vertex color representation.
    pub fn to_color4b(self) -> Color4b { color4b(self.r, self.g, self.b, self.a) }
}

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    /// Style bits applied to a run of text.
    pub struct TextStyle : u8 {
        /// Heavier glyphs.
        const BOLD = 1;
        /// Sheared glyphs.
        const ITALIC = 2;
        /// Line below the baseline.
        const UNDERLINED = 4;
        /// Line through the middle of lowercase glyphs.
        const STRIKE_THROUGH = 8;
    }
}

impl TextStyle {
    /// Regular text without any style bits.
    pub const REGULAR: TextStyle = TextStyle::empty();

    /// Returns `true` if the bold bit is set.
    pub fn is_bold(&self) -> bool { self.intersects(Self::BOLD) }
    /// Returns `true` if the italic bit is set.
    pub fn is_italic(&self) -> bool { self.intersects(Self::ITALIC) }
    /// Returns `true` if the underline bit is set.
    pub fn is_underlined(&self) -> bool { self.intersects(Self::UNDERLINED) }
    /// Returns `true` if the strike-through bit is set.
    pub fn is_strike_through(&self) -> bool { self.intersects(Self::STRIKE_THROUGH) }
}

/// Returns `true` for the characters the layout engine treats as breakable whitespace.
pub fn is_whitespace(c: char) -> bool { matches!(c, ' ' | '\t' | '\r' | '\n') }
