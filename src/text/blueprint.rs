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
use crate::{Color, TextStyle};

#[derive(Clone, Debug, PartialEq)]
/// Unrendered description of a styled run of text or of an inline image gap.
pub struct Blueprint {
    /// Run text. Empty for gaps.
    pub text: String,
    /// Character size in pixels. Zero for gaps.
    pub character_size: u32,
    /// Style bits.
    pub style: TextStyle,
    /// Text color.
    pub color: Color,
    /// Pixel size of the inline image, `(0, 0)` for text runs.
    pub gap_size: (u32, u32),
}

impl Blueprint {
    /// Text run with the given attributes.
    pub fn text(text: &str, character_size: u32, style: TextStyle, color: Color) -> Self {
        Self {
            text: text.to_string(),
            character_size,
            style,
            color,
            gap_size: (0, 0),
        }
    }

    /// Image gap of `width x height` pixels.
    pub fn gap(width: u32, height: u32) -> Self {
        Self {
            text: String::new(),
            character_size: 0,
            style: TextStyle::REGULAR,
            color: Color::default(),
            gap_size: (width, height),
        }
    }

    /// Returns `true` for image gaps.
    pub fn is_gap(&self) -> bool { self.gap_size != (0, 0) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Attributes text starts with before any markup applies.
pub struct TextDefaults {
    /// Character size used outside `<size>` tags.
    pub character_size: u32,
    /// Style used outside style tags.
    pub style: TextStyle,
    /// Color used outside `<color>` tags.
    pub color: Color,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            character_size: 18,
            style: TextStyle::REGULAR,
            color: Color::BLACK,
        }
    }
}
