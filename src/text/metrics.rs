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
use super::Blueprint;
use crate::{FontHandle, TextStyle};

/// Width of `text` up to its first newline. A tab counts as four spaces.
pub fn line_width(text: &str, font: &FontHandle, character_size: u32, style: TextStyle) -> f32 {
    let bold = style.is_bold();
    let mut width = 0.0;
    let mut prev = '\0';
    for c in text.chars() {
        if c == '\n' {
            break;
        }
        let advance = if c == '\t' {
            font.glyph(' ', character_size, bold, 0.0).advance * 4.0
        } else {
            font.glyph(c, character_size, bold, 0.0).advance
        };
        width += advance + font.kerning(prev, c, character_size, bold);
        prev = c;
    }
    width
}

/// Space between the top of a line and the tallest descender beyond the line spacing.
pub fn calculate_extra_vertical_space(font: &FontHandle, character_size: u32, style: TextStyle) -> f32 {
    let bounds = font.glyph('g', character_size, style.is_bold(), 0.0).bounds;
    character_size as f32 + bounds.top + bounds.height - font.line_spacing(character_size)
}

/// Line spacing plus the extra vertical space.
pub fn line_height(font: &FontHandle, character_size: u32, style: TextStyle) -> f32 {
    font.line_spacing(character_size) + calculate_extra_vertical_space(font, character_size, style)
}

/// Horizontal distance between a text box edge and its text.
pub fn extra_horizontal_padding(font: &FontHandle, character_size: u32, style: TextStyle) -> f32 {
    line_height(font, character_size, style) / 10.0
}

/// Horizontal offset used by single line inputs.
pub fn extra_horizontal_offset(font: &FontHandle, character_size: u32, style: TextStyle) -> f32 {
    line_height(font, character_size, style) / 6.0
}

/// Padding kept below the last line so descenders are not clipped.
pub fn extra_vertical_padding(character_size: u32) -> f32 { (character_size as f32 / 8.0).round().max(1.0) }

/// Largest character size whose line height fits `height`.
///
/// When no size fits exactly, `fit < 0` picks the size below, `fit > 0` the size above and
/// `fit == 0` the closer of the two.
pub fn find_best_text_size(font: &FontHandle, height: f32, fit: i32) -> u32 {
    if height < 2.0 {
        return 1;
    }
    let max_size = height as u32;
    let fits = |size: u32| line_height(font, size, TextStyle::REGULAR) < height;

    // lower bound over 1..=max_size
    let (mut lo, mut hi) = (1u32, max_size + 1);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if fits(mid) { lo = mid + 1 } else { hi = mid }
    }
    let high = lo;
    if high > max_size {
        return max_size;
    }

    let high_height = line_height(font, high, TextStyle::REGULAR);
    if high_height == height || high == 1 {
        return high;
    }
    let low = high - 1;
    let low_height = line_height(font, low, TextStyle::REGULAR);
    match fit {
        f if f < 0 => low,
        f if f > 0 => high,
        _ if (height - low_height).abs() < (high_height - height).abs() => low,
        _ => high,
    }
}

/// Distance from the top of `line` to the top of the next one.
///
/// A line holding a single run at `default_size` uses `default_spacing` as is. Otherwise the
/// largest character size and the tallest image of the line decide. An empty line takes no
/// space.
pub fn calculate_line_spacing(line: &[Blueprint], font: &FontHandle, default_size: u32, default_spacing: f32) -> f32 {
    if let [single] = line {
        if !single.is_gap() && single.character_size == default_size {
            return default_spacing;
        }
    }
    let mut max_size = 0;
    let mut max_gap = 0;
    for blueprint in line {
        if blueprint.is_gap() {
            max_gap = max_gap.max(blueprint.gap_size.1);
        } else {
            max_size = max_size.max(blueprint.character_size);
        }
    }
    let spacing = if max_size > 0 { font.line_spacing(max_size) } else { 0.0 };
    spacing.max(max_gap as f32)
}

/// Height of a block of laid out lines, including the padding below the last one.
pub fn calculate_text_height(lines: &[Vec<Blueprint>], font: &FontHandle, default_size: u32, default_spacing: f32) -> f32 {
    let mut height: f32 = lines.iter().map(|line| calculate_line_spacing(line, font, default_size, default_spacing)).sum();
    height += extra_vertical_padding(default_size);

    // glyphs of the last line may reach below its line spacing
    let last_size = lines
        .last()
        .and_then(|line| line.iter().filter(|b| !b.is_gap()).map(|b| b.character_size).max())
        .unwrap_or(0);
    if last_size > 0 {
        let overflow = font.font_height(last_size) - font.line_spacing(last_size);
        if overflow > 0.0 {
            height += overflow;
        }
    }
    height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font;

    #[test]
    fn widths_with_tabs_and_kerning() {
        let font = fake_font();
        assert_eq!(line_width("ab", &font, 20, TextStyle::REGULAR), 20.0);
        assert_eq!(line_width("\t", &font, 20, TextStyle::REGULAR), 40.0);
        assert_eq!(line_width("AV", &font, 20, TextStyle::REGULAR), 17.0);
        assert_eq!(line_width("a\nbbb", &font, 20, TextStyle::REGULAR), 10.0);
        assert_eq!(line_width("a", &font, 20, TextStyle::BOLD), 11.0);
    }

    #[test]
    fn vertical_metrics() {
        let font = fake_font();
        assert_eq!(calculate_extra_vertical_space(&font, 20, TextStyle::REGULAR), 0.0);
        assert_eq!(line_height(&font, 20, TextStyle::REGULAR), 24.0);
        assert_eq!(extra_horizontal_padding(&font, 20, TextStyle::REGULAR), 2.4);
        assert_eq!(extra_vertical_padding(20), 3.0);
        assert_eq!(extra_vertical_padding(3), 1.0);
    }

    #[test]
    fn best_text_size() {
        let font = fake_font();
        assert_eq!(find_best_text_size(&font, 1.0, 0), 1);
        let size = find_best_text_size(&font, 24.5, -1);
        assert!(line_height(&font, size, TextStyle::REGULAR) < 24.5);
        assert!(line_height(&font, size + 1, TextStyle::REGULAR) >= 24.5 || size + 1 > 24);
        let above = find_best_text_size(&font, 24.5, 1);
        assert_eq!(above, size + 1);
    }

    #[test]
    fn spacing_of_mixed_lines() {
        let font = fake_font();
        let text = |size| Blueprint::text("a", size, TextStyle::REGULAR, crate::Color::BLACK);
        assert_eq!(calculate_line_spacing(&[text(20)], &font, 20, 99.0), 99.0);
        assert_eq!(calculate_line_spacing(&[text(30)], &font, 20, 24.0), 36.0);
        assert_eq!(calculate_line_spacing(&[text(20), text(30)], &font, 20, 24.0), 36.0);
        assert_eq!(calculate_line_spacing(&[text(20), Blueprint::gap(10, 50)], &font, 20, 24.0), 50.0);
        assert_eq!(calculate_line_spacing(&[], &font, 20, 24.0), 0.0);
    }

    #[test]
    fn height_of_a_block() {
        let font = fake_font();
        let line = vec![Blueprint::text("a", 20, TextStyle::REGULAR, crate::Color::BLACK)];
        assert_eq!(calculate_text_height(&[line.clone(), line], &font, 20, 24.0), 51.0);
        assert_eq!(calculate_text_height(&[vec![Blueprint::gap(8, 40)]], &font, 20, 24.0), 43.0);
    }
}
