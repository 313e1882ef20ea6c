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
use crate::{is_whitespace, Blueprint, FontHandle};

#[derive(Clone, Copy)]
enum Unit {
    Char { piece: usize, ch: char },
    Gap { piece: usize, width: f32 },
}

impl Unit {
    fn piece(&self) -> usize {
        match self {
            Unit::Char { piece, .. } | Unit::Gap { piece, .. } => *piece,
        }
    }

    fn is_whitespace(&self) -> bool { matches!(self, Unit::Char { ch, .. } if is_whitespace(*ch)) }

    fn is_space(&self) -> bool { matches!(self, Unit::Char { ch: ' ', .. }) }

    fn is_gap(&self) -> bool { matches!(self, Unit::Gap { .. }) }
}

#[derive(Clone, Copy)]
struct UnitLine {
    start: usize,
    end: usize,
}

// a line may end after whitespace, or on either side of an image
fn is_break(units: &[Unit], before: usize, after: usize) -> bool {
    units[before].is_whitespace() || units[before].is_gap() || units[after].is_gap()
}

/// Splits `units` greedily into lines no wider than `max_width`.
///
/// `measure(prev, index)` is the width unit `index` adds after unit `prev` on the same line.
/// Every line holds at least one unit. A single space at a wrap point is dropped.
fn wrap_units(units: &[Unit], max_width: f32, mut measure: impl FnMut(Option<usize>, usize) -> f32) -> Vec<UnitLine> {
    let n = units.len();
    let mut lines = Vec::new();
    let mut start = 0;
    while start < n {
        let mut end = start;
        let mut width = 0.0;
        while end < n {
            let w = measure((end > start).then(|| end - 1), end);
            if end > start && width + w > max_width {
                break;
            }
            width += w;
            end += 1;
        }

        if end < n && !units[end].is_whitespace() {
            let mut k = end;
            while k > start && !is_break(units, k - 1, k) {
                k -= 1;
            }
            if k > start {
                end = k;
            }
        }
        lines.push(UnitLine { start, end });

        start = end;
        if start < n
            && units[start].is_space()
            && !units[start - 1].is_whitespace()
            && (start + 1 == n || !units[start + 1].is_whitespace())
        {
            start += 1;
        }
    }
    lines
}

fn char_width(font: &FontHandle, ch: char, character_size: u32, bold: bool) -> f32 {
    if ch == '\t' {
        font.glyph(' ', character_size, bold, 0.0).advance * 4.0
    } else {
        font.glyph(ch, character_size, bold, 0.0).advance
    }
}

/// Inserts newlines into `text` so that no line is wider than `max_width`.
///
/// Existing newlines are kept. A zero `max_width` returns the text unchanged.
pub fn word_wrap(max_width: f32, text: &str, font: &FontHandle, character_size: u32, bold: bool) -> String {
    if max_width <= 0.0 {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            result.push('\n');
        }
        let units: Vec<Unit> = line.chars().map(|ch| Unit::Char { piece: 0, ch }).collect();
        let chars: Vec<char> = line.chars().collect();
        let wrapped = wrap_units(&units, max_width, |prev, index| {
            let kerning = prev.map_or(0.0, |p| font.kerning(chars[p], chars[index], character_size, bold));
            char_width(font, chars[index], character_size, bold) + kerning
        });
        for (j, range) in wrapped.iter().enumerate() {
            if j > 0 {
                result.push('\n');
            }
            result.extend(&chars[range.start..range.end]);
        }
    }
    result
}

fn blueprint_units(line: &[Blueprint]) -> Vec<Unit> {
    let mut units = Vec::new();
    for (piece, blueprint) in line.iter().enumerate() {
        if blueprint.is_gap() {
            units.push(Unit::Gap {
                piece,
                width: blueprint.gap_size.0 as f32,
            });
        } else {
            units.extend(blueprint.text.chars().map(|ch| Unit::Char { piece, ch }));
        }
    }
    units
}

fn measure_unit(font: &FontHandle, line: &[Blueprint], units: &[Unit], prev: Option<usize>, index: usize) -> f32 {
    let (piece, ch) = match units[index] {
        Unit::Gap { width, .. } => return width,
        Unit::Char { piece, ch } => (&line[piece], ch),
    };
    let bold = piece.style.is_bold();
    let kerning = match prev.map(|p| units[p]) {
        Some(Unit::Char { piece: prev_piece, ch: prev_ch }) => {
            let prev_bp = &line[prev_piece];
            if prev_piece == units[index].piece() {
                font.kerning(prev_ch, ch, piece.character_size, bold)
            } else {
                let size = prev_bp.character_size.min(piece.character_size);
                font.kerning(prev_ch, ch, size, bold && prev_bp.style.is_bold())
            }
        }
        _ => 0.0,
    };
    char_width(font, ch, piece.character_size, bold) + kerning
}

/// Re-segments each line of blueprints so that no visual line is wider than `max_width`.
///
/// Images are atomic. A line keeps its own blueprints' attributes; a blueprint split across a
/// wrap point continues on the next line with the same attributes. A zero `max_width`
/// returns the lines unchanged.
pub fn word_wrap_blueprints(max_width: f32, lines: &[Vec<Blueprint>], font: &FontHandle) -> Vec<Vec<Blueprint>> {
    if max_width <= 0.0 {
        return lines.to_vec();
    }
    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        let units = blueprint_units(line);
        if units.is_empty() {
            result.push(line.clone());
            continue;
        }
        let wrapped = wrap_units(&units, max_width, |prev, index| measure_unit(font, line, &units, prev, index));
        for range in wrapped {
            let mut out: Vec<Blueprint> = Vec::new();
            let mut current_piece = None;
            for unit in &units[range.start..range.end] {
                match unit {
                    Unit::Gap { piece, .. } => {
                        out.push(line[*piece].clone());
                        current_piece = None;
                    }
                    Unit::Char { piece, ch } => {
                        if current_piece != Some(*piece) {
                            out.push(Blueprint { text: String::new(), ..line[*piece].clone() });
                            current_piece = Some(*piece);
                        }
                        if let Some(last) = out.last_mut() {
                            last.text.push(*ch);
                        }
                    }
                }
            }
            result.push(out);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font;
    use crate::{Color, TextStyle};

    // every glyph of the fake font advances 10 pixels at size 20
    fn bp(text: &str) -> Blueprint { Blueprint::text(text, 20, TextStyle::REGULAR, Color::BLACK) }

    fn texts(lines: &[Vec<Blueprint>]) -> Vec<String> {
        lines.iter().map(|l| l.iter().map(|b| b.text.as_str()).collect::<String>()).collect()
    }

    #[test]
    fn plain_wrap_breaks_at_spaces() {
        let font = fake_font();
        assert_eq!(word_wrap(90.0, "hello world", &font, 20, false), "hello \nworld");
        // the overflowing space is where the line breaks, and it is dropped
        assert_eq!(word_wrap(50.0, "hello world", &font, 20, false), "hello\nworld");
        assert_eq!(word_wrap(80.0, "hello world foo", &font, 20, false), "hello \nworld \nfoo");
        assert_eq!(word_wrap(0.0, "hello world", &font, 20, false), "hello world");
        assert_eq!(word_wrap(500.0, "a\nb", &font, 20, false), "a\nb");
    }

    #[test]
    fn long_words_split_by_character() {
        let font = fake_font();
        assert_eq!(word_wrap(30.0, "abcdefg", &font, 20, false), "abc\ndef\ng");
        // narrower than one glyph still makes progress
        assert_eq!(word_wrap(5.0, "ab", &font, 20, false), "a\nb");
    }

    #[test]
    fn wrapping_is_a_fixed_point() {
        let font = fake_font();
        for width in [25.0, 45.0, 60.0, 95.0, 130.0] {
            let text = "the quick  brown fox\tjumps over the lazy dog";
            let once = word_wrap(width, text, &font, 20, false);
            assert_eq!(word_wrap(width, &once, &font, 20, false), once, "width {}", width);

            let lines = vec![vec![bp("the quick "), Blueprint { style: TextStyle::BOLD, ..bp("brown") }, bp(" fox jumps")]];
            let wrapped = word_wrap_blueprints(width, &lines, &font);
            assert_eq!(word_wrap_blueprints(width, &wrapped, &font), wrapped, "width {}", width);
        }
    }

    #[test]
    fn blueprints_keep_attributes_across_breaks() {
        let font = fake_font();
        let bold = Blueprint { style: TextStyle::BOLD, ..bp("bold text") };
        let lines = vec![vec![bp("aa "), bold]];
        let wrapped = word_wrap_blueprints(80.0, &lines, &font);
        assert_eq!(texts(&wrapped), vec!["aa bold", "text"]);
        assert_eq!(wrapped[0].len(), 2);
        assert_eq!(wrapped[0][1].style, TextStyle::BOLD);
        assert_eq!(wrapped[1][0].style, TextStyle::BOLD);
    }

    #[test]
    fn images_are_atomic() {
        let font = fake_font();
        let lines = vec![vec![bp("ab"), Blueprint::gap(50, 10), bp("cd")]];
        let wrapped = word_wrap_blueprints(60.0, &lines, &font);
        assert_eq!(wrapped.len(), 3);
        assert!(wrapped[1][0].is_gap());
        assert_eq!(texts(&wrapped), vec!["ab", "", "cd"]);
    }

    #[test]
    fn empty_lines_pass_through() {
        let font = fake_font();
        let lines = vec![vec![bp("")], vec![bp("x")]];
        assert_eq!(word_wrap_blueprints(10.0, &lines, &font), lines);
    }
}
