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
use crate::style::deserialize_color;
use crate::{Blueprint, Color, TextDefaults, TextStyle, Texture};

/// Lines of blueprints plus the images referenced by their gaps, in order of appearance.
pub type RichLines = (Vec<Vec<Blueprint>>, Vec<Texture>);

struct MarkupParser<'a> {
    defaults: &'a TextDefaults,
    lines: Vec<Vec<Blueprint>>,
    images: Vec<Texture>,
    line: Vec<Blueprint>,
    pending: String,
    style: TextStyle,
    size: u32,
    color: Color,
    size_stack: Vec<u32>,
    color_stack: Vec<Color>,
}

impl<'a> MarkupParser<'a> {
    fn new(defaults: &'a TextDefaults) -> Self {
        Self {
            defaults,
            lines: Vec::new(),
            images: Vec::new(),
            line: Vec::new(),
            pending: String::new(),
            style: defaults.style,
            size: defaults.character_size,
            color: defaults.color,
            size_stack: Vec::new(),
            color_stack: Vec::new(),
        }
    }

    fn flush(&mut self) {
        let piece = Blueprint::text(&self.pending, self.size, self.style, self.color);
        let line_empty = self.line.is_empty();
        match self.line.last_mut() {
            Some(last) if last.text.is_empty() && !last.is_gap() => *last = piece,
            _ if !self.pending.is_empty() || line_empty => self.line.push(piece),
            _ => (),
        }
        self.pending.clear();
    }

    fn end_line(&mut self) {
        self.flush();
        self.lines.push(std::mem::take(&mut self.line));
    }

    fn set_style_bit(&mut self, bit: TextStyle, on: bool) {
        self.flush();
        self.style.set(bit, on);
    }

    /// Applies a tag body (between `<` and `>`). Returns `false` when the tag is not recognized.
    fn apply_tag(&mut self, tag: &str, load_image: &mut dyn FnMut(&str) -> Option<Texture>) -> bool {
        if let Some(name) = tag.strip_prefix('/') {
            return self.apply_closing_tag(name);
        }

        if let Some(bit) = style_bit(tag) {
            self.set_style_bit(bit, true);
            return true;
        }

        if let Some(value) = tag.strip_prefix("color=") {
            return match deserialize_color(value) {
                Ok(Some(color)) => {
                    self.flush();
                    self.color = color;
                    self.color_stack.push(color);
                    true
                }
                _ => false,
            };
        }

        if let Some(value) = tag.strip_prefix("size=") {
            return match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => {
                    self.flush();
                    self.size = size;
                    self.size_stack.push(size);
                    true
                }
                _ => false,
            };
        }

        if let Some(path) = tag.strip_prefix("img=") {
            let texture = match load_image(path.trim()) {
                Some(texture) if !texture.is_empty() => texture,
                _ => return false,
            };
            if !self.pending.is_empty() {
                self.flush();
            }
            let (width, height) = texture.size();
            self.line.push(Blueprint::gap(width, height));
            self.images.push(texture);
            return true;
        }

        false
    }

    fn apply_closing_tag(&mut self, name: &str) -> bool {
        if let Some(bit) = style_bit(name) {
            self.set_style_bit(bit, false);
            return true;
        }
        match name {
            "color" => {
                self.flush();
                self.color_stack.pop();
                self.color = self.color_stack.last().copied().unwrap_or(self.defaults.color);
                true
            }
            "size" => {
                self.flush();
                self.size_stack.pop();
                self.size = self.size_stack.last().copied().unwrap_or(self.defaults.character_size);
                true
            }
            _ => false,
        }
    }
}

fn style_bit(name: &str) -> Option<TextStyle> {
    match name {
        "b" => Some(TextStyle::BOLD),
        "i" => Some(TextStyle::ITALIC),
        "u" => Some(TextStyle::UNDERLINED),
        "s" => Some(TextStyle::STRIKE_THROUGH),
        _ => None,
    }
}

fn entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        _ => None,
    }
}

/// Parses the markup in `source` into lines of blueprints.
///
/// Recognizes `<b> <i> <u> <s>`, `<color=..>`, `<size=..>`, `<img=..>` with their closing tags
/// and the `&lt; &gt; &amp;` entities. Anything malformed or unknown stays in the text as
/// written. `load_image` resolves `<img>` paths; a `None` keeps the tag as literal text.
pub fn construct_rich_line_blueprints(
    source: &str,
    defaults: &TextDefaults,
    load_image: &mut dyn FnMut(&str) -> Option<Texture>,
) -> RichLines {
    let chars: Vec<char> = source.chars().filter(|c| *c != '\r').collect();
    let mut parser = MarkupParser::new(defaults);

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\n' => {
                parser.end_line();
                i += 1;
            }
            '&' => {
                let decoded = chars[i + 1..]
                    .iter()
                    .position(|c| *c == ';')
                    .filter(|len| *len > 0)
                    .and_then(|len| {
                        let name: String = chars[i + 1..i + 1 + len].iter().collect();
                        entity(&name).map(|c| (c, len))
                    });
                match decoded {
                    Some((c, len)) => {
                        parser.pending.push(c);
                        i += len + 2;
                    }
                    None => {
                        parser.pending.push('&');
                        i += 1;
                    }
                }
            }
            '<' => {
                let closing = chars[i + 1..].iter().position(|c| *c == '>').filter(|len| *len > 0);
                let consumed = closing.and_then(|len| {
                    let tag: String = chars[i + 1..i + 1 + len].iter().collect();
                    parser.apply_tag(&tag, load_image).then_some(len)
                });
                match consumed {
                    Some(len) => i += len + 2,
                    None => {
                        parser.pending.push('<');
                        i += 1;
                    }
                }
            }
            c => {
                parser.pending.push(c);
                i += 1;
            }
        }
    }

    parser.end_line();
    (parser.lines, parser.images)
}
