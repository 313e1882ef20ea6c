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
use crate::{Color, Error, FontHandle, Result, TextStyle, Texture, TextureManager};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Widths of the four sides of a border or padding.
pub struct Outline {
    /// Left side width.
    pub left: f32,
    /// Top side width.
    pub top: f32,
    /// Right side width.
    pub right: f32,
    /// Bottom side width.
    pub bottom: f32,
}

impl Outline {
    /// Outline with an explicit width per side.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self { Self { left, top, right, bottom } }
    /// Same width on every side.
    pub const fn uniform(width: f32) -> Self { Self::new(width, width, width, width) }
    /// Sum of the left and right widths.
    pub fn horizontal(&self) -> f32 { self.left + self.right }
    /// Sum of the top and bottom widths.
    pub fn vertical(&self) -> f32 { self.top + self.bottom }
    /// Returns `true` if every side is zero.
    pub fn is_zero(&self) -> bool { self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 }
    /// Side-wise sum of two outlines.
    pub fn add(&self, other: &Outline) -> Outline {
        Outline::new(self.left + other.left, self.top + other.top, self.right + other.right, self.bottom + other.bottom)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Closed set of value kinds a renderer property can hold.
pub enum PropertyKind {
    /// [`Color`], optional.
    Color,
    /// [`Texture`], optional.
    Texture,
    /// [`Outline`] such as borders or padding.
    Outline,
    /// Boolean flag.
    Bool,
    /// Floating point number.
    Number,
    /// Free text.
    String,
    /// [`TextStyle`] bit set.
    TextStyle,
    /// [`FontHandle`], optional.
    Font,
}

#[derive(Clone, Debug, PartialEq)]
/// A typed renderer property value.
pub enum PropertyValue {
    /// A color.
    Color(Color),
    /// An image.
    Texture(Texture),
    /// Border or padding widths.
    Outline(Outline),
    /// A flag.
    Bool(bool),
    /// A number.
    Number(f32),
    /// Text.
    String(String),
    /// Text style bits.
    TextStyle(TextStyle),
    /// A font.
    Font(FontHandle),
}

impl PropertyValue {
    /// Kind of the stored value.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::Texture(_) => PropertyKind::Texture,
            PropertyValue::Outline(_) => PropertyKind::Outline,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Number(_) => PropertyKind::Number,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::TextStyle(_) => PropertyKind::TextStyle,
            PropertyValue::Font(_) => PropertyKind::Font,
        }
    }

    /// Parses `text` as a value of `kind` for the property `property`.
    ///
    /// `Ok(None)` means the text explicitly unsets the property (`none` or empty for colors,
    /// textures and fonts). Textures are loaded through `textures`.
    pub fn deserialize(property: &str, kind: PropertyKind, text: &str, textures: &TextureManager) -> Result<Option<PropertyValue>> {
        let invalid = |reason: String| Error::invalid_value(property, text, reason);
        let value = match kind {
            PropertyKind::Color => deserialize_color(text).map_err(invalid)?.map(PropertyValue::Color),
            PropertyKind::Outline => Some(PropertyValue::Outline(deserialize_outline(text).map_err(invalid)?)),
            PropertyKind::Bool => Some(PropertyValue::Bool(deserialize_bool(text).map_err(invalid)?)),
            PropertyKind::Number => Some(PropertyValue::Number(deserialize_number(text).map_err(invalid)?)),
            PropertyKind::String => Some(PropertyValue::String(deserialize_string(text).map_err(invalid)?)),
            PropertyKind::TextStyle => Some(PropertyValue::TextStyle(deserialize_text_style(text).map_err(invalid)?)),
            PropertyKind::Texture => match deserialize_path(text).map_err(invalid)? {
                None => None,
                Some(path) => Some(PropertyValue::Texture(textures.load(&path)?)),
            },
            PropertyKind::Font => match deserialize_path(text).map_err(invalid)? {
                None => None,
                Some(path) => Some(PropertyValue::Font(load_font_file(property, &path)?)),
            },
        };
        Ok(value)
    }
}

#[cfg(feature = "fontdue-backend")]
fn load_font_file(_property: &str, path: &str) -> Result<FontHandle> { FontHandle::from_memory(std::fs::read(path)?) }

#[cfg(not(feature = "fontdue-backend"))]
fn load_font_file(property: &str, path: &str) -> Result<FontHandle> {
    Err(Error::invalid_value(property, path, "no font backend enabled"))
}

fn hex_digit(c: char) -> std::result::Result<u8, String> {
    c.to_digit(16).map(|d| d as u8).ok_or_else(|| format!("'{}' is not a hexadecimal digit", c))
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::RED,
        "green" => Color::GREEN,
        "blue" => Color::BLUE,
        "yellow" => Color::YELLOW,
        "magenta" => Color::MAGENTA,
        "cyan" => Color::CYAN,
        "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

/// Parses a color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, a color name, `rgb(r, g, b)` or
/// `rgba(r, g, b, a)`. `none` and the empty string unset the color.
pub fn deserialize_color(text: &str) -> std::result::Result<Option<Color>, String> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() || lower == "none" {
        return Ok(None);
    }

    if let Some(hex) = lower.strip_prefix('#') {
        let digits = hex.chars().map(hex_digit).collect::<std::result::Result<Vec<u8>, String>>()?;
        let color = match digits.len() {
            3 => Color::rgb(digits[0] * 17, digits[1] * 17, digits[2] * 17),
            4 => Color::rgba(digits[0] * 17, digits[1] * 17, digits[2] * 17, digits[3] * 17),
            6 => Color::rgb(digits[0] << 4 | digits[1], digits[2] << 4 | digits[3], digits[4] << 4 | digits[5]),
            8 => Color::rgba(
                digits[0] << 4 | digits[1],
                digits[2] << 4 | digits[3],
                digits[4] << 4 | digits[5],
                digits[6] << 4 | digits[7],
            ),
            _ => return Err("a hexadecimal color needs 3, 4, 6 or 8 digits".to_string()),
        };
        return Ok(Some(color));
    }

    if let Some(color) = named_color(&lower) {
        return Ok(Some(color));
    }

    let body = lower.strip_prefix("rgba").or_else(|| lower.strip_prefix("rgb")).unwrap_or(&lower).trim();
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| "unknown color name".to_string())?;
    let components = inner
        .split(',')
        .map(|c| c.trim().parse::<u8>().map_err(|_| format!("'{}' is not a color component in 0..=255", c.trim())))
        .collect::<std::result::Result<Vec<u8>, String>>()?;
    match components.as_slice() {
        [r, g, b] => Ok(Some(Color::rgb(*r, *g, *b))),
        [r, g, b, a] => Ok(Some(Color::rgba(*r, *g, *b, *a))),
        _ => Err("expected 3 or 4 color components".to_string()),
    }
}

/// Parses an outline: `n`, `(h, v)` or `(l, t, r, b)`, with optional `()` or `{}`.
pub fn deserialize_outline(text: &str) -> std::result::Result<Outline, String> {
    let mut body = text.trim();
    if (body.starts_with('(') && body.ends_with(')')) || (body.starts_with('{') && body.ends_with('}')) {
        body = &body[1..body.len() - 1];
    }
    let values = body
        .split(',')
        .map(|v| v.trim().parse::<f32>().map_err(|_| format!("'{}' is not a number", v.trim())))
        .collect::<std::result::Result<Vec<f32>, String>>()?;
    match values.as_slice() {
        [all] => Ok(Outline::uniform(*all)),
        [h, v] => Ok(Outline::new(*h, *v, *h, *v)),
        [l, t, r, b] => Ok(Outline::new(*l, *t, *r, *b)),
        _ => Err("expected 1, 2 or 4 values".to_string()),
    }
}

/// Parses `Bold | Italic | Underlined | StrikeThrough | Regular` combinations.
pub fn deserialize_text_style(text: &str) -> std::result::Result<TextStyle, String> {
    let mut style = TextStyle::REGULAR;
    for part in text.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        style |= match part.to_ascii_lowercase().as_str() {
            "regular" => TextStyle::REGULAR,
            "bold" => TextStyle::BOLD,
            "italic" => TextStyle::ITALIC,
            "underlined" => TextStyle::UNDERLINED,
            "strikethrough" => TextStyle::STRIKE_THROUGH,
            _ => return Err(format!("unknown text style '{}'", part)),
        };
    }
    Ok(style)
}

/// Parses `true/false`, `yes/no` or `1/0`.
pub fn deserialize_bool(text: &str) -> std::result::Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err("expected a boolean".to_string()),
    }
}

/// Parses a number.
pub fn deserialize_number(text: &str) -> std::result::Result<f32, String> {
    text.trim().parse::<f32>().map_err(|_| "expected a number".to_string())
}

/// Returns the text as is, or unquoted and unescaped when wrapped in double quotes.
pub fn deserialize_string(text: &str) -> std::result::Result<String, String> {
    let trimmed = text.trim();
    let inner = match trimmed.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(inner) if trimmed.len() >= 2 => inner,
        _ => return Ok(text.to_string()),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{b}'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => return Err(format!("unknown escape sequence '\\{}'", other)),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(out)
}

fn deserialize_path(text: &str) -> std::result::Result<Option<String>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    if trimmed.starts_with('"') {
        return deserialize_string(trimmed).map(Some);
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTextureLoader;

    #[test]
    fn colors() {
        assert_eq!(deserialize_color("#f00"), Ok(Some(Color::RED)));
        assert_eq!(deserialize_color("#0f08"), Ok(Some(Color::rgba(0, 255, 0, 136))));
        assert_eq!(deserialize_color("#102030"), Ok(Some(Color::rgb(16, 32, 48))));
        assert_eq!(deserialize_color("#10203040"), Ok(Some(Color::rgba(16, 32, 48, 64))));
        assert_eq!(deserialize_color(" Blue "), Ok(Some(Color::BLUE)));
        assert_eq!(deserialize_color("rgb(1, 2, 3)"), Ok(Some(Color::rgb(1, 2, 3))));
        assert_eq!(deserialize_color("rgba(1,2,3,4)"), Ok(Some(Color::rgba(1, 2, 3, 4))));
        assert_eq!(deserialize_color("(9, 8, 7)"), Ok(Some(Color::rgb(9, 8, 7))));
        assert_eq!(deserialize_color("None"), Ok(None));
        assert_eq!(deserialize_color(""), Ok(None));
        assert!(deserialize_color("#12345").is_err());
        assert!(deserialize_color("#ggg").is_err());
        assert!(deserialize_color("purplish").is_err());
        assert!(deserialize_color("rgb(300, 0, 0)").is_err());
        assert!(deserialize_color("rgb(1, 2)").is_err());
    }

    #[test]
    fn outlines() {
        assert_eq!(deserialize_outline("2"), Ok(Outline::uniform(2.0)));
        assert_eq!(deserialize_outline("(1, 2)"), Ok(Outline::new(1.0, 2.0, 1.0, 2.0)));
        assert_eq!(deserialize_outline("{1, 2, 3, 4}"), Ok(Outline::new(1.0, 2.0, 3.0, 4.0)));
        assert!(deserialize_outline("(1, 2, 3)").is_err());
        assert!(deserialize_outline("wide").is_err());
    }

    #[test]
    fn text_styles() {
        assert_eq!(deserialize_text_style("Bold | Italic"), Ok(TextStyle::BOLD | TextStyle::ITALIC));
        assert_eq!(deserialize_text_style("StrikeThrough|underlined"), Ok(TextStyle::STRIKE_THROUGH | TextStyle::UNDERLINED));
        assert_eq!(deserialize_text_style("Regular"), Ok(TextStyle::REGULAR));
        assert!(deserialize_text_style("Bold | Heavy").is_err());
    }

    #[test]
    fn scalars_and_strings() {
        assert_eq!(deserialize_bool("Yes"), Ok(true));
        assert_eq!(deserialize_bool("0"), Ok(false));
        assert!(deserialize_bool("maybe").is_err());
        assert_eq!(deserialize_number(" 1.5 "), Ok(1.5));
        assert!(deserialize_number("x").is_err());
        assert_eq!(deserialize_string("plain"), Ok("plain".to_string()));
        assert_eq!(deserialize_string(r#""a\n\"b\"\\""#), Ok("a\n\"b\"\\".to_string()));
        assert!(deserialize_string(r#""bad\q""#).is_err());
    }

    #[test]
    fn deserialize_reports_property_name() {
        let textures = TextureManager::new(MemoryTextureLoader::new());
        match PropertyValue::deserialize("BorderColor", PropertyKind::Color, "#12", &textures) {
            Err(Error::InvalidValue { property, value, .. }) => {
                assert_eq!(property, "BorderColor");
                assert_eq!(value, "#12");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        let unset = PropertyValue::deserialize("TextureBackground", PropertyKind::Texture, "none", &textures);
        assert!(matches!(unset, Ok(None)));
    }

    #[test]
    fn texture_values_load_through_manager() {
        let mut loader = MemoryTextureLoader::new();
        loader.insert_solid("bg.png", 4, 2, Color::WHITE);
        let textures = TextureManager::new(loader);
        match PropertyValue::deserialize("TextureBackground", PropertyKind::Texture, "\"bg.png\"", &textures) {
            Ok(Some(PropertyValue::Texture(texture))) => assert_eq!(texture.size(), (4, 2)),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert!(matches!(
            PropertyValue::deserialize("TextureBackground", PropertyKind::Texture, "missing.png", &textures),
            Err(Error::TextureLoad { .. })
        ));
    }
}
