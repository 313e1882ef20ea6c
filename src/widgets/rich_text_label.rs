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
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::{debug, warn};

use super::{
    new_styled, own_renderer, replace_renderer, share_renderer, HorizontalAlignment, RendererSlot, Resources, Scrollbar, ScrollbarPolicy, Styled,
    VerticalAlignment, Widget, WidgetBase, DEFAULT_TEXT_SIZE,
};
use crate::style::{PropertyDef, PropertyDefault, PropertyTable, RendererData, RendererObserver};
use crate::text::{
    calculate_line_spacing, calculate_text_height, construct_rich_line_blueprints, extra_horizontal_padding, word_wrap_blueprints, TextDefaults,
};
use crate::{
    is_whitespace, Color, FloatRect, FontHandle, Outline, PropertyKind, RenderStates, RenderTarget, SharedRenderer, TextPiece, TextStyle, Texture,
    Vec2f,
};

static LABEL_PROPERTIES: [PropertyDef; 13] = [
    PropertyDef::new("Borders", PropertyKind::Outline, PropertyDefault::Outline(Outline::uniform(0.0))),
    PropertyDef::new("Padding", PropertyKind::Outline, PropertyDefault::Outline(Outline::uniform(0.0))),
    PropertyDef::new("TextColor", PropertyKind::Color, PropertyDefault::Color(Color::rgb(60, 60, 60))),
    PropertyDef::new("TextStyle", PropertyKind::TextStyle, PropertyDefault::TextStyle(TextStyle::REGULAR)),
    PropertyDef::new("BackgroundColor", PropertyKind::Color, PropertyDefault::Color(Color::TRANSPARENT)),
    PropertyDef::new("BorderColor", PropertyKind::Color, PropertyDefault::Color(Color::rgb(60, 60, 60))),
    PropertyDef::new("TextOutlineColor", PropertyKind::Color, PropertyDefault::Color(Color::BLACK)),
    PropertyDef::new("TextOutlineThickness", PropertyKind::Number, PropertyDefault::Number(0.0)),
    PropertyDef::new("TextureBackground", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("ScrollbarWidth", PropertyKind::Number, PropertyDefault::Number(0.0)),
    PropertyDef::new("Font", PropertyKind::Font, PropertyDefault::Unset),
    PropertyDef::new("Opacity", PropertyKind::Number, PropertyDefault::Number(1.0)),
    PropertyDef::new("OpacityDisabled", PropertyKind::Number, PropertyDefault::Number(-1.0)),
];

/// Properties understood by [`RichTextLabel`].
pub static LABEL_TABLE: PropertyTable = PropertyTable {
    widget_type: "RichTextLabel",
    properties: &LABEL_PROPERTIES,
};

#[derive(Copy, Clone, Debug, PartialEq)]
/// Layout settings of a [`RichTextLabel`].
pub struct LabelSettings {
    /// Character size of unmarked text. `0` inherits the size from the parent resources.
    pub text_size: u32,
    /// Placement of each line.
    pub horizontal_alignment: HorizontalAlignment,
    /// Placement of the whole block.
    pub vertical_alignment: VerticalAlignment,
    /// When the vertical scrollbar shows.
    pub scrollbar_policy: ScrollbarPolicy,
    /// Grow or shrink the label to its text.
    pub auto_size: bool,
    /// Wrap width while auto sizing. `0` never wraps.
    pub maximum_text_width: f32,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            text_size: DEFAULT_TEXT_SIZE,
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            scrollbar_policy: ScrollbarPolicy::Automatic,
            auto_size: true,
            maximum_text_width: 0.0,
        }
    }
}

#[derive(Clone)]
/// Inline image placed by the layout.
pub struct ImagePiece {
    /// Image to draw.
    pub texture: Texture,
    /// Top left corner relative to the label.
    pub position: Vec2f,
    /// Drawn size, the texture size.
    pub size: Vec2f,
}

struct LabelState {
    base: WidgetBase,
    slot: RendererSlot,
    text: String,
    settings: LabelSettings,

    borders: Outline,
    padding: Outline,
    text_color: Color,
    text_style: TextStyle,
    background_color: Color,
    border_color: Color,
    outline_color: Color,
    outline_thickness: f32,
    background_texture: Option<Texture>,
    renderer_font: Option<FontHandle>,
    opacity: f32,
    opacity_disabled: f32,

    scrollbar: Scrollbar,
    lines: Vec<Vec<TextPiece>>,
    images: Vec<ImagePiece>,
    text_height: f32,
    needs_rearrange: bool,
}

fn translate(position: Vec2f, dx: f32, dy: f32) -> Vec2f { Vec2f::new(position.x + dx, position.y + dy) }

impl LabelState {
    fn new(settings: LabelSettings) -> Self {
        Self {
            base: WidgetBase::default(),
            slot: RendererSlot::new(SharedRenderer::new(&LABEL_TABLE)),
            text: String::new(),
            settings,
            borders: Outline::default(),
            padding: Outline::default(),
            text_color: Color::BLACK,
            text_style: TextStyle::REGULAR,
            background_color: Color::TRANSPARENT,
            border_color: Color::BLACK,
            outline_color: Color::BLACK,
            outline_thickness: 0.0,
            background_texture: None,
            renderer_font: None,
            opacity: 1.0,
            opacity_disabled: -1.0,
            scrollbar: Scrollbar::default(),
            lines: Vec::new(),
            images: Vec::new(),
            text_height: 0.0,
            needs_rearrange: true,
        }
    }

    fn font(&self) -> Option<FontHandle> {
        self.renderer_font.clone().or_else(|| self.base.resources.as_ref().and_then(|r| r.font.clone()))
    }

    fn text_size(&self) -> u32 {
        match self.settings.text_size {
            0 => self.base.resources.as_ref().map_or(DEFAULT_TEXT_SIZE, |r| r.text_size),
            size => size,
        }
    }

    fn current_opacity(&self) -> f32 {
        if !self.base.enabled && self.opacity_disabled != -1.0 { self.opacity_disabled } else { self.opacity }
    }

    fn ensure_layout(&mut self) {
        if self.needs_rearrange {
            self.rearrange();
        }
    }

    fn scrollbar_track(&self) -> FloatRect {
        let size = self.base.size;
        let width = self.scrollbar.width();
        FloatRect::new(size.x - self.borders.right - width, self.borders.top, width, size.y - self.borders.vertical())
    }

    fn place_piece(&self, font: &FontHandle, blueprint_text: &str, character_size: u32, style: TextStyle, color: Color, position: Vec2f) -> TextPiece {
        let mut piece = TextPiece::new();
        piece.set_font(Some(font.clone()));
        piece.set_string(blueprint_text);
        piece.set_character_size(character_size);
        piece.set_style(style);
        piece.set_color(color);
        piece.set_opacity(self.current_opacity());
        piece.set_outline_color(self.outline_color);
        piece.set_outline_thickness(self.outline_thickness);
        piece.set_position(position);
        piece
    }

    fn rearrange(&mut self) {
        self.needs_rearrange = false;
        self.lines.clear();
        self.images.clear();
        self.text_height = 0.0;
        self.scrollbar.set_policy(self.settings.scrollbar_policy);

        let font = match self.font() {
            Some(font) => font,
            None => return,
        };
        let auto_size = self.settings.auto_size;
        let outline = self.padding.add(&self.borders);
        let size = self.base.size;
        if !auto_size && (size.x <= outline.horizontal() || size.y <= outline.vertical()) {
            return;
        }

        let text_size = self.text_size();
        let text_offset = extra_horizontal_padding(&font, text_size, TextStyle::REGULAR);
        let scrollbar_width = self.scrollbar.width();
        let policy = self.scrollbar.policy();

        let mut max_width = if auto_size {
            (self.settings.maximum_text_width - 2.0 * text_offset).max(0.0)
        } else {
            let mut width = size.x - outline.horizontal() - 2.0 * text_offset;
            if policy == ScrollbarPolicy::Always {
                width -= scrollbar_width;
            }
            if width <= 0.0 {
                return;
            }
            width
        };

        let defaults = TextDefaults {
            character_size: text_size,
            style: self.text_style,
            color: self.text_color,
        };
        let textures = self.base.resources().textures;
        let (blueprints, textures) = construct_rich_line_blueprints(&self.text, &defaults, &mut |path: &str| match textures.load(path) {
            Ok(texture) => Some(texture),
            Err(err) => {
                warn!("cannot load inline image {}: {}", path, err);
                None
            }
        });

        let default_spacing = font.line_spacing(text_size);
        let mut lines = word_wrap_blueprints(max_width, &blueprints, &font);
        let mut text_height = calculate_text_height(&lines, &font, text_size, default_spacing);

        // room for the scrollbar once the text turns out taller than the label
        if !auto_size && policy == ScrollbarPolicy::Automatic && text_height > size.y - outline.vertical() {
            max_width -= scrollbar_width;
            if max_width <= 0.0 {
                return;
            }
            lines = word_wrap_blueprints(max_width, &blueprints, &font);
            text_height = calculate_text_height(&lines, &font, text_size, default_spacing);
        }

        let origin = Vec2f::new(self.borders.left + self.padding.left + text_offset, self.borders.top + self.padding.top);
        let mut textures = textures.into_iter();
        let mut image_lines = Vec::new();
        let mut line_widths = Vec::with_capacity(lines.len());
        let mut y = 0.0;
        for (line_index, line) in lines.iter().enumerate() {
            let first_image = self.images.len();
            let mut pieces: Vec<TextPiece> = Vec::new();
            let mut x = 0.0;
            let mut line_height = 0.0f32;
            let mut previous: Option<(char, u32, bool)> = None;
            for blueprint in line {
                if blueprint.is_gap() {
                    let (width, height) = blueprint.gap_size;
                    if let Some(texture) = textures.next() {
                        self.images.push(ImagePiece {
                            texture,
                            position: translate(origin, x, y),
                            size: Vec2f::new(width as f32, height as f32),
                        });
                        image_lines.push(line_index);
                    }
                    x += width as f32;
                    line_height = line_height.max(height as f32);
                    previous = None;
                    continue;
                }

                let bold = blueprint.style.is_bold();
                if let (Some((last, last_size, last_bold)), Some(first)) = (previous, blueprint.text.chars().next()) {
                    x += font.kerning(last, first, last_size.min(blueprint.character_size), last_bold && bold);
                }
                let piece = self.place_piece(&font, &blueprint.text, blueprint.character_size, blueprint.style, blueprint.color, translate(origin, x, y));
                let piece_size = piece.size();
                x += piece_size.x;
                line_height = line_height.max(piece_size.y);
                previous = blueprint.text.chars().last().map(|c| (c, blueprint.character_size, bold));
                pieces.push(piece);
            }

            // everything on a line shares its bottom edge
            for piece in pieces.iter_mut() {
                let offset = line_height - piece.size().y;
                piece.set_position(translate(piece.position(), 0.0, offset));
            }
            for image in self.images[first_image..].iter_mut() {
                image.position.y += line_height - image.size.y;
            }

            let mut width = x;
            if let (Some(piece), Some(last)) = (pieces.last(), line.last()) {
                if !last.is_gap() {
                    let text = piece.string();
                    let kept = text.trim_end_matches(is_whitespace).chars().count();
                    if kept < text.chars().count() {
                        width -= piece.size().x - piece.find_character_pos(kept).x;
                    }
                }
            }
            line_widths.push(width);
            self.lines.push(pieces);
            y += calculate_line_spacing(line, &font, text_size, default_spacing);
        }

        let content_width = if max_width > 0.0 { max_width } else { line_widths.iter().copied().fold(0.0, f32::max) };
        let alignment = self.settings.horizontal_alignment;
        if alignment != HorizontalAlignment::Left {
            for (index, width) in line_widths.iter().enumerate() {
                let shift = match alignment {
                    HorizontalAlignment::Center => (content_width - width) / 2.0,
                    HorizontalAlignment::Right => content_width - width,
                    HorizontalAlignment::Left => 0.0,
                };
                for piece in self.lines[index].iter_mut() {
                    piece.set_position(translate(piece.position(), shift, 0.0));
                }
                for (image, _) in self.images.iter_mut().zip(&image_lines).filter(|(_, line)| **line == index) {
                    image.position.x += shift;
                }
            }
        }

        if auto_size {
            self.base.size = Vec2f::new(content_width + 2.0 * text_offset + outline.horizontal(), text_height + outline.vertical());
        }

        let inner_height = self.base.size.y - outline.vertical();
        self.scrollbar.set_viewport(inner_height.max(0.0) as u32);
        self.scrollbar.set_maximum(text_height as u32);
        self.scrollbar.set_scroll_amount(text_size);

        let alignment = self.settings.vertical_alignment;
        let overflows = self.scrollbar.is_shown() && text_height > inner_height;
        if alignment != VerticalAlignment::Top && !overflows {
            let shift = match alignment {
                VerticalAlignment::Center => (inner_height - text_height) / 2.0,
                VerticalAlignment::Bottom => inner_height - text_height,
                VerticalAlignment::Top => 0.0,
            };
            for piece in self.lines.iter_mut().flatten() {
                piece.set_position(translate(piece.position(), 0.0, shift));
            }
            for image in self.images.iter_mut() {
                image.position.y += shift;
            }
        }

        self.text_height = text_height;
        debug!("label laid out {} lines, {} images, text height {}", self.lines.len(), self.images.len(), text_height);
    }
}

impl RendererObserver for LabelState {
    fn renderer_changed(&mut self, property: &'static str, renderer: &RendererData) {
        match property {
            "Borders" => self.borders = renderer.outline(property),
            "Padding" => self.padding = renderer.outline(property),
            "TextColor" => self.text_color = renderer.color(property).unwrap_or(Color::BLACK),
            "TextStyle" => self.text_style = renderer.text_style(property).unwrap_or(TextStyle::REGULAR),
            "BackgroundColor" => self.background_color = renderer.color(property).unwrap_or(Color::TRANSPARENT),
            "BorderColor" => self.border_color = renderer.color(property).unwrap_or(Color::TRANSPARENT),
            "TextOutlineColor" => self.outline_color = renderer.color(property).unwrap_or(Color::BLACK),
            "TextOutlineThickness" => self.outline_thickness = renderer.number(property),
            "TextureBackground" => self.background_texture = renderer.texture(property),
            "ScrollbarWidth" => self.scrollbar.set_width(renderer.number(property)),
            "Font" => self.renderer_font = renderer.font(property),
            "Opacity" => self.opacity = renderer.number(property).clamp(0.0, 1.0),
            "OpacityDisabled" => self.opacity_disabled = renderer.number(property),
            _ => return,
        }
        self.needs_rearrange = true;
    }
}

impl Styled for LabelState {
    fn slot(&self) -> &RendererSlot { &self.slot }
    fn slot_mut(&mut self) -> &mut RendererSlot { &mut self.slot }
}

#[derive(Clone)]
/// Read-only multi-line label rendering lightweight markup.
///
/// Supported tags are `<b> <i> <u> <s>`, `<color=..>`, `<size=..>` and `<img=..>`. The layout
/// is recomputed lazily, the first time it is needed after a change.
pub struct RichTextLabel {
    state: Rc<RefCell<LabelState>>,
}

impl Default for RichTextLabel {
    fn default() -> Self { Self::new() }
}

impl RichTextLabel {
    /// Empty, auto sized label.
    pub fn new() -> Self { Self::with_settings(LabelSettings::default()) }

    /// Empty label with the given layout settings.
    pub fn with_settings(settings: LabelSettings) -> Self {
        Self {
            state: new_styled(LabelState::new(settings)),
        }
    }

    /// Label showing `text`.
    pub fn with_text(text: &str) -> Self {
        let label = Self::new();
        label.set_text(text);
        label
    }

    fn modify(&self, f: impl FnOnce(&mut LabelState)) {
        let mut state = self.state.borrow_mut();
        f(&mut state);
        state.needs_rearrange = true;
    }

    fn laid_out(&self) -> RefMut<'_, LabelState> {
        let mut state = self.state.borrow_mut();
        state.ensure_layout();
        state
    }

    /// Replaces the markup source.
    pub fn set_text(&self, text: &str) { self.modify(|s| s.text = text.to_string()) }

    /// Markup source.
    pub fn text(&self) -> String { self.state.borrow().text.clone() }

    /// Character size of unmarked text, `0` to inherit it.
    pub fn set_text_size(&self, size: u32) { self.modify(|s| s.settings.text_size = size) }

    /// Character size unmarked text is laid out with.
    pub fn text_size(&self) -> u32 { self.state.borrow().text_size() }

    /// Aligns each line inside the content area.
    pub fn set_horizontal_alignment(&self, alignment: HorizontalAlignment) { self.modify(|s| s.settings.horizontal_alignment = alignment) }

    /// Current horizontal alignment.
    pub fn horizontal_alignment(&self) -> HorizontalAlignment { self.state.borrow().settings.horizontal_alignment }

    /// Aligns the text block inside the content area. Ignored while the text is scrolled.
    pub fn set_vertical_alignment(&self, alignment: VerticalAlignment) { self.modify(|s| s.settings.vertical_alignment = alignment) }

    /// Current vertical alignment.
    pub fn vertical_alignment(&self) -> VerticalAlignment { self.state.borrow().settings.vertical_alignment }

    /// Chooses when the scrollbar shows.
    pub fn set_scrollbar_policy(&self, policy: ScrollbarPolicy) { self.modify(|s| s.settings.scrollbar_policy = policy) }

    /// Current scrollbar policy.
    pub fn scrollbar_policy(&self) -> ScrollbarPolicy { self.state.borrow().settings.scrollbar_policy }

    /// Makes the label follow the size of its text. Setting a size turns this off.
    pub fn set_auto_size(&self, auto_size: bool) { self.modify(|s| s.settings.auto_size = auto_size) }

    /// Returns `true` while the label sizes itself.
    pub fn auto_size(&self) -> bool { self.state.borrow().settings.auto_size }

    /// Wrap width used while auto sizing, `0` for none.
    pub fn set_maximum_text_width(&self, width: f32) { self.modify(|s| s.settings.maximum_text_width = width.max(0.0)) }

    /// Wrap width used while auto sizing.
    pub fn maximum_text_width(&self) -> f32 { self.state.borrow().settings.maximum_text_width }

    /// Current layout settings.
    pub fn settings(&self) -> LabelSettings { self.state.borrow().settings }

    /// Font the text is laid out with.
    pub fn font(&self) -> Option<FontHandle> { self.state.borrow().font() }

    /// Positioned text pieces per visual line, relative to the label.
    pub fn lines(&self) -> Vec<Vec<TextPiece>> { self.laid_out().lines.clone() }

    /// Positioned inline images, relative to the label.
    pub fn images(&self) -> Vec<ImagePiece> { self.laid_out().images.clone() }

    /// Height of the laid out text, padding below the last line included.
    pub fn required_text_height(&self) -> f32 { self.laid_out().text_height }

    /// Returns `true` if the scrollbar is currently shown.
    pub fn is_scrollbar_shown(&self) -> bool { self.laid_out().scrollbar.is_shown() }

    /// Scroll offset in pixels.
    pub fn scrollbar_value(&self) -> u32 { self.laid_out().scrollbar.value() }

    /// Scrolls to `value`, clamped to the scrollable range.
    pub fn set_scrollbar_value(&self, value: u32) { self.laid_out().scrollbar.set_value(value) }

    /// Renderer private to this label. A shared renderer is copied first.
    pub fn renderer(&self) -> SharedRenderer { own_renderer(&self.state) }

    /// Renderer handle for sharing with other labels through [`set_renderer`](Self::set_renderer).
    pub fn shared_renderer(&self) -> SharedRenderer { share_renderer(&self.state) }

    /// Switches to `renderer` and applies all of its values.
    pub fn set_renderer(&self, renderer: SharedRenderer) { replace_renderer(&self.state, renderer) }
}

impl Widget for RichTextLabel {
    fn widget_type(&self) -> &'static str { LABEL_TABLE.widget_type }

    fn base(&self) -> Ref<'_, WidgetBase> { Ref::map(self.state.borrow(), |s| &s.base) }

    fn base_mut(&self) -> RefMut<'_, WidgetBase> { RefMut::map(self.state.borrow_mut(), |s| &mut s.base) }

    fn as_any(&self) -> &dyn Any { self }

    fn size(&self) -> Vec2f { self.laid_out().base.size }

    fn set_size(&self, size: Vec2f) {
        self.modify(|s| {
            s.base.size = size;
            s.settings.auto_size = false;
        })
    }

    fn set_enabled(&self, enabled: bool) {
        self.modify(|s| {
            s.base.enabled = enabled;
            if !enabled {
                s.base.mouse_hover = false;
                s.base.mouse_down = false;
                s.scrollbar.left_mouse_released();
            }
        })
    }

    fn set_inherited_resources(&self, resources: Resources) { self.modify(|s| s.base.resources = Some(resources)) }

    fn is_mouse_on_widget(&self, pos: Vec2f) -> bool { self.laid_out().base.contains(pos) }

    fn mouse_moved(&self, pos: Vec2f) {
        let mut state = self.laid_out();
        state.base.mouse_hover = true;
        if state.scrollbar.is_shown() {
            let local = translate(pos, -state.base.position.x, -state.base.position.y);
            let track = state.scrollbar_track();
            state.scrollbar.mouse_moved(track, local);
        }
    }

    fn mouse_no_longer_on_widget(&self) {
        let mut state = self.state.borrow_mut();
        state.base.mouse_hover = false;
        state.scrollbar.mouse_no_longer_on_widget();
    }

    fn left_mouse_pressed(&self, pos: Vec2f) {
        let mut state = self.laid_out();
        state.base.mouse_down = true;
        let local = translate(pos, -state.base.position.x, -state.base.position.y);
        let track = state.scrollbar_track();
        if state.scrollbar.is_shown() && track.contains(local.x, local.y) {
            state.scrollbar.left_mouse_pressed(track, local);
        }
    }

    fn left_mouse_released(&self, _pos: Vec2f) {
        let mut state = self.state.borrow_mut();
        state.base.mouse_down = false;
        state.scrollbar.left_mouse_released();
    }

    fn left_mouse_button_no_longer_down(&self) {
        let mut state = self.state.borrow_mut();
        state.base.mouse_down = false;
        state.scrollbar.left_mouse_released();
    }

    fn mouse_wheel_scrolled(&self, delta: f32, _pos: Vec2f) -> bool { self.laid_out().scrollbar.mouse_wheel_scrolled(delta) }

    fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        let state = self.laid_out();
        let position = state.base.position;
        let size = state.base.size;
        let opacity = state.current_opacity();
        let states = states.translated(position.x, position.y);
        let borders = state.borders;

        target.draw_borders(&states, &borders, size, state.border_color.with_opacity(opacity));
        let inner = Vec2f::new((size.x - borders.horizontal()).max(0.0), (size.y - borders.vertical()).max(0.0));
        let inner_states = states.translated(borders.left, borders.top);
        match &state.background_texture {
            Some(texture) => target.draw_sprite(&inner_states, texture, inner, opacity),
            None if state.background_color.a > 0 => target.draw_filled_rect(&inner_states, inner, state.background_color.with_opacity(opacity)),
            None => (),
        }

        let padding = state.padding;
        let content = FloatRect::new(padding.left, padding.top, inner.x - padding.horizontal(), inner.y - padding.vertical());
        let scrolled = state.scrollbar.is_shown();
        target.add_clipping_layer(&inner_states, content);
        let text_states = if scrolled { states.translated(0.0, -(state.scrollbar.value() as f32)) } else { states };
        for piece in state.lines.iter().flatten() {
            target.draw_text(&text_states, piece);
        }
        for image in state.images.iter() {
            target.draw_sprite(&text_states.translated(image.position.x, image.position.y), &image.texture, image.size, opacity);
        }
        target.remove_clipping_layer();

        if scrolled {
            state.scrollbar.draw(target, &states, state.scrollbar_track(), opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font;
    use crate::{DrawCommand, DrawList, MemoryTextureLoader, PropertyValue, TextureManager};

    const CLOSE: f32 = 1e-3;

    fn label(text: &str) -> RichTextLabel {
        let _ = env_logger::builder().is_test(true).try_init();
        let label = RichTextLabel::with_text(text);
        label.set_inherited_resources(Resources::with_font(fake_font()));
        label.set_text_size(20);
        label
    }

    // 2.4 px text offset on both sides around a 100 px wide text area
    fn fixed(text: &str, height: f32) -> RichTextLabel {
        let label = label(text);
        label.set_size(Vec2f::new(104.8, height));
        label
    }

    #[test]
    fn plain_lines_stack_by_line_spacing() {
        let label = label("ab\ncd");
        let lines = label.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].string(), "ab");
        assert!((lines[0][0].position().x - 2.4).abs() < CLOSE);
        assert_eq!(lines[0][0].position().y, 0.0);
        assert_eq!(lines[1][0].position().y, 24.0);
        assert_eq!(label.required_text_height(), 51.0);

        let size = label.size();
        assert!((size.x - (lines[0][0].size().x + 4.8)).abs() < CLOSE);
        assert_eq!(size.y, 51.0);
    }

    #[test]
    fn markup_runs_follow_each_other() {
        let label = label("<b>ab</b>cd");
        let lines = label.lines();
        assert_eq!(lines.len(), 1);
        let (bold, regular) = (&lines[0][0], &lines[0][1]);
        assert_eq!(bold.style(), TextStyle::BOLD);
        assert_eq!(regular.style(), TextStyle::REGULAR);
        assert_eq!(regular.color(), Color::rgb(60, 60, 60));
        assert!((regular.position().x - (bold.position().x + bold.size().x)).abs() < CLOSE);
    }

    #[test]
    fn fixed_width_wraps_words() {
        let label = fixed("aaaa bbbb cccc", 200.0);
        assert!(!label.auto_size());
        let lines = label.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].string().trim_end(), "aaaa bbbb");
        assert_eq!(lines[1][0].string(), "cccc");
    }

    #[test]
    fn horizontal_alignment_ignores_trailing_whitespace() {
        let label = fixed("ab  ", 200.0);
        label.set_horizontal_alignment(HorizontalAlignment::Right);
        let piece = &label.lines()[0][0];
        let end = piece.position().x + piece.find_character_pos(2).x;
        assert!((end - 102.4).abs() < CLOSE);

        label.set_text("ab");
        label.set_horizontal_alignment(HorizontalAlignment::Center);
        let piece = &label.lines()[0][0];
        assert!((piece.position().x - (2.4 + (100.0 - piece.size().x) / 2.0)).abs() < CLOSE);
    }

    #[test]
    fn vertical_alignment_moves_the_block() {
        let label = fixed("ab", 200.0);
        label.set_vertical_alignment(VerticalAlignment::Bottom);
        assert_eq!(label.lines()[0][0].position().y, 200.0 - 27.0);
        label.set_vertical_alignment(VerticalAlignment::Center);
        assert_eq!(label.lines()[0][0].position().y, (200.0 - 27.0) / 2.0);
    }

    #[test]
    fn overflow_shows_the_scrollbar() {
        let label = fixed("a\nb\nc\nd\ne", 50.0);
        label.set_vertical_alignment(VerticalAlignment::Bottom);
        assert!(label.is_scrollbar_shown());
        assert_eq!(label.required_text_height(), 123.0);
        {
            let state = label.laid_out();
            assert_eq!(state.scrollbar.viewport(), 50);
            assert_eq!(state.scrollbar.maximum(), 123);
        }
        // alignment is ignored once the text scrolls
        assert_eq!(label.lines()[0][0].position().y, 0.0);

        assert!(label.mouse_wheel_scrolled(-1.0, Vec2f::new(1.0, 1.0)));
        assert_eq!(label.scrollbar_value(), 20);
        label.set_scrollbar_value(1000);
        assert_eq!(label.scrollbar_value(), 73);

        label.set_scrollbar_policy(ScrollbarPolicy::Never);
        assert!(!label.is_scrollbar_shown());
        assert!(!label.mouse_wheel_scrolled(-1.0, Vec2f::new(1.0, 1.0)));
    }

    #[test]
    fn always_policy_reserves_the_width() {
        let label = fixed("aaaa bbbb", 200.0);
        assert_eq!(label.lines().len(), 1);
        label.set_scrollbar_policy(ScrollbarPolicy::Always);
        assert!(label.is_scrollbar_shown());
        assert_eq!(label.lines().len(), 2);
    }

    #[test]
    fn auto_size_wraps_at_maximum_width() {
        let label = label("aaaa bbbb");
        label.set_maximum_text_width(64.8);
        let lines = label.lines();
        assert_eq!(lines.len(), 2);
        assert!((label.size().x - 64.8).abs() < CLOSE);
        assert_eq!(label.size().y, 51.0);
    }

    #[test]
    fn nothing_is_laid_out_without_room_or_font() {
        let label = label("ab");
        label.set_size(Vec2f::new(0.0, 0.0));
        assert!(label.lines().is_empty());

        let orphan = RichTextLabel::with_text("ab");
        assert!(orphan.lines().is_empty());
        assert_eq!(orphan.required_text_height(), 0.0);
    }

    #[test]
    fn inline_images_share_the_line_bottom() {
        let mut loader = MemoryTextureLoader::new();
        loader.insert_solid("icon.png", 10, 50, Color::RED);
        let label = RichTextLabel::with_text("a<img=icon.png>b\n<img=missing.png>");
        label.set_inherited_resources(Resources {
            font: Some(fake_font()),
            text_size: 20,
            textures: TextureManager::new(loader),
        });
        label.set_text_size(0);
        assert_eq!(label.text_size(), 20);

        let lines = label.lines();
        let images = label.images();
        assert_eq!(images.len(), 1);
        let a = &lines[0][0];
        assert!((images[0].position.x - (a.position().x + a.size().x)).abs() < CLOSE);
        assert_eq!(images[0].position.y, 0.0);
        assert_eq!(a.position().y, 26.0);
        assert!((lines[0][1].position().x - (images[0].position.x + 10.0)).abs() < CLOSE);
        assert_eq!(lines[1][0].string(), "<img=missing.png>");
        assert_eq!(lines[1][0].position().y, 50.0);
    }

    #[test]
    fn renderer_changes_relayout() {
        let label = label("ab");
        let renderer = label.renderer();
        renderer.set_property("Padding", PropertyValue::Outline(Outline::uniform(5.0))).unwrap();
        let piece = &label.lines()[0][0];
        assert!((piece.position().x - 7.4).abs() < CLOSE);
        assert_eq!(piece.position().y, 5.0);

        let other = fake_font();
        renderer.set_property("Font", PropertyValue::Font(other.clone())).unwrap();
        assert!(label.font().unwrap().ptr_eq(&other));
        assert!(label.lines()[0][0].font().unwrap().ptr_eq(&other));

        renderer.set_property("TextColor", PropertyValue::Color(Color::BLUE)).unwrap();
        assert_eq!(label.lines()[0][0].color(), Color::BLUE);
    }

    #[test]
    fn shared_renderer_restyles_every_label() {
        let first = label("ab");
        let second = label("cd");
        let shared = first.shared_renderer();
        second.set_renderer(shared.clone());
        shared.set_property("TextStyle", PropertyValue::TextStyle(TextStyle::ITALIC)).unwrap();
        assert_eq!(first.lines()[0][0].style(), TextStyle::ITALIC);
        assert_eq!(second.lines()[0][0].style(), TextStyle::ITALIC);
    }

    #[test]
    fn disabled_opacity_reaches_the_pieces() {
        let label = label("ab");
        label.renderer().set_property("OpacityDisabled", PropertyValue::Number(0.3)).unwrap();
        assert_eq!(label.lines()[0][0].opacity(), 1.0);
        label.set_enabled(false);
        assert_eq!(label.lines()[0][0].opacity(), 0.3);
    }

    #[test]
    fn draws_background_and_text() {
        let label = label("ab");
        label.set_position(Vec2f::new(10.0, 10.0));
        label.renderer().set_property("BackgroundColor", PropertyValue::Color(Color::WHITE)).unwrap();
        let mut list = DrawList::new();
        label.draw(&mut list, &RenderStates::default());
        assert!(list.commands().iter().any(|c| matches!(c, DrawCommand::Rect { color, .. } if *color == Color::WHITE)));
        assert!(list.commands().iter().any(|c| matches!(c, DrawCommand::Text { .. })));
        assert_eq!(list.current_clip_rect(), crate::UNCLIPPED_RECT);
    }
}
