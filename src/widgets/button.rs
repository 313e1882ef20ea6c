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

use log::trace;

use super::{new_styled, own_renderer, replace_renderer, share_renderer, RendererSlot, Resources, Styled, Widget, WidgetBase, DEFAULT_TEXT_SIZE};
use crate::style::{PropertyDef, PropertyDefault, PropertyTable, RendererData, RendererObserver};
use crate::text::find_best_text_size;
use crate::{
    Color, ComponentState, FloatRect, FontHandle, Outline, PropertyKind, RenderStates, RenderTarget, SharedRenderer, Signal, StyleProperty, TextPiece,
    TextStyle, Texture, Vec2f,
};

static BUTTON_PROPERTIES: [PropertyDef; 47] = [
    PropertyDef::new("TextColor", PropertyKind::Color, PropertyDefault::Color(Color::rgb(60, 60, 60))),
    PropertyDef::new("TextColorDown", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("TextColorHover", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("TextColorDownHover", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("TextColorDisabled", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("TextColorDownDisabled", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("TextColorFocused", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("TextColorDownFocused", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColor", PropertyKind::Color, PropertyDefault::Color(Color::rgb(245, 245, 245))),
    PropertyDef::new("BackgroundColorDown", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColorHover", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColorDownHover", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColorDisabled", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColorDownDisabled", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColorFocused", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BackgroundColorDownFocused", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColor", PropertyKind::Color, PropertyDefault::Color(Color::rgb(60, 60, 60))),
    PropertyDef::new("BorderColorDown", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColorHover", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColorDownHover", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColorDisabled", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColorDownDisabled", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColorFocused", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("BorderColorDownFocused", PropertyKind::Color, PropertyDefault::Unset),
    PropertyDef::new("Texture", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureDown", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureHover", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureDownHover", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureDisabled", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureDownDisabled", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureFocused", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextureDownFocused", PropertyKind::Texture, PropertyDefault::Unset),
    PropertyDef::new("TextStyle", PropertyKind::TextStyle, PropertyDefault::TextStyle(TextStyle::REGULAR)),
    PropertyDef::new("TextStyleDown", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("TextStyleHover", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("TextStyleDownHover", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("TextStyleDisabled", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("TextStyleDownDisabled", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("TextStyleFocused", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("TextStyleDownFocused", PropertyKind::TextStyle, PropertyDefault::Unset),
    PropertyDef::new("Borders", PropertyKind::Outline, PropertyDefault::Outline(Outline::uniform(2.0))),
    PropertyDef::new("TextOutlineColor", PropertyKind::Color, PropertyDefault::Color(Color::BLACK)),
    PropertyDef::new("TextOutlineThickness", PropertyKind::Number, PropertyDefault::Number(0.0)),
    PropertyDef::new("RoundedBorderRadius", PropertyKind::Number, PropertyDefault::Number(0.0)),
    PropertyDef::new("Font", PropertyKind::Font, PropertyDefault::Unset),
    PropertyDef::new("Opacity", PropertyKind::Number, PropertyDefault::Number(1.0)),
    PropertyDef::new("OpacityDisabled", PropertyKind::Number, PropertyDefault::Number(-1.0)),
];

/// Properties understood by [`Button`].
pub static BUTTON_TABLE: PropertyTable = PropertyTable {
    widget_type: "Button",
    properties: &BUTTON_PROPERTIES,
};

// property name suffix of every styled state
const STATE_SUFFIXES: [(&str, ComponentState); 8] = [
    ("", ComponentState::Normal),
    ("Down", ComponentState::Active),
    ("Hover", ComponentState::Hover),
    ("DownHover", ComponentState::ActiveHover),
    ("Disabled", ComponentState::Disabled),
    ("DownDisabled", ComponentState::DisabledActive),
    ("Focused", ComponentState::Focused),
    ("DownFocused", ComponentState::FocusedActive),
];

const STATE_FAMILIES: [&str; 5] = ["TextColor", "BackgroundColor", "BorderColor", "Texture", "TextStyle"];

fn split_state_property(property: &str) -> Option<(&'static str, ComponentState)> {
    STATE_FAMILIES.iter().find_map(|family| {
        let suffix = property.strip_prefix(family)?;
        STATE_SUFFIXES.iter().find(|(s, _)| *s == suffix).map(|(_, state)| (*family, *state))
    })
}

struct ButtonState {
    base: WidgetBase,
    slot: RendererSlot,
    text: String,
    // 0 picks the size from the height
    text_size: u32,
    piece: TextPiece,
    state: ComponentState,

    text_color: StyleProperty<Color>,
    background_color: StyleProperty<Color>,
    border_color: StyleProperty<Color>,
    texture: StyleProperty<Option<Texture>>,
    text_style: StyleProperty<TextStyle>,

    borders: Outline,
    rounded_radius: f32,
    renderer_font: Option<FontHandle>,
    opacity: f32,
    opacity_disabled: f32,
}

impl ButtonState {
    fn new() -> Self {
        let mut piece = TextPiece::new();
        piece.set_character_size(DEFAULT_TEXT_SIZE);
        Self {
            base: WidgetBase::default(),
            slot: RendererSlot::new(SharedRenderer::new(&BUTTON_TABLE)),
            text: String::new(),
            text_size: 0,
            piece,
            state: ComponentState::Normal,
            text_color: StyleProperty::new(Color::BLACK),
            background_color: StyleProperty::new(Color::WHITE),
            border_color: StyleProperty::new(Color::BLACK),
            texture: StyleProperty::new(None),
            text_style: StyleProperty::new(TextStyle::REGULAR),
            borders: Outline::default(),
            rounded_radius: 0.0,
            renderer_font: None,
            opacity: 1.0,
            opacity_disabled: -1.0,
        }
    }

    fn current_opacity(&self) -> f32 {
        if !self.base.enabled && self.opacity_disabled != -1.0 { self.opacity_disabled } else { self.opacity }
    }

    fn update_state(&mut self) {
        let base = &self.base;
        self.state = ComponentState::from_flags(base.mouse_hover, base.mouse_down, base.focused, base.enabled);
        self.update_text_appearance();
    }

    fn update_text_appearance(&mut self) {
        self.piece.set_color(*self.text_color.value(self.state));
        self.piece.set_style(*self.text_style.value(self.state));
        self.piece.set_opacity(self.current_opacity());
    }

    fn font(&self) -> Option<FontHandle> {
        self.renderer_font.clone().or_else(|| self.base.resources.as_ref().and_then(|r| r.font.clone()))
    }

    fn update_font(&mut self) {
        self.piece.set_font(self.font());
        self.update_text_size();
    }

    fn update_text_size(&mut self) {
        if self.text_size != 0 {
            self.piece.set_character_size(self.text_size);
            return;
        }
        let inner_height = self.base.size.y - self.borders.vertical();
        if let (Some(font), true) = (self.font(), inner_height > 0.0) {
            let size = find_best_text_size(&font, inner_height * 0.8, 0);
            trace!("button text size {} for an inner height of {}", size, inner_height);
            self.piece.set_character_size(size);
        }
    }

    // text origin relative to the widget, centered in the area inside the borders
    fn text_position(&self) -> Vec2f {
        let size = self.base.size;
        let text = self.piece.size();
        let inner_w = size.x - self.borders.horizontal();
        let inner_h = size.y - self.borders.vertical();
        Vec2f::new(
            self.borders.left + (inner_w - text.x) / 2.0,
            self.borders.top + (inner_h - text.y) / 2.0,
        )
    }
}

impl RendererObserver for ButtonState {
    fn renderer_changed(&mut self, property: &'static str, renderer: &RendererData) {
        if let Some((family, state)) = split_state_property(property) {
            match family {
                "TextColor" => self.text_color.set_optional(renderer.color(property), state),
                "BackgroundColor" => self.background_color.set_optional(renderer.color(property), state),
                "BorderColor" => self.border_color.set_optional(renderer.color(property), state),
                "Texture" => self.texture.set_optional(renderer.texture(property).map(Some), state),
                _ => self.text_style.set_optional(renderer.text_style(property), state),
            }
            self.update_text_appearance();
            return;
        }
        match property {
            "Borders" => {
                self.borders = renderer.outline(property);
                self.update_text_size();
            }
            "TextOutlineColor" => self.piece.set_outline_color(renderer.color(property).unwrap_or(Color::BLACK)),
            "TextOutlineThickness" => self.piece.set_outline_thickness(renderer.number(property)),
            "RoundedBorderRadius" => self.rounded_radius = renderer.number(property),
            "Font" => {
                self.renderer_font = renderer.font(property);
                self.update_font();
            }
            "Opacity" => {
                self.opacity = renderer.number(property).clamp(0.0, 1.0);
                self.update_text_appearance();
            }
            "OpacityDisabled" => {
                self.opacity_disabled = renderer.number(property);
                self.update_text_appearance();
            }
            _ => (),
        }
    }
}

impl Styled for ButtonState {
    fn slot(&self) -> &RendererSlot { &self.slot }
    fn slot_mut(&mut self) -> &mut RendererSlot { &mut self.slot }
}

#[derive(Default)]
struct ButtonSignals {
    pressed: Signal<String>,
}

#[derive(Clone)]
/// Clickable button with a centered caption.
///
/// Every color, the texture and the text style can be set per interaction state through the
/// renderer, e.g. `BackgroundColorHover` or `TextColorDownFocused`.
pub struct Button {
    state: Rc<RefCell<ButtonState>>,
    signals: Rc<ButtonSignals>,
}

impl Default for Button {
    fn default() -> Self { Self::new() }
}

impl Button {
    /// Button without caption, styled by [`BUTTON_TABLE`] defaults.
    pub fn new() -> Self {
        Self {
            state: new_styled(ButtonState::new()),
            signals: Rc::new(ButtonSignals::default()),
        }
    }

    /// Button showing `text`.
    pub fn with_text(text: &str) -> Self {
        let button = Self::new();
        button.set_text(text);
        button
    }

    /// Replaces the caption.
    pub fn set_text(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.piece.set_string(text);
    }

    /// Caption.
    pub fn text(&self) -> String { self.state.borrow().text.clone() }

    /// Fixes the character size. `0` derives it from the button height.
    pub fn set_text_size(&self, size: u32) {
        let mut state = self.state.borrow_mut();
        state.text_size = size;
        state.update_text_size();
    }

    /// Character size the caption is drawn with.
    pub fn text_size(&self) -> u32 { self.state.borrow().piece.character_size() }

    /// Font the caption is drawn with.
    pub fn font(&self) -> Option<FontHandle> { self.state.borrow().font() }

    /// Current interaction state.
    pub fn state(&self) -> ComponentState { self.state.borrow().state }

    /// Emitted with the caption when a press is released on the button.
    pub fn on_press(&self) -> &Signal<String> { &self.signals.pressed }

    /// Renderer private to this button. A shared renderer is copied first, so changes made
    /// through the returned handle never reach other widgets.
    pub fn renderer(&self) -> SharedRenderer { own_renderer(&self.state) }

    /// Renderer handle for sharing with other buttons through [`set_renderer`](Self::set_renderer).
    pub fn shared_renderer(&self) -> SharedRenderer { share_renderer(&self.state) }

    /// Switches to `renderer` and applies all of its values.
    pub fn set_renderer(&self, renderer: SharedRenderer) { replace_renderer(&self.state, renderer) }

    /// Text color in the current state.
    pub fn current_text_color(&self) -> Color {
        let state = self.state.borrow();
        *state.text_color.value(state.state)
    }

    /// Background color in the current state.
    pub fn current_background_color(&self) -> Color {
        let state = self.state.borrow();
        *state.background_color.value(state.state)
    }

    /// Border color in the current state.
    pub fn current_border_color(&self) -> Color {
        let state = self.state.borrow();
        *state.border_color.value(state.state)
    }

    /// Background texture in the current state.
    pub fn current_texture(&self) -> Option<Texture> {
        let state = self.state.borrow();
        state.texture.value(state.state).clone()
    }

    /// Text style in the current state.
    pub fn current_text_style(&self) -> TextStyle {
        let state = self.state.borrow();
        *state.text_style.value(state.state)
    }

    /// Opacity applied to the whole button.
    pub fn current_opacity(&self) -> f32 { self.state.borrow().current_opacity() }

    /// Position of the caption relative to the button.
    pub fn text_position(&self) -> Vec2f { self.state.borrow().text_position() }

    fn update(&self, f: impl FnOnce(&mut WidgetBase)) {
        let mut state = self.state.borrow_mut();
        f(&mut state.base);
        state.update_state();
    }
}

fn draw_rounded_rect(target: &mut dyn RenderTarget, states: &RenderStates, size: Vec2f, radius: f32, color: Color) {
    let radius = radius.min(size.x / 2.0).min(size.y / 2.0);
    if radius <= 0.0 {
        target.draw_filled_rect(states, size, color);
        return;
    }
    let d = radius * 2.0;
    target.draw_filled_rect(&states.translated(radius, 0.0), Vec2f::new(size.x - d, size.y), color);
    target.draw_filled_rect(&states.translated(0.0, radius), Vec2f::new(radius, size.y - d), color);
    target.draw_filled_rect(&states.translated(size.x - radius, radius), Vec2f::new(radius, size.y - d), color);
    for (x, y) in [(0.0, 0.0), (size.x - d, 0.0), (0.0, size.y - d), (size.x - d, size.y - d)] {
        target.draw_circle(&states.translated(x, y), radius, color);
    }
}

impl Widget for Button {
    fn widget_type(&self) -> &'static str { BUTTON_TABLE.widget_type }

    fn base(&self) -> Ref<'_, WidgetBase> { Ref::map(self.state.borrow(), |s| &s.base) }

    fn base_mut(&self) -> RefMut<'_, WidgetBase> { RefMut::map(self.state.borrow_mut(), |s| &mut s.base) }

    fn as_any(&self) -> &dyn Any { self }

    fn set_size(&self, size: Vec2f) {
        let mut state = self.state.borrow_mut();
        state.base.size = size;
        state.update_text_size();
    }

    fn set_visible(&self, visible: bool) {
        self.update(|base| {
            base.visible = visible;
            if !visible {
                base.mouse_hover = false;
                base.mouse_down = false;
            }
        })
    }

    fn set_enabled(&self, enabled: bool) {
        self.update(|base| {
            base.enabled = enabled;
            if !enabled {
                base.mouse_hover = false;
                base.mouse_down = false;
                base.focused = false;
            }
        })
    }

    fn set_focused(&self, focused: bool) { self.update(|base| base.focused = focused && base.enabled) }

    fn can_gain_focus(&self) -> bool { true }

    fn set_inherited_resources(&self, resources: Resources) {
        let mut state = self.state.borrow_mut();
        state.base.resources = Some(resources);
        state.update_font();
    }

    fn mouse_moved(&self, _pos: Vec2f) { self.update(|base| base.mouse_hover = true) }

    fn mouse_no_longer_on_widget(&self) { self.update(|base| base.mouse_hover = false) }

    fn left_mouse_pressed(&self, _pos: Vec2f) { self.update(|base| base.mouse_down = true) }

    fn left_mouse_released(&self, _pos: Vec2f) {
        let caption = {
            let mut state = self.state.borrow_mut();
            let was_down = state.base.mouse_down;
            state.base.mouse_down = false;
            state.update_state();
            was_down.then(|| state.text.clone())
        };
        if let Some(caption) = caption {
            trace!("button '{}' pressed", caption);
            self.signals.pressed.emit(&caption);
        }
    }

    fn left_mouse_button_no_longer_down(&self) { self.update(|base| base.mouse_down = false) }

    fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        let state = self.state.borrow();
        let position = state.base.position;
        let size = state.base.size;
        let states = states.translated(position.x, position.y);
        let opacity = state.current_opacity();
        let borders = state.borders;
        let inner = Vec2f::new((size.x - borders.horizontal()).max(0.0), (size.y - borders.vertical()).max(0.0));
        let inner_states = states.translated(borders.left, borders.top);
        let background = state.background_color.value(state.state).with_opacity(opacity);
        let border_color = state.border_color.value(state.state).with_opacity(opacity);

        if state.rounded_radius > 0.0 {
            draw_rounded_rect(target, &states, size, state.rounded_radius, border_color);
            let inner_radius = state.rounded_radius - borders.left.max(borders.top);
            draw_rounded_rect(target, &inner_states, inner, inner_radius, background);
        } else {
            target.draw_borders(&states, &borders, size, border_color);
            match state.texture.value(state.state) {
                Some(texture) => target.draw_sprite(&inner_states, texture, inner, opacity),
                None => target.draw_filled_rect(&inner_states, inner, background),
            }
        }

        if state.piece.string().is_empty() {
            return;
        }
        target.add_clipping_layer(&inner_states, FloatRect::new(0.0, 0.0, inner.x, inner.y));
        let text = state.text_position();
        target.draw_text(&states.translated(text.x, text.y), &state.piece);
        target.remove_clipping_layer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font;
    use crate::{DrawCommand, DrawList, PropertyValue};
    use std::cell::Cell;

    fn resources() -> Resources { Resources::with_font(fake_font()) }

    #[test]
    fn state_suffixes_split() {
        assert_eq!(split_state_property("TextColor"), Some(("TextColor", ComponentState::Normal)));
        assert_eq!(split_state_property("BackgroundColorDownHover"), Some(("BackgroundColor", ComponentState::ActiveHover)));
        assert_eq!(split_state_property("TextureDownDisabled"), Some(("Texture", ComponentState::DisabledActive)));
        assert_eq!(split_state_property("TextStyleFocused"), Some(("TextStyle", ComponentState::Focused)));
        assert_eq!(split_state_property("TextOutlineColor"), None);
        assert_eq!(split_state_property("Borders"), None);
    }

    #[test]
    fn table_defaults_apply_on_creation() {
        let button = Button::new();
        assert_eq!(button.current_text_color(), Color::rgb(60, 60, 60));
        assert_eq!(button.current_background_color(), Color::rgb(245, 245, 245));
        assert!(button.current_texture().is_none());

        button.mouse_moved(Vec2f::new(1.0, 1.0));
        assert_eq!(button.state(), ComponentState::Hover);
        assert_eq!(button.current_background_color(), Color::rgb(245, 245, 245));
        assert_eq!(button.current_text_color(), Color::rgb(60, 60, 60));
    }

    #[test]
    fn unset_hover_color_falls_back_to_text_color() {
        let button = Button::new();
        let renderer = button.renderer();
        renderer.set_property("TextColor", PropertyValue::Color(Color::RED)).unwrap();
        button.mouse_moved(Vec2f::new(1.0, 1.0));
        assert_eq!(button.state(), ComponentState::Hover);
        assert_eq!(button.current_text_color(), Color::RED);

        renderer.set_property("TextColorHover", PropertyValue::Color(Color::BLUE)).unwrap();
        assert_eq!(button.current_text_color(), Color::BLUE);
        renderer.unset_property("TextColorHover").unwrap();
        assert_eq!(button.current_text_color(), Color::RED);
    }

    #[test]
    fn focused_tint_yields_to_hover_tint() {
        let button = Button::new();
        let renderer = button.renderer();
        renderer.set_property("BackgroundColorFocused", PropertyValue::Color(Color::YELLOW)).unwrap();
        button.set_focused(true);
        assert_eq!(button.current_background_color(), Color::YELLOW);

        button.mouse_moved(Vec2f::new(1.0, 1.0));
        assert_eq!(button.state(), ComponentState::FocusedHover);
        assert_eq!(button.current_background_color(), Color::YELLOW);

        renderer.set_property("BackgroundColorHover", PropertyValue::Color(Color::CYAN)).unwrap();
        assert_eq!(button.current_background_color(), Color::CYAN);
        renderer.unset_property("BackgroundColorHover").unwrap();
        assert_eq!(button.current_background_color(), Color::YELLOW);
    }

    #[test]
    fn disabled_color_overrides_hover_and_down() {
        let button = Button::new();
        let renderer = button.renderer();
        renderer.set_property("BorderColorHover", PropertyValue::Color(Color::RED)).unwrap();
        renderer.set_property("BorderColorDown", PropertyValue::Color(Color::GREEN)).unwrap();
        button.mouse_moved(Vec2f::new(1.0, 1.0));
        button.left_mouse_pressed(Vec2f::new(1.0, 1.0));
        assert_eq!(button.current_border_color(), Color::GREEN);

        button.set_enabled(false);
        assert_eq!(button.current_border_color(), Color::rgb(60, 60, 60));
        renderer.set_property("BorderColorDisabled", PropertyValue::Color(Color::BLUE)).unwrap();
        assert_eq!(button.current_border_color(), Color::BLUE);
    }

    #[test]
    fn hover_color_applies_to_focused_hover() {
        let button = Button::new();
        button.renderer().set_property("TextColorHover", PropertyValue::Color(Color::RED)).unwrap();
        button.set_focused(true);
        assert_eq!(button.state(), ComponentState::Focused);
        assert_eq!(button.current_text_color(), Color::rgb(60, 60, 60));

        button.mouse_moved(Vec2f::new(1.0, 1.0));
        assert_eq!(button.state(), ComponentState::FocusedHover);
        assert_eq!(button.current_text_color(), Color::RED);

        button.renderer().unset_property("TextColorHover").unwrap();
        assert_eq!(button.current_text_color(), Color::rgb(60, 60, 60));
    }

    #[test]
    fn disabled_state_and_opacity() {
        let button = Button::new();
        let renderer = button.renderer();
        renderer.set_property("Opacity", PropertyValue::Number(0.8)).unwrap();
        assert_eq!(button.current_opacity(), 0.8);

        button.set_enabled(false);
        assert_eq!(button.state(), ComponentState::Disabled);
        assert_eq!(button.current_opacity(), 0.8);
        assert_eq!(button.current_text_color(), Color::rgb(60, 60, 60));
        renderer.set_property("TextColorDisabled", PropertyValue::Color(Color::rgb(125, 125, 125))).unwrap();
        assert_eq!(button.current_text_color(), Color::rgb(125, 125, 125));

        renderer.set_property("OpacityDisabled", PropertyValue::Number(0.5)).unwrap();
        assert_eq!(button.current_opacity(), 0.5);

        button.set_focused(true);
        assert!(!button.is_focused());
    }

    #[test]
    fn shared_renderer_reaches_every_button() {
        let a = Button::new();
        let b = Button::new();
        let shared = a.shared_renderer();
        b.set_renderer(shared.clone());

        shared.set_property("BackgroundColor", PropertyValue::Color(Color::BLUE)).unwrap();
        assert_eq!(a.current_background_color(), Color::BLUE);
        assert_eq!(b.current_background_color(), Color::BLUE);

        // a private copy stops the sharing for that button only
        a.renderer().set_property("BackgroundColor", PropertyValue::Color(Color::GREEN)).unwrap();
        assert_eq!(a.current_background_color(), Color::GREEN);
        assert_eq!(b.current_background_color(), Color::BLUE);

        shared.set_property("BackgroundColor", PropertyValue::Color(Color::RED)).unwrap();
        assert_eq!(a.current_background_color(), Color::GREEN);
        assert_eq!(b.current_background_color(), Color::RED);
    }

    #[test]
    fn dropped_button_leaves_renderer() {
        let shared = {
            let button = Button::new();
            button.shared_renderer()
        };
        assert_eq!(shared.observer_count(), 0);
        shared.set_property("TextColor", PropertyValue::Color(Color::RED)).unwrap();
    }

    #[test]
    fn text_size_follows_height() {
        let button = Button::with_text("ok");
        button.set_inherited_resources(resources());
        button.set_size(Vec2f::new(100.0, 40.0));
        let font = button.font().unwrap();
        assert_eq!(button.text_size(), find_best_text_size(&font, 36.0 * 0.8, 0));

        button.renderer().set_property("Borders", PropertyValue::Outline(Outline::uniform(0.0))).unwrap();
        assert_eq!(button.text_size(), find_best_text_size(&font, 40.0 * 0.8, 0));

        button.set_text_size(12);
        button.set_size(Vec2f::new(100.0, 80.0));
        assert_eq!(button.text_size(), 12);
    }

    #[test]
    fn font_property_overrides_inherited_font() {
        let button = Button::with_text("ok");
        button.set_inherited_resources(resources());
        let inherited = button.font().unwrap();

        let own = fake_font();
        button.renderer().set_property("Font", PropertyValue::Font(own.clone())).unwrap();
        assert!(button.font().unwrap().ptr_eq(&own));

        button.renderer().unset_property("Font").unwrap();
        assert!(button.font().unwrap().ptr_eq(&inherited));
    }

    #[test]
    fn caption_is_centered() {
        let button = Button::with_text("ab");
        button.set_inherited_resources(resources());
        button.set_text_size(20);
        button.set_size(Vec2f::new(100.0, 40.0));
        let text = button.state.borrow().piece.size();
        let pos = button.text_position();
        assert_eq!(pos.x, 2.0 + (96.0 - text.x) / 2.0);
        assert_eq!(pos.y, 2.0 + (36.0 - text.y) / 2.0);
    }

    #[test]
    fn press_emits_caption() {
        let button = Button::with_text("go");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        button.on_press().connect(move |text: &String| sink.borrow_mut().push(text.clone()));

        button.left_mouse_released(Vec2f::new(1.0, 1.0));
        assert!(seen.borrow().is_empty());

        button.left_mouse_pressed(Vec2f::new(1.0, 1.0));
        assert_eq!(button.state(), ComponentState::Active);
        button.left_mouse_released(Vec2f::new(1.0, 1.0));
        assert_eq!(*seen.borrow(), vec!["go".to_string()]);
    }

    #[test]
    fn handler_may_touch_the_button() {
        let button = Button::with_text("go");
        let hits = Rc::new(Cell::new(0));
        let (counter, inner) = (hits.clone(), button.clone());
        button.on_press().connect(move |_| {
            counter.set(counter.get() + 1);
            inner.set_text("gone");
        });
        button.left_mouse_pressed(Vec2f::new(1.0, 1.0));
        button.left_mouse_released(Vec2f::new(1.0, 1.0));
        assert_eq!(hits.get(), 1);
        assert_eq!(button.text(), "gone");
    }

    #[test]
    fn draws_frame_and_caption() {
        let button = Button::with_text("ab");
        button.set_inherited_resources(resources());
        button.set_position(Vec2f::new(10.0, 20.0));
        button.set_size(Vec2f::new(100.0, 40.0));

        let mut list = DrawList::new();
        button.draw(&mut list, &RenderStates::default());
        let rects = list.commands().iter().filter(|c| matches!(c, DrawCommand::Rect { .. })).count();
        // four borders plus the background
        assert_eq!(rects, 5);
        assert!(list.commands().iter().any(|c| matches!(c, DrawCommand::Text { .. })));
        match &list.commands()[4] {
            DrawCommand::Rect { rect, color } => {
                assert_eq!((rect.left, rect.top, rect.width, rect.height), (12.0, 22.0, 96.0, 36.0));
                assert_eq!(*color, Color::rgb(245, 245, 245));
            }
            _ => panic!("expected the background"),
        }
    }

    #[test]
    fn rounded_corners_use_circles() {
        let button = Button::new();
        button.set_size(Vec2f::new(100.0, 40.0));
        button.renderer().set_property("RoundedBorderRadius", PropertyValue::Number(6.0)).unwrap();
        let mut list = DrawList::new();
        button.draw(&mut list, &RenderStates::default());
        let circles = list.commands().iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count();
        assert_eq!(circles, 8);
    }
}
