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
//! Retained widget tree.
//!
//! Widgets are cheap handles over shared state, so a clone refers to the same widget. A
//! [`Container`] owns its children and routes mouse events to them in its own coordinate
//! frame.

mod button;
mod container;
mod rich_text_label;
mod scrollbar;

pub use button::*;
pub use container::*;
pub use rich_text_label::*;
pub use scrollbar::{ScrollbarPolicy, DEFAULT_SCROLLBAR_WIDTH};

pub(crate) use container::ContainerState;
pub(crate) use scrollbar::Scrollbar;

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::style::{RendererData, RendererObserver};
use crate::{FontHandle, RenderStates, RenderTarget, SharedRenderer, TextureManager, Vec2f};

/// Character size used when neither the widget nor its ancestors pick one.
pub const DEFAULT_TEXT_SIZE: u32 = 18;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Horizontal placement of text lines.
pub enum HorizontalAlignment {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Vertical placement of a text block.
pub enum VerticalAlignment {
    /// Top of the content area.
    #[default]
    Top,
    /// Centered.
    Center,
    /// Bottom of the content area.
    Bottom,
}

#[derive(Clone, Debug)]
/// Resources a widget inherits from the container it is added to.
pub struct Resources {
    /// Font used when the widget renderer does not set one.
    pub font: Option<FontHandle>,
    /// Character size for widgets that inherit theirs.
    pub text_size: u32,
    /// Cache that resolves image paths.
    pub textures: TextureManager,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            font: None,
            text_size: DEFAULT_TEXT_SIZE,
            textures: TextureManager::default(),
        }
    }
}

impl Resources {
    /// Resources with `font` and the default texture cache.
    pub fn with_font(font: FontHandle) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }
}

/// State every widget carries.
pub struct WidgetBase {
    pub(crate) name: String,
    pub(crate) position: Vec2f,
    pub(crate) size: Vec2f,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) focused: bool,
    pub(crate) mouse_hover: bool,
    pub(crate) mouse_down: bool,
    pub(crate) resources: Option<Resources>,
    pub(crate) parent: Weak<RefCell<ContainerState>>,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2f::new(0.0, 0.0),
            size: Vec2f::new(0.0, 0.0),
            visible: true,
            enabled: true,
            focused: false,
            mouse_hover: false,
            mouse_down: false,
            resources: None,
            parent: Weak::new(),
        }
    }
}

impl WidgetBase {
    /// Inherited resources, or the defaults while the widget is detached.
    pub fn resources(&self) -> Resources { self.resources.clone().unwrap_or_default() }

    pub(crate) fn contains(&self, pos: Vec2f) -> bool {
        pos.x >= self.position.x && pos.y >= self.position.y && pos.x < self.position.x + self.size.x && pos.y < self.position.y + self.size.y
    }
}

/// Behaviour shared by everything that can live in a [`Container`].
///
/// Mouse positions are given in the coordinate frame of the parent, the same frame as
/// [`position`](Widget::position).
pub trait Widget: Any {
    /// Type name, also the widget type of its renderer table.
    fn widget_type(&self) -> &'static str;

    /// Shared widget state.
    fn base(&self) -> Ref<'_, WidgetBase>;

    /// Mutable shared widget state.
    fn base_mut(&self) -> RefMut<'_, WidgetBase>;

    /// Upcast for [`Container::get`].
    fn as_any(&self) -> &dyn Any;

    /// Draws the widget at its position relative to `states`.
    fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates);

    /// Name given when the widget was added to a container.
    fn name(&self) -> String { self.base().name.clone() }

    /// Position inside the parent.
    fn position(&self) -> Vec2f { self.base().position }

    /// Moves the widget inside its parent.
    fn set_position(&self, position: Vec2f) { self.base_mut().position = position }

    /// Size of the widget.
    fn size(&self) -> Vec2f { self.base().size }

    /// Resizes the widget.
    fn set_size(&self, size: Vec2f) { self.base_mut().size = size }

    /// Returns `true` if the widget is drawn and receives events.
    fn is_visible(&self) -> bool { self.base().visible }

    /// Shows or hides the widget.
    fn set_visible(&self, visible: bool) {
        let mut base = self.base_mut();
        base.visible = visible;
        if !visible {
            base.mouse_hover = false;
            base.mouse_down = false;
        }
    }

    /// Returns `true` if the widget reacts to input.
    fn is_enabled(&self) -> bool { self.base().enabled }

    /// Enables or disables the widget. A disabled widget loses focus.
    fn set_enabled(&self, enabled: bool) {
        let mut base = self.base_mut();
        base.enabled = enabled;
        if !enabled {
            base.mouse_hover = false;
            base.mouse_down = false;
            base.focused = false;
        }
    }

    /// Returns `true` if the widget has the keyboard focus.
    fn is_focused(&self) -> bool { self.base().focused }

    /// Gives or removes the focus. Ignored when the widget cannot take it.
    fn set_focused(&self, focused: bool) {
        if focused && !self.can_gain_focus() {
            return;
        }
        self.base_mut().focused = focused;
    }

    /// Returns `true` if the widget takes part in focus traversal.
    fn can_gain_focus(&self) -> bool { false }

    /// Container the widget was added to.
    fn parent(&self) -> Option<Container> { self.base().parent.upgrade().map(Container::from_state) }

    /// Position in the frame of the root container.
    fn absolute_position(&self) -> Vec2f {
        let position = self.position();
        match self.parent() {
            Some(parent) => {
                let origin = parent.absolute_position();
                Vec2f::new(origin.x + position.x, origin.y + position.y)
            }
            None => position,
        }
    }

    /// Called by the parent with its effective resources.
    fn set_inherited_resources(&self, resources: Resources) { self.base_mut().resources = Some(resources) }

    /// Returns `true` if `pos` lies on the widget.
    fn is_mouse_on_widget(&self, pos: Vec2f) -> bool { self.base().contains(pos) }

    /// Mouse moved while over the widget.
    fn mouse_moved(&self, _pos: Vec2f) { self.base_mut().mouse_hover = true }

    /// Mouse left the widget.
    fn mouse_no_longer_on_widget(&self) { self.base_mut().mouse_hover = false }

    /// Left button pressed over the widget.
    fn left_mouse_pressed(&self, _pos: Vec2f) { self.base_mut().mouse_down = true }

    /// Left button released over the widget.
    fn left_mouse_released(&self, _pos: Vec2f) { self.base_mut().mouse_down = false }

    /// Left button released somewhere else after being pressed on the widget.
    fn left_mouse_button_no_longer_down(&self) { self.base_mut().mouse_down = false }

    /// Wheel turned over the widget. Returns `true` if the event was consumed.
    fn mouse_wheel_scrolled(&self, _delta: f32, _pos: Vec2f) -> bool { false }
}

/// Renderer bookkeeping of a styled widget.
pub(crate) struct RendererSlot {
    renderer: SharedRenderer,
    // set once the renderer was handed out for sharing
    shared: bool,
    observer: Option<Weak<RefCell<dyn RendererObserver>>>,
}

impl RendererSlot {
    pub fn new(renderer: SharedRenderer) -> Self {
        Self {
            renderer,
            shared: false,
            observer: None,
        }
    }
}

/// Widget state driven by a renderer.
pub(crate) trait Styled: RendererObserver + 'static {
    fn slot(&self) -> &RendererSlot;
    fn slot_mut(&mut self) -> &mut RendererSlot;

    /// Replays every property of the table, as if each had just changed.
    fn apply_renderer(&mut self, data: &RendererData) {
        for def in data.table().properties {
            self.renderer_changed(def.name, data);
        }
    }
}

/// Wraps `state` and subscribes it to the renderer stored in its slot.
pub(crate) fn new_styled<S: Styled>(state: S) -> Rc<RefCell<S>> {
    let state = Rc::new(RefCell::new(state));
    let weak: Weak<RefCell<S>> = Rc::downgrade(&state);
    let observer: Weak<RefCell<dyn RendererObserver>> = weak;
    let renderer = state.borrow().slot().renderer.clone();
    renderer.subscribe(observer.clone());
    {
        let mut inner = state.borrow_mut();
        inner.slot_mut().observer = Some(observer);
        let data = renderer.data();
        inner.apply_renderer(&data);
    }
    state
}

/// Renderer private to the widget. A renderer that was shared is copied first.
pub(crate) fn own_renderer<S: Styled>(state: &Rc<RefCell<S>>) -> SharedRenderer {
    let (current, shared) = {
        let inner = state.borrow();
        (inner.slot().renderer.clone(), inner.slot().shared)
    };
    if !shared {
        return current;
    }
    let own = current.detach();
    replace_renderer(state, own.clone());
    state.borrow_mut().slot_mut().shared = false;
    own
}

/// Renderer handle meant for sharing with other widgets.
pub(crate) fn share_renderer<S: Styled>(state: &Rc<RefCell<S>>) -> SharedRenderer {
    let mut inner = state.borrow_mut();
    inner.slot_mut().shared = true;
    inner.slot().renderer.clone()
}

/// Moves the widget over to `renderer` and applies all of its values.
pub(crate) fn replace_renderer<S: Styled>(state: &Rc<RefCell<S>>, renderer: SharedRenderer) {
    let (previous, observer) = {
        let inner = state.borrow();
        (inner.slot().renderer.clone(), inner.slot().observer.clone())
    };
    if let Some(observer) = observer {
        previous.unsubscribe(&observer);
        renderer.subscribe(observer);
    }
    let mut inner = state.borrow_mut();
    inner.slot_mut().renderer = renderer.clone();
    inner.slot_mut().shared = true;
    let data = renderer.data();
    inner.apply_renderer(&data);
}

fn same_widget(a: &Rc<dyn Widget>, b: &Rc<dyn Widget>) -> bool { Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const () }
