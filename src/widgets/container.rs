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
use std::rc::{Rc, Weak};

use log::debug;

use super::{same_widget, Resources, Widget, WidgetBase};
use crate::{RenderStates, RenderTarget, Vec2f};

pub(crate) struct ContainerState {
    base: WidgetBase,
    children: Vec<Rc<dyn Widget>>,
    own_resources: Option<Resources>,
    hovered: Option<Rc<dyn Widget>>,
    pressed: Option<Rc<dyn Widget>>,
}

#[derive(Clone)]
/// Widget owning an ordered list of named children.
///
/// Children are drawn in insertion order, so the last one ends up on top and is the first
/// candidate for mouse events.
pub struct Container(Rc<RefCell<ContainerState>>);

impl Default for Container {
    fn default() -> Self { Self::new() }
}

impl Container {
    /// Empty container.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ContainerState {
            base: WidgetBase::default(),
            children: Vec::new(),
            own_resources: None,
            hovered: None,
            pressed: None,
        })))
    }

    pub(crate) fn from_state(state: Rc<RefCell<ContainerState>>) -> Self { Self(state) }

    /// Resources handed to the children, overriding the inherited ones.
    pub fn set_resources(&self, resources: Resources) {
        self.0.borrow_mut().own_resources = Some(resources);
        self.propagate_resources();
    }

    /// Effective resources: own, inherited, or the defaults.
    pub fn resources(&self) -> Resources {
        let state = self.0.borrow();
        state.own_resources.clone().or_else(|| state.base.resources.clone()).unwrap_or_default()
    }

    fn propagate_resources(&self) {
        let resources = self.resources();
        for child in self.children() {
            child.set_inherited_resources(resources.clone());
        }
    }

    /// Adds `widget` on top of the existing children.
    pub fn add<W: Widget>(&self, widget: W, name: &str) {
        let widget: Rc<dyn Widget> = Rc::new(widget);
        {
            let mut base = widget.base_mut();
            base.name = name.to_string();
            base.parent = Rc::downgrade(&self.0);
        }
        widget.set_inherited_resources(self.resources());
        debug!("added {} '{}'", widget.widget_type(), name);
        self.0.borrow_mut().children.push(widget);
    }

    /// Removes the first child called `name`. Returns `false` if there is none.
    pub fn remove(&self, name: &str) -> bool {
        let widget = {
            let mut state = self.0.borrow_mut();
            match state.children.iter().position(|c| c.name() == name) {
                Some(index) => state.children.remove(index),
                None => return false,
            }
        };
        self.forget(&widget);
        true
    }

    /// Removes every child.
    pub fn remove_all_widgets(&self) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for widget in children.iter() {
            self.forget(widget);
        }
    }

    fn forget(&self, widget: &Rc<dyn Widget>) {
        {
            let mut state = self.0.borrow_mut();
            if state.hovered.as_ref().is_some_and(|h| same_widget(h, widget)) {
                state.hovered = None;
            }
            if state.pressed.as_ref().is_some_and(|p| same_widget(p, widget)) {
                state.pressed = None;
            }
        }
        widget.base_mut().parent = Weak::new();
    }

    /// Snapshot of the children, bottom first.
    pub fn children(&self) -> Vec<Rc<dyn Widget>> { self.0.borrow().children.clone() }

    /// Number of children.
    pub fn widget_count(&self) -> usize { self.0.borrow().children.len() }

    /// Child called `name`.
    pub fn widget(&self, name: &str) -> Option<Rc<dyn Widget>> { self.children().into_iter().find(|c| c.name() == name) }

    /// Child called `name`, if it is a `W`.
    pub fn get<W: Widget + Clone>(&self, name: &str) -> Option<W> {
        self.widget(name).and_then(|c| c.as_any().downcast_ref::<W>().cloned())
    }

    /// Topmost visible child under `pos`, given in the frame of the container.
    pub fn widget_at_position(&self, pos: Vec2f) -> Option<Rc<dyn Widget>> {
        self.children().into_iter().rev().find(|c| c.is_visible() && c.is_mouse_on_widget(pos))
    }

    /// Child holding the focus.
    pub fn focused_widget(&self) -> Option<Rc<dyn Widget>> { self.children().into_iter().find(|c| c.is_focused()) }

    /// Moves the focus to the next focusable child, wrapping around.
    ///
    /// Returns `false` if no other child can take the focus.
    pub fn focus_next(&self) -> bool { self.cycle_focus(true) }

    /// Moves the focus to the previous focusable child, wrapping around.
    pub fn focus_previous(&self) -> bool { self.cycle_focus(false) }

    fn cycle_focus(&self, forward: bool) -> bool {
        let children = self.children();
        let count = children.len();
        if count == 0 {
            return false;
        }
        let current = children.iter().position(|c| c.is_focused());
        for step in 1..=count {
            let index = match (current, forward) {
                (Some(i), true) => (i + step) % count,
                (Some(i), false) => (i + count - step % count) % count,
                (None, true) => step - 1,
                (None, false) => count - step,
            };
            if Some(index) == current {
                break;
            }
            let candidate = &children[index];
            if candidate.is_visible() && candidate.is_enabled() && candidate.can_gain_focus() {
                if let Some(i) = current {
                    children[i].set_focused(false);
                }
                candidate.set_focused(true);
                return true;
            }
        }
        false
    }

    fn focus_child(&self, target: Option<&Rc<dyn Widget>>) {
        let target = target.filter(|t| t.can_gain_focus());
        for child in self.children() {
            if child.is_focused() && !target.is_some_and(|t| same_widget(t, &child)) {
                child.set_focused(false);
            }
        }
        if let Some(target) = target {
            target.set_focused(true);
        }
    }

    fn local(&self, pos: Vec2f) -> Vec2f {
        let origin = self.position();
        Vec2f::new(pos.x - origin.x, pos.y - origin.y)
    }

    // enabled child under a parent-frame position, plus the position in the container frame
    fn target(&self, pos: Vec2f) -> (Option<Rc<dyn Widget>>, Vec2f) {
        let local = self.local(pos);
        (self.widget_at_position(local).filter(|c| c.is_enabled()), local)
    }
}

impl Widget for Container {
    fn widget_type(&self) -> &'static str { "Container" }

    fn base(&self) -> Ref<'_, WidgetBase> { Ref::map(self.0.borrow(), |s| &s.base) }

    fn base_mut(&self) -> RefMut<'_, WidgetBase> { RefMut::map(self.0.borrow_mut(), |s| &mut s.base) }

    fn as_any(&self) -> &dyn Any { self }

    fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        let position = self.position();
        let states = states.translated(position.x, position.y);
        for child in self.children().iter().filter(|c| c.is_visible()) {
            child.draw(target, &states);
        }
    }

    fn set_inherited_resources(&self, resources: Resources) {
        self.base_mut().resources = Some(resources);
        self.propagate_resources();
    }

    fn mouse_moved(&self, pos: Vec2f) {
        self.base_mut().mouse_hover = true;
        let (target, local) = self.target(pos);
        let previous = self.0.borrow_mut().hovered.take();
        if let Some(previous) = previous {
            if !target.as_ref().is_some_and(|t| same_widget(t, &previous)) {
                previous.mouse_no_longer_on_widget();
            }
        }
        if let Some(target) = &target {
            target.mouse_moved(local);
        }
        self.0.borrow_mut().hovered = target;
    }

    fn mouse_no_longer_on_widget(&self) {
        self.base_mut().mouse_hover = false;
        let previous = self.0.borrow_mut().hovered.take();
        if let Some(previous) = previous {
            previous.mouse_no_longer_on_widget();
        }
    }

    fn left_mouse_pressed(&self, pos: Vec2f) {
        self.base_mut().mouse_down = true;
        let (target, local) = self.target(pos);
        self.focus_child(target.as_ref());
        if let Some(target) = &target {
            target.left_mouse_pressed(local);
        }
        self.0.borrow_mut().pressed = target;
    }

    fn left_mouse_released(&self, pos: Vec2f) {
        self.base_mut().mouse_down = false;
        let (target, local) = self.target(pos);
        if let Some(target) = &target {
            target.left_mouse_released(local);
        }
        let pressed = self.0.borrow_mut().pressed.take();
        if let Some(pressed) = pressed {
            if !target.as_ref().is_some_and(|t| same_widget(t, &pressed)) {
                pressed.left_mouse_button_no_longer_down();
            }
        }
    }

    fn left_mouse_button_no_longer_down(&self) {
        self.base_mut().mouse_down = false;
        let pressed = self.0.borrow_mut().pressed.take();
        if let Some(pressed) = pressed {
            pressed.left_mouse_button_no_longer_down();
        }
    }

    fn mouse_wheel_scrolled(&self, delta: f32, pos: Vec2f) -> bool {
        let (target, local) = self.target(pos);
        target.is_some_and(|t| t.mouse_wheel_scrolled(delta, local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::fake_font;
    use crate::{Button, ComponentState, RichTextLabel};
    use std::cell::Cell;

    fn button(x: f32, y: f32) -> Button {
        let button = Button::new();
        button.set_position(Vec2f::new(x, y));
        button.set_size(Vec2f::new(100.0, 30.0));
        button
    }

    #[test]
    fn add_get_and_remove() {
        let root = Container::new();
        let ok = button(0.0, 0.0);
        root.add(ok.clone(), "ok");
        root.add(RichTextLabel::new(), "caption");
        assert_eq!(root.widget_count(), 2);

        let found: Button = root.get("ok").unwrap();
        assert!(found.parent().is_some());
        assert!(root.get::<RichTextLabel>("ok").is_none());
        assert!(root.get::<RichTextLabel>("caption").is_some());

        assert!(root.remove("ok"));
        assert!(!root.remove("ok"));
        assert!(ok.parent().is_none());
        assert_eq!(root.widget_count(), 1);

        root.remove_all_widgets();
        assert_eq!(root.widget_count(), 0);
    }

    #[test]
    fn topmost_child_wins_hit_test() {
        let root = Container::new();
        root.add(button(0.0, 0.0), "below");
        root.add(button(50.0, 0.0), "above");
        let hit = root.widget_at_position(Vec2f::new(75.0, 10.0)).unwrap();
        assert_eq!(hit.name(), "above");
        let hit = root.widget_at_position(Vec2f::new(10.0, 10.0)).unwrap();
        assert_eq!(hit.name(), "below");
        assert!(root.widget_at_position(Vec2f::new(10.0, 40.0)).is_none());

        root.get::<Button>("above").unwrap().set_visible(false);
        let hit = root.widget_at_position(Vec2f::new(75.0, 10.0)).unwrap();
        assert_eq!(hit.name(), "below");
    }

    #[test]
    fn events_use_the_container_frame() {
        let root = Container::new();
        let panel = Container::new();
        panel.set_position(Vec2f::new(50.0, 50.0));
        panel.set_size(Vec2f::new(300.0, 300.0));
        let ok = button(10.0, 10.0);
        panel.add(ok.clone(), "ok");
        root.add(panel.clone(), "panel");

        let absolute = ok.absolute_position();
        assert_eq!((absolute.x, absolute.y), (60.0, 60.0));

        root.mouse_moved(Vec2f::new(70.0, 70.0));
        assert_eq!(ok.state(), ComponentState::Hover);
        root.mouse_moved(Vec2f::new(20.0, 20.0));
        assert_eq!(ok.state(), ComponentState::Normal);
    }

    #[test]
    fn press_and_release_emit_once() {
        let root = Container::new();
        let ok = button(0.0, 0.0);
        root.add(ok.clone(), "ok");
        let presses = Rc::new(Cell::new(0));
        let counter = presses.clone();
        ok.on_press().connect(move |_| counter.set(counter.get() + 1));

        root.mouse_moved(Vec2f::new(5.0, 5.0));
        root.left_mouse_pressed(Vec2f::new(5.0, 5.0));
        assert_eq!(ok.state(), ComponentState::FocusedActiveHover);
        root.left_mouse_released(Vec2f::new(5.0, 5.0));
        assert_eq!(presses.get(), 1);

        // released outside: no press
        root.left_mouse_pressed(Vec2f::new(5.0, 5.0));
        root.mouse_moved(Vec2f::new(200.0, 5.0));
        root.left_mouse_released(Vec2f::new(200.0, 5.0));
        assert_eq!(presses.get(), 1);
        assert_eq!(ok.state(), ComponentState::Focused);

        // clicking empty space drops the focus
        root.left_mouse_pressed(Vec2f::new(200.0, 5.0));
        assert!(!ok.is_focused());
    }

    #[test]
    fn focus_traversal_wraps_and_skips() {
        let root = Container::new();
        let a = button(0.0, 0.0);
        let b = button(0.0, 40.0);
        let c = button(0.0, 80.0);
        root.add(a.clone(), "a");
        root.add(RichTextLabel::new(), "label");
        root.add(b.clone(), "b");
        root.add(c.clone(), "c");
        b.set_enabled(false);

        assert!(root.focus_next());
        assert!(a.is_focused());
        assert!(root.focus_next());
        assert!(c.is_focused());
        assert!(!a.is_focused());
        assert!(root.focus_next());
        assert!(a.is_focused());
        assert!(root.focus_previous());
        assert!(c.is_focused());
        assert_eq!(root.focused_widget().unwrap().name(), "c");

        a.set_visible(false);
        assert!(!root.focus_next());
        assert!(c.is_focused());
    }

    #[test]
    fn resources_flow_down_the_tree() {
        let root = Container::new();
        let panel = Container::new();
        let label = RichTextLabel::new();
        panel.add(label.clone(), "label");
        root.add(panel, "panel");
        assert!(label.font().is_none());

        let font = fake_font();
        root.set_resources(Resources::with_font(font.clone()));
        assert!(label.font().unwrap().ptr_eq(&font));

        let late = RichTextLabel::new();
        root.add(late.clone(), "late");
        assert!(late.font().unwrap().ptr_eq(&font));
    }

    #[test]
    fn wheel_goes_to_the_widget_under_the_mouse() {
        let root = Container::new();
        root.add(button(0.0, 0.0), "ok");
        assert!(!root.mouse_wheel_scrolled(1.0, Vec2f::new(5.0, 5.0)));
        assert!(!root.mouse_wheel_scrolled(1.0, Vec2f::new(500.0, 5.0)));
    }
}
