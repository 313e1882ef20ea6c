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
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

use log::{trace, warn};

use super::value::{Outline, PropertyKind, PropertyValue};
use crate::{Color, Error, FontHandle, Result, TextStyle, Texture, TextureManager};

#[derive(Copy, Clone, Debug, PartialEq)]
/// Value a property reports while it is not set.
pub enum PropertyDefault {
    /// No value.
    Unset,
    /// A color.
    Color(Color),
    /// Border or padding widths.
    Outline(Outline),
    /// A flag.
    Bool(bool),
    /// A number.
    Number(f32),
    /// Text style bits.
    TextStyle(TextStyle),
}

impl PropertyDefault {
    fn to_value(self) -> Option<PropertyValue> {
        match self {
            PropertyDefault::Unset => None,
            PropertyDefault::Color(c) => Some(PropertyValue::Color(c)),
            PropertyDefault::Outline(o) => Some(PropertyValue::Outline(o)),
            PropertyDefault::Bool(b) => Some(PropertyValue::Bool(b)),
            PropertyDefault::Number(n) => Some(PropertyValue::Number(n)),
            PropertyDefault::TextStyle(s) => Some(PropertyValue::TextStyle(s)),
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// One entry of a widget type's property table.
pub struct PropertyDef {
    /// Canonical name, e.g. `TextColorHover`.
    pub name: &'static str,
    /// Kind of value accepted.
    pub kind: PropertyKind,
    /// Value reported while unset.
    pub default: PropertyDefault,
}

impl PropertyDef {
    /// Builds a table entry.
    pub const fn new(name: &'static str, kind: PropertyKind, default: PropertyDefault) -> Self { Self { name, kind, default } }
}

#[derive(Debug)]
/// The closed set of renderer properties of a widget type.
pub struct PropertyTable {
    /// Widget type name, used in error messages.
    pub widget_type: &'static str,
    /// Every property the type understands.
    pub properties: &'static [PropertyDef],
}

impl PropertyTable {
    /// Case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<&'static PropertyDef> {
        self.properties.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Receives a callback whenever a property of a subscribed renderer changes.
pub trait RendererObserver {
    /// Called with the canonical property name after the value changed.
    ///
    /// The renderer stays borrowed for the duration of the call, so implementations must not
    /// set or unset properties on it from here.
    fn renderer_changed(&mut self, property: &'static str, renderer: &RendererData);
}

/// Property values of one renderer, plus its subscribers.
pub struct RendererData {
    table: &'static PropertyTable,
    values: HashMap<&'static str, PropertyValue>,
    observers: Vec<Weak<RefCell<dyn RendererObserver>>>,
}

impl RendererData {
    /// The table this renderer validates against.
    pub fn table(&self) -> &'static PropertyTable { self.table }

    /// Current value of `name`, falling back to the table default. `None` for unknown or unset
    /// properties.
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        let def = self.table.find(name)?;
        self.values.get(def.name).cloned().or_else(|| def.default.to_value())
    }

    /// Returns `true` if `name` holds an explicitly set value.
    pub fn is_set(&self, name: &str) -> bool { self.table.find(name).is_some_and(|def| self.values.contains_key(def.name)) }

    /// Color value of `name`, if any.
    pub fn color(&self, name: &str) -> Option<Color> {
        match self.property(name) {
            Some(PropertyValue::Color(c)) => Some(c),
            _ => None,
        }
    }

    /// Outline value of `name`, zero when unset.
    pub fn outline(&self, name: &str) -> Outline {
        match self.property(name) {
            Some(PropertyValue::Outline(o)) => o,
            _ => Outline::default(),
        }
    }

    /// Number value of `name`, zero when unset.
    pub fn number(&self, name: &str) -> f32 {
        match self.property(name) {
            Some(PropertyValue::Number(n)) => n,
            _ => 0.0,
        }
    }

    /// Bool value of `name`, `false` when unset.
    pub fn bool(&self, name: &str) -> bool { matches!(self.property(name), Some(PropertyValue::Bool(true))) }

    /// Text style value of `name`, if any.
    pub fn text_style(&self, name: &str) -> Option<TextStyle> {
        match self.property(name) {
            Some(PropertyValue::TextStyle(s)) => Some(s),
            _ => None,
        }
    }

    /// Texture value of `name`, if any.
    pub fn texture(&self, name: &str) -> Option<Texture> {
        match self.property(name) {
            Some(PropertyValue::Texture(t)) => Some(t),
            _ => None,
        }
    }

    /// Font value of `name`, if any.
    pub fn font(&self, name: &str) -> Option<FontHandle> {
        match self.property(name) {
            Some(PropertyValue::Font(f)) => Some(f),
            _ => None,
        }
    }

    /// String value of `name`, if any.
    pub fn string(&self, name: &str) -> Option<String> {
        match self.property(name) {
            Some(PropertyValue::String(s)) => Some(s),
            _ => None,
        }
    }
}

#[derive(Clone)]
/// Reference-counted renderer that several widgets may share.
///
/// Mutations through any handle reach every widget subscribed to it. Call [`detach`] first
/// for an instance-local copy.
///
/// [`detach`]: SharedRenderer::detach
pub struct SharedRenderer(Rc<RefCell<RendererData>>);

impl SharedRenderer {
    /// Renderer with no values set.
    pub fn new(table: &'static PropertyTable) -> Self {
        Self(Rc::new(RefCell::new(RendererData {
            table,
            values: HashMap::new(),
            observers: Vec::new(),
        })))
    }

    /// Read access to the values.
    pub fn data(&self) -> Ref<'_, RendererData> { self.0.borrow() }

    /// Returns `true` if both handles refer to the same renderer.
    pub fn ptr_eq(&self, other: &SharedRenderer) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    /// Returns `true` if more than one handle refers to this renderer.
    pub fn is_shared(&self) -> bool { Rc::strong_count(&self.0) > 1 }

    /// Deep copy of the values, without subscribers.
    pub fn detach(&self) -> SharedRenderer {
        let data = self.0.borrow();
        Self(Rc::new(RefCell::new(RendererData {
            table: data.table,
            values: data.values.clone(),
            observers: Vec::new(),
        })))
    }

    /// Registers an observer. Dead observers are pruned on the next notification.
    pub fn subscribe(&self, observer: Weak<RefCell<dyn RendererObserver>>) { self.0.borrow_mut().observers.push(observer) }

    /// Removes an observer registered with [`subscribe`](Self::subscribe).
    pub fn unsubscribe(&self, observer: &Weak<RefCell<dyn RendererObserver>>) {
        self.0.borrow_mut().observers.retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize { self.0.borrow().observers.iter().filter(|o| o.strong_count() > 0).count() }

    fn lookup(&self, name: &str) -> Result<&'static PropertyDef> {
        let table = self.0.borrow().table;
        table.find(name).ok_or_else(|| Error::UnknownProperty {
            widget: table.widget_type,
            property: name.to_string(),
        })
    }

    fn store(&self, def: &'static PropertyDef, value: Option<PropertyValue>) {
        {
            let mut data = self.0.borrow_mut();
            match value {
                Some(value) => data.values.insert(def.name, value),
                None => data.values.remove(def.name),
            };
        }
        self.notify(def.name);
    }

    /// Sets a typed value. The value kind must match the property kind.
    pub fn set_property(&self, name: &str, value: PropertyValue) -> Result<()> {
        let def = self.lookup(name)?;
        if value.kind() != def.kind {
            return Err(Error::invalid_value(
                def.name,
                &format!("{:?}", value),
                format!("expected a {:?} value", def.kind),
            ));
        }
        self.store(def, Some(value));
        Ok(())
    }

    /// Parses `value` for the property and sets it. Textures load through `textures`.
    pub fn set_property_str(&self, name: &str, value: &str, textures: &TextureManager) -> Result<()> {
        let def = self.lookup(name)?;
        let parsed = PropertyValue::deserialize(def.name, def.kind, value, textures)?;
        if parsed.is_none() && !matches!(def.kind, PropertyKind::Color | PropertyKind::Texture | PropertyKind::Font) {
            return Err(Error::invalid_value(def.name, value, "property cannot be unset"));
        }
        self.store(def, parsed);
        Ok(())
    }

    /// Reverts a property to its default.
    pub fn unset_property(&self, name: &str) -> Result<()> {
        let def = self.lookup(name)?;
        self.store(def, None);
        Ok(())
    }

    /// Current value of `name`, see [`RendererData::property`].
    pub fn property(&self, name: &str) -> Result<Option<PropertyValue>> {
        let def = self.lookup(name)?;
        Ok(self.0.borrow().property(def.name))
    }

    /// Calls `renderer_changed` on every live observer.
    ///
    /// Observers currently borrowed elsewhere are skipped with a warning and keep their old values.
    pub fn notify(&self, property: &'static str) {
        let observers: Vec<_> = {
            let mut data = self.0.borrow_mut();
            data.observers.retain(|o| o.strong_count() > 0);
            data.observers.iter().filter_map(Weak::upgrade).collect()
        };
        trace!("renderer property {} changed, notifying {} observers", property, observers.len());
        for observer in observers {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.renderer_changed(property, &self.0.borrow()),
                Err(_) => warn!("observer busy, renderer property {} not delivered", property),
            }
        }
    }
}

impl Debug for SharedRenderer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.write_fmt(format_args!("SharedRenderer({}, {} values)", data.table.widget_type, data.values.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTextureLoader;

    static TEST_PROPERTIES: [PropertyDef; 4] = [
        PropertyDef::new("TextColor", PropertyKind::Color, PropertyDefault::Color(Color::BLACK)),
        PropertyDef::new("TextColorHover", PropertyKind::Color, PropertyDefault::Unset),
        PropertyDef::new("Borders", PropertyKind::Outline, PropertyDefault::Outline(Outline::uniform(1.0))),
        PropertyDef::new("Opacity", PropertyKind::Number, PropertyDefault::Number(1.0)),
    ];

    static TEST_TABLE: PropertyTable = PropertyTable {
        widget_type: "Test",
        properties: &TEST_PROPERTIES,
    };

    #[derive(Default)]
    struct Recorder {
        changes: Vec<&'static str>,
    }

    impl RendererObserver for Recorder {
        fn renderer_changed(&mut self, property: &'static str, _renderer: &RendererData) { self.changes.push(property) }
    }

    fn textures() -> TextureManager { TextureManager::new(MemoryTextureLoader::new()) }

    #[test]
    fn names_are_case_insensitive() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        renderer.set_property_str("textcolorHOVER", "red", &textures()).unwrap();
        assert_eq!(renderer.data().color("TextColorHover"), Some(Color::RED));
        assert!(renderer.data().is_set("TEXTCOLORHOVER"));
    }

    #[test]
    fn defaults_apply_while_unset() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        assert_eq!(renderer.data().color("TextColor"), Some(Color::BLACK));
        assert_eq!(renderer.data().color("TextColorHover"), None);
        assert_eq!(renderer.data().outline("Borders"), Outline::uniform(1.0));
        renderer.set_property("Borders", PropertyValue::Outline(Outline::uniform(3.0))).unwrap();
        renderer.unset_property("borders").unwrap();
        assert_eq!(renderer.data().outline("Borders"), Outline::uniform(1.0));
    }

    #[test]
    fn unknown_and_invalid_values_fail() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        match renderer.set_property_str("Sparkle", "1", &textures()) {
            Err(Error::UnknownProperty { widget, property }) => {
                assert_eq!(widget, "Test");
                assert_eq!(property, "Sparkle");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            renderer.set_property_str("Opacity", "opaque", &textures()),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            renderer.set_property("Opacity", PropertyValue::Bool(true)),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(renderer.set_property_str("Opacity", "", &textures()), Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn none_unsets_colors() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        renderer.set_property_str("TextColor", "blue", &textures()).unwrap();
        renderer.set_property_str("TextColor", "None", &textures()).unwrap();
        assert_eq!(renderer.data().color("TextColor"), Some(Color::BLACK));
    }

    #[test]
    fn observers_receive_canonical_names() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let weak: Weak<RefCell<dyn RendererObserver>> = Rc::downgrade(&(recorder.clone() as Rc<RefCell<dyn RendererObserver>>));
        renderer.subscribe(weak.clone());
        renderer.set_property_str("opacity", "0.5", &textures()).unwrap();
        renderer.set_property("textcolor", PropertyValue::Color(Color::RED)).unwrap();
        assert_eq!(recorder.borrow().changes, vec!["Opacity", "TextColor"]);

        renderer.unsubscribe(&weak);
        renderer.set_property_str("opacity", "1", &textures()).unwrap();
        assert_eq!(recorder.borrow().changes.len(), 2);
    }

    #[test]
    fn detach_isolates_copies() {
        let shared = SharedRenderer::new(&TEST_TABLE);
        let sibling = shared.clone();
        shared.set_property_str("TextColor", "red", &textures()).unwrap();
        assert_eq!(sibling.data().color("TextColor"), Some(Color::RED));

        let own = shared.detach();
        own.set_property_str("TextColor", "green", &textures()).unwrap();
        assert_eq!(own.data().color("TextColor"), Some(Color::GREEN));
        assert_eq!(sibling.data().color("TextColor"), Some(Color::RED));
        assert!(!own.ptr_eq(&shared));
        assert!(shared.is_shared());
        assert!(!own.is_shared());
    }

    #[test]
    fn busy_observer_misses_the_change() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let weak: Weak<RefCell<dyn RendererObserver>> = Rc::downgrade(&(recorder.clone() as Rc<RefCell<dyn RendererObserver>>));
        renderer.subscribe(weak);
        {
            let _busy = recorder.borrow();
            renderer.set_property("Opacity", PropertyValue::Number(0.5)).unwrap();
        }
        assert!(recorder.borrow().changes.is_empty());
        renderer.set_property("TextColor", PropertyValue::Color(Color::RED)).unwrap();
        assert_eq!(recorder.borrow().changes, vec!["TextColor"]);
    }

    #[test]
    fn dead_observers_are_pruned() {
        let renderer = SharedRenderer::new(&TEST_TABLE);
        {
            let recorder: Rc<RefCell<dyn RendererObserver>> = Rc::new(RefCell::new(Recorder::default()));
            renderer.subscribe(Rc::downgrade(&recorder));
            assert_eq!(renderer.observer_count(), 1);
        }
        assert_eq!(renderer.observer_count(), 0);
        renderer.notify("Opacity");
    }
}
