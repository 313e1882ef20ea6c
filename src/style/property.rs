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
use super::state::{ComponentState, STATE_COUNT};

/// Picks the value that applies in `state` from a table of optional per-state values.
///
/// Every property family goes through this one helper so that the fallback chain is identical
/// for colors, textures and text styles alike. Returns `None` when neither the state chain nor
/// `Normal` has a value.
pub fn resolve_state_value<T>(values: &[Option<T>; STATE_COUNT], state: ComponentState) -> Option<&T> {
    let get = |s: ComponentState| values[s.index()].as_ref();
    let focused = state.is_focused();

    if state.is_disabled() {
        if state.is_active() {
            if let Some(v) = get(ComponentState::DisabledActive) {
                return Some(v);
            }
        }
        if let Some(v) = get(ComponentState::Disabled) {
            return Some(v);
        }
    }

    if state.is_active() {
        if state.is_hover() {
            if focused {
                if let Some(v) = get(ComponentState::FocusedActiveHover) {
                    return Some(v);
                }
            }
            if let Some(v) = get(ComponentState::ActiveHover) {
                return Some(v);
            }
        }
        if focused {
            if let Some(v) = get(ComponentState::FocusedActive) {
                return Some(v);
            }
        }
        if let Some(v) = get(ComponentState::Active) {
            return Some(v);
        }
    }

    if state.is_hover() {
        if focused {
            if let Some(v) = get(ComponentState::FocusedHover) {
                return Some(v);
            }
        }
        if let Some(v) = get(ComponentState::Hover) {
            return Some(v);
        }
    }

    if focused {
        if let Some(v) = get(ComponentState::Focused) {
            return Some(v);
        }
    }

    get(ComponentState::Normal)
}

#[derive(Clone, Debug)]
/// A style property with an optional value per [`ComponentState`] and a fallback default.
pub struct StyleProperty<T> {
    default: T,
    values: [Option<T>; STATE_COUNT],
    revision: u64,
}

impl<T: Clone> StyleProperty<T> {
    /// Creates a property with no per-state values.
    pub fn new(default: T) -> Self {
        Self {
            default,
            values: std::array::from_fn(|_| None),
            revision: 0,
        }
    }

    /// Stores the value used in `state`.
    pub fn set_value(&mut self, value: T, state: ComponentState) {
        self.values[state.index()] = Some(value);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Stores or clears the value used in `state`.
    pub fn set_optional(&mut self, value: Option<T>, state: ComponentState) {
        self.values[state.index()] = value;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Clears the value used in `state`.
    pub fn unset_value(&mut self, state: ComponentState) { self.set_optional(None, state) }

    /// Returns `true` if `state` has its own value.
    pub fn is_set(&self, state: ComponentState) -> bool { self.values[state.index()].is_some() }

    /// Resolved value for `state`.
    pub fn value(&self, state: ComponentState) -> &T { resolve_state_value(&self.values, state).unwrap_or(&self.default) }

    /// Value used when nothing along the chain is set.
    pub fn default_value(&self) -> &T { &self.default }

    /// Changes the fallback value.
    pub fn set_default(&mut self, default: T) {
        self.default = default;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Counter bumped on every mutation, for cache invalidation.
    pub fn revision(&self) -> u64 { self.revision }
}
