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
/// Number of slots needed to index every [`ComponentState`] by its discriminant.
pub const STATE_COUNT: usize = 11;

const HOVER_BIT: u8 = 1;
const ACTIVE_BIT: u8 = 2;
const FOCUSED_BIT: u8 = 4;
const DISABLED_BIT: u8 = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
/// Interaction state used to pick which style value applies.
///
/// The discriminant is a bit set (hover = 1, active = 2, focused = 4, disabled = 8); only the
/// combinations below are meaningful. Disabled widgets ignore hover and focus.
pub enum ComponentState {
    /// Idle.
    #[default]
    Normal = 0,
    /// Mouse over the widget.
    Hover = 1,
    /// Mouse held down, or checked/toggled.
    Active = 2,
    /// Active while hovered.
    ActiveHover = 3,
    /// Has keyboard focus.
    Focused = 4,
    /// Focused and hovered.
    FocusedHover = 5,
    /// Focused and active.
    FocusedActive = 6,
    /// Focused, active and hovered.
    FocusedActiveHover = 7,
    /// Not accepting input.
    Disabled = 8,
    /// Disabled while active.
    DisabledActive = 10,
}

impl ComponentState {
    /// All states, in discriminant order.
    pub const ALL: [ComponentState; 10] = [
        ComponentState::Normal,
        ComponentState::Hover,
        ComponentState::Active,
        ComponentState::ActiveHover,
        ComponentState::Focused,
        ComponentState::FocusedHover,
        ComponentState::FocusedActive,
        ComponentState::FocusedActiveHover,
        ComponentState::Disabled,
        ComponentState::DisabledActive,
    ];

    /// Maps the widget interaction flags onto a state.
    pub fn from_flags(hover: bool, active: bool, focused: bool, enabled: bool) -> Self {
        if !enabled {
            return if active { ComponentState::DisabledActive } else { ComponentState::Disabled };
        }
        match (focused, active, hover) {
            (true, true, true) => ComponentState::FocusedActiveHover,
            (true, true, false) => ComponentState::FocusedActive,
            (true, false, true) => ComponentState::FocusedHover,
            (true, false, false) => ComponentState::Focused,
            (false, true, true) => ComponentState::ActiveHover,
            (false, true, false) => ComponentState::Active,
            (false, false, true) => ComponentState::Hover,
            (false, false, false) => ComponentState::Normal,
        }
    }

    /// Index of the state in a `[_; STATE_COUNT]` table.
    pub fn index(self) -> usize { self as usize }

    /// Returns `true` if the hover bit is set.
    pub fn is_hover(self) -> bool { (self as u8) & HOVER_BIT != 0 }
    /// Returns `true` if the active bit is set.
    pub fn is_active(self) -> bool { (self as u8) & ACTIVE_BIT != 0 }
    /// Returns `true` if the focused bit is set.
    pub fn is_focused(self) -> bool { (self as u8) & FOCUSED_BIT != 0 }
    /// Returns `true` if the disabled bit is set.
    pub fn is_disabled(self) -> bool { (self as u8) & DISABLED_BIT != 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_states() {
        assert_eq!(ComponentState::from_flags(false, false, false, true), ComponentState::Normal);
        assert_eq!(ComponentState::from_flags(true, false, false, true), ComponentState::Hover);
        assert_eq!(ComponentState::from_flags(true, true, false, true), ComponentState::ActiveHover);
        assert_eq!(ComponentState::from_flags(true, true, true, true), ComponentState::FocusedActiveHover);
        assert_eq!(ComponentState::from_flags(false, true, true, true), ComponentState::FocusedActive);
        assert_eq!(ComponentState::from_flags(true, false, true, false), ComponentState::Disabled);
        assert_eq!(ComponentState::from_flags(true, true, true, false), ComponentState::DisabledActive);
    }

    #[test]
    fn discriminants_are_bit_sets() {
        for state in ComponentState::ALL {
            assert!(state.index() < STATE_COUNT);
        }
        assert!(ComponentState::FocusedHover.is_focused() && ComponentState::FocusedHover.is_hover());
        assert!(ComponentState::DisabledActive.is_disabled() && ComponentState::DisabledActive.is_active());
        assert!(!ComponentState::Disabled.is_hover());
    }
}
