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
use crate::{Color, FloatRect, RenderStates, RenderTarget, Vec2f};

/// Default thickness of a vertical scrollbar.
pub const DEFAULT_SCROLLBAR_WIDTH: f32 = 16.0;

const MIN_THUMB_LENGTH: f32 = 8.0;
const TRACK_COLOR: Color = Color::rgb(245, 245, 245);
const THUMB_COLOR: Color = Color::rgb(220, 220, 220);
const THUMB_HOVER_COLOR: Color = Color::rgb(230, 230, 230);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// When a widget shows its scrollbar.
pub enum ScrollbarPolicy {
    /// Only while the content does not fit.
    #[default]
    Automatic,
    /// Always, reserving its width up front.
    Always,
    /// Never. Content that does not fit is clipped.
    Never,
}

#[derive(Clone, Debug)]
pub(crate) struct Scrollbar {
    policy: ScrollbarPolicy,
    width: f32,
    viewport: u32,
    maximum: u32,
    value: u32,
    scroll_amount: u32,
    // thumb grab point while dragging
    drag_origin: Option<(f32, u32)>,
    hover: bool,
}

impl Default for Scrollbar {
    fn default() -> Self {
        Self {
            policy: ScrollbarPolicy::Automatic,
            width: DEFAULT_SCROLLBAR_WIDTH,
            viewport: 0,
            maximum: 0,
            value: 0,
            scroll_amount: 1,
            drag_origin: None,
            hover: false,
        }
    }
}

impl Scrollbar {
    pub fn policy(&self) -> ScrollbarPolicy { self.policy }

    pub fn set_policy(&mut self, policy: ScrollbarPolicy) { self.policy = policy }

    pub fn width(&self) -> f32 { self.width }

    pub fn set_width(&mut self, width: f32) { self.width = if width > 0.0 { width } else { DEFAULT_SCROLLBAR_WIDTH } }

    pub fn viewport(&self) -> u32 { self.viewport }

    pub fn set_viewport(&mut self, viewport: u32) {
        self.viewport = viewport;
        self.set_value(self.value);
    }

    pub fn maximum(&self) -> u32 { self.maximum }

    pub fn set_maximum(&mut self, maximum: u32) {
        self.maximum = maximum;
        self.set_value(self.value);
    }

    pub fn max_value(&self) -> u32 { self.maximum.saturating_sub(self.viewport) }

    pub fn value(&self) -> u32 { self.value }

    pub fn set_value(&mut self, value: u32) { self.value = value.min(self.max_value()) }

    pub fn set_scroll_amount(&mut self, amount: u32) { self.scroll_amount = amount.max(1) }

    pub fn is_shown(&self) -> bool {
        match self.policy {
            ScrollbarPolicy::Always => true,
            ScrollbarPolicy::Never => false,
            ScrollbarPolicy::Automatic => self.maximum > self.viewport,
        }
    }

    /// Scrolls by `delta` notches, positive towards the top. Returns `true` if the event was used.
    pub fn mouse_wheel_scrolled(&mut self, delta: f32) -> bool {
        if !self.is_shown() {
            return false;
        }
        let step = delta * self.scroll_amount as f32;
        let value = self.value as f32 - step;
        self.set_value(if value < 0.0 { 0 } else { value.round() as u32 });
        true
    }

    /// Thumb inside `track`, given in the same frame.
    pub fn thumb(&self, track: FloatRect) -> FloatRect {
        let mut thumb = track;
        if track.height <= 0.0 || self.maximum == 0 || self.viewport == 0 {
            return thumb;
        }

        let thumb_len = (track.height * self.viewport as f32 / self.maximum as f32).clamp(MIN_THUMB_LENGTH.min(track.height), track.height);
        thumb.height = thumb_len;

        let max_value = self.max_value();
        let free = track.height - thumb_len;
        if max_value > 0 && free > 0.0 {
            thumb.top += self.value.min(max_value) as f32 * free / max_value as f32;
        }
        thumb
    }

    /// Starts dragging when `pos` hits the thumb, otherwise jumps one viewport towards `pos`.
    pub fn left_mouse_pressed(&mut self, track: FloatRect, pos: Vec2f) {
        let thumb = self.thumb(track);
        if thumb.contains(pos.x, pos.y) {
            self.drag_origin = Some((pos.y, self.value));
        } else if pos.y < thumb.top {
            self.set_value(self.value.saturating_sub(self.viewport));
        } else {
            self.set_value(self.value.saturating_add(self.viewport));
        }
    }

    pub fn left_mouse_released(&mut self) { self.drag_origin = None }

    pub fn is_dragging(&self) -> bool { self.drag_origin.is_some() }

    pub fn mouse_moved(&mut self, track: FloatRect, pos: Vec2f) {
        self.hover = track.contains(pos.x, pos.y);
        let (origin_y, origin_value) = match self.drag_origin {
            Some(origin) => origin,
            None => return,
        };
        if track.height <= 0.0 {
            return;
        }
        let delta = (pos.y - origin_y) * self.maximum as f32 / track.height;
        let value = origin_value as f32 + delta;
        self.set_value(if value < 0.0 { 0 } else { value.round() as u32 });
    }

    pub fn mouse_no_longer_on_widget(&mut self) { self.hover = false }

    pub fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates, track: FloatRect, opacity: f32) {
        let track_states = states.translated(track.left, track.top);
        target.draw_filled_rect(&track_states, Vec2f::new(track.width, track.height), TRACK_COLOR.with_opacity(opacity));
        let thumb = self.thumb(track);
        let color = if self.hover || self.is_dragging() { THUMB_HOVER_COLOR } else { THUMB_COLOR };
        let thumb_states = states.translated(thumb.left, thumb.top);
        target.draw_filled_rect(&thumb_states, Vec2f::new(thumb.width, thumb.height), color.with_opacity(opacity));
    }
}
