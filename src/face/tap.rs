/*
 *  face/tap.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Tap interpreter - routes taps to the date toggle or silent mode
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::constants::{DATE_FORMAT_REVERT_MS, DOUBLE_TAP_WINDOW_MS};
use crate::face::clock::DateFormat;

/// Tap types delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    /// Finger down and confirmed; the only kind acted upon
    Primary,
    /// Gesture cancelled by the platform
    Cancel,
    /// Anything else (long press, palm, ...)
    Other,
}

impl TapKind {
    /// Map the platform's raw tap type code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => TapKind::Primary,
            1 => TapKind::Cancel,
            _ => TapKind::Other,
        }
    }
}

/// What a tap asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    /// Not a primary tap, nothing changes
    Ignored,
    /// Landed on the time
    ToggleDateFormat,
    /// Second miss inside the double tap window
    ToggleSilent,
    /// A single miss, remembered for double tap detection
    Recorded,
}

/// Classifies taps against the last drawn time box.
///
/// Only misses feed the double tap window, and the window is a single
/// rolling timestamp: three quick misses toggle twice.
#[derive(Debug, Default)]
pub struct TapInterpreter {
    last_miss: Option<i64>,
}

impl TapInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_miss(&self) -> Option<i64> {
        self.last_miss
    }

    /// `hit_box` is `None` until the first frame has been drawn, in which
    /// case every tap is a miss.
    pub fn interpret(&mut self, kind: TapKind, at: Point, hit_box: Option<&Rectangle>, now_ms: i64) -> TapAction {
        if kind != TapKind::Primary {
            return TapAction::Ignored;
        }

        if hit_box.is_some_and(|b| strictly_contains(b, at)) {
            return TapAction::ToggleDateFormat;
        }

        let double = self
            .last_miss
            .is_some_and(|last| now_ms - last < DOUBLE_TAP_WINDOW_MS);
        self.last_miss = Some(now_ms);

        if double { TapAction::ToggleSilent } else { TapAction::Recorded }
    }
}

/// Edges excluded
fn strictly_contains(rect: &Rectangle, p: Point) -> bool {
    let left = rect.top_left.x;
    let top = rect.top_left.y;
    let right = left + rect.size.width as i32;
    let bottom = top + rect.size.height as i32;
    p.x > left && p.x < right && p.y > top && p.y < bottom
}

/// Date format with its automatic revert.
///
/// Standard always carries a deadline; once it passes the next frame
/// goes back to Clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateFormatState {
    format: DateFormat,
    revert_deadline: Option<i64>,
}

impl DateFormatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&self) -> DateFormat {
        self.format
    }

    pub fn revert_deadline(&self) -> Option<i64> {
        self.revert_deadline
    }

    pub fn toggle(&mut self, now_ms: i64) -> DateFormat {
        self.format = self.format.toggled();
        self.revert_deadline = match self.format {
            DateFormat::Standard => Some(now_ms + DATE_FORMAT_REVERT_MS),
            DateFormat::Clean => None,
        };
        log::debug!("Date format now {:?}", self.format);
        self.format
    }

    /// Per frame check; returns true when it reverted
    pub fn expire(&mut self, now_ms: i64) -> bool {
        if self.format != DateFormat::Standard {
            return false;
        }
        match self.revert_deadline {
            Some(deadline) if now_ms < deadline => false,
            _ => {
                self.format = DateFormat::Clean;
                self.revert_deadline = None;
                log::debug!("Date format reverted to {:?}", self.format);
                true
            }
        }
    }
}
