/*
 *  face/mode.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mode controller - display mode, silent mode and visibility
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

use super::DisplayMode;

/// The four combined states of display mode and silent mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceState {
    Active,
    ActiveSilent,
    Ambient,
    AmbientSilent,
}

/// Result of an ambient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Unchanged,
    EnteredAmbient,
    EnteredActive,
}

/// Mode controller - owns the two independent mode axes plus visibility.
///
/// Display mode only moves on host ambient notifications; silent mode only
/// moves on a double tap. Neither ever changes the other.
#[derive(Debug, Default)]
pub struct ModeController {
    display: DisplayMode,
    silent: bool,
    visible: bool,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display
    }

    pub fn is_ambient(&self) -> bool {
        self.display.is_ambient()
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> FaceState {
        match (self.display, self.silent) {
            (DisplayMode::Active, false) => FaceState::Active,
            (DisplayMode::Active, true) => FaceState::ActiveSilent,
            (DisplayMode::Ambient, false) => FaceState::Ambient,
            (DisplayMode::Ambient, true) => FaceState::AmbientSilent,
        }
    }

    /// Apply the host's ambient notification
    pub fn set_ambient(&mut self, in_ambient: bool) -> ModeChange {
        let new_mode = if in_ambient { DisplayMode::Ambient } else { DisplayMode::Active };
        if new_mode == self.display {
            return ModeChange::Unchanged;
        }

        log::info!("Display mode changed: {:?} -> {:?}", self.display, new_mode);
        self.display = new_mode;
        match new_mode {
            DisplayMode::Ambient => ModeChange::EnteredAmbient,
            DisplayMode::Active => ModeChange::EnteredActive,
        }
    }

    /// Flip silent mode, returns the new value
    pub fn toggle_silent(&mut self) -> bool {
        self.silent = !self.silent;
        log::info!("Silent mode {}", if self.silent { "on" } else { "off" });
        self.silent
    }

    /// Returns true if visibility changed
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        log::debug!("Face {}", if visible { "visible" } else { "hidden" });
        self.visible = visible;
        true
    }

    /// The 1 Hz heartbeat runs only while visible and interactive
    pub fn heartbeat_wanted(&self) -> bool {
        self.visible && !self.is_ambient()
    }

    /// Text and hands lose anti-aliasing in ambient
    pub fn anti_alias(&self) -> bool {
        !self.is_ambient()
    }
}
