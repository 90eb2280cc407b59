/*
 *  face/color.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Face palette - picks colors from mode, silent and battery state
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

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::face::DisplayMode;

/// Muted background used while silent and interactive
const SILENT_BACKGROUND: Rgb888 = Rgb888::new(0x1A, 0x23, 0x4E);
/// Muted text used while silent
const SILENT_TEXT: Rgb888 = Rgb888::new(0x9E, 0x9E, 0x9E);
/// Second hand color on each 15 second pulse
const PULSE_ACCENT: Rgb888 = Rgb888::new(0xFF, 0xC1, 0x07);

/// Colors for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb888,
    pub text: Rgb888,
    /// Time and battery text; red when the battery is low
    pub status_text: Rgb888,
    pub hand: Rgb888,
    pub hand_pulse: Rgb888,
}

impl Palette {
    /// Silent wins over low battery, and ambient stays monochrome
    pub fn for_state(mode: DisplayMode, silent: bool, battery_low: bool) -> Self {
        match (mode, silent) {
            (DisplayMode::Ambient, silent) => {
                let text = if silent { SILENT_TEXT } else { Rgb888::WHITE };
                Self {
                    background: Rgb888::BLACK,
                    text,
                    status_text: text,
                    hand: text,
                    hand_pulse: text,
                }
            }
            (DisplayMode::Active, true) => Self {
                background: SILENT_BACKGROUND,
                text: SILENT_TEXT,
                status_text: SILENT_TEXT,
                hand: SILENT_TEXT,
                hand_pulse: Rgb888::WHITE,
            },
            (DisplayMode::Active, false) => Self {
                background: Rgb888::BLUE,
                text: Rgb888::WHITE,
                status_text: if battery_low { Rgb888::RED } else { Rgb888::WHITE },
                hand: Rgb888::WHITE,
                hand_pulse: PULSE_ACCENT,
            },
        }
    }
}

/// Perceived brightness (0-255), Rec. 601 weights
pub fn luminance(color: Rgb888) -> u8 {
    let y = 299 * color.r() as u32 + 587 * color.g() as u32 + 114 * color.b() as u32;
    (y / 1000) as u8
}

/// Desaturate, used for the ambient copy of the background image
pub fn to_gray(color: Rgb888) -> Rgb888 {
    let y = luminance(color);
    Rgb888::new(y, y, y)
}

/// Mix `fg` over `bg` with `alpha` (255 = opaque)
pub fn blend(fg: Rgb888, bg: Rgb888, alpha: u8) -> Rgb888 {
    let a = alpha as u32;
    let mix = |f: u8, b: u8| ((f as u32 * a + b as u32 * (255 - a)) / 255) as u8;
    Rgb888::new(mix(fg.r(), bg.r()), mix(fg.g(), bg.g()), mix(fg.b(), bg.b()))
}
