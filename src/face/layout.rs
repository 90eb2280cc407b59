/*
 *  face/layout.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Face geometry and text measurement, scaled to the surface
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

use embedded_graphics::mono_font::{MonoFont, ascii::FONT_10X20};
use embedded_graphics::prelude::*;

use crate::constants::{
    BATTERY_LOW_TEXT_SIZE, BATTERY_TEXT_GAP, BATTERY_TEXT_SIZE, DATE_TEXT_SIZE,
    REFERENCE_WIDTH, SECOND_HAND_LENGTH, TIME_TEXT_SIZE,
};

/// Measures text for layout and hit testing.
///
/// Fonts belong to the host; the engine only needs the box a string will
/// occupy at a given pixel size.
pub trait TextMetrics {
    /// Width of the advance and height of the glyphs above the baseline
    fn measure(&self, text: &str, size_px: u32) -> Size;
}

/// Metrics of a monospaced font scaled to the requested size
#[derive(Debug, Clone, Copy)]
pub struct MonoMetrics {
    font: &'static MonoFont<'static>,
}

impl Default for MonoMetrics {
    fn default() -> Self {
        Self { font: &FONT_10X20 }
    }
}

impl TextMetrics for MonoMetrics {
    fn measure(&self, text: &str, size_px: u32) -> Size {
        let chars = text.chars().count() as u32;
        if chars == 0 || size_px == 0 {
            return Size::zero();
        }
        let cell = self.font.character_size;
        let advance = chars * cell.width + (chars - 1) * self.font.character_spacing;
        let scale = size_px as f32 / cell.height as f32;
        Size::new(
            (advance as f32 * scale).round() as u32,
            (self.font.baseline as f32 * scale).round().max(1.0) as u32,
        )
    }
}

/// Geometry of the face for the current surface size.
///
/// Text sizes follow the display density relative to a 454 pixel wide
/// reference panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLayout {
    pub width: u32,
    pub height: u32,
    pub center: Point,
    pub time_size: u32,
    pub date_size: u32,
    pub battery_size: u32,
    pub battery_low_size: u32,
    pub battery_gap: i32,
}

impl FaceLayout {
    pub fn for_surface(width: u32, height: u32) -> Self {
        let density = width.max(1) as f32 / REFERENCE_WIDTH as f32;
        let scaled = |size: f32| (size * density).round().max(1.0) as u32;
        Self {
            width,
            height,
            center: Point::new(width as i32 / 2, height as i32 / 2),
            time_size: scaled(TIME_TEXT_SIZE),
            date_size: scaled(DATE_TEXT_SIZE),
            battery_size: scaled(BATTERY_TEXT_SIZE),
            battery_low_size: scaled(BATTERY_LOW_TEXT_SIZE),
            battery_gap: (BATTERY_TEXT_GAP * density).round() as i32,
        }
    }

    /// Radius used by the second hand; the face is centred on the whole
    /// surface, ignoring any chin inset
    pub fn radius(&self) -> f32 {
        self.height as f32 / 2.0
    }

    /// Distance from the centre where the second hand starts
    pub fn hand_inner_radius(&self) -> f32 {
        self.radius() * (1.0 - SECOND_HAND_LENGTH)
    }
}
