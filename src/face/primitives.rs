/*
 *  face/primitives.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Draw primitives - the ordered output of a render pass
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

use std::sync::Arc;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::face::background::RgbImage;
use crate::face::clock::FaceText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Time,
    Date,
    Battery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub role: TextRole,
    pub text: FaceText,
    /// Left end of the baseline
    pub origin: Point,
    /// Measured box, baseline at the bottom edge
    pub bounds: Rectangle,
    pub size_px: u32,
    pub color: Rgb888,
    pub alpha: u8,
    pub anti_alias: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    /// Fill the whole surface
    Fill { color: Rgb888 },
    /// Blit a pre-scaled image
    Image { image: Arc<RgbImage>, top_left: Point },
    Text(TextPrimitive),
    Line {
        start: Point,
        end: Point,
        color: Rgb888,
        stroke_width: u32,
        anti_alias: bool,
    },
}

/// One composed frame, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    primitives: Vec<DrawPrimitive>,
    time_box: Rectangle,
}

impl Frame {
    pub fn new(primitives: Vec<DrawPrimitive>, time_box: Rectangle) -> Self {
        Self { primitives, time_box }
    }

    pub fn primitives(&self) -> &[DrawPrimitive] {
        &self.primitives
    }

    /// Box of the drawn time string, used to hit test the next taps
    pub fn time_box(&self) -> Rectangle {
        self.time_box
    }

    pub fn text(&self, role: TextRole) -> Option<&TextPrimitive> {
        self.primitives.iter().find_map(|p| match p {
            DrawPrimitive::Text(t) if t.role == role => Some(t),
            _ => None,
        })
    }

    pub fn background_color(&self) -> Option<Rgb888> {
        self.primitives.iter().find_map(|p| match p {
            DrawPrimitive::Fill { color } => Some(*color),
            _ => None,
        })
    }

    pub fn has_image(&self) -> bool {
        self.primitives.iter().any(|p| matches!(p, DrawPrimitive::Image { .. }))
    }

    /// The second hand as (start, end, color), absent in ambient
    pub fn second_hand(&self) -> Option<(Point, Point, Rgb888)> {
        self.primitives.iter().find_map(|p| match p {
            DrawPrimitive::Line { start, end, color, .. } => Some((*start, *end, *color)),
            _ => None,
        })
    }
}
