/*
 *  face/renderer.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame renderer - composes background, text and the second hand
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
use log::warn;

use crate::constants::{
    HAND_STROKE_WIDTH, SECOND_HAND_PULSE_SECS, TEXT_ALPHA_OPAQUE, TEXT_ALPHA_OVER_IMAGE,
};
use crate::face::background::BackgroundArt;
use crate::face::battery::BatteryReading;
use crate::face::burn_in::BurnInOffset;
use crate::face::clock::{DateFormat, FaceText, FaceTime};
use crate::face::color::Palette;
use crate::face::layout::{FaceLayout, MonoMetrics, TextMetrics};
use crate::face::primitives::{DrawPrimitive, Frame, TextPrimitive, TextRole};
use crate::face::settings::BackgroundKind;
use crate::face::DisplayMode;

/// Everything a frame depends on
#[derive(Debug, Clone)]
pub struct FrameInputs {
    pub mode: DisplayMode,
    pub silent: bool,
    /// Off in ambient
    pub anti_alias: bool,
    pub date_format: DateFormat,
    pub offset: BurnInOffset,
    pub battery: Option<BatteryReading>,
    /// Battery text as sampled, "--%" before the first reading
    pub battery_text: FaceText,
    pub now: FaceTime,
}

/// Frame renderer
///
/// `compose` is a pure function of its inputs and the current geometry:
/// the same inputs always give the same primitives.
pub struct FrameRenderer<M: TextMetrics = MonoMetrics> {
    layout: FaceLayout,
    background: BackgroundKind,
    art: Option<BackgroundArt>,
    metrics: M,
}

impl FrameRenderer<MonoMetrics> {
    pub fn new(width: u32, height: u32, background: BackgroundKind) -> Self {
        Self::with_metrics(width, height, background, MonoMetrics::default())
    }
}

impl<M: TextMetrics> FrameRenderer<M> {
    pub fn with_metrics(width: u32, height: u32, background: BackgroundKind, metrics: M) -> Self {
        Self {
            layout: FaceLayout::for_surface(width, height),
            background,
            art: None,
            metrics,
        }
    }

    pub fn layout(&self) -> &FaceLayout {
        &self.layout
    }

    /// Install the art for the image face, scaled to the current width.
    /// Art that cannot be scaled is left out and the solid fill stays.
    pub fn set_background(&mut self, mut art: BackgroundArt) {
        match art.resize(self.layout.width) {
            Ok(()) => self.art = Some(art),
            Err(e) => warn!("Background not usable at {} px wide: {}", self.layout.width, e),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.layout = FaceLayout::for_surface(width, height);
        if let Some(art) = self.art.as_mut() {
            if let Err(e) = art.resize(width) {
                warn!("Background kept at its previous size: {}", e);
            }
        }
    }

    /// Whether the image face is in effect; without an image it falls
    /// back to the solid fill
    fn image_face(&self) -> bool {
        self.background == BackgroundKind::Image && self.art.is_some()
    }

    pub fn compose(&self, inputs: &FrameInputs) -> Frame {
        let ambient = inputs.mode.is_ambient();
        let anti_alias = inputs.anti_alias;
        let battery_low = inputs.battery.is_some_and(|b| b.is_low);
        let palette = Palette::for_state(inputs.mode, inputs.silent, battery_low);
        let alpha = if self.image_face() { TEXT_ALPHA_OVER_IMAGE } else { TEXT_ALPHA_OPAQUE };
        let center = self.layout.center;
        let offset = inputs.offset.as_point();

        let mut primitives = Vec::with_capacity(6);

        // 1. background
        primitives.push(DrawPrimitive::Fill { color: palette.background });
        if let Some(art) = self.art.as_ref().filter(|_| self.image_face()) {
            primitives.push(DrawPrimitive::Image {
                image: art.for_mode(ambient),
                top_left: Point::zero(),
            });
        }

        // 2. time, centred on the face
        let time_text = inputs.now.time_text();
        let time_size = self.metrics.measure(&time_text, self.layout.time_size);
        let time_h = time_size.height as i32;
        let time_origin = Point::new(
            center.x - time_size.width as i32 / 2,
            center.y + time_h / 2,
        ) + offset;
        let time_box = baseline_box(time_origin, time_size);
        primitives.push(DrawPrimitive::Text(TextPrimitive {
            role: TextRole::Time,
            text: time_text,
            origin: time_origin,
            bounds: time_box,
            size_px: self.layout.time_size,
            color: palette.status_text,
            alpha,
            anti_alias,
        }));

        // 3. date above the time
        let date_text = inputs.now.date_text(inputs.date_format);
        let date_size = self.metrics.measure(&date_text, self.layout.date_size);
        let date_origin = Point::new(
            center.x - date_size.width as i32 / 2,
            center.y - (time_h / 2 + date_size.height as i32 / 2),
        ) + offset;
        primitives.push(DrawPrimitive::Text(TextPrimitive {
            role: TextRole::Date,
            text: date_text,
            origin: date_origin,
            bounds: baseline_box(date_origin, date_size),
            size_px: self.layout.date_size,
            color: palette.text,
            alpha,
            anti_alias,
        }));

        // 4. battery below the time, larger when low
        let battery_px = if battery_low && !inputs.silent {
            self.layout.battery_low_size
        } else {
            self.layout.battery_size
        };
        let battery_size = self.metrics.measure(&inputs.battery_text, battery_px);
        let battery_origin = Point::new(
            center.x - battery_size.width as i32 / 2,
            center.y + time_h / 2 + battery_size.height as i32 + self.layout.battery_gap,
        ) + offset;
        primitives.push(DrawPrimitive::Text(TextPrimitive {
            role: TextRole::Battery,
            text: inputs.battery_text,
            origin: battery_origin,
            bounds: baseline_box(battery_origin, battery_size),
            size_px: battery_px,
            color: palette.status_text,
            alpha,
            anti_alias,
        }));

        // 5. second hand
        if !ambient {
            let (start, end) = self.second_hand(inputs.now.fractional_seconds());
            let color = if inputs.now.second() % SECOND_HAND_PULSE_SECS == 0 {
                palette.hand_pulse
            } else {
                palette.hand
            };
            primitives.push(DrawPrimitive::Line {
                start,
                end,
                color,
                stroke_width: HAND_STROKE_WIDTH,
                anti_alias,
            });
        }

        Frame::new(primitives, time_box)
    }

    /// Outer segment of the radius, rotated `seconds * 6 + 180` degrees
    /// clockwise from straight down, so zero seconds points at twelve.
    fn second_hand(&self, seconds: f32) -> (Point, Point) {
        let angle = (seconds * 6.0 + 180.0).to_radians();
        let (sin, cos) = angle.sin_cos();
        let center = self.layout.center;
        let at = |distance: f32| {
            Point::new(
                center.x + (-distance * sin).round() as i32,
                center.y + (distance * cos).round() as i32,
            )
        };
        (at(self.layout.hand_inner_radius()), at(self.layout.radius()))
    }
}

/// Box for text whose baseline starts at `origin`
fn baseline_box(origin: Point, size: Size) -> Rectangle {
    Rectangle::new(Point::new(origin.x, origin.y - size.height as i32), size)
}
