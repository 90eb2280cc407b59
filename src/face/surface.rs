/*
 *  face/surface.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame surface - rasterizes composed frames into an RGB framebuffer
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

use core::convert::Infallible;
use std::path::Path;

use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::mono_font::{
    MonoFont, MonoTextStyle,
    ascii::{FONT_6X10, FONT_7X13, FONT_9X15, FONT_10X20},
};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::face::background::RgbImage;
use crate::face::color::blend;
use crate::face::error::FaceError;
use crate::face::primitives::{DrawPrimitive, Frame, TextPrimitive};

/// Runtime sized RGB framebuffer.
///
/// Rasterizes frames with the bitmap fonts closest to each text size.
/// Anti-aliasing flags are carried by the frame for hosts that can honour
/// them and ignored here.
#[derive(Debug, Clone)]
pub struct FrameSurface {
    buf: Vec<Rgb888>,
    w: usize,
    h: usize,
}

impl FrameSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![Rgb888::BLACK; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }
    pub fn as_slice(&self) -> &[Rgb888] { &self.buf }

    pub fn clear_color(&mut self, color: Rgb888) {
        self.buf.fill(color);
    }

    /// Resize, dropping the previous contents
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width as usize, height as usize) != (self.w, self.h) {
            *self = Self::new(width, height);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    pub fn count_pixels(&self, color: Rgb888) -> usize {
        self.buf.iter().filter(|&&c| c == color).count()
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }

    /// Draw every primitive of `frame` in order
    pub fn paint(&mut self, frame: &Frame) -> Result<(), FaceError> {
        // text alpha is blended against the fill, images included
        let under = frame.background_color().unwrap_or(Rgb888::BLACK);
        for primitive in frame.primitives() {
            match primitive {
                DrawPrimitive::Fill { color } => self.clear_color(*color),
                DrawPrimitive::Image { image, top_left } => {
                    self.draw_iter(image.pixels_at(*top_left)).map_err(never)?;
                }
                DrawPrimitive::Text(text) => self.paint_text(text, under)?,
                DrawPrimitive::Line { start, end, color, stroke_width, .. } => {
                    Line::new(*start, *end)
                        .into_styled(PrimitiveStyle::with_stroke(*color, *stroke_width))
                        .draw(self)
                        .map_err(never)?;
                }
            }
        }
        Ok(())
    }

    fn paint_text(&mut self, text: &TextPrimitive, under: Rgb888) -> Result<(), FaceError> {
        let color = blend(text.color, under, text.alpha);
        let style = MonoTextStyle::new(font_for(text.size_px), color);
        let placement = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Alphabetic)
            .build();
        let at = Point::new(text.bounds.center().x, text.origin.y);
        Text::with_text_style(text.text.as_str(), at, style, placement)
            .draw(self)
            .map_err(never)?;
        Ok(())
    }

    pub fn to_image(&self) -> Result<RgbImage, FaceError> {
        RgbImage::new(self.w as u32, self.h as u32, self.buf.clone())
    }

    pub fn save_png(&self, path: &Path) -> Result<(), FaceError> {
        self.to_image()?.save_png(path)?;
        log::info!("Snapshot written to {}", path.display());
        Ok(())
    }
}

fn never(e: Infallible) -> FaceError {
    match e {}
}

/// Largest bitmap font that fits the requested pixel size
fn font_for(size_px: u32) -> &'static MonoFont<'static> {
    match size_px {
        0..=12 => &FONT_6X10,
        13..=14 => &FONT_7X13,
        15..=19 => &FONT_9X15,
        _ => &FONT_10X20,
    }
}

impl OriginDimensions for FrameSurface {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for FrameSurface {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = clipped.bottom_right() {
            for y in clipped.top_left.y..=bottom_right.y {
                let row = y as usize * self.w;
                let (x0, x1) = (clipped.top_left.x as usize, bottom_right.x as usize);
                self.buf[row + x0..=row + x1].fill(color);
            }
        }
        Ok(())
    }
}
