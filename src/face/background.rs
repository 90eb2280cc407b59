/*
 *  face/background.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Background image - PNG/SVG loading, scaling and the ambient gray copy
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

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use log::debug;
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};
use usvg::{Options, Tree};

use crate::constants::MAX_IMAGE_PIXELS;
use crate::face::color::to_gray;
use crate::face::error::FaceError;

/// Pixel count of a `width` x `height` image, refused past the size cap
fn pixel_count(width: u32, height: u32) -> Result<usize, FaceError> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|&n| n <= MAX_IMAGE_PIXELS)
        .ok_or(FaceError::ImageTooLarge { width, height })
}

/// Plain owned RGB image, row major
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl RgbImage {
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb888>) -> Result<Self, FaceError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(FaceError::SizeMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn filled(width: u32, height: u32, color: Rgb888) -> Result<Self, FaceError> {
        let count = pixel_count(width, height)?;
        Ok(Self { width, height, pixels: vec![color; count] })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn as_slice(&self) -> &[Rgb888] { &self.pixels }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Pixels positioned with their top left corner at `top_left`
    pub fn pixels_at(&self, top_left: Point) -> impl Iterator<Item = Pixel<Rgb888>> + '_ {
        let w = self.width.max(1) as usize;
        self.pixels.iter().enumerate().map(move |(i, &c)| {
            Pixel(top_left + Point::new((i % w) as i32, (i / w) as i32), c)
        })
    }

    /// Opaque RGBA copy for tiny-skia
    pub fn to_pixmap(&self) -> Result<Pixmap, FaceError> {
        let size = IntSize::from_wh(self.width, self.height).ok_or_else(|| {
            FaceError::InvalidImage(format!("{}x{} has no area", self.width, self.height))
        })?;
        let data = self.pixels.iter().flat_map(|c| [c.r(), c.g(), c.b(), u8::MAX]).collect();
        Pixmap::from_vec(data, size).ok_or(FaceError::ImageTooLarge {
            width: self.width,
            height: self.height,
        })
    }

    /// Flatten a rendered pixmap. Premultiplied channels are the color over
    /// black, so transparent areas come out black.
    pub fn from_pixmap(pixmap: &Pixmap) -> Result<Self, FaceError> {
        let pixels = pixmap
            .pixels()
            .iter()
            .map(|p| Rgb888::new(p.red(), p.green(), p.blue()))
            .collect();
        Self::new(pixmap.width(), pixmap.height(), pixels)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), FaceError> {
        self.to_pixmap()?
            .save_png(path)
            .map_err(|e| FaceError::Encode(format!("{}: {:?}", path.display(), e)))
    }

    pub fn grayscale(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| to_gray(c)).collect(),
        }
    }
}

/// Decoded art, kept at its own resolution; vectors are re-rendered on
/// every resize
enum ArtSource {
    Raster(Pixmap),
    Vector(Tree),
}

impl ArtSource {
    fn size(&self) -> (f32, f32) {
        match self {
            ArtSource::Raster(pixmap) => (pixmap.width() as f32, pixmap.height() as f32),
            ArtSource::Vector(tree) => (tree.size().width(), tree.size().height()),
        }
    }

    /// Stretch onto a fresh `width` x `height` pixmap
    fn render(&self, width: u32, height: u32) -> Result<Pixmap, FaceError> {
        pixel_count(width, height)?;
        let mut target = Pixmap::new(width, height).ok_or_else(|| {
            FaceError::InvalidImage(format!("cannot render at {}x{}", width, height))
        })?;

        let (w, h) = self.size();
        let transform = Transform::from_scale(width as f32 / w, height as f32 / h);
        match self {
            ArtSource::Raster(pixmap) => {
                let paint = PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() };
                target.draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, None);
            }
            ArtSource::Vector(tree) => resvg::render(tree, transform, &mut target.as_mut()),
        }
        Ok(target)
    }
}

impl fmt::Debug for ArtSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.size();
        match self {
            ArtSource::Raster(_) => write!(f, "Raster({}x{})", w, h),
            ArtSource::Vector(_) => write!(f, "Vector({}x{})", w, h),
        }
    }
}

/// Background art for the image face: the decoded source plus copies
/// scaled to the surface width, in color for interactive and gray for
/// ambient.
#[derive(Debug, Clone)]
pub struct BackgroundArt {
    source: Arc<ArtSource>,
    color: Arc<RgbImage>,
    gray: Arc<RgbImage>,
}

impl BackgroundArt {
    /// PNG, or SVG when the extension says so
    pub fn load(path: &Path) -> Result<Self, FaceError> {
        let bytes = fs::read(path)?;
        let vector = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"));
        if vector { Self::from_svg(&bytes) } else { Self::from_png(&bytes) }
    }

    pub fn from_png(bytes: &[u8]) -> Result<Self, FaceError> {
        let pixmap = Pixmap::decode_png(bytes)
            .map_err(|e| FaceError::InvalidImage(format!("PNG decode failed: {:?}", e)))?;
        pixel_count(pixmap.width(), pixmap.height())?;
        Ok(Self::with_source(ArtSource::Raster(pixmap)))
    }

    pub fn from_svg(bytes: &[u8]) -> Result<Self, FaceError> {
        let tree = Tree::from_data(bytes, &Options::default())
            .map_err(|e| FaceError::InvalidImage(format!("SVG parse failed: {:?}", e)))?;
        Ok(Self::with_source(ArtSource::Vector(tree)))
    }

    pub fn from_image(image: &RgbImage) -> Result<Self, FaceError> {
        Ok(Self::with_source(ArtSource::Raster(image.to_pixmap()?)))
    }

    fn with_source(source: ArtSource) -> Self {
        let blank = Arc::new(RgbImage::default());
        Self { source: Arc::new(source), color: Arc::clone(&blank), gray: blank }
    }

    /// Size of the art before scaling
    pub fn source_size(&self) -> (u32, u32) {
        let (w, h) = self.source.size();
        (w.round() as u32, h.round() as u32)
    }

    /// Scale to the surface width keeping the aspect ratio. On failure the
    /// previous copies stay in use.
    pub fn resize(&mut self, surface_width: u32) -> Result<(), FaceError> {
        let (w, h) = self.source.size();
        // float to int saturates, oversized results are caught by the render
        let height = (h * surface_width as f32 / w).round() as u32;
        let scaled = RgbImage::from_pixmap(&self.source.render(surface_width, height)?)?;
        debug!("Background {:?} scaled to {}x{}", self.source, scaled.width(), scaled.height());
        self.gray = Arc::new(scaled.grayscale());
        self.color = Arc::new(scaled);
        Ok(())
    }

    pub fn for_mode(&self, ambient: bool) -> Arc<RgbImage> {
        if ambient { Arc::clone(&self.gray) } else { Arc::clone(&self.color) }
    }
}
