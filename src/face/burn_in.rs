/*
 *  face/burn_in.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Anti burn-in pixel offset generator
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

use embedded_graphics::prelude::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::OFFSET_REFRESH_FRAMES;

/// Positional jitter applied to every text item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BurnInOffset {
    pub dx: i32,
    pub dy: i32,
}

impl BurnInOffset {
    pub fn as_point(&self) -> Point {
        Point::new(self.dx, self.dy)
    }
}

/// Re-samples the offset every `OFFSET_REFRESH_FRAMES` frames, or on every
/// frame while ambient. Each axis is drawn independently from `(-bound, bound)`.
pub struct OffsetGenerator {
    rng: StdRng,
    bound: i32,
    counter: u32,
    offset: BurnInOffset,
}

impl OffsetGenerator {
    /// `seed` makes the jitter sequence reproducible
    pub fn new(bound: i32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            rng,
            bound: bound.max(1),
            counter: 0,
            offset: BurnInOffset::default(),
        }
    }

    pub fn bound(&self) -> i32 {
        self.bound
    }

    pub fn offset(&self) -> BurnInOffset {
        self.offset
    }

    /// Count one frame; returns the offset to draw with and whether it is fresh
    pub fn advance(&mut self, ambient: bool) -> (BurnInOffset, bool) {
        self.counter += 1;
        if self.counter >= OFFSET_REFRESH_FRAMES || ambient {
            self.counter = 0;
            self.offset = BurnInOffset {
                dx: self.sample_axis(),
                dy: self.sample_axis(),
            };
            log::debug!("Burn-in offset now ({}, {})", self.offset.dx, self.offset.dy);
            return (self.offset, true);
        }
        (self.offset, false)
    }

    fn sample_axis(&mut self) -> i32 {
        let magnitude = self.rng.random_range(0..self.bound);
        if self.rng.random_bool(0.5) { -magnitude } else { magnitude }
    }
}
