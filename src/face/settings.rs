/*
 *  face/settings.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Resolved face settings - the variants as flags on one engine
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

use serde::{Deserialize, Serialize};

use crate::constants::{CHIME_TONE_VOLUME, DEFAULT_OFFSET_BOUND};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Flat color fill
    #[default]
    Solid,
    /// Scaled image over the fill, grayscale in ambient
    Image,
}

/// Settings the engine is built with, fixed for the surface's lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct FaceSettings {
    /// Burn-in offsets stay strictly inside ±bound
    pub offset_bound: i32,
    pub background: BackgroundKind,
    /// Silent mode also mutes the notification channel
    pub audio_silent_mode: bool,
    pub chime: bool,
    pub tone_volume: f32,
    pub rng_seed: Option<u64>,
    pub width: u32,
    pub height: u32,
}

impl Default for FaceSettings {
    fn default() -> Self {
        Self {
            offset_bound: DEFAULT_OFFSET_BOUND,
            background: BackgroundKind::Solid,
            audio_silent_mode: true,
            chime: true,
            tone_volume: CHIME_TONE_VOLUME,
            rng_seed: None,
            width: 454,
            height: 454,
        }
    }
}
