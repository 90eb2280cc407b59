/*
 *  face/battery.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Battery sampler - throttles battery queries to the frame cadence
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

use std::fmt::Write;

use crate::constants::{BATTERY_SAMPLE_FRAMES, LOW_BATTERY_THRESHOLD};
use crate::face::clock::FaceText;
use crate::face::host::FaceHost;

/// Shown until the first successful query
const UNKNOWN_BATTERY_TEXT: &str = "--%";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    pub percentage: u8,
    pub is_low: bool,
}

impl BatteryReading {
    pub fn new(percentage: u8) -> Self {
        let percentage = percentage.min(100);
        Self {
            percentage,
            is_low: percentage < LOW_BATTERY_THRESHOLD,
        }
    }

    pub fn text(&self) -> FaceText {
        let mut text = FaceText::new();
        // at most "100%"
        let _ = write!(text, "{}%", self.percentage);
        text
    }
}

/// Battery sampler
///
/// Queries the host every `BATTERY_SAMPLE_FRAMES` frames, or on every
/// frame while ambient. A failed query keeps the previous reading.
#[derive(Debug)]
pub struct BatterySampler {
    counter: u32,
    last: Option<BatteryReading>,
}

impl Default for BatterySampler {
    fn default() -> Self {
        Self {
            // first frame always samples
            counter: BATTERY_SAMPLE_FRAMES,
            last: None,
        }
    }
}

impl BatterySampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reading(&self) -> Option<BatteryReading> {
        self.last
    }

    pub fn is_due(&self, ambient: bool) -> bool {
        ambient || self.counter >= BATTERY_SAMPLE_FRAMES
    }

    /// Make the next frame sample, used on wake from ambient
    pub fn force_resample(&mut self) {
        self.counter = BATTERY_SAMPLE_FRAMES;
    }

    /// Count one frame, querying the host when due
    pub fn advance<H: FaceHost + ?Sized>(&mut self, host: &mut H, ambient: bool) -> Option<BatteryReading> {
        if self.is_due(ambient) {
            match host.battery_percentage() {
                Ok(percentage) => {
                    let reading = BatteryReading::new(percentage);
                    log::debug!("Battery sampled at {}% (low: {})", reading.percentage, reading.is_low);
                    self.last = Some(reading);
                }
                Err(e) => log::warn!("{}; keeping last reading", e),
            }
            self.counter = 0;
        }
        self.counter += 1;
        self.last
    }

    pub fn text(&self) -> FaceText {
        match self.last {
            Some(reading) => reading.text(),
            None => {
                let mut text = FaceText::new();
                text.push_str(UNKNOWN_BATTERY_TEXT);
                text
            }
        }
    }
}
