/*
 *  face/chime.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Hourly chime - vibration waveform counting out the hour
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

use crate::constants::{
    CHIME_PREFIX, CHIME_PULSE_AMPLITUDE, CHIME_PULSE_OFF_MS, CHIME_PULSE_ON_MS,
    CHIME_PULSE_PAIRS, CHIME_WAVEFORM_LEN,
};
use crate::face::clock::FaceTime;

/// One waveform step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pulse {
    pub duration_ms: u32,
    pub amplitude: u8,
}

impl Pulse {
    pub const fn new(duration_ms: u32, amplitude: u8) -> Self {
        Self { duration_ms, amplitude }
    }

    pub fn is_audible(&self) -> bool {
        self.amplitude > 0
    }
}

/// Fixed length vibration waveform: the alert prefix followed by twelve
/// on/off pairs. Pair `k` (1 based) is felt only when `k <= hour12`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    pulses: [Pulse; CHIME_WAVEFORM_LEN],
}

impl Waveform {
    /// Waveform for an hour on the 12 hour dial (clamped to 1..=12)
    pub fn for_hour(hour12: u32) -> Self {
        let hour12 = hour12.clamp(1, CHIME_PULSE_PAIRS as u32);
        let mut pulses = [Pulse::default(); CHIME_WAVEFORM_LEN];

        for (slot, &(duration_ms, amplitude)) in pulses.iter_mut().zip(CHIME_PREFIX.iter()) {
            *slot = Pulse::new(duration_ms, amplitude);
        }

        let prefix = CHIME_PREFIX.len();
        for i in prefix..CHIME_WAVEFORM_LEN {
            // odd slots open a pair, even slots close it
            let pair = (i / 2) as u32;
            pulses[i] = if i % 2 == 1 {
                let amplitude = if pair <= hour12 { CHIME_PULSE_AMPLITUDE } else { 0 };
                Pulse::new(CHIME_PULSE_ON_MS, amplitude)
            } else {
                Pulse::new(CHIME_PULSE_OFF_MS, 0)
            };
        }

        Self { pulses }
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// The twelve hour-counting pairs, skipping the prefix
    pub fn hour_pulses(&self) -> &[Pulse] {
        &self.pulses[CHIME_PREFIX.len()..]
    }

    /// Number of felt pulses among the hour pairs
    pub fn audible_count(&self) -> usize {
        self.hour_pulses().iter().filter(|p| p.is_audible()).count()
    }

    pub fn timings(&self) -> Vec<u32> {
        self.pulses.iter().map(|p| p.duration_ms).collect()
    }

    pub fn amplitudes(&self) -> Vec<u8> {
        self.pulses.iter().map(|p| p.amplitude).collect()
    }

    pub fn total_duration_ms(&self) -> u32 {
        self.pulses.iter().map(|p| p.duration_ms).sum()
    }
}

/// A chime ready to hand to the actuators
#[derive(Debug, Clone, PartialEq)]
pub struct Chime {
    pub hour12: u32,
    pub waveform: Waveform,
}

/// Tracks the last hour chimed so each hour fires once.
///
/// Firing needs both a new hour and minute zero; waking up or starting
/// at twenty past does not chime for an hour already under way.
#[derive(Debug, Default)]
pub struct HourlyChime {
    marker: Option<u32>,
}

impl HourlyChime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(&self) -> Option<u32> {
        self.marker
    }

    pub fn check(&mut self, now: &FaceTime) -> Option<Chime> {
        let hour = now.hour();
        if self.marker == Some(hour) || now.minute() != 0 {
            return None;
        }
        self.marker = Some(hour);
        let hour12 = now.hour12();
        log::info!("Hourly chime for {} o'clock", hour12);
        Some(Chime {
            hour12,
            waveform: Waveform::for_hour(hour12),
        })
    }
}
