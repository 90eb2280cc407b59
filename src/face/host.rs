/*
 *  face/host.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Platform services the engine calls out to
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

use crate::face::chime::Waveform;
use crate::face::error::HostError;

/// Usage hint passed along with a vibration. The hourly chime is the
/// only vibration the face makes and it goes out as an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationUsage {
    Alarm,
}

/// Platform services the engine reaches synchronously.
///
/// Every call is best effort: implementations must not block on I/O and
/// may fail freely. The engine logs a failure, keeps its last known state
/// and never retries. Redraw requests, heartbeat timers and frame drawing
/// are not part of this trait; they come back from
/// [`FaceEngine::step`](crate::face::FaceEngine::step) as instructions.
pub trait FaceHost {
    /// Current charge, 0..=100
    fn battery_percentage(&mut self) -> Result<u8, HostError>;

    fn vibrate(&mut self, waveform: &Waveform, usage: VibrationUsage) -> Result<(), HostError>;

    /// Play the short confirmation tone, volume 0.0..=1.0
    fn play_tone(&mut self, volume: f32) -> Result<(), HostError>;

    fn set_notification_muted(&mut self, muted: bool) -> Result<(), HostError>;
}

impl<H: FaceHost + ?Sized> FaceHost for Box<H> {
    fn battery_percentage(&mut self) -> Result<u8, HostError> {
        (**self).battery_percentage()
    }

    fn vibrate(&mut self, waveform: &Waveform, usage: VibrationUsage) -> Result<(), HostError> {
        (**self).vibrate(waveform, usage)
    }

    fn play_tone(&mut self, volume: f32) -> Result<(), HostError> {
        (**self).play_tone(volume)
    }

    fn set_notification_muted(&mut self, muted: bool) -> Result<(), HostError> {
        (**self).set_notification_muted(muted)
    }
}
