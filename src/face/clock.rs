/*
 *  face/clock.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wall clock snapshot and the face's time/date text formats
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

use arrayvec::ArrayString;
use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use std::fmt::Write;

use crate::constants::HEARTBEAT_INTERVAL_MS;

/// Stack string holding any of the face's text items.
pub type FaceText = ArrayString<24>;

const TIME_FORMAT: &str = "%I:%M";
const CLEAN_DATE_FORMAT: &str = "%a %d %b";
const STANDARD_DATE_FORMAT: &str = "%d/%m/%Y";
const DIAGNOSTIC_FORMAT: &str = "%I:%M:%S %d/%m/%Y";

/// Date line format selected by tapping the time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Sun 18 Oct`
    #[default]
    Clean,
    /// `18/10/2026`
    Standard,
}

impl DateFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Clean => CLEAN_DATE_FORMAT,
            DateFormat::Standard => STANDARD_DATE_FORMAT,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DateFormat::Clean => DateFormat::Standard,
            DateFormat::Standard => DateFormat::Clean,
        }
    }
}

/// One reading of the host clock.
///
/// Carries both the absolute epoch milliseconds, used for tap windows,
/// deadlines and heartbeat alignment, and the local wall time in the
/// host's current timezone, used for everything that is displayed.
/// A timezone change only affects the next snapshot, so nothing that
/// was derived from an older one needs rolling back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceTime {
    millis: i64,
    local: NaiveDateTime,
}

impl FaceTime {
    /// Snapshot of the system clock in the system timezone
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            millis: dt.timestamp_millis(),
            local: dt.naive_local(),
        }
    }

    pub fn from_parts(millis: i64, local: NaiveDateTime) -> Self {
        Self { millis, local }
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    pub fn second(&self) -> u32 {
        self.local.second()
    }

    /// Hour on the 12 hour dial, 12 rather than 0
    pub fn hour12(&self) -> u32 {
        match self.local.hour() % 12 {
            0 => 12,
            h => h,
        }
    }

    /// Seconds into the current minute including the fraction, for the sweep
    pub fn fractional_seconds(&self) -> f32 {
        // leap seconds report nanos past 1e9
        let nanos = self.local.nanosecond().min(999_999_999);
        self.local.second() as f32 + nanos as f32 / 1_000_000_000.0
    }

    /// Delay that lands the next heartbeat on a whole second
    pub fn millis_to_next_second(&self) -> i64 {
        HEARTBEAT_INTERVAL_MS - self.millis.rem_euclid(HEARTBEAT_INTERVAL_MS)
    }

    /// The same clock `ms` milliseconds later
    pub fn advanced(&self, ms: i64) -> Self {
        Self {
            millis: self.millis + ms,
            local: self.local + TimeDelta::milliseconds(ms),
        }
    }

    /// `hh:mm` on a 12 hour clock, always zero padded
    pub fn time_text(&self) -> FaceText {
        self.format(TIME_FORMAT)
    }

    pub fn date_text(&self, format: DateFormat) -> FaceText {
        self.format(format.pattern())
    }

    /// Full timestamp logged on every frame
    pub fn diagnostic_text(&self) -> String {
        self.local.format(DIAGNOSTIC_FORMAT).to_string()
    }

    fn format(&self, pattern: &str) -> FaceText {
        let mut text = FaceText::new();
        if write!(text, "{}", self.local.format(pattern)).is_err() {
            log::warn!("Formatted '{}' overflowed {} bytes", pattern, text.capacity());
        }
        text
    }
}
