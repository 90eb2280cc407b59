/*
 *  face/scheduler.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Redraw scheduler - 1 Hz heartbeat and redraw coalescing
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

use crate::face::clock::FaceTime;

/// Timer work for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Deliver `FaceEvent::Heartbeat { token }` after `delay_ms`
    Arm { token: u64, delay_ms: i64 },
    /// Drop the pending callback carrying `token`
    Cancel { token: u64 },
}

/// One-shot cancellable heartbeat.
///
/// Every arm bumps the generation and the host echoes it back as the
/// token; a callback carrying any other token was cancelled or superseded
/// and is dropped. At most one callback is ever armed.
#[derive(Debug, Default)]
pub struct Heartbeat {
    armed: bool,
    generation: u64,
    deadline: Option<i64>,
}

impl Heartbeat {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    /// `None` when a callback is already pending
    pub fn arm(&mut self, now: &FaceTime, delay_ms: i64) -> Option<TimerCommand> {
        if self.armed {
            return None;
        }
        self.armed = true;
        self.generation += 1;
        self.deadline = Some(now.millis() + delay_ms);
        Some(TimerCommand::Arm { token: self.generation, delay_ms })
    }

    pub fn cancel(&mut self) -> Option<TimerCommand> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        self.deadline = None;
        Some(TimerCommand::Cancel { token: self.generation })
    }

    /// Accept a callback; false for stale or cancelled tokens
    pub fn fire(&mut self, token: u64) -> bool {
        if !self.armed || token != self.generation {
            log::debug!("Dropping stale heartbeat {} (current {})", token, self.generation);
            return false;
        }
        self.armed = false;
        self.deadline = None;
        true
    }
}

/// Redraw scheduler
///
/// Merges the heartbeat and host triggers into redraw requests. A request
/// stays pending until the next frame starts, so any number of triggers in
/// between cost one render pass. The host may drop a request without
/// drawing; a request still unanswered a full beat later is issued again.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    heartbeat: Heartbeat,
    pending: bool,
    unanswered_beats: u32,
    coalesced: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heartbeat(&self) -> &Heartbeat {
        &self.heartbeat
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Triggers absorbed by an already pending request
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Returns true when the host must be asked for a render pass
    pub fn request_redraw(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            return false;
        }
        self.pending = true;
        true
    }

    /// Ask again even if a request is believed pending
    pub fn force_redraw(&mut self) -> bool {
        self.pending = true;
        self.unanswered_beats = 0;
        true
    }

    /// Forget a pending request the host will never answer
    pub fn discard_pending(&mut self) {
        self.pending = false;
        self.unanswered_beats = 0;
    }

    pub fn frame_started(&mut self) {
        self.pending = false;
        self.unanswered_beats = 0;
    }

    /// Bring the heartbeat in line with whether it should run. Starting
    /// fires straight away; an armed heartbeat is left alone.
    pub fn sync_heartbeat(&mut self, wanted: bool, now: &FaceTime) -> Option<TimerCommand> {
        if wanted {
            self.heartbeat.arm(now, 0)
        } else {
            self.heartbeat.cancel()
        }
    }

    /// Handle a heartbeat callback: returns whether to ask for a redraw
    /// and the re-arm command aligned to the next whole second.
    pub fn on_heartbeat(&mut self, token: u64, wanted: bool, now: &FaceTime) -> (bool, Option<TimerCommand>) {
        if !self.heartbeat.fire(token) {
            return (false, None);
        }
        let redraw = if self.pending && self.unanswered_beats > 0 {
            log::debug!("Redraw unanswered for {} beats, asking again", self.unanswered_beats);
            self.force_redraw()
        } else {
            self.request_redraw()
        };
        if self.pending {
            self.unanswered_beats += 1;
        }
        let timer = if wanted {
            self.heartbeat.arm(now, now.millis_to_next_second())
        } else {
            None
        };
        (redraw, timer)
    }

    pub fn shutdown(&mut self) -> Option<TimerCommand> {
        self.discard_pending();
        self.heartbeat.cancel()
    }
}
