/*
 *  face/engine.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Face engine - event dispatch, per frame bookkeeping and host effects
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
use log::{debug, info, warn};

use crate::face::background::BackgroundArt;
use crate::face::battery::BatterySampler;
use crate::face::burn_in::OffsetGenerator;
use crate::face::chime::{Chime, HourlyChime};
use crate::face::clock::FaceTime;
use crate::face::host::{FaceHost, VibrationUsage};
use crate::face::mode::{ModeChange, ModeController};
use crate::face::primitives::Frame;
use crate::face::renderer::{FrameInputs, FrameRenderer};
use crate::face::scheduler::{RedrawScheduler, TimerCommand};
use crate::face::settings::FaceSettings;
use crate::face::tap::{DateFormatState, TapAction, TapInterpreter, TapKind};

/// Host callbacks, serialized into one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceEvent {
    Resize { width: u32, height: u32 },
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    TimeZoneChanged,
    /// Touch at surface coordinates. Hosts deliver taps as they happen, so
    /// the tap time is the `now` of the step that carries it.
    Tap { kind: TapKind, x: i32, y: i32 },
    /// Coarse host tick, about once a minute while ambient
    TimeTick,
    /// An armed heartbeat came due; `token` is the one from `TimerCommand::Arm`
    Heartbeat { token: u64 },
    /// The host is ready for a frame
    Draw,
    SurfaceDestroyed,
}

/// What the host must do after a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderInstruction {
    /// Ask the platform for a render pass (answered with `FaceEvent::Draw`)
    pub request_redraw: bool,
    pub timer: Option<TimerCommand>,
    /// Present only in answer to `FaceEvent::Draw`
    pub frame: Option<Frame>,
}

/// Everything that changes while the surface lives
#[derive(Default)]
struct EngineState {
    mode: ModeController,
    scheduler: RedrawScheduler,
    battery: BatterySampler,
    taps: TapInterpreter,
    date: DateFormatState,
    chime: HourlyChime,
    /// Time box of the last frame, tested by the next taps
    hit_box: Option<Rectangle>,
    timezone_receiver: bool,
    frames: u64,
    destroyed: bool,
}

/// Face engine
///
/// One instance per display surface. Events are processed to completion
/// one at a time; the engine never blocks and never fails. Platform
/// failures are logged and the last known values kept.
pub struct FaceEngine<H: FaceHost> {
    settings: FaceSettings,
    host: H,
    renderer: FrameRenderer,
    offsets: OffsetGenerator,
    state: EngineState,
}

impl<H: FaceHost> FaceEngine<H> {
    /// Surface created
    pub fn new(settings: FaceSettings, host: H) -> Self {
        info!(
            "Face created {}x{} ({:?} background, offset bound {})",
            settings.width, settings.height, settings.background, settings.offset_bound
        );
        Self {
            renderer: FrameRenderer::new(settings.width, settings.height, settings.background),
            offsets: OffsetGenerator::new(settings.offset_bound, settings.rng_seed),
            state: EngineState::default(),
            settings,
            host,
        }
    }

    /// Background for the image face
    pub fn with_background(mut self, art: BackgroundArt) -> Self {
        self.renderer.set_background(art);
        self
    }

    pub fn step(&mut self, event: FaceEvent, now: &FaceTime) -> RenderInstruction {
        let mut out = RenderInstruction::default();
        if self.state.destroyed {
            debug!("Surface gone, dropping {:?}", event);
            return out;
        }

        match event {
            FaceEvent::Resize { width, height } => {
                info!("Surface resized to {}x{}", width, height);
                self.settings.width = width;
                self.settings.height = height;
                self.renderer.resize(width, height);
                self.redraw(&mut out);
            }
            FaceEvent::VisibilityChanged(visible) => {
                if self.state.mode.set_visible(visible) {
                    self.set_timezone_receiver(visible);
                }
                if visible {
                    // requests made while hidden may have been dropped by the host
                    out.request_redraw = self.state.scheduler.force_redraw();
                } else {
                    self.state.scheduler.discard_pending();
                }
                out.timer = self.sync_heartbeat(now);
            }
            FaceEvent::AmbientModeChanged(in_ambient) => {
                match self.state.mode.set_ambient(in_ambient) {
                    ModeChange::Unchanged => {}
                    ModeChange::EnteredActive => {
                        self.state.battery.force_resample();
                        self.redraw(&mut out);
                    }
                    ModeChange::EnteredAmbient => self.redraw(&mut out),
                }
                out.timer = self.sync_heartbeat(now);
            }
            FaceEvent::TimeZoneChanged => {
                info!("Timezone changed");
                if self.state.mode.is_visible() {
                    self.redraw(&mut out);
                }
            }
            FaceEvent::Tap { kind, x, y } => self.on_tap(kind, Point::new(x, y), now, &mut out),
            FaceEvent::TimeTick => self.redraw(&mut out),
            FaceEvent::Heartbeat { token } => {
                let wanted = self.state.mode.heartbeat_wanted();
                let (redraw, timer) = self.state.scheduler.on_heartbeat(token, wanted, now);
                out.request_redraw = redraw;
                out.timer = timer;
            }
            FaceEvent::Draw => out.frame = Some(self.render(now)),
            FaceEvent::SurfaceDestroyed => {
                info!("Surface destroyed after {} frames", self.state.frames);
                out.timer = self.state.scheduler.shutdown();
                self.set_timezone_receiver(false);
                self.state.destroyed = true;
            }
        }
        out
    }

    fn redraw(&mut self, out: &mut RenderInstruction) {
        out.request_redraw |= self.state.scheduler.request_redraw();
    }

    fn sync_heartbeat(&mut self, now: &FaceTime) -> Option<TimerCommand> {
        let wanted = self.state.mode.heartbeat_wanted();
        self.state.scheduler.sync_heartbeat(wanted, now)
    }

    fn set_timezone_receiver(&mut self, registered: bool) {
        if self.state.timezone_receiver != registered {
            debug!("Timezone receiver {}", if registered { "registered" } else { "unregistered" });
            self.state.timezone_receiver = registered;
        }
    }

    fn on_tap(&mut self, kind: TapKind, at: Point, now: &FaceTime, out: &mut RenderInstruction) {
        let hit_box = self.state.hit_box;
        match self.state.taps.interpret(kind, at, hit_box.as_ref(), now.millis()) {
            TapAction::Ignored | TapAction::Recorded => {}
            TapAction::ToggleDateFormat => {
                self.state.date.toggle(now.millis());
                self.redraw(out);
            }
            TapAction::ToggleSilent => {
                let silent = self.state.mode.toggle_silent();
                if self.settings.audio_silent_mode {
                    if let Err(e) = self.host.set_notification_muted(silent) {
                        warn!("{}; notifications left as they were", e);
                    }
                }
                self.redraw(out);
            }
        }
    }

    fn render(&mut self, now: &FaceTime) -> Frame {
        let state = &mut self.state;
        state.scheduler.frame_started();
        state.frames += 1;
        debug!("Frame {} at {}", state.frames, now.diagnostic_text());

        state.date.expire(now.millis());
        let ambient = state.mode.is_ambient();
        let (offset, _) = self.offsets.advance(ambient);
        let battery = state.battery.advance(&mut self.host, ambient);

        if self.settings.chime {
            if let Some(chime) = state.chime.check(now) {
                sound_chime(&mut self.host, &chime, state.mode.is_silent(), self.settings.tone_volume);
            }
        }

        let inputs = FrameInputs {
            mode: state.mode.display_mode(),
            silent: state.mode.is_silent(),
            anti_alias: state.mode.anti_alias(),
            date_format: state.date.format(),
            offset,
            battery,
            battery_text: state.battery.text(),
            now: *now,
        };
        let frame = self.renderer.compose(&inputs);
        state.hit_box = Some(frame.time_box());
        frame
    }

    pub fn settings(&self) -> &FaceSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn mode(&self) -> &ModeController {
        &self.state.mode
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.state.scheduler
    }

    pub fn date_format(&self) -> &DateFormatState {
        &self.state.date
    }

    pub fn battery(&self) -> &BatterySampler {
        &self.state.battery
    }

    pub fn offsets(&self) -> &OffsetGenerator {
        &self.offsets
    }

    pub fn chime_marker(&self) -> Option<u32> {
        self.state.chime.marker()
    }

    pub fn hit_box(&self) -> Option<Rectangle> {
        self.state.hit_box
    }

    pub fn timezone_receiver_registered(&self) -> bool {
        self.state.timezone_receiver
    }

    pub fn frames_drawn(&self) -> u64 {
        self.state.frames
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.destroyed
    }
}

/// Hand the chime to the actuators; failures are logged and dropped
fn sound_chime<H: FaceHost + ?Sized>(host: &mut H, chime: &Chime, silent: bool, volume: f32) {
    if let Err(e) = host.vibrate(&chime.waveform, VibrationUsage::Alarm) {
        warn!("{}; chime for {} o'clock skipped", e, chime.hour12);
    }
    if !silent {
        if let Err(e) = host.play_tone(volume) {
            warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::clock::DateFormat;
    use crate::face::mock::MockHost;
    use crate::face::primitives::TextRole;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn at(h: u32, m: u32, s: u32, ms: i64) -> FaceTime {
        let dt = Utc.with_ymd_and_hms(2026, 10, 18, h, m, s).unwrap() + TimeDelta::milliseconds(ms);
        FaceTime::from_datetime(&dt)
    }

    fn settings() -> FaceSettings {
        FaceSettings { rng_seed: Some(7), ..FaceSettings::default() }
    }

    fn engine(host: &MockHost) -> FaceEngine<MockHost> {
        FaceEngine::new(settings(), host.clone())
    }

    fn armed_token(out: &RenderInstruction) -> u64 {
        match out.timer {
            Some(TimerCommand::Arm { token, .. }) => token,
            other => panic!("expected an armed heartbeat, got {:?}", other),
        }
    }

    #[test]
    fn test_visibility_starts_heartbeat() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 250);

        let out = face.step(FaceEvent::VisibilityChanged(true), &now);
        assert!(out.request_redraw);
        assert_eq!(out.timer, Some(TimerCommand::Arm { token: 1, delay_ms: 0 }));
        assert!(face.timezone_receiver_registered());

        // first beat realigns to the next whole second
        let out = face.step(FaceEvent::Heartbeat { token: 1 }, &now);
        assert!(!out.request_redraw, "already pending from the visibility change");
        assert_eq!(out.timer, Some(TimerCommand::Arm { token: 2, delay_ms: 750 }));
    }

    #[test]
    fn test_heartbeat_redraw_each_second() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let mut now = at(10, 9, 5, 0);
        let mut token = armed_token(&face.step(FaceEvent::VisibilityChanged(true), &now));

        for _ in 0..5 {
            let out = face.step(FaceEvent::Heartbeat { token }, &now);
            assert!(out.frame.is_none());
            token = armed_token(&out);
            assert!(face.step(FaceEvent::Draw, &now).frame.is_some());
            now = now.advanced(1000);
        }
        assert_eq!(face.frames_drawn(), 5);
    }

    #[test]
    fn test_hidden_cancels_heartbeat() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        let token = armed_token(&face.step(FaceEvent::VisibilityChanged(true), &now));

        let out = face.step(FaceEvent::VisibilityChanged(false), &now);
        assert_eq!(out.timer, Some(TimerCommand::Cancel { token }));
        assert!(!out.request_redraw);
        assert!(!face.timezone_receiver_registered());

        let out = face.step(FaceEvent::Heartbeat { token }, &now);
        assert_eq!(out, RenderInstruction::default());
    }

    #[test]
    fn test_ambient_cancels_and_active_resumes() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        let token = armed_token(&face.step(FaceEvent::VisibilityChanged(true), &now));
        face.step(FaceEvent::Draw, &now);
        let queries = host.state().battery_queries;

        let out = face.step(FaceEvent::AmbientModeChanged(true), &now);
        assert!(out.request_redraw);
        assert_eq!(out.timer, Some(TimerCommand::Cancel { token }));

        // the cancelled callback arriving late does nothing
        let out = face.step(FaceEvent::Heartbeat { token }, &now);
        assert!(!out.request_redraw);
        assert!(out.timer.is_none());
        assert!(!face.scheduler().heartbeat().is_armed());

        // repeated notification is not a change
        face.step(FaceEvent::Draw, &now);
        let out = face.step(FaceEvent::AmbientModeChanged(true), &now);
        assert!(!out.request_redraw);

        let out = face.step(FaceEvent::AmbientModeChanged(false), &now);
        assert!(out.request_redraw);
        let resumed = armed_token(&out);
        assert!(resumed > token);

        // entering active resamples the battery on the very next frame
        let before = host.state().battery_queries;
        face.step(FaceEvent::Draw, &now);
        assert_eq!(host.state().battery_queries, before + 1);
        assert!(before > queries);
    }

    #[test]
    fn test_redraw_requests_coalesce() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        face.step(FaceEvent::VisibilityChanged(true), &now);

        assert!(!face.step(FaceEvent::TimeTick, &now).request_redraw);
        assert!(!face.step(FaceEvent::TimeZoneChanged, &now).request_redraw);
        assert_eq!(face.scheduler().coalesced(), 2);

        face.step(FaceEvent::Draw, &now);
        assert!(face.step(FaceEvent::TimeTick, &now).request_redraw);
    }

    #[test]
    fn test_request_dropped_while_hidden_redraws_on_show() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);

        // the host ignores this one, the surface is not on screen
        assert!(face.step(FaceEvent::TimeTick, &now).request_redraw);

        let out = face.step(FaceEvent::VisibilityChanged(true), &now);
        assert!(out.request_redraw);
        let mut token = armed_token(&out);

        face.step(FaceEvent::Draw, &now);
        for _ in 0..3 {
            let out = face.step(FaceEvent::Heartbeat { token }, &now);
            assert!(out.request_redraw);
            token = armed_token(&out);
            face.step(FaceEvent::Draw, &now);
        }
    }

    #[test]
    fn test_heartbeat_reasks_when_redraw_dropped() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let mut now = at(10, 9, 5, 0);
        let mut token = armed_token(&face.step(FaceEvent::VisibilityChanged(true), &now));

        // no Draw ever arrives; the face must keep asking
        let mut asked = 0;
        for _ in 0..10 {
            let out = face.step(FaceEvent::Heartbeat { token }, &now);
            asked += out.request_redraw as usize;
            token = armed_token(&out);
            now = now.advanced(1000);
        }
        assert!(asked >= 9, "asked {}", asked);
    }

    #[test]
    fn test_hide_discards_pending_request() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        face.step(FaceEvent::VisibilityChanged(true), &now);
        face.step(FaceEvent::VisibilityChanged(false), &now);
        assert!(!face.scheduler().is_pending());
        assert!(face.step(FaceEvent::Resize { width: 400, height: 400 }, &now).request_redraw);
    }

    #[test]
    fn test_repeated_visible_notification_redraws() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        face.step(FaceEvent::VisibilityChanged(true), &now);
        face.step(FaceEvent::Draw, &now);

        let out = face.step(FaceEvent::VisibilityChanged(true), &now);
        assert!(out.request_redraw);
        // the heartbeat is already running
        assert!(out.timer.is_none());
    }

    #[test]
    fn test_timezone_change_while_hidden() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        assert!(!face.step(FaceEvent::TimeZoneChanged, &now).request_redraw);
    }

    #[test]
    fn test_tap_before_first_frame_is_a_miss() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        let out = face.step(FaceEvent::Tap { kind: TapKind::Primary, x: 227, y: 227 }, &now);
        assert!(!out.request_redraw);
        assert_eq!(face.date_format().format(), DateFormat::Clean);
    }

    #[test]
    fn test_double_tap_toggles_silent_and_mutes() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let t = at(10, 9, 5, 0);
        let miss = FaceEvent::Tap { kind: TapKind::Primary, x: 5, y: 5 };

        face.step(miss, &t);
        let out = face.step(miss, &t.advanced(999));
        assert!(out.request_redraw);
        assert!(face.mode().is_silent());
        assert_eq!(host.muted(), Some(true));

        // a third quick miss toggles back
        face.step(miss, &t.advanced(1500));
        assert!(!face.mode().is_silent());
        assert_eq!(host.state().mute_calls, vec![true, false]);
    }

    #[test]
    fn test_slow_taps_do_not_toggle() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let t = at(10, 9, 5, 0);
        let miss = FaceEvent::Tap { kind: TapKind::Primary, x: 5, y: 5 };
        face.step(miss, &t);
        face.step(miss, &t.advanced(1001));
        assert!(!face.mode().is_silent());
        assert!(host.state().mute_calls.is_empty());
    }

    #[test]
    fn test_non_primary_taps_ignored() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let t = at(10, 9, 5, 0);
        for kind in [TapKind::Cancel, TapKind::Other] {
            face.step(FaceEvent::Tap { kind, x: 5, y: 5 }, &t);
        }
        face.step(FaceEvent::Tap { kind: TapKind::Primary, x: 5, y: 5 }, &t.advanced(10));
        assert!(!face.mode().is_silent());
    }

    #[test]
    fn test_visual_only_silent_mode() {
        let host = MockHost::with_battery(80);
        let settings = FaceSettings { audio_silent_mode: false, ..settings() };
        let mut face = FaceEngine::new(settings, host.clone());
        let t = at(10, 9, 5, 0);
        let miss = FaceEvent::Tap { kind: TapKind::Primary, x: 5, y: 5 };
        face.step(miss, &t);
        face.step(miss, &t.advanced(100));
        assert!(face.mode().is_silent());
        assert!(host.state().mute_calls.is_empty());
    }

    #[test]
    fn test_mute_failure_still_toggles() {
        let host = MockHost::with_battery(80);
        host.state().simulate_mute_failure = true;
        let mut face = engine(&host);
        let t = at(10, 9, 5, 0);
        let miss = FaceEvent::Tap { kind: TapKind::Primary, x: 5, y: 5 };
        face.step(miss, &t);
        face.step(miss, &t.advanced(100));
        assert!(face.mode().is_silent());
    }

    #[test]
    fn test_tap_on_time_toggles_date_and_reverts() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let t = at(10, 9, 5, 0);
        face.step(FaceEvent::Draw, &t);
        let center = face.hit_box().unwrap().center();

        let out = face.step(FaceEvent::Tap { kind: TapKind::Primary, x: center.x, y: center.y }, &t);
        assert!(out.request_redraw);
        assert_eq!(face.date_format().format(), DateFormat::Standard);
        assert_eq!(face.date_format().revert_deadline(), Some(t.millis() + 60_000));
        // a hit leaves the double tap window alone
        face.step(FaceEvent::Tap { kind: TapKind::Primary, x: 1, y: 1 }, &t.advanced(10));
        assert!(!face.mode().is_silent());

        let frame = face.step(FaceEvent::Draw, &t.advanced(59_999)).frame.unwrap();
        assert_eq!(frame.text(TextRole::Date).unwrap().text.as_str(), "18/10/2026");
        let frame = face.step(FaceEvent::Draw, &t.advanced(60_000)).frame.unwrap();
        assert_eq!(frame.text(TextRole::Date).unwrap().text.as_str(), "Sun 18 Oct");
        assert_eq!(face.date_format().format(), DateFormat::Clean);
    }

    #[test]
    fn test_tap_on_box_edge_is_a_miss() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let t = at(10, 9, 5, 0);
        face.step(FaceEvent::Draw, &t);
        let corner = face.hit_box().unwrap().top_left;
        face.step(FaceEvent::Tap { kind: TapKind::Primary, x: corner.x, y: corner.y }, &t);
        assert_eq!(face.date_format().format(), DateFormat::Clean);
    }

    #[test]
    fn test_hourly_chime() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);

        face.step(FaceEvent::Draw, &at(9, 59, 59, 0));
        assert!(host.state().vibrations.is_empty());

        face.step(FaceEvent::Draw, &at(10, 0, 0, 0));
        face.step(FaceEvent::Draw, &at(10, 0, 1, 0));
        face.step(FaceEvent::Draw, &at(10, 0, 59, 0));
        {
            let state = host.state();
            assert_eq!(state.vibrations.len(), 1);
            assert_eq!(state.vibrations[0].0.audible_count(), 10);
            assert_eq!(state.vibrations[0].1, VibrationUsage::Alarm);
            assert_eq!(state.tones, vec![0.1]);
        }
        assert_eq!(face.chime_marker(), Some(10));

        // 22:00 on the dial is 10 again
        face.step(FaceEvent::Draw, &at(22, 0, 0, 0));
        assert_eq!(host.state().vibrations[1].0.audible_count(), 10);
    }

    #[test]
    fn test_silent_chime_skips_tone() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let t = at(11, 59, 0, 0);
        let miss = FaceEvent::Tap { kind: TapKind::Primary, x: 5, y: 5 };
        face.step(miss, &t);
        face.step(miss, &t.advanced(100));
        assert!(face.mode().is_silent());

        face.step(FaceEvent::Draw, &at(12, 0, 0, 0));
        let state = host.state();
        assert_eq!(state.vibrations.len(), 1);
        assert_eq!(state.vibrations[0].0.audible_count(), 12);
        assert!(state.tones.is_empty());
    }

    #[test]
    fn test_chime_disabled() {
        let host = MockHost::with_battery(80);
        let settings = FaceSettings { chime: false, ..settings() };
        let mut face = FaceEngine::new(settings, host.clone());
        face.step(FaceEvent::Draw, &at(10, 0, 0, 0));
        assert!(host.state().vibrations.is_empty());
        assert_eq!(face.chime_marker(), None);
    }

    #[test]
    fn test_failed_actuators_are_swallowed() {
        let host = MockHost::new();
        {
            let mut state = host.state();
            state.simulate_vibrate_failure = true;
            state.simulate_tone_failure = true;
        }
        let mut face = engine(&host);
        let frame = face.step(FaceEvent::Draw, &at(10, 0, 0, 0)).frame.unwrap();
        assert_eq!(frame.text(TextRole::Battery).unwrap().text.as_str(), "--%");
        assert_eq!(face.chime_marker(), Some(10));
    }

    #[test]
    fn test_battery_cadence() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        for _ in 0..6 {
            face.step(FaceEvent::Draw, &now);
        }
        assert_eq!(host.state().battery_queries, 2);

        face.step(FaceEvent::AmbientModeChanged(true), &now);
        for _ in 0..4 {
            face.step(FaceEvent::Draw, &now);
        }
        assert_eq!(host.state().battery_queries, 6);
    }

    #[test]
    fn test_low_battery_seen_on_resample() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        face.step(FaceEvent::Draw, &now);
        host.set_battery(Some(25));

        // the old reading holds until the next sample is due
        let frame = face.step(FaceEvent::Draw, &now).frame.unwrap();
        assert_eq!(frame.text(TextRole::Battery).unwrap().text.as_str(), "80%");
        face.step(FaceEvent::Draw, &now);
        let frame = face.step(FaceEvent::Draw, &now).frame.unwrap();
        let battery = frame.text(TextRole::Battery).unwrap();
        assert_eq!(battery.text.as_str(), "25%");
        assert_eq!(battery.size_px, face.renderer.layout().battery_low_size);
    }

    #[test]
    fn test_offsets_bounded_and_ambient_cadence() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        let bound = face.offsets().bound();
        face.step(FaceEvent::AmbientModeChanged(true), &now);

        let mut distinct = std::collections::HashSet::new();
        for _ in 0..20 {
            let frame = face.step(FaceEvent::Draw, &now).frame.unwrap();
            assert!(frame.second_hand().is_none());
            let offset = face.offsets().offset();
            assert!(offset.dx.abs() < bound && offset.dy.abs() < bound);
            distinct.insert((offset.dx, offset.dy));
        }
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_resize_moves_layout() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        let out = face.step(FaceEvent::Resize { width: 300, height: 300 }, &now);
        assert!(out.request_redraw);
        let frame = face.step(FaceEvent::Draw, &now).frame.unwrap();
        let (_, end, _) = frame.second_hand().unwrap();
        assert!(end.x <= 300 && end.y <= 300);
        assert_eq!(face.settings().width, 300);
    }

    #[test]
    fn test_surface_destroyed() {
        let host = MockHost::with_battery(80);
        let mut face = engine(&host);
        let now = at(10, 9, 5, 0);
        let token = armed_token(&face.step(FaceEvent::VisibilityChanged(true), &now));

        let out = face.step(FaceEvent::SurfaceDestroyed, &now);
        assert_eq!(out.timer, Some(TimerCommand::Cancel { token }));
        assert!(face.is_destroyed());
        assert!(!face.timezone_receiver_registered());

        let out = face.step(FaceEvent::Draw, &now);
        assert!(out.frame.is_none());
    }
}
