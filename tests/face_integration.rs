/*
 *  tests/face_integration.rs
 *
 *  Integration tests for the face engine
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 */

use chrono::{TimeDelta, TimeZone, Utc};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use tickface::face::{
    BackgroundArt, BackgroundKind, DateFormat, FaceEngine, FaceEvent, FaceSettings, FaceState,
    FaceTime, FrameSurface, MockHost, RgbImage, TapKind, TextRole, TimerCommand,
};

fn at(h: u32, m: u32, s: u32, ms: i64) -> FaceTime {
    let dt = Utc.with_ymd_and_hms(2026, 10, 18, h, m, s).unwrap() + TimeDelta::milliseconds(ms);
    FaceTime::from_datetime(&dt)
}

fn settings() -> FaceSettings {
    FaceSettings { rng_seed: Some(2026), ..FaceSettings::default() }
}

/// Minimal host loop on a virtual clock: honours timer commands and answers
/// redraw requests with a render pass painted onto a surface.
struct Harness {
    engine: FaceEngine<MockHost>,
    surface: FrameSurface,
    now: FaceTime,
    heartbeat: Option<(u64, i64)>,
    frames_painted: usize,
    /// Platform behaviour: redraw requests made while hidden are ignored
    visible: bool,
    dropped: usize,
}

impl Harness {
    fn new(engine: FaceEngine<MockHost>, now: FaceTime) -> Self {
        let (w, h) = (engine.settings().width, engine.settings().height);
        Self {
            engine,
            surface: FrameSurface::new(w, h),
            now,
            heartbeat: None,
            frames_painted: 0,
            visible: false,
            dropped: 0,
        }
    }

    fn send(&mut self, event: FaceEvent) {
        if let FaceEvent::VisibilityChanged(visible) = event {
            self.visible = visible;
        }
        let out = self.engine.step(event, &self.now);
        match out.timer {
            Some(TimerCommand::Arm { token, delay_ms }) => {
                self.heartbeat = Some((token, self.now.millis() + delay_ms));
            }
            Some(TimerCommand::Cancel { token }) => {
                assert_eq!(self.heartbeat.map(|(t, _)| t), Some(token), "cancel of an unknown timer");
                self.heartbeat = None;
            }
            None => {}
        }
        if let Some(frame) = out.frame {
            self.surface.paint(&frame).unwrap();
            self.frames_painted += 1;
        }
        if out.request_redraw {
            if self.visible {
                self.send(FaceEvent::Draw);
            } else {
                self.dropped += 1;
            }
        }
    }

    /// Move the clock forward, firing the heartbeat whenever it comes due
    fn run_for(&mut self, ms: i64) {
        let end = self.now.millis() + ms;
        while let Some((token, due)) = self.heartbeat.filter(|&(_, due)| due <= end) {
            // an overdue beat fires now, the clock never runs backwards
            self.now = self.now.advanced((due - self.now.millis()).max(0));
            self.heartbeat = None;
            self.send(FaceEvent::Heartbeat { token });
        }
        self.now = self.now.advanced(end - self.now.millis());
    }
}

#[test]
fn test_interactive_runs_at_one_hertz() {
    let host = MockHost::with_battery(90);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(10, 9, 5, 400));

    h.send(FaceEvent::VisibilityChanged(true));
    h.run_for(10_000);

    // the first beat lands straight away, then one per whole second
    assert!((10..=12).contains(&h.frames_painted), "painted {}", h.frames_painted);
    let (_, due) = h.heartbeat.unwrap();
    assert_eq!(due.rem_euclid(1000), 0);
    assert_eq!(h.surface.pixel(0, 0), Some(Rgb888::BLUE));
}

#[test]
fn test_ambient_stops_heartbeat_until_active() {
    let host = MockHost::with_battery(90);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(10, 9, 5, 0));
    h.send(FaceEvent::VisibilityChanged(true));
    h.run_for(3_000);

    h.send(FaceEvent::AmbientModeChanged(true));
    assert!(h.heartbeat.is_none());
    let painted = h.frames_painted;
    h.run_for(30_000);
    assert_eq!(h.frames_painted, painted);
    assert_eq!(h.surface.pixel(0, 0), Some(Rgb888::BLACK));

    // only the host's minute tick draws while ambient
    h.send(FaceEvent::TimeTick);
    assert_eq!(h.frames_painted, painted + 1);
    assert_eq!(h.engine.mode().state(), FaceState::Ambient);

    h.send(FaceEvent::AmbientModeChanged(false));
    assert!(h.heartbeat.is_some());
    h.run_for(5_000);
    assert!(h.frames_painted >= painted + 6);
}

#[test]
fn test_tap_scenario() {
    let host = MockHost::with_battery(90);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(10, 9, 5, 0));
    h.send(FaceEvent::VisibilityChanged(true));

    let center = h.engine.hit_box().unwrap().center();
    h.send(FaceEvent::Tap { kind: TapKind::Primary, x: center.x, y: center.y });
    assert_eq!(h.engine.date_format().format(), DateFormat::Standard);

    // double tap away from the time goes silent and mutes
    h.send(FaceEvent::Tap { kind: TapKind::Primary, x: 3, y: 3 });
    h.now = h.now.advanced(400);
    h.send(FaceEvent::Tap { kind: TapKind::Primary, x: 3, y: 3 });
    assert_eq!(h.engine.mode().state(), FaceState::ActiveSilent);
    assert_eq!(host.muted(), Some(true));

    // a minute on the date is back to clean
    h.run_for(60_000);
    assert_eq!(h.engine.date_format().format(), DateFormat::Clean);

    // silent survives ambient round trips
    h.send(FaceEvent::AmbientModeChanged(true));
    assert_eq!(h.engine.mode().state(), FaceState::AmbientSilent);
    h.send(FaceEvent::AmbientModeChanged(false));
    assert_eq!(h.engine.mode().state(), FaceState::ActiveSilent);
}

#[test]
fn test_chime_once_across_the_hour() {
    let host = MockHost::with_battery(90);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(14, 59, 55, 0));
    h.send(FaceEvent::VisibilityChanged(true));
    h.run_for(20_000);

    let state = host.state();
    assert_eq!(state.vibrations.len(), 1);
    assert_eq!(state.vibrations[0].0.audible_count(), 3);
    assert_eq!(state.tones.len(), 1);
}

#[test]
fn test_low_battery_paints_red() {
    let host = MockHost::with_battery(25);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(10, 9, 5, 0));
    h.send(FaceEvent::VisibilityChanged(true));
    assert!(h.surface.count_pixels(Rgb888::RED) > 0);

    host.set_battery(Some(31));
    h.run_for(4_000);
    assert_eq!(h.surface.count_pixels(Rgb888::RED), 0);
}

#[test]
fn test_battery_failure_keeps_last_reading() {
    let host = MockHost::with_battery(64);
    let mut engine = FaceEngine::new(settings(), host.clone());
    let now = at(10, 9, 5, 0);
    engine.step(FaceEvent::Draw, &now);

    host.set_battery(None);
    engine.step(FaceEvent::AmbientModeChanged(true), &now);
    let frame = engine.step(FaceEvent::Draw, &now).frame.unwrap();
    assert_eq!(frame.text(TextRole::Battery).unwrap().text.as_str(), "64%");
}

#[test]
fn test_image_face_goes_gray_in_ambient() {
    let host = MockHost::with_battery(90);
    let settings = FaceSettings { background: BackgroundKind::Image, width: 120, height: 120, ..settings() };
    let image = RgbImage::filled(40, 40, Rgb888::new(200, 40, 40)).unwrap();
    let art = BackgroundArt::from_image(&image).unwrap();
    let mut h = Harness::new(FaceEngine::new(settings, host).with_background(art), at(10, 9, 5, 0));

    h.send(FaceEvent::VisibilityChanged(true));
    let corner = h.surface.pixel(1, 1).unwrap();
    assert!(corner.r().abs_diff(200) <= 2 && corner.g().abs_diff(40) <= 2, "{:?}", corner);

    h.send(FaceEvent::AmbientModeChanged(true));
    let corner = h.surface.pixel(1, 1).unwrap();
    assert_eq!(corner.r(), corner.g());
    assert_eq!(corner.g(), corner.b());
}

#[test]
fn test_destroy_cancels_everything() {
    let host = MockHost::with_battery(90);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(10, 9, 5, 0));
    h.send(FaceEvent::VisibilityChanged(true));
    h.send(FaceEvent::SurfaceDestroyed);
    assert!(h.heartbeat.is_none());

    let painted = h.frames_painted;
    h.send(FaceEvent::TimeTick);
    assert_eq!(h.frames_painted, painted);
}

#[test]
fn test_requests_ignored_while_hidden_do_not_freeze_the_face() {
    let host = MockHost::with_battery(90);
    let mut h = Harness::new(FaceEngine::new(settings(), host.clone()), at(10, 9, 5, 0));

    // the host drops these, nothing is on screen
    h.send(FaceEvent::TimeTick);
    h.send(FaceEvent::TimeZoneChanged);
    h.send(FaceEvent::Resize { width: 454, height: 454 });
    assert_eq!(h.frames_painted, 0);
    assert!(h.dropped >= 1);

    h.send(FaceEvent::VisibilityChanged(true));
    assert_eq!(h.frames_painted, 1);
    h.run_for(5_000);
    assert!(h.frames_painted >= 5, "painted {}", h.frames_painted);

    // and again after a hide with a request still in flight
    h.send(FaceEvent::VisibilityChanged(false));
    h.send(FaceEvent::TimeTick);
    h.send(FaceEvent::VisibilityChanged(true));
    let painted = h.frames_painted;
    h.run_for(3_000);
    assert!(h.frames_painted >= painted + 3, "painted {}", h.frames_painted - painted);
}
