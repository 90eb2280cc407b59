/*
 *  main.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Headless simulator host - drives the face engine on a tokio runtime
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

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info, warn};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval_at, sleep_until, Instant};

use tickface::config::{self, Cli};
use tickface::face::{
    BackgroundArt, BackgroundKind, FaceEngine, FaceEvent, FaceHost, FaceTime, FrameSurface,
    HostError, TextRole, TimerCommand, VibrationUsage, Waveform,
};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Host ticks once a minute, as the platform does while ambient
const TIME_TICK: Duration = Duration::from_secs(60);
/// Percent lost per battery query
const BATTERY_DRAIN: f32 = 0.25;

/// Simulated platform services: a slowly draining battery and actuators
/// that only log.
struct SimHost {
    battery: f32,
}

impl SimHost {
    fn new() -> Self {
        Self { battery: 100.0 }
    }
}

impl FaceHost for SimHost {
    fn battery_percentage(&mut self) -> Result<u8, HostError> {
        self.battery = (self.battery - BATTERY_DRAIN).max(0.0);
        Ok(self.battery.round() as u8)
    }

    fn vibrate(&mut self, waveform: &Waveform, usage: VibrationUsage) -> Result<(), HostError> {
        info!(
            "Vibrate ({:?}): {} pulses over {} ms",
            usage,
            waveform.audible_count(),
            waveform.total_duration_ms()
        );
        debug!("Timings {:?} amplitudes {:?}", waveform.timings(), waveform.amplitudes());
        Ok(())
    }

    fn play_tone(&mut self, volume: f32) -> Result<(), HostError> {
        info!("Tone at volume {:.2}", volume);
        Ok(())
    }

    fn set_notification_muted(&mut self, muted: bool) -> Result<(), HostError> {
        info!("Notifications {}", if muted { "muted" } else { "unmuted" });
        Ok(())
    }
}

/// Run limits taken from the command line
struct Script {
    frames: Option<u64>,
    ambient_after: Option<Duration>,
}

struct Simulator {
    engine: FaceEngine<SimHost>,
    surface: FrameSurface,
    /// Armed heartbeat: token and when it comes due
    heartbeat: Option<(u64, Instant)>,
}

impl Simulator {
    /// Step one event, then any render pass it asked for
    fn dispatch(&mut self, event: FaceEvent) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            if let FaceEvent::Resize { width, height } = event {
                self.surface.resize(width, height);
            }
            let out = self.engine.step(event, &FaceTime::now());
            match out.timer {
                Some(TimerCommand::Arm { token, delay_ms }) => {
                    let delay = Duration::from_millis(delay_ms.max(0) as u64);
                    self.heartbeat = Some((token, Instant::now() + delay));
                }
                Some(TimerCommand::Cancel { token }) => {
                    if self.heartbeat.is_some_and(|(armed, _)| armed == token) {
                        self.heartbeat = None;
                    }
                }
                None => {}
            }
            if let Some(frame) = out.frame {
                if let Some(time) = frame.text(TextRole::Time) {
                    debug!("Drew {} at {:?}", time.text, time.origin);
                }
                if let Err(e) = self.surface.paint(&frame) {
                    warn!("Frame not painted: {}", e);
                }
            }
            if out.request_redraw {
                queue.push_back(FaceEvent::Draw);
            }
        }
    }

    async fn run(&mut self, script: &Script) {
        let start = Instant::now();
        let mut ticks = interval_at(start + TIME_TICK, TIME_TICK);
        let mut ambient_at = script.ambient_after.map(|after| start + after);

        let (width, height) = (self.surface.width() as u32, self.surface.height() as u32);
        self.dispatch(FaceEvent::Resize { width, height });
        self.dispatch(FaceEvent::VisibilityChanged(true));

        loop {
            if script.frames.is_some_and(|limit| self.engine.frames_drawn() >= limit) {
                info!("Frame limit reached");
                break;
            }

            let beat = self.heartbeat;
            let beat_at = beat.map(|(_, at)| at).unwrap_or_else(Instant::now);
            let ambient_deadline = ambient_at.unwrap_or_else(Instant::now);

            tokio::select! {
                _ = sleep_until(beat_at), if beat.is_some() => {
                    if let Some((token, _)) = self.heartbeat.take() {
                        self.dispatch(FaceEvent::Heartbeat { token });
                    }
                }
                _ = ticks.tick() => self.dispatch(FaceEvent::TimeTick),
                _ = sleep_until(ambient_deadline), if ambient_at.is_some() => {
                    ambient_at = None;
                    self.dispatch(FaceEvent::AmbientModeChanged(true));
                }
            }
        }
    }

    fn shutdown(&mut self) {
        self.dispatch(FaceEvent::SurfaceDestroyed);
    }
}

async fn signal_handler() -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_with(&cli).context("loading configuration")?;

    if cli.dump_config {
        println!("{}", cfg.dump()?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This {} is always on time", env!("CARGO_PKG_NAME"));
    info!("v.{} built {} ({})", env!("CARGO_PKG_VERSION"), BUILD_DATE, BUILD_PROFILE);

    let settings = cfg.face_settings();
    let (width, height) = (settings.width, settings.height);
    let background = settings.background;
    let mut engine = FaceEngine::new(settings, SimHost::new());

    if background == BackgroundKind::Image {
        match cfg.image_path() {
            Some(path) => match BackgroundArt::load(path) {
                Ok(art) => {
                    let (w, h) = art.source_size();
                    info!("Background image {} ({}x{})", path.display(), w, h);
                    engine = engine.with_background(art);
                }
                Err(e) => warn!("Background image {} unusable, using solid fill: {}", path.display(), e),
            },
            None => warn!("Image background without an image_path, using solid fill"),
        }
    }

    let script = Script {
        frames: cli.frames,
        ambient_after: cli.ambient_after.map(Duration::from_secs),
    };
    let mut sim = Simulator {
        engine,
        surface: FrameSurface::new(width, height),
        heartbeat: None,
    };

    tokio::select! {
        result = signal_handler() => {
            if let Err(e) = result {
                error!("Signal handling failed: {}", e);
            }
        }
        _ = sim.run(&script) => {
            info!("Closed simulation loop.");
        }
    }

    let frames = sim.engine.frames_drawn();
    sim.shutdown();
    info!("Simulator exiting after {} frames.", frames);

    if let Some(path) = cli.snapshot.as_ref() {
        sim.surface
            .save_png(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
    }

    Ok(())
}
