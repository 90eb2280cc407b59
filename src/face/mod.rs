/*
 *  face/mod.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Face subsystem - mode, scheduling, input and rendering
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

// Leaf components
pub mod clock;
pub mod burn_in;
pub mod battery;
pub mod tap;
pub mod chime;

// State and cadence
pub mod mode;
pub mod scheduler;

// Rendering
pub mod color;
pub mod layout;
pub mod primitives;
pub mod background;
pub mod renderer;
pub mod surface;

// Host boundary
pub mod error;
pub mod host;
pub mod mock;
pub mod settings;

pub mod engine;

// Re-exports for convenience
pub use clock::{FaceTime, FaceText, DateFormat};
pub use burn_in::{BurnInOffset, OffsetGenerator};
pub use battery::{BatteryReading, BatterySampler};
pub use tap::{TapKind, TapAction, TapInterpreter, DateFormatState};
pub use chime::{Chime, HourlyChime, Pulse, Waveform};
pub use mode::{ModeController, ModeChange, FaceState};
pub use scheduler::{Heartbeat, RedrawScheduler, TimerCommand};
pub use color::Palette;
pub use layout::{FaceLayout, TextMetrics, MonoMetrics};
pub use primitives::{DrawPrimitive, Frame, TextPrimitive, TextRole};
pub use background::{BackgroundArt, RgbImage};
pub use renderer::{FrameInputs, FrameRenderer};
pub use surface::FrameSurface;
pub use error::{FaceError, HostError};
pub use host::{FaceHost, VibrationUsage};
pub use mock::{MockHost, MockHostState};
pub use settings::{BackgroundKind, FaceSettings};
pub use engine::{FaceEngine, FaceEvent, RenderInstruction};

/// Display mode - set only by the host's ambient notification
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum DisplayMode {
    #[default]
    Active,  // Interactive, full color, 1 Hz heartbeat
    Ambient, // Low power, monochrome friendly, host ticks only
}

impl DisplayMode {
    pub fn is_ambient(&self) -> bool {
        matches!(self, DisplayMode::Ambient)
    }
}
