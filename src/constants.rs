//! Timing, cadence and styling constants shared across the face engine.

// Scheduler
/// Heartbeat period while visible and interactive.
pub const HEARTBEAT_INTERVAL_MS: i64 = 1_000;

// Tap handling
/// Two misses closer than this are a double tap.
pub const DOUBLE_TAP_WINDOW_MS: i64 = 1_000;
/// How long the standard date format stays up before reverting to clean.
pub const DATE_FORMAT_REVERT_MS: i64 = 60_000;

// Burn-in protection
/// Frames between offset regenerations while interactive.
pub const OFFSET_REFRESH_FRAMES: u32 = 30;
/// Offset bound for the plain face.
pub const DEFAULT_OFFSET_BOUND: i32 = 15;
/// Offset bound for the wide-jitter face.
pub const WIDE_OFFSET_BOUND: i32 = 30;

// Battery
/// Frames between battery queries while interactive.
pub const BATTERY_SAMPLE_FRAMES: u32 = 3;
/// Readings strictly below this are low.
pub const LOW_BATTERY_THRESHOLD: u8 = 31;

// Hourly chime
/// Alert prefix played before the hour pulses, as (duration ms, amplitude).
pub const CHIME_PREFIX: [(u32, u8); 3] = [(750, 100), (500, 255), (1_000, 0)];
pub const CHIME_PULSE_PAIRS: usize = 12;
pub const CHIME_PULSE_ON_MS: u32 = 250;
pub const CHIME_PULSE_OFF_MS: u32 = 200;
pub const CHIME_PULSE_AMPLITUDE: u8 = 255;
pub const CHIME_WAVEFORM_LEN: usize = CHIME_PREFIX.len() + CHIME_PULSE_PAIRS * 2;
/// Confirmation tone volume when the chime fires and the face is not silent.
pub const CHIME_TONE_VOLUME: f32 = 0.1;

// Styling, sized for a 454px reference panel and scaled by density
pub const REFERENCE_WIDTH: u32 = 454;
pub const TIME_TEXT_SIZE: f32 = 110.0;
pub const DATE_TEXT_SIZE: f32 = 25.0;
pub const BATTERY_TEXT_SIZE: f32 = 50.0;
pub const BATTERY_LOW_TEXT_SIZE: f32 = 65.0;
/// Vertical gap between the time and the battery text.
pub const BATTERY_TEXT_GAP: f32 = 20.0;
pub const HAND_STROKE_WIDTH: u32 = 3;
/// Fraction of the radius covered by the second hand, measured from the rim.
pub const SECOND_HAND_LENGTH: f32 = 0.2;
/// The second hand changes color on every multiple of this many seconds.
pub const SECOND_HAND_PULSE_SECS: u32 = 15;

/// Largest background raster accepted, in pixels.
pub const MAX_IMAGE_PIXELS: usize = 4096 * 4096;

pub const TEXT_ALPHA_OPAQUE: u8 = 255;
/// Text alpha when drawn over the background image.
pub const TEXT_ALPHA_OVER_IMAGE: u8 = 175;
