/*
 *  face/error.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the face engine and its host
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

use thiserror::Error;

/// Failures reported by the host's platform services.
///
/// The engine never propagates these; they are logged and the last
/// known value is kept.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("Battery level unavailable: {0}")]
    Battery(String),

    #[error("Vibration failed: {0}")]
    Haptics(String),

    #[error("Tone playback failed: {0}")]
    Audio(String),

    #[error("Notification channel unavailable: {0}")]
    Notification(String),
}

/// Errors from surface and asset handling
#[derive(Debug, Error)]
pub enum FaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid background image: {0}")]
    InvalidImage(String),

    #[error("Image {width}x{height} is too large")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("Surface size mismatch: expected {expected} pixels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
