/*
 *  lib.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Watch face render/state engine
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

//! Always-on watch face engine.
//!
//! The host feeds [`face::FaceEvent`]s into [`face::FaceEngine::step`] and acts
//! on the returned [`face::RenderInstruction`]: forward redraw requests, arm or
//! cancel the heartbeat timer, and draw finished frames.

pub mod config;
pub mod constants;
pub mod face;
