/*
 *  face/mock.rs
 *
 *  TickFace - always on time
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock host for testing without a platform
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

use std::sync::{Arc, Mutex, MutexGuard};

use crate::face::chime::Waveform;
use crate::face::error::HostError;
use crate::face::host::{FaceHost, VibrationUsage};

/// Mock host
///
/// Records every outbound call so tests can verify side effects. Clones
/// share the same state, so a test keeps one handle while the engine owns
/// the other.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    state: Arc<Mutex<MockHostState>>,
}

/// Internal state for the mock host (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockHostState {
    /// Reported battery level; `None` makes queries fail
    pub battery: Option<u8>,

    /// Number of battery queries made
    pub battery_queries: usize,

    /// Every waveform handed to the vibrator
    pub vibrations: Vec<(Waveform, VibrationUsage)>,

    /// Every tone volume played
    pub tones: Vec<f32>,

    /// Each mute state set, in order
    pub mute_calls: Vec<bool>,

    /// Simulate failures (for error testing)
    pub simulate_vibrate_failure: bool,
    pub simulate_tone_failure: bool,
    pub simulate_mute_failure: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock host reporting a fixed battery level
    pub fn with_battery(percentage: u8) -> Self {
        let host = Self::default();
        host.state().battery = Some(percentage);
        host
    }

    /// Lock the shared state for inspection or tweaking
    pub fn state(&self) -> MutexGuard<'_, MockHostState> {
        // a panicking test must not hide the recorded calls from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_battery(&self, percentage: Option<u8>) {
        self.state().battery = percentage;
    }

    pub fn muted(&self) -> Option<bool> {
        self.state().mute_calls.last().copied()
    }
}

impl FaceHost for MockHost {
    fn battery_percentage(&mut self) -> Result<u8, HostError> {
        let mut state = self.state();
        state.battery_queries += 1;
        state
            .battery
            .ok_or_else(|| HostError::Battery("Simulated battery failure".to_string()))
    }

    fn vibrate(&mut self, waveform: &Waveform, usage: VibrationUsage) -> Result<(), HostError> {
        let mut state = self.state();
        if state.simulate_vibrate_failure {
            return Err(HostError::Haptics("Simulated vibrate failure".to_string()));
        }
        state.vibrations.push((waveform.clone(), usage));
        Ok(())
    }

    fn play_tone(&mut self, volume: f32) -> Result<(), HostError> {
        let mut state = self.state();
        if state.simulate_tone_failure {
            return Err(HostError::Audio("Simulated tone failure".to_string()));
        }
        state.tones.push(volume);
        Ok(())
    }

    fn set_notification_muted(&mut self, muted: bool) -> Result<(), HostError> {
        let mut state = self.state();
        if state.simulate_mute_failure {
            return Err(HostError::Notification("Simulated mute failure".to_string()));
        }
        state.mute_calls.push(muted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_host_battery() {
        let mut host = MockHost::with_battery(80);
        assert_eq!(host.battery_percentage(), Ok(80));

        host.set_battery(None);
        assert!(host.battery_percentage().is_err());
        assert_eq!(host.state().battery_queries, 2);
    }

    #[test]
    fn test_mock_host_clones_share_state() {
        let observer = MockHost::new();
        let mut engine_side = observer.clone();

        engine_side.set_notification_muted(true).unwrap();
        engine_side.play_tone(0.1).unwrap();

        assert_eq!(observer.muted(), Some(true));
        assert_eq!(observer.state().tones, vec![0.1]);
    }

    #[test]
    fn test_mock_host_simulated_failure() {
        let mut host = MockHost::new();
        host.state().simulate_vibrate_failure = true;

        assert!(host.vibrate(&Waveform::for_hour(1), VibrationUsage::Alarm).is_err());
        assert!(host.state().vibrations.is_empty());

        host.state().simulate_vibrate_failure = false;
        assert!(host.vibrate(&Waveform::for_hour(1), VibrationUsage::Alarm).is_ok());
        assert_eq!(host.state().vibrations.len(), 1);
    }
}
