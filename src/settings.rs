// This library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this library.  If not, see <http://www.gnu.org/licenses/>.
//! Display and button timing.
//!
//! Nothing is persisted: the clock always boots with these values and the
//! time at 12:00:00 AM.

use crate::ramp::{MAX_STEP, RAMP_THRESHOLD};

/// Timing knobs for the display and the time-setting gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Base LED on-time per digit, in microseconds.  200us is pretty dim but
    /// visible; 50us is the stock brightness.
    pub bright_level_us: u16,

    /// Display cycles drawn on each refresh tick.
    pub refresh_cycles: u16,

    /// How long up+down must be held before setting mode starts.
    pub arm_hold_ms: u32,

    /// Pause after each minute adjustment.
    pub adjust_interval_ms: u32,

    /// Confirmation flash: lit time, dark time, number of flashes.
    pub confirm_lit_ms: u32,
    pub confirm_dark_ms: u32,
    pub confirm_flashes: u8,

    /// Consecutive polls before the minute step grows, and its cap.
    pub ramp_threshold: u8,
    pub ramp_max_step: u8,
}

// "Factory" defaults.
const BRIGHT_LEVEL_DEFAULT: u16 = 50;
const REFRESH_CYCLES_DEFAULT: u16 = 10;
const ARM_HOLD_MS_DEFAULT: u32 = 2000;
const ADJUST_INTERVAL_MS_DEFAULT: u32 = 100;
const CONFIRM_LIT_MS_DEFAULT: u32 = 100;
const CONFIRM_DARK_MS_DEFAULT: u32 = 250;
const CONFIRM_FLASHES_DEFAULT: u8 = 3;

impl Default for Settings {
    fn default() -> Self {
        Self {
            bright_level_us: BRIGHT_LEVEL_DEFAULT,
            refresh_cycles: REFRESH_CYCLES_DEFAULT,
            arm_hold_ms: ARM_HOLD_MS_DEFAULT,
            adjust_interval_ms: ADJUST_INTERVAL_MS_DEFAULT,
            confirm_lit_ms: CONFIRM_LIT_MS_DEFAULT,
            confirm_dark_ms: CONFIRM_DARK_MS_DEFAULT,
            confirm_flashes: CONFIRM_FLASHES_DEFAULT,
            ramp_threshold: RAMP_THRESHOLD,
            ramp_max_step: MAX_STEP,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn with_bright_level(self, bright_level_us: u16) -> Self {
        Self {
            bright_level_us,
            ..self
        }
    }

    #[must_use]
    pub fn with_arm_hold(self, arm_hold_ms: u32) -> Self {
        Self {
            arm_hold_ms,
            ..self
        }
    }

    #[must_use]
    pub fn with_adjust_interval(self, adjust_interval_ms: u32) -> Self {
        Self {
            adjust_interval_ms,
            ..self
        }
    }

    /// Ramp step cap, clamped to 1..=59 so a single step never spans an hour.
    #[must_use]
    pub fn with_ramp(self, ramp_threshold: u8, ramp_max_step: u8) -> Self {
        Self {
            ramp_threshold,
            ramp_max_step: ramp_max_step.clamp(1, 59),
            ..self
        }
    }
}
