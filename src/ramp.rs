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
//! Hold-to-accelerate for the minute buttons.

/// Which way a minute button moves the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Polls in a row a button must be held before the step grows.
pub const RAMP_THRESHOLD: u8 = 5;

/// Largest step, in minutes per poll.
pub const MAX_STEP: u8 = 30;

/// Acceleration state while a direction button is held.
///
/// Every `threshold + 1` consecutive polls of the same button bump the step by
/// one minute, up to the cap.  Changing direction, or a poll with no button
/// held, starts over at one minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ramp {
    previous: Option<Direction>,
    streak: u8,
    step: u8,
    threshold: u8,
    max_step: u8,
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(RAMP_THRESHOLD, MAX_STEP)
    }
}

impl Ramp {
    #[must_use]
    pub const fn new(threshold: u8, max_step: u8) -> Self {
        Ramp {
            previous: None,
            streak: 0,
            step: 1,
            threshold,
            max_step,
        }
    }

    /// Record a poll with `direction` held and return the minutes to move.
    pub fn press(&mut self, direction: Direction) -> u8 {
        if self.previous == Some(direction) {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 1;
            self.step = 1;
        }
        self.previous = Some(direction);

        if self.streak > self.threshold {
            self.step = self.step.saturating_add(1).min(self.max_step);
            self.streak = 0;
        }
        self.step
    }

    /// Record a poll with neither direction held.
    pub fn release(&mut self) {
        self.previous = None;
        self.streak = 0;
        self.step = 1;
    }
}
