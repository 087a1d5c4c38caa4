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
//! 12-hour wall clock state.
//!
//! The clock is advanced once per second by the tick interrupt and nudged a
//! few minutes at a time while the user is setting it.  Both paths share the
//! same hour/meridiem cascade.

use core::cell::Cell;

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

/// AM/PM designator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

impl uDisplay for Meridiem {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Meridiem::Am => f.write_str("AM"),
            Meridiem::Pm => f.write_str("PM"),
        }
    }
}

/// Time of day on a 12-hour dial.
///
/// Fields are private: hours stay in 1..=12, minutes and seconds in 0..=59.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
    meridiem: Meridiem,
    // Toggled on every tick; drives the colon blink.
    blink: bool,
}

impl ClockTime {
    /// Power-on time, 12:00:00 AM.
    pub const EPOCH: ClockTime = ClockTime {
        hours: 12,
        minutes: 0,
        seconds: 0,
        meridiem: Meridiem::Am,
        blink: false,
    };

    /// Builds a time, or `None` if any field is off the 12-hour dial.
    #[must_use]
    pub const fn new(hours: u8, minutes: u8, seconds: u8, meridiem: Meridiem) -> Option<Self> {
        if hours < 1 || hours > 12 || minutes > 59 || seconds > 59 {
            return None;
        }
        Some(ClockTime {
            hours,
            minutes,
            seconds,
            meridiem,
            blink: false,
        })
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    /// Whether the colon is lit during this second.
    pub fn colon_lit(&self) -> bool {
        self.blink
    }

    /// Advance by one second.
    ///
    /// The meridiem flips when the hour becomes 12, and 13 wraps to 1.  The
    /// two checks are separate and happen in that order.
    pub fn tick(&mut self) {
        self.blink = !self.blink;

        self.seconds += 1;
        if self.seconds == 60 {
            self.seconds = 0;
            self.minutes += 1;
            if self.minutes == 60 {
                self.minutes = 0;
                self.hour_forward();
            }
        }
    }

    /// Add `step` minutes, carrying into the hour.  `step` is at most 30 in
    /// practice; anything past 59 is clamped.
    pub fn add_minutes(&mut self, step: u8) {
        self.minutes += step.min(59);
        if self.minutes > 59 {
            self.minutes -= 60;
            self.hour_forward();
        }
    }

    /// Take `step` minutes away.
    ///
    /// Going below zero lands on :59 of the previous hour whatever the step,
    /// so a ramped step never skips past the top of the hour.
    pub fn sub_minutes(&mut self, step: u8) {
        if step > self.minutes {
            self.minutes = 59;
            self.hour_back();
        } else {
            self.minutes -= step;
        }
    }

    fn hour_forward(&mut self) {
        self.hours += 1;
        if self.hours == 12 {
            self.meridiem = self.meridiem.toggled();
        }
        if self.hours == 13 {
            self.hours = 1;
        }
    }

    fn hour_back(&mut self) {
        self.hours -= 1;
        if self.hours == 0 {
            self.hours = 12;
        }
        if self.hours == 11 {
            self.meridiem = self.meridiem.toggled();
        }
    }
}

impl Default for ClockTime {
    fn default() -> Self {
        Self::EPOCH
    }
}

fn write_two_digits<W>(f: &mut Formatter<'_, W>, value: u8) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    f.write_char(char::from(b'0' + value / 10))?;
    f.write_char(char::from(b'0' + value % 10))
}

impl uDisplay for ClockTime {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "{}:", self.hours)?;
        write_two_digits(f, self.minutes)?;
        f.write_char(':')?;
        write_two_digits(f, self.seconds)?;
        uwrite!(f, " {}", self.meridiem)
    }
}

/// A clock value shared between interrupt handlers and the main loop.
///
/// Every read or read-modify-write is one indivisible step, so a tick can
/// never interleave with an adjustment or a display snapshot.
pub trait SharedClock {
    /// Run `f` on the current time and store the result, atomically.
    fn modify<R>(&self, f: impl FnOnce(&mut ClockTime) -> R) -> R;

    /// Copy of the current time.
    fn snapshot(&self) -> ClockTime {
        self.modify(|time| *time)
    }
}

/// Single-context clock, for code that already holds exclusive access (a
/// critical section, or a test).
impl SharedClock for Cell<ClockTime> {
    fn modify<R>(&self, f: impl FnOnce(&mut ClockTime) -> R) -> R {
        let mut time = self.get();
        let result = f(&mut time);
        self.set(time);
        result
    }
}
