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
//! Board-independent logic for the timebox alarm clock.
//!
//! The clock keeps 12-hour time advanced by a 1 Hz interrupt, renders it on a
//! multiplexed 4-digit 7-segment display, and lets the user set it with an
//! up/down/snooze button triple.  Everything in here runs on the host too, so
//! the firmware binary only wires these pieces to the ATmega168 peripherals.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod display;
pub mod input;
pub mod ramp;
pub mod segments;
pub mod settings;

pub use clock::{ClockTime, Meridiem, SharedClock};
pub use display::{DigitSink, DisplayMode, Frame, Position};
pub use input::{Buttons, Event, TimeSetter};
pub use ramp::{Direction, Ramp};
pub use segments::Glyph;
pub use settings::Settings;
