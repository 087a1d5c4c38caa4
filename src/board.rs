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
//! ClockIt pin wiring.
//!
//! Segments are driven high, digit selects are pulled low to light a
//! position.  Arduino pin names are the nano168 ones:
//!
//! | Line   | Port | Pin |   | Line   | Port | Pin |
//! |--------|------|-----|---|--------|------|-----|
//! | SEG_A  | PC3  | a3  |   | DIG_1  | PD0  | d0  |
//! | SEG_B  | PC5  | a5  |   | DIG_2  | PD1  | d1  |
//! | SEG_C  | PC2  | a2  |   | DIG_3  | PD4  | d4  |
//! | SEG_D  | PD2  | d2  |   | DIG_4  | PD6  | d6  |
//! | SEG_E  | PC0  | a0  |   | COL    | PD3  | d3  |
//! | SEG_F  | PC1  | a1  |   | UP     | PB5  | d13 |
//! | SEG_G  | PC4  | a4  |   | DOWN   | PB4  | d12 |
//! | DP     | PD5  | d5  |   | SNOOZE | PD7  | d7  |

use arduino_hal::hal::port::Dynamic;
use arduino_hal::port::mode::{Input, Output, PullUp};
use arduino_hal::port::Pin;

use timebox::{Buttons, DigitSink, Glyph, Position};

type OutputPin = Pin<Output, Dynamic>;
type ButtonPin = Pin<Input<PullUp>, Dynamic>;

/// The multiplexed display lines.
pub struct Board {
    /// Segment lines, A..G then DP, matching the `Glyph` bit order.
    pub segments: [OutputPin; 8],
    /// Digit selects 1..4.  `None` when the line is taken by the console.
    pub digits: [Option<OutputPin>; 4],
    pub colon: OutputPin,
}

impl Board {
    fn deselect(&mut self) {
        for pin in self.digits.iter_mut().flatten() {
            pin.set_high();
        }
        self.colon.set_high();
    }
}

impl DigitSink for Board {
    fn show(&mut self, glyph: Glyph, position: Position) {
        self.deselect();

        for (bit, pin) in self.segments.iter_mut().enumerate() {
            if glyph.lit(1 << bit) {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }

        let select = match position {
            Position::Digit1 => self.digits[0].as_mut(),
            Position::Digit2 => self.digits[1].as_mut(),
            Position::Digit3 => self.digits[2].as_mut(),
            Position::Digit4 => self.digits[3].as_mut(),
            Position::Colon => Some(&mut self.colon),
        };
        if let Some(pin) = select {
            pin.set_low();
        }
    }

    fn clear(&mut self) {
        for pin in self.segments.iter_mut() {
            pin.set_low();
        }
        self.deselect();
    }
}

/// Up, down and snooze, active low with the internal pull-ups.
pub struct Keys {
    pub up: ButtonPin,
    pub down: ButtonPin,
    pub snooze: ButtonPin,
}

impl Keys {
    pub fn read(&self) -> Buttons {
        Buttons {
            up: self.up.is_low(),
            down: self.down.is_low(),
            snooze: self.snooze.is_low(),
        }
    }
}

/// Console used when USART0's pins are driving digits 1 and 2.
#[cfg(not(feature = "console"))]
pub struct Silent;

#[cfg(not(feature = "console"))]
impl ufmt::uWrite for Silent {
    type Error = core::convert::Infallible;

    fn write_str(&mut self, _s: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}
