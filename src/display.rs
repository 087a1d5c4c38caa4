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
//! Multiplexed 4-digit display.
//!
//! Only one position is ever lit.  A display cycle walks the four digits and
//! the colon, holding each one on for its compensated time, then goes dark for
//! one base period.  Repeating cycles fast enough makes the whole time appear
//! lit at once.
//!
//! The segment lines carry no current limiting, so average brightness is set
//! purely by how long each digit is held, see [`crate::segments::on_time_us`].

use embedded_hal::delay::DelayNs;

use crate::clock::ClockTime;
use crate::segments::{on_time_us, Glyph};
use crate::settings::Settings;

/// Physical positions on the display, left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Colon,
}

impl Position {
    pub const DIGITS: [Position; 4] = [
        Position::Digit1,
        Position::Digit2,
        Position::Digit3,
        Position::Digit4,
    ];
}

/// Output side of the display: lights one glyph at one position.
///
/// Showing a glyph deselects whatever position was lit before.  Positions the
/// board cannot drive are ignored.
pub trait DigitSink {
    fn show(&mut self, glyph: Glyph, position: Position);

    /// All positions off.
    fn clear(&mut self);
}

/// What the four digits show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// `hh:mm` with the leading hour zero suppressed.
    #[default]
    HoursMinutes,
    /// `mm:ss`, for watching rollover on the bench.
    MinutesSeconds,
}

/// One still image of the display, taken from a single clock snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    digits: [Option<u8>; 4],
    colon: bool,
}

impl Frame {
    #[must_use]
    pub fn new(time: &ClockTime, mode: DisplayMode) -> Self {
        let digits = match mode {
            DisplayMode::HoursMinutes => {
                let hours = time.hours();
                let tens = if hours > 9 { Some(hours / 10) } else { None };
                [
                    tens,
                    Some(hours % 10),
                    Some(time.minutes() / 10),
                    Some(time.minutes() % 10),
                ]
            }
            DisplayMode::MinutesSeconds => [
                Some(time.minutes() / 10),
                Some(time.minutes() % 10),
                Some(time.seconds() / 10),
                Some(time.seconds() % 10),
            ],
        };
        Frame {
            digits,
            colon: time.colon_lit(),
        }
    }

    /// Digit values per position, `None` where the position stays dark.
    pub fn digits(&self) -> [Option<u8>; 4] {
        self.digits
    }

    pub fn colon(&self) -> bool {
        self.colon
    }
}

/// Software-PWM driver for a [`DigitSink`].
pub struct Display<S> {
    sink: S,
    bright_level_us: u16,
}

impl<S: DigitSink> Display<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Display {
            sink,
            bright_level_us: settings.bright_level_us,
        }
    }

    /// Draw `frame` for `cycles` full display cycles.
    pub fn render<D: DelayNs>(&mut self, frame: &Frame, cycles: u16, delay: &mut D) {
        let base = u32::from(self.bright_level_us);
        for _ in 0..cycles {
            for (position, digit) in Position::DIGITS.iter().zip(frame.digits) {
                if let Some(digit) = digit {
                    self.sink.show(Glyph::digit(digit), *position);
                    delay.delay_us(on_time_us(digit, self.bright_level_us));
                }
            }

            if frame.colon {
                self.sink.show(Glyph::COLON, Position::Colon);
                delay.delay_us(base);
            }

            self.sink.clear();
            delay.delay_us(base);
        }
    }

    /// Turn everything off and leave it off.
    pub fn blank(&mut self) {
        self.sink.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Meridiem;
    use core::cell::RefCell;

    #[derive(Debug, PartialEq)]
    enum Step {
        Show(Glyph, Position),
        Clear,
        WaitUs(u32),
    }

    struct Sink<'a>(&'a RefCell<Vec<Step>>);

    impl DigitSink for Sink<'_> {
        fn show(&mut self, glyph: Glyph, position: Position) {
            self.0.borrow_mut().push(Step::Show(glyph, position));
        }

        fn clear(&mut self) {
            self.0.borrow_mut().push(Step::Clear);
        }
    }

    struct Delay<'a>(&'a RefCell<Vec<Step>>);

    impl DelayNs for Delay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Step::WaitUs(ns / 1000));
        }

        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Step::WaitUs(us));
        }
    }

    fn time(h: u8, m: u8, s: u8) -> ClockTime {
        ClockTime::new(h, m, s, Meridiem::Am).unwrap()
    }

    #[test]
    fn frame_suppresses_leading_hour_zero() {
        let frame = Frame::new(&time(9, 5, 0), DisplayMode::HoursMinutes);
        assert_eq!(frame.digits(), [None, Some(9), Some(0), Some(5)]);

        let frame = Frame::new(&time(12, 34, 0), DisplayMode::HoursMinutes);
        assert_eq!(frame.digits(), [Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn frame_minutes_seconds_keeps_zeros() {
        let frame = Frame::new(&time(3, 7, 9), DisplayMode::MinutesSeconds);
        assert_eq!(frame.digits(), [Some(0), Some(7), Some(0), Some(9)]);
    }

    #[test]
    fn frame_follows_blink() {
        let mut t = time(1, 0, 0);
        assert!(!Frame::new(&t, DisplayMode::HoursMinutes).colon());
        t.tick();
        assert!(Frame::new(&t, DisplayMode::HoursMinutes).colon());
    }

    #[test]
    fn one_cycle_with_colon() {
        let log = RefCell::new(Vec::new());
        let mut display = Display::new(Sink(&log), &Settings::default());
        let mut t = time(10, 18, 0);
        t.tick();
        let frame = Frame::new(&t, DisplayMode::HoursMinutes);

        display.render(&frame, 1, &mut Delay(&log));

        assert_eq!(
            log.take(),
            [
                Step::Show(Glyph::digit(1), Position::Digit1),
                Step::WaitUs(70),
                Step::Show(Glyph::digit(0), Position::Digit2),
                Step::WaitUs(110),
                Step::Show(Glyph::digit(1), Position::Digit3),
                Step::WaitUs(70),
                Step::Show(Glyph::digit(8), Position::Digit4),
                Step::WaitUs(120),
                Step::Show(Glyph::COLON, Position::Colon),
                Step::WaitUs(50),
                Step::Clear,
                Step::WaitUs(50),
            ]
        );
    }

    #[test]
    fn dark_leading_digit_and_colon_are_skipped() {
        let log = RefCell::new(Vec::new());
        let mut display = Display::new(Sink(&log), &Settings::default());
        let frame = Frame::new(&time(7, 0, 0), DisplayMode::HoursMinutes);

        display.render(&frame, 3, &mut Delay(&log));

        let log = log.take();
        assert!(!log.iter().any(|s| matches!(s, Step::Show(_, Position::Digit1))));
        assert!(!log.iter().any(|s| matches!(s, Step::Show(_, Position::Colon))));
        assert_eq!(log.iter().filter(|s| **s == Step::Clear).count(), 3);
    }

    #[test]
    fn brightness_scales_every_hold() {
        let log = RefCell::new(Vec::new());
        let settings = Settings::default().with_bright_level(100);
        let mut display = Display::new(Sink(&log), &settings);
        let frame = Frame::new(&time(8, 8, 0), DisplayMode::HoursMinutes);

        display.render(&frame, 1, &mut Delay(&log));

        let waits: Vec<u32> = log
            .into_inner()
            .into_iter()
            .filter_map(|s| match s {
                Step::WaitUs(us) => Some(us),
                _ => None,
            })
            .collect();
        assert_eq!(waits, [240, 220, 240, 100]);
    }

    #[test]
    fn blank_frame_only_clears() {
        let log = RefCell::new(Vec::new());
        let mut display = Display::new(Sink(&log), &Settings::default());

        let dark = Frame {
            digits: [None; 4],
            colon: false,
        };
        display.render(&dark, 2, &mut Delay(&log));
        display.blank();

        assert_eq!(
            log.take(),
            [
                Step::Clear,
                Step::WaitUs(50),
                Step::Clear,
                Step::WaitUs(50),
                Step::Clear,
            ]
        );
    }
}
