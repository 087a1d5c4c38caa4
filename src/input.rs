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
//! Time-setting gesture.
//!
//! Hold up and down together for two seconds to start setting the time.  Let
//! go, then hold up or down to move the minutes (faster the longer you hold),
//! and press snooze to finish.  The display flashes three times to confirm.
//!
//! Nothing here blocks: [`TimeSetter::poll`] is called from the main loop with
//! the current button levels and a millisecond timestamp, and returns
//! `WouldBlock` until something worth reporting happens.  The main loop keeps
//! refreshing the display in between.

use core::convert::Infallible;

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::clock::{ClockTime, SharedClock};
use crate::ramp::{Direction, Ramp};
use crate::settings::Settings;

/// Button levels sampled on one pass of the main loop, `true` = pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub up: bool,
    pub down: bool,
    pub snooze: bool,
}

impl Buttons {
    fn both_directions(&self) -> bool {
        self.up && self.down
    }
}

/// Something the user would notice, reported by [`TimeSetter::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Up and down went down together; the hold timer started.
    Arming,
    /// The hold was broken before it completed.
    Disarmed,
    /// The hold completed; waiting for the buttons to be let go.
    Armed,
    /// Buttons released, up/down now move the minutes.
    Ready,
    /// Minutes moved; carries the new time.
    Adjusted(ClockTime),
    /// Snooze pressed; carries the time that was set.
    Confirmed(ClockTime),
    /// Confirmation finished and snooze released.
    Done,
}

impl uDisplay for Event {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Event::Arming => f.write_str("arming"),
            Event::Disarmed => f.write_str("disarmed"),
            Event::Armed => f.write_str("armed"),
            Event::Ready => f.write_str("setting"),
            Event::Adjusted(time) => uwrite!(f, "set {}", time),
            Event::Confirmed(time) => uwrite!(f, "confirmed {}", time),
            Event::Done => f.write_str("done"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    ArmCheck {
        since: u32,
    },
    AwaitRelease,
    Adjusting {
        ramp: Ramp,
        since: u32,
        pause: u32,
    },
    Confirming {
        flashes: u8,
        lit: bool,
        since: u32,
    },
    AwaitSnoozeRelease,
}

/// The up/down/snooze state machine.
pub struct TimeSetter {
    state: State,
    settings: Settings,
}

fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

impl TimeSetter {
    pub fn new(settings: &Settings) -> Self {
        TimeSetter {
            state: State::Idle,
            settings: *settings,
        }
    }

    /// False while the confirmation flash is in a dark phase.
    pub fn display_enabled(&self) -> bool {
        !matches!(self.state, State::Confirming { lit: false, .. })
    }

    /// Advance the state machine.
    ///
    /// `now` is a free-running millisecond counter; it may wrap.  Minute
    /// changes go through `clock` so they cannot interleave with a tick.
    pub fn poll<C: SharedClock>(
        &mut self,
        buttons: Buttons,
        now: u32,
        clock: &C,
    ) -> nb::Result<Event, Infallible> {
        match self.state {
            State::Idle => {
                if buttons.both_directions() {
                    self.state = State::ArmCheck { since: now };
                    return Ok(Event::Arming);
                }
            }
            State::ArmCheck { since } => {
                if !buttons.both_directions() {
                    self.state = State::Idle;
                    return Ok(Event::Disarmed);
                }
                if elapsed(now, since) >= self.settings.arm_hold_ms {
                    self.state = State::AwaitRelease;
                    return Ok(Event::Armed);
                }
            }
            State::AwaitRelease => {
                if !buttons.up && !buttons.down {
                    self.state = State::Adjusting {
                        ramp: Ramp::new(self.settings.ramp_threshold, self.settings.ramp_max_step),
                        since: now,
                        pause: 0,
                    };
                    return Ok(Event::Ready);
                }
            }
            State::Adjusting { ramp, since, pause } => {
                if elapsed(now, since) < pause {
                    return Err(nb::Error::WouldBlock);
                }
                return self.adjust(ramp, buttons, now, clock);
            }
            State::Confirming {
                flashes,
                lit,
                since,
            } => {
                let t = elapsed(now, since);
                if lit && t >= self.settings.confirm_lit_ms {
                    self.state = State::Confirming {
                        flashes,
                        lit: false,
                        since: now,
                    };
                } else if !lit && t >= self.settings.confirm_dark_ms {
                    let flashes = flashes + 1;
                    self.state = if flashes >= self.settings.confirm_flashes {
                        State::AwaitSnoozeRelease
                    } else {
                        State::Confirming {
                            flashes,
                            lit: true,
                            since: now,
                        }
                    };
                }
            }
            State::AwaitSnoozeRelease => {
                if !buttons.snooze {
                    self.state = State::Idle;
                    return Ok(Event::Done);
                }
            }
        }
        Err(nb::Error::WouldBlock)
    }

    fn adjust<C: SharedClock>(
        &mut self,
        mut ramp: Ramp,
        buttons: Buttons,
        now: u32,
        clock: &C,
    ) -> nb::Result<Event, Infallible> {
        if buttons.snooze {
            self.state = State::Confirming {
                flashes: 0,
                lit: true,
                since: now,
            };
            return Ok(Event::Confirmed(clock.snapshot()));
        }

        let mut moves = 0;
        let mut time = None;
        if buttons.up {
            let step = ramp.press(Direction::Up);
            time = Some(clock.modify(|t| {
                t.add_minutes(step);
                *t
            }));
            moves += 1;
        }
        if buttons.down {
            let step = ramp.press(Direction::Down);
            time = Some(clock.modify(|t| {
                t.sub_minutes(step);
                *t
            }));
            moves += 1;
        }

        match time {
            Some(time) => {
                self.state = State::Adjusting {
                    ramp,
                    since: now,
                    pause: self.settings.adjust_interval_ms * moves,
                };
                Ok(Event::Adjusted(time))
            }
            None => {
                ramp.release();
                self.state = State::Adjusting {
                    ramp,
                    since: now,
                    pause: 0,
                };
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Meridiem;
    use core::cell::Cell;

    const UP: Buttons = Buttons {
        up: true,
        down: false,
        snooze: false,
    };
    const DOWN: Buttons = Buttons {
        up: false,
        down: true,
        snooze: false,
    };
    const BOTH: Buttons = Buttons {
        up: true,
        down: true,
        snooze: false,
    };
    const SNOOZE: Buttons = Buttons {
        up: false,
        down: false,
        snooze: true,
    };
    const NONE: Buttons = Buttons {
        up: false,
        down: false,
        snooze: false,
    };

    fn setting(setter: &TimeSetter) -> bool {
        !matches!(setter.state, State::Idle | State::ArmCheck { .. })
    }

    fn clock_at(h: u8, m: u8, meridiem: Meridiem) -> Cell<ClockTime> {
        Cell::new(ClockTime::new(h, m, 0, meridiem).unwrap())
    }

    /// Walk a fresh setter through the 2s hold and release.
    fn armed(clock: &Cell<ClockTime>) -> (TimeSetter, u32) {
        let mut setter = TimeSetter::new(&Settings::default());
        assert_eq!(setter.poll(BOTH, 0, clock), Ok(Event::Arming));
        assert_eq!(setter.poll(BOTH, 1999, clock), Err(nb::Error::WouldBlock));
        assert_eq!(setter.poll(BOTH, 2000, clock), Ok(Event::Armed));
        assert_eq!(setter.poll(BOTH, 2100, clock), Err(nb::Error::WouldBlock));
        assert_eq!(setter.poll(NONE, 2200, clock), Ok(Event::Ready));
        assert!(setting(&setter));
        (setter, 2200)
    }

    #[test]
    fn single_buttons_do_nothing_when_idle() {
        let clock = Cell::new(ClockTime::EPOCH);
        let mut setter = TimeSetter::new(&Settings::default());
        for (i, b) in [UP, DOWN, SNOOZE, NONE].into_iter().enumerate() {
            assert_eq!(setter.poll(b, i as u32 * 500, &clock), Err(nb::Error::WouldBlock));
        }
        assert!(!setting(&setter));
        assert_eq!(clock.get(), ClockTime::EPOCH);
    }

    #[test]
    fn short_hold_disarms() {
        let clock = Cell::new(ClockTime::EPOCH);
        let mut setter = TimeSetter::new(&Settings::default());
        assert_eq!(setter.poll(BOTH, 100, &clock), Ok(Event::Arming));
        assert_eq!(setter.poll(UP, 1500, &clock), Ok(Event::Disarmed));
        assert!(!setting(&setter));
        // Still holding up alone after disarm changes nothing.
        assert_eq!(setter.poll(UP, 2500, &clock), Err(nb::Error::WouldBlock));
        assert_eq!(clock.get(), ClockTime::EPOCH);
    }

    #[test]
    fn hold_survives_millis_wrap() {
        let clock = Cell::new(ClockTime::EPOCH);
        let mut setter = TimeSetter::new(&Settings::default());
        let start = u32::MAX - 500;
        assert_eq!(setter.poll(BOTH, start, &clock), Ok(Event::Arming));
        assert_eq!(setter.poll(BOTH, 1000, &clock), Err(nb::Error::WouldBlock));
        assert_eq!(setter.poll(BOTH, 1500, &clock), Ok(Event::Armed));
    }

    #[test]
    fn does_not_adjust_until_released() {
        let clock = Cell::new(ClockTime::EPOCH);
        let mut setter = TimeSetter::new(&Settings::default());
        setter.poll(BOTH, 0, &clock).ok();
        setter.poll(BOTH, 2000, &clock).ok();
        // One button let go, the other still held: not yet.
        assert_eq!(setter.poll(UP, 2500, &clock), Err(nb::Error::WouldBlock));
        assert_eq!(clock.get(), ClockTime::EPOCH);
    }

    #[test]
    fn up_adds_and_waits_between_polls() {
        let clock = clock_at(3, 10, Meridiem::Pm);
        let (mut setter, t) = armed(&clock);

        let Ok(Event::Adjusted(time)) = setter.poll(UP, t, &clock) else {
            panic!("expected an adjustment");
        };
        assert_eq!(time.minutes(), 11);
        // Held, but inside the 100ms pause.
        assert_eq!(setter.poll(UP, t + 50, &clock), Err(nb::Error::WouldBlock));
        assert_eq!(clock.get().minutes(), 11);
        assert!(setter.poll(UP, t + 100, &clock).is_ok());
        assert_eq!(clock.get().minutes(), 12);
    }

    #[test]
    fn holding_down_ramps() {
        let clock = clock_at(12, 30, Meridiem::Pm);
        let (mut setter, t) = armed(&clock);

        for i in 0..7 {
            assert!(setter.poll(DOWN, t + i * 100, &clock).is_ok());
        }
        let time = clock.get();
        assert_eq!((time.hours(), time.minutes()), (12, 21));
        assert_eq!(time.meridiem(), Meridiem::Pm);
    }

    #[test]
    fn letting_go_resets_the_ramp() {
        let clock = clock_at(1, 0, Meridiem::Am);
        let (mut setter, t) = armed(&clock);

        for i in 0..6 {
            setter.poll(UP, t + i * 100, &clock).ok();
        }
        assert_eq!(clock.get().minutes(), 7);
        setter.poll(NONE, t + 600, &clock).ok();
        setter.poll(UP, t + 700, &clock).ok();
        assert_eq!(clock.get().minutes(), 8);
    }

    #[test]
    fn both_directions_pause_twice() {
        let clock = clock_at(5, 20, Meridiem::Am);
        let (mut setter, t) = armed(&clock);

        assert!(setter.poll(BOTH, t, &clock).is_ok());
        assert_eq!(clock.get().minutes(), 20);
        assert_eq!(setter.poll(BOTH, t + 150, &clock), Err(nb::Error::WouldBlock));
        assert!(setter.poll(BOTH, t + 200, &clock).is_ok());
    }

    #[test]
    fn snooze_confirms_and_flashes() {
        let clock = clock_at(6, 45, Meridiem::Pm);
        let (mut setter, t) = armed(&clock);

        let expected = clock.get();
        assert_eq!(setter.poll(SNOOZE, t, &clock), Ok(Event::Confirmed(expected)));

        let mut dark_phases = 0;
        let mut was_enabled = true;
        let mut now = t;
        let mut done = None;
        while now < t + 2000 {
            now += 10;
            if let Ok(event) = setter.poll(SNOOZE, now, &clock) {
                done = Some(event);
            }
            if was_enabled && !setter.display_enabled() {
                dark_phases += 1;
            }
            was_enabled = setter.display_enabled();
        }
        assert_eq!(dark_phases, 3);
        // Snooze still held: not finished yet.
        assert_eq!(done, None);
        assert!(setting(&setter));

        assert_eq!(setter.poll(NONE, now + 10, &clock), Ok(Event::Done));
        assert!(!setting(&setter));
        assert!(setter.display_enabled());
        assert_eq!(clock.get(), expected);
    }

    #[test]
    fn confirmation_timing() {
        let clock = Cell::new(ClockTime::EPOCH);
        let (mut setter, t) = armed(&clock);
        setter.poll(SNOOZE, t, &clock).ok();

        // lit 100ms, dark 250ms, three times over.
        for flash in 0..3 {
            let start = t + flash * 350;
            setter.poll(SNOOZE, start + 99, &clock).ok();
            assert!(setter.display_enabled(), "flash {flash} lit");
            setter.poll(SNOOZE, start + 100, &clock).ok();
            assert!(!setter.display_enabled(), "flash {flash} dark");
            setter.poll(SNOOZE, start + 349, &clock).ok();
            assert!(!setter.display_enabled());
            setter.poll(SNOOZE, start + 350, &clock).ok();
            assert!(setter.display_enabled());
        }
        assert_eq!(setter.poll(NONE, t + 1100, &clock), Ok(Event::Done));
    }

    #[test]
    fn shortened_timings() {
        let clock = clock_at(8, 0, Meridiem::Am);
        let settings = Settings::default()
            .with_arm_hold(500)
            .with_adjust_interval(20);
        let mut setter = TimeSetter::new(&settings);

        assert_eq!(setter.poll(BOTH, 0, &clock), Ok(Event::Arming));
        assert_eq!(setter.poll(BOTH, 499, &clock), Err(nb::Error::WouldBlock));
        assert_eq!(setter.poll(BOTH, 500, &clock), Ok(Event::Armed));
        assert_eq!(setter.poll(NONE, 510, &clock), Ok(Event::Ready));

        assert!(setter.poll(UP, 510, &clock).is_ok());
        assert_eq!(setter.poll(UP, 529, &clock), Err(nb::Error::WouldBlock));
        assert!(setter.poll(UP, 530, &clock).is_ok());
        assert_eq!(clock.get().minutes(), 2);
    }

    #[test]
    fn widest_ramp_cap_never_overflows() {
        let clock = clock_at(4, 0, Meridiem::Am);
        let settings = Settings {
            ramp_threshold: 0,
            ramp_max_step: u8::MAX,
            ..Settings::default()
        };
        let mut setter = TimeSetter::new(&settings);
        setter.poll(BOTH, 0, &clock).ok();
        setter.poll(BOTH, 2000, &clock).ok();
        setter.poll(NONE, 2000, &clock).ok();

        for n in 0..300 {
            assert!(setter.poll(DOWN, 2000 + n * 100, &clock).is_ok());
        }
        let t = clock.get();
        assert!((1..=12).contains(&t.hours()));
        assert!(t.minutes() <= 59);
    }

    #[test]
    fn event_log_lines() {
        struct Out(String);
        impl uWrite for Out {
            type Error = Infallible;
            fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
                self.0.push_str(s);
                Ok(())
            }
        }

        let mut out = Out(String::new());
        let time = ClockTime::new(4, 2, 0, Meridiem::Pm).unwrap();
        ufmt::uwrite!(&mut out, "{}", Event::Adjusted(time)).unwrap();
        assert_eq!(out.0, "set 4:02:00 PM");
    }
}
