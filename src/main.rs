/*
 timebox

 Firmware for a 4-digit 7-segment alarm clock (ClockIt layout).  Keeps
 12-hour time from a 1 Hz timer, multiplexes the display by software PWM,
 and sets the time from three buttons.

 Target: ATmega168, clock at 16 MHz.

 This library is free software: you can redistribute it and/or modify
 it under the terms of the GNU General Public License as published by
 the Free Software Foundation, either version 3 of the License, or
 (at your option) any later version.

 This library is distributed in the hope that it will be useful,
 but WITHOUT ANY WARRANTY; without even the implied warranty of
 MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 GNU General Public License for more details.

 You should have received a copy of the GNU General Public License
 along with this library.  If not, see <http://www.gnu.org/licenses/>.

 */

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

mod board;
#[cfg(feature = "panic-serial")]
mod panic;
mod timer;

#[cfg(not(feature = "panic-serial"))]
use panic_halt as _;

use arduino_hal::prelude::*;

use timebox::display::Display;
use timebox::{DisplayMode, Frame, Settings, SharedClock, TimeSetter};

#[cfg(not(feature = "debug-time"))]
const DISPLAY_MODE: DisplayMode = DisplayMode::HoursMinutes;
#[cfg(feature = "debug-time")]
const DISPLAY_MODE: DisplayMode = DisplayMode::MinutesSeconds;

const BAUD_RATE: u32 = 57600;

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);

    // USART0 shares PD0/PD1 with the first two digit selects.
    #[cfg(feature = "console")]
    let mut console = arduino_hal::default_serial!(dp, pins, BAUD_RATE);
    #[cfg(feature = "console")]
    let (dig1, dig2) = (None, None);

    #[cfg(not(feature = "console"))]
    let mut console = board::Silent;
    #[cfg(not(feature = "console"))]
    let (dig1, dig2) = (
        Some(pins.d0.into_output().downgrade()),
        Some(pins.d1.into_output().downgrade()),
    );

    let settings = Settings::default();

    let mut display = Display::new(
        board::Board {
            segments: [
                pins.a3.into_output().downgrade(), // A: PC3
                pins.a5.into_output().downgrade(), // B: PC5
                pins.a2.into_output().downgrade(), // C: PC2
                pins.d2.into_output().downgrade(), // D: PD2
                pins.a0.into_output().downgrade(), // E: PC0
                pins.a1.into_output().downgrade(), // F: PC1
                pins.a4.into_output().downgrade(), // G: PC4
                pins.d5.into_output().downgrade(), // DP: PD5
            ],
            digits: [
                dig1,
                dig2,
                Some(pins.d4.into_output().downgrade()), // PD4
                Some(pins.d6.into_output().downgrade()), // PD6
            ],
            colon: pins.d3.into_output().downgrade(), // PD3
        },
        &settings,
    );
    display.blank();

    let keys = board::Keys {
        up: pins.d13.into_pull_up_input().downgrade(),    // PB5
        down: pins.d12.into_pull_up_input().downgrade(),  // PB4
        snooze: pins.d7.into_pull_up_input().downgrade(), // PD7
    };

    let mut delay = arduino_hal::Delay::new();
    let mut setter = TimeSetter::new(&settings);

    timer::init_tc0(&dp.TC0);
    timer::init_tc1(&dp.TC1);
    timer::init_tc2(&dp.TC2);

    ufmt::uwriteln!(
        &mut console,
        "timebox up at {}\r",
        timer::CLOCK.snapshot()
    )
    .unwrap_infallible();

    // SAFETY: the shared clock and timer state are initialised above, nothing
    // else is pending.
    unsafe { avr_device::interrupt::enable() };

    loop {
        if timer::take_refresh() {
            if setter.display_enabled() {
                let frame = Frame::new(&timer::CLOCK.snapshot(), DISPLAY_MODE);
                display.render(&frame, settings.refresh_cycles, &mut delay);
            } else {
                display.blank();
            }
        }

        if let Ok(event) = setter.poll(keys.read(), timer::millis(), &timer::CLOCK) {
            ufmt::uwriteln!(&mut console, "{}\r", event).unwrap_infallible();
        }
    }
}
