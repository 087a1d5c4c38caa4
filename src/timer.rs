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
//! The three hardware timers.
//!
//! * TC0: millisecond counter for the button state machine (`millis()`).
//! * TC1: the 1 Hz clock tick.
//! * TC2: display refresh request, every 16.384 ms.
//!
//! The millis part is based on https://blog.rahix.de/005-avr-hal-millis/
//! (license assumed to be MIT, as avr-hal's examples).
use avr_device::interrupt::Mutex;
use core::cell;

use timebox::{ClockTime, SharedClock};

// Possible Values:
//
// ╔═══════════╦══════════════╦═══════════════════╗
// ║ PRESCALER ║ TIMER_COUNTS ║ Overflow Interval ║
// ╠═══════════╬══════════════╬═══════════════════╣
// ║        64 ║          250 ║              1 ms ║
// ║       256 ║          125 ║              2 ms ║
// ║       256 ║          250 ║              4 ms ║
// ║      1024 ║          125 ║              8 ms ║
// ║      1024 ║          250 ║             16 ms ║
// ╚═══════════╩══════════════╩═══════════════════╝
const PRESCALER: u32 = 64;
const TIMER_COUNTS: u32 = 250;

const MILLIS_INCREMENT: u32 = PRESCALER * TIMER_COUNTS / 16000;

// Clock = 16MHz, prescaler 1024: 15,625 counts per second.
#[cfg(not(feature = "debug-time"))]
const TICK_COUNTS: u16 = 15_625;
// 1,953 counts: 0.125s per tick, eight times faster than normal time.
#[cfg(feature = "debug-time")]
const TICK_COUNTS: u16 = 1_953;

static MILLIS_COUNTER: Mutex<cell::Cell<u32>> = Mutex::new(cell::Cell::new(0));

static REFRESH_DUE: Mutex<cell::Cell<bool>> = Mutex::new(cell::Cell::new(false));

/// The time of day, written by the tick interrupt and the time-setting code,
/// read by the display.
pub struct SharedTime(Mutex<cell::Cell<ClockTime>>);

impl SharedClock for SharedTime {
    fn modify<R>(&self, f: impl FnOnce(&mut ClockTime) -> R) -> R {
        avr_device::interrupt::free(|cs| self.0.borrow(cs).modify(f))
    }
}

pub static CLOCK: SharedTime = SharedTime(Mutex::new(cell::Cell::new(ClockTime::EPOCH)));

/// Timer/Counter 0 Compare Match A interrupt service routine.
#[avr_device::interrupt(atmega168)]
fn TIMER0_COMPA() {
    avr_device::interrupt::free(|cs| {
        let counter_cell = MILLIS_COUNTER.borrow(cs);
        let counter = counter_cell.get();
        counter_cell.set(counter.wrapping_add(MILLIS_INCREMENT));
    })
}

/// Timer/Counter 1 Compare Match A: one second has passed.
#[avr_device::interrupt(atmega168)]
fn TIMER1_COMPA() {
    CLOCK.modify(ClockTime::tick);
}

/// Timer/Counter 2 Overflow: time to draw the display again.
#[avr_device::interrupt(atmega168)]
fn TIMER2_OVF() {
    avr_device::interrupt::free(|cs| REFRESH_DUE.borrow(cs).set(true));
}

/// Return the number of milliseconds counted since `init_tc0()` has been called.
pub fn millis() -> u32 {
    avr_device::interrupt::free(|cs| MILLIS_COUNTER.borrow(cs).get())
}

/// Clear and return the pending refresh request.
pub fn take_refresh() -> bool {
    avr_device::interrupt::free(|cs| REFRESH_DUE.borrow(cs).replace(false))
}

/// Initialise Timer/Counter 0 for counting milliseconds.
/// Configures the TC0 timer for the interval defined by consts PRESCALER and TIMER_COUNTS (in CTC mode).
// More explanation on the atmega168 timer at https://protostack.com.au/2010/09/timer-interrupts-on-an-atmega168/
pub fn init_tc0(tc0: &arduino_hal::pac::TC0) {
    // Set overflow behaviour of the timer in TCCR0A to Clear Timer on Compare mode.
    // Use TIMER0_COMPA interrupt as a result.
    tc0.tccr0a.write(|w| w.wgm0().ctc());

    // The counter runs 0..=OCR0A, so the compare value is one less than the count.
    tc0.ocr0a.write(|w| w.bits((TIMER_COUNTS - 1) as u8));

    tc0.tccr0b.write(|w| match PRESCALER {
        1 => w.cs0().direct(),
        8 => w.cs0().prescale_8(),
        64 => w.cs0().prescale_64(),
        256 => w.cs0().prescale_256(),
        1024 => w.cs0().prescale_1024(),
        _ => panic!(),
    });

    // Enable compare interrupt in TIMSK0.  From this point on when the timer matches and interrupts are enabled, the ISR will run.
    tc0.timsk0.write(|w| w.ocie0a().set_bit());

    // Reset the counter.
    avr_device::interrupt::free(|cs| {
        MILLIS_COUNTER.borrow(cs).set(0);
    });
}

/// Initialise Timer/Counter 1 as the seconds counter.
///
/// CTC mode reloads the counter in hardware, so the next second is already
/// counting while the tick handler runs.
pub fn init_tc1(tc1: &arduino_hal::pac::TC1) {
    tc1.tccr1a.write(|w| w.wgm1().bits(0b00));
    tc1.tccr1b.write(|w| w.cs1().prescale_1024().wgm1().bits(0b01));
    tc1.ocr1a.write(|w| w.bits(TICK_COUNTS - 1));
    tc1.timsk1.write(|w| w.ocie1a().set_bit());
}

/// Initialise Timer/Counter 2 for display refresh.
///
/// Free running with prescaler 1024: 1 count = 64us, overflow every 256
/// counts, 16.384 ms.
pub fn init_tc2(tc2: &arduino_hal::pac::TC2) {
    tc2.tccr2b.write(|w| w.cs2().prescale_1024());
    tc2.timsk2.write(|w| w.toie2().set_bit());

    avr_device::interrupt::free(|cs| {
        REFRESH_DUE.borrow(cs).set(false);
    });
}
