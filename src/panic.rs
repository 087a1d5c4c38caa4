// Based on https://github.com/Rahix/avr-hal/blob/main/examples/arduino-uno/src/bin/uno-panic.rs
// License MIT

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    // disable interrupts - the tick and refresh handlers must not run again
    avr_device::interrupt::disable();

    // re-get the peripherals so we can access serial
    // SAFETY: we're never returning so stealing the peripherals is ok
    let dp = unsafe { arduino_hal::Peripherals::steal() };
    let pins = arduino_hal::pins!(dp);

    // Take the display dark before PD0/PD1 turn into the UART.
    let _ = pins.d3.into_output_high();
    let _ = pins.d4.into_output_high();
    let _ = pins.d6.into_output_high();

    let mut serial = arduino_hal::default_serial!(dp, pins, crate::BAUD_RATE);

    ufmt::uwriteln!(&mut serial, "timebox panic\r").unwrap();

    if let Some(loc) = info.location() {
        ufmt::uwriteln!(
            &mut serial,
            " at {}:{}:{}\r",
            loc.file(),
            loc.line(),
            loc.column(),
        )
        .unwrap();
    }
    loop {}
}
