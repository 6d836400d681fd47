//! Reads the touch state of all 12 pins every 100ms.
//!
//! Run on a Raspberry Pi with the MPR121 at 0x5A on I2C bus 1.
use embedded_hal::blocking::delay::DelayMs;
use mpr121::{regs, Mpr121};
use rppal::hal::Delay;
use rppal::i2c::I2c;
use std::error::Error;

const POLL_INTERVAL_MS: u32 = 100;

fn main() -> Result<(), Box<dyn Error>> {
    let mut sensor: Mpr121<I2c> = Mpr121::new(regs::MPR121_I2CADDR_DEFAULT, regs::MPR121_BUS_DEFAULT);
    sensor.initialize()?;
    println!("Press Ctrl-C to quit.");

    let mut delay = Delay::new();
    loop {
        let mut pins = Vec::with_capacity(regs::ELECTRODE_COUNT as usize);
        for pin in 0..regs::ELECTRODE_COUNT {
            pins.push(sensor.is_touched(pin)?);
        }
        println!("{:?}", pins);
        delay.delay_ms(POLL_INTERVAL_MS);
    }
}
