//! Register level access to the bus the MPR121 sits on.
//!
//! The driver only needs three SMBus style primitives: read a byte, read a little-endian
//! word and write a byte. On a Raspberry Pi these map directly to `rppal`'s SMBus calls.
//! Anything else that implements the `embedded_hal` blocking I2C traits can be used
//! through [`HalBus`].
use embedded_hal::blocking::i2c::{Write, WriteRead};
use rppal::i2c::{self, I2c};
use std::fmt::Debug;

/// A session on an open bus.
///
/// Every call names the device address, so one session can talk to any chip on the
/// segment. The driver itself only ever uses the address of its own sensor.
pub trait Bus {
    type Error: Debug;

    /// Read the byte at `register`.
    fn read_u8(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;

    /// Read `register` (low byte) and `register + 1` (high byte).
    fn read_u16_le(&mut self, address: u8, register: u8) -> Result<u16, Self::Error>;

    /// Write `value` to `register`.
    fn write_u8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;
}

/// A bus that can be opened from a bus number, like `/dev/i2c-1`.
pub trait OpenBus: Bus + Sized {
    fn open(bus: u8) -> Result<Self, Self::Error>;
}

impl Bus for I2c {
    type Error = i2c::Error;

    fn read_u8(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        self.set_slave_address(u16::from(address))?;
        self.smbus_read_byte(register)
    }

    fn read_u16_le(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        // SMBus words are sent low byte first, which is the MPR121 register order.
        self.set_slave_address(u16::from(address))?;
        self.smbus_read_word(register)
    }

    fn write_u8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.set_slave_address(u16::from(address))?;
        self.smbus_write_byte(register, value)
    }
}

impl OpenBus for I2c {
    fn open(bus: u8) -> Result<Self, Self::Error> {
        debug!("Opening I2C bus {}", bus);
        I2c::with_bus(bus)
    }
}

/// Adapter for any blocking `embedded_hal` I2C implementation.
///
/// Useful on hosts other than a Raspberry Pi, or when the sensor sits behind a
/// multiplexer. Use it with [`Mpr121::with_session`](crate::Mpr121::with_session).
pub struct HalBus<I2C> {
    i2c: I2C,
}

impl<I2C> HalBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        HalBus { i2c }
    }

    /// Gives back the wrapped I2C peripheral.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Bus for HalBus<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: Debug,
{
    type Error = E;

    fn read_u8(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        let mut buff = [0u8; 1];
        self.i2c.write_read(address, &[register], &mut buff)?;
        Ok(buff[0])
    }

    fn read_u16_le(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        let mut buff = [0u8; 2];
        self.i2c.write_read(address, &[register], &mut buff)?;
        Ok(u16::from_le_bytes(buff))
    }

    fn write_u8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(address, &[register, value])
    }
}
