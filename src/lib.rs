//! Library for reading touch data from the NXP MPR121 capacitive touch controller.
//!
//! The implementation follows the [Adafruit Python MPR121 library](https://github.com/adafruit/Adafruit_Python_MPR121):
//! soft reset, a readback of `CONFIG2` to check that the chip is there, then the datasheet
//! default configuration with all 12 electrodes enabled.
//!
//! The library is written for a Raspberry Pi and talks to the chip over `rppal`'s I2C.
//! Any other blocking `embedded_hal` I2C implementation can be used through [`HalBus`].
//!
//! ## Example
//!
//! ```rust, ignore
//! pub fn main() {
//!    use mpr121::Mpr121;
//!    use rppal::hal::Delay;
//!    use embedded_hal::blocking::delay::DelayMs;
//!
//!    let mut sensor: Mpr121 = Mpr121::new(0x5A, 1);
//!    sensor.initialize().unwrap();
//!
//!    let mut delay = Delay::new();
//!    loop {
//!        let touched = sensor.touched().unwrap();
//!        println!("Touched pins: {:012b}", touched);
//!        delay.delay_ms(100u32);
//!    }
//!}
//! ```
//!
//! ## Threads
//!
//! Every operation is a blocking bus transaction and takes `&mut self`. There is no
//! internal locking; wrap the sensor in a `Mutex` to share it between threads.
//!
//! ## Debugging
//!
//! The reset sequence logs through `debug!`. Attaching a logger and setting
//! `RUST_LOG=debug` will show each step and the `CONFIG2` value the chip reported.
//!
use rppal::i2c::I2c;
use std::convert::TryFrom;
#[macro_use]
extern crate log;
use thiserror::Error;

pub mod bus;
#[cfg(test)]
mod fake_bus;
pub mod regs;

pub use bus::{Bus, HalBus, OpenBus};
use regs::defaults;

pub type Result<T, E> = std::result::Result<T, Mpr121Err<E>>;

/// Where a sensor handle is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, the chip has not been configured yet.
    Uninitialized,
    /// The reset sequence completed and the electrodes are running.
    Ready,
    /// Initialization failed. No further I/O is issued; take the session back with
    /// [`Mpr121::release`] and construct a new handle to try again.
    Failed,
}

/// One MPR121 chip.
///
/// The handle owns its bus session exclusively. Nothing is read or written until
/// [`initialize`](Mpr121::initialize) (or [`reset`](Mpr121::reset) for a handle created
/// with [`with_session`](Mpr121::with_session)).
pub struct Mpr121<B = I2c> {
    address: u8,
    bus: u8,
    session: Option<B>,
    state: State,
}

impl<B> Mpr121<B> {
    /// Creates a handle for the chip at `address` on I2C bus `bus`. No I/O happens here.
    pub fn new(address: u8, bus: u8) -> Self {
        Mpr121 {
            address,
            bus,
            session: None,
            state: State::Uninitialized,
        }
    }

    /// Creates a handle from an already open bus session. Useful if the sensor sits
    /// behind a multiplexer or the bus is not a Raspberry Pi I2C bus.
    ///
    /// `bus` is only reported back by [`bus`](Mpr121::bus); the session is never
    /// reopened. The chip still needs to be configured with [`reset`](Mpr121::reset).
    pub fn with_session(address: u8, bus: u8, session: B) -> Self {
        Mpr121 {
            address,
            bus,
            session: Some(session),
            state: State::Uninitialized,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn bus(&self) -> u8 {
        self.bus
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// Tears down the handle and gives back the bus session, if one is open. A handle
    /// that failed initialization still hands back its session.
    pub fn release(self) -> Option<B> {
        self.session
    }
}

impl<B> Default for Mpr121<B> {
    /// Address 0x5A on bus 1.
    fn default() -> Self {
        Mpr121::new(regs::MPR121_I2CADDR_DEFAULT, regs::MPR121_BUS_DEFAULT)
    }
}

impl<B: OpenBus> Mpr121<B> {
    /// Opens the bus and runs the reset sequence.
    ///
    /// Calling this again on a ready sensor reuses the open session and repeats the same
    /// sequence.
    ///
    /// # Errors
    /// `Mpr121Err::Transport` if the bus can't be opened or a transfer fails,
    /// `Mpr121Err::DeviceNotFound` if the chip doesn't answer like an MPR121 and
    /// `Mpr121Err::NotConnected` if the handle has already failed.
    pub fn initialize(&mut self) -> Result<(), B::Error> {
        if self.state == State::Failed {
            return Err(Mpr121Err::NotConnected);
        }

        if self.session.is_none() {
            debug!("Connecting to bus {}, adr: {:#X}", self.bus, self.address);
            match B::open(self.bus) {
                Ok(session) => self.session = Some(session),
                Err(e) => {
                    debug!("Couldn't open bus {}: {:?}", self.bus, e);
                    self.state = State::Failed;
                    return Err(Mpr121Err::Transport(e));
                }
            }
        }

        self.reset()
    }
}

impl<B: Bus> Mpr121<B> {
    /// Soft resets the chip and writes the default configuration.
    ///
    /// Any failure abandons the sequence at that step and leaves the handle in
    /// `State::Failed`. The session stays with the handle until [`release`](Mpr121::release).
    pub fn reset(&mut self) -> Result<(), B::Error> {
        if self.state == State::Failed || self.session.is_none() {
            return Err(Mpr121Err::NotConnected);
        }

        match init::configure(self) {
            Ok(()) => {
                debug!("MPR121 at {:#X} ready", self.address);
                self.state = State::Ready;
                Ok(())
            }
            Err(e) => {
                debug!("Initialization of {:#X} failed: {}", self.address, e);
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    /// Sets the touch and release threshold of all 13 channels (the 12 electrodes and
    /// the proximity channel).
    ///
    /// # Errors
    /// `Mpr121Err::ThresholdOutOfRange` if either value is above 255. Nothing is written
    /// in that case.
    pub fn set_thresholds(&mut self, touch: u16, release: u16) -> Result<(), B::Error> {
        let touch = Self::threshold(touch)?;
        let release = Self::threshold(release)?;
        self.ensure_ready()?;
        self.write_thresholds(touch, release)
    }

    /// Touch state of all pins as a 12-bit value where bit `n` is set if pin `n` is
    /// touched.
    pub fn touched(&mut self) -> Result<u16, B::Error> {
        self.ensure_ready()?;
        let t = self.read16(regs::MPR121_TOUCHSTATUS_L)?;
        Ok(t & regs::TOUCH_STATUS_MASK)
    }

    /// Returns `true` if `pin` is being touched.
    ///
    /// Pins outside 0-11 are never touched: they return `Ok(false)` without reading
    /// anything. Each call reads the status registers again.
    pub fn is_touched(&mut self, pin: u8) -> Result<bool, B::Error> {
        if pin >= regs::ELECTRODE_COUNT {
            return Ok(false);
        }
        let t = self.touched()?;
        Ok(t & (1 << pin) != 0)
    }

    /// Filtered data register value for `pin` (0-11). Useful for debugging.
    pub fn filtered_data(&mut self, pin: u8) -> Result<u16, B::Error> {
        Self::check_pin(pin)?;
        self.ensure_ready()?;
        self.read16(regs::MPR121_FILTDATA_0L + pin * 2)
    }

    /// Baseline value for `pin` (0-11). Useful for debugging.
    ///
    /// The chip only stores the top 8 bits of the 10-bit baseline, so the low two bits
    /// are always 0.
    pub fn baseline_data(&mut self, pin: u8) -> Result<u16, B::Error> {
        Self::check_pin(pin)?;
        self.ensure_ready()?;
        let bl = self.read8(regs::MPR121_BASELINE_0 + pin)?;
        Ok(u16::from(bl) << 2)
    }

    /// Raw `CONFIG2` register.
    pub fn config(&mut self) -> Result<u8, B::Error> {
        self.ensure_ready()?;
        self.read8(regs::MPR121_CONFIG2)
    }

    fn threshold(value: u16) -> Result<u8, B::Error> {
        u8::try_from(value).map_err(|_| Mpr121Err::ThresholdOutOfRange(value))
    }

    fn check_pin(pin: u8) -> Result<(), B::Error> {
        if pin < regs::ELECTRODE_COUNT {
            Ok(())
        } else {
            Err(Mpr121Err::PinOutOfRange(pin))
        }
    }

    fn ensure_ready(&self) -> Result<(), B::Error> {
        if self.state == State::Ready {
            Ok(())
        } else {
            Err(Mpr121Err::NotConnected)
        }
    }

    fn write_thresholds(&mut self, touch: u8, release: u8) -> Result<(), B::Error> {
        debug!("Setting thresholds touch: {}, release: {}", touch, release);
        for i in 0..regs::THRESHOLD_CHANNELS {
            self.write8(regs::MPR121_TOUCHTH_0 + 2 * i, touch)?;
            self.write8(regs::MPR121_RELEASETH_0 + 2 * i, release)?;
        }
        Ok(())
    }

    fn session(&mut self) -> Result<&mut B, B::Error> {
        self.session.as_mut().ok_or(Mpr121Err::NotConnected)
    }

    fn read8(&mut self, reg: u8) -> Result<u8, B::Error> {
        let address = self.address;
        self.session()?.read_u8(address, reg).map_err(Mpr121Err::Transport)
    }

    fn read16(&mut self, reg: u8) -> Result<u16, B::Error> {
        let address = self.address;
        self.session()?.read_u16_le(address, reg).map_err(Mpr121Err::Transport)
    }

    fn write8(&mut self, reg: u8, value: u8) -> Result<(), B::Error> {
        let address = self.address;
        self.session()?.write_u8(address, reg, value).map_err(Mpr121Err::Transport)
    }
}

mod init {
    use super::*;

    /// The register sequence that takes the chip from power-on to running electrodes.
    pub fn configure<B: Bus>(sensor: &mut Mpr121<B>) -> Result<(), B::Error> {
        debug!("Soft reset of {:#X}", sensor.address);
        sensor.write8(regs::MPR121_SOFTRESET, regs::SOFTRESET_VALUE)?;
        // Filter and threshold registers can only be written in stop mode.
        sensor.write8(regs::MPR121_ECR, defaults::ECR_STOP)?;

        let c = sensor.read8(regs::MPR121_CONFIG2)?;
        debug!("Got CONFIG2: {:#X}", c);
        if c != regs::CONFIG2_RESET_VALUE {
            return Err(Mpr121Err::DeviceNotFound(c));
        }

        sensor.write_thresholds(defaults::TOUCH_THRESHOLD, defaults::RELEASE_THRESHOLD)?;
        for &(reg, value) in defaults::BASELINE_FILTER.iter() {
            sensor.write8(reg, value)?;
        }
        sensor.write8(regs::MPR121_DEBOUNCE, defaults::DEBOUNCE)?;
        sensor.write8(regs::MPR121_CONFIG1, defaults::CONFIG1)?;
        sensor.write8(regs::MPR121_CONFIG2, defaults::CONFIG2)?;
        sensor.write8(regs::MPR121_ECR, defaults::ECR_RUN)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum Mpr121Err<E> {
    #[error("MPR121 not found. Check address, bus and wiring. (CONFIG2 was {0:#04X}, expected 0x24)")]
    DeviceNotFound(u8),
    #[error("Pin {0} out of range. Expected 0-11")]
    PinOutOfRange(u8),
    #[error("Threshold {0} out of range. Expected 0-255")]
    ThresholdOutOfRange(u16),
    #[error("Sensor not connected. Initialize it first.")]
    NotConnected,
    #[error("I2C connection error. {0:?}")]
    Transport(E),
}
