//! In-memory MPR121 used by the unit tests.
//!
//! Registers live in a 256 byte file. Writing the soft reset value to `SOFTRESET` loads
//! the configured power-on `CONFIG2` value, like the real chip. Every operation is
//! recorded so tests can check exact write sequences.
use crate::bus::{Bus, OpenBus};
use crate::regs;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// The bus number `FakeBus::open` accepts.
pub const FAKE_BUS: u8 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum FakeBusError {
    #[error("no such bus: {0}")]
    NoSuchBus(u8),
    #[error("no device at {0:#X}")]
    Nack(u8),
    #[error("injected failure")]
    Injected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    ReadU8(u8),
    ReadU16(u8),
    WriteU8(u8, u8),
}

struct Chip {
    address: u8,
    regs: [u8; 256],
    config2_after_reset: u8,
    ops: Vec<Op>,
    fail_at: Option<usize>,
}

/// Cloning shares the same chip, so a test can keep a probe after handing the bus to
/// the driver.
#[derive(Clone)]
pub struct FakeBus {
    chip: Rc<RefCell<Chip>>,
}

impl Default for FakeBus {
    fn default() -> Self {
        FakeBus {
            chip: Rc::new(RefCell::new(Chip {
                address: regs::MPR121_I2CADDR_DEFAULT,
                regs: [0; 256],
                config2_after_reset: regs::CONFIG2_RESET_VALUE,
                ops: Vec::new(),
                fail_at: None,
            })),
        }
    }
}

impl FakeBus {
    pub fn new() -> Self {
        FakeBus::default()
    }

    /// Value `CONFIG2` holds after a soft reset. Anything other than 0x24 looks like a
    /// different device.
    pub fn config2_after_reset(self, value: u8) -> Self {
        self.set_config2_after_reset(value);
        self
    }

    /// Changes the power-on `CONFIG2` on the shared chip, as if it were swapped.
    pub fn set_config2_after_reset(&self, value: u8) {
        self.chip.borrow_mut().config2_after_reset = value;
    }

    /// Make the `n`th operation (counting from 0) fail.
    pub fn fail_at(self, n: usize) -> Self {
        self.chip.borrow_mut().fail_at = Some(n);
        self
    }

    pub fn set_reg(&self, register: u8, value: u8) {
        self.chip.borrow_mut().regs[register as usize] = value;
    }

    pub fn reg(&self, register: u8) -> u8 {
        self.chip.borrow().regs[register as usize]
    }

    pub fn ops(&self) -> Vec<Op> {
        self.chip.borrow().ops.clone()
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::WriteU8(reg, value) => Some((reg, value)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_ops(&self) {
        self.chip.borrow_mut().ops.clear();
    }

    fn record(&mut self, address: u8, op: Op) -> Result<(), FakeBusError> {
        let mut chip = self.chip.borrow_mut();
        let n = chip.ops.len();
        chip.ops.push(op);
        if chip.fail_at == Some(n) {
            return Err(FakeBusError::Injected);
        }
        if address != chip.address {
            return Err(FakeBusError::Nack(address));
        }
        Ok(())
    }
}

impl Bus for FakeBus {
    type Error = FakeBusError;

    fn read_u8(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        self.record(address, Op::ReadU8(register))?;
        Ok(self.reg(register))
    }

    fn read_u16_le(&mut self, address: u8, register: u8) -> Result<u16, Self::Error> {
        self.record(address, Op::ReadU16(register))?;
        let low = self.reg(register);
        let high = self.reg(register.wrapping_add(1));
        Ok(u16::from_le_bytes([low, high]))
    }

    fn write_u8(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.record(address, Op::WriteU8(register, value))?;
        let mut chip = self.chip.borrow_mut();
        if register == regs::MPR121_SOFTRESET && value == regs::SOFTRESET_VALUE {
            let config2 = chip.config2_after_reset;
            chip.regs = [0; 256];
            chip.regs[regs::MPR121_CONFIG2 as usize] = config2;
        } else {
            chip.regs[register as usize] = value;
        }
        Ok(())
    }
}

impl OpenBus for FakeBus {
    fn open(bus: u8) -> Result<Self, Self::Error> {
        if bus == FAKE_BUS {
            Ok(FakeBus::new())
        } else {
            Err(FakeBusError::NoSuchBus(bus))
        }
    }
}
