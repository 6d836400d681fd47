//! MPR121 register map and the datasheet default values written during reset.

/// Default I2C address (ADDR pin tied to GND).
pub const MPR121_I2CADDR_DEFAULT: u8 = 0x5A;
/// Default I2C bus on a Raspberry Pi.
pub const MPR121_BUS_DEFAULT: u8 = 1;

/// Value written to `SOFTRESET` to reset the chip.
pub const SOFTRESET_VALUE: u8 = 0x63;
/// `CONFIG2` reads back as this after a reset. The chip has no ID register,
/// so this is the only way to tell it is there.
pub const CONFIG2_RESET_VALUE: u8 = 0x24;

/// Number of electrodes reporting touch status.
pub const ELECTRODE_COUNT: u8 = 12;
/// Threshold slots, the 12 electrodes plus the proximity channel.
pub const THRESHOLD_CHANNELS: u8 = 13;
/// Electrodes 0-11 occupy the low 12 bits of the touch status.
pub const TOUCH_STATUS_MASK: u16 = 0x0FFF;

pub const MPR121_TOUCHSTATUS_L: u8 = 0x00;
pub const MPR121_TOUCHSTATUS_H: u8 = 0x01;
pub const MPR121_FILTDATA_0L: u8 = 0x04;
pub const MPR121_FILTDATA_0H: u8 = 0x05;
pub const MPR121_BASELINE_0: u8 = 0x1E;
pub const MPR121_MHDR: u8 = 0x2B;
pub const MPR121_NHDR: u8 = 0x2C;
pub const MPR121_NCLR: u8 = 0x2D;
pub const MPR121_FDLR: u8 = 0x2E;
pub const MPR121_MHDF: u8 = 0x2F;
pub const MPR121_NHDF: u8 = 0x30;
pub const MPR121_NCLF: u8 = 0x31;
pub const MPR121_FDLF: u8 = 0x32;
pub const MPR121_NHDT: u8 = 0x33;
pub const MPR121_NCLT: u8 = 0x34;
pub const MPR121_FDLT: u8 = 0x35;
pub const MPR121_TOUCHTH_0: u8 = 0x41;
pub const MPR121_RELEASETH_0: u8 = 0x42;
pub const MPR121_DEBOUNCE: u8 = 0x5B;
pub const MPR121_CONFIG1: u8 = 0x5C;
pub const MPR121_CONFIG2: u8 = 0x5D;
pub const MPR121_CHARGECURR_0: u8 = 0x5F;
pub const MPR121_CHARGETIME_1: u8 = 0x6C;
pub const MPR121_ECR: u8 = 0x5E;
pub const MPR121_AUTOCONFIG0: u8 = 0x7B;
pub const MPR121_AUTOCONFIG1: u8 = 0x7C;
pub const MPR121_UPLIMIT: u8 = 0x7D;
pub const MPR121_LOWLIMIT: u8 = 0x7E;
pub const MPR121_TARGETLIMIT: u8 = 0x7F;
pub const MPR121_GPIODIR: u8 = 0x76;
pub const MPR121_GPIOEN: u8 = 0x77;
pub const MPR121_GPIOSET: u8 = 0x78;
pub const MPR121_GPIOCLR: u8 = 0x79;
pub const MPR121_GPIOTOGGLE: u8 = 0x7A;
pub const MPR121_SOFTRESET: u8 = 0x80;

pub mod defaults {
    //! Configuration written by the reset sequence.
    //!
    //! The baseline filter values are the datasheet default profile. They tune the
    //! chip's internal baseline tracking and are not derived from anything.
    use super::*;

    pub const TOUCH_THRESHOLD: u8 = 12;
    pub const RELEASE_THRESHOLD: u8 = 6;

    /// Baseline filter registers in the order they are written.
    pub const BASELINE_FILTER: [(u8, u8); 11] = [
        // rising
        (MPR121_MHDR, 0x01),
        (MPR121_NHDR, 0x01),
        (MPR121_NCLR, 0x0E),
        (MPR121_FDLR, 0x00),
        // falling
        (MPR121_MHDF, 0x01),
        (MPR121_NHDF, 0x05),
        (MPR121_NCLF, 0x01),
        (MPR121_FDLF, 0x00),
        // touched
        (MPR121_NHDT, 0x00),
        (MPR121_NCLT, 0x00),
        (MPR121_FDLT, 0x00),
    ];

    pub const DEBOUNCE: u8 = 0x00;
    /// 16uA charge current.
    pub const CONFIG1: u8 = 0x10;
    /// 0.5us encoding, 1ms period.
    pub const CONFIG2: u8 = 0x20;
    /// Writing 0 stops all electrodes, which puts the chip in config mode.
    pub const ECR_STOP: u8 = 0x00;
    /// All 12 electrodes enabled, baseline tracking loads the first 5 bits.
    pub const ECR_RUN: u8 = 0x8F;
}
