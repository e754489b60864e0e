use crate::settings::DataRate;

const START: u8 = 0b1000_0000;
const MODE_REGISTER_ACCESS: u8 = 0b0100_0000;
const CALIBRATION: u8 = 0b0010_0000;
const READ: u8 = 0b0000_0001;

const ADDRESS_MASK: u8 = 0b0001_1111;
const RATE_MASK: u8 = 0b0000_1111;

/// Top-level framing of a command byte, selected by bit 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Start a conversion or a calibration.
    Conversion,
    /// Read or write the register whose address follows.
    RegisterAccess,
}

/// Builds a command byte.
///
/// In [`Mode::RegisterAccess`] `field` is the 5-bit register address and `flag` selects a
/// read. In [`Mode::Conversion`] `field` is the 4-bit data rate code and `flag` requests a
/// calibration instead of a conversion. Bits outside a field's width are dropped.
///
/// ```text
///  7       6      5    4    3    2    1    0
/// START  MODE   |<------- ADDR ------>|  R/W     register access
/// START  MODE   CAL   0   |<-- RATE ------>|     conversion
/// ```
pub const fn build_command(mode: Mode, field: u8, flag: bool) -> u8 {
    let flag = flag as u8;

    match mode {
        Mode::RegisterAccess => {
            START | MODE_REGISTER_ACCESS | ((field & ADDRESS_MASK) << 1) | (flag * READ)
        }
        Mode::Conversion => START | (flag * CALIBRATION) | (field & RATE_MASK),
    }
}

/// The command bytes the driver sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Read the register at the given address.
    ReadRegister(u8),
    /// Write the register at the given address.
    WriteRegister(u8),
    /// Start a conversion at the given rate.
    Convert(DataRate),
    /// Run the calibration selected by CTRL5.
    Calibrate,
}

impl Command {
    /// The byte put on the wire.
    pub const fn to_byte(self) -> u8 {
        match self {
            Command::ReadRegister(address) => build_command(Mode::RegisterAccess, address, true),
            Command::WriteRegister(address) => build_command(Mode::RegisterAccess, address, false),
            Command::Convert(rate) => build_command(Mode::Conversion, rate as u8, false),
            Command::Calibrate => build_command(Mode::Conversion, 0, true),
        }
    }
}
