//! Decoding of register contents for inspection. The driver itself never acts on these.

use core::fmt;

use bit_field::BitField;

use crate::registers::CalibrationRegister;

/// The 16-bit status word, first byte clocked out being the high byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u16);

impl Status {
    /// The undecoded status word.
    pub fn raw(&self) -> u16 {
        self.0
    }

    /// A new conversion result is available.
    pub fn ready(&self) -> bool {
        self.0.get_bit(0)
    }

    /// A conversion or calibration is in progress.
    pub fn measuring(&self) -> bool {
        self.0.get_bit(1)
    }

    /// Data overrun, a result was overwritten before it was read.
    pub fn data_overrun(&self) -> bool {
        self.0.get_bit(2)
    }

    /// System gain calibration overrange.
    pub fn system_gain_overrange(&self) -> bool {
        self.0.get_bit(3)
    }

    /// Rate code of the conversion in progress or last completed.
    pub fn rate(&self) -> u8 {
        self.0.get_bits(4..=7) as u8
    }

    /// Analog input out of range.
    pub fn analog_overrange(&self) -> bool {
        self.0.get_bit(8)
    }

    /// The data register was being read while it updated.
    pub fn read_error(&self) -> bool {
        self.0.get_bit(9)
    }

    /// Power-down state, PDSTAT1:PDSTAT0.
    pub fn power_state(&self) -> u8 {
        self.0.get_bits(10..=11) as u8
    }

    /// Invalid configuration, e.g. calibration values out of range.
    pub fn error(&self) -> bool {
        self.0.get_bit(14)
    }

    /// The chip is still resetting.
    pub fn in_reset(&self) -> bool {
        self.0.get_bit(15)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "STAT {:#06x}: rdy={} mstat={} dor={} sysgor={} rate={} aor={} rderr={} pdstat={} error={} inreset={}",
            self.0,
            u8::from(self.ready()),
            u8::from(self.measuring()),
            u8::from(self.data_overrun()),
            u8::from(self.system_gain_overrange()),
            self.rate(),
            u8::from(self.analog_overrange()),
            u8::from(self.read_error()),
            self.power_state(),
            u8::from(self.error()),
            u8::from(self.in_reset()),
        )
    }
}

/// Bit names of CTRL1 to CTRL5, bit 0 first. `-` marks unused bits.
const CONTROL_BITS: [[&str; 8]; 5] = [
    ["contsc", "scycle", "format", "u/b", "pd0", "pd1", "sync", "extck"],
    ["pga0", "pga1", "pga2", "pgaen", "lpmode", "bufen", "dgain0", "dgain1"],
    ["-", "-", "-", "data32", "modbits", "enmsync", "-", "-"],
    ["dio1", "dio2", "dio3", "-", "dir1", "dir2", "dir3", "-"],
    ["nosco", "noscg", "nosyso", "nosysg", "-", "-", "cal0", "cal1"],
];

/// A snapshot of every readable register, as read from the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDump {
    /// The status word.
    pub status: Status,
    /// CTRL1 to CTRL5.
    pub control: [u8; 5],
    /// Last conversion result, not sign extended.
    pub data: u32,
    /// In [`CalibrationRegister::all`] order.
    pub calibration: [u32; 4],
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;

        for (number, (value, names)) in self.control.iter().zip(CONTROL_BITS.iter()).enumerate() {
            write!(f, "CTRL{} {:#010b}:", number + 1, value)?;
            for (bit, name) in names.iter().enumerate() {
                if *name != "-" {
                    write!(f, " {}={}", name, u8::from(value.get_bit(bit)))?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "DATA ({:#04x}): {:#08x}", crate::registers::DATA_REGISTER, self.data)?;

        for (register, value) in CalibrationRegister::all().zip(self.calibration.iter()) {
            writeln!(f, "{} ({:#04x}): {:#08x}", register.name(), register as u8, value)?;
        }

        Ok(())
    }
}
