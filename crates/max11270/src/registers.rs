//! Register map and the shadow copies of CTRL1 to CTRL5.

use bit_field::BitField;

/// 16-bit status register.
pub const STATUS_REGISTER: u8 = 0x00;
/// 24-bit conversion result.
pub const DATA_REGISTER: u8 = 0x06;
/// Highest address a command byte can carry.
pub(crate) const LAST_REGISTER: u8 = 0x1F;

pub(crate) const CTRL1: u8 = 1;
pub(crate) const CTRL2: u8 = 2;
pub(crate) const CTRL5: u8 = 5;

// CTRL1
pub(crate) const SCYCLE: usize = 1;
pub(crate) const SYNC: usize = 6;
pub(crate) const EXTCK: usize = 7;

// CTRL2
pub(crate) const PGA: core::ops::RangeInclusive<usize> = 0..=2;
pub(crate) const PGAEN: usize = 3;

// CTRL5, CAL1:CAL0 select what the calibration command runs
pub(crate) const CAL: core::ops::RangeInclusive<usize> = 6..=7;
pub(crate) const CAL_SELF: u8 = 0b00;
pub(crate) const CAL_SYSTEM_OFFSET: u8 = 0b01;

/// The 24-bit calibration result registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CalibrationRegister {
    /// System offset calibration.
    SystemOffset = 0x15,
    /// System gain calibration.
    SystemGain = 0x16,
    /// Self-calibration offset.
    SelfOffset = 0x17,
    /// Self-calibration gain.
    SelfGain = 0x18,
}

impl CalibrationRegister {
    /// Iterate over all calibration registers in address order.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::SystemOffset, Self::SystemGain, Self::SelfOffset, Self::SelfGain].into_iter()
    }

    /// Datasheet mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            Self::SystemOffset => "SOC_ADC",
            Self::SystemGain => "SGC_ADC",
            Self::SelfOffset => "SCOC_ADC",
            Self::SelfGain => "SCGC_ADC",
        }
    }
}

/// Last value written to each control register.
///
/// Starts out at the power-on defaults, so as long as nothing else writes to the chip
/// it mirrors the hardware without ever reading it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShadowRegisters {
    ctrl: [u8; 5],
}

impl ShadowRegisters {
    /// CTRL1 to CTRL5 after power-on.
    pub const POWER_ON: [u8; 5] = [0x02, 0x00, 0x61, 0x0F, 0x0C];

    /// `true` for the control register numbers 1 to 5.
    pub const fn is_control(register: u8) -> bool {
        matches!(register, 1..=5)
    }

    /// Value of control register `register`, or `None` if it is not one of 1 to 5.
    pub fn get(&self, register: u8) -> Option<u8> {
        let index = usize::from(register).checked_sub(1)?;
        self.ctrl.get(index).copied()
    }

    /// Records `value` for control register `register`. Returns `false` and leaves
    /// everything untouched if `register` is not one of 1 to 5.
    pub(crate) fn set(&mut self, register: u8, value: u8) -> bool {
        let Some(index) = usize::from(register).checked_sub(1) else {
            return false;
        };

        match self.ctrl.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl Default for ShadowRegisters {
    fn default() -> Self {
        Self {
            ctrl: Self::POWER_ON,
        }
    }
}

/// CTRL2 with the PGA enabled at `code`, bits 4-7 kept.
pub(crate) fn with_gain(ctrl2: u8, code: u8) -> u8 {
    let mut value = ctrl2;
    value.set_bits(PGA, code);
    value.set_bit(PGAEN, true);
    value
}

/// CTRL5 with the calibration selector replaced, bits 0-5 kept.
pub(crate) fn with_calibration(ctrl5: u8, selector: u8) -> u8 {
    let mut value = ctrl5;
    value.set_bits(CAL, selector);
    value
}
