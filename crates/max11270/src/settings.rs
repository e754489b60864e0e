//! Typed settings and the [`Config`] applied by [`Max11270::configure`](crate::Max11270::configure).

use crate::error::InvalidSetting;

/// Reference voltage assumed when none is given, in volts.
pub const DEFAULT_REFERENCE_VOLTAGE: f32 = 2.048;

/// SCLK used until [`Max11270::set_bus_clock_hz`](crate::Max11270::set_bus_clock_hz) is called.
pub const DEFAULT_BUS_CLOCK_HZ: u32 = 4_000_000;

/// PGA gain, written to CTRL2 bits 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    /// Unity gain, the PGA still gets enabled.
    #[default]
    X1 = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X16 = 4,
    X32 = 5,
    X64 = 6,
    X128 = 7,
}

impl Gain {
    /// The amplification factor, `2^code`.
    pub const fn multiplier(self) -> u8 {
        1 << self as u8
    }

    /// Iterate over all gains, lowest first.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::X1,
            Self::X2,
            Self::X4,
            Self::X8,
            Self::X16,
            Self::X32,
            Self::X64,
            Self::X128,
        ]
        .into_iter()
    }
}

impl TryFrom<u8> for Gain {
    type Error = InvalidSetting;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::all()
            .find(|gain| *gain as u8 == code)
            .ok_or(InvalidSetting::Gain(code))
    }
}

/// Conversion rate code sent with every conversion command.
///
/// Variant names give the rate in continuous conversion mode, `Sps1_9` is 1.9 samples per
/// second. Single-cycle mode runs slower for the same code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DataRate {
    Sps1_9 = 0,
    Sps3_9 = 1,
    Sps7_8 = 2,
    Sps15_6 = 3,
    Sps31_2 = 4,
    Sps62_5 = 5,
    Sps125 = 6,
    Sps250 = 7,
    Sps500 = 8,
    #[default]
    Sps1000 = 9,
    Sps2000 = 10,
    Sps4000 = 11,
    Sps8000 = 12,
    Sps16000 = 13,
    Sps32000 = 14,
    Sps64000 = 15,
}

impl DataRate {
    const ALL: [Self; 16] = [
        Self::Sps1_9,
        Self::Sps3_9,
        Self::Sps7_8,
        Self::Sps15_6,
        Self::Sps31_2,
        Self::Sps62_5,
        Self::Sps125,
        Self::Sps250,
        Self::Sps500,
        Self::Sps1000,
        Self::Sps2000,
        Self::Sps4000,
        Self::Sps8000,
        Self::Sps16000,
        Self::Sps32000,
        Self::Sps64000,
    ];

    /// Iterate over all rates, slowest first.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// Output rate in continuous conversion mode.
    pub fn samples_per_second(self) -> f32 {
        match self {
            Self::Sps1_9 => 1.9,
            Self::Sps3_9 => 3.9,
            Self::Sps7_8 => 7.8,
            Self::Sps15_6 => 15.6,
            Self::Sps31_2 => 31.2,
            Self::Sps62_5 => 62.5,
            Self::Sps125 => 125.0,
            Self::Sps250 => 250.0,
            Self::Sps500 => 500.0,
            Self::Sps1000 => 1_000.0,
            Self::Sps2000 => 2_000.0,
            Self::Sps4000 => 4_000.0,
            Self::Sps8000 => 8_000.0,
            Self::Sps16000 => 16_000.0,
            Self::Sps32000 => 32_000.0,
            Self::Sps64000 => 64_000.0,
        }
    }
}

impl TryFrom<u8> for DataRate {
    type Error = InvalidSetting;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(InvalidSetting::DataRate(code))
    }
}

/// CTRL1 bit 1 (SCYCLE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionMode {
    /// Convert back to back after a conversion command.
    #[default]
    Continuous,
    /// One conversion per conversion command, then power down.
    SingleCycle,
}

/// CTRL1 bit 6 (SYNC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncMode {
    /// A SYNC pulse restarts the conversion.
    #[default]
    Pulsed,
    /// Conversions follow the SYNC level.
    Continuous,
}

/// CTRL1 bit 7 (EXTCK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// The on-chip oscillator.
    #[default]
    Internal,
    /// The CLK input pin.
    External,
}

macro_rules! impl_bool_setting {
    ($setting: ident, $off: ident, $on: ident) => {
        impl From<bool> for $setting {
            fn from(on: bool) -> Self {
                if on {
                    Self::$on
                } else {
                    Self::$off
                }
            }
        }

        impl From<$setting> for bool {
            fn from(setting: $setting) -> Self {
                matches!(setting, $setting::$on)
            }
        }
    };
}

impl_bool_setting!(ConversionMode, Continuous, SingleCycle);
impl_bool_setting!(SyncMode, Pulsed, Continuous);
impl_bool_setting!(ClockSource, Internal, External);

/// Everything the driver can configure in one place.
///
/// The default matches the chip after power-on plus the driver's own defaults, so
/// `..Default::default()` only has to name what differs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// PGA gain.
    pub gain: Gain,
    /// Rate sent with each conversion command.
    pub data_rate: DataRate,
    /// CTRL1 SCYCLE.
    pub conversion_mode: ConversionMode,
    /// CTRL1 SYNC.
    pub sync_mode: SyncMode,
    /// CTRL1 EXTCK.
    pub clock_source: ClockSource,
    /// Dimensionless multiplier applied on top of the reference scaling.
    pub calibration_factor: f32,
    /// Voltage on REFP - REFN, in volts.
    pub reference_voltage: f32,
    /// SCLK frequency in Hz.
    pub bus_clock_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gain: Gain::default(),
            data_rate: DataRate::default(),
            conversion_mode: ConversionMode::default(),
            sync_mode: SyncMode::default(),
            clock_source: ClockSource::default(),
            calibration_factor: 1.0,
            reference_voltage: DEFAULT_REFERENCE_VOLTAGE,
            bus_clock_hz: DEFAULT_BUS_CLOCK_HZ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_codes() {
        for (code, gain) in Gain::all().enumerate() {
            let code = code as u8;
            assert_eq!(Gain::try_from(code), Ok(gain));
            assert_eq!(gain.multiplier(), 1 << code);
        }

        assert_eq!(Gain::try_from(8), Err(InvalidSetting::Gain(8)));
    }

    #[test]
    fn data_rate_codes() {
        assert_eq!(DataRate::try_from(0), Ok(DataRate::Sps1_9));
        assert_eq!(DataRate::try_from(9), Ok(DataRate::Sps1000));
        assert_eq!(DataRate::try_from(15), Ok(DataRate::Sps64000));
        assert_eq!(DataRate::try_from(16), Err(InvalidSetting::DataRate(16)));

        for (code, rate) in DataRate::all().enumerate() {
            assert_eq!(rate as usize, code);
        }
    }

    #[test]
    fn bool_settings() {
        assert_eq!(ConversionMode::from(true), ConversionMode::SingleCycle);
        assert_eq!(SyncMode::from(true), SyncMode::Continuous);
        assert_eq!(ClockSource::from(false), ClockSource::Internal);
        assert!(bool::from(ClockSource::External));
    }
}
