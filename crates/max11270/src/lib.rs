//! Provides a driver for the Maxim MAX11270 24-bit delta-sigma ADC via the `embedded-hal` ecosystem.
//!
//! The driver keeps shadow copies of the five control registers so that every setter can
//! change the bits it owns without a read-back, and converts raw conversion results into
//! microvolts with a single multiplication.
//!
//! ```ignore
//! use max11270::{FixedClock, Gain, Max11270};
//!
//! let mut adc = Max11270::new(FixedClock::new(spi), delay);
//! adc.set_gain(Gain::X8)?;
//! adc.perform_self_calibration(true)?;
//! adc.start_conversion()?;
//! let microvolts = adc.read_microvolts()?;
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

mod bus;
mod command;
mod conversion;
mod diagnostics;
mod error;
mod max11270;
mod registers;
mod settings;

#[cfg(test)]
mod mock;

pub use bus::{ClockControl, FixedClock};
pub use command::{build_command, Command, Mode};
pub use conversion::{raw_to_microvolts, scale_factor, sign_extend_24};
pub use diagnostics::{RegisterDump, Status};
pub use error::{Error, InvalidSetting};
pub use max11270::Max11270;
pub use registers::{CalibrationRegister, ShadowRegisters, DATA_REGISTER, STATUS_REGISTER};
pub use settings::{
    ClockSource, Config, ConversionMode, DataRate, Gain, SyncMode, DEFAULT_BUS_CLOCK_HZ,
    DEFAULT_REFERENCE_VOLTAGE,
};

/// Filler clocked out while the chip shifts a reply back.
pub(crate) const FILLER: u8 = 0xFF;

/// Internal method for running one chip-select bracketed exchange. The clock is retuned
/// first so that a changed bus speed applies from the next transaction onwards.
pub(crate) fn transfer<SPI: ClockControl>(
    spi: &mut SPI,
    clock_hz: u32,
    buffer: &mut [u8],
) -> Result<(), SPI::Error> {
    spi.set_clock_hz(clock_hz)?;

    if let Some(command) = buffer.first() {
        log::trace!("spi {} Hz, command {:#010b}, {} bytes", clock_hz, command, buffer.len());
    }

    spi.transfer_in_place(buffer)
}

/// Same as [`transfer`] for transactions made of a single command byte.
pub(crate) fn command<SPI: ClockControl>(
    spi: &mut SPI,
    clock_hz: u32,
    command: Command,
) -> Result<(), SPI::Error> {
    transfer(spi, clock_hz, &mut [command.to_byte()])
}
