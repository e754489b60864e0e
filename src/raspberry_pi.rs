//! Glue between `rppal`'s SPI/GPIO and the MAX11270 driver.

use std::cell::RefCell;

use embedded_hal::spi::{ErrorType, Operation, SpiDevice};
use embedded_hal_bus::spi::{DeviceError, NoDelay, RefCellDevice};
use max11270::ClockControl;
use rppal::gpio::{Gpio, OutputPin};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

/// The MAX11270 on SPI0 with its chip select on a plain GPIO.
///
/// Keeps a handle on the bus so the driver can retune SCLK between transactions.
pub struct PiDevice<'a> {
    bus: &'a RefCell<Spi>,
    device: RefCellDevice<'a, Spi, OutputPin, NoDelay>,
}

impl<'a> PiDevice<'a> {
    pub fn new(bus: &'a RefCell<Spi>, chip_select: OutputPin) -> Self {
        Self {
            bus,
            device: RefCellDevice::new_no_delay(bus, chip_select),
        }
    }
}

impl<'a> ErrorType for PiDevice<'a> {
    type Error = <RefCellDevice<'a, Spi, OutputPin, NoDelay> as ErrorType>::Error;
}

impl SpiDevice for PiDevice<'_> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.device.transaction(operations)
    }
}

impl ClockControl for PiDevice<'_> {
    fn set_clock_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.bus.borrow().set_clock_speed(hz).map_err(DeviceError::Spi)
    }
}

/// Opens SPI0 in mode 0 at `clock_hz` and claims `chip_select_gpio` as an output, idle high.
pub fn open(
    clock_hz: u32,
    chip_select_gpio: u8,
) -> Result<(RefCell<Spi>, OutputPin), anyhow::Error> {
    let gpio = Gpio::new()?;

    let mut chip_select = gpio.get(chip_select_gpio)?.into_output();
    chip_select.set_high();

    let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, clock_hz, Mode::Mode0)?;

    tracing::debug!(clock_hz, chip_select_gpio, "opened SPI0");

    Ok((RefCell::new(spi), chip_select))
}
