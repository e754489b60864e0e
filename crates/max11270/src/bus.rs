use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

/// An SPI device whose bus clock can be retuned between transactions.
///
/// The MAX11270 accepts up to 5 MHz SCLK. The driver calls [`ClockControl::set_clock_hz`]
/// before every transaction with its configured speed, the device is expected to run
/// in SPI mode 0, MSB first.
pub trait ClockControl: SpiDevice {
    /// Apply `hz` to all transactions issued after this call.
    fn set_clock_hz(&mut self, hz: u32) -> Result<(), Self::Error>;
}

/// Adapter for devices whose clock is fixed when the HAL builds the bus.
/// Clock changes requested by the driver are ignored.
pub struct FixedClock<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> FixedClock<SPI> {
    /// Wraps `spi`, which must already run at a clock the chip accepts.
    pub fn new(spi: SPI) -> Self {
        spi.into()
    }

    /// Gives back the wrapped device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> From<SPI> for FixedClock<SPI> {
    fn from(spi: SPI) -> Self {
        Self { spi }
    }
}

impl<SPI: SpiDevice> ErrorType for FixedClock<SPI> {
    type Error = SPI::Error;
}

impl<SPI: SpiDevice> SpiDevice for FixedClock<SPI> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.spi.transaction(operations)
    }
}

impl<SPI: SpiDevice> ClockControl for FixedClock<SPI> {
    fn set_clock_hz(&mut self, hz: u32) -> Result<(), Self::Error> {
        log::trace!("ignoring clock change to {} Hz on a fixed-clock bus", hz);
        Ok(())
    }
}
