use bit_field::BitField;
use embedded_hal::delay::DelayNs;

use crate::bus::ClockControl;
use crate::command::Command;
use crate::conversion::{raw_to_microvolts, scale_factor};
use crate::diagnostics::{RegisterDump, Status};
use crate::error::Error;
use crate::registers::{
    self, CalibrationRegister, ShadowRegisters, CTRL1, CTRL2, CTRL5, DATA_REGISTER, EXTCK,
    LAST_REGISTER, SCYCLE, STATUS_REGISTER, SYNC,
};
use crate::settings::{
    ClockSource, Config, ConversionMode, DataRate, Gain, SyncMode, DEFAULT_BUS_CLOCK_HZ,
    DEFAULT_REFERENCE_VOLTAGE,
};
use crate::{command, transfer, FILLER};

/// Self-calibration completes within 200 ms.
const CALIBRATION_SETTLE_MS: u32 = 250;

/// MAX11270 driver
///
/// Owns the SPI device (and with it the chip-select line) and a delay used while
/// calibrations settle. Nothing is sent to the chip on construction.
pub struct Max11270<SPI, D> {
    spi: SPI,
    delay: D,
    bus_clock_hz: u32,
    shadow: ShadowRegisters,
    data_rate: DataRate,
    gain: Gain,
    reference_voltage: f32,
    calibration_factor: f32,
    /// Microvolts per code, kept in step with the three fields above.
    scale: f32,
}

impl<SPI: ClockControl, D: DelayNs> Max11270<SPI, D> {
    /// Creates a new driver assuming a 2.048 V reference.
    /// Please ensure the SPI device runs in SPI mode 0, aka (0, 0).
    pub fn new(spi: SPI, delay: D) -> Self {
        Self::with_reference(spi, delay, DEFAULT_REFERENCE_VOLTAGE)
    }

    /// Creates a new driver for a board with `reference_voltage` volts across REFP and REFN.
    pub fn with_reference(spi: SPI, delay: D, reference_voltage: f32) -> Self {
        let mut adc = Self {
            spi,
            delay,
            bus_clock_hz: DEFAULT_BUS_CLOCK_HZ,
            shadow: ShadowRegisters::default(),
            data_rate: DataRate::default(),
            gain: Gain::default(),
            reference_voltage,
            calibration_factor: 1.0,
            scale: 0.0,
        };
        adc.update_scale();
        adc
    }

    /// Gives back the SPI device and the delay.
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    /// Applies every field of `config`, one register write per control setting.
    pub fn configure(&mut self, config: &Config) -> Result<(), Error<SPI::Error>> {
        self.set_bus_clock_hz(config.bus_clock_hz);
        self.set_reference_voltage(config.reference_voltage);
        self.set_calibration_factor(config.calibration_factor);
        self.set_data_rate(config.data_rate);
        self.set_gain(config.gain)?;
        self.set_conversion_mode(config.conversion_mode)?;
        self.set_sync_mode(config.sync_mode)?;
        self.set_clock_source(config.clock_source)?;
        Ok(())
    }

    /// SCLK frequency applied before each transaction.
    pub fn bus_clock_hz(&self) -> u32 {
        self.bus_clock_hz
    }

    /// Changes the SCLK frequency used from the next transaction on.
    pub fn set_bus_clock_hz(&mut self, hz: u32) {
        self.bus_clock_hz = hz;
    }

    /// The gain last set through [`set_gain`](Self::set_gain).
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Rate used by [`start_conversion`](Self::start_conversion).
    pub fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// Reference voltage in volts.
    pub fn reference_voltage(&self) -> f32 {
        self.reference_voltage
    }

    /// Multiplier applied on top of the reference scaling.
    pub fn calibration_factor(&self) -> f32 {
        self.calibration_factor
    }

    /// Microvolts per raw code.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The cached control registers.
    pub fn shadow_registers(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// Reads the status word. Nothing is cached.
    pub fn read_status(&mut self) -> Result<Status, Error<SPI::Error>> {
        let mut buffer = [Command::ReadRegister(STATUS_REGISTER).to_byte(), FILLER, FILLER];

        self.transfer(&mut buffer)?;

        Ok(Status(u16::from_be_bytes([buffer[1], buffer[2]])))
    }

    /// Reads control register `register` (1 to 5) from the chip. The shadow copy is left
    /// alone, so comparing the two shows whether something else wrote to the chip.
    pub fn read_control_register(&mut self, register: u8) -> Result<u8, Error<SPI::Error>> {
        Self::check_control(register)?;

        let mut buffer = [Command::ReadRegister(register).to_byte(), FILLER];

        self.transfer(&mut buffer)?;

        Ok(buffer[1])
    }

    /// Writes `value` to control register `register` (1 to 5).
    ///
    /// The shadow copy is updated before anything goes on the wire. Prefer the typed
    /// setters, this is for settings the driver does not cover.
    pub fn write_control_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Error<SPI::Error>> {
        Self::check_control(register)?;

        log::debug!("writing {:#010b} to CTRL{}", value, register);

        self.shadow.set(register, value);

        let mut buffer = [Command::WriteRegister(register).to_byte(), value];

        self.transfer(&mut buffer)
    }

    /// Reads a 24-bit register, MSB first.
    pub fn read_register_24(&mut self, register: u8) -> Result<u32, Error<SPI::Error>> {
        Self::check_address(register)?;

        let mut buffer = [Command::ReadRegister(register).to_byte(), FILLER, FILLER, FILLER];

        self.transfer(&mut buffer)?;

        Ok(u32::from_be_bytes([0, buffer[1], buffer[2], buffer[3]]))
    }

    /// Writes the low 24 bits of `value` to a 24-bit register, MSB first.
    pub fn write_register_24(
        &mut self,
        register: u8,
        value: u32,
    ) -> Result<(), Error<SPI::Error>> {
        Self::check_address(register)?;

        let [_, high, middle, low] = value.to_be_bytes();
        let mut buffer = [Command::WriteRegister(register).to_byte(), high, middle, low];

        self.transfer(&mut buffer)
    }

    /// Reads one of the calibration result registers.
    pub fn read_calibration_register(
        &mut self,
        register: CalibrationRegister,
    ) -> Result<u32, Error<SPI::Error>> {
        self.read_register_24(register as u8)
    }

    /// Sets the PGA gain and enables the PGA.
    ///
    /// The cached gain and scale follow the CTRL2 shadow even when the transfer fails.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<SPI::Error>> {
        let written = self.update_control(CTRL2, |ctrl2| registers::with_gain(ctrl2, gain as u8));

        self.gain = gain;
        self.update_scale();
        written
    }

    /// Selects continuous or single-cycle conversions (CTRL1 SCYCLE).
    pub fn set_conversion_mode(&mut self, mode: ConversionMode) -> Result<(), Error<SPI::Error>> {
        self.update_control_bit(CTRL1, SCYCLE, mode.into())
    }

    /// Selects pulsed or continuous SYNC (CTRL1 SYNC).
    pub fn set_sync_mode(&mut self, mode: SyncMode) -> Result<(), Error<SPI::Error>> {
        self.update_control_bit(CTRL1, SYNC, mode.into())
    }

    /// Selects the internal oscillator or the CLK pin (CTRL1 EXTCK).
    pub fn set_clock_source(&mut self, source: ClockSource) -> Result<(), Error<SPI::Error>> {
        self.update_control_bit(CTRL1, EXTCK, source.into())
    }

    /// Stores the rate for the next [`start_conversion`](Self::start_conversion). Nothing is
    /// sent, the rate travels inside the conversion command.
    pub fn set_data_rate(&mut self, rate: DataRate) {
        self.data_rate = rate;
    }

    /// Sets the calibration factor and recomputes the scale.
    pub fn set_calibration_factor(&mut self, calibration_factor: f32) {
        self.calibration_factor = calibration_factor;
        self.update_scale();
    }

    /// Sets the reference voltage in volts and recomputes the scale.
    pub fn set_reference_voltage(&mut self, reference_voltage: f32) {
        self.reference_voltage = reference_voltage;
        self.update_scale();
    }

    /// Starts a conversion at the stored data rate.
    pub fn start_conversion(&mut self) -> Result<(), Error<SPI::Error>> {
        command(&mut self.spi, self.bus_clock_hz, Command::Convert(self.data_rate))
            .map_err(Error::Spi)
    }

    /// Stores `rate` and starts a conversion with it.
    pub fn start_conversion_at(&mut self, rate: DataRate) -> Result<(), Error<SPI::Error>> {
        self.set_data_rate(rate);
        self.start_conversion()
    }

    /// Runs the internal offset and gain self-calibration.
    ///
    /// With `wait` the call returns once the calibration has had time to finish, otherwise
    /// it returns as soon as the command is sent and the caller has to check
    /// [`Status::measuring`] before converting.
    pub fn perform_self_calibration(&mut self, wait: bool) -> Result<(), Error<SPI::Error>> {
        self.request_calibration(registers::CAL_SELF)?;

        if wait {
            self.delay.delay_ms(CALIBRATION_SETTLE_MS);
        }

        Ok(())
    }

    /// Runs a system offset calibration. The inputs must be shorted together for the whole
    /// call, the driver cannot check this.
    pub fn perform_zero_scale_calibration(&mut self) -> Result<(), Error<SPI::Error>> {
        self.request_calibration(registers::CAL_SYSTEM_OFFSET)?;
        self.delay.delay_ms(CALIBRATION_SETTLE_MS);
        Ok(())
    }

    // TODO: system full-scale calibration (CAL = 0b10) needs a known full-scale input and
    // the SGC_ADC handling confirmed on hardware before it gets a method here.

    /// Reads the raw 24-bit conversion result.
    pub fn read_raw(&mut self) -> Result<u32, Error<SPI::Error>> {
        self.read_register_24(DATA_REGISTER)
    }

    /// Reads the last conversion result in microvolts.
    pub fn read_microvolts(&mut self) -> Result<f32, Error<SPI::Error>> {
        self.read_raw().map(|raw| self.convert_raw_to_microvolts(raw))
    }

    /// Converts a raw code with the current gain, reference and calibration factor.
    pub fn convert_raw_to_microvolts(&self, raw: u32) -> f32 {
        raw_to_microvolts(raw, self.scale)
    }

    /// Reads every register the chip exposes. Shadow copies are not touched.
    pub fn dump_registers(&mut self) -> Result<RegisterDump, Error<SPI::Error>> {
        let status = self.read_status()?;

        let mut control = [0; 5];
        for (register, value) in (1..).zip(control.iter_mut()) {
            *value = self.read_control_register(register)?;
        }

        let data = self.read_raw()?;

        let mut calibration = [0; 4];
        for (register, value) in CalibrationRegister::all().zip(calibration.iter_mut()) {
            *value = self.read_calibration_register(register)?;
        }

        Ok(RegisterDump {
            status,
            control,
            data,
            calibration,
        })
    }

    fn request_calibration(&mut self, selector: u8) -> Result<(), Error<SPI::Error>> {
        self.update_control(CTRL5, |ctrl5| registers::with_calibration(ctrl5, selector))?;

        log::info!("requesting calibration {:#04b}", selector);

        command(&mut self.spi, self.bus_clock_hz, Command::Calibrate).map_err(Error::Spi)
    }

    /// Read-modify-write of a control register against its shadow copy.
    fn update_control<F>(&mut self, register: u8, f: F) -> Result<(), Error<SPI::Error>>
    where
        F: FnOnce(u8) -> u8,
    {
        let current = self
            .shadow
            .get(register)
            .ok_or(Error::InvalidRegister(register))?;

        self.write_control_register(register, f(current))
    }

    fn update_control_bit(
        &mut self,
        register: u8,
        bit: usize,
        value: bool,
    ) -> Result<(), Error<SPI::Error>> {
        self.update_control(register, |mut current| *current.set_bit(bit, value))
    }

    fn update_scale(&mut self) {
        self.scale = scale_factor(self.calibration_factor, self.reference_voltage, self.gain);
    }

    fn transfer(&mut self, buffer: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        transfer(&mut self.spi, self.bus_clock_hz, buffer).map_err(Error::Spi)
    }

    fn check_control(register: u8) -> Result<(), Error<SPI::Error>> {
        if ShadowRegisters::is_control(register) {
            Ok(())
        } else {
            Err(Error::InvalidRegister(register))
        }
    }

    fn check_address(register: u8) -> Result<(), Error<SPI::Error>> {
        if register <= LAST_REGISTER {
            Ok(())
        } else {
            Err(Error::InvalidRegister(register))
        }
    }
}
