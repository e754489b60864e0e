use clap::{Args, Parser, Subcommand, ValueEnum};
use max11270::{
    ClockSource, Config, ConversionMode, DataRate, Gain, SyncMode, DEFAULT_BUS_CLOCK_HZ,
    DEFAULT_REFERENCE_VOLTAGE,
};

#[derive(Parser, Debug)]
#[command(name = "pi")]
#[command(about = "Read a MAX11270 ADC wired to a Raspberry Pi's SPI0", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SCLK frequency in Hz (the MAX11270 allows up to 5 MHz)
    #[arg(long, global = true, default_value_t = DEFAULT_BUS_CLOCK_HZ)]
    pub bus_clock: u32,

    /// Voltage across REFP and REFN, in volts
    #[arg(long, global = true, default_value_t = DEFAULT_REFERENCE_VOLTAGE)]
    pub vref: f32,

    /// BCM number of the GPIO driving the ADC's chip select
    #[arg(long, global = true, default_value_t = 24)]
    pub chip_select_gpio: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure the ADC and print readings in microvolts
    Read(ReadArgs),
    /// Run a calibration
    Calibrate {
        #[arg(value_enum)]
        kind: Calibration,
    },
    /// Print every register as read from the chip
    Dump,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// PGA gain code, the gain is 2^code (0..=7)
    #[arg(long, default_value = "0", value_parser = parse_gain)]
    pub gain: Gain,

    /// Data rate code (0..=15), 9 is 1 ksps in continuous mode
    #[arg(long, default_value = "9", value_parser = parse_rate)]
    pub rate: DataRate,

    /// Multiplier applied to every reading
    #[arg(long, default_value_t = 1.0)]
    pub calibration_factor: f32,

    /// Convert once per request instead of continuously
    #[arg(long)]
    pub single_cycle: bool,

    /// Use continuous SYNC mode
    #[arg(long)]
    pub continuous_sync: bool,

    /// Clock the modulator from CLK instead of the internal oscillator
    #[arg(long)]
    pub external_clock: bool,

    /// Skip the self-calibration run before the first reading
    #[arg(long)]
    pub skip_calibration: bool,

    /// Stop after this many readings
    #[arg(long)]
    pub count: Option<u32>,

    /// Pause between readings, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Calibration {
    /// Internal offset and gain calibration
    #[value(name = "self")]
    SelfCalibration,
    /// System offset calibration, short the inputs first
    ZeroScale,
}

impl ReadArgs {
    pub fn config(&self, cli: &Cli) -> Config {
        Config {
            gain: self.gain,
            data_rate: self.rate,
            conversion_mode: ConversionMode::from(self.single_cycle),
            sync_mode: SyncMode::from(self.continuous_sync),
            clock_source: ClockSource::from(self.external_clock),
            calibration_factor: self.calibration_factor,
            reference_voltage: cli.vref,
            bus_clock_hz: cli.bus_clock,
        }
    }
}

fn parse_gain(code: &str) -> Result<Gain, String> {
    let code: u8 = code.parse().map_err(|e| format!("{e}"))?;
    Gain::try_from(code).map_err(|e| e.to_string())
}

fn parse_rate(code: &str) -> Result<DataRate, String> {
    let code: u8 = code.parse().map_err(|e| format!("{e}"))?;
    DataRate::try_from(code).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_defaults_match_driver_defaults() {
        let cli = Cli::try_parse_from(["pi", "read"]).unwrap();

        let Command::Read(args) = &cli.command else {
            panic!("expected read, got {:?}", cli.command);
        };

        assert_eq!(args.config(&cli), Config::default());
        assert_eq!(args.count, None);
    }

    #[test]
    fn read_options_build_config() {
        let cli = Cli::try_parse_from([
            "pi",
            "--vref",
            "2.5",
            "read",
            "--gain",
            "7",
            "--rate",
            "15",
            "--single-cycle",
            "--external-clock",
            "--bus-clock",
            "1000000",
        ])
        .unwrap();

        let Command::Read(args) = &cli.command else {
            panic!("expected read, got {:?}", cli.command);
        };
        let config = args.config(&cli);

        assert_eq!(config.gain, Gain::X128);
        assert_eq!(config.data_rate, DataRate::Sps64000);
        assert_eq!(config.conversion_mode, ConversionMode::SingleCycle);
        assert_eq!(config.sync_mode, SyncMode::Pulsed);
        assert_eq!(config.clock_source, ClockSource::External);
        assert_eq!(config.reference_voltage, 2.5);
        assert_eq!(config.bus_clock_hz, 1_000_000);
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert!(Cli::try_parse_from(["pi", "read", "--gain", "8"]).is_err());
        assert!(Cli::try_parse_from(["pi", "read", "--rate", "16"]).is_err());
    }

    #[test]
    fn calibration_kinds() {
        let cli = Cli::try_parse_from(["pi", "calibrate", "zero-scale"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Calibrate {
                kind: Calibration::ZeroScale
            }
        ));

        let cli = Cli::try_parse_from(["pi", "calibrate", "self"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Calibrate {
                kind: Calibration::SelfCalibration
            }
        ));
    }
}
