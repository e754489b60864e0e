use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use max11270::{ClockControl, Max11270};
use rppal::hal::Delay;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod raspberry_pi;

use cli::{Calibration, Cli, Command, ReadArgs};
use raspberry_pi::PiDevice;

/// Status polls before a reading is taken regardless of RDY.
const READY_POLLS: u32 = 1_000;

fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let (spi, chip_select) = raspberry_pi::open(cli.bus_clock, cli.chip_select_gpio)?;

    let device = PiDevice::new(&spi, chip_select);

    let mut adc = Max11270::with_reference(device, Delay::new(), cli.vref);
    adc.set_bus_clock_hz(cli.bus_clock);

    match &cli.command {
        Command::Read(args) => read(&mut adc, args, &cli),
        Command::Calibrate { kind } => calibrate(&mut adc, *kind),
        Command::Dump => {
            let dump = adc.dump_registers().context("reading registers")?;
            print!("{dump}");
            Ok(())
        }
    }
}

fn read<SPI>(
    adc: &mut Max11270<SPI, Delay>,
    args: &ReadArgs,
    cli: &Cli,
) -> Result<(), anyhow::Error>
where
    SPI: ClockControl,
    SPI::Error: Send + Sync + 'static,
{
    let config = args.config(cli);

    adc.configure(&config).context("configuring the ADC")?;

    info!(
        gain = adc.gain().multiplier(),
        sps = adc.data_rate().samples_per_second(),
        scale = adc.scale(),
        "configured"
    );

    if !args.skip_calibration {
        adc.perform_self_calibration(true).context("self-calibration")?;
    }

    let mut taken = 0;

    while args.count.map_or(true, |count| taken < count) {
        adc.start_conversion()?;

        let mut polls = 0;
        while !adc.read_status()?.ready() {
            polls += 1;
            if polls == READY_POLLS {
                warn!("RDY never set, reading the data register anyway");
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        let microvolts = adc.read_microvolts()?;
        println!("{microvolts:.3} uV");

        taken += 1;
        std::thread::sleep(Duration::from_millis(args.interval_ms));
    }

    Ok(())
}

fn calibrate<SPI>(adc: &mut Max11270<SPI, Delay>, kind: Calibration) -> Result<(), anyhow::Error>
where
    SPI: ClockControl,
    SPI::Error: Send + Sync + 'static,
{
    match kind {
        Calibration::SelfCalibration => adc.perform_self_calibration(true)?,
        Calibration::ZeroScale => {
            warn!("zero-scale calibration expects AINP and AINN shorted");
            adc.perform_zero_scale_calibration()?
        }
    }

    let status = adc.read_status()?;
    if status.error() {
        warn!(%status, "chip reports a calibration error");
    } else {
        info!(%status, "calibration finished");
    }

    Ok(())
}
