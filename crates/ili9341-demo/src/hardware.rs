//! `hardware` subcommand: demo sequence on a real panel.
//!
//! Two wirings are supported:
//!
//! | `--cs` | Transport | Chip select |
//! |--------|-----------|-------------|
//! | absent | [`SpiTransport`] over `SpidevDevice` | kernel-driven (spidev CE line) |
//! | line N | [`BusTransport`] over `SpidevBus` | GPIO line N, spidev opened with `SPI_NO_CS` |

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use embedded_hal::digital::OutputPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevBus, SpidevDevice};
use tracing::info;

use ili9341::{
    demo, BusTransport, DisplayConfig, Framing, Ili9341, PinAssignment, SpiTransport, Transport,
};

use crate::args::{FramingArg, OrientationArg};

#[derive(Args, Debug)]
pub struct HardwareArgs {
    /// spidev node
    #[arg(long, default_value = "/dev/spidev0.0")]
    spidev: PathBuf,
    /// GPIO character device owning the control lines
    #[arg(long, default_value = "/dev/gpiochip0")]
    gpiochip: PathBuf,
    /// Reset line offset
    #[arg(long, default_value_t = PinAssignment::REFERENCE.reset)]
    reset: u32,
    /// Data/command line offset
    #[arg(long, default_value_t = PinAssignment::REFERENCE.dc)]
    dc: u32,
    /// Chip-select line offset; omit to let spidev drive CS
    #[arg(long)]
    cs: Option<u32>,
    /// SPI clock in Hz
    #[arg(long, default_value_t = 32_000_000)]
    frequency: u32,
    /// Chip-select framing
    #[arg(long, value_enum, default_value_t = FramingArg::PerByte)]
    framing: FramingArg,
    /// MADCTL orientation
    #[arg(long, value_enum, default_value_t = OrientationArg::Portrait)]
    orientation: OrientationArg,
}

impl HardwareArgs {
    fn config(&self) -> DisplayConfig {
        let pins = PinAssignment {
            reset: self.reset,
            dc: self.dc,
            cs: self.cs.unwrap_or(PinAssignment::REFERENCE.cs),
            ..PinAssignment::REFERENCE
        };
        DisplayConfig::for_orientation(self.orientation.into())
            .with_pins(pins)
            .with_framing(self.framing.into())
            .with_spi_frequency(self.frequency)
    }
}

pub fn run(args: &HardwareArgs) -> Result<()> {
    let config = args.config();
    info!(
        spidev = %args.spidev.display(),
        gpiochip = %args.gpiochip.display(),
        pins = %config.pins,
        gpio_cs = args.cs.is_some(),
        hz = config.spi_frequency,
        framing = ?config.framing,
        orientation = ?config.orientation,
        "Opening panel"
    );

    let mut chip = Chip::new(&args.gpiochip)
        .with_context(|| format!("Failed to open {}", args.gpiochip.display()))?;
    let rst = output_line(&mut chip, config.pins.reset, "ili9341-reset", 1)?;
    let dc = output_line(&mut chip, config.pins.dc, "ili9341-dc", 0)?;

    match args.cs {
        Some(cs_line) => {
            let cs = output_line(&mut chip, cs_line, "ili9341-cs", 1)?;
            let mut bus = SpidevBus::open(&args.spidev)
                .with_context(|| format!("Failed to open {}", args.spidev.display()))?;
            bus.configure(&spi_options(config.spi_frequency, true))
                .context("Failed to configure spidev")?;
            drive(BusTransport::with_framing(bus, cs, dc, config.framing), rst, config)
        }
        None => {
            let mut dev = SpidevDevice::open(&args.spidev)
                .with_context(|| format!("Failed to open {}", args.spidev.display()))?;
            dev.configure(&spi_options(config.spi_frequency, false))
                .context("Failed to configure spidev")?;
            drive(SpiTransport::with_framing(dev, dc, config.framing), rst, config)
        }
    }
}

/// SPI mode 0, 8-bit words, MSB first.
fn spi_options(hz: u32, gpio_cs: bool) -> SpidevOptions {
    let mut mode = SpiModeFlags::SPI_MODE_0;
    if gpio_cs {
        mode |= SpiModeFlags::SPI_NO_CS;
    }
    SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(hz)
        .lsb_first(false)
        .mode(mode)
        .build()
}

fn output_line(chip: &mut Chip, offset: u32, label: &str, initial: u8) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .with_context(|| format!("No GPIO line {offset}"))?
        .request(LineRequestFlags::OUTPUT, initial, label)
        .with_context(|| format!("Failed to request GPIO line {offset} ({label})"))?;
    CdevPin::new(handle).with_context(|| format!("Failed to wrap GPIO line {offset}"))
}

fn drive<T, RST>(transport: T, rst: RST, config: DisplayConfig) -> Result<()>
where
    T: Transport,
    RST: OutputPin,
{
    let framing = config.framing;
    let mut lcd =
        Ili9341::new(transport, rst, Delay, config).context("Invalid display configuration")?;
    demo::run(&mut lcd).context("Demo sequence failed")?;
    if framing == Framing::PerByte {
        info!("Demo complete (per-byte framing; use --framing burst for faster fills)");
    } else {
        info!("Demo complete");
    }
    Ok(())
}
