//! `ili9341-demo`: run the ILI9341 demo sequence from a host machine.
//!
//! ```text
//! ili9341-demo simulate --orientation landscape --output demo.png
//! ili9341-demo hardware --spidev /dev/spidev0.0 --reset 19 --dc 20   # --features linux
//! ```

// Desktop/tooling crate: missing rustdoc on CLI plumbing is fine.
#![allow(missing_docs)]

mod args;
#[cfg(feature = "linux")]
mod hardware;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::OrientationArg;

#[derive(Parser)]
#[command(name = "ili9341-demo")]
#[command(about = "ILI9341 TFT demo sequence: virtual panel or real hardware", long_about = None)]
#[command(version)]
struct Cli {
    /// Force debug logging (otherwise RUST_LOG, default info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the demo on the virtual panel and save it as a PNG
    Simulate {
        /// MADCTL orientation
        #[arg(long, value_enum, default_value_t = OrientationArg::Portrait)]
        orientation: OrientationArg,
        /// Output image path
        #[arg(short, long, default_value = "demo.png")]
        output: std::path::PathBuf,
    },
    /// Run the demo on a panel wired to Linux spidev + GPIO character device
    #[cfg(feature = "linux")]
    Hardware(hardware::HardwareArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Simulate {
            orientation,
            output,
        } => simulate::run(orientation.into(), &output),
        #[cfg(feature = "linux")]
        Commands::Hardware(args) => hardware::run(&args),
    }
}
