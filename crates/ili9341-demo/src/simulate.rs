//! `simulate` subcommand: demo sequence on the virtual panel, saved as PNG.

use std::convert::Infallible;
use std::path::Path;

use anyhow::{Context, Result};
use embedded_hal::digital::{ErrorType, OutputPin};
use image::RgbImage;
use tracing::{debug, info};

use ili9341::mock::RecordingDelay;
use ili9341::sim::VirtualPanel;
use ili9341::{demo, DisplayConfig, Ili9341, Orientation};

/// Reset line for the virtual panel. The model starts in its reset state,
/// so edges are only logged.
struct VirtualResetPin;

impl ErrorType for VirtualResetPin {
    type Error = Infallible;
}

impl OutputPin for VirtualResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        debug!("RESET low");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        debug!("RESET high");
        Ok(())
    }
}

pub fn run(orientation: Orientation, output: &Path) -> Result<()> {
    let config = DisplayConfig::for_orientation(orientation);
    info!(
        ?orientation,
        width = config.geometry.width(),
        height = config.geometry.height(),
        pins = %config.pins,
        "Rendering demo on virtual panel"
    );

    let panel = render(config)?;
    let image = to_image(&panel);
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(path = %output.display(), "Saved screenshot");
    Ok(())
}

/// Run the full demo sequence against a fresh virtual panel.
fn render(config: DisplayConfig) -> Result<VirtualPanel> {
    let mut panel = VirtualPanel::new();
    let mut lcd = Ili9341::new(&mut panel, VirtualResetPin, RecordingDelay::new(), config)
        .context("Invalid display configuration")?;
    demo::run(&mut lcd).context("Demo sequence failed")?;

    let (_, _, delay) = lcd.release();
    info!(
        pixels = panel.pixels_written(),
        commands = panel.opcodes().len(),
        waited_us = delay.total_ns() / 1_000,
        "Demo sequence complete"
    );
    if panel.unknown_opcodes() > 0 || panel.stray_data() > 0 {
        tracing::warn!(
            unknown_opcodes = panel.unknown_opcodes(),
            stray_data = panel.stray_data(),
            "Panel saw bytes it could not decode"
        );
    }
    Ok(panel)
}

/// Logical view of the panel as an 8-bit RGB image.
fn to_image(panel: &VirtualPanel) -> RgbImage {
    let g = panel.logical_geometry();
    let mut img = RgbImage::new(u32::from(g.width()), u32::from(g.height()));
    for (y, row) in (0u32..).zip(panel.rows()) {
        for (x, c) in (0u32..).zip(row) {
            img.put_pixel(x, y, image::Rgb([c.r, c.g, c.b]));
        }
    }
    img
}
