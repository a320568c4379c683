//! Demo and acceptance sequence
//!
//! Exercises the whole driver contract on a freshly powered panel:
//!
//! 1. [`Ili9341::init`]
//! 2. [`Ili9341::clear`] to black
//! 3. concentric [`draw_circle`] rings around the centre
//! 4. [`draw_gradient_sweep`]
//! 5. [`draw_corner_markers`], last so nothing overdraws them
//!
//! Every shape is plotted one pixel at a time through `draw_pixel`, so the
//! resulting byte stream is dominated by 1×1 address windows.

// Circle points are computed in f64 and truncated toward zero with `as`.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::arithmetic_side_effects
)]

use core::f64::consts::PI;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::color::Rgb;
use crate::config::Geometry;
use crate::driver::Ili9341;
use crate::error::DisplayError;
use crate::transport::Transport;

/// Angular samples per circle, one per degree.
pub const CIRCLE_STEPS: u16 = 360;

/// Column stride of the gradient sweep.
pub const GRADIENT_COLUMN_STEP: usize = 4;

/// Blue channel held constant across the gradient sweep.
pub const GRADIENT_BLUE: u8 = 0x80;

/// Rings drawn by [`run`]: radius and colour, centred on the screen.
pub const RINGS: [(u16, Rgb); 5] = [
    (20, Rgb::RED),
    (40, Rgb::GREEN),
    (60, Rgb::BLUE),
    (80, Rgb::WHITE),
    (100, Rgb::new(0xFF, 0xFF, 0x00)),
];

/// Corner pixels and their colours: top-left red, top-right green,
/// bottom-left blue, bottom-right white.
pub fn corner_markers(geometry: Geometry) -> [(u16, u16, Rgb); 4] {
    let (r, b) = (geometry.max_x(), geometry.max_y());
    [
        (0, 0, Rgb::RED),
        (r, 0, Rgb::GREEN),
        (0, b, Rgb::BLUE),
        (r, b, Rgb::WHITE),
    ]
}

/// Plot one pixel in each corner. See [`corner_markers`].
pub fn draw_corner_markers<T, RST, D>(lcd: &mut Ili9341<T, RST, D>) -> Result<(), DisplayError>
where
    T: Transport,
    RST: OutputPin,
    D: DelayNs,
{
    for (x, y, color) in corner_markers(lcd.geometry()) {
        lcd.draw_pixel(x, y, color)?;
    }
    Ok(())
}

/// Point on a circle at `degree`, truncated toward zero.
///
/// May be negative or off-screen; callers clip.
pub fn circle_point(cx: u16, cy: u16, radius: u16, degree: u16) -> (i32, i32) {
    let theta = f64::from(degree) * PI / 180.0;
    let r = f64::from(radius);
    let x = f64::from(cx) + r * libm::cos(theta);
    let y = f64::from(cy) + r * libm::sin(theta);
    (x as i32, y as i32)
}

/// Plot a circle as [`CIRCLE_STEPS`] one-degree samples.
///
/// No deduplication: small radii plot the same pixel repeatedly, and radius
/// 0 plots the centre 360 times. Samples outside the screen are skipped.
/// Returns how many samples were plotted.
///
/// Fails with [`DisplayError::InvalidCoordinate`] if the centre is off-screen.
pub fn draw_circle<T, RST, D>(
    lcd: &mut Ili9341<T, RST, D>,
    cx: u16,
    cy: u16,
    radius: u16,
    color: Rgb,
) -> Result<usize, DisplayError>
where
    T: Transport,
    RST: OutputPin,
    D: DelayNs,
{
    let geometry = lcd.geometry();
    if !geometry.contains(cx, cy) {
        return Err(DisplayError::InvalidCoordinate);
    }

    let mut plotted = 0;
    for degree in 0..CIRCLE_STEPS {
        let (x, y) = circle_point(cx, cy, radius, degree);
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            continue;
        };
        if !geometry.contains(x, y) {
            continue;
        }
        lcd.draw_pixel(x, y, color)?;
        plotted += 1;
    }
    Ok(plotted)
}

/// Gradient colour at `(x, y)`: red ramps with the column, green with the
/// row, blue fixed at [`GRADIENT_BLUE`].
pub fn gradient_color(geometry: Geometry, x: u16, y: u16) -> Rgb {
    Rgb::new(
        ramp(x, geometry.max_x()),
        ramp(y, geometry.max_y()),
        GRADIENT_BLUE,
    )
}

fn ramp(value: u16, max: u16) -> u8 {
    if max == 0 {
        return 0;
    }
    let v = u32::from(value.min(max));
    (v * 255 / u32::from(max)) as u8
}

/// Every fourth column, every row, one [`gradient_color`] pixel each.
pub fn draw_gradient_sweep<T, RST, D>(lcd: &mut Ili9341<T, RST, D>) -> Result<(), DisplayError>
where
    T: Transport,
    RST: OutputPin,
    D: DelayNs,
{
    let geometry = lcd.geometry();
    for x in (0..geometry.width()).step_by(GRADIENT_COLUMN_STEP) {
        for y in 0..geometry.height() {
            lcd.draw_pixel(x, y, gradient_color(geometry, x, y))?;
        }
    }
    Ok(())
}

/// Run the full sequence. Stops at the first error.
pub fn run<T, RST, D>(lcd: &mut Ili9341<T, RST, D>) -> Result<(), DisplayError>
where
    T: Transport,
    RST: OutputPin,
    D: DelayNs,
{
    lcd.init()?;
    lcd.clear(Rgb::BLACK)?;

    let geometry = lcd.geometry();
    let (cx, cy) = (geometry.width() / 2, geometry.height() / 2);
    for (radius, color) in RINGS {
        draw_circle(lcd, cx, cy, radius, color)?;
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("demo: gradient sweep");
    draw_gradient_sweep(lcd)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("demo: corner markers");
    draw_corner_markers(lcd)
}
