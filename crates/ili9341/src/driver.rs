//! ILI9341 Driver
//!
//! Blocking driver for the ILI9341 TFT controller. All bytes go through a
//! [`Transport`], so the same driver runs against real SPI hardware, the
//! recording test double and the virtual panel.
//!
//! # Addressing
//!
//! `x` is always sent as a column address (ColumnAddressSet, 0x2A) and `y` as
//! a page address (PageAddressSet, 0x2B). Which edge of the glass those axes
//! run along is decided once by the MADCTL byte written during [`Ili9341::init`].
//! The controller then auto-advances through the window: column first,
//! wrapping to the next page at the window's right edge.
//!
//! Every window is checked against the configured geometry before a single
//! byte is sent, so an invalid request leaves the bus untouched.

// Window and pixel counts are bounded by Geometry (u16 axes, u32 area).
// Pixel coordinates from embedded-graphics are i32; they are converted with
// `u16::try_from` after clipping.
#![allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Rgb;
use crate::command::{
    Command, PIXEL_FORMAT_16BPP, RESET_PULSE_US, SLEEP_IN_MS, SLEEP_OUT_MS, SOFTWARE_RESET_MS,
};
use crate::config::{DisplayConfig, Geometry, Orientation};
use crate::error::DisplayError;
use crate::transport::Transport;

/// Pixels packed into one `write_data` call by [`Ili9341::fill_window`].
const FILL_CHUNK_PIXELS: usize = 32;

// ---------------------------------------------------------------------------
// AddressWindow
// ---------------------------------------------------------------------------

/// Inclusive column/page range, `x0..=x1` by `y0..=y1`.
///
/// Always ordered: the only ways to build one are [`new`](Self::new),
/// [`pixel`](Self::pixel), [`cursor`](Self::cursor) and [`full`](Self::full).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

impl AddressWindow {
    /// Build a window. Rejects a start past its end.
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Result<Self, DisplayError> {
        if x0 > x1 || y0 > y1 {
            return Err(DisplayError::InvalidCoordinate);
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// A single pixel.
    pub const fn pixel(x: u16, y: u16) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    /// Write-cursor window for `(x, y)`: ends one column and one page past
    /// the start, clamped to the last column and page of `geometry`.
    ///
    /// A start outside `geometry` is kept as is so that [`fits`](Self::fits)
    /// rejects it.
    pub const fn cursor(x: u16, y: u16, geometry: Geometry) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: step_clamped(x, geometry.max_x()),
            y1: step_clamped(y, geometry.max_y()),
        }
    }

    /// Whole visible area.
    pub const fn full(geometry: Geometry) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: geometry.max_x(),
            y1: geometry.max_y(),
        }
    }

    /// First column.
    pub const fn x0(&self) -> u16 {
        self.x0
    }

    /// First page.
    pub const fn y0(&self) -> u16 {
        self.y0
    }

    /// Last column (inclusive).
    pub const fn x1(&self) -> u16 {
        self.x1
    }

    /// Last page (inclusive).
    pub const fn y1(&self) -> u16 {
        self.y1
    }

    /// Columns covered, at most 65 536.
    pub const fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0) as u32 + 1
    }

    /// Pages covered, at most 65 536.
    pub const fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0) as u32 + 1
    }

    /// Pixels covered. Wide enough for a full 65 536 × 65 536 range.
    pub const fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// `true` if entirely inside `geometry`.
    pub const fn fits(&self, geometry: Geometry) -> bool {
        self.x1 < geometry.width() && self.y1 < geometry.height()
    }
}

/// `value + 1`, but never past `max`. A `value` already past `max` is
/// returned unchanged.
const fn step_clamped(value: u16, max: u16) -> u16 {
    if value < max {
        value + 1
    } else if value == max {
        max
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Driver struct
// ---------------------------------------------------------------------------

/// ILI9341 display driver.
///
/// Generic over:
/// - `T`: a [`Transport`] framing register and data bytes.
/// - `RST`: reset [`OutputPin`], active low.
/// - `D`: [`DelayNs`] for the reset and sleep-out waits.
///
/// The driver keeps no copy of frame memory. The only controller state it
/// remembers is the last address window it programmed.
pub struct Ili9341<T, RST, D> {
    transport: T,
    rst: RST,
    delay: D,
    config: DisplayConfig,
    columns: Option<(u16, u16)>,
    pages: Option<(u16, u16)>,
}

impl<T, RST, D> Ili9341<T, RST, D>
where
    T: Transport,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a driver. Nothing is sent until [`init`](Self::init).
    ///
    /// Fails with [`DisplayError::InvalidGeometry`] if `config` does not
    /// validate.
    pub fn new(
        transport: T,
        rst: RST,
        delay: D,
        config: DisplayConfig,
    ) -> Result<Self, DisplayError> {
        config.validate()?;
        Ok(Self {
            transport,
            rst,
            delay,
            config,
            columns: None,
            pages: None,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Visible area.
    pub fn geometry(&self) -> Geometry {
        self.config.geometry
    }

    /// Orientation written to MADCTL by `init`.
    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    /// Last window set through the addressing methods, once both axes are known.
    pub fn window(&self) -> Option<AddressWindow> {
        match (self.columns, self.pages) {
            (Some((x0, x1)), Some((y0, y1))) => Some(AddressWindow { x0, y0, x1, y1 }),
            _ => None,
        }
    }

    /// Borrow the transport (e.g. to inspect a recording).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the transport, reset pin and delay.
    pub fn release(self) -> (T, RST, D) {
        (self.transport, self.rst, self.delay)
    }

    // -----------------------------------------------------------------------
    // Low-level helpers
    // -----------------------------------------------------------------------

    fn send_command(&mut self, cmd: Command) -> Result<(), DisplayError> {
        self.transport.write_register_byte(cmd.opcode())
    }

    fn cmd_data(&mut self, cmd: Command, data: &[u8]) -> Result<(), DisplayError> {
        self.transport.write_command(cmd.opcode(), data)
    }

    // -----------------------------------------------------------------------
    // Reset and power
    // -----------------------------------------------------------------------

    /// Pulse the reset line: low, high, low, high, waiting
    /// [`RESET_PULSE_US`] after each edge.
    ///
    /// The line ends high (controller running).
    pub fn hardware_reset(&mut self) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("ILI9341: hardware reset");

        self.rst.set_low().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_us(RESET_PULSE_US);
        self.rst.set_high().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_us(RESET_PULSE_US);
        self.rst.set_low().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_us(RESET_PULSE_US);
        self.rst.set_high().map_err(|_| DisplayError::Gpio)?;
        self.delay.delay_us(RESET_PULSE_US);
        Ok(())
    }

    /// SoftwareReset (0x01), then wait [`SOFTWARE_RESET_MS`].
    pub fn software_reset(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::SoftwareReset)?;
        self.delay.delay_ms(SOFTWARE_RESET_MS);
        self.columns = None;
        self.pages = None;
        Ok(())
    }

    /// SleepOut (0x11), then wait [`SLEEP_OUT_MS`] for the booster to settle.
    pub fn sleep_out(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::SleepOut)?;
        self.delay.delay_ms(SLEEP_OUT_MS);
        Ok(())
    }

    /// SleepIn (0x10), then wait [`SLEEP_IN_MS`]. Frame memory is kept.
    pub fn sleep_in(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::SleepIn)?;
        self.delay.delay_ms(SLEEP_IN_MS);
        Ok(())
    }

    /// DisplayOn (0x29).
    pub fn display_on(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::DisplayOn)
    }

    /// DisplayOff (0x28).
    pub fn display_off(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::DisplayOff)
    }

    // -----------------------------------------------------------------------
    // Configuration registers
    // -----------------------------------------------------------------------

    /// MemoryAccessControl (0x36) with one data byte.
    pub fn set_memory_access_control(&mut self, madctl: u8) -> Result<(), DisplayError> {
        self.cmd_data(Command::MemoryAccessControl, &[madctl])
    }

    /// PixelFormatSet (0x3A) with one data byte.
    pub fn set_pixel_format(&mut self, format: u8) -> Result<(), DisplayError> {
        self.cmd_data(Command::PixelFormatSet, &[format])
    }

    /// FrameRateControl (0xB1) with DIVA and RTNA.
    pub fn set_frame_rate_control(&mut self, params: [u8; 2]) -> Result<(), DisplayError> {
        self.cmd_data(Command::FrameRateControl, &params)
    }

    /// MemoryWrite (0x2C). Data bytes that follow are pixels.
    pub fn enter_memory_write(&mut self) -> Result<(), DisplayError> {
        self.send_command(Command::MemoryWrite)
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    /// Bring the controller from power-on to ready-to-draw.
    ///
    /// Hardware reset, software reset, sleep out (100 ms), display on,
    /// MADCTL from the configured orientation, 16 bpp pixel format, frame
    /// rate control. Stops at the first failure.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::info!("ILI9341: init ({})", self.config.orientation);

        self.hardware_reset()?;
        self.software_reset()?;
        self.sleep_out()?;
        self.display_on()?;
        self.set_memory_access_control(self.config.orientation.madctl())?;
        self.set_pixel_format(PIXEL_FORMAT_16BPP)?;
        self.set_frame_rate_control(self.config.frame_rate)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ILI9341: init complete");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Addressing
    // -----------------------------------------------------------------------

    /// ColumnAddressSet (0x2A): `x0..=x1`, each sent big-endian.
    pub fn set_column_address(&mut self, x0: u16, x1: u16) -> Result<(), DisplayError> {
        if x0 > x1 || x1 >= self.config.geometry.width() {
            return Err(DisplayError::InvalidCoordinate);
        }
        let [s_hi, s_lo] = x0.to_be_bytes();
        let [e_hi, e_lo] = x1.to_be_bytes();
        self.cmd_data(Command::ColumnAddressSet, &[s_hi, s_lo, e_hi, e_lo])?;
        self.columns = Some((x0, x1));
        Ok(())
    }

    /// PageAddressSet (0x2B): `y0..=y1`, each sent big-endian.
    pub fn set_page_address(&mut self, y0: u16, y1: u16) -> Result<(), DisplayError> {
        if y0 > y1 || y1 >= self.config.geometry.height() {
            return Err(DisplayError::InvalidCoordinate);
        }
        let [s_hi, s_lo] = y0.to_be_bytes();
        let [e_hi, e_lo] = y1.to_be_bytes();
        self.cmd_data(Command::PageAddressSet, &[s_hi, s_lo, e_hi, e_lo])?;
        self.pages = Some((y0, y1));
        Ok(())
    }

    /// Column range, then page range. Validated as a whole first.
    pub fn set_address_window(&mut self, window: AddressWindow) -> Result<(), DisplayError> {
        if !window.fits(self.config.geometry) {
            return Err(DisplayError::InvalidCoordinate);
        }
        self.set_column_address(window.x0(), window.x1())?;
        self.set_page_address(window.y0(), window.y1())
    }

    /// Point the write cursor at `(x, y)`: window `x..=x+1` by `y..=y+1`
    /// (clamped at the last column and page), then MemoryWrite.
    ///
    /// The next two data bytes land on `(x, y)`.
    pub fn set_pixel(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        if !self.config.geometry.contains(x, y) {
            return Err(DisplayError::InvalidCoordinate);
        }
        self.set_address_window(AddressWindow::cursor(x, y, self.config.geometry))?;
        self.enter_memory_write()
    }

    // -----------------------------------------------------------------------
    // Pixel data
    // -----------------------------------------------------------------------

    /// Send one RGB565 pixel (two data bytes).
    pub fn write_color(&mut self, color: Rgb) -> Result<(), DisplayError> {
        self.transport.write_data(&color.to_rgb565_bytes())
    }

    /// `set_pixel` followed by `write_color`.
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb) -> Result<(), DisplayError> {
        self.set_pixel(x, y)?;
        self.write_color(color)
    }

    /// Program `window`, enter memory write and stream one colour per pixel.
    pub fn fill_window(&mut self, window: AddressWindow, color: Rgb) -> Result<(), DisplayError> {
        self.set_address_window(window)?;
        self.enter_memory_write()?;

        let pixel = color.to_rgb565_bytes();
        let mut chunk = [0u8; FILL_CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair.copy_from_slice(&pixel);
        }

        let mut remaining = window.pixel_count();
        while remaining > 0 {
            let n = usize::try_from(remaining)
                .map_or(FILL_CHUNK_PIXELS, |r| r.min(FILL_CHUNK_PIXELS));
            // n <= FILL_CHUNK_PIXELS, so n * 2 <= chunk.len().
            #[allow(clippy::indexing_slicing)]
            self.transport.write_data(&chunk[..n * 2])?;
            remaining = remaining.saturating_sub(n as u64);
        }
        Ok(())
    }

    /// Fill the whole visible area with `color`.
    ///
    /// Sends the full window, MemoryWrite, then exactly
    /// `width * height * 2` data bytes.
    pub fn clear(&mut self, color: Rgb) -> Result<(), DisplayError> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ILI9341: clear");

        self.fill_window(AddressWindow::full(self.config.geometry), color)
    }
}

// ---------------------------------------------------------------------------
// embedded-graphics integration
// ---------------------------------------------------------------------------

impl<T, RST, D> OriginDimensions for Ili9341<T, RST, D> {
    fn size(&self) -> Size {
        let g = self.config.geometry;
        Size::new(u32::from(g.width()), u32::from(g.height()))
    }
}

impl<T, RST, D> DrawTarget for Ili9341<T, RST, D>
where
    T: Transport,
    RST: OutputPin,
    D: DelayNs,
{
    type Color = Rgb565;
    type Error = DisplayError;

    /// Plot each pixel through `draw_pixel`. Pixels off the visible area are
    /// skipped.
    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if !self.config.geometry.contains(x, y) {
                continue;
            }
            self.draw_pixel(x, y, color.into())?;
        }
        Ok(())
    }

    /// Clip `area` to the screen and stream it as one window.
    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let to_u16 = |v: i32| u16::try_from(v).map_err(|_| DisplayError::InvalidCoordinate);
        let window = AddressWindow::new(
            to_u16(area.top_left.x)?,
            to_u16(area.top_left.y)?,
            to_u16(bottom_right.x)?,
            to_u16(bottom_right.y)?,
        )?;
        self.fill_window(window, color.into())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Ili9341::clear(self, color.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    use crate::mock::{Frame, RecordingDelay, RecordingTransport};

    use embedded_graphics::primitives::PrimitiveStyle;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// A reset pin that must never be touched.
    fn idle_pin() -> PinMock {
        PinMock::new(&[])
    }

    /// RST pin mock expecting low, high, low, high.
    fn rst_reset_sequence() -> PinMock {
        PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ])
    }

    fn driver(
        rec: &mut RecordingTransport,
        rst: PinMock,
    ) -> Ili9341<&mut RecordingTransport, PinMock, NoopDelay> {
        Ili9341::new(rec, rst, NoopDelay, DisplayConfig::default()).unwrap()
    }

    fn reg(op: u8) -> Frame {
        Frame::Register(op)
    }

    fn data(bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().copied().map(Frame::Data).collect()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn test_new_rejects_mismatched_geometry() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let cfg = DisplayConfig::default().with_geometry(Geometry::LANDSCAPE);
        let rejected = Ili9341::new(&mut rec, rst.clone(), NoopDelay, cfg)
            .is_err_and(|e| e == DisplayError::InvalidGeometry);
        assert!(rejected);
        assert!(rec.frames().is_empty());
        rst.done();
    }

    #[test]
    fn test_new_sends_nothing() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let lcd = driver(&mut rec, rst.clone());
        assert_eq!(lcd.window(), None);
        drop(lcd);
        assert!(rec.frames().is_empty());
        rst.done();
    }

    // -----------------------------------------------------------------------
    // Reset and init
    // -----------------------------------------------------------------------

    #[test]
    fn test_hardware_reset_pin_sequence_and_delays() {
        let mut rec = RecordingTransport::new();
        let mut rst = rst_reset_sequence();
        let mut lcd =
            Ili9341::new(&mut rec, rst.clone(), RecordingDelay::new(), DisplayConfig::default())
                .unwrap();

        lcd.hardware_reset().unwrap();

        let (_, _, delay) = lcd.release();
        assert_eq!(delay.calls().len(), 4, "one wait after every edge");
        assert!(delay.calls().iter().all(|&ns| ns >= 10_000));
        assert!(rec.frames().is_empty(), "reset is pin-only");
        rst.done();
    }

    #[test]
    fn test_sleep_out_waits_at_least_100ms() {
        let mut rec = RecordingTransport::new();
        let mut lcd =
            Ili9341::new(&mut rec, idle_pin(), RecordingDelay::new(), DisplayConfig::default())
                .unwrap();

        lcd.sleep_out().unwrap();

        let (_, mut rst, delay) = lcd.release();
        assert_eq!(delay.calls(), &[100_000_000]);
        assert_eq!(rec.frames(), &[reg(0x11)]);
        rst.done();
    }

    #[test]
    fn test_init_command_sequence() {
        let mut rec = RecordingTransport::new();
        let mut rst = rst_reset_sequence();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.init().unwrap();
        drop(lcd);

        let mut expected = vec![reg(0x01), reg(0x11), reg(0x29), reg(0x36)];
        expected.extend(data(&[0x48]));
        expected.push(reg(0x3A));
        expected.extend(data(&[0x55]));
        expected.push(reg(0xB1));
        expected.extend(data(&[0x00, 0x18]));
        assert_eq!(rec.frames(), expected.as_slice());
        rst.done();
    }

    #[test]
    fn test_init_uses_orientation_madctl() {
        let mut rec = RecordingTransport::new();
        let mut rst = rst_reset_sequence();
        let cfg = DisplayConfig::for_orientation(Orientation::LandscapeFlipped);
        let mut lcd = Ili9341::new(&mut rec, rst.clone(), NoopDelay, cfg).unwrap();

        lcd.init().unwrap();
        drop(lcd);

        let cmds = rec.commands();
        assert!(cmds.contains(&(0x36, vec![0xE8])));
        rst.done();
    }

    #[test]
    fn test_init_stops_on_first_error() {
        let mut rec = RecordingTransport::failing_after(2);
        let mut rst = rst_reset_sequence();
        let mut lcd = driver(&mut rec, rst.clone());

        assert_eq!(lcd.init(), Err(DisplayError::Communication));
        drop(lcd);

        assert_eq!(rec.frames(), &[reg(0x01), reg(0x11)]);
        rst.done();
    }

    #[test]
    fn test_sleep_in_and_display_off() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.display_off().unwrap();
        lcd.sleep_in().unwrap();
        drop(lcd);

        assert_eq!(rec.frames(), &[reg(0x28), reg(0x10)]);
        rst.done();
    }

    // -----------------------------------------------------------------------
    // Addressing
    // -----------------------------------------------------------------------

    #[test]
    fn test_column_address_big_endian() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.set_column_address(0x0012, 0x00EF).unwrap();
        drop(lcd);

        let mut expected = vec![reg(0x2A)];
        expected.extend(data(&[0x00, 0x12, 0x00, 0xEF]));
        assert_eq!(rec.frames(), expected.as_slice());
        rst.done();
    }

    #[test]
    fn test_page_address_high_byte() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.set_page_address(0x0100, 0x013F).unwrap();
        drop(lcd);

        let mut expected = vec![reg(0x2B)];
        expected.extend(data(&[0x01, 0x00, 0x01, 0x3F]));
        assert_eq!(rec.frames(), expected.as_slice());
        rst.done();
    }

    #[test]
    fn test_invalid_ranges_send_nothing() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        assert_eq!(lcd.set_column_address(10, 9), Err(DisplayError::InvalidCoordinate));
        assert_eq!(lcd.set_column_address(0, 240), Err(DisplayError::InvalidCoordinate));
        assert_eq!(lcd.set_page_address(0, 320), Err(DisplayError::InvalidCoordinate));
        assert_eq!(lcd.set_pixel(240, 0), Err(DisplayError::InvalidCoordinate));
        assert_eq!(lcd.set_pixel(0, 320), Err(DisplayError::InvalidCoordinate));
        assert_eq!(lcd.window(), None);
        drop(lcd);

        assert!(rec.frames().is_empty());
        rst.done();
    }

    #[test]
    fn test_draw_pixel_frames() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.draw_pixel(5, 300, Rgb::RED).unwrap();
        assert_eq!(lcd.window(), Some(AddressWindow::new(5, 300, 6, 301).unwrap()));
        drop(lcd);

        let mut expected = vec![reg(0x2A)];
        expected.extend(data(&[0x00, 0x05, 0x00, 0x06]));
        expected.push(reg(0x2B));
        expected.extend(data(&[0x01, 0x2C, 0x01, 0x2D]));
        expected.push(reg(0x2C));
        expected.extend(data(&[0xF8, 0x00]));
        assert_eq!(rec.frames(), expected.as_slice());
        rst.done();
    }

    // -----------------------------------------------------------------------
    // Fill
    // -----------------------------------------------------------------------

    #[test]
    fn test_clear_byte_count() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.clear(Rgb::BLACK).unwrap();
        assert_eq!(lcd.window(), Some(AddressWindow::full(Geometry::PORTRAIT)));
        drop(lcd);

        let frames = rec.frames();
        // 2A + 4, 2B + 4, 2C
        assert_eq!(frames[0], reg(0x2A));
        assert_eq!(frames[1..5], data(&[0x00, 0x00, 0x00, 0xEF])[..]);
        assert_eq!(frames[5], reg(0x2B));
        assert_eq!(frames[6..10], data(&[0x00, 0x00, 0x01, 0x3F])[..]);
        assert_eq!(frames[10], reg(0x2C));
        let pixels = &frames[11..];
        assert_eq!(pixels.len(), 240 * 320 * 2);
        assert!(pixels.iter().all(|f| *f == Frame::Data(0)));
        rst.done();
    }

    #[test]
    fn test_fill_window_partial_chunk() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        // 7 × 5 = 35 pixels: one full chunk plus three.
        let window = AddressWindow::new(10, 20, 16, 24).unwrap();
        lcd.fill_window(window, Rgb::BLUE).unwrap();
        drop(lcd);

        let pixels = rec.data_after_last(0x2C);
        assert_eq!(pixels.len(), 35 * 2);
        assert!(pixels.chunks_exact(2).all(|p| p == [0x00, 0x1F]));
        rst.done();
    }

    // -----------------------------------------------------------------------
    // embedded-graphics
    // -----------------------------------------------------------------------

    #[test]
    fn test_draw_iter_clips_off_screen() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.draw_iter([
            Pixel(Point::new(-1, 0), Rgb565::RED),
            Pixel(Point::new(0, 320), Rgb565::RED),
            Pixel(Point::new(239, 319), Rgb565::WHITE),
        ])
        .unwrap();
        drop(lcd);

        assert_eq!(rec.count_register(0x2C), 1);
        assert_eq!(rec.data_after_last(0x2C), vec![0xFF, 0xFF]);
        rst.done();
    }

    #[test]
    fn test_fill_solid_clips_to_screen() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        Rectangle::new(Point::new(230, 310), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::GREEN))
            .draw(&mut lcd)
            .unwrap();
        assert_eq!(
            lcd.window(),
            Some(AddressWindow::new(230, 310, 239, 319).unwrap())
        );
        drop(lcd);

        assert_eq!(rec.data_after_last(0x2C).len(), 10 * 10 * 2);
        rst.done();
    }

    #[test]
    fn test_fill_solid_fully_off_screen_is_silent() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.fill_solid(
            &Rectangle::new(Point::new(400, 400), Size::new(5, 5)),
            Rgb565::GREEN,
        )
        .unwrap();
        drop(lcd);

        assert!(rec.frames().is_empty());
        rst.done();
    }

    #[test]
    fn test_size_follows_geometry() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let cfg = DisplayConfig::for_orientation(Orientation::Landscape);
        let lcd = Ili9341::new(&mut rec, rst.clone(), NoopDelay, cfg).unwrap();
        assert_eq!(lcd.size(), Size::new(320, 240));
        rst.done();
    }

    #[test]
    fn test_set_pixel_window_clamped_at_far_edge() {
        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());

        lcd.draw_pixel(239, 319, Rgb::WHITE).unwrap();
        lcd.draw_pixel(238, 0, Rgb::WHITE).unwrap();
        drop(lcd);

        let windows: Vec<Vec<u8>> = rec
            .commands()
            .into_iter()
            .filter(|(op, _)| *op == 0x2A || *op == 0x2B)
            .map(|(_, p)| p)
            .collect();
        assert_eq!(
            windows,
            vec![
                vec![0x00, 0xEF, 0x00, 0xEF],
                vec![0x01, 0x3F, 0x01, 0x3F],
                vec![0x00, 0xEE, 0x00, 0xEF],
                vec![0x00, 0x00, 0x00, 0x01],
            ]
        );
        rst.done();
    }

    #[test]
    fn test_address_window_helpers() {
        assert_eq!(AddressWindow::new(3, 0, 2, 0), Err(DisplayError::InvalidCoordinate));
        let w = AddressWindow::full(Geometry::LANDSCAPE);
        assert_eq!((w.x1(), w.y1()), (319, 239));
        assert_eq!(w.pixel_count(), 76_800);
        assert!(w.fits(Geometry::LANDSCAPE));
        assert!(!w.fits(Geometry::PORTRAIT));
        assert_eq!(AddressWindow::pixel(4, 4).pixel_count(), 1);
        let c = AddressWindow::cursor(4, 319, Geometry::PORTRAIT);
        assert_eq!((c.x0(), c.x1(), c.y0(), c.y1()), (4, 5, 319, 319));
    }

    #[test]
    fn test_address_window_full_u16_range() {
        let w = AddressWindow::new(0, 0, u16::MAX, u16::MAX).unwrap();
        assert_eq!(w.width(), 65_536);
        assert_eq!(w.height(), 65_536);
        assert_eq!(w.pixel_count(), 1 << 32);

        let mut rec = RecordingTransport::new();
        let mut rst = idle_pin();
        let mut lcd = driver(&mut rec, rst.clone());
        assert_eq!(lcd.fill_window(w, Rgb::RED), Err(DisplayError::InvalidCoordinate));
        drop(lcd);
        assert!(rec.frames().is_empty());
        rst.done();
    }
}
