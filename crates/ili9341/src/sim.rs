//! Virtual ILI9341 panel
//!
//! [`VirtualPanel`] implements [`Transport`] and models the parts of the
//! controller this driver uses: opcode decoding, column/page window, the
//! auto-advancing memory write pointer, MADCTL axis mapping, sleep and
//! display state. Frame memory holds the raw RGB565 words as received.
//!
//! Glass coordinates are the unrotated 240 × 320 frame memory. Logical
//! coordinates are what the host addresses after MADCTL is applied:
//!
//! 1. MV exchanges column and page.
//! 2. MX mirrors the glass column, MY mirrors the glass row.
//!
//! The BGR bit is recorded but not applied; colours are stored as sent.

// Indices are bounds-checked against CONTROLLER_COLUMNS / CONTROLLER_PAGES
// before use.
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use crate::color::{unpack_rgb565, Rgb};
use crate::command::{Command, MADCTL_MV, MADCTL_MX, MADCTL_MY, PIXEL_FORMAT_16BPP};
use crate::config::{Geometry, Orientation, CONTROLLER_COLUMNS, CONTROLLER_PAGES};
use crate::error::DisplayError;
use crate::transport::Transport;

const GLASS_W: usize = CONTROLLER_COLUMNS as usize;
const GLASS_H: usize = CONTROLLER_PAGES as usize;

/// Power-on PixelFormatSet value (18 bpp).
pub const POWER_ON_PIXEL_FORMAT: u8 = 0x66;
/// Power-on FrameRateControl value.
pub const POWER_ON_FRAME_RATE: [u8; 2] = [0x00, 0x1B];

/// Software model of an ILI9341 with a 240 × 320 panel.
#[derive(Debug, Clone)]
pub struct VirtualPanel {
    memory: Vec<u16>,
    madctl: u8,
    pixel_format: u8,
    frame_rate: [u8; 2],
    sleeping: bool,
    display_on: bool,
    columns: (u16, u16),
    pages: (u16, u16),
    cursor: (u16, u16),
    current: Option<Command>,
    params: [u8; 4],
    param_len: usize,
    pending_high: Option<u8>,
    opcodes: Vec<u8>,
    unknown_opcodes: usize,
    stray_data: usize,
    pixels_written: u64,
}

impl Default for VirtualPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualPanel {
    /// Power-on state: memory black, asleep, display off, MADCTL 0.
    pub fn new() -> Self {
        Self {
            memory: vec![0; GLASS_W * GLASS_H],
            madctl: 0,
            pixel_format: POWER_ON_PIXEL_FORMAT,
            frame_rate: POWER_ON_FRAME_RATE,
            sleeping: true,
            display_on: false,
            columns: (0, CONTROLLER_COLUMNS - 1),
            pages: (0, CONTROLLER_PAGES - 1),
            cursor: (0, 0),
            current: None,
            params: [0; 4],
            param_len: 0,
            pending_high: None,
            opcodes: Vec::new(),
            unknown_opcodes: 0,
            stray_data: 0,
            pixels_written: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Current MADCTL byte.
    pub fn madctl(&self) -> u8 {
        self.madctl
    }

    /// Orientation matching the current MADCTL, if it is one the driver writes.
    pub fn orientation(&self) -> Option<Orientation> {
        Orientation::from_madctl(self.madctl)
    }

    /// Logical area under the current MADCTL (320 × 240 when MV is set).
    pub fn logical_geometry(&self) -> Geometry {
        if self.madctl & MADCTL_MV != 0 {
            Geometry::LANDSCAPE
        } else {
            Geometry::PORTRAIT
        }
    }

    /// Current PixelFormatSet value.
    pub fn pixel_format(&self) -> u8 {
        self.pixel_format
    }

    /// Current FrameRateControl bytes.
    pub fn frame_rate(&self) -> [u8; 2] {
        self.frame_rate
    }

    /// `true` until SleepOut.
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// `true` after DisplayOn, until DisplayOff or reset.
    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    /// Column range last programmed.
    pub fn column_range(&self) -> (u16, u16) {
        self.columns
    }

    /// Page range last programmed.
    pub fn page_range(&self) -> (u16, u16) {
        self.pages
    }

    /// Every opcode received, in order.
    pub fn opcodes(&self) -> &[u8] {
        &self.opcodes
    }

    /// Opcodes received that the model does not know.
    pub fn unknown_opcodes(&self) -> usize {
        self.unknown_opcodes
    }

    /// Data bytes that arrived with no command to consume them.
    pub fn stray_data(&self) -> usize {
        self.stray_data
    }

    /// Complete pixels stored through MemoryWrite.
    pub fn pixels_written(&self) -> u64 {
        self.pixels_written
    }

    /// Raw RGB565 word at logical `(x, y)`.
    pub fn raw_pixel(&self, x: u16, y: u16) -> Option<u16> {
        self.glass_index(x, y).map(|i| self.memory[i])
    }

    /// Colour at logical `(x, y)`, truncated to RGB565 resolution.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        self.raw_pixel(x, y).map(|w| unpack_rgb565(w.to_be_bytes()))
    }

    /// Colour at unrotated glass position `(col, row)`.
    pub fn glass_pixel(&self, col: u16, row: u16) -> Option<Rgb> {
        let (col, row) = (usize::from(col), usize::from(row));
        if col >= GLASS_W || row >= GLASS_H {
            return None;
        }
        Some(unpack_rgb565(self.memory[row * GLASS_W + col].to_be_bytes()))
    }

    /// Logical rows, top to bottom, as seen under the current MADCTL.
    pub fn rows(&self) -> Vec<Vec<Rgb>> {
        let g = self.logical_geometry();
        (0..g.height())
            .map(|y| {
                (0..g.width())
                    .map(|x| self.pixel(x, y).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Model
    // -----------------------------------------------------------------------

    fn glass_index(&self, x: u16, y: u16) -> Option<usize> {
        let (x, y) = (usize::from(x), usize::from(y));
        let (mut col, mut row) = if self.madctl & MADCTL_MV != 0 {
            (y, x)
        } else {
            (x, y)
        };
        if col >= GLASS_W || row >= GLASS_H {
            return None;
        }
        if self.madctl & MADCTL_MX != 0 {
            col = GLASS_W - 1 - col;
        }
        if self.madctl & MADCTL_MY != 0 {
            row = GLASS_H - 1 - row;
        }
        Some(row * GLASS_W + col)
    }

    fn software_reset(&mut self) {
        self.madctl = 0;
        self.pixel_format = POWER_ON_PIXEL_FORMAT;
        self.frame_rate = POWER_ON_FRAME_RATE;
        self.sleeping = true;
        self.display_on = false;
        self.columns = (0, CONTROLLER_COLUMNS - 1);
        self.pages = (0, CONTROLLER_PAGES - 1);
        self.cursor = (0, 0);
    }

    fn begin(&mut self, cmd: Command) {
        self.param_len = 0;
        self.pending_high = None;
        match cmd {
            Command::SoftwareReset => self.software_reset(),
            Command::SleepIn => self.sleeping = true,
            Command::SleepOut => self.sleeping = false,
            Command::DisplayOff => self.display_on = false,
            Command::DisplayOn => self.display_on = true,
            Command::MemoryWrite => self.cursor = (self.columns.0, self.pages.0),
            Command::ColumnAddressSet
            | Command::PageAddressSet
            | Command::MemoryAccessControl
            | Command::PixelFormatSet
            | Command::FrameRateControl => {}
        }
    }

    fn parameter(&mut self, cmd: Command, byte: u8) {
        if self.param_len >= self.params.len() {
            self.stray_data += 1;
            return;
        }
        self.params[self.param_len] = byte;
        self.param_len += 1;
        let p = self.params;
        match (cmd, self.param_len) {
            (Command::ColumnAddressSet, 4) => {
                self.columns = (u16::from_be_bytes([p[0], p[1]]), u16::from_be_bytes([p[2], p[3]]));
            }
            (Command::PageAddressSet, 4) => {
                self.pages = (u16::from_be_bytes([p[0], p[1]]), u16::from_be_bytes([p[2], p[3]]));
            }
            (Command::MemoryAccessControl, 1) => self.madctl = byte,
            (Command::PixelFormatSet, 1) => self.pixel_format = byte,
            (Command::FrameRateControl, 2) => self.frame_rate = [p[0], p[1]],
            (Command::ColumnAddressSet | Command::PageAddressSet, n) if n < 4 => {}
            (Command::FrameRateControl, 1) => {}
            _ => self.stray_data += 1,
        }
    }

    fn memory_byte(&mut self, byte: u8) {
        let Some(high) = self.pending_high.take() else {
            self.pending_high = Some(byte);
            return;
        };
        let word = u16::from_be_bytes([high, byte]);
        let (x, y) = self.cursor;
        if self.pixel_format == PIXEL_FORMAT_16BPP {
            if let Some(i) = self.glass_index(x, y) {
                self.memory[i] = word;
            }
        }
        self.pixels_written += 1;
        self.advance();
    }

    fn advance(&mut self) {
        let (x, y) = self.cursor;
        if x < self.columns.1 {
            self.cursor = (x + 1, y);
        } else if y < self.pages.1 {
            self.cursor = (self.columns.0, y + 1);
        } else {
            self.cursor = (self.columns.0, self.pages.0);
        }
    }
}

impl Transport for VirtualPanel {
    fn write_register_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.opcodes.push(value);
        self.current = Command::from_opcode(value);
        match self.current {
            Some(cmd) => self.begin(cmd),
            None => self.unknown_opcodes += 1,
        }
        Ok(())
    }

    fn write_data_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        match self.current {
            Some(Command::MemoryWrite) => self.memory_byte(value),
            Some(cmd) => self.parameter(cmd, value),
            None => self.stray_data += 1,
        }
        Ok(())
    }
}
