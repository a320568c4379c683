//! Display configuration
//!
//! Everything board- or panel-specific is carried by a [`DisplayConfig`]
//! passed to [`crate::Ili9341::new`]; nothing lives in process-wide state.

use crate::command::{FRAME_RATE_DEFAULT, MADCTL_BGR, MADCTL_MV, MADCTL_MX, MADCTL_MY};
use crate::error::DisplayError;
use crate::transport::Framing;

/// Columns of controller frame memory (native, unrotated).
pub const CONTROLLER_COLUMNS: u16 = 240;
/// Pages (rows) of controller frame memory (native, unrotated).
pub const CONTROLLER_PAGES: u16 = 320;

// ---------------------------------------------------------------------------
// Pin assignment
// ---------------------------------------------------------------------------

/// Board pin numbers for each logical role.
///
/// The driver itself never touches pin numbers (it owns already-configured
/// `embedded-hal` pins); host tooling uses this to request GPIO lines and to
/// report the wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// SPI data in (controller → host). Unused by the write-only protocol.
    pub miso: u32,
    /// SPI clock.
    pub sck: u32,
    /// SPI data out (host → controller).
    pub mosi: u32,
    /// Hardware reset, active low.
    pub reset: u32,
    /// Data/command select (low = command, high = data).
    pub dc: u32,
    /// Chip select, active low.
    pub cs: u32,
}

impl PinAssignment {
    /// Reference wiring (Pico-style GPIO numbering).
    pub const REFERENCE: Self = Self {
        miso: 4,
        sck: 6,
        mosi: 7,
        reset: 19,
        dc: 20,
        cs: 5,
    };
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl core::fmt::Display for PinAssignment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "miso={} sck={} mosi={} reset={} dc={} cs={}",
            self.miso, self.sck, self.mosi, self.reset, self.dc, self.cs
        )
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Visible area in pixels, in the orientation programmed into MADCTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    width: u16,
    height: u16,
}

impl Geometry {
    /// 240×320 portrait panel.
    pub const PORTRAIT: Self = Self {
        width: CONTROLLER_COLUMNS,
        height: CONTROLLER_PAGES,
    };

    /// 320×240 landscape panel.
    pub const LANDSCAPE: Self = Self {
        width: CONTROLLER_PAGES,
        height: CONTROLLER_COLUMNS,
    };

    /// Validate and build a geometry. Both dimensions must be non-zero.
    pub const fn new(width: u16, height: u16) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidGeometry);
        }
        Ok(Self { width, height })
    }

    /// Width in pixels (column axis).
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels (page axis).
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// `width * height`. Computed in `u32`: 65535² still fits.
    // u16::MAX * u16::MAX < u32::MAX, so the product cannot overflow.
    #[allow(clippy::arithmetic_side_effects)]
    #[inline]
    pub const fn pixel_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Largest valid column index.
    #[inline]
    pub const fn max_x(&self) -> u16 {
        self.width.saturating_sub(1)
    }

    /// Largest valid page index.
    #[inline]
    pub const fn max_y(&self) -> u16 {
        self.height.saturating_sub(1)
    }

    /// `true` if `(x, y)` lies inside the visible area.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::PORTRAIT
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Scan orientation, programmed once through MemoryAccessControl (0x36).
///
/// The driver never swaps width and height itself: `x` is always sent as a
/// column address (0x2A) and `y` as a page address (0x2B). The MADCTL byte
/// decides how those axes map onto the glass, and [`DisplayConfig::validate`]
/// checks that the geometry agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// 240 wide × 320 tall, connector at the bottom (MADCTL 0x48).
    #[default]
    Portrait,
    /// 320 wide × 240 tall (MADCTL 0x28).
    Landscape,
    /// Portrait rotated 180° (MADCTL 0x88).
    PortraitFlipped,
    /// Landscape rotated 180° (MADCTL 0xE8).
    LandscapeFlipped,
}

impl Orientation {
    /// MemoryAccessControl data byte. Every variant selects BGR order.
    pub const fn madctl(self) -> u8 {
        match self {
            Self::Portrait => MADCTL_MX | MADCTL_BGR,
            Self::Landscape => MADCTL_MV | MADCTL_BGR,
            Self::PortraitFlipped => MADCTL_MY | MADCTL_BGR,
            Self::LandscapeFlipped => MADCTL_MY | MADCTL_MX | MADCTL_MV | MADCTL_BGR,
        }
    }

    /// Decode a MADCTL byte written by this driver.
    pub const fn from_madctl(byte: u8) -> Option<Self> {
        match byte {
            0x48 => Some(Self::Portrait),
            0x28 => Some(Self::Landscape),
            0x88 => Some(Self::PortraitFlipped),
            0xE8 => Some(Self::LandscapeFlipped),
            _ => None,
        }
    }

    /// `true` when rows and columns are exchanged (MV set).
    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::Landscape | Self::LandscapeFlipped)
    }

    /// Full-panel geometry for this orientation.
    pub const fn full_geometry(self) -> Geometry {
        if self.is_landscape() {
            Geometry::LANDSCAPE
        } else {
            Geometry::PORTRAIT
        }
    }
}

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Board wiring.
    pub pins: PinAssignment,
    /// Visible area; must match `orientation`.
    pub geometry: Geometry,
    /// MADCTL orientation.
    pub orientation: Orientation,
    /// FrameRateControl data bytes (DIVA, RTNA).
    pub frame_rate: [u8; 2],
    /// Chip-select framing used by hardware transports.
    pub framing: Framing,
    /// SPI clock in Hz, for host tooling that configures the bus.
    pub spi_frequency: u32,
}

impl DisplayConfig {
    /// Default configuration for a given orientation (full-panel geometry).
    pub const fn for_orientation(orientation: Orientation) -> Self {
        Self {
            pins: PinAssignment::REFERENCE,
            geometry: orientation.full_geometry(),
            orientation,
            frame_rate: FRAME_RATE_DEFAULT,
            framing: Framing::PerByte,
            spi_frequency: 32_000_000,
        }
    }

    /// Replace the pin assignment.
    pub const fn with_pins(mut self, pins: PinAssignment) -> Self {
        self.pins = pins;
        self
    }

    /// Replace the geometry (e.g. a cropped panel).
    pub const fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Replace the orientation and reset the geometry to that orientation's full panel.
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self.geometry = orientation.full_geometry();
        self
    }

    /// Replace the frame rate control bytes.
    pub const fn with_frame_rate(mut self, frame_rate: [u8; 2]) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Replace the chip-select framing.
    pub const fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Replace the SPI clock frequency.
    pub const fn with_spi_frequency(mut self, hz: u32) -> Self {
        self.spi_frequency = hz;
        self
    }

    /// Check that geometry fits controller RAM and agrees with the orientation.
    ///
    /// A portrait geometry under a landscape MADCTL (or the reverse) is
    /// rejected as soon as it exceeds the short axis.
    pub fn validate(&self) -> Result<(), DisplayError> {
        let full = self.orientation.full_geometry();
        if self.geometry.width() > full.width() || self.geometry.height() > full.height() {
            return Err(DisplayError::InvalidGeometry);
        }
        Ok(())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::for_orientation(Orientation::Portrait)
    }
}
