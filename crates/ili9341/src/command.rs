//! ILI9341 command opcodes and fixed parameter values.

/// ILI9341 command codes used by this driver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Software reset: 0 data bytes; wait ≥5 ms before the next command.
    SoftwareReset = 0x01,
    /// Sleep in: 0 data bytes; wait ≥5 ms.
    SleepIn = 0x10,
    /// Sleep out: 0 data bytes; wait ≥120 ms before sleep in, ≥5 ms before others.
    SleepOut = 0x11,
    /// Display off: panel output blanked, frame memory kept.
    DisplayOff = 0x28,
    /// Display on.
    DisplayOn = 0x29,
    /// Column address set: 4 data bytes (SC hi, SC lo, EC hi, EC lo).
    ColumnAddressSet = 0x2A,
    /// Page address set: 4 data bytes (SP hi, SP lo, EP hi, EP lo).
    PageAddressSet = 0x2B,
    /// Memory write: following data bytes are pixel data.
    MemoryWrite = 0x2C,
    /// Memory access control: 1 data byte (MY MX MV ML BGR MH - -).
    MemoryAccessControl = 0x36,
    /// Pixel format set: 1 data byte.
    PixelFormatSet = 0x3A,
    /// Frame rate control (normal mode): 2 data bytes (DIVA, RTNA).
    FrameRateControl = 0xB1,
}

impl Command {
    /// Raw opcode byte.
    #[inline]
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Decode an opcode byte, `None` for opcodes this driver never sends.
    pub const fn from_opcode(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => Self::SoftwareReset,
            0x10 => Self::SleepIn,
            0x11 => Self::SleepOut,
            0x28 => Self::DisplayOff,
            0x29 => Self::DisplayOn,
            0x2A => Self::ColumnAddressSet,
            0x2B => Self::PageAddressSet,
            0x2C => Self::MemoryWrite,
            0x36 => Self::MemoryAccessControl,
            0x3A => Self::PixelFormatSet,
            0xB1 => Self::FrameRateControl,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Parameter constants
// ---------------------------------------------------------------------------

/// MADCTL bit: row address order (MY).
pub const MADCTL_MY: u8 = 0x80;
/// MADCTL bit: column address order (MX).
pub const MADCTL_MX: u8 = 0x40;
/// MADCTL bit: row/column exchange (MV).
pub const MADCTL_MV: u8 = 0x20;
/// MADCTL bit: BGR colour filter order.
pub const MADCTL_BGR: u8 = 0x08;

/// Pixel format 16 bpp for both RGB and MCU interfaces (DPI=101, DBI=101).
pub const PIXEL_FORMAT_16BPP: u8 = 0x55;

/// Frame rate control: DIVA = fosc, RTNA = 24 clocks per line (≈79 Hz).
pub const FRAME_RATE_DEFAULT: [u8; 2] = [0x00, 0x18];

/// Delay after the reset line changes level.
pub const RESET_PULSE_US: u32 = 10;
/// Delay after SoftwareReset (datasheet minimum 5 ms).
pub const SOFTWARE_RESET_MS: u32 = 10;
/// Delay after SleepOut before the first memory write.
pub const SLEEP_OUT_MS: u32 = 100;
/// Delay after SleepIn.
pub const SLEEP_IN_MS: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Command::SoftwareReset.opcode(), 0x01);
        assert_eq!(Command::SleepOut.opcode(), 0x11);
        assert_eq!(Command::DisplayOff.opcode(), 0x28);
        assert_eq!(Command::DisplayOn.opcode(), 0x29);
        assert_eq!(Command::ColumnAddressSet.opcode(), 0x2A);
        assert_eq!(Command::PageAddressSet.opcode(), 0x2B);
        assert_eq!(Command::MemoryWrite.opcode(), 0x2C);
        assert_eq!(Command::MemoryAccessControl.opcode(), 0x36);
        assert_eq!(Command::PixelFormatSet.opcode(), 0x3A);
        assert_eq!(Command::FrameRateControl.opcode(), 0xB1);
    }

    #[test]
    fn test_from_opcode_round_trips_known_commands() {
        for cmd in [
            Command::SoftwareReset,
            Command::SleepIn,
            Command::SleepOut,
            Command::DisplayOff,
            Command::DisplayOn,
            Command::ColumnAddressSet,
            Command::PageAddressSet,
            Command::MemoryWrite,
            Command::MemoryAccessControl,
            Command::PixelFormatSet,
            Command::FrameRateControl,
        ] {
            assert_eq!(Command::from_opcode(cmd.opcode()), Some(cmd));
        }
        assert_eq!(Command::from_opcode(0x00), None, "NOP is never sent");
        assert_eq!(Command::from_opcode(0xFF), None);
    }

    #[test]
    fn test_sleep_out_settle_meets_minimum() {
        assert!(SLEEP_OUT_MS >= 100);
        assert!(SOFTWARE_RESET_MS >= 5);
        assert!(RESET_PULSE_US > 0);
    }
}
