//! Byte-level SPI framing
//!
//! The controller distinguishes commands from parameters by the level of the
//! D/C line while a byte is clocked in: low for a register (opcode) byte,
//! high for a data byte. Chip select brackets each transfer.
//!
//! Two hardware implementations are provided:
//!
//! | Type | Chip select | Use when |
//! |------|-------------|----------|
//! | [`SpiTransport`] | owned by the [`SpiDevice`] | the HAL gives you a device (CS managed per transaction) |
//! | [`BusTransport`] | plain GPIO driven here | CS is an ordinary output pin next to a raw [`SpiBus`] |

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{SpiBus, SpiDevice};

use crate::error::DisplayError;

/// How chip select wraps the bytes of a data run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    /// Every byte gets its own chip-select cycle.
    #[default]
    PerByte,
    /// A data slice passed to [`Transport::write_data`] is clocked out in a
    /// single chip-select cycle. Register bytes are always framed alone.
    Burst,
}

/// Write-only link to the controller.
///
/// Implementors frame one byte per call. Errors are fatal to the caller; no
/// retry is attempted anywhere in the driver.
pub trait Transport {
    /// Send one byte with D/C low.
    fn write_register_byte(&mut self, value: u8) -> Result<(), DisplayError>;

    /// Send one byte with D/C high.
    fn write_data_byte(&mut self, value: u8) -> Result<(), DisplayError>;

    /// Send a run of data bytes. An empty slice sends nothing.
    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        for &byte in data {
            self.write_data_byte(byte)?;
        }
        Ok(())
    }

    /// Send an opcode followed by its parameter bytes.
    fn write_command(&mut self, opcode: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.write_register_byte(opcode)?;
        self.write_data(params)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_register_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        (**self).write_register_byte(value)
    }

    fn write_data_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        (**self).write_data_byte(value)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        (**self).write_data(data)
    }
}

// ---------------------------------------------------------------------------
// SpiDevice transport
// ---------------------------------------------------------------------------

/// Transport over an [`SpiDevice`] plus a D/C pin.
///
/// The device asserts chip select for the duration of each `write`, so a
/// per-byte frame is one single-byte transaction.
pub struct SpiTransport<SPI, DC> {
    spi: SPI,
    dc: DC,
    framing: Framing,
}

impl<SPI, DC> SpiTransport<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Per-byte framing.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self::with_framing(spi, dc, Framing::PerByte)
    }

    /// Explicit framing.
    pub fn with_framing(spi: SPI, dc: DC, framing: Framing) -> Self {
        Self { spi, dc, framing }
    }

    /// Selected framing.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Give back the SPI device and D/C pin.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    fn send(&mut self, data_mode: bool, bytes: &[u8]) -> Result<(), DisplayError> {
        if data_mode {
            self.dc.set_high().map_err(|_| DisplayError::Gpio)?;
        } else {
            self.dc.set_low().map_err(|_| DisplayError::Gpio)?;
        }
        self.spi
            .write(bytes)
            .map_err(|_| DisplayError::Communication)
    }
}

impl<SPI, DC> Transport for SpiTransport<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn write_register_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(false, &[value])
    }

    fn write_data_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(true, &[value])
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.is_empty() {
            return Ok(());
        }
        match self.framing {
            Framing::Burst => self.send(true, data),
            Framing::PerByte => {
                for &byte in data {
                    self.send(true, &[byte])?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SpiBus transport
// ---------------------------------------------------------------------------

/// Transport over a raw [`SpiBus`] with chip select on a GPIO.
///
/// Frame: CS low, D/C, write, flush, CS high. The flush guarantees the last
/// bit has left the shift register before chip select is released.
pub struct BusTransport<BUS, CS, DC> {
    bus: BUS,
    cs: CS,
    dc: DC,
    framing: Framing,
}

impl<BUS, CS, DC> BusTransport<BUS, CS, DC>
where
    BUS: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    /// Per-byte framing.
    pub fn new(bus: BUS, cs: CS, dc: DC) -> Self {
        Self::with_framing(bus, cs, dc, Framing::PerByte)
    }

    /// Explicit framing.
    pub fn with_framing(bus: BUS, cs: CS, dc: DC, framing: Framing) -> Self {
        Self {
            bus,
            cs,
            dc,
            framing,
        }
    }

    /// Selected framing.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Give back the bus and both pins.
    pub fn release(self) -> (BUS, CS, DC) {
        (self.bus, self.cs, self.dc)
    }

    fn send(&mut self, data_mode: bool, bytes: &[u8]) -> Result<(), DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::Gpio)?;
        let result = self.clock_out(data_mode, bytes);
        // CS is released even when the transfer failed.
        let released = self.cs.set_high().map_err(|_| DisplayError::Gpio);
        result.and(released)
    }

    fn clock_out(&mut self, data_mode: bool, bytes: &[u8]) -> Result<(), DisplayError> {
        if data_mode {
            self.dc.set_high().map_err(|_| DisplayError::Gpio)?;
        } else {
            self.dc.set_low().map_err(|_| DisplayError::Gpio)?;
        }
        self.bus
            .write(bytes)
            .map_err(|_| DisplayError::Communication)?;
        self.bus.flush().map_err(|_| DisplayError::Communication)
    }
}

impl<BUS, CS, DC> Transport for BusTransport<BUS, CS, DC>
where
    BUS: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    fn write_register_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(false, &[value])
    }

    fn write_data_byte(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(true, &[value])
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.is_empty() {
            return Ok(());
        }
        match self.framing {
            Framing::Burst => self.send(true, data),
            Framing::PerByte => {
                for &byte in data {
                    self.send(true, &[byte])?;
                }
                Ok(())
            }
        }
    }
}
