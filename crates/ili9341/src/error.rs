//! Driver error type

use thiserror::Error;

/// Errors returned by the ILI9341 driver.
///
/// The write path has no acknowledgement channel, so `Communication` and
/// `Gpio` are unrecoverable: callers are expected to stop driving the panel
/// and re-run [`crate::Ili9341::init`] (or halt). The two `Invalid*`
/// variants are raised before anything reaches the bus.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// SPI transfer failed.
    #[error("SPI communication error")]
    Communication,
    /// Driving a control line (CS, D/C, RESET) failed.
    #[error("GPIO error")]
    Gpio,
    /// Address window or pixel outside the configured geometry, or start > end.
    #[error("Coordinate out of bounds")]
    InvalidCoordinate,
    /// Geometry is empty, exceeds controller RAM, or disagrees with the orientation.
    #[error("Invalid display geometry")]
    InvalidGeometry,
}
