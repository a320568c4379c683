//! CLI value types mapped onto driver configuration.

use clap::ValueEnum;
use ili9341::{Framing, Orientation};

/// `--orientation` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrientationArg {
    Portrait,
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::PortraitFlipped => Orientation::PortraitFlipped,
            OrientationArg::LandscapeFlipped => Orientation::LandscapeFlipped,
        }
    }
}

/// `--framing` values.
#[cfg_attr(not(feature = "linux"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// Chip select cycles around every byte
    PerByte,
    /// Chip select held across each data run
    Burst,
}

impl From<FramingArg> for Framing {
    fn from(arg: FramingArg) -> Self {
        match arg {
            FramingArg::PerByte => Framing::PerByte,
            FramingArg::Burst => Framing::Burst,
        }
    }
}
