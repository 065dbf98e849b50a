#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// The kind of container being written; determines the type field of the
/// file header.
pub enum ContainerKind {
    /// Plain images (ICO files)
    Icon,
    /// Images with cursor hotspots (CUR files)
    Cursor,
}

impl ContainerKind {
    /// Returns the value stored in the type field of the file header.
    pub fn number(&self) -> u16 {
        match *self {
            ContainerKind::Icon => 1,
            ContainerKind::Cursor => 2,
        }
    }
}

//===========================================================================//

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// How an image is embedded in the container.
pub enum PayloadFormat {
    /// A complete PNG stream.
    Png,
    /// A device-independent bitmap, starting at the BITMAPINFOHEADER (the
    /// BMP file header is omitted).
    Bmp,
}

//===========================================================================//


//===========================================================================//
