//! A library for assembling ICO and CUR image files.
//!
//! Images are added to a [`Container`] in the order they should appear in
//! the file, each tagged with the format it will be embedded as (PNG or
//! BMP).  [`Container::encode`] then produces the complete file: the
//! header, one directory entry per image, and the image data.
//!
//! ```
//! let image = icowriter::IconImage::new(32, 32);
//! let mut icon = icowriter::Container::icon();
//! icon.add_png(&image);
//! icon.add_bmp(&image);
//! let data = icon.encode().unwrap();
//! assert_eq!(&data[0..6], b"\x00\x00\x01\x00\x02\x00");
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod container;
mod error;
mod image;
mod kind;
mod payload;

pub use crate::container::{Container, Entry};
pub use crate::error::{EncodeError, Result};
pub use crate::image::IconImage;
pub use crate::kind::{ContainerKind, PayloadFormat};
pub use crate::payload::{PayloadEncoder, StandardEncoder};
