use crate::image::IconImage;
use crate::kind::PayloadFormat;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

//===========================================================================//

// The size of a BITMAPINFOHEADER struct, in bytes.
const BMP_HEADER_LEN: u32 = 40;

// Bitmaps are always written at full color depth with an alpha channel.
const BMP_BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// Serializes a single image into the byte stream embedded in a container.
///
/// Implementations must be deterministic; `Container::encode_with` relies
/// on the returned length to compute the offsets of later payloads.
pub trait PayloadEncoder {
    /// Encodes the image as a complete PNG stream.
    fn encode_png(&self, image: &IconImage) -> io::Result<Vec<u8>>;

    /// Encodes the image as a device-independent bitmap, starting at the
    /// BITMAPINFOHEADER.  The 14-byte BMP file header must not be included.
    fn encode_bmp(&self, image: &IconImage) -> io::Result<Vec<u8>>;

    /// Encodes the image in the given format.
    fn encode(
        &self,
        format: PayloadFormat,
        image: &IconImage,
    ) -> io::Result<Vec<u8>> {
        match format {
            PayloadFormat::Png => self.encode_png(image),
            PayloadFormat::Bmp => self.encode_bmp(image),
        }
    }
}

//===========================================================================//

/// The default payload encoder: 8-bit RGBA PNGs and 32-bpp bitmaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardEncoder;

impl PayloadEncoder for StandardEncoder {
    fn encode_png(&self, image: &IconImage) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        match write_png(image, &mut data) {
            Ok(()) => Ok(data),
            Err(png::EncodingError::IoError(error)) => Err(error),
            Err(png::EncodingError::Format(error)) => {
                invalid_input!("PNG format error: {}", error);
            }
            Err(png::EncodingError::LimitsExceeded) => {
                invalid_input!("PNG limits exceeded");
            }
            Err(png::EncodingError::Parameter(error)) => {
                invalid_input!("PNG parameter error: {}", error);
            }
        }
    }

    fn encode_bmp(&self, image: &IconImage) -> io::Result<Vec<u8>> {
        let width = image.width();
        let height = image.height();
        // The height field counts the rows of both the color data and the
        // alpha mask, so it must hold twice the image height.
        if width > i32::MAX as u32 || height > (i32::MAX / 2) as u32 {
            invalid_input!(
                "Image too large for BMP encoding (was {}x{})",
                width,
                height
            );
        }
        let rgba = image.rgba_data();

        // Determine the size of the encoded data:
        let rgb_row_size = 4 * width as usize;
        let mask_row_data_size = (width as usize + 7) / 8;
        let mask_row_size = ((mask_row_data_size + 3) / 4) * 4;
        let mask_row_padding = vec![0u8; mask_row_size - mask_row_data_size];
        let data_size = BMP_HEADER_LEN as usize
            + height as usize * (rgb_row_size + mask_row_size);
        let mut data = Vec::<u8>::with_capacity(data_size);

        // Write the BITMAPINFOHEADER struct:
        data.write_u32::<LittleEndian>(BMP_HEADER_LEN)?;
        data.write_i32::<LittleEndian>(width as i32)?;
        data.write_i32::<LittleEndian>(2 * height as i32)?;
        data.write_u16::<LittleEndian>(1)?; // planes
        data.write_u16::<LittleEndian>(BMP_BITS_PER_PIXEL)?;
        data.write_u32::<LittleEndian>(0)?; // compression
        data.write_u32::<LittleEndian>(0)?; // image size
        data.write_i32::<LittleEndian>(0)?; // horz ppm
        data.write_i32::<LittleEndian>(0)?; // vert ppm
        data.write_u32::<LittleEndian>(0)?; // colors used
        data.write_u32::<LittleEndian>(0)?; // colors important
        debug_assert_eq!(data.len(), BMP_HEADER_LEN as usize);

        // Write the color data, which is stored row by row, starting from
        // the *bottom* row.  32-bpp rows never need padding.
        for row in 0..height {
            let start = (4 * (height - row - 1) * width) as usize;
            for pixel in rgba[start..][..rgb_row_size].chunks_exact(4) {
                data.write_u8(pixel[2])?; // blue
                data.write_u8(pixel[1])?; // green
                data.write_u8(pixel[0])?; // red
                data.write_u8(pixel[3])?; // alpha
            }
        }

        // Write the mask data (1 bit per pixel, set for fully transparent
        // pixels):
        for row in 0..height {
            let mut start = (4 * (height - row - 1) * width) as usize;
            let mut col = 0;
            for _ in 0..mask_row_data_size {
                let mut byte = 0;
                for bit in 0..8 {
                    if rgba[start + 3] == 0 {
                        byte |= 1 << (7 - bit);
                    }
                    col += 1;
                    if col == width {
                        break;
                    }
                    start += 4;
                }
                data.write_u8(byte)?;
            }
            data.write_all(&mask_row_padding)?;
        }

        debug_assert_eq!(data.len(), data_size);
        Ok(data)
    }
}

fn write_png<W: Write>(
    image: &IconImage,
    writer: W,
) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.rgba_data())?;
    writer.finish()
}

//===========================================================================//


//===========================================================================//
