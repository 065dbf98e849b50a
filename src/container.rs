use crate::error::{EncodeError, Result};
use crate::image::IconImage;
use crate::kind::{ContainerKind, PayloadFormat};
use crate::payload::{PayloadEncoder, StandardEncoder};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};
use std::io::{self, Write};

//===========================================================================//

// The size of the ICONDIR struct, in bytes.
const HEADER_LEN: usize = 6;

// The size of an ICONDIRENTRY struct, in bytes.
const ENTRY_LEN: usize = 16;

// The count field of the ICONDIR is only 16 bits wide.
const MAX_ENTRIES: usize = u16::MAX as usize;

// TODO: Derive these from the image once palette and color depth analysis
// exist; cursors would store their hotspot here instead.
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// An ordered collection of images; the contents of a single ICO or CUR
/// file, ready to be encoded.
#[derive(Clone, Debug)]
pub struct Container<'a> {
    kind: ContainerKind,
    entries: Vec<Entry<'a>>,
}

impl<'a> Container<'a> {
    /// Creates a new, empty container of the given kind.
    pub fn new(kind: ContainerKind) -> Container<'a> {
        Container { kind, entries: Vec::new() }
    }

    /// Creates a new, empty icon (ICO) container.
    pub fn icon() -> Container<'a> {
        Container::new(ContainerKind::Icon)
    }

    /// Creates a new, empty cursor (CUR) container.
    pub fn cursor() -> Container<'a> {
        Container::new(ContainerKind::Cursor)
    }

    /// Returns the kind of container, either an icon or a cursor.
    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Returns the entries in this container, in the order they were added.
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Returns the number of entries in this container.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an image, to be embedded in the given format.  The image is
    /// not inspected until the container is encoded.
    pub fn add(
        &mut self,
        format: PayloadFormat,
        image: &'a IconImage,
        alpha_index: Option<u8>,
    ) {
        self.entries.push(Entry { format, image, alpha_index });
    }

    /// Appends an image to be embedded as a PNG.
    pub fn add_png(&mut self, image: &'a IconImage) {
        self.add(PayloadFormat::Png, image, None);
    }

    /// Appends an image to be embedded as a BMP.
    pub fn add_bmp(&mut self, image: &'a IconImage) {
        self.add(PayloadFormat::Bmp, image, None);
    }

    /// Appends an image to be embedded as a BMP, recording the palette index
    /// that should be treated as transparent.
    pub fn add_bmp_with_alpha(
        &mut self,
        image: &'a IconImage,
        alpha_index: u8,
    ) {
        self.add(PayloadFormat::Bmp, image, Some(alpha_index));
    }

    /// Encodes the container into a complete ICO or CUR file using the
    /// default payload encoder.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&StandardEncoder)
    }

    /// Encodes the container into a complete ICO or CUR file, using
    /// `encoder` to serialize each image.  Fails without producing any
    /// output if any image fails to encode.
    pub fn encode_with<E: PayloadEncoder + ?Sized>(
        &self,
        encoder: &E,
    ) -> Result<Vec<u8>> {
        let count = self.entries.len();
        if count > MAX_ENTRIES {
            return Err(EncodeError::CapacityExceeded {
                count,
                max: MAX_ENTRIES,
            });
        }
        debug!("Encoding {:?} container with {} entries", self.kind, count);
        let directory_len = HEADER_LEN + ENTRY_LEN * count;
        let mut output = Vec::<u8>::with_capacity(directory_len);
        output.extend_from_slice(&directory_header(self.kind, count as u16));
        // Payloads are collected separately and appended after the last
        // directory entry.
        let mut payloads = Vec::<u8>::new();
        let mut data_offset = directory_len as u32;
        for (index, entry) in self.entries.iter().enumerate() {
            let payload =
                encoder.encode(entry.format, entry.image).map_err(|source| {
                    EncodeError::Encoding {
                        index,
                        format: entry.format,
                        source,
                    }
                })?;
            let data_size = u32::try_from(payload.len())
                .map_err(|_| EncodeError::OffsetOverflow { index })?;
            trace!(
                "Entry {}: {:?}, {} bytes at offset {}",
                index,
                entry.format,
                data_size,
                data_offset
            );
            output.extend_from_slice(&directory_entry(
                entry.image,
                data_size,
                data_offset,
            ));
            payloads.extend_from_slice(&payload);
            // Advance by this entry's own size, not by the length of
            // everything accumulated so far.
            data_offset = data_offset
                .checked_add(data_size)
                .ok_or(EncodeError::OffsetOverflow { index })?;
        }
        output.append(&mut payloads);
        Ok(output)
    }

    /// Encodes the container and writes the complete file to `writer`.
    /// Nothing is written if encoding fails.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let data = self.encode()?;
        writer.write_all(&data)
    }
}

//===========================================================================//

/// One image in a container, along with how it should be embedded.
#[derive(Clone, Copy, Debug)]
pub struct Entry<'a> {
    format: PayloadFormat,
    image: &'a IconImage,
    alpha_index: Option<u8>,
}

impl<'a> Entry<'a> {
    /// Returns the format this image will be embedded as.
    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    /// Returns the image itself.
    pub fn image(&self) -> &'a IconImage {
        self.image
    }

    /// Returns the palette index treated as transparent, if one was given.
    /// This is recorded for BMP entries but not yet used when encoding.
    pub fn alpha_index(&self) -> Option<u8> {
        self.alpha_index
    }
}

//===========================================================================//

fn directory_header(kind: ContainerKind, count: u16) -> [u8; HEADER_LEN] {
    let mut bytes = [0u8; HEADER_LEN];
    // Bytes 0..2 are reserved and stay zero.
    LittleEndian::write_u16(&mut bytes[2..4], kind.number());
    LittleEndian::write_u16(&mut bytes[4..6], count);
    bytes
}

fn directory_entry(
    image: &IconImage,
    data_size: u32,
    data_offset: u32,
) -> [u8; ENTRY_LEN] {
    let (width, height) = image.bounds();
    let mut bytes = [0u8; ENTRY_LEN];
    bytes[0] = dimension_byte(width);
    bytes[1] = dimension_byte(height);
    // Byte 2 is the palette size (no palette) and byte 3 is reserved.
    LittleEndian::write_u16(&mut bytes[4..6], COLOR_PLANES);
    LittleEndian::write_u16(&mut bytes[6..8], BITS_PER_PIXEL);
    LittleEndian::write_u32(&mut bytes[8..12], data_size);
    LittleEndian::write_u32(&mut bytes[12..16], data_offset);
    bytes
}

// A width/height byte of zero indicates a size of 256 or more.
fn dimension_byte(size: u32) -> u8 {
    if size > 255 {
        0
    } else {
        size as u8
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{directory_entry, Container, ContainerKind, PayloadFormat};
    use crate::error::EncodeError;
    use crate::image::IconImage;
    use crate::payload::PayloadEncoder;
    use byteorder::{ByteOrder, LittleEndian};
    use std::io;

    // Produces a payload whose length is the image width, so tests can
    // control payload sizes precisely.
    struct SizedEncoder;

    impl PayloadEncoder for SizedEncoder {
        fn encode_png(&self, image: &IconImage) -> io::Result<Vec<u8>> {
            Ok(vec![b'P'; image.width() as usize])
        }

        fn encode_bmp(&self, image: &IconImage) -> io::Result<Vec<u8>> {
            Ok(vec![b'B'; image.width() as usize])
        }
    }

    struct FailingEncoder;

    impl PayloadEncoder for FailingEncoder {
        fn encode_png(&self, _image: &IconImage) -> io::Result<Vec<u8>> {
            Ok(vec![0u8; 8])
        }

        fn encode_bmp(&self, _image: &IconImage) -> io::Result<Vec<u8>> {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "no bitmaps"))
        }
    }

    #[test]
    fn write_empty_icon_set() {
        let container = Container::new(ContainerKind::Icon);
        let mut output = Vec::<u8>::new();
        container.write(&mut output).unwrap();
        let expected: &[u8] = b"\x00\x00\x01\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn write_empty_cursor_set() {
        let container = Container::new(ContainerKind::Cursor);
        let mut output = Vec::<u8>::new();
        container.write(&mut output).unwrap();
        let expected: &[u8] = b"\x00\x00\x02\x00\x00\x00";
        assert_eq!(output.as_slice(), expected);
    }

    #[test]
    fn add_records_entries_in_order() {
        let small = IconImage::new(1, 1);
        let large = IconImage::new(2, 2);
        let mut container = Container::icon();
        container.add_png(&small);
        container.add_bmp(&large);
        container.add_bmp_with_alpha(&small, 7);
        assert_eq!(container.len(), 3);
        let entries = container.entries();
        assert_eq!(entries[0].format(), PayloadFormat::Png);
        assert_eq!(entries[0].alpha_index(), None);
        assert_eq!(entries[1].format(), PayloadFormat::Bmp);
        assert_eq!(entries[1].image().width(), 2);
        assert_eq!(entries[2].format(), PayloadFormat::Bmp);
        assert_eq!(entries[2].alpha_index(), Some(7));
    }

    #[test]
    fn directory_entry_fields() {
        let image = IconImage::new(16, 48);
        let bytes = directory_entry(&image, 0x1234, 0x56);
        let expected: &[u8] = b"\x10\x30\x00\x00\x01\x00\x20\x00\
                                \x34\x12\x00\x00\x56\x00\x00\x00";
        assert_eq!(&bytes[..], expected);
    }

    #[test]
    fn directory_entry_truncates_256() {
        let image = IconImage::new(256, 256);
        let bytes = directory_entry(&image, 0, 0);
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 0);
    }

    #[test]
    fn offsets_use_each_entry_size() {
        // Advancing by the total payload length so far would put the third
        // entry at 70 + 10 + (10 + 3) = 93 instead of 83.
        let images: Vec<IconImage> =
            [10, 3, 7, 1].iter().map(|&w| IconImage::new(w, 1)).collect();
        let mut container = Container::icon();
        for image in images.iter() {
            container.add_png(image);
        }
        let output = container.encode_with(&SizedEncoder).unwrap();
        let mut expected_offset = 6 + 16 * 4;
        for (index, image) in images.iter().enumerate() {
            let entry = &output[6 + 16 * index..][..16];
            let size = LittleEndian::read_u32(&entry[8..12]);
            let offset = LittleEndian::read_u32(&entry[12..16]);
            assert_eq!(size, image.width());
            assert_eq!(offset, expected_offset);
            expected_offset += size;
        }
        assert_eq!(output.len(), expected_offset as usize);
    }

    #[test]
    fn payloads_follow_directory_in_order() {
        let first = IconImage::new(2, 1);
        let second = IconImage::new(3, 1);
        let mut container = Container::cursor();
        container.add_bmp(&first);
        container.add_png(&second);
        let output = container.encode_with(&SizedEncoder).unwrap();
        assert_eq!(&output[0..6], b"\x00\x00\x02\x00\x02\x00");
        assert_eq!(&output[38..], b"BBPPP");
    }

    #[test]
    fn encoder_failure_aborts() {
        let image = IconImage::new(1, 1);
        let mut container = Container::icon();
        container.add_png(&image);
        container.add_bmp(&image);
        container.add_png(&image);
        match container.encode_with(&FailingEncoder) {
            Err(EncodeError::Encoding { index, format, source }) => {
                assert_eq!(index, 1);
                assert_eq!(format, PayloadFormat::Bmp);
                assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
                assert_eq!(source.to_string(), "no bitmaps");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn too_many_entries() {
        let image = IconImage::new(1, 1);
        let mut container = Container::icon();
        for _ in 0..65536 {
            container.add_png(&image);
        }
        match container.encode_with(&SizedEncoder) {
            Err(EncodeError::CapacityExceeded { count, max }) => {
                assert_eq!(count, 65536);
                assert_eq!(max, 65535);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

//===========================================================================//
