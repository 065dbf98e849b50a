use crate::kind::PayloadFormat;
use std::io;
use thiserror::Error;

//===========================================================================//

/// An error that aborts encoding a container.  Encoding is all-or-nothing,
/// so no output is produced when one of these is returned.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The payload encoder could not serialize one of the images.
    #[error("failed to encode entry {index} as {format:?}: {source}")]
    Encoding {
        /// Position of the failing entry, in append order.
        index: usize,
        /// The format the entry was being encoded as.
        format: PayloadFormat,
        /// The error reported by the payload encoder.
        #[source]
        source: io::Error,
    },

    /// The container holds more entries than the count field can record.
    #[error("too many entries in container (was {count}, but max is {max})")]
    CapacityExceeded {
        /// Number of entries in the container.
        count: usize,
        /// Largest number of entries a file can hold.
        max: usize,
    },

    /// A payload size or offset does not fit in its 32-bit directory field.
    #[error("entry {index} does not fit within a 4 GiB file")]
    OffsetOverflow {
        /// Position of the entry whose payload overflowed.
        index: usize,
    },
}

impl From<EncodeError> for io::Error {
    fn from(error: EncodeError) -> io::Error {
        let kind = match error {
            EncodeError::Encoding { ref source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, error)
    }
}

/// Shorthand for results of container encoding.
pub type Result<T> = std::result::Result<T, EncodeError>;

//===========================================================================//


//===========================================================================//
