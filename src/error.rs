//! Library-wide error and result types.

use std::fmt;
use std::io;

/// Result alias used throughout mfdread.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Only [`Error::InvalidSize`] and [`Error::Io`] stop a report from being
/// built. [`Error::InconsistentBits`] is recorded on the affected block and
/// decoding carries on with the next one.
#[derive(Debug)]
pub enum Error {
    /// The dump length is not one of 320, 1024, 2048 or 4096 bytes.
    InvalidSize(usize),
    /// The direct and inverted access bits of a condition slot do not
    /// complement each other.
    InconsistentBits {
        /// Condition slot (0-3) within the access-bits field.
        slot: usize,
    },
    /// A sector index beyond the sector count of the resolved geometry.
    SectorOutOfRange(usize),
    /// A block index that maps to no condition slot.
    InvalidBlock(usize),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSize(n) => write!(
                f,
                "wrong dump size: {n} bytes (only 320, 1024, 2048 or 4096 bytes are allowed)"
            ),
            Error::InconsistentBits { slot } => {
                write!(f, "inconsistent access bits in slot {slot}")
            }
            Error::SectorOutOfRange(s) => write!(f, "sector {s} out of range"),
            Error::InvalidBlock(b) => write!(f, "block {b} has no access condition slot"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
