//! Low-level byte primitives shared by the decoders.
//!
//! Slice accessors either return exactly the bytes they promise or an
//! error - there is no partial-read ambiguity.

use std::fmt::Write as _;
use std::io::Read;

use crate::{Error, Result};

/// Copy `N` bytes starting at `offset` into a fixed-size array.
///
/// A buffer too short for the request is reported as
/// [`Error::InvalidSize`] carrying the buffer length.
#[inline]
pub(crate) fn bytesa<const N: usize>(buf: &[u8], offset: usize) -> Result<[u8; N]> {
    let end = offset.checked_add(N).ok_or(Error::InvalidSize(buf.len()))?;
    let slice = buf.get(offset..end).ok_or(Error::InvalidSize(buf.len()))?;
    let mut b = [0u8; N];
    b.copy_from_slice(slice);
    Ok(b)
}

/// Extract bit `pos` of `byte` as `0` or `1`.
#[inline]
pub(crate) const fn bit(byte: u8, pos: u8) -> u8 {
    (byte >> pos) & 1
}

/// Read at most `limit` bytes from a reader into a `Vec`.
///
/// Stops early at end of stream; a short result is not an error here, the
/// caller validates the length.
pub(crate) fn read_up_to<R: Read>(r: &mut R, limit: usize) -> Result<Vec<u8>> {
    let mut b = Vec::with_capacity(limit);
    r.take(limit as u64).read_to_end(&mut b)?;
    Ok(b)
}

/// Render bytes as contiguous lowercase hex.
pub fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Serialize a byte array as contiguous lowercase hex, the way the table
/// prints it.
#[cfg(feature = "serde")]
pub(crate) fn serialize_hex<S: serde::Serializer, const N: usize>(
    bytes: &[u8; N],
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&hex(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytesa_in_and_out_of_range() {
        let buf = [1u8, 2, 3, 4, 5];
        assert_eq!(bytesa::<2>(&buf, 3).unwrap(), [4, 5]);
        assert!(matches!(bytesa::<2>(&buf, 4), Err(Error::InvalidSize(5))));
        assert!(matches!(bytesa::<1>(&buf, usize::MAX), Err(Error::InvalidSize(5))));
    }

    #[test]
    fn bit_extraction() {
        assert_eq!(bit(0b1000_0000, 7), 1);
        assert_eq!(bit(0b1000_0000, 6), 0);
        assert_eq!(bit(0x01, 0), 1);
    }

    #[test]
    fn read_up_to_stops_at_limit_and_eof() {
        let data = vec![0xAAu8; 10];
        assert_eq!(read_up_to(&mut &data[..], 4).unwrap().len(), 4);
        assert_eq!(read_up_to(&mut &data[..], 64).unwrap().len(), 10);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(hex(&[0x00, 0x0a, 0xff]), "000aff");
        assert_eq!(hex(&[]), "");
    }
}
