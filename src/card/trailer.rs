//! Sector trailer - the last block of every sector.
//!
//! ## Layout (16 bytes)
//! ```text
//! [0x0] Key A          (6 bytes)
//! [0x6] Access bits    (3 bytes) + GPB (1 byte)
//! [0xA] Key B / data   (6 bytes)
//! ```

use crate::Result;
use crate::card::access::AccessBits;
use crate::card::geometry::BLOCK_SIZE;
use crate::keys::Key;
use crate::utils::bytesa;

/// Decoded sector trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trailer {
    /// Key A (bytes 0-5).
    pub key_a: Key,
    /// Access bits and GPB (bytes 6-9).
    pub access_bits: AccessBits,
    /// Key B, or plain data when the trailer condition makes it readable.
    pub key_b: Key,
}

impl Trailer {
    /// Split a trailer block into its three fields.
    pub fn parse(block: &[u8; BLOCK_SIZE]) -> Self {
        let [a0, a1, a2, a3, a4, a5, b0, b1, b2, b3, k0, k1, k2, k3, k4, k5] = *block;
        Self {
            key_a: Key([a0, a1, a2, a3, a4, a5]),
            access_bits: AccessBits([b0, b1, b2, b3]),
            key_b: Key([k0, k1, k2, k3, k4, k5]),
        }
    }

    /// Read the trailer at `offset` of a dump.
    pub fn read_at(dump: &[u8], offset: usize) -> Result<Self> {
        Ok(Self::parse(&bytesa::<BLOCK_SIZE>(dump, offset)?))
    }
}
