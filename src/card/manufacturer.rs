//! Manufacturer block (sector 0, block 0), for cards with a 4-byte UID.
//!
//! ```text
//! [0x0] UID                (4 bytes)
//! [0x4] BCC                (1 byte, XOR of the UID bytes)
//! [0x5] SAK                (1 byte)
//! [0x6] ATQA               (2 bytes)
//! [0x8] Manufacturer data  (8 bytes)
//! ```
//! Written once at the factory; the card never allows it to change.

use crate::Result;
use crate::card::geometry::BLOCK_SIZE;
use crate::utils::bytesa;
#[cfg(feature = "serde")]
use crate::utils::serialize_hex;

/// Decoded manufacturer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Manufacturer {
    /// 4-byte unique identifier.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_hex"))]
    pub uid: [u8; 4],
    /// Block check character as stored.
    pub bcc: u8,
    /// Select acknowledge.
    pub sak: u8,
    /// Answer to request, type A.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_hex"))]
    pub atqa: [u8; 2],
    /// Manufacturer-defined bytes 8-15.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_hex"))]
    pub data: [u8; 8],
}

impl Manufacturer {
    /// Parse the manufacturer block from the start of a dump.
    pub fn parse(dump: &[u8]) -> Result<Self> {
        let block = bytesa::<BLOCK_SIZE>(dump, 0)?;
        let [u0, u1, u2, u3, bcc, sak, q0, q1, data @ ..] = block;
        Ok(Self {
            uid: [u0, u1, u2, u3],
            bcc,
            sak,
            atqa: [q0, q1],
            data,
        })
    }

    /// BCC the UID calls for.
    pub fn expected_bcc(&self) -> u8 {
        self.uid.iter().fold(0, |acc, b| acc ^ b)
    }

    /// Whether the stored BCC matches the UID.
    pub fn bcc_valid(&self) -> bool {
        self.bcc == self.expected_bcc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields_and_checks_bcc() {
        let mut dump = [0u8; 320];
        dump[..16].copy_from_slice(&[
            0x11, 0x22, 0x33, 0x44, 0x44, 0x08, 0x04, 0x00, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67,
            0x68, 0x69,
        ]);
        let m = Manufacturer::parse(&dump).unwrap();
        assert_eq!(m.uid, [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(m.sak, 0x08);
        assert_eq!(m.atqa, [0x04, 0x00]);
        assert_eq!(m.data[0], 0x62);
        assert_eq!(m.expected_bcc(), 0x44);
        assert!(m.bcc_valid());

        dump[4] = 0x45;
        assert!(!Manufacturer::parse(&dump).unwrap().bcc_valid());
    }
}
