//! Sector key material.
//!
//! Every MIFARE Classic sector trailer stores two 6-byte keys:
//!
//! * **Key A** (trailer bytes 0-5) is never readable once written; a dump
//!   usually contains it only because the dumping tool knew it and wrote it
//!   back into the image.
//! * **Key B** (trailer bytes 10-15) may be readable depending on the
//!   trailer access condition, in which case it is plain data and cannot be
//!   used for authentication.
//!
//! This module is a plain data container. It never authenticates against a
//! card; it only labels keys that match a short list of publicly documented
//! factory and application defaults so the report is easier to audit.

use std::fmt;

/// Length of a MIFARE Classic key in bytes.
pub const KEY_LEN: usize = 6;

/// Publicly documented default keys, with a short label each.
pub const WELL_KNOWN_KEYS: &[([u8; KEY_LEN], &str)] = &[
    ([0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], "factory default"),
    ([0x00, 0x00, 0x00, 0x00, 0x00, 0x00], "blank"),
    ([0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5], "MAD key A"),
    ([0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5], "MAD key B"),
    ([0xD3, 0xF7, 0xD3, 0xF7, 0xD3, 0xF7], "NDEF public"),
];

/// A 6-byte sector key as stored in a trailer block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub [u8; KEY_LEN]);

impl Key {
    /// Label of a well-known default key, if this key is one.
    pub fn well_known(&self) -> Option<&'static str> {
        WELL_KNOWN_KEYS
            .iter()
            .find(|(k, _)| *k == self.0)
            .map(|(_, name)| *name)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for Key {
    fn from(b: [u8; KEY_LEN]) -> Self {
        Self(b)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Serialized as twelve hex digits, e.g. `"ffffffffffff"`.
#[cfg(feature = "serde")]
impl serde::Serialize for Key {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}
