//! Access-bits field of a sector trailer (trailer bytes 6-9).
//!
//! Each sector holds four condition slots. A slot carries three bits
//! `C1 C2 C3`, and every bit is stored twice: once directly and once
//! inverted, in a different byte.
//!
//! ## Bit layout (slot `b` = 0..=3)
//! ```text
//!          bit 7   6   5   4   3   2   1   0
//! byte 6      /C2_3 .. /C2_0  /C1_3 .. /C1_0
//! byte 7       C1_3 ..  C1_0  /C3_3 .. /C3_0
//! byte 8       C3_3 ..  C3_0   C2_3 ..  C2_0
//! byte 9      general purpose byte (GPB)
//! ```
//!
//! In 4-block sectors slot `b` governs block `b` and slot 3 the trailer.
//! In 16-block sectors slots 0-2 each govern a cluster of five data
//! blocks (`block / 5`) and slot 3 the trailer (block 15).

use std::fmt;

use crate::utils::bit;
use crate::{Error, Result};

/// Number of condition slots in an access-bits field.
pub const SLOT_COUNT: usize = 4;

/// Data blocks sharing one condition slot in an extended sector.
pub const EXTENDED_CLUSTER_SIZE: usize = 5;

/// Where one of the six condition bits of a slot lives: bit `base + slot`
/// of access byte `byte`.
#[derive(Debug, Clone, Copy)]
struct BitField {
    byte: usize,
    base: u8,
}

impl BitField {
    const fn get(self, bytes: &[u8; 4], slot: usize) -> u8 {
        bit(bytes[self.byte], self.base + slot as u8)
    }

    fn set(self, bytes: &mut [u8; 4], slot: usize, value: u8) {
        let mask = 1u8 << (self.base + slot as u8);
        if value & 1 != 0 {
            bytes[self.byte] |= mask;
        } else {
            bytes[self.byte] &= !mask;
        }
    }
}

const C1: BitField = BitField { byte: 1, base: 4 };
const C2: BitField = BitField { byte: 2, base: 0 };
const C3: BitField = BitField { byte: 2, base: 4 };
const NOT_C1: BitField = BitField { byte: 0, base: 0 };
const NOT_C2: BitField = BitField { byte: 0, base: 4 };
const NOT_C3: BitField = BitField { byte: 1, base: 0 };

/// A validated 3-bit access condition, `C1 C2 C3` from most to least
/// significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessCondition(u8);

impl AccessCondition {
    /// Build a condition from its numeric value; only the low 3 bits are
    /// significant.
    pub const fn new(value: u8) -> Self {
        Self(value & 0x07)
    }

    /// Build a condition from its three bits.
    pub const fn from_bits(c1: u8, c2: u8, c3: u8) -> Self {
        Self(((c1 & 1) << 2) | ((c2 & 1) << 1) | (c3 & 1))
    }

    /// Numeric value 0-7.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Bit `C1`, the most significant.
    pub const fn c1(self) -> u8 {
        (self.0 >> 2) & 1
    }

    /// Bit `C2`.
    pub const fn c2(self) -> u8 {
        (self.0 >> 1) & 1
    }

    /// Bit `C3`, the least significant.
    pub const fn c3(self) -> u8 {
        self.0 & 1
    }
}

impl fmt::Display for AccessCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

/// Condition slot governing `block` of a sector.
///
/// Returns [`Error::InvalidBlock`] when the block falls outside the four
/// slots (a 4-block sector never has a block 4; an extended sector never
/// has a block 20).
pub fn slot_for_block(block: usize, extended: bool) -> Result<usize> {
    let slot = if extended {
        block / EXTENDED_CLUSTER_SIZE
    } else {
        block
    };
    if slot >= SLOT_COUNT {
        return Err(Error::InvalidBlock(block));
    }
    Ok(slot)
}

/// Decode the access condition of `block` from a raw access-bits field.
///
/// `extended` selects the clustered mapping of 16-block sectors. Returns
/// [`Error::InconsistentBits`] when the inverted copy does not complement
/// the direct bits.
pub fn decode(bytes: &[u8; 4], block: usize, extended: bool) -> Result<AccessCondition> {
    let slot = slot_for_block(block, extended)?;
    decode_slot(bytes, slot)
}

fn decode_slot(bytes: &[u8; 4], slot: usize) -> Result<AccessCondition> {
    let direct = AccessCondition::from_bits(
        C1.get(bytes, slot),
        C2.get(bytes, slot),
        C3.get(bytes, slot),
    );
    let inverted = AccessCondition::from_bits(
        NOT_C1.get(bytes, slot),
        NOT_C2.get(bytes, slot),
        NOT_C3.get(bytes, slot),
    );
    if direct.value() != !inverted.value() & 0x07 {
        return Err(Error::InconsistentBits { slot });
    }
    Ok(direct)
}

/// The four-byte access-bits field of a trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessBits(pub [u8; 4]);

impl AccessBits {
    /// Factory "transport configuration": data slots `000`, trailer `001`,
    /// GPB `0x69`.
    pub const TRANSPORT: Self = Self([0xFF, 0x07, 0x80, 0x69]);

    /// Encode four slot conditions and a general purpose byte into a
    /// consistent access-bits field.
    pub fn encode(conditions: [AccessCondition; SLOT_COUNT], gpb: u8) -> Self {
        let mut bytes = [0, 0, 0, gpb];
        for (slot, c) in conditions.into_iter().enumerate() {
            C1.set(&mut bytes, slot, c.c1());
            C2.set(&mut bytes, slot, c.c2());
            C3.set(&mut bytes, slot, c.c3());
            NOT_C1.set(&mut bytes, slot, !c.c1());
            NOT_C2.set(&mut bytes, slot, !c.c2());
            NOT_C3.set(&mut bytes, slot, !c.c3());
        }
        Self(bytes)
    }

    /// Decode the condition of `block` (see [`decode`]).
    pub fn condition(&self, block: usize, extended: bool) -> Result<AccessCondition> {
        decode(&self.0, block, extended)
    }

    /// Decode every slot, keeping failures local to their slot.
    pub fn slots(&self) -> [Result<AccessCondition>; SLOT_COUNT] {
        std::array::from_fn(|slot| decode_slot(&self.0, slot))
    }

    /// General purpose byte (trailer byte 9); not interpreted by the card.
    pub const fn gpb(&self) -> u8 {
        self.0[3]
    }
}

impl fmt::Display for AccessBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Serialized as the `C1C2C3` bit string, e.g. `"001"`.
#[cfg(feature = "serde")]
impl serde::Serialize for AccessCondition {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Serialized as eight hex digits, e.g. `"ff078069"`.
#[cfg(feature = "serde")]
impl serde::Serialize for AccessBits {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_configuration() {
        let bits = AccessBits::TRANSPORT;
        for block in 0..3 {
            assert_eq!(bits.condition(block, false).unwrap(), AccessCondition::new(0));
        }
        let trailer = bits.condition(3, false).unwrap();
        assert_eq!(trailer.value(), 1);
        assert_eq!(trailer.to_string(), "001");
        assert_eq!(bits.gpb(), 0x69);
    }

    #[test]
    fn ff0780_trailer_is_001_regardless_of_gpb() {
        for gpb in [0x00, 0x69, 0xFF] {
            let c = decode(&[0xFF, 0x07, 0x80, gpb], 3, false).unwrap();
            assert_eq!((c.c1(), c.c2(), c.c3()), (0, 0, 1));
        }
    }

    #[test]
    fn all_zero_field_is_inconsistent() {
        for block in 0..4 {
            assert!(matches!(
                decode(&[0; 4], block, false),
                Err(Error::InconsistentBits { slot }) if slot == block
            ));
        }
    }

    #[test]
    fn all_ones_field_is_inconsistent() {
        assert!(matches!(
            decode(&[0xFF; 4], 0, false),
            Err(Error::InconsistentBits { slot: 0 })
        ));
    }

    #[test]
    fn known_nxp_example() {
        // Slots 000, 000, 000, 011: the common "key B writes trailer" layout.
        let bits = AccessBits([0x7F, 0x07, 0x88, 0x00]);
        assert_eq!(bits.condition(0, false).unwrap().value(), 0);
        assert_eq!(bits.condition(3, false).unwrap().to_string(), "011");
    }

    #[test]
    fn encode_places_bits_per_layout() {
        let c = [
            AccessCondition::new(0b100),
            AccessCondition::new(0b010),
            AccessCondition::new(0b001),
            AccessCondition::new(0b111),
        ];
        let bits = AccessBits::encode(c, 0xAB);
        // C1: slots 0 and 3 -> byte 7 bits 4 and 7.
        assert_eq!(bits.0[1] >> 4, 0b1001);
        // C2: slots 1 and 3 -> byte 8 bits 1 and 3.
        assert_eq!(bits.0[2] & 0x0F, 0b1010);
        // C3: slots 2 and 3 -> byte 8 bits 6 and 7.
        assert_eq!(bits.0[2] >> 4, 0b1100);
        assert_eq!(bits.gpb(), 0xAB);
        for (slot, got) in bits.slots().into_iter().enumerate() {
            assert_eq!(got.unwrap(), c[slot]);
        }
    }

    #[test]
    fn extended_sector_clusters() {
        assert_eq!(slot_for_block(0, true).unwrap(), 0);
        assert_eq!(slot_for_block(4, true).unwrap(), 0);
        assert_eq!(slot_for_block(5, true).unwrap(), 1);
        assert_eq!(slot_for_block(14, true).unwrap(), 2);
        assert_eq!(slot_for_block(15, true).unwrap(), 3);
        assert!(matches!(slot_for_block(20, true), Err(Error::InvalidBlock(20))));
        assert!(matches!(slot_for_block(4, false), Err(Error::InvalidBlock(4))));
    }

    #[test]
    fn single_flipped_inverted_bit_is_detected() {
        let bits = AccessBits::TRANSPORT;
        // /C1_2 lives at byte 6 bit 2.
        let mut corrupt = bits.0;
        corrupt[0] ^= 1 << 2;
        assert!(matches!(
            decode(&corrupt, 2, false),
            Err(Error::InconsistentBits { slot: 2 })
        ));
        // Other slots are untouched.
        assert!(decode(&corrupt, 1, false).is_ok());
    }
}
